use super::{render_document, Formatter, ToolInfo};
use crate::error::Result;
use crate::report::sink::OutputSink;
use crate::types::sarif::{
    Driver, OriginalUriBaseIds, ReportingDescriptor, Run, SarifLog, SarifResult, Tool,
    COLUMN_KIND, SARIF_SCHEMA, SARIF_VERSION,
};
use crate::types::violation::{RuleLevel, Violation};
use tracing::{debug, info};

pub const ROOT_KEY_PREFIX: &str = "ROOTPATH";

/// Accumulates violations for one lint run and renders them as a single
/// SARIF log.
#[derive(Debug, Clone, Default)]
pub struct SarifReport {
    tool: ToolInfo,
    rules: Vec<ReportingDescriptor>,
    roots: OriginalUriBaseIds,
    results: Vec<SarifResult>,
}

impl SarifReport {
    pub fn new(tool: ToolInfo) -> Self {
        Self {
            tool,
            ..Self::default()
        }
    }

    /// Adds one violation. Paths are resolved before any table is touched,
    /// so a failed call leaves the report unchanged.
    pub fn record(&mut self, violation: &Violation) -> Result<()> {
        let uri = violation.relative_path()?;
        let base_uri = violation.base_dir_uri()?;

        let rule_index = match self.rule_index(violation.rule_id()) {
            Some(index) => index,
            None => {
                debug!(rule = violation.rule_id(), "new rule");
                self.rules.push(ReportingDescriptor::new(
                    violation.rule_id(),
                    violation.rule_level(),
                ));
                self.rules.len() - 1
            }
        };

        let root_key = match self.roots.key_for(&base_uri) {
            Some(key) => key.to_string(),
            None => {
                let key = self.next_root_key();
                debug!(key = %key, uri = %base_uri, "new root");
                self.roots.insert(key.clone(), base_uri);
                key
            }
        };

        debug!(
            rule = violation.rule_id(),
            uri = %uri,
            line = violation.start().0,
            "recorded violation"
        );
        self.results
            .push(SarifResult::new(violation, rule_index, uri, root_key));
        Ok(())
    }

    /// Renders the document. Does not modify the report.
    pub fn finalize(&self) -> Result<String> {
        let log = SarifLog {
            schema: SARIF_SCHEMA,
            version: SARIF_VERSION,
            runs: vec![Run {
                tool: Tool {
                    driver: Driver {
                        name: &self.tool.name,
                        information_uri: &self.tool.information_uri,
                        version: &self.tool.version,
                        rules: &self.rules,
                    },
                },
                results: &self.results,
                column_kind: COLUMN_KIND,
                original_uri_base_ids: &self.roots,
            }],
        };
        info!(
            rules = self.rules.len(),
            results = self.results.len(),
            roots = self.roots.len(),
            "finalizing sarif report"
        );
        render_document(&log)
    }

    pub fn rules(&self) -> &[ReportingDescriptor] {
        &self.rules
    }

    pub fn results(&self) -> &[SarifResult] {
        &self.results
    }

    pub fn roots(&self) -> &OriginalUriBaseIds {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn has_error_level(&self) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.level() == RuleLevel::Error)
    }

    fn rule_index(&self, rule_id: &str) -> Option<usize> {
        self.rules.iter().position(|rule| rule.id == rule_id)
    }

    fn next_root_key(&self) -> String {
        if self.roots.is_empty() {
            ROOT_KEY_PREFIX.to_string()
        } else {
            format!("{ROOT_KEY_PREFIX}{}", self.roots.len() + 1)
        }
    }
}

impl Formatter for SarifReport {
    fn handle(&mut self, violation: &Violation) -> Result<()> {
        self.record(violation)
    }

    fn finish(&mut self, sink: &mut OutputSink) -> Result<()> {
        let document = self.finalize()?;
        sink.write_document(&document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReporterError;
    use crate::report::sink::tests::SharedBuffer;
    use serde_json::{json, Value};

    fn parse(document: &str) -> Value {
        serde_json::from_str(document).expect("document should be valid json")
    }

    fn rooted(rule_id: &str, file: &str, root: &str) -> Violation {
        Violation::new(rule_id, "message", file, 1, 1, "x = 1\n")
            .expect("violation should build")
            .with_root_dir(root)
    }

    #[test]
    fn empty_report_has_empty_tables() {
        let report = SarifReport::new(ToolInfo::default());
        let doc = parse(&report.finalize().expect("finalize should succeed"));

        assert_eq!(
            doc["$schema"],
            "https://schemastore.azurewebsites.net/schemas/json/sarif-2.1.0-rtm.5.json"
        );
        assert_eq!(doc["version"], "2.1.0");
        let run = &doc["runs"][0];
        assert_eq!(run["tool"]["driver"]["name"], "flake8");
        assert_eq!(run["tool"]["driver"]["version"], "4.0.1");
        assert_eq!(run["tool"]["driver"]["rules"], json!([]));
        assert_eq!(run["results"], json!([]));
        assert_eq!(run["columnKind"], "utf16CodeUnits");
        assert_eq!(run["originalUriBaseIds"], json!({}));
    }

    #[test]
    fn same_rule_is_catalogued_once() {
        let mut report = SarifReport::new(ToolInfo::default());
        report
            .record(&rooted("W503", "src/a.py", "."))
            .expect("record should succeed");
        report
            .record(&rooted("W503", "src/b.py", "."))
            .expect("record should succeed");

        assert_eq!(report.rules().len(), 1);
        assert_eq!(report.results().len(), 2);
        assert!(report.results().iter().all(|result| result.rule_index == 0));
        assert!(report.rules()[0].default_configuration.is_none());
        assert!(!report.has_error_level());
    }

    #[test]
    fn rule_indices_follow_first_appearance() {
        let mut report = SarifReport::new(ToolInfo::default());
        for rule in ["W1", "E2", "W1", "F3", "E2"] {
            report
                .record(&rooted(rule, "a.py", "."))
                .expect("record should succeed");
        }

        let ids: Vec<_> = report.rules().iter().map(|rule| rule.id.as_str()).collect();
        assert_eq!(ids, ["W1", "E2", "F3"]);
        let indices: Vec<_> = report
            .results()
            .iter()
            .map(|result| result.rule_index)
            .collect();
        assert_eq!(indices, [0, 1, 0, 2, 1]);
        assert!(report.has_error_level());
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut report = SarifReport::new(ToolInfo::default());
        report
            .record(&rooted("E101", "a.py", "."))
            .expect("record should succeed");

        let first = report.finalize().expect("finalize should succeed");
        let second = report.finalize().expect("finalize should succeed");
        assert_eq!(first, second);
        assert_eq!(report.results().len(), 1);
    }

    #[test]
    fn finish_writes_document_to_sink() {
        let mut report = SarifReport::new(ToolInfo::default());
        report
            .handle(&rooted("E101", "a.py", "."))
            .expect("handle should succeed");

        let target = SharedBuffer::default();
        let mut sink = OutputSink::to_writer(target.clone(), false);
        report.finish(&mut sink).expect("finish should succeed");

        assert_eq!(
            target.contents(),
            report.finalize().expect("finalize should succeed")
        );
    }

    #[cfg(unix)]
    mod unix {
        use super::*;

        #[test]
        fn end_to_end_single_violation() {
            let mut report = SarifReport::new(ToolInfo::default());
            let violation = Violation::new(
                "E101",
                "indentation contains mixed spaces and tabs",
                "/repo/a.py",
                2,
                7,
                "\tprint b",
            )
            .expect("violation should build")
            .with_root_dir("/repo");
            report.record(&violation).expect("record should succeed");

            let doc = parse(&report.finalize().expect("finalize should succeed"));
            let run = &doc["runs"][0];
            assert_eq!(
                run["tool"]["driver"]["rules"],
                json!([{ "id": "E101", "defaultConfiguration": { "level": "error" } }])
            );
            assert_eq!(
                run["originalUriBaseIds"],
                json!({ "ROOTPATH": { "uri": "file:///repo/" } })
            );

            let result = &run["results"][0];
            assert_eq!(result["ruleId"], "E101");
            assert_eq!(result["ruleIndex"], 0);
            assert_eq!(
                result["message"]["text"],
                "indentation contains mixed spaces and tabs"
            );
            let location = &result["locations"][0]["physicalLocation"];
            assert_eq!(location["artifactLocation"]["uri"], "a.py");
            assert_eq!(location["artifactLocation"]["uriBaseId"], "ROOTPATH");
            assert_eq!(location["region"]["startLine"], 2);
            assert_eq!(location["region"]["startColumn"], 7);
            assert_eq!(location["region"]["endLine"], 2);
            assert_eq!(location["region"]["endColumn"], 7);
            assert_eq!(location["region"]["snippet"]["text"], "\tprint b");
        }

        #[test]
        fn distinct_roots_get_numbered_keys() {
            let mut report = SarifReport::new(ToolInfo::default());
            report
                .record(&rooted("W1", "/a/x.py", "/a"))
                .expect("record should succeed");
            report
                .record(&rooted("W1", "/b/x.py", "/b"))
                .expect("record should succeed");
            report
                .record(&rooted("W1", "/a/y.py", "/a"))
                .expect("record should succeed");
            report
                .record(&rooted("W1", "/c/x.py", "/c"))
                .expect("record should succeed");

            let keys: Vec<_> = report.roots().iter().map(|(key, _)| key).collect();
            assert_eq!(keys, ["ROOTPATH", "ROOTPATH2", "ROOTPATH3"]);
            let bases: Vec<_> = report
                .results()
                .iter()
                .map(|result| {
                    result.locations[0]
                        .physical_location
                        .artifact_location
                        .uri_base_id
                        .as_str()
                })
                .collect();
            assert_eq!(bases, ["ROOTPATH", "ROOTPATH2", "ROOTPATH", "ROOTPATH3"]);
            assert_eq!(
                report.roots().get("ROOTPATH2").map(|base| base.uri.as_str()),
                Some("file:///b/")
            );
        }

        #[test]
        fn unrooted_absolute_files_are_keyed_by_their_directory() {
            let mut report = SarifReport::new(ToolInfo::default());
            for file in ["/tmp/x/y.py", "/tmp/x/z.py", "/tmp/w/y.py"] {
                let violation = Violation::new("W1", "m", file, 1, 1, "")
                    .expect("violation should build");
                report.record(&violation).expect("record should succeed");
            }

            let doc = parse(&report.finalize().expect("finalize should succeed"));
            assert_eq!(
                doc["runs"][0]["originalUriBaseIds"],
                json!({
                    "ROOTPATH": { "uri": "file:///tmp/x/" },
                    "ROOTPATH2": { "uri": "file:///tmp/w/" }
                })
            );
            assert_eq!(
                doc["runs"][0]["results"][1]["locations"][0]["physicalLocation"]
                    ["artifactLocation"]["uri"],
                "z.py"
            );
        }

        #[test]
        fn failed_record_leaves_report_untouched() {
            let mut report = SarifReport::new(ToolInfo::default());
            report
                .record(&rooted("W1", "/repo/a.py", "/repo"))
                .expect("record should succeed");
            let before = report.finalize().expect("finalize should succeed");

            let err = report
                .record(&rooted("E9", "/other/z.py", "/repo"))
                .expect_err("out of root path should fail");
            assert!(matches!(err, ReporterError::PathResolution { .. }));
            assert_eq!(report.rules().len(), 1);
            assert_eq!(
                report.finalize().expect("finalize should succeed"),
                before
            );
        }
    }
}
