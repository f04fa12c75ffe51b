use crate::error::ReporterError;
use crate::report::ToolInfo;
use serde::Deserialize;
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReporterConfig {
    pub tool: Option<ToolConfig>,
    pub paths: Option<PathsConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolConfig {
    pub name: Option<String>,
    pub version: Option<String>,
    pub information_uri: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    pub root_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub tee: bool,
    pub path: Option<PathBuf>,
}

impl ReporterConfig {
    /// Driver identity with unset fields falling back to the defaults.
    pub fn tool_info(&self) -> ToolInfo {
        let defaults = ToolInfo::default();
        match &self.tool {
            Some(tool) => ToolInfo {
                name: tool.name.clone().unwrap_or(defaults.name),
                information_uri: tool
                    .information_uri
                    .clone()
                    .unwrap_or(defaults.information_uri),
                version: tool.version.clone().unwrap_or(defaults.version),
            },
            None => defaults,
        }
    }

    pub fn root_dir(&self) -> Option<&str> {
        self.paths
            .as_ref()
            .and_then(|paths| paths.root_dir.as_deref())
    }

    pub fn validate(&self) -> Result<(), ReporterError> {
        let Some(tool) = &self.tool else {
            return Ok(());
        };
        if tool.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(ReporterError::ConfigParse(
                "tool.name must not be empty".to_string(),
            ));
        }
        if tool.version.as_deref().is_some_and(|version| version.trim().is_empty()) {
            return Err(ReporterError::ConfigParse(
                "tool.version must not be empty".to_string(),
            ));
        }
        if let Some(uri) = &tool.information_uri {
            Url::parse(uri).map_err(|e| {
                ReporterError::ConfigParse(format!("tool.information_uri {uri}: {e}"))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> ReporterConfig {
        toml::from_str(content).expect("config should parse")
    }

    #[test]
    fn tool_info_overrides_only_set_fields() {
        let cfg = parse(
            r#"
[tool]
name = "ruff"
"#,
        );
        let tool = cfg.tool_info();
        assert_eq!(tool.name, "ruff");
        assert_eq!(tool.version, ToolInfo::default().version);
        assert_eq!(tool.information_uri, ToolInfo::default().information_uri);
    }

    #[test]
    fn root_dir_and_output_are_read() {
        let cfg = parse(
            r#"
[paths]
root_dir = "/repo"

[output]
tee = true
path = "report.sarif"
"#,
        );
        assert_eq!(cfg.root_dir(), Some("/repo"));
        let output = cfg.output.expect("output section should exist");
        assert!(output.tee);
        assert_eq!(output.path, Some(PathBuf::from("report.sarif")));
    }

    #[test]
    fn validate_rejects_bad_information_uri() {
        let cfg = parse(
            r#"
[tool]
information_uri = "not a uri"
"#,
        );
        assert!(matches!(cfg.validate(), Err(ReporterError::ConfigParse(_))));
    }

    #[test]
    fn validate_rejects_blank_tool_name() {
        let cfg = parse(
            r#"
[tool]
name = "  "
"#,
        );
        assert!(cfg.validate().is_err());
        assert!(ReporterConfig::default().validate().is_ok());
    }
}
