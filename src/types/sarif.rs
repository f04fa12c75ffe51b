//! Serde model of the subset of SARIF 2.1.0 this crate emits.
//!
//! Field declaration order is the output order.

use crate::types::violation::{RuleLevel, Violation};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub const SARIF_SCHEMA: &str =
    "https://schemastore.azurewebsites.net/schemas/json/sarif-2.1.0-rtm.5.json";
pub const SARIF_VERSION: &str = "2.1.0";
pub const COLUMN_KIND: &str = "utf16CodeUnits";

#[derive(Debug, Serialize)]
pub struct SarifLog<'a> {
    #[serde(rename = "$schema")]
    pub schema: &'static str,
    pub version: &'static str,
    pub runs: Vec<Run<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Run<'a> {
    pub tool: Tool<'a>,
    pub results: &'a [SarifResult],
    pub column_kind: &'static str,
    pub original_uri_base_ids: &'a OriginalUriBaseIds,
}

#[derive(Debug, Serialize)]
pub struct Tool<'a> {
    pub driver: Driver<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver<'a> {
    pub name: &'a str,
    pub information_uri: &'a str,
    pub version: &'a str,
    pub rules: &'a [ReportingDescriptor],
}

/// A rule entry. Warning is the implicit default level, so the
/// configuration block is only written for other levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingDescriptor {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_configuration: Option<ReportingConfiguration>,
}

impl ReportingDescriptor {
    pub fn new(id: impl Into<String>, level: RuleLevel) -> Self {
        let default_configuration = match level {
            RuleLevel::Warning => None,
            level => Some(ReportingConfiguration { level }),
        };
        Self {
            id: id.into(),
            default_configuration,
        }
    }

    pub fn level(&self) -> RuleLevel {
        self.default_configuration
            .as_ref()
            .map(|config| config.level)
            .unwrap_or(RuleLevel::Warning)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportingConfiguration {
    pub level: RuleLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    pub rule_id: String,
    pub rule_index: usize,
    pub message: Message,
    pub locations: Vec<Location>,
}

impl SarifResult {
    pub fn new(
        violation: &Violation,
        rule_index: usize,
        uri: String,
        uri_base_id: String,
    ) -> Self {
        let (start_line, start_column) = violation.start();
        let (end_line, end_column) = violation.end();
        Self {
            rule_id: violation.rule_id().to_string(),
            rule_index,
            message: Message {
                text: violation.message().to_string(),
            },
            locations: vec![Location {
                physical_location: PhysicalLocation {
                    artifact_location: ArtifactLocation { uri, uri_base_id },
                    region: Region {
                        start_line,
                        start_column,
                        end_line,
                        end_column,
                        snippet: ArtifactContent {
                            text: violation.code_snippet().to_string(),
                        },
                    },
                },
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub physical_location: PhysicalLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalLocation {
    pub artifact_location: ArtifactLocation,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactLocation {
    pub uri: String,
    pub uri_base_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub snippet: ArtifactContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactContent {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseUri {
    pub uri: String,
}

/// Symbolic root name to base uri, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginalUriBaseIds {
    entries: Vec<(String, BaseUri)>,
}

impl OriginalUriBaseIds {
    pub fn key_for(&self, uri: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, base)| base.uri == uri)
            .map(|(key, _)| key.as_str())
    }

    pub fn insert(&mut self, key: String, uri: String) {
        self.entries.push((key, BaseUri { uri }));
    }

    pub fn get(&self, key: &str) -> Option<&BaseUri> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, base)| base)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BaseUri)> {
        self.entries.iter().map(|(key, base)| (key.as_str(), base))
    }
}

impl Serialize for OriginalUriBaseIds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, base) in &self.entries {
            map.serialize_entry(key, base)?;
        }
        map.end()
    }
}
