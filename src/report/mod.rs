pub mod sarif;
pub mod sink;

use crate::error::Result;
use crate::types::violation::Violation;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use sink::OutputSink;
use std::io;

pub const DEFAULT_TOOL_NAME: &str = "flake8";
pub const DEFAULT_TOOL_URI: &str = "https://flake8.pycqa.org/";
pub const DEFAULT_TOOL_VERSION: &str = "4.0.1";

/// Identity of the lint engine written into `tool.driver`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: String,
    pub information_uri: String,
    pub version: String,
}

impl Default for ToolInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_TOOL_NAME.to_string(),
            information_uri: DEFAULT_TOOL_URI.to_string(),
            version: DEFAULT_TOOL_VERSION.to_string(),
        }
    }
}

/// What a lint host expects from a report formatter: one call per
/// violation, then a single call once the run is over.
pub trait Formatter {
    fn handle(&mut self, violation: &Violation) -> Result<()>;
    fn finish(&mut self, sink: &mut OutputSink) -> Result<()>;
}

/// Serializes `document` as JSON indented with four spaces.
pub fn render_document<T: Serialize>(document: &T) -> Result<String> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    document.serialize(&mut serializer)?;
    let rendered =
        String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(rendered)
}
