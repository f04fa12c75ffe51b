//! Readers that turn a lint host's output into [`Violation`] records.

use crate::error::{ReporterError, Result};
use crate::types::violation::Violation;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::BufRead;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// One JSON object per line carrying the host's violation fields.
    JsonLines,
    /// `path:line:col: CODE message`, the host's default text output.
    Text,
}

#[derive(Debug, Deserialize)]
struct HostViolation {
    code: String,
    text: String,
    filename: String,
    line_number: u32,
    column_number: u32,
    #[serde(default)]
    physical_line: Option<String>,
}

pub fn read_violations(
    reader: impl BufRead,
    format: InputFormat,
    root_dir: Option<&str>,
) -> Result<Vec<Violation>> {
    let mut sources = SourceCache::default();
    let mut violations = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_no = index + 1;
        let violation = match format {
            InputFormat::JsonLines => parse_json_line(&line),
            InputFormat::Text => parse_text_line(&line, &mut sources),
        }
        .map_err(|e| ReporterError::MalformedViolation(format!("input line {line_no}: {e}")))?;

        violations.push(match root_dir {
            Some(root) => violation.with_root_dir(root),
            None => violation,
        });
    }

    debug!(count = violations.len(), ?format, "read violations");
    Ok(violations)
}

fn parse_json_line(line: &str) -> std::result::Result<Violation, String> {
    let host: HostViolation = serde_json::from_str(line).map_err(|e| e.to_string())?;
    Violation::new(
        host.code,
        host.text,
        host.filename,
        host.line_number,
        host.column_number,
        host.physical_line.unwrap_or_default(),
    )
    .map_err(|e| e.to_string())
}

fn parse_text_line(
    line: &str,
    sources: &mut SourceCache,
) -> std::result::Result<Violation, String> {
    let (path, row, col, rest) =
        split_location(line).ok_or_else(|| "expected `path:line:col: CODE message`".to_string())?;
    let (code, message) = rest.split_once(' ').unwrap_or((rest, ""));
    let snippet = sources.line(path, row).unwrap_or_default();
    Violation::new(code, message, path, row, col, snippet).map_err(|e| e.to_string())
}

/// Finds the first `:<line>:<col>: ` marker; anything before it is the path,
/// which may itself contain colons.
fn split_location(line: &str) -> Option<(&str, u32, u32, &str)> {
    for (idx, _) in line.match_indices(':') {
        let Some((row, rest)) = line[idx + 1..].split_once(':') else {
            continue;
        };
        let Some((col, rest)) = rest.split_once(':') else {
            continue;
        };
        if !rest.starts_with(' ') {
            continue;
        }
        if let (Ok(row), Ok(col)) = (row.parse(), col.parse()) {
            return Some((&line[..idx], row, col, rest.trim_start()));
        }
    }
    None
}

/// Source lines of files referenced by text input, read at most once.
#[derive(Default)]
struct SourceCache {
    files: HashMap<String, Option<Vec<String>>>,
}

impl SourceCache {
    fn line(&mut self, path: &str, line_number: u32) -> Option<String> {
        let lines = self.files.entry(path.to_string()).or_insert_with(|| {
            std::fs::read_to_string(path)
                .ok()
                .map(|content| content.split_inclusive('\n').map(str::to_string).collect())
        });
        let index = usize::try_from(line_number).ok()?.checked_sub(1)?;
        lines.as_ref()?.get(index).cloned()
    }
}
