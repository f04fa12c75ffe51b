use crate::error::{ReporterError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Error,
    Warning,
}

impl RuleLevel {
    /// Codes starting with `E` are errors, everything else is a warning.
    pub fn from_rule_id(rule_id: &str) -> Self {
        if rule_id.starts_with('E') {
            Self::Error
        } else {
            Self::Warning
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// One observation reported by the lint host.
///
/// Derived values (relative path, base directory uri) are computed on every
/// call from `file_path` and `root_dir_path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    rule_id: String,
    rule_level: RuleLevel,
    message: String,
    file_path: String,
    root_dir_path: Option<String>,
    start_line: u32,
    start_column: u32,
    end_line: u32,
    end_column: u32,
    code_snippet: String,
}

impl Violation {
    /// Builds a point violation: the end position equals the start position.
    pub fn new(
        rule_id: impl Into<String>,
        message: impl Into<String>,
        file_path: impl Into<String>,
        line: u32,
        column: u32,
        code_snippet: impl Into<String>,
    ) -> Result<Self> {
        let rule_id = rule_id.into();
        if rule_id.trim().is_empty() {
            return Err(ReporterError::MalformedViolation(
                "rule id must not be empty".to_string(),
            ));
        }
        check_position(&rule_id, line, column)?;

        Ok(Self {
            rule_level: RuleLevel::from_rule_id(&rule_id),
            rule_id,
            message: message.into(),
            file_path: file_path.into(),
            root_dir_path: None,
            start_line: line,
            start_column: column,
            end_line: line,
            end_column: column,
            code_snippet: code_snippet.into(),
        })
    }

    pub fn with_root_dir(mut self, root_dir_path: impl Into<String>) -> Self {
        self.root_dir_path = Some(root_dir_path.into());
        self
    }

    pub fn with_end(mut self, line: u32, column: u32) -> Result<Self> {
        check_position(&self.rule_id, line, column)?;
        self.end_line = line;
        self.end_column = column;
        Ok(self)
    }

    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    pub fn rule_level(&self) -> RuleLevel {
        self.rule_level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn root_dir_path(&self) -> Option<&str> {
        self.root_dir_path.as_deref()
    }

    pub fn start(&self) -> (u32, u32) {
        (self.start_line, self.start_column)
    }

    pub fn end(&self) -> (u32, u32) {
        (self.end_line, self.end_column)
    }

    pub fn code_snippet(&self) -> &str {
        &self.code_snippet
    }

    /// Path of the file as a forward-slash uri relative to the root.
    ///
    /// Without a root, absolute paths collapse to their file name and
    /// relative paths pass through. With a root, the file must live under it.
    pub fn relative_path(&self) -> Result<String> {
        let file = PathBuf::from(unify_separators(&self.file_path));
        let path = match &self.root_dir_path {
            None if file.is_absolute() => file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            None => self.file_path.clone(),
            Some(root) => {
                let absolute = absolutize(&file)?;
                let root_abs = absolutize(Path::new(&unify_separators(root)))?;
                absolute
                    .strip_prefix(&root_abs)
                    .map_err(|_| ReporterError::PathResolution {
                        path: absolute.display().to_string(),
                        root: root_abs.display().to_string(),
                    })?
                    .to_string_lossy()
                    .into_owned()
            }
        };

        let path = unify_separators(&path);
        let mut trimmed = path.as_str();
        while let Some(rest) = trimmed.strip_prefix("./") {
            trimmed = rest.trim_start_matches('/');
        }
        Ok(trimmed.to_string())
    }

    /// `file://` uri of the directory the relative path is anchored to,
    /// always ending in `/`.
    pub fn base_dir_uri(&self) -> Result<String> {
        let dir = match &self.root_dir_path {
            Some(root) => absolutize(Path::new(&unify_separators(root)))?,
            None => {
                let file = PathBuf::from(unify_separators(&self.file_path));
                if file.is_absolute() {
                    lexical_normalize(file.parent().unwrap_or(file.as_path()))
                } else {
                    std::env::current_dir()?
                }
            }
        };
        directory_uri(&dir)
    }
}

fn check_position(rule_id: &str, line: u32, column: u32) -> Result<()> {
    if line == 0 || column == 0 {
        return Err(ReporterError::MalformedViolation(format!(
            "{rule_id}: line and column are 1-based, got {line}:{column}"
        )));
    }
    Ok(())
}

fn unify_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Lexical equivalent of an absolute path; symlinks are not resolved.
fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(lexical_normalize(path));
    }
    let cwd = std::env::current_dir()?;
    Ok(lexical_normalize(&cwd.join(path)))
}

fn lexical_normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn directory_uri(dir: &Path) -> Result<String> {
    Url::from_directory_path(dir)
        .map(|uri| uri.to_string())
        .map_err(|()| ReporterError::InvalidUri(dir.display().to_string()))
}
