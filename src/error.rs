use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReporterError {
    #[error("path {path} is not under root directory {root}")]
    PathResolution { path: String, root: String },

    #[error("malformed violation: {0}")]
    MalformedViolation(String),

    #[error("cannot build file uri for directory: {0}")]
    InvalidUri(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReporterError>;
