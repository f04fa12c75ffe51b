//! Accumulates lint violations and renders them as a SARIF 2.1.0 log.
//!
//! - `types::violation`: violation records and path resolution.
//! - `types::sarif`: serde model of the emitted document.
//! - `report`: the accumulating formatter and its output sink.
//! - `input`: readers for the lint host's output formats.
//! - `config`: layered TOML configuration.
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod report;
pub mod types;

pub use error::{ReporterError, Result};
pub use report::sarif::SarifReport;
pub use report::sink::OutputSink;
pub use report::{Formatter, ToolInfo};
pub use types::violation::{RuleLevel, Violation};
