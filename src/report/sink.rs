use crate::error::Result;
use std::io::{self, Write};

/// Destination for the finished document.
///
/// Output goes to the target writer when one is set, and to the console
/// when there is no target or `tee` is enabled.
pub struct OutputSink {
    target: Option<Box<dyn Write>>,
    console: Box<dyn Write>,
    tee: bool,
}

impl OutputSink {
    pub fn stdout() -> Self {
        Self {
            target: None,
            console: Box::new(io::stdout()),
            tee: false,
        }
    }

    pub fn to_writer(target: impl Write + 'static, tee: bool) -> Self {
        Self {
            target: Some(Box::new(target)),
            console: Box::new(io::stdout()),
            tee,
        }
    }

    pub fn with_console(mut self, console: impl Write + 'static) -> Self {
        self.console = Box::new(console);
        self
    }

    /// Writes `document` verbatim, without a trailing newline.
    pub fn write_document(&mut self, document: &str) -> Result<()> {
        if let Some(target) = self.target.as_mut() {
            target.write_all(document.as_bytes())?;
            target.flush()?;
        }
        if self.target.is_none() || self.tee {
            self.console.write_all(document.as_bytes())?;
            self.console.flush()?;
        }
        Ok(())
    }
}
