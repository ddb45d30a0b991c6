use crate::config::ValidatorConfig;
use crate::error::{Result, ValidatorError};
use std::path::Path;
use std::process::Command;

/// Raw result of one linter run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinterOutput {
    /// Process exit code; `None` when terminated by a signal
    pub exit_status: Option<i32>,

    /// Diagnostic stream as text
    pub diagnostic_text: String,
}

impl LinterOutput {
    pub fn new(exit_status: Option<i32>, diagnostic_text: impl Into<String>) -> Self {
        Self {
            exit_status,
            diagnostic_text: diagnostic_text.into(),
        }
    }

    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_status == Some(0)
    }
}

/// An external style linter
pub trait LinterPort {
    fn run(&self, path: &Path) -> Result<LinterOutput>;
}

/// Runs pydocstyle (or a compatible module) through the Python interpreter
#[derive(Debug, Clone)]
pub struct PydocstyleLinter {
    config: ValidatorConfig,
}

impl PydocstyleLinter {
    pub fn new(config: ValidatorConfig) -> Result<Self> {
        config.validate().map_err(ValidatorError::InvalidConfig)?;
        Ok(Self { config })
    }

    fn command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.config.interpreter);
        cmd.arg("-m")
            .arg(&self.config.module)
            .args(&self.config.args)
            .arg(path);
        cmd
    }
}

impl LinterPort for PydocstyleLinter {
    fn run(&self, path: &Path) -> Result<LinterOutput> {
        log::debug!(
            "Running {} -m {} on {}",
            self.config.interpreter,
            self.config.module,
            path.display()
        );

        let output = self
            .command(path)
            .output()
            .map_err(|e| ValidatorError::spawn(&self.config.interpreter, e))?;

        // pydocstyle reports on stderr; fall back to stdout for other linters
        let stream = if output.stderr.iter().any(|b| !b.is_ascii_whitespace()) {
            &output.stderr
        } else {
            &output.stdout
        };

        Ok(LinterOutput {
            exit_status: output.status.code(),
            diagnostic_text: String::from_utf8_lossy(stream).into_owned(),
        })
    }
}
