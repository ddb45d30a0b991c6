//! # Docscope Validator
//!
//! Thin wrapper around an external docstring linter (pydocstyle by default).
//! The linter's diagnostic stream is split into blank-line separated blocks,
//! each classified as an error or a warning by its code prefix.
//!
//! ```rust
//! use docscope_validator::{LinterOutput, Severity, StyleValidator, ValidatorConfig};
//! # use docscope_validator::{LinterPort, Result};
//! # use std::path::Path;
//! # struct Canned;
//! # impl LinterPort for Canned {
//! #     fn run(&self, _: &Path) -> Result<LinterOutput> { unreachable!() }
//! # }
//!
//! let validator = StyleValidator::new(Canned, &ValidatorConfig::default());
//! let output = LinterOutput::new(Some(1), "m.py:1 in public function `f`:\n    D103: Missing docstring\n");
//! let report = validator.report(&output);
//!
//! assert!(!report.passed);
//! assert_eq!(report.issues[0].severity, Severity::Error);
//! ```

mod config;
mod error;
mod linter;
mod validator;

pub use config::ValidatorConfig;
pub use error::{Result, ValidatorError};
pub use linter::{LinterOutput, LinterPort, PydocstyleLinter};
pub use validator::{
    classify_block, group_issue_blocks, Issue, Severity, StyleValidator, ValidationReport,
};
