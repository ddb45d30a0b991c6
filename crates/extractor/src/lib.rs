//! # Docscope Extractor
//!
//! Syntax-tree extraction of documentation metadata from Python sources.
//!
//! ## Pipeline
//!
//! ```text
//! Path
//!     │
//!     ├──> File Scanner (skip dirs, reserved prefixes)
//!     │      └─> Source files
//!     │
//!     ├──> Tree-sitter Parsing → syntax tree (invalid syntax → ParseError)
//!     │
//!     └──> Typed visitor passes
//!            ├─> Functions, classes, methods, imports
//!            ├─> Docstring presence
//!            └─> Complexity, nesting, raises, yields
//!                  └─> SourceUnit
//! ```
//!
//! ## Example
//!
//! ```rust
//! use docscope_extractor::extract_source;
//!
//! let code = r#"
//! def scale(value: float, factor=2):
//!     if value < 0:
//!         raise ValueError("negative")
//!     return value * factor
//! "#;
//!
//! let unit = extract_source(code, "example.py").unwrap();
//! let scale = &unit.functions[0];
//! assert_eq!(scale.arguments.len(), 2);
//! assert!(!scale.has_docstring);
//! assert_eq!(scale.raises, vec!["ValueError(\"negative\")".to_string()]);
//! ```

mod config;
mod error;
mod extractor;
mod metrics;
mod model;
mod scanner;
pub mod syntax;

pub use config::ExtractorConfig;
pub use error::{ExtractError, Result};
pub use extractor::{extract_path, extract_source, Extractor};
pub use metrics::BodyMetrics;
pub use model::{Argument, ArgumentKind, Class, Function, SourceUnit};
pub use scanner::FileScanner;
