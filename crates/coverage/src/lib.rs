//! # Docscope Coverage
//!
//! Docstring coverage over extracted source units.
//!
//! Every function, class and method is one documentable item; a class counts
//! once however many methods it has. Coverage of an empty set is 100%.
//!
//! ```rust
//! use docscope_coverage::compute_coverage;
//! use docscope_extractor::extract_source;
//!
//! let unit = extract_source("def f():\n    \"\"\"Doc.\"\"\"\n\ndef g():\n    pass\n", "m.py").unwrap();
//! let report = compute_coverage(&[unit]);
//! assert_eq!(report.summary.total_items, 2);
//! assert_eq!(report.summary.coverage_percent, 50.0);
//! ```

mod error;
mod persist;
mod report;

pub use error::{CoverageError, Result};
pub use persist::{read_report, write_report};
pub use report::{
    compute_coverage, coverage_percent, CoverageItem, CoverageReport, CoverageSummary,
    FileCoverage, ItemKind,
};
