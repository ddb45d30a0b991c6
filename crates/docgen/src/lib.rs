//! # Docscope Docgen
//!
//! Docstring rendering and insertion for extracted Python functions.
//!
//! ## Flow
//!
//! ```text
//! Function (from docscope-extractor)
//!     │
//!     ├──> ContentProvider → ContentBundle (summary, args, returns, raises)
//!     │      └─> failure → placeholders
//!     │
//!     ├──> Renderer (google | numpy | rest) → RenderedDocstring
//!     │
//!     └──> Patch Applier → docstring inserted after the signature
//! ```
//!
//! ## Example
//!
//! ```rust
//! use docscope_docgen::{render_docstring, ContentBundle, DocstringStyle};
//! use docscope_extractor::extract_source;
//!
//! let unit = extract_source("def f(x, y=2):\n    pass\n", "m.py").unwrap();
//! let doc = render_docstring(&unit.functions[0], &ContentBundle::default(), DocstringStyle::Google);
//!
//! assert!(doc.text.contains("Args:\n    x (TYPE): DESCRIPTION"));
//! assert!(!doc.text.contains("Returns:"));
//! ```

mod content;
mod error;
mod generator;
mod patch;
mod render;
mod style;

pub use content::{ContentBundle, ContentProvider, PlaceholderProvider, StaticProvider};
pub use error::{ContentError, DocgenError, Result};
pub use generator::{DocstringGenerator, GeneratorConfig, Suggestion};
pub use patch::{apply_docstring, apply_suggestions, insert_docstring};
pub use render::{
    render, render_docstring, RenderedDocstring, DESCRIPTION_PLACEHOLDER, TYPE_PLACEHOLDER,
};
pub use style::DocstringStyle;
