use crate::error::ContentError;
use docscope_extractor::Function;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Semantic text for one function's docstring.
///
/// Every field may be absent; the renderer substitutes placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentBundle {
    pub summary: Option<String>,

    /// Description per argument name
    pub args: IndexMap<String, String>,

    /// Description of the return value
    pub returns: Option<String>,

    /// Description per exception, in the order they should be listed
    pub raises: IndexMap<String, String>,
}

impl ContentBundle {
    /// Builder: set summary
    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Builder: describe an argument
    #[must_use]
    pub fn arg(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.args.insert(name.into(), description.into());
        self
    }

    /// Builder: describe the return value
    #[must_use]
    pub fn returns(mut self, description: impl Into<String>) -> Self {
        self.returns = Some(description.into());
        self
    }

    /// Builder: describe a raised exception
    #[must_use]
    pub fn raise(mut self, exception: impl Into<String>, description: impl Into<String>) -> Self {
        self.raises.insert(exception.into(), description.into());
        self
    }
}

/// Source of docstring content for a function (an LLM, a lookup table, ...)
pub trait ContentProvider {
    fn content_for(&self, function: &Function) -> Result<ContentBundle, ContentError>;
}

impl<F> ContentProvider for F
where
    F: Fn(&Function) -> Result<ContentBundle, ContentError>,
{
    fn content_for(&self, function: &Function) -> Result<ContentBundle, ContentError> {
        self(function)
    }
}

/// Provider that never has content; every field renders as a placeholder
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderProvider;

impl ContentProvider for PlaceholderProvider {
    fn content_for(&self, _function: &Function) -> Result<ContentBundle, ContentError> {
        Ok(ContentBundle::default())
    }
}

/// Fixed bundles keyed by function name
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    bundles: HashMap<String, ContentBundle>,
}

impl StaticProvider {
    #[must_use]
    pub fn new(bundles: HashMap<String, ContentBundle>) -> Self {
        Self { bundles }
    }

    /// Parse a JSON object mapping function names to bundles
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let bundles = serde_json::from_str(json).map_err(|e| ContentError::Malformed(e.to_string()))?;
        Ok(Self { bundles })
    }

    /// Builder: add a bundle
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, bundle: ContentBundle) -> Self {
        self.bundles.insert(name.into(), bundle);
        self
    }
}

impl ContentProvider for StaticProvider {
    fn content_for(&self, function: &Function) -> Result<ContentBundle, ContentError> {
        Ok(self.bundles.get(&function.name).cloned().unwrap_or_default())
    }
}
