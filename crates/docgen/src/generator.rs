use crate::content::{ContentBundle, ContentProvider};
use crate::render::{render_docstring, RenderedDocstring};
use crate::style::DocstringStyle;
use docscope_extractor::{Function, SourceUnit};
use serde::{Deserialize, Serialize};

/// Configuration for docstring generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Dialect of generated docstrings
    pub style: DocstringStyle,

    /// Only suggest docstrings for functions that lack one
    pub skip_documented: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            style: DocstringStyle::Google,
            skip_documented: true,
        }
    }
}

impl GeneratorConfig {
    /// Builder: set style
    #[must_use]
    pub fn with_style(mut self, style: DocstringStyle) -> Self {
        self.style = style;
        self
    }

    /// Builder: also regenerate documented functions
    #[must_use]
    pub fn include_documented(mut self) -> Self {
        self.skip_documented = false;
        self
    }
}

/// A docstring ready to be inserted into a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// `name` or `Class.name`
    pub function: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    /// Line after which the docstring goes
    pub body_line: usize,

    /// Column the docstring is indented to
    pub indent: usize,

    pub docstring: RenderedDocstring,
}

/// Renders docstrings from provider content
pub struct DocstringGenerator<P> {
    provider: P,
    config: GeneratorConfig,
}

impl<P: ContentProvider> DocstringGenerator<P> {
    pub const fn new(provider: P, config: GeneratorConfig) -> Self {
        Self { provider, config }
    }

    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Render a docstring for one function.
    ///
    /// A failing provider degrades to placeholders.
    pub fn generate(&self, function: &Function) -> RenderedDocstring {
        let content = self.provider.content_for(function).unwrap_or_else(|e| {
            log::warn!("No content for `{}`, using placeholders: {e}", function.name);
            ContentBundle::default()
        });
        render_docstring(function, &content, self.config.style)
    }

    /// Suggestions for every function and method of a unit, in source order.
    ///
    /// Functions whose body shares the `def` line are skipped: there is no
    /// line to put the docstring on.
    pub fn suggestions(&self, unit: &SourceUnit) -> Vec<Suggestion> {
        let suggestions: Vec<Suggestion> = unit
            .all_functions()
            .filter(|(_, function)| !(self.config.skip_documented && function.has_docstring))
            .filter(|(_, function)| {
                if function.inline_body {
                    log::warn!(
                        "Skipping `{}` in {}: body on line {} follows the signature",
                        function.name,
                        unit.path,
                        function.body_line
                    );
                }
                !function.inline_body
            })
            .map(|(class, function)| {
                let class = class.map(|c| c.name.clone());
                Suggestion {
                    function: match &class {
                        Some(class) => format!("{class}.{}", function.name),
                        None => function.name.clone(),
                    },
                    class,
                    body_line: function.body_line,
                    indent: function.indent,
                    docstring: self.generate(function),
                }
            })
            .collect();

        log::debug!("{} docstring suggestions for {}", suggestions.len(), unit.path);
        suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::StaticProvider;
    use crate::error::ContentError;
    use docscope_extractor::extract_source;

    const SOURCE: &str = r#"
def top(a):
    return a

class Box:
    def open(self):
        """Open it."""

    def close(self, force=False):
        pass
"#;

    #[test]
    fn test_suggestions_skip_documented() {
        let unit = extract_source(SOURCE, "box.py").unwrap();
        let generator = DocstringGenerator::new(StaticProvider::default(), GeneratorConfig::default());
        let suggestions = generator.suggestions(&unit);

        let names: Vec<&str> = suggestions.iter().map(|s| s.function.as_str()).collect();
        assert_eq!(names, vec!["top", "Box.close"]);
        assert_eq!(suggestions[0].body_line, 2);
        assert_eq!(suggestions[0].indent, 4);
        assert_eq!(suggestions[1].class.as_deref(), Some("Box"));
        assert_eq!(suggestions[1].indent, 8);
    }

    #[test]
    fn test_inline_bodies_are_skipped() {
        let unit = extract_source("def stub(): pass\n\ndef real(x):\n    return x\n", "stubs.py").unwrap();
        let generator = DocstringGenerator::new(StaticProvider::default(), GeneratorConfig::default());
        let names: Vec<String> = generator.suggestions(&unit).into_iter().map(|s| s.function).collect();
        assert_eq!(names, vec!["real"]);
    }

    #[test]
    fn test_include_documented() {
        let unit = extract_source(SOURCE, "box.py").unwrap();
        let config = GeneratorConfig::default().include_documented();
        let generator = DocstringGenerator::new(StaticProvider::default(), config);
        assert_eq!(generator.suggestions(&unit).len(), 3);
    }

    #[test]
    fn test_provider_content_is_used() {
        let unit = extract_source(SOURCE, "box.py").unwrap();
        let provider = StaticProvider::default()
            .with("top", ContentBundle::default().summary("Return a.").arg("a", "Anything."));
        let config = GeneratorConfig::default().with_style(DocstringStyle::Rest);
        let doc = DocstringGenerator::new(provider, config).generate(&unit.functions[0]);

        assert_eq!(doc.style, DocstringStyle::Rest);
        assert!(doc.text.contains("Return a."));
        assert!(doc.text.contains(":param a: Anything."));
    }

    #[test]
    fn test_failing_provider_falls_back_to_placeholders() {
        let unit = extract_source(SOURCE, "box.py").unwrap();
        let failing = |_: &Function| -> Result<ContentBundle, ContentError> {
            Err(ContentError::Unavailable("offline".into()))
        };
        let doc = DocstringGenerator::new(failing, GeneratorConfig::default()).generate(&unit.functions[0]);

        assert!(doc.text.contains("Short description of `top`."));
        assert!(doc.text.contains("a (TYPE): DESCRIPTION"));
    }

    #[test]
    fn test_config_style_by_name() {
        let config: GeneratorConfig = serde_json::from_str(r#"{"style": "numpy"}"#).unwrap();
        assert_eq!(config.style, DocstringStyle::Numpy);
        assert!(config.skip_documented);
    }
}
