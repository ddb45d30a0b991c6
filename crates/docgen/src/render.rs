use crate::content::ContentBundle;
use crate::error::Result;
use crate::style::DocstringStyle;
use docscope_extractor::Function;
use serde::{Deserialize, Serialize};

/// Stand-in for a missing type annotation
pub const TYPE_PLACEHOLDER: &str = "TYPE";

/// Stand-in for missing descriptive text
pub const DESCRIPTION_PLACEHOLDER: &str = "DESCRIPTION";

const DELIMITER: &str = "\"\"\"";
const SECTION_INDENT: &str = "    ";

/// A formatted docstring, delimiters included
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedDocstring {
    pub style: DocstringStyle,
    pub text: String,
}

impl RenderedDocstring {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

/// Render a docstring for a style token (`google`, `numpy`, `rest`)
pub fn render(function: &Function, content: &ContentBundle, style: &str) -> Result<RenderedDocstring> {
    Ok(render_docstring(function, content, style.parse()?))
}

/// Render a docstring in the given dialect.
///
/// Missing content never fails rendering: absent types become [`TYPE_PLACEHOLDER`],
/// absent descriptions [`DESCRIPTION_PLACEHOLDER`]. The return section appears only
/// when the function has a return annotation; the raises section lists the
/// exceptions described in `content`, not those detected in the body.
#[must_use]
pub fn render_docstring(
    function: &Function,
    content: &ContentBundle,
    style: DocstringStyle,
) -> RenderedDocstring {
    let sections = Sections::new(function, content, style);
    let body = match style {
        DocstringStyle::Google => sections.google(),
        DocstringStyle::Numpy => sections.numpy(),
        DocstringStyle::Rest => sections.rest(),
    };

    RenderedDocstring {
        style,
        text: format!("{DELIMITER}\n{}\n{DELIMITER}", escape_delimiter(&body)),
    }
}

/// Resolved text for every field, placeholders already substituted
struct Sections<'a> {
    summary: String,
    args: Vec<(&'a str, &'a str, &'a str)>,
    returns: Option<(&'a str, &'a str)>,
    raises: Vec<(&'a str, &'a str)>,
}

impl<'a> Sections<'a> {
    fn new(function: &'a Function, content: &'a ContentBundle, style: DocstringStyle) -> Self {
        let summary = match non_blank(content.summary.as_deref()) {
            Some(summary) => summary.trim().to_string(),
            None if style == DocstringStyle::Google => {
                format!("Short description of `{}`.", function.name)
            }
            None => format!("{} function.", function.name),
        };

        let args = function
            .arguments
            .iter()
            .map(|arg| {
                (
                    arg.name.as_str(),
                    non_blank(arg.annotation.as_deref()).unwrap_or(TYPE_PLACEHOLDER),
                    described(content.args.get(&arg.name).map(String::as_str)),
                )
            })
            .collect();

        let returns = non_blank(function.returns.as_deref())
            .map(|ty| (ty, described(content.returns.as_deref())));

        let raises = content
            .raises
            .iter()
            .map(|(exc, desc)| (exc.as_str(), described(Some(desc.as_str()))))
            .collect();

        Self {
            summary,
            args,
            returns,
            raises,
        }
    }

    fn google(&self) -> String {
        let mut lines = vec![self.summary.clone(), String::new()];

        if !self.args.is_empty() {
            lines.push("Args:".to_string());
            for (name, ty, desc) in &self.args {
                lines.push(continued(&format!("{SECTION_INDENT}{name} ({ty}): {desc}"), 2));
            }
            lines.push(String::new());
        }

        if let Some((ty, desc)) = self.returns {
            lines.push("Returns:".to_string());
            lines.push(continued(&format!("{SECTION_INDENT}{ty}: {desc}"), 2));
            lines.push(String::new());
        }

        if !self.raises.is_empty() {
            lines.push("Raises:".to_string());
            for (exc, desc) in &self.raises {
                lines.push(continued(&format!("{SECTION_INDENT}{exc}: {desc}"), 2));
            }
            lines.push(String::new());
        }

        join_trimmed(&lines)
    }

    fn numpy(&self) -> String {
        let mut lines = vec![
            self.summary.clone(),
            String::new(),
            "Parameters".to_string(),
            "----------".to_string(),
        ];

        for (name, ty, desc) in &self.args {
            lines.push(format!("{name} : {ty}"));
            lines.push(continued(&format!("{SECTION_INDENT}{desc}"), 1));
        }

        if let Some((ty, desc)) = self.returns {
            lines.push(String::new());
            lines.push("Returns".to_string());
            lines.push("-------".to_string());
            lines.push(ty.to_string());
            lines.push(continued(&format!("{SECTION_INDENT}{desc}"), 1));
        }

        if !self.raises.is_empty() {
            lines.push(String::new());
            lines.push("Raises".to_string());
            lines.push("------".to_string());
            for (exc, desc) in &self.raises {
                lines.push((*exc).to_string());
                lines.push(continued(&format!("{SECTION_INDENT}{desc}"), 1));
            }
        }

        join_trimmed(&lines)
    }

    fn rest(&self) -> String {
        let mut lines = vec![self.summary.clone(), String::new()];

        for (name, ty, desc) in &self.args {
            lines.push(continued(&format!(":param {name}: {desc}"), 1));
            lines.push(format!(":type {name}: {ty}"));
        }

        if let Some((ty, desc)) = self.returns {
            lines.push(continued(&format!(":return: {desc}"), 1));
            lines.push(format!(":rtype: {ty}"));
        }

        for (exc, desc) in &self.raises {
            lines.push(continued(&format!(":raises {exc}: {desc}"), 1));
        }

        join_trimmed(&lines)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn described(value: Option<&str>) -> &str {
    non_blank(value).map_or(DESCRIPTION_PLACEHOLDER, str::trim)
}

/// Indent continuation lines of a multi-line entry by `depth` units
fn continued(entry: &str, depth: usize) -> String {
    let indent = SECTION_INDENT.repeat(depth);
    entry
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 || line.trim().is_empty() {
                line.trim_end().to_string()
            } else {
                format!("{indent}{}", line.trim())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn join_trimmed(lines: &[String]) -> String {
    lines.join("\n").trim_end().to_string()
}

fn escape_delimiter(body: &str) -> String {
    body.replace(DELIMITER, "\\\"\\\"\\\"")
}
