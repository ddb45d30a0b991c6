use crate::config::ValidatorConfig;
use crate::error::Result;
use crate::linter::{LinterOutput, LinterPort};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One diagnostic block: contiguous non-blank linter lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub lines: Vec<String>,
    pub severity: Severity,
}

impl Issue {
    /// Block text, lines joined with newlines
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Outcome of validating one path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub passed: bool,
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }
}

/// Split linter output into blocks separated by blank lines.
///
/// Trailing whitespace is stripped from each kept line.
pub fn group_issue_blocks(text: &str) -> Vec<Vec<String>> {
    let mut blocks = Vec::new();
    let mut block = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !block.is_empty() {
                blocks.push(std::mem::take(&mut block));
            }
        } else {
            block.push(line.trim_end().to_string());
        }
    }

    if !block.is_empty() {
        blocks.push(block);
    }
    blocks
}

/// Classify a block by substring match against known error code prefixes.
///
/// Anything without a known prefix is a warning.
pub fn classify_block(lines: &[String], error_prefixes: &[String]) -> Severity {
    let text = lines.join("\n");
    if error_prefixes.iter().any(|prefix| text.contains(prefix.as_str())) {
        Severity::Error
    } else {
        Severity::Warning
    }
}

/// Runs a linter and restructures its output into issues
pub struct StyleValidator<L> {
    linter: L,
    error_prefixes: Vec<String>,
}

impl<L: LinterPort> StyleValidator<L> {
    pub fn new(linter: L, config: &ValidatorConfig) -> Self {
        Self {
            linter,
            error_prefixes: config.error_prefixes.clone(),
        }
    }

    /// Validate a file or directory. Linter failures to start are errors;
    /// findings are not.
    pub fn validate(&self, path: impl AsRef<Path>) -> Result<ValidationReport> {
        let path = path.as_ref();
        let output = self.linter.run(path)?;
        let report = self.report(&output);

        if report.passed {
            log::info!("{} passed style validation", path.display());
        } else {
            log::info!(
                "{}: {} issues ({} errors)",
                path.display(),
                report.issues.len(),
                report.errors().count()
            );
        }
        Ok(report)
    }

    /// Build a report from raw linter output
    pub fn report(&self, output: &LinterOutput) -> ValidationReport {
        if output.success() {
            return ValidationReport {
                passed: true,
                issues: Vec::new(),
            };
        }

        let issues = group_issue_blocks(&output.diagnostic_text)
            .into_iter()
            .map(|lines| Issue {
                severity: classify_block(&lines, &self.error_prefixes),
                lines,
            })
            .collect();

        ValidationReport {
            passed: false,
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_grouping() {
        let text = "a.py:1 at module level:\n        D100: Missing docstring   \n\n\n\na.py:4 in public function `f`:\n        D401: First line should be in imperative mood\n";
        let blocks = group_issue_blocks(text);
        assert_eq!(
            blocks,
            vec![
                vec![
                    "a.py:1 at module level:".to_string(),
                    "        D100: Missing docstring".to_string()
                ],
                vec![
                    "a.py:4 in public function `f`:".to_string(),
                    "        D401: First line should be in imperative mood".to_string()
                ],
            ]
        );
    }

    #[test]
    fn test_grouping_edge_cases() {
        assert!(group_issue_blocks("").is_empty());
        assert!(group_issue_blocks("\n  \n\t\n").is_empty());
        assert_eq!(group_issue_blocks("only line"), vec![vec!["only line".to_string()]]);
    }

    #[test]
    fn test_classification() {
        let prefixes = vec!["D1".to_string()];
        let missing = vec!["x.py:1".to_string(), "D103: Missing docstring".to_string()];
        let mood = vec!["x.py:1".to_string(), "D401: First line".to_string()];
        let unknown = vec!["something odd happened".to_string()];

        assert_eq!(classify_block(&missing, &prefixes), Severity::Error);
        assert_eq!(classify_block(&mood, &prefixes), Severity::Warning);
        assert_eq!(classify_block(&unknown, &prefixes), Severity::Warning);
    }
}
