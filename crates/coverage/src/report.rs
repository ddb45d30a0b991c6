use docscope_extractor::SourceUnit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Documentation coverage of a set of source units
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CoverageReport {
    /// Per-file coverage keyed by source path
    pub files: BTreeMap<String, FileCoverage>,

    /// Totals over every file
    pub summary: CoverageSummary,
}

/// Coverage of one source unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileCoverage {
    pub total_items: usize,
    pub doc_count: usize,
    pub coverage_percent: f64,
    pub items: Vec<CoverageItem>,
}

/// Aggregate coverage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverageSummary {
    pub total_items: usize,
    pub total_docs: usize,
    pub coverage_percent: f64,
}

impl Default for CoverageSummary {
    fn default() -> Self {
        Self {
            total_items: 0,
            total_docs: 0,
            coverage_percent: coverage_percent(0, 0),
        }
    }
}

/// One documentable item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoverageItem {
    #[serde(rename = "type")]
    pub kind: ItemKind,

    /// Owning class, for methods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    pub name: String,

    #[serde(rename = "lineno")]
    pub line: usize,

    pub has_doc: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Function,
    Class,
    Method,
}

impl ItemKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::Method => "method",
        }
    }
}

/// Percentage of documented items, rounded to 2 decimals.
///
/// Rounds half away from zero. An empty set is fully covered (100.0).
#[must_use]
pub fn coverage_percent(documented: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    let percent = documented as f64 / total as f64 * 100.0;
    (percent * 100.0).round() / 100.0
}

impl FileCoverage {
    /// Coverage of one unit: one item per function, class and method
    #[must_use]
    pub fn from_unit(unit: &SourceUnit) -> Self {
        let mut items = Vec::with_capacity(unit.item_count());

        for function in &unit.functions {
            items.push(CoverageItem {
                kind: ItemKind::Function,
                class: None,
                name: function.name.clone(),
                line: function.line,
                has_doc: function.has_docstring,
            });
        }

        for class in &unit.classes {
            items.push(CoverageItem {
                kind: ItemKind::Class,
                class: None,
                name: class.name.clone(),
                line: class.line,
                has_doc: class.has_docstring,
            });
            for method in &class.methods {
                items.push(CoverageItem {
                    kind: ItemKind::Method,
                    class: Some(class.name.clone()),
                    name: method.name.clone(),
                    line: method.line,
                    has_doc: method.has_docstring,
                });
            }
        }

        let total_items = items.len();
        let doc_count = items.iter().filter(|item| item.has_doc).count();

        Self {
            total_items,
            doc_count,
            coverage_percent: coverage_percent(doc_count, total_items),
            items,
        }
    }
}

impl CoverageReport {
    /// Aggregate coverage over a collection of source units.
    ///
    /// A path seen twice keeps its last record (re-extraction supersedes), and
    /// the summary is computed from the kept records so that it always equals
    /// the sum of the per-file figures.
    #[must_use]
    pub fn from_units<'a>(units: impl IntoIterator<Item = &'a SourceUnit>) -> Self {
        let mut files = BTreeMap::new();
        for unit in units {
            if files
                .insert(unit.path.clone(), FileCoverage::from_unit(unit))
                .is_some()
            {
                log::debug!("Superseding earlier coverage record for {}", unit.path);
            }
        }

        let total_items = files.values().map(|f| f.total_items).sum();
        let total_docs = files.values().map(|f| f.doc_count).sum();

        Self {
            files,
            summary: CoverageSummary {
                total_items,
                total_docs,
                coverage_percent: coverage_percent(total_docs, total_items),
            },
        }
    }

    /// Whether the aggregate coverage reaches `threshold` percent
    #[must_use]
    pub fn meets_threshold(&self, threshold: f64) -> bool {
        self.summary.coverage_percent >= threshold
    }

    /// Items without documentation, as `(path, item)` pairs
    pub fn undocumented(&self) -> impl Iterator<Item = (&str, &CoverageItem)> {
        self.files.iter().flat_map(|(path, file)| {
            file.items
                .iter()
                .filter(|item| !item.has_doc)
                .map(move |item| (path.as_str(), item))
        })
    }
}

/// Aggregate coverage over a collection of source units
#[must_use]
pub fn compute_coverage(units: &[SourceUnit]) -> CoverageReport {
    CoverageReport::from_units(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docscope_extractor::extract_source;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
def documented():
    """Yes."""

def bare():
    pass

class Widget:
    """A widget."""

    def draw(self):
        pass

    def hide(self):
        """Hide it."""
"#;

    #[test]
    fn test_percent_rounding() {
        assert_eq!(coverage_percent(0, 0), 100.0);
        assert_eq!(coverage_percent(1, 3), 33.33);
        assert_eq!(coverage_percent(2, 3), 66.67);
        assert_eq!(coverage_percent(1, 8), 12.5);
        assert_eq!(coverage_percent(3, 3), 100.0);
    }

    #[test]
    fn test_file_coverage_items() {
        let unit = extract_source(SAMPLE, "widget.py").unwrap();
        let file = FileCoverage::from_unit(&unit);

        assert_eq!(file.total_items, 5);
        assert_eq!(file.doc_count, 3);
        assert_eq!(file.coverage_percent, 60.0);

        let described: Vec<(ItemKind, Option<&str>, &str, bool)> = file
            .items
            .iter()
            .map(|i| (i.kind, i.class.as_deref(), i.name.as_str(), i.has_doc))
            .collect();
        assert_eq!(
            described,
            vec![
                (ItemKind::Function, None, "documented", true),
                (ItemKind::Function, None, "bare", false),
                (ItemKind::Class, None, "Widget", true),
                (ItemKind::Method, Some("Widget"), "draw", false),
                (ItemKind::Method, Some("Widget"), "hide", true),
            ]
        );
    }

    #[test]
    fn test_empty_report_is_fully_covered() {
        let report = compute_coverage(&[]);
        assert_eq!(report.summary.total_items, 0);
        assert_eq!(report.summary.total_docs, 0);
        assert_eq!(report.summary.coverage_percent, 100.0);
        assert!(report.files.is_empty());
        assert!(report.meets_threshold(100.0));
    }

    #[test]
    fn test_empty_unit_is_fully_covered() {
        let unit = extract_source("import os\n", "empty.py").unwrap();
        let report = compute_coverage(&[unit]);
        assert_eq!(report.files["empty.py"].coverage_percent, 100.0);
    }

    #[test]
    fn test_summary_is_additive() {
        let a = extract_source(SAMPLE, "a.py").unwrap();
        let b = extract_source("def one():\n    pass\n", "b.py").unwrap();
        let report = compute_coverage(&[a, b]);

        let per_file: usize = report.files.values().map(|f| f.total_items).sum();
        assert_eq!(report.summary.total_items, per_file);
        assert_eq!(report.summary.total_items, 6);
        assert_eq!(report.summary.total_docs, 3);
        assert_eq!(report.summary.coverage_percent, 50.0);
        assert!(report.meets_threshold(50.0));
        assert!(!report.meets_threshold(50.01));
    }

    #[test]
    fn test_superseded_unit_counts_once() {
        let old = extract_source("def one():\n    pass\n", "m.py").unwrap();
        let new = extract_source("def one():\n    \"\"\"Doc.\"\"\"\n", "m.py").unwrap();
        let report = compute_coverage(&[old, new]);

        assert_eq!(report.files.len(), 1);
        assert_eq!(report.summary.total_items, 1);
        assert_eq!(report.summary.total_docs, 1);
    }

    #[test]
    fn test_undocumented_listing() {
        let unit = extract_source(SAMPLE, "widget.py").unwrap();
        let report = compute_coverage(&[unit]);
        let missing: Vec<&str> = report.undocumented().map(|(_, i)| i.name.as_str()).collect();
        assert_eq!(missing, vec!["bare", "draw"]);
    }

    #[test]
    fn test_json_shape() {
        let unit = extract_source(SAMPLE, "widget.py").unwrap();
        let json = serde_json::to_value(compute_coverage(&[unit])).unwrap();

        assert_eq!(json["summary"]["total_items"], 5);
        assert_eq!(json["summary"]["total_docs"], 3);
        assert_eq!(json["files"]["widget.py"]["doc_count"], 3);
        assert_eq!(json["files"]["widget.py"]["items"][3]["type"], "method");
        assert_eq!(json["files"]["widget.py"]["items"][3]["class"], "Widget");
        assert!(json["files"]["widget.py"]["items"][0].get("class").is_none());
    }
}
