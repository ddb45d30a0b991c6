use crate::syntax::{render_expression, SyntaxVisitor};
use tree_sitter::Node;

/// Lines per extra complexity point in the length term
const LINES_PER_COMPLEXITY_POINT: usize = 10;

/// Metrics gathered from one function body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyMetrics {
    pub complexity: usize,
    pub nesting_depth: usize,
    pub raises: Vec<String>,
    pub yields: bool,
}

impl BodyMetrics {
    /// Analyze a function body.
    ///
    /// Complexity is a heuristic, not cyclomatic complexity: 1, plus one per
    /// branch, loop, `with`, `try`, comprehension or conditional expression
    /// anywhere below `body` (nested definitions included), plus
    /// `line_span / 10`.
    pub fn collect(body: Node, source: &str, line_span: usize) -> Self {
        let mut collector = MetricsCollector {
            source,
            branches: 0,
            depth: 0,
            max_depth: 0,
            raises: Vec::new(),
            yields: false,
        };
        collector.visit_children(body);

        Self {
            complexity: (1 + collector.branches + line_span / LINES_PER_COMPLEXITY_POINT).max(1),
            nesting_depth: collector.max_depth,
            raises: collector.raises,
            yields: collector.yields,
        }
    }
}

struct MetricsCollector<'s> {
    source: &'s str,
    branches: usize,
    depth: usize,
    max_depth: usize,
    raises: Vec<String>,
    yields: bool,
}

impl MetricsCollector<'_> {
    fn nested<'tree>(&mut self, node: Node<'tree>) {
        self.branches += 1;
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        self.visit_children(node);
        self.depth -= 1;
    }
}

impl<'tree> SyntaxVisitor<'tree> for MetricsCollector<'_> {
    fn visit_conditional(&mut self, node: Node<'tree>) {
        self.nested(node);
    }

    fn visit_loop(&mut self, node: Node<'tree>) {
        self.nested(node);
    }

    fn visit_context_manager(&mut self, node: Node<'tree>) {
        self.nested(node);
    }

    fn visit_exception_handler(&mut self, node: Node<'tree>) {
        self.nested(node);
    }

    fn visit_comprehension(&mut self, node: Node<'tree>) {
        self.branches += 1;
        self.visit_children(node);
    }

    fn visit_yield(&mut self, node: Node<'tree>) {
        self.yields = true;
        self.visit_children(node);
    }

    fn visit_raise(&mut self, node: Node<'tree>) {
        let cause = node.child_by_field_name("cause").map(|c| c.id());
        let mut cursor = node.walk();
        let raised = node
            .named_children(&mut cursor)
            .find(|child| child.kind() != "comment" && Some(child.id()) != cause);

        match raised.map(|exc| (exc, render_expression(exc, self.source))) {
            Some((_, Some(text))) => self.raises.push(text),
            Some((exc, None)) => {
                log::debug!("Skipping unrenderable raise at line {}", exc.start_position().row + 1);
            }
            None => {}
        }

        self.visit_children(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::first_named_child;
    use tree_sitter::Parser;

    fn metrics(source: &str) -> BodyMetrics {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .unwrap();
        let tree = parser.parse(source, None).unwrap();
        let def = first_named_child(&tree.root_node()).unwrap();
        let body = def.child_by_field_name("body").unwrap();
        BodyMetrics::collect(body, source, 0)
    }

    #[test]
    fn test_empty_body_has_base_complexity() {
        let m = metrics("def f():\n    pass\n");
        assert_eq!(m.complexity, 1);
        assert_eq!(m.nesting_depth, 0);
        assert!(m.raises.is_empty());
        assert!(!m.yields);
    }

    #[test]
    fn test_branches_and_nesting() {
        let source = r#"
def f(items):
    for item in items:
        if item:
            with open(item) as fh:
                pass
        elif item is None:
            try:
                pass
            except Exception:
                pass
    return [i for i in items if i] or (1 if items else 2)
"#;
        let m = metrics(source.trim_start());
        // for, if, with, elif, try, list comprehension, conditional expression
        assert_eq!(m.complexity, 8);
        // for > if > elif > try
        assert_eq!(m.nesting_depth, 4);
    }

    #[test]
    fn test_line_span_term() {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .unwrap();
        let source = "def f():\n    pass\n";
        let tree = parser.parse(source, None).unwrap();
        let def = first_named_child(&tree.root_node()).unwrap();
        let body = def.child_by_field_name("body").unwrap();

        assert_eq!(BodyMetrics::collect(body, source, 9).complexity, 1);
        assert_eq!(BodyMetrics::collect(body, source, 25).complexity, 3);
    }

    #[test]
    fn test_raises_keep_order_and_duplicates() {
        let source = r#"def f(x):
    if x < 0:
        raise ValueError("negative")
    if x > 10:
        raise KeyError(x) from None
    if x == 5:
        raise ValueError("negative")
    raise
"#;
        let m = metrics(source);
        assert_eq!(
            m.raises,
            vec![
                "ValueError(\"negative\")".to_string(),
                "KeyError(x)".to_string(),
                "ValueError(\"negative\")".to_string(),
            ]
        );
    }

    #[test]
    fn test_yield_detection_includes_nested() {
        assert!(metrics("def f():\n    yield 1\n").yields);
        assert!(metrics("def f():\n    x = yield\n").yields);
        assert!(metrics("def f():\n    def g():\n        yield 1\n    return g\n").yields);
        assert!(!metrics("def f():\n    return 1\n").yields);
    }
}
