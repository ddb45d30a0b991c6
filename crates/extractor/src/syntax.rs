//! Typed traversal over tree-sitter Python syntax trees.
//!
//! Grammar node kinds are folded into a closed [`NodeKind`] set. A
//! [`SyntaxVisitor`] gets one hook per kind; every hook defaults to visiting
//! the node's children, so an analysis overrides only what it counts.

use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::Node;

/// Closed classification of the grammar nodes the extractor cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// `if` statement or `elif` clause
    Conditional,
    /// `for` / `while`
    Loop,
    /// `with`
    ContextManager,
    /// `try`
    ExceptionHandler,
    /// Comprehensions, generator expressions and `a if c else b`
    Comprehension,
    Yield,
    Raise,
    /// An expression statement consisting of a string literal
    StringExpression,
    Assignment,
    FunctionDef,
    ClassDef,
    Other,
}

impl NodeKind {
    #[must_use]
    pub fn classify(node: &Node) -> Self {
        match node.kind() {
            "if_statement" | "elif_clause" => Self::Conditional,
            "for_statement" | "while_statement" => Self::Loop,
            "with_statement" => Self::ContextManager,
            "try_statement" => Self::ExceptionHandler,
            "list_comprehension"
            | "set_comprehension"
            | "dictionary_comprehension"
            | "generator_expression"
            | "conditional_expression" => Self::Comprehension,
            "yield" => Self::Yield,
            "raise_statement" => Self::Raise,
            "expression_statement" => {
                if string_literal(node).is_some() {
                    Self::StringExpression
                } else if first_named_child(node).is_some_and(|c| c.kind() == "assignment") {
                    Self::Assignment
                } else {
                    Self::Other
                }
            }
            "function_definition" => Self::FunctionDef,
            "class_definition" => Self::ClassDef,
            _ => Self::Other,
        }
    }

    /// Block constructs that deepen control-flow nesting
    #[must_use]
    pub const fn is_nesting(self) -> bool {
        matches!(
            self,
            Self::Conditional | Self::Loop | Self::ContextManager | Self::ExceptionHandler
        )
    }
}

/// Visitor over a syntax tree with one overridable hook per [`NodeKind`]
pub trait SyntaxVisitor<'tree> {
    /// Dispatch a node to the hook for its kind
    fn visit(&mut self, node: Node<'tree>) {
        match NodeKind::classify(&node) {
            NodeKind::Conditional => self.visit_conditional(node),
            NodeKind::Loop => self.visit_loop(node),
            NodeKind::ContextManager => self.visit_context_manager(node),
            NodeKind::ExceptionHandler => self.visit_exception_handler(node),
            NodeKind::Comprehension => self.visit_comprehension(node),
            NodeKind::Yield => self.visit_yield(node),
            NodeKind::Raise => self.visit_raise(node),
            NodeKind::StringExpression => self.visit_string_expression(node),
            NodeKind::Assignment => self.visit_assignment(node),
            NodeKind::FunctionDef => self.visit_function(node),
            NodeKind::ClassDef => self.visit_class(node),
            NodeKind::Other => self.visit_children(node),
        }
    }

    fn visit_children(&mut self, node: Node<'tree>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(child);
        }
    }

    fn visit_conditional(&mut self, node: Node<'tree>) {
        self.visit_children(node);
    }

    fn visit_loop(&mut self, node: Node<'tree>) {
        self.visit_children(node);
    }

    fn visit_context_manager(&mut self, node: Node<'tree>) {
        self.visit_children(node);
    }

    fn visit_exception_handler(&mut self, node: Node<'tree>) {
        self.visit_children(node);
    }

    fn visit_comprehension(&mut self, node: Node<'tree>) {
        self.visit_children(node);
    }

    fn visit_yield(&mut self, node: Node<'tree>) {
        self.visit_children(node);
    }

    fn visit_raise(&mut self, node: Node<'tree>) {
        self.visit_children(node);
    }

    fn visit_string_expression(&mut self, node: Node<'tree>) {
        self.visit_children(node);
    }

    fn visit_assignment(&mut self, node: Node<'tree>) {
        self.visit_children(node);
    }

    fn visit_function(&mut self, node: Node<'tree>) {
        self.visit_children(node);
    }

    fn visit_class(&mut self, node: Node<'tree>) {
        self.visit_children(node);
    }
}

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[ \t]*(?:\\)?\r?\n[ \t]*").expect("line break pattern is valid")
});

/// Render an expression node to canonical single-line text.
///
/// Line breaks inside the expression (and the indentation around them) are
/// folded away: directly after an opening bracket or before a closing one
/// nothing is inserted, elsewhere a single space. String literals are copied
/// verbatim and comments are dropped. Returns `None` for error nodes and
/// empty text.
#[must_use]
pub fn render_expression(node: Node, source: &str) -> Option<String> {
    if node.is_error() || node.is_missing() || node.has_error() {
        return None;
    }

    let text = node.utf8_text(source.as_bytes()).ok()?;
    if text.trim().is_empty() {
        return None;
    }
    if !text.contains('\n') {
        return Some(text.trim().to_string());
    }

    // Code between literals; a dropped comment joins its neighbours into one gap
    let base = node.start_byte();
    let mut rendered = String::with_capacity(text.len());
    let mut gap = String::new();
    let mut last = 0;
    for (start, end, is_literal) in literal_and_comment_spans(node) {
        gap.push_str(&text[last..start - base]);
        if is_literal {
            fold_line_breaks(&gap, &mut rendered);
            gap.clear();
            rendered.push_str(&text[start - base..end - base]);
        }
        last = end - base;
    }
    gap.push_str(&text[last..]);
    fold_line_breaks(&gap, &mut rendered);

    let rendered = rendered.trim();
    (!rendered.is_empty()).then(|| rendered.to_string())
}

/// Byte spans of the string literals and comments under `node`, in source order
fn literal_and_comment_spans(node: Node) -> Vec<(usize, usize, bool)> {
    let mut spans = Vec::new();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        match current.kind() {
            "string" => spans.push((current.start_byte(), current.end_byte(), true)),
            "comment" => spans.push((current.start_byte(), current.end_byte(), false)),
            _ => {
                let mut cursor = current.walk();
                let children: Vec<Node> = current.children(&mut cursor).collect();
                stack.extend(children.into_iter().rev());
            }
        }
    }
    spans
}

fn fold_line_breaks(code: &str, rendered: &mut String) {
    let mut last = 0;
    for found in LINE_BREAK.find_iter(code) {
        rendered.push_str(&code[last..found.start()]);
        let after = &code[found.end()..];
        let opens = rendered.ends_with(['(', '[', '{']);
        let closes = after.starts_with([')', ']', '}']);
        if !opens && !closes && !rendered.is_empty() {
            rendered.push(' ');
        }
        last = found.end();
    }
    rendered.push_str(&code[last..]);
}

/// Raw source text of a node
#[must_use]
pub fn node_text<'s>(node: Node, source: &'s str) -> Option<&'s str> {
    node.utf8_text(source.as_bytes()).ok()
}

/// First named child that is not a comment
#[must_use]
pub fn first_named_child<'tree>(node: &Node<'tree>) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment");
    found
}

/// Named children that are not comments
#[must_use]
pub fn named_children<'tree>(node: &Node<'tree>) -> Vec<Node<'tree>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// The string literal making up an expression statement, if that is all it holds.
///
/// Redundant parentheses around the literal are looked through.
#[must_use]
pub fn string_literal<'tree>(statement: &Node<'tree>) -> Option<Node<'tree>> {
    if statement.kind() != "expression_statement" {
        return None;
    }
    let children = named_children(statement);
    let [first] = children.as_slice() else {
        return None;
    };
    let mut expression = *first;
    while expression.kind() == "parenthesized_expression" {
        let inner = named_children(&expression);
        let [only] = inner.as_slice() else {
            return None;
        };
        expression = *only;
    }
    matches!(expression.kind(), "string" | "concatenated_string").then_some(expression)
}

/// Whether a block's first statement is a plain string literal used as documentation.
///
/// f-strings and bytes literals never count.
#[must_use]
pub fn has_docstring(block: &Node, source: &str) -> bool {
    let Some(first) = first_named_child(block) else {
        return false;
    };
    let Some(literal) = string_literal(&first) else {
        return false;
    };

    match literal.kind() {
        "string" => is_plain_string(&literal, source),
        _ => named_children(&literal)
            .iter()
            .all(|part| part.kind() == "string" && is_plain_string(part, source)),
    }
}

fn is_plain_string(string: &Node, source: &str) -> bool {
    let mut cursor = string.walk();
    let mut interpolated = false;
    let mut prefix_ok = true;
    for child in string.children(&mut cursor) {
        match child.kind() {
            "interpolation" => interpolated = true,
            "string_start" => {
                let prefix = node_text(child, source)
                    .unwrap_or_default()
                    .trim_end_matches(['"', '\''])
                    .to_ascii_lowercase();
                prefix_ok = !prefix.contains('f') && !prefix.contains('b');
            }
            _ => {}
        }
    }
    prefix_ok && !interpolated
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::{Parser, Tree};

    fn parse(source: &str) -> Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .unwrap();
        parser.parse(source, None).unwrap()
    }

    #[derive(Default)]
    struct KindCounter {
        conditionals: usize,
        loops: usize,
        comprehensions: usize,
        strings: usize,
        assignments: usize,
    }

    impl<'tree> SyntaxVisitor<'tree> for KindCounter {
        fn visit_conditional(&mut self, node: Node<'tree>) {
            self.conditionals += 1;
            self.visit_children(node);
        }

        fn visit_loop(&mut self, node: Node<'tree>) {
            self.loops += 1;
            self.visit_children(node);
        }

        fn visit_comprehension(&mut self, node: Node<'tree>) {
            self.comprehensions += 1;
            self.visit_children(node);
        }

        fn visit_string_expression(&mut self, node: Node<'tree>) {
            self.strings += 1;
            self.visit_children(node);
        }

        fn visit_assignment(&mut self, node: Node<'tree>) {
            self.assignments += 1;
            self.visit_children(node);
        }
    }

    #[test]
    fn test_visitor_dispatch() {
        let source = r#""""module doc"""
x = 1
if x:
    pass
elif x > 2:
    for i in range(3):
        pass
while False:
    y = [i for i in range(2)] if x else None
"#;
        let tree = parse(source);
        let mut counter = KindCounter::default();
        counter.visit(tree.root_node());

        assert_eq!(counter.conditionals, 2);
        assert_eq!(counter.loops, 2);
        assert_eq!(counter.comprehensions, 2);
        assert_eq!(counter.strings, 1);
        assert_eq!(counter.assignments, 2);
    }

    #[test]
    fn test_render_single_line() {
        let source = "x: Dict[str, int] = {}\n";
        let tree = parse(source);
        let statement = first_named_child(&tree.root_node()).unwrap();
        let assignment = first_named_child(&statement).unwrap();
        let annotation = assignment.child_by_field_name("type").unwrap();
        assert_eq!(
            render_expression(annotation, source).as_deref(),
            Some("Dict[str, int]")
        );
    }

    #[test]
    fn test_render_multi_line() {
        let source = "raise ValueError(\n    \"bad\",\n    code,\n)\n";
        let tree = parse(source);
        let raise = first_named_child(&tree.root_node()).unwrap();
        let exc = first_named_child(&raise).unwrap();
        assert_eq!(
            render_expression(exc, source).as_deref(),
            Some("ValueError(\"bad\", code,)")
        );
    }

    #[test]
    fn test_render_keeps_literals_and_drops_comments() {
        let source = "def f(a=\"\"\"a\n    b\"\"\", b=call(  # why\n    1,\n)):\n    pass\n";
        let tree = parse(source);
        let def = first_named_child(&tree.root_node()).unwrap();
        let params = named_children(&def.child_by_field_name("parameters").unwrap());
        let rendered: Vec<Option<String>> = params
            .iter()
            .map(|p| render_expression(p.child_by_field_name("value").unwrap(), source))
            .collect();

        assert_eq!(
            rendered,
            vec![
                Some("\"\"\"a\n    b\"\"\"".to_string()),
                Some("call(1,)".to_string())
            ]
        );
    }

    #[test]
    fn test_docstring_detection() {
        let cases = [
            ("def f():\n    \"\"\"Doc.\"\"\"\n", true),
            ("def f():\n    'single'\n", true),
            ("def f():\n    # comment\n    \"\"\"Doc.\"\"\"\n", true),
            ("def f():\n    \"a\" \"b\"\n", true),
            ("def f():\n    (\"wrapped\")\n", true),
            ("def f():\n    ((\"a\"\n     \"b\"))\n", true),
            ("def f():\n    (f\"{x}\")\n", false),
            ("def f():\n    (\"a\", \"b\")\n", false),
            ("def f():\n    f\"{x}\"\n", false),
            ("def f():\n    b\"raw\"\n", false),
            ("def f():\n    x = 1\n    \"\"\"late\"\"\"\n", false),
            ("def f():\n    pass\n", false),
        ];

        for (source, expected) in cases {
            let tree = parse(source);
            let def = first_named_child(&tree.root_node()).unwrap();
            let body = def.child_by_field_name("body").unwrap();
            assert_eq!(has_docstring(&body, source), expected, "{source}");
        }
    }
}
