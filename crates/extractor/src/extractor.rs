use crate::config::ExtractorConfig;
use crate::error::{ExtractError, Result};
use crate::metrics::BodyMetrics;
use crate::model::{Argument, ArgumentKind, Class, Function, SourceUnit};
use crate::syntax::{has_docstring, named_children, node_text, render_expression};
use std::collections::BTreeSet;
use std::path::Path;
use tree_sitter::{Node, Parser};

/// Tree-sitter based extractor turning Python source into [`SourceUnit`] records
pub struct Extractor {
    config: ExtractorConfig,
    parser: Parser,
}

impl Extractor {
    /// Create a new extractor
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate().map_err(ExtractError::invalid_config)?;

        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| ExtractError::tree_sitter(format!("Failed to set language: {e}")))?;

        Ok(Self { config, parser })
    }

    #[must_use]
    pub const fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Read and extract one file
    pub fn extract_file(&mut self, path: impl AsRef<Path>) -> Result<SourceUnit> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        self.extract_source(&source, &path.to_string_lossy())
    }

    /// Extract a source unit from text
    pub fn extract_source(&mut self, source: &str, path: &str) -> Result<SourceUnit> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ExtractError::parse(path, "parser produced no tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(ExtractError::parse(path, describe_syntax_error(root)));
        }
        if let Some(message) = find_rejected_construct(root) {
            return Err(ExtractError::parse(path, message));
        }

        let mut functions = Vec::new();
        let mut classes = Vec::new();
        for statement in named_children(&root) {
            let (definition, decorators) = unwrap_decorated(statement, source);
            match definition.kind() {
                "function_definition" => {
                    functions.push(self.function_record(definition, decorators, source));
                }
                "class_definition" => classes.push(self.class_record(definition, source)),
                _ => {}
            }
        }

        let unit = SourceUnit {
            path: path.to_string(),
            functions,
            classes,
            imports: collect_imports(root, source),
            has_module_docstring: has_docstring(&root, source),
        };

        log::debug!(
            "Extracted {}: {} functions, {} classes",
            unit.path,
            unit.functions.len(),
            unit.classes.len()
        );

        Ok(unit)
    }

    fn function_record(&self, node: Node, decorators: Vec<String>, source: &str) -> Function {
        let name = field_text(node, "name", source).unwrap_or_default();
        let line = node.start_position().row + 1;
        let end_line = Some(last_code_line(node));

        let (arguments, defaults) = node
            .child_by_field_name("parameters")
            .map(|params| parameters(params, source))
            .unwrap_or_default();

        let returns = node
            .child_by_field_name("return_type")
            .and_then(|ret| render_expression(ret, source));

        let body = node.child_by_field_name("body");
        let span = end_line.map_or(0, |end| end.saturating_sub(line));
        let metrics = body
            .map(|body| BodyMetrics::collect(body, source, span))
            .unwrap_or_else(|| BodyMetrics {
                complexity: 1,
                ..Default::default()
            });

        let mut cursor = node.walk();
        let is_async = node.children(&mut cursor).any(|child| child.kind() == "async");
        let body_line = header_end_line(node);

        Function {
            name,
            line,
            end_line,
            body_line,
            inline_body: body.is_some_and(|body| body.start_position().row + 1 == body_line),
            arguments,
            defaults,
            returns,
            has_docstring: body.is_some_and(|body| has_docstring(&body, source)),
            complexity: metrics.complexity,
            nesting_depth: metrics.nesting_depth,
            raises: metrics.raises,
            yields: metrics.yields,
            indent: node.start_position().column + self.config.indent_width,
            is_async,
            decorators,
        }
    }

    fn class_record(&self, node: Node, source: &str) -> Class {
        let mut methods = Vec::new();
        let mut attributes = Vec::new();

        let body = node.child_by_field_name("body");
        if let Some(body) = body {
            for statement in named_children(&body) {
                let (definition, decorators) = unwrap_decorated(statement, source);
                if definition.kind() == "function_definition" {
                    methods.push(self.function_record(definition, decorators, source));
                } else if statement.kind() == "expression_statement" {
                    attributes.extend(assigned_names(statement, source));
                }
            }
        }

        let bases = node
            .child_by_field_name("superclasses")
            .map(|args| {
                named_children(&args)
                    .into_iter()
                    .filter(|base| base.kind() != "keyword_argument")
                    .filter_map(|base| render_expression(base, source))
                    .collect()
            })
            .unwrap_or_default();

        Class {
            name: field_text(node, "name", source).unwrap_or_default(),
            line: node.start_position().row + 1,
            end_line: Some(last_code_line(node)),
            has_docstring: body.is_some_and(|body| has_docstring(&body, source)),
            methods,
            attributes,
            bases,
            indent: node.start_position().column + self.config.indent_width,
            body_line: header_end_line(node),
        }
    }
}

/// Peel a `decorated_definition` down to the definition it wraps
fn unwrap_decorated<'tree>(node: Node<'tree>, source: &str) -> (Node<'tree>, Vec<String>) {
    if node.kind() != "decorated_definition" {
        return (node, Vec::new());
    }

    let decorators = named_children(&node)
        .into_iter()
        .filter(|child| child.kind() == "decorator")
        .filter_map(|decorator| {
            let expression = named_children(&decorator).into_iter().next()?;
            render_expression(expression, source)
        })
        .collect();

    let definition = node.child_by_field_name("definition").unwrap_or(node);
    (definition, decorators)
}

/// Arguments in declaration order plus the defaults of the positional ones.
///
/// `*args`, `**kwargs` and the bare `*` and `/` markers are not arguments;
/// anything after `*` or `*args` is keyword-only, anything before `/` is
/// positional-only.
fn parameters(params: Node, source: &str) -> (Vec<Argument>, Vec<Option<String>>) {
    let mut arguments = Vec::new();
    let mut defaults = Vec::new();
    let mut keyword_only = false;

    for param in named_children(&params) {
        let kind = if keyword_only {
            ArgumentKind::KeywordOnly
        } else {
            ArgumentKind::Positional
        };

        match param.kind() {
            "identifier" => {
                if let Some(name) = node_text(param, source) {
                    arguments.push(Argument::new(name, None, kind));
                }
            }
            "typed_parameter" => {
                let Some(target) = named_children(&param).into_iter().next() else {
                    continue;
                };
                match target.kind() {
                    "identifier" => {
                        let annotation = param
                            .child_by_field_name("type")
                            .and_then(|ty| render_expression(ty, source));
                        if let Some(name) = node_text(target, source) {
                            arguments.push(Argument::new(name, annotation, kind));
                        }
                    }
                    "list_splat_pattern" => keyword_only = true,
                    _ => {}
                }
            }
            "default_parameter" | "typed_default_parameter" => {
                let Some(name) = param
                    .child_by_field_name("name")
                    .filter(|name| name.kind() == "identifier")
                    .and_then(|name| node_text(name, source))
                else {
                    continue;
                };
                let annotation = param
                    .child_by_field_name("type")
                    .and_then(|ty| render_expression(ty, source));
                arguments.push(Argument::new(name, annotation, kind));

                if !keyword_only {
                    defaults.push(
                        param
                            .child_by_field_name("value")
                            .and_then(|value| render_expression(value, source)),
                    );
                }
            }
            "list_splat_pattern" | "keyword_separator" => keyword_only = true,
            "positional_separator" => {
                for arg in &mut arguments {
                    arg.kind = ArgumentKind::PositionalOnly;
                }
            }
            _ => {}
        }
    }

    (arguments, defaults)
}

/// Names bound by a plain `a = b = expr` statement; annotated, augmented and
/// tuple assignments bind nothing here
fn assigned_names(statement: Node, source: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut current = named_children(&statement)
        .into_iter()
        .next()
        .filter(|child| child.kind() == "assignment");

    while let Some(assignment) = current {
        if assignment.child_by_field_name("type").is_some() {
            break;
        }
        if let Some(left) = assignment
            .child_by_field_name("left")
            .filter(|left| left.kind() == "identifier")
        {
            if let Some(name) = node_text(left, source) {
                names.push(name.to_string());
            }
        }
        current = assignment
            .child_by_field_name("right")
            .filter(|right| right.kind() == "assignment");
    }

    names
}

/// Every imported module or symbol anywhere in the tree, as sorted unique dotted paths
fn collect_imports(root: Node, source: &str) -> Vec<String> {
    let mut imports = BTreeSet::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        match node.kind() {
            "import_statement" => {
                for name in import_names(node, source) {
                    imports.insert(name);
                }
            }
            "import_from_statement" => {
                let module = node
                    .child_by_field_name("module_name")
                    .and_then(|module| module_path(module, source))
                    .unwrap_or_default();
                let mut cursor = node.walk();
                let wildcard = node
                    .children(&mut cursor)
                    .any(|child| child.kind() == "wildcard_import");
                let names = if wildcard {
                    vec!["*".to_string()]
                } else {
                    import_names(node, source)
                };
                for name in names {
                    imports.insert(qualify(&module, &name));
                }
            }
            "future_import_statement" => {
                for name in import_names(node, source) {
                    imports.insert(qualify("__future__", &name));
                }
            }
            _ => {
                let mut cursor = node.walk();
                stack.extend(node.named_children(&mut cursor));
            }
        }
    }

    imports.into_iter().collect()
}

fn qualify(module: &str, name: &str) -> String {
    if module.is_empty() {
        name.to_string()
    } else {
        format!("{module}.{name}")
    }
}

/// Imported names of an import statement (aliases resolve to the original name)
fn import_names(node: Node, source: &str) -> Vec<String> {
    let mut cursor = node.walk();
    let names: Vec<Node> = node.children_by_field_name("name", &mut cursor).collect();
    names
        .into_iter()
        .filter_map(|name| match name.kind() {
            "aliased_import" => name
                .child_by_field_name("name")
                .and_then(|inner| node_text(inner, source)),
            _ => node_text(name, source),
        })
        .map(|text| text.split_whitespace().collect::<String>())
        .collect()
}

/// Module path of a `from` import; leading dots of a relative import are dropped
fn module_path(module: Node, source: &str) -> Option<String> {
    match module.kind() {
        "relative_import" => named_children(&module)
            .into_iter()
            .find(|child| child.kind() == "dotted_name")
            .and_then(|dotted| node_text(dotted, source))
            .map(|text| text.split_whitespace().collect()),
        _ => node_text(module, source).map(|text| text.split_whitespace().collect()),
    }
}

fn field_text(node: Node, field: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field)
        .and_then(|child| node_text(child, source))
        .map(str::to_string)
}

/// Last line holding code of a definition or compound statement.
///
/// Comments trailing a block belong to the block in the syntax tree but not
/// to the statement, so the walk descends through the final block or clause
/// and stops at the last simple statement.
fn last_code_line(node: Node) -> usize {
    let Some(last) = named_children(&node).into_iter().last() else {
        return last_line(node);
    };
    if node.kind() == "block" || is_compound(last.kind()) {
        last_code_line(last)
    } else {
        last_line(node)
    }
}

fn is_compound(kind: &str) -> bool {
    matches!(
        kind,
        "block"
            | "if_statement"
            | "for_statement"
            | "while_statement"
            | "try_statement"
            | "with_statement"
            | "match_statement"
            | "function_definition"
            | "class_definition"
            | "decorated_definition"
    ) || kind.ends_with("_clause")
}

/// 1-indexed last line of a node
fn last_line(node: Node) -> usize {
    let end = node.end_position();
    if end.row > node.start_position().row && end.column == 0 {
        end.row
    } else {
        end.row + 1
    }
}

/// 1-indexed line holding the `:` that closes a definition header
fn header_end_line(node: Node) -> usize {
    let body_start = node
        .child_by_field_name("body")
        .map(|body| body.start_byte())
        .unwrap_or(usize::MAX);

    let mut cursor = node.walk();
    let colon = node
        .children(&mut cursor)
        .filter(|child| child.kind() == ":" && child.end_byte() <= body_start)
        .last();

    colon
        .map(|colon| colon.start_position().row + 1)
        .unwrap_or_else(|| node.start_position().row + 1)
}

/// Constructs the parser accepts but Python 3 rejects, reported like syntax errors
fn find_rejected_construct(root: Node) -> Option<String> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        let line = node.start_position().row + 1;
        match node.kind() {
            "print_statement" => return Some(format!("Python 2 print statement at line {line}")),
            "exec_statement" => return Some(format!("Python 2 exec statement at line {line}")),
            "parameters" | "lambda_parameters" => {
                if let Some(param) = non_default_after_default(node) {
                    return Some(format!(
                        "non-default argument follows default argument at line {}",
                        param.start_position().row + 1
                    ));
                }
            }
            _ => {}
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

/// First positional parameter without a default that follows one with a default
fn non_default_after_default<'tree>(params: Node<'tree>) -> Option<Node<'tree>> {
    let mut seen_default = false;
    for param in named_children(&params) {
        match param.kind() {
            "default_parameter" | "typed_default_parameter" => seen_default = true,
            "identifier" if seen_default => return Some(param),
            "typed_parameter" => match named_children(&param).first().map(|t| t.kind()) {
                Some("identifier") if seen_default => return Some(param),
                Some("list_splat_pattern" | "dictionary_splat_pattern") => return None,
                _ => {}
            },
            // everything after `*`, `*args` or `**kwargs` is keyword-only
            "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" => return None,
            _ => {}
        }
    }
    None
}

/// Location of the first error or missing node, for the parse error message
fn describe_syntax_error(root: Node) -> String {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let position = node.start_position();
            let what = if node.is_missing() {
                format!("missing `{}`", node.kind())
            } else {
                "invalid syntax".to_string()
            };
            return format!("{what} at line {}, column {}", position.row + 1, position.column + 1);
        }
        if node.has_error() {
            let mut cursor = node.walk();
            let children: Vec<Node> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }
    "invalid syntax".to_string()
}

/// Extract a source unit from text with the default configuration
pub fn extract_source(source: &str, path: &str) -> Result<SourceUnit> {
    Extractor::new(ExtractorConfig::default())?.extract_source(source, path)
}

/// Extract a file, or every source file below a directory.
///
/// A single file's failures are returned. In directory mode a file that cannot
/// be read or parsed is logged and left out of the result; the scan goes on.
pub fn extract_path(path: impl AsRef<Path>, config: &ExtractorConfig) -> Result<Vec<SourceUnit>> {
    let path = path.as_ref();
    let mut extractor = Extractor::new(config.clone())?;

    if path.is_file() {
        return Ok(vec![extractor.extract_file(path)?]);
    }
    if !path.is_dir() {
        return Err(ExtractError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is neither a file nor a directory", path.display()),
        )));
    }

    let files = crate::scanner::FileScanner::new(path, config.clone()).scan();
    let mut units = Vec::with_capacity(files.len());
    for file in files {
        match extractor.extract_file(&file) {
            Ok(unit) => units.push(unit),
            Err(e) => log::warn!("Skipping {}: {e}", file.display()),
        }
    }

    log::info!("Extracted {} source units from {}", units.len(), path.display());
    Ok(units)
}
