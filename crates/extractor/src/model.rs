use serde::{Deserialize, Serialize};

/// Structured metadata for one parsed source file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceUnit {
    /// Source file path (identity)
    pub path: String,

    /// Module-level functions, in declaration order
    pub functions: Vec<Function>,

    /// Module-level classes, in declaration order
    pub classes: Vec<Class>,

    /// Imported modules and symbols as dotted paths, sorted and deduplicated
    pub imports: Vec<String>,

    /// Whether the module starts with a docstring
    #[serde(rename = "module_docstring")]
    pub has_module_docstring: bool,
}

impl SourceUnit {
    /// Number of documentable items (functions, classes and methods)
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.functions.len()
            + self
                .classes
                .iter()
                .map(|class| 1 + class.methods.len())
                .sum::<usize>()
    }

    /// Number of documentable items that carry a docstring
    #[must_use]
    pub fn documented_count(&self) -> usize {
        let functions = self.functions.iter().filter(|f| f.has_docstring).count();
        let classes: usize = self
            .classes
            .iter()
            .map(|class| {
                usize::from(class.has_docstring)
                    + class.methods.iter().filter(|m| m.has_docstring).count()
            })
            .sum();
        functions + classes
    }

    /// Free functions first, then methods paired with their owning class
    pub fn all_functions(&self) -> impl Iterator<Item = (Option<&Class>, &Function)> {
        self.functions.iter().map(|f| (None, f)).chain(
            self.classes
                .iter()
                .flat_map(|class| class.methods.iter().map(move |m| (Some(class), m))),
        )
    }

    /// Look up a free function or method by qualified name (`name` or `Class.name`)
    #[must_use]
    pub fn find_function(&self, qualified_name: &str) -> Option<&Function> {
        match qualified_name.split_once('.') {
            Some((class_name, method)) => self
                .classes
                .iter()
                .find(|class| class.name == class_name)?
                .methods
                .iter()
                .find(|m| m.name == method),
            None => self.functions.iter().find(|f| f.name == qualified_name),
        }
    }
}

/// A free function or a method
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Function {
    pub name: String,

    /// Line of the `def` keyword (1-indexed)
    #[serde(rename = "lineno")]
    pub line: usize,

    /// Last line of the body (1-indexed, inclusive)
    #[serde(rename = "end_lineno")]
    pub end_line: Option<usize>,

    /// Line on which the signature ends; a docstring goes right after it
    pub body_line: usize,

    /// Body starts on the signature line, as in `def f(): pass`
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub inline_body: bool,

    #[serde(rename = "args")]
    pub arguments: Vec<Argument>,

    /// Default expressions of the trailing positional parameters
    pub defaults: Vec<Option<String>>,

    /// Return annotation
    pub returns: Option<String>,

    pub has_docstring: bool,

    /// Heuristic complexity score, always >= 1
    pub complexity: usize,

    pub nesting_depth: usize,

    /// Raised expressions as written, in encounter order
    pub raises: Vec<String>,

    pub yields: bool,

    /// Indentation of the body (declaration column + one unit)
    pub indent: usize,

    #[serde(default)]
    pub is_async: bool,

    #[serde(default)]
    pub decorators: Vec<String>,
}

impl Function {
    /// Arguments that can be passed positionally
    pub fn positional_arguments(&self) -> impl Iterator<Item = &Argument> {
        self.arguments
            .iter()
            .filter(|arg| arg.kind != ArgumentKind::KeywordOnly)
    }

    /// Default of a positional argument, right-aligned against the positional tail
    #[must_use]
    pub fn default_for(&self, name: &str) -> Option<&str> {
        let positional: Vec<&Argument> = self.positional_arguments().collect();
        let index = positional.iter().position(|arg| arg.name == name)?;
        let first_defaulted = positional.len().checked_sub(self.defaults.len())?;
        if index < first_defaulted {
            return None;
        }
        self.defaults.get(index - first_defaulted)?.as_deref()
    }

    /// Number of lines spanned by the definition, when the end is known
    #[must_use]
    pub fn line_span(&self) -> usize {
        self.end_line
            .map(|end| end.saturating_sub(self.line))
            .unwrap_or(0)
    }
}

/// A declared parameter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Argument {
    pub name: String,

    /// Type annotation as written
    pub annotation: Option<String>,

    #[serde(default)]
    pub kind: ArgumentKind,
}

impl Argument {
    pub fn new(name: impl Into<String>, annotation: Option<String>, kind: ArgumentKind) -> Self {
        Self {
            name: name.into(),
            annotation,
            kind,
        }
    }
}

/// How a parameter may be bound at a call site
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentKind {
    PositionalOnly,
    #[default]
    Positional,
    KeywordOnly,
}

/// A class definition and its directly declared methods
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Class {
    pub name: String,

    #[serde(rename = "lineno")]
    pub line: usize,

    #[serde(rename = "end_lineno")]
    pub end_line: Option<usize>,

    pub has_docstring: bool,

    pub methods: Vec<Function>,

    /// Names bound by top-level `name = expr` statements in the class body
    #[serde(rename = "class_attributes")]
    pub attributes: Vec<String>,

    /// Base class expressions as written
    #[serde(default)]
    pub bases: Vec<String>,

    /// Indentation of the class body
    pub indent: usize,

    /// Line on which the class header ends
    pub body_line: usize,
}
