use crate::error::{DocgenError, Result};
use crate::generator::Suggestion;
use std::fs;
use std::path::Path;

/// Insert a docstring after line `line` (1-indexed) of the file at `path`.
///
/// Every non-blank docstring line is indented by `indent` spaces. All other
/// lines, including the final newline if any, are left as they were.
pub fn apply_docstring(path: impl AsRef<Path>, line: usize, indent: usize, docstring: &str) -> Result<()> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| DocgenError::io(path, e))?;
    let patched = insert_docstring(&content, line, indent, docstring)?;
    write_source(path, &patched)?;

    log::info!("Inserted docstring into {} after line {line}", path.display());
    Ok(())
}

/// Apply several suggestions to one file with a single read and write.
///
/// Insertions run bottom-up so earlier line numbers stay valid. Returns the
/// number of docstrings inserted; on error the file is left untouched.
pub fn apply_suggestions(path: impl AsRef<Path>, suggestions: &[Suggestion]) -> Result<usize> {
    let path = path.as_ref();
    if suggestions.is_empty() {
        return Ok(0);
    }

    let mut content = fs::read_to_string(path).map_err(|e| DocgenError::io(path, e))?;

    let mut ordered: Vec<&Suggestion> = suggestions.iter().collect();
    ordered.sort_by(|a, b| b.body_line.cmp(&a.body_line));

    for suggestion in &ordered {
        content = insert_docstring(
            &content,
            suggestion.body_line,
            suggestion.indent,
            suggestion.docstring.as_str(),
        )?;
    }

    write_source(path, &content)?;
    log::info!("Inserted {} docstrings into {}", ordered.len(), path.display());
    Ok(ordered.len())
}

/// Pure form of [`apply_docstring`] over file content.
///
/// Line `line` must close a block header. Every line keeps its own
/// terminator; inserted lines take the terminator of that header line.
pub fn insert_docstring(content: &str, line: usize, indent: usize, docstring: &str) -> Result<String> {
    let pieces: Vec<&str> = content.split_inclusive('\n').collect();
    if line == 0 || line > pieces.len() {
        return Err(DocgenError::InvalidLine {
            line,
            len: pieces.len(),
        });
    }

    let (header, terminator) = split_terminator(pieces[line - 1]);
    if !closes_header(header) {
        return Err(DocgenError::InlineBody { line });
    }

    let newline = match terminator {
        "" if content.contains("\r\n") => "\r\n",
        "" => "\n",
        terminator => terminator,
    };
    let padding = " ".repeat(indent);

    let mut out = String::with_capacity(content.len() + docstring.len() * 2);
    out.extend(pieces[..line].iter().copied());
    if terminator.is_empty() {
        out.push_str(newline);
    }

    let doc_lines: Vec<&str> = docstring.lines().collect();
    for (i, doc_line) in doc_lines.iter().enumerate() {
        if !doc_line.trim().is_empty() {
            out.push_str(&padding);
            out.push_str(doc_line);
        }
        // a header without a terminator was the last line of the file
        if !terminator.is_empty() || i + 1 < doc_lines.len() {
            out.push_str(newline);
        }
    }

    out.extend(pieces[line..].iter().copied());
    Ok(out)
}

fn write_source(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| DocgenError::io(path, e))
}

fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(text) = line.strip_suffix("\r\n") {
        (text, "\r\n")
    } else if let Some(text) = line.strip_suffix('\n') {
        (text, "\n")
    } else {
        (line, "")
    }
}

/// True when the line ends with `:` once any trailing comment is dropped
fn closes_header(line: &str) -> bool {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut code_end = line.len();

    for (i, c) in line.char_indices() {
        match quote {
            Some(_) if escaped => escaped = false,
            Some(_) if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == '#' => {
                code_end = i;
                break;
            }
            None => {}
        }
    }

    line[..code_end].trim_end().ends_with(':')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    const DOC: &str = "\"\"\"\nSummary.\n\nArgs:\n    x (TYPE): DESCRIPTION\n\"\"\"";

    #[test]
    fn test_insert_indents_non_blank_lines() {
        let source = "def f(x):\n    return x\n";
        let patched = insert_docstring(source, 1, 4, DOC).unwrap();
        assert_eq!(
            patched,
            "def f(x):\n    \"\"\"\n    Summary.\n\n    Args:\n        x (TYPE): DESCRIPTION\n    \"\"\"\n    return x\n"
        );
    }

    #[test]
    fn test_missing_trailing_newline_is_preserved() {
        let patched = insert_docstring("def f():\n    pass", 1, 4, "\"\"\"Doc.\"\"\"").unwrap();
        assert_eq!(patched, "def f():\n    \"\"\"Doc.\"\"\"\n    pass");
    }

    #[test]
    fn test_crlf_is_preserved() {
        let patched = insert_docstring("def f():\r\n    pass\r\n", 1, 4, "\"\"\"Doc.\"\"\"").unwrap();
        assert_eq!(patched, "def f():\r\n    \"\"\"Doc.\"\"\"\r\n    pass\r\n");
    }

    #[test]
    fn test_mixed_line_endings_are_kept_per_line() {
        let patched = insert_docstring("x = 1\r\ndef f():\n    pass\r\n", 2, 4, DOC).unwrap();
        assert_eq!(
            patched,
            "x = 1\r\ndef f():\n    \"\"\"\n    Summary.\n\n    Args:\n        x (TYPE): DESCRIPTION\n    \"\"\"\n    pass\r\n"
        );

        let patched = insert_docstring("x = 1\ndef f():\r\n    pass\n", 2, 4, "\"\"\"Doc.\"\"\"").unwrap();
        assert_eq!(patched, "x = 1\ndef f():\r\n    \"\"\"Doc.\"\"\"\r\n    pass\n");
    }

    #[test]
    fn test_insert_after_last_line() {
        let patched = insert_docstring("x = 1\ndef f():", 2, 4, "\"\"\"Doc.\"\"\"").unwrap();
        assert_eq!(patched, "x = 1\ndef f():\n    \"\"\"Doc.\"\"\"");

        let patched = insert_docstring("x = 1\r\ndef f():", 2, 4, "\"\"\"Doc.\"\"\"").unwrap();
        assert_eq!(patched, "x = 1\r\ndef f():\r\n    \"\"\"Doc.\"\"\"");
    }

    #[test]
    fn test_inline_body_is_rejected() {
        for source in ["def f(): pass\n", "def f(): return {'a': 1}  # x:\n"] {
            let err = insert_docstring(source, 1, 4, DOC).unwrap_err();
            assert!(matches!(err, DocgenError::InlineBody { line: 1 }), "{source:?}");
        }

        for source in [
            "def f():  # note\n    pass\n",
            "def f(sep=\"#\"):\n    pass\n",
            "def f(a='\\'#'):\n    pass\n",
        ] {
            assert!(insert_docstring(source, 1, 4, DOC).is_ok(), "{source:?}");
        }
    }

    #[test]
    fn test_line_out_of_range() {
        let err = insert_docstring("a\nb\n", 3, 4, DOC).unwrap_err();
        assert!(matches!(err, DocgenError::InvalidLine { line: 3, len: 2 }));

        let err = insert_docstring("a\nb\n", 0, 4, DOC).unwrap_err();
        assert!(matches!(err, DocgenError::InvalidLine { line: 0, .. }));
    }

    #[test]
    fn test_apply_to_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("m.py");
        fs::write(&file, "def f():\n    pass\n").unwrap();

        apply_docstring(&file, 1, 4, "\"\"\"Doc.\"\"\"").unwrap();
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "def f():\n    \"\"\"Doc.\"\"\"\n    pass\n"
        );
    }

    #[test]
    fn test_invalid_line_leaves_file_untouched() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("m.py");
        fs::write(&file, "x = 1\n").unwrap();

        assert!(apply_docstring(&file, 9, 4, DOC).is_err());
        assert_eq!(fs::read_to_string(&file).unwrap(), "x = 1\n");
    }

    #[test]
    fn test_unwritable_target_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = write_source(temp.path(), "x = 1\n").unwrap_err();
        assert!(matches!(err, DocgenError::Io { ref path, .. } if path == temp.path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("m.py");
        fs::write(&file, "def f():\n    pass\n").unwrap();

        let mut permissions = fs::metadata(&file).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&file, permissions).unwrap();

        // privileged users can write regardless of mode bits
        if fs::OpenOptions::new().write(true).open(&file).is_ok() {
            return;
        }

        let err = apply_docstring(&file, 1, 4, DOC).unwrap_err();
        assert!(matches!(err, DocgenError::Io { .. }));
        assert_eq!(fs::read_to_string(&file).unwrap(), "def f():\n    pass\n");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = apply_docstring(temp.path().join("gone.py"), 1, 4, DOC).unwrap_err();
        assert!(matches!(err, DocgenError::Io { .. }));
    }
}
