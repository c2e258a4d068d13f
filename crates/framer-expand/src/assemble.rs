//! Include assembly.
//!
//! Splices `\input{name}` lines recursively into one text. The included
//! content replaces the directive line and any blank lines around it.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ExpandError, read_source};

static INPUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\\input\{([^}]+)\}\s*$").unwrap());

/// Extension tried when an include reference has none.
const SOURCE_EXTENSION: &str = "tex";

/// Resolves `\input{...}` directives into a single document.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use framer_expand::Assembler;
///
/// let text = Assembler::new(64).assemble(Path::new("talks"), Path::new("intro.tex"))?;
/// # Ok::<(), framer_expand::ExpandError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Assembler {
    max_depth: usize,
}

impl Assembler {
    /// Create an assembler that refuses to nest includes deeper than `max_depth`.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Assemble `file_name`, resolved against `base_path`.
    ///
    /// Includes are resolved relative to the directory of the file that
    /// contains them.
    pub fn assemble(&self, base_path: &Path, file_name: &Path) -> Result<String, ExpandError> {
        self.assemble_at(base_path, file_name, 0)
    }

    fn assemble_at(
        &self,
        base_path: &Path,
        file_name: &Path,
        depth: usize,
    ) -> Result<String, ExpandError> {
        let path = resolve(&base_path.join(file_name));
        if depth > self.max_depth {
            return Err(ExpandError::IncludeDepthExceeded {
                path,
                depth: self.max_depth,
            });
        }

        tracing::debug!(path = %path.display(), depth, "Assembling source");
        let text = read_source(&path)?;
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

        let (body, trailing_newline) = match text.strip_suffix('\n') {
            Some(body) => (body, true),
            None => (text.as_str(), false),
        };
        let lines: Vec<&str> = body.split('\n').collect();

        let mut output: Vec<String> = Vec::with_capacity(lines.len());
        let mut i = 0;
        while i < lines.len() {
            let Some(caps) = INPUT_RE.captures(lines[i]) else {
                output.push(lines[i].to_owned());
                i += 1;
                continue;
            };

            while output.last().is_some_and(|line| line.trim().is_empty()) {
                output.pop();
            }

            let included = self.assemble_at(&dir, Path::new(caps[1].trim()), depth + 1)?;
            output.push(
                included
                    .strip_suffix('\n')
                    .unwrap_or(&included)
                    .to_owned(),
            );

            i += 1;
            while i < lines.len() && lines[i].trim().is_empty() {
                i += 1;
            }
        }

        let mut assembled = output.join("\n");
        if trailing_newline {
            assembled.push('\n');
        }
        Ok(assembled)
    }
}

/// Fall back to `<path>.tex` when `path` has no extension and does not exist.
fn resolve(path: &Path) -> PathBuf {
    if path.extension().is_none() && !path.exists() {
        let with_ext = path.with_extension(SOURCE_EXTENSION);
        if with_ext.exists() {
            return with_ext;
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_without_includes_is_unchanged() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "main.tex", "a\n\nb\n");

        let text = Assembler::new(8)
            .assemble(temp.path(), Path::new("main.tex"))
            .unwrap();

        assert_eq!(text, "a\n\nb\n");
    }

    #[test]
    fn test_include_consumes_surrounding_blank_lines() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "main.tex", "intro\n\n\\input{part}\n\noutro\n");
        write(temp.path(), "part.tex", "one\ntwo\n");

        let text = Assembler::new(8)
            .assemble(temp.path(), Path::new("main.tex"))
            .unwrap();

        assert_eq!(text, "intro\none\ntwo\noutro\n");
    }

    #[test]
    fn test_nested_include_relative_to_including_file() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "main.tex", "\\input{sub/a.tex}\n");
        write(temp.path(), "sub/a.tex", "a\n\\input{b}\n");
        write(temp.path(), "sub/b.tex", "b\n");

        let text = Assembler::new(8)
            .assemble(temp.path(), Path::new("main.tex"))
            .unwrap();

        assert_eq!(text, "a\nb\n");
    }

    #[test]
    fn test_missing_include() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "main.tex", "\\input{gone}\n");

        let err = Assembler::new(8)
            .assemble(temp.path(), Path::new("main.tex"))
            .unwrap_err();

        assert!(matches!(err, ExpandError::MissingFile { ref path, .. } if path.ends_with("gone")));
    }

    #[test]
    fn test_missing_input_file() {
        let temp = tempfile::tempdir().unwrap();

        let err = Assembler::new(8)
            .assemble(temp.path(), Path::new("main.tex"))
            .unwrap_err();

        assert!(matches!(err, ExpandError::MissingFile { .. }));
    }

    #[test]
    fn test_self_include_hits_depth_limit() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "loop.tex", "x\n\\input{loop}\n");

        let err = Assembler::new(3)
            .assemble(temp.path(), Path::new("loop.tex"))
            .unwrap_err();

        assert!(matches!(err, ExpandError::IncludeDepthExceeded { depth: 3, .. }));
    }

    #[test]
    fn test_inline_input_is_not_a_directive() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "main.tex", "see \\input{part} here\n");

        let text = Assembler::new(8)
            .assemble(temp.path(), Path::new("main.tex"))
            .unwrap();

        assert_eq!(text, "see \\input{part} here\n");
    }
}
