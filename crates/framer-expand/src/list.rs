//! Indentation-driven list expansion.
//!
//! Indented `*` and `#` bullet lines become `itemize` and `enumerate`
//! environments, nested by indentation:
//!
//! ```text
//!   * first              \begin{itemize}
//!     # nested      =>     \item first
//!   * second                 \begin{enumerate}
//! ...
//! ```

use std::sync::LazyLock;

use framer_config::ListsConfig;
use regex::Regex;

use crate::ExpandError;

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ \t]+)([*#])[ \t]+(.*)$").unwrap());

/// Columns of indentation that make up one nesting level when unwinding.
const INDENT_STEP: usize = 2;

/// Kind of an open list environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestingKind {
    /// Bulleted list from `*`.
    Itemize,
    /// Numbered list from `#`.
    Enumerate,
    /// Bulleted list with poster spacing.
    List,
}

impl NestingKind {
    /// LaTeX environment name.
    #[must_use]
    pub fn environment(self) -> &'static str {
        match self {
            Self::Itemize => "itemize",
            Self::Enumerate => "enumerate",
            Self::List => "list",
        }
    }
}

#[derive(Debug)]
struct Nesting {
    kind: NestingKind,
    indent: String,
}

/// Expands bullet lines into nested list environments.
///
/// # Example
///
/// ```
/// use framer_config::ListsConfig;
/// use framer_expand::ListExpander;
///
/// let config = ListsConfig::default();
/// let mut lists = ListExpander::new(&config, false);
/// let output = lists.process("  * one\n  * two\n")?;
///
/// assert_eq!(output.matches("\\begin{itemize}").count(), 1);
/// assert_eq!(output.matches("\\end{itemize}").count(), 1);
/// # Ok::<(), framer_expand::ExpandError>(())
/// ```
pub struct ListExpander<'a> {
    config: &'a ListsConfig,
    poster: bool,
    stack: Vec<Nesting>,
    indentation: usize,
}

impl<'a> ListExpander<'a> {
    /// Create an expander; `poster` selects the compact `list` environment
    /// for bulleted lists.
    #[must_use]
    pub fn new(config: &'a ListsConfig, poster: bool) -> Self {
        Self {
            config,
            poster,
            stack: Vec::new(),
            indentation: 0,
        }
    }

    /// Expand all bullet lines in `input`.
    ///
    /// Fails when indentation cannot be unwound or a list is still open at
    /// the end of the input.
    pub fn process(&mut self, input: &str) -> Result<String, ExpandError> {
        let mut output = Vec::new();
        let mut last_line = 0;

        for (idx, line) in input.split('\n').enumerate() {
            last_line = idx + 1;
            self.process_line(line, last_line, &mut output)?;
        }

        if let Some(open) = self.stack.last() {
            return Err(ExpandError::unclosed(
                format!("{} list not closed at end of input", open.kind.environment()),
                last_line,
            ));
        }

        Ok(output.join("\n"))
    }

    fn process_line(
        &mut self,
        line: &str,
        line_num: usize,
        output: &mut Vec<String>,
    ) -> Result<(), ExpandError> {
        let Some(caps) = BULLET_RE.captures(line) else {
            self.plain_line(line, line_num, output)?;
            return Ok(());
        };

        let indent = &caps[1];
        let depth = indent.len();

        if depth > self.indentation {
            let kind = match &caps[2] {
                "#" => NestingKind::Enumerate,
                _ if self.poster => NestingKind::List,
                _ => NestingKind::Itemize,
            };
            output.push(format!("{indent}{}", self.opening(kind)));
            self.stack.push(Nesting {
                kind,
                indent: indent.to_owned(),
            });
        } else if depth < self.indentation {
            let levels = (self.indentation - depth).div_ceil(INDENT_STEP);
            for _ in 0..levels {
                if !self.close_one(output) {
                    return Err(ExpandError::unclosed(
                        "inconsistent list indentation",
                        line_num,
                    ));
                }
            }
        }

        self.indentation = depth;
        output.push(format!("{indent}\\item {}", &caps[3]));
        Ok(())
    }

    fn plain_line(
        &mut self,
        line: &str,
        line_num: usize,
        output: &mut Vec<String>,
    ) -> Result<(), ExpandError> {
        if self.stack.is_empty() {
            if self.indentation > 0 {
                return Err(ExpandError::unclosed(
                    "list indentation left without an open list",
                    line_num,
                ));
            }
        } else {
            while self.close_one(output) {}
            output.push(format!("\\vspace{{{}}}", self.config.after_space));
        }

        self.indentation = 0;
        output.push(line.to_owned());
        Ok(())
    }

    /// Close the innermost list; returns `false` when none is open.
    fn close_one(&mut self, output: &mut Vec<String>) -> bool {
        let Some(nesting) = self.stack.pop() else {
            return false;
        };
        output.push(format!(
            "{}\\end{{{}}}",
            nesting.indent,
            nesting.kind.environment()
        ));
        self.indentation = self.indentation.saturating_sub(INDENT_STEP);
        true
    }

    fn opening(&self, kind: NestingKind) -> String {
        match kind {
            NestingKind::List => {
                let mut setup = format!("\\setlength{{\\leftmargin}}{{{}}}", self.config.poster_left_margin);
                if self.config.poster_compact {
                    setup.push_str("\\setlength{\\itemsep}{0pt}\\setlength{\\parsep}{0pt}");
                }
                format!("\\begin{{list}}{{$\\bullet$}}{{{setup}}}")
            }
            other => format!("\\begin{{{}}}", other.environment()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn expand(input: &str) -> Result<String, ExpandError> {
        let config = ListsConfig::default();
        ListExpander::new(&config, false).process(input)
    }

    #[test]
    fn test_simple_itemize() {
        let output = expand("  * one\n  * two\n").unwrap();
        assert_eq!(
            output,
            "  \\begin{itemize}\n  \\item one\n  \\item two\n  \\end{itemize}\n\\vspace{0.5em}\n"
        );
    }

    #[test]
    fn test_missing_trailing_newline_leaves_list_open() {
        let err = expand("  * one\n  * two").unwrap_err();
        assert!(matches!(err, ExpandError::UnclosedStructure { line: 2, .. }));
    }

    #[test]
    fn test_nested_enumerate() {
        let output = expand("text\n  * a\n    # b\n    # c\n  * d\nafter").unwrap();
        assert_eq!(
            output,
            "text
  \\begin{itemize}
  \\item a
    \\begin{enumerate}
    \\item b
    \\item c
    \\end{enumerate}
  \\item d
  \\end{itemize}
\\vspace{0.5em}
after"
        );
    }

    #[test]
    fn test_plain_line_closes_all_levels() {
        let output = expand("  * a\n    * b\ndone").unwrap();
        assert_eq!(output.matches("\\begin{itemize}").count(), 2);
        assert_eq!(output.matches("\\end{itemize}").count(), 2);
        assert!(output.ends_with("\\vspace{0.5em}\ndone"));
    }

    #[test]
    fn test_large_dedent_pops_rounded_up_levels() {
        // dedent of 3 columns closes two levels
        let output = expand("  * a\n    * b\n     * c\n  * d\n").unwrap();
        assert!(output.contains("     \\end{itemize}\n    \\end{itemize}\n  \\item d"));
        assert_eq!(output.matches("\\end{itemize}").count(), 3);
    }

    #[test]
    fn test_dedent_past_open_lists_is_error() {
        let err = expand("  * a\n      * b\n * c\n").unwrap_err();
        assert!(matches!(err, ExpandError::UnclosedStructure { line: 3, .. }));
    }

    #[test]
    fn test_non_bullet_lines_untouched() {
        let input = "* not indented\n  plain indented\n";
        assert_eq!(expand(input).unwrap(), input);
    }

    #[test]
    fn test_poster_list_environment() {
        let config = ListsConfig::default();
        let output = ListExpander::new(&config, true)
            .process("  * a\n  # b\n")
            .unwrap();
        assert!(output.starts_with(
            "  \\begin{list}{$\\bullet$}{\\setlength{\\leftmargin}{1em}\\setlength{\\itemsep}{0pt}\\setlength{\\parsep}{0pt}}"
        ));
        assert!(output.contains("  \\end{list}\n"));
        assert!(!output.contains("enumerate"));
    }

    #[test]
    fn test_poster_enumerate_kept() {
        let config = ListsConfig::default();
        let output = ListExpander::new(&config, true).process("  # a\n").unwrap();
        assert!(output.contains("\\begin{enumerate}"));
    }

    #[test]
    fn test_balanced_environments() {
        let input = "  * a\n    * b\n      # c\n    * d\n  * e\nx\n  # f\n";
        let output = expand(input).unwrap();
        for env in ["itemize", "enumerate"] {
            assert_eq!(
                output.matches(&format!("\\begin{{{env}}}")).count(),
                output.matches(&format!("\\end{{{env}}}")).count(),
            );
        }
    }
}
