//! Frame and section expansion.
//!
//! Marker lines open and close blocks:
//!
//! ```text
//! --- Title                 default frame titled "Title"
//! ---= Title n=3            default frame, arguments kept verbatim as title
//! ---image plot.pdf Plot    frame built by the `image` builder
//! ---|dot -Tpdf             lines up to the next marker piped through `dot`
//! ---                       close the open block
//! ```
//!
//! A marker with arguments while a block is open closes that block and
//! opens the next one.

mod args;
mod builder;
mod columns;
mod filter;
mod marker;
mod section;

use std::time::Duration;

pub use args::BuilderArgs;
pub use builder::BuilderKind;
pub use columns::{ColumnBoxStack, Placement};
pub use section::expand_sections;

use crate::{ExpandError, RunContext};
use filter::run_filter;
use marker::Marker;

/// The block currently open.
#[derive(Debug)]
enum OpenBlock {
    Builder {
        kind: BuilderKind,
        line: usize,
    },
    Filter {
        command: String,
        buffer: Vec<String>,
    },
}

/// Expands frame markers into builder output or filter output.
#[derive(Debug, Default)]
pub struct FrameExpander {
    open: Option<OpenBlock>,
}

impl FrameExpander {
    /// Create an expander with no open block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand every frame marker in `input`.
    ///
    /// Section markers must already have been rewritten by
    /// [`expand_sections`].
    pub fn process(&mut self, input: &str, run: &mut RunContext<'_>) -> Result<String, ExpandError> {
        let mut output = Vec::new();

        for (idx, line) in input.split('\n').enumerate() {
            if let Some(marker) = Marker::parse(line) {
                self.handle_marker(&marker, idx + 1, run, &mut output)?;
                continue;
            }

            match &mut self.open {
                Some(OpenBlock::Filter { buffer, .. }) => buffer.push(line.to_owned()),
                Some(OpenBlock::Builder { .. }) if !line.is_empty() => {
                    output.push(format!("  {line}"));
                }
                _ => output.push(line.to_owned()),
            }
        }

        self.finish(run, &mut output)?;
        Ok(output.join("\n"))
    }

    fn handle_marker(
        &mut self,
        marker: &Marker<'_>,
        line: usize,
        run: &mut RunContext<'_>,
        output: &mut Vec<String>,
    ) -> Result<(), ExpandError> {
        if let Some(block) = self.open.take() {
            close(block, run, output)?;
            if marker.is_bare() {
                return Ok(());
            }
            output.push(String::new());
        } else if marker.is_bare() {
            return Ok(());
        }

        if marker.filter {
            let command = if marker.name.is_empty() {
                let image = run.next_image();
                run.config
                    .filter
                    .default_command
                    .replace("{image}", &image)
                    .replace("{args}", marker.rest)
            } else {
                format!("{} {}", marker.name, marker.rest)
                    .trim_end()
                    .to_owned()
            };
            self.open = Some(OpenBlock::Filter {
                command,
                buffer: Vec::new(),
            });
            return Ok(());
        }

        let kind = BuilderKind::from_name(marker.name).ok_or_else(|| ExpandError::UnknownBuilder {
            name: marker.name.to_owned(),
            line,
        })?;
        let args = if marker.title_only {
            BuilderArgs {
                title: marker.rest.to_owned(),
                keywords: Vec::new(),
            }
        } else {
            BuilderArgs::parse(marker.rest, kind.keywords())
        };
        tracing::debug!(builder = kind.name(), line, "Opening block");
        output.extend(kind.start(&args, &mut run.columns));
        self.open = Some(OpenBlock::Builder { kind, line });
        Ok(())
    }

    /// End of input: flush a filter block, reject an open builder block.
    fn finish(&mut self, run: &RunContext<'_>, output: &mut Vec<String>) -> Result<(), ExpandError> {
        match self.open.take() {
            None => Ok(()),
            Some(OpenBlock::Builder { kind, line }) => Err(ExpandError::unclosed(
                format!("frames not closed: `{}` block opened here", kind.name()),
                line,
            )),
            Some(OpenBlock::Filter {
                command,
                mut buffer,
            }) => {
                // keep the document's final newline outside the filter input
                let trailing = buffer.last().is_some_and(String::is_empty);
                if trailing {
                    buffer.pop();
                }
                close(OpenBlock::Filter { command, buffer }, run, output)?;
                if trailing {
                    output.push(String::new());
                }
                Ok(())
            }
        }
    }
}

fn close(
    block: OpenBlock,
    run: &RunContext<'_>,
    output: &mut Vec<String>,
) -> Result<(), ExpandError> {
    match block {
        OpenBlock::Builder { kind, .. } => output.extend(kind.end()),
        OpenBlock::Filter { command, buffer } => {
            let mut input = buffer.join("\n");
            if !buffer.is_empty() {
                input.push('\n');
            }
            let filter = &run.config.filter;
            let result = run_filter(
                &filter.shell,
                &command,
                &input,
                run.work_dir,
                Duration::from_secs(filter.timeout_secs),
            )?;
            let result = result.strip_suffix('\n').unwrap_or(&result);
            if !result.is_empty() {
                output.push(result.to_owned());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use framer_config::Config;
    use pretty_assertions::assert_eq;

    fn expand(input: &str) -> Result<String, ExpandError> {
        let config = Config::default();
        let mut run = RunContext::new(&config);
        FrameExpander::new().process(input, &mut run)
    }

    #[test]
    fn test_single_frame() {
        let output = expand("--- Title\nBody\n\nMore\n---\n").unwrap();
        assert_eq!(
            output,
            "\\begin{frame}{Title}\n  Body\n\n  More\n\\end{frame}\n"
        );
    }

    #[test]
    fn test_title_with_equation_kept() {
        assert_eq!(
            expand("--- Results for n=3\nx\n---=  fragile=singleslide  \ny\n---").unwrap(),
            "\\begin{frame}{Results for n=3}\n  x\n\\end{frame}\n\n\\begin{frame}{fragile=singleslide}\n  y\n\\end{frame}"
        );
    }

    #[test]
    fn test_chained_frames() {
        let output = expand("--- A\nx\n--- B\ny\n---").unwrap();
        assert_eq!(
            output,
            "\\begin{frame}{A}\n  x\n\\end{frame}\n\n\\begin{frame}{B}\n  y\n\\end{frame}"
        );
    }

    #[test]
    fn test_bare_marker_while_closed_emits_nothing() {
        assert_eq!(expand("---\ntext\n---\n---").unwrap(), "text");
    }

    #[test]
    fn test_unknown_builder() {
        let err = expand("intro\n---nosuchbuilder title\n").unwrap_err();
        assert!(matches!(
            err,
            ExpandError::UnknownBuilder { ref name, line: 2 } if name == "nosuchbuilder"
        ));
    }

    #[test]
    fn test_unclosed_frame() {
        let err = expand("--- Title\nbody\n").unwrap_err();
        assert!(matches!(err, ExpandError::UnclosedStructure { line: 1, .. }));
    }

    #[test]
    fn test_dashboard_column_state_persists() {
        let output = expand("---h Alpha column=2\na\n---h Beta\nb\n---").unwrap();
        assert!(output.contains("{name=alpha,column=2,below=top}"));
        assert!(output.contains("{name=beta,column=2,below=alpha}"));
        assert_eq!(output.matches("\\end{posterboxenv}").count(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_named_filter_block() {
        let output = expand("before\n---|tr a-z A-Z\nshout\n---\nafter").unwrap();
        assert_eq!(output, "before\nSHOUT\nafter");
    }

    #[cfg(unix)]
    #[test]
    fn test_filter_flushed_at_end_of_input() {
        let output = expand("---|cat\nkept\n").unwrap();
        assert_eq!(output, "kept\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_filter_chains_into_frame() {
        let output = expand("---|cat\nraw\n--- Next\nbody\n---").unwrap();
        assert_eq!(output, "raw\n\n\\begin{frame}{Next}\n  body\n\\end{frame}");
    }

    #[cfg(unix)]
    #[test]
    fn test_default_filter_uses_image_counter() {
        let mut config = Config::default();
        config.filter.default_command = "echo {image} {args}".to_owned();
        let mut run = RunContext::new(&config);

        let output = FrameExpander::new()
            .process("---| extra\nignored\n---\n---|\nx\n---", &mut run)
            .unwrap();

        assert_eq!(output, "image1 extra\nimage2");
        assert_eq!(run.images, 2);
    }

    #[test]
    fn test_frames_balanced() {
        let input = "--- a\n1\n---image p.png P\n2\n---contents\n---\nfree\n---intro\n---";
        let output = expand(input).unwrap();
        assert_eq!(
            output.matches("\\begin{frame}").count(),
            output.matches("\\end{frame}").count()
        );
        assert_eq!(output.matches("\\begin{frame}").count(), 4);
    }
}
