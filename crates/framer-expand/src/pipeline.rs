//! The expansion pipeline and its file-level entry points.

use std::path::{Path, PathBuf};

use framer_config::Config;

use crate::frame::{FrameExpander, expand_sections};
use crate::{
    Assembler, ExpandError, ListExpander, RunContext, StyleExpander, clean_bibliography,
    expand_code,
};

/// Suffix of the assembled intermediate file.
pub const ASSEMBLED_SUFFIX: &str = "assembled";

/// Suffix of the final output file.
pub const EXPANDED_SUFFIX: &str = "expanded.tex";

/// Runs the stages over documents with one configuration.
///
/// # Example
///
/// ```
/// use framer_config::Config;
/// use framer_expand::Pipeline;
///
/// let config = Config::default();
/// let output = Pipeline::new(&config).expand("--- Hello\n  * ~world~\n---\n")?;
///
/// assert!(output.starts_with("\\begin{frame}{Hello}"));
/// assert!(output.contains("\\begin{itemize}"));
/// assert!(output.contains("\\tcbox"));
/// # Ok::<(), framer_expand::ExpandError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'a> {
    config: &'a Config,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline.
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Run code, list, section, frame and style expansion over `text`.
    ///
    /// Every call starts from a fresh [`RunContext`].
    pub fn expand(&self, text: &str) -> Result<String, ExpandError> {
        self.expand_with(text, RunContext::new(self.config))
    }

    fn expand_with(&self, text: &str, mut run: RunContext<'_>) -> Result<String, ExpandError> {
        let text = expand_code(text, &mut run.script)?;
        tracing::debug!("Code directives expanded");
        let text = ListExpander::new(&self.config.lists, self.config.poster_mode).process(&text)?;
        tracing::debug!("Lists expanded");
        let text = expand_sections(&text);
        let text = FrameExpander::new().process(&text, &mut run)?;
        tracing::debug!(images = run.images, "Frames expanded");
        Ok(StyleExpander::new(&self.config.highlight, self.config.poster_mode).process(&text))
    }

    /// Assemble `file_name` and write `<stem>.assembled` next to it.
    ///
    /// Returns the path written.
    pub fn assemble_file(&self, base_path: &Path, file_name: &Path) -> Result<PathBuf, ExpandError> {
        let text = Assembler::new(self.config.assemble.max_include_depth)
            .assemble(base_path, file_name)?;
        let target = output_path(base_path, file_name, ASSEMBLED_SUFFIX);
        std::fs::write(&target, text)?;
        tracing::info!(path = %target.display(), "Wrote assembled source");
        Ok(target)
    }

    /// Expand `<stem>.assembled` into `<stem>.expanded.tex`.
    ///
    /// Filter commands run in the document's directory. The assembled file is
    /// removed once the output is written. Returns the path written.
    pub fn expand_file(&self, base_path: &Path, file_name: &Path) -> Result<PathBuf, ExpandError> {
        let source = output_path(base_path, file_name, ASSEMBLED_SUFFIX);
        let text = crate::error::read_source(&source)?;
        let run = match source.parent() {
            Some(dir) => RunContext::new(self.config).with_work_dir(dir),
            None => RunContext::new(self.config),
        };
        let expanded = self.expand_with(&text, run)?;

        let target = output_path(base_path, file_name, EXPANDED_SUFFIX);
        std::fs::write(&target, expanded)?;
        std::fs::remove_file(&source)?;
        tracing::info!(path = %target.display(), "Wrote expanded source");
        Ok(target)
    }

    /// Clean the bibliography referenced by `file_name`.
    pub fn clean_bibliography(&self, base_path: &Path, file_name: &Path) -> Result<String, ExpandError> {
        clean_bibliography(base_path, file_name)
    }
}

/// `<base>/<dir>/<stem>.<suffix>` for the document `file_name`.
#[must_use]
pub fn output_path(base_path: &Path, file_name: &Path, suffix: &str) -> PathBuf {
    let path = base_path.join(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}.{suffix}"))
}
