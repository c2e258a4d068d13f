//! Per-run state threaded through the expansion stages.

use std::path::Path;

use framer_config::Config;
use framer_script::ScriptContext;

use crate::frame::ColumnBoxStack;

/// State shared by the stages of one pipeline run.
///
/// Created fresh for every run so that nothing leaks between documents.
#[derive(Debug)]
pub struct RunContext<'a> {
    /// Settings for this run.
    pub config: &'a Config,
    /// Registers seen by every `%$` directive.
    pub script: ScriptContext,
    /// Dashboard boxes placed so far, by column.
    pub columns: ColumnBoxStack,
    /// Number of images generated by the default filter.
    pub images: usize,
    /// Directory filter commands run in; the current directory when unset.
    pub work_dir: Option<&'a Path>,
}

impl<'a> RunContext<'a> {
    /// Create a context for one run; the `poster` register reflects the
    /// configured mode.
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        let mut script = ScriptContext::new();
        script.set("poster", config.poster_mode);
        Self {
            config,
            script,
            columns: ColumnBoxStack::default(),
            images: 0,
            work_dir: None,
        }
    }

    /// Run filter commands in `dir`. An empty path keeps the current
    /// directory.
    #[must_use]
    pub fn with_work_dir(mut self, dir: &'a Path) -> Self {
        self.work_dir = (!dir.as_os_str().is_empty()).then_some(dir);
        self
    }

    /// Advance the image counter and return the next image name.
    pub fn next_image(&mut self) -> String {
        self.images += 1;
        format!("{}{}", self.config.filter.image_prefix, self.images)
    }
}
