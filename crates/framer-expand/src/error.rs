//! Expansion error types.

use std::io;
use std::path::PathBuf;

use framer_script::ScriptError;

/// Error returned by the expansion pipeline.
///
/// Every variant is fatal: the pipeline stops at the first error and keeps
/// no partial result.
#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
    /// Input, include or bibliography file is absent.
    #[error("file not found: {}", path.display())]
    MissingFile {
        /// Path that was looked up.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Document has no `\bibliography{...}` reference.
    #[error("no \\bibliography{{...}} reference in {}", .0.display())]
    MissingBibliographyReference(PathBuf),

    /// Include nesting went past the configured limit.
    #[error("include depth limit ({depth}) exceeded at {}", path.display())]
    IncludeDepthExceeded {
        /// Include that would have exceeded the limit.
        path: PathBuf,
        /// Configured limit.
        depth: usize,
    },

    /// Frame marker names a builder that does not exist.
    #[error("line {line}: builder `{name}` not found")]
    UnknownBuilder {
        /// Builder identifier from the marker.
        name: String,
        /// 1-based line of the marker.
        line: usize,
    },

    /// List or frame block left open, or list indentation that cannot be
    /// unwound.
    #[error("line {line}: {what}")]
    UnclosedStructure {
        /// Description of the open structure.
        what: String,
        /// 1-based line where the problem was detected.
        line: usize,
    },

    /// Embedded script failed.
    #[error("line {line}: script error: {source}")]
    Script {
        /// 1-based line of the directive.
        line: usize,
        /// Interpreter error.
        source: ScriptError,
    },

    /// External filter could not run to completion.
    #[error("filter `{command}` failed: {message}")]
    Filter {
        /// Shell command line of the filter.
        command: String,
        /// What went wrong.
        message: String,
    },

    /// I/O error while writing results.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ExpandError {
    pub(crate) fn unclosed(what: impl Into<String>, line: usize) -> Self {
        Self::UnclosedStructure {
            what: what.into(),
            line,
        }
    }
}

/// Read a source file, mapping a missing file to [`ExpandError::MissingFile`].
pub(crate) fn read_source(path: &std::path::Path) -> Result<String, ExpandError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ExpandError::MissingFile {
                path: path.to_path_buf(),
                source,
            }
        } else {
            ExpandError::Io(source)
        }
    })
}
