//! Expansion of compact slide markup into LaTeX.
//!
//! The pipeline runs in a fixed order, each stage consuming the full text of
//! the previous one:
//!
//! 1. [`Assembler`] splices `\input{...}` files into one document.
//! 2. [`expand_code`] runs `%$` script directives.
//! 3. [`ListExpander`] turns indented bullets into list environments.
//! 4. [`expand_sections`] and [`FrameExpander`] turn markers into frames,
//!    dashboard boxes or filter output.
//! 5. [`StyleExpander`] turns `~text~` spans into highlight boxes.
//!
//! [`clean_bibliography`] is independent of the others.
//!
//! # Example
//!
//! ```
//! use framer_config::Config;
//! use framer_expand::Pipeline;
//!
//! let config = Config::default();
//! let latex = Pipeline::new(&config).expand("--- Welcome\nHi ~there~\n---")?;
//!
//! assert!(latex.starts_with("\\begin{frame}{Welcome}"));
//! assert!(latex.ends_with("\\end{frame}"));
//! # Ok::<(), framer_expand::ExpandError>(())
//! ```

mod assemble;
mod bibliography;
mod code;
mod context;
mod error;
mod frame;
mod list;
mod pipeline;
mod style;

pub use assemble::Assembler;
pub use bibliography::{clean_bibliography, normalize_entries};
pub use code::expand_code;
pub use context::RunContext;
pub use error::ExpandError;
pub use frame::{
    BuilderArgs, BuilderKind, ColumnBoxStack, FrameExpander, Placement, expand_sections,
};
pub use list::{ListExpander, NestingKind};
pub use pipeline::{ASSEMBLED_SUFFIX, EXPANDED_SUFFIX, Pipeline, output_path};
pub use style::StyleExpander;
