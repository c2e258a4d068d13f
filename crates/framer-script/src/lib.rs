//! Small expression language for framer line scripts.
//!
//! Scripts are embedded in documents as `%$` directives and run against a
//! [`ScriptContext`] that lives for a whole pipeline run, so later scripts see
//! the registers written by earlier ones.
//!
//! # Language
//!
//! - Statements separated by `;`: `name = expr`, `name += expr`,
//!   `name -= expr`, or a bare expression
//! - Operators: `or`/`||`, `and`/`&&`, `== != < <= > >=`, `+ -`, `* / %`,
//!   unary `-` and `not`/`!`
//! - Literals: integers, floats, `"strings"`, `'strings'`, `true`, `false`
//! - Builtins: `str`, `int`, `len`, `upper`, `lower`, `min`, `max`, `if`,
//!   `get`, `roman`
//!
//! # Example
//!
//! ```
//! use framer_script::{ScriptContext, Value};
//!
//! let mut ctx = ScriptContext::new();
//! ctx.run("slide = 1").unwrap();
//! ctx.run("slide += 1").unwrap();
//!
//! let result = ctx.run(r#""Slide " + str(slide)"#).unwrap();
//! assert_eq!(result, Some(Value::from("Slide 2")));
//! ```

mod builtins;
mod context;
mod error;
mod lexer;
mod parser;
mod value;

pub use context::ScriptContext;
pub use error::ScriptError;
pub use value::Value;
