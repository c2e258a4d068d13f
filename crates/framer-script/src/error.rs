//! Script error type.

/// Error raised while parsing or evaluating a script.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptError {
    /// Malformed script text.
    #[error("syntax error at offset {offset}: {message}")]
    Syntax {
        /// Byte offset into the script.
        offset: usize,
        /// What was expected or found.
        message: String,
    },
    /// A name was read before anything assigned it.
    #[error("unknown name `{0}`")]
    UnknownName(String),
    /// Call to a function that is not a builtin.
    #[error("unknown function `{0}`")]
    UnknownFunction(String),
    /// Builtin called with the wrong number of arguments.
    #[error("`{name}` expects {expected} argument(s), got {got}")]
    Arity {
        /// Builtin name.
        name: String,
        /// Accepted argument count, e.g. "1" or "at least 1".
        expected: String,
        /// Number of arguments passed.
        got: usize,
    },
    /// Operand or argument of the wrong type.
    #[error("type error: {0}")]
    Type(String),
    /// Division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,
}

impl ScriptError {
    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }
}
