//! Script values.

use std::cmp::Ordering;
use std::fmt;

use crate::ScriptError;

/// A value held in a script register or produced by an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Text.
    Str(String),
    /// Boolean.
    Bool(bool),
}

impl Value {
    /// Name of the value's type, for error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Bool(_) => "bool",
        }
    }

    /// Truthiness used by `and`, `or`, `not` and `if`.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Int(n) => *n != 0,
            Self::Float(f) => *f != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::Bool(b) => *b,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub(crate) fn add(&self, rhs: &Self) -> Result<Self, ScriptError> {
        match (self, rhs) {
            (Self::Str(_), _) | (_, Self::Str(_)) => Ok(Self::Str(format!("{self}{rhs}"))),
            (Self::Int(a), Self::Int(b)) => a.checked_add(*b).map(Self::Int).ok_or_else(overflow),
            _ => self.float_op(rhs, "+", |a, b| a + b),
        }
    }

    pub(crate) fn sub(&self, rhs: &Self) -> Result<Self, ScriptError> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => a.checked_sub(*b).map(Self::Int).ok_or_else(overflow),
            _ => self.float_op(rhs, "-", |a, b| a - b),
        }
    }

    pub(crate) fn mul(&self, rhs: &Self) -> Result<Self, ScriptError> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => a.checked_mul(*b).map(Self::Int).ok_or_else(overflow),
            _ => self.float_op(rhs, "*", |a, b| a * b),
        }
    }

    pub(crate) fn div(&self, rhs: &Self) -> Result<Self, ScriptError> {
        match (self, rhs) {
            (Self::Int(_), Self::Int(0)) => Err(ScriptError::DivisionByZero),
            (Self::Int(a), Self::Int(b)) => a.checked_div(*b).map(Self::Int).ok_or_else(overflow),
            _ => {
                if rhs.as_f64() == Some(0.0) {
                    return Err(ScriptError::DivisionByZero);
                }
                self.float_op(rhs, "/", |a, b| a / b)
            }
        }
    }

    pub(crate) fn rem(&self, rhs: &Self) -> Result<Self, ScriptError> {
        match (self, rhs) {
            (Self::Int(_), Self::Int(0)) => Err(ScriptError::DivisionByZero),
            (Self::Int(a), Self::Int(b)) => a.checked_rem(*b).map(Self::Int).ok_or_else(overflow),
            _ => Err(ScriptError::Type(format!(
                "cannot apply % to {} and {}",
                self.type_name(),
                rhs.type_name()
            ))),
        }
    }

    pub(crate) fn neg(&self) -> Result<Self, ScriptError> {
        match self {
            Self::Int(n) => n.checked_neg().map(Self::Int).ok_or_else(overflow),
            Self::Float(f) => Ok(Self::Float(-f)),
            _ => Err(ScriptError::Type(format!("cannot negate {}", self.type_name()))),
        }
    }

    /// Equality with int/float coercion; values of unrelated types are unequal.
    pub(crate) fn loose_eq(&self, rhs: &Self) -> bool {
        match (self.as_f64(), rhs.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => self == rhs,
        }
    }

    pub(crate) fn compare(&self, rhs: &Self) -> Result<Ordering, ScriptError> {
        if let (Self::Str(a), Self::Str(b)) = (self, rhs) {
            return Ok(a.cmp(b));
        }
        match (self.as_f64(), rhs.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).ok_or_else(|| {
                ScriptError::Type("cannot order NaN".to_owned())
            }),
            _ => Err(ScriptError::Type(format!(
                "cannot compare {} with {}",
                self.type_name(),
                rhs.type_name()
            ))),
        }
    }

    fn float_op(
        &self,
        rhs: &Self,
        op: &str,
        apply: impl Fn(f64, f64) -> f64,
    ) -> Result<Self, ScriptError> {
        match (self.as_f64(), rhs.as_f64()) {
            (Some(a), Some(b)) => Ok(Self::Float(apply(a, b))),
            _ => Err(ScriptError::Type(format!(
                "cannot apply {op} to {} and {}",
                self.type_name(),
                rhs.type_name()
            ))),
        }
    }
}

fn overflow() -> ScriptError {
    ScriptError::Type("integer overflow".to_owned())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}
