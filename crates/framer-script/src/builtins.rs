//! Builtin functions callable from scripts.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::{ScriptError, Value};

/// Call the builtin `name` with already evaluated arguments.
///
/// `registers` is the script context, read by `get`.
pub(crate) fn call(
    name: &str,
    args: Vec<Value>,
    registers: &BTreeMap<String, Value>,
) -> Result<Value, ScriptError> {
    match name {
        "str" => {
            let [value] = exact::<1>(name, args)?;
            Ok(Value::Str(value.to_string()))
        }
        "int" => {
            let [value] = exact::<1>(name, args)?;
            to_int(&value)
        }
        "len" => {
            let [value] = exact::<1>(name, args)?;
            let text = expect_str(name, &value)?;
            Ok(Value::Int(i64::try_from(text.chars().count()).unwrap_or(i64::MAX)))
        }
        "upper" => {
            let [value] = exact::<1>(name, args)?;
            Ok(Value::Str(expect_str(name, &value)?.to_uppercase()))
        }
        "lower" => {
            let [value] = exact::<1>(name, args)?;
            Ok(Value::Str(expect_str(name, &value)?.to_lowercase()))
        }
        "min" => extremum(name, args, Ordering::Less),
        "max" => extremum(name, args, Ordering::Greater),
        "if" => {
            let [cond, then, otherwise] = exact::<3>(name, args)?;
            Ok(if cond.is_truthy() { then } else { otherwise })
        }
        "get" => {
            let [key, default] = exact::<2>(name, args)?;
            let key = expect_str(name, &key)?;
            Ok(registers.get(key).cloned().unwrap_or(default))
        }
        "roman" => {
            let [value] = exact::<1>(name, args)?;
            match value {
                Value::Int(n) if (1..=3999).contains(&n) => Ok(Value::Str(roman(n))),
                other => Err(ScriptError::Type(format!(
                    "roman expects an int between 1 and 3999, got {other}"
                ))),
            }
        }
        _ => Err(ScriptError::UnknownFunction(name.to_owned())),
    }
}

fn exact<const N: usize>(name: &str, args: Vec<Value>) -> Result<[Value; N], ScriptError> {
    let got = args.len();
    args.try_into().map_err(|_| ScriptError::Arity {
        name: name.to_owned(),
        expected: N.to_string(),
        got,
    })
}

fn expect_str<'a>(name: &str, value: &'a Value) -> Result<&'a str, ScriptError> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(ScriptError::Type(format!(
            "{name} expects a string, got {}",
            other.type_name()
        ))),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_int(value: &Value) -> Result<Value, ScriptError> {
    match value {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Float(x) => Ok(Value::Int(x.trunc() as i64)),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::Str(s) => s
            .trim()
            .parse()
            .map(Value::Int)
            .map_err(|_| ScriptError::Type(format!("cannot convert '{s}' to int"))),
    }
}

fn extremum(name: &str, args: Vec<Value>, keep: Ordering) -> Result<Value, ScriptError> {
    let mut iter = args.into_iter();
    let Some(mut best) = iter.next() else {
        return Err(ScriptError::Arity {
            name: name.to_owned(),
            expected: "at least 1".to_owned(),
            got: 0,
        });
    };
    for candidate in iter {
        if candidate.compare(&best)? == keep {
            best = candidate;
        }
    }
    Ok(best)
}

fn roman(mut n: i64) -> String {
    const NUMERALS: [(i64, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut out = String::new();
    for (value, numeral) in NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}
