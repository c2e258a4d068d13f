//! Script execution context and tree-walking evaluator.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::parser::{AssignOp, BinaryOp, Expr, Stmt, UnaryOp, parse};
use crate::{ScriptError, Value, builtins};

/// Named registers shared by every script in one pipeline run.
///
/// The context is the only state a script can reach. Hosts seed it with
/// values before the run (e.g. `poster`) and scripts add their own counters.
///
/// # Example
///
/// ```
/// use framer_script::{ScriptContext, Value};
///
/// let mut ctx = ScriptContext::new();
/// ctx.set("poster", true);
///
/// let result = ctx.run("if(poster, 'narrow', 'wide')").unwrap();
/// assert_eq!(result, Some(Value::from("narrow")));
/// ```
#[derive(Debug, Default, Clone)]
pub struct ScriptContext {
    registers: BTreeMap<String, Value>,
}

impl ScriptContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a register.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.registers.insert(name.into(), value.into());
    }

    /// Read a register.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.registers.get(name)
    }

    /// Parse and run `source`, returning the value of its last statement.
    ///
    /// Returns `None` for a script without statements. Registers assigned
    /// before an error keep their new values.
    pub fn run(&mut self, source: &str) -> Result<Option<Value>, ScriptError> {
        let stmts = parse(source)?;
        let mut last = None;
        for stmt in &stmts {
            last = Some(self.exec(stmt)?);
        }
        Ok(last)
    }

    fn exec(&mut self, stmt: &Stmt) -> Result<Value, ScriptError> {
        match stmt {
            Stmt::Expr(expr) => self.eval(expr),
            Stmt::Assign { name, op, value } => {
                let rhs = self.eval(value)?;
                let new = match op {
                    AssignOp::Set => rhs,
                    AssignOp::Add => self.lookup(name)?.add(&rhs)?,
                    AssignOp::Sub => self.lookup(name)?.sub(&rhs)?,
                };
                self.registers.insert(name.clone(), new.clone());
                Ok(new)
            }
        }
    }

    fn lookup(&self, name: &str) -> Result<&Value, ScriptError> {
        self.registers
            .get(name)
            .ok_or_else(|| ScriptError::UnknownName(name.to_owned()))
    }

    fn eval(&self, expr: &Expr) -> Result<Value, ScriptError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Name(name) => self.lookup(name).cloned(),
            Expr::Unary(UnaryOp::Neg, operand) => self.eval(operand)?.neg(),
            Expr::Unary(UnaryOp::Not, operand) => Ok(Value::Bool(!self.eval(operand)?.is_truthy())),
            Expr::And(lhs, rhs) => {
                if !self.eval(lhs)?.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.eval(rhs)?.is_truthy()))
            }
            Expr::Or(lhs, rhs) => {
                if self.eval(lhs)?.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.eval(rhs)?.is_truthy()))
            }
            Expr::Binary(op, lhs, rhs) => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                binary(*op, &lhs, &rhs)
            }
            Expr::Call(name, args) => {
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                builtins::call(name, args, &self.registers)
            }
        }
    }
}

fn binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value, ScriptError> {
    match op {
        BinaryOp::Add => lhs.add(rhs),
        BinaryOp::Sub => lhs.sub(rhs),
        BinaryOp::Mul => lhs.mul(rhs),
        BinaryOp::Div => lhs.div(rhs),
        BinaryOp::Rem => lhs.rem(rhs),
        BinaryOp::Eq => Ok(Value::Bool(lhs.loose_eq(rhs))),
        BinaryOp::NotEq => Ok(Value::Bool(!lhs.loose_eq(rhs))),
        BinaryOp::Lt => Ok(Value::Bool(lhs.compare(rhs)? == Ordering::Less)),
        BinaryOp::Le => Ok(Value::Bool(lhs.compare(rhs)? != Ordering::Greater)),
        BinaryOp::Gt => Ok(Value::Bool(lhs.compare(rhs)? == Ordering::Greater)),
        BinaryOp::Ge => Ok(Value::Bool(lhs.compare(rhs)? != Ordering::Less)),
    }
}
