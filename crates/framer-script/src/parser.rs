//! Recursive-descent parser producing the statement tree.

use crate::lexer::{Token, TokenKind, tokenize};
use crate::{ScriptError, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AssignOp {
    Set,
    Add,
    Sub,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Literal(Value),
    Name(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Stmt {
    Assign {
        name: String,
        op: AssignOp,
        value: Expr,
    },
    Expr(Expr),
}

const KEYWORDS: [&str; 5] = ["and", "or", "not", "true", "false"];

/// Deepest expression tree the parser builds. Evaluation recurses over the
/// tree, so this also bounds the evaluator's stack use.
const MAX_DEPTH: usize = 128;

/// Parse script source into a list of statements.
pub(crate) fn parse(src: &str) -> Result<Vec<Stmt>, ScriptError> {
    let tokens = tokenize(src)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    parser.program()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn peek_at(&self, ahead: usize) -> &TokenKind {
        let idx = (self.pos + ahead).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn offset(&self) -> usize {
        self.tokens[self.pos].offset
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.tokens[self.pos].kind.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if matches!(self.peek(), TokenKind::Ident(name) if name == keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<(), ScriptError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(ScriptError::syntax(self.offset(), format!("expected {what}")))
        }
    }

    /// Go one level deeper; the caller restores `depth` when done.
    fn enter(&mut self) -> Result<(), ScriptError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ScriptError::syntax(
                self.offset(),
                format!("expression nested deeper than {MAX_DEPTH} levels"),
            ));
        }
        Ok(())
    }

    fn program(&mut self) -> Result<Vec<Stmt>, ScriptError> {
        let mut stmts = Vec::new();
        loop {
            while self.eat(&TokenKind::Semi) {}
            if *self.peek() == TokenKind::Eof {
                return Ok(stmts);
            }
            stmts.push(self.statement()?);
            if *self.peek() != TokenKind::Eof {
                self.expect(&TokenKind::Semi, "';' between statements")?;
            }
        }
    }

    fn statement(&mut self) -> Result<Stmt, ScriptError> {
        if let TokenKind::Ident(name) = self.peek().clone() {
            let op = match self.peek_at(1) {
                TokenKind::Assign => Some(AssignOp::Set),
                TokenKind::PlusAssign => Some(AssignOp::Add),
                TokenKind::MinusAssign => Some(AssignOp::Sub),
                _ => None,
            };
            if let Some(op) = op {
                if KEYWORDS.contains(&name.as_str()) {
                    return Err(ScriptError::syntax(
                        self.offset(),
                        format!("cannot assign to keyword '{name}'"),
                    ));
                }
                self.advance();
                self.advance();
                let value = self.expression()?;
                return Ok(Stmt::Assign { name, op, value });
            }
        }
        Ok(Stmt::Expr(self.expression()?))
    }

    fn expression(&mut self) -> Result<Expr, ScriptError> {
        let depth = self.depth;
        self.enter()?;
        let expr = self.or()?;
        self.depth = depth;
        Ok(expr)
    }

    // Each operator of a chain nests the tree one level, so the binary
    // levels count it against the depth limit too.

    fn or(&mut self) -> Result<Expr, ScriptError> {
        let depth = self.depth;
        let mut lhs = self.and()?;
        while self.eat(&TokenKind::OrOr) || self.eat_keyword("or") {
            self.enter()?;
            let rhs = self.and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        self.depth = depth;
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr, ScriptError> {
        let depth = self.depth;
        let mut lhs = self.comparison()?;
        while self.eat(&TokenKind::AndAnd) || self.eat_keyword("and") {
            self.enter()?;
            let rhs = self.comparison()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        self.depth = depth;
        Ok(lhs)
    }

    fn comparison(&mut self) -> Result<Expr, ScriptError> {
        let depth = self.depth;
        let mut lhs = self.additive()?;
        loop {
            let op = match self.peek() {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Le => BinaryOp::Le,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::Ge => BinaryOp::Ge,
                _ => break,
            };
            self.advance();
            self.enter()?;
            let rhs = self.additive()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.depth = depth;
        Ok(lhs)
    }

    fn additive(&mut self) -> Result<Expr, ScriptError> {
        let depth = self.depth;
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            self.enter()?;
            let rhs = self.multiplicative()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.depth = depth;
        Ok(lhs)
    }

    fn multiplicative(&mut self) -> Result<Expr, ScriptError> {
        let depth = self.depth;
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => break,
            };
            self.advance();
            self.enter()?;
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.depth = depth;
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ScriptError> {
        let op = if self.eat(&TokenKind::Minus) {
            UnaryOp::Neg
        } else if self.eat(&TokenKind::Bang) || self.eat_keyword("not") {
            UnaryOp::Not
        } else {
            return self.primary();
        };
        let depth = self.depth;
        self.enter()?;
        let operand = self.unary()?;
        self.depth = depth;
        Ok(Expr::Unary(op, Box::new(operand)))
    }

    fn primary(&mut self) -> Result<Expr, ScriptError> {
        let offset = self.offset();
        match self.advance() {
            TokenKind::Int(n) => Ok(Expr::Literal(Value::Int(n))),
            TokenKind::Float(x) => Ok(Expr::Literal(Value::Float(x))),
            TokenKind::Str(s) => Ok(Expr::Literal(Value::Str(s))),
            TokenKind::Ident(name) => match name.as_str() {
                "true" => Ok(Expr::Literal(Value::Bool(true))),
                "false" => Ok(Expr::Literal(Value::Bool(false))),
                "and" | "or" | "not" => Err(ScriptError::syntax(
                    offset,
                    format!("unexpected keyword '{name}'"),
                )),
                _ if self.eat(&TokenKind::LParen) => {
                    let args = self.arguments()?;
                    Ok(Expr::Call(name, args))
                }
                _ => Ok(Expr::Name(name)),
            },
            TokenKind::LParen => {
                let inner = self.expression()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::Eof => Err(ScriptError::syntax(offset, "unexpected end of script")),
            other => Err(ScriptError::syntax(
                offset,
                format!("expected expression, found {other:?}"),
            )),
        }
    }

    /// Parse call arguments after the opening parenthesis.
    fn arguments(&mut self) -> Result<Vec<Expr>, ScriptError> {
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            if self.eat(&TokenKind::RParen) {
                return Ok(args);
            }
            self.expect(&TokenKind::Comma, "',' or ')'")?;
        }
    }
}
