//! Script tokenizer.

use crate::ScriptError;

/// Token kinds produced by [`tokenize`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    PlusAssign,
    MinusAssign,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
    Bang,
    LParen,
    RParen,
    Comma,
    Semi,
    Eof,
}

/// A token with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

/// Split script source into tokens, ending with [`TokenKind::Eof`].
pub(crate) fn tokenize(src: &str) -> Result<Vec<Token>, ScriptError> {
    let chars: Vec<(usize, char)> = src.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() {
            let (kind, next) = lex_number(src, &chars, i)?;
            tokens.push(Token { kind, offset });
            i = next;
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].1.is_alphanumeric() || chars[i].1 == '_') {
                i += 1;
            }
            let end = chars.get(i).map_or(src.len(), |&(o, _)| o);
            tokens.push(Token {
                kind: TokenKind::Ident(src[chars[start].0..end].to_owned()),
                offset,
            });
            continue;
        }

        if c == '"' || c == '\'' {
            let (text, next) = lex_string(&chars, i)?;
            tokens.push(Token {
                kind: TokenKind::Str(text),
                offset,
            });
            i = next;
            continue;
        }

        let next = chars.get(i + 1).map(|&(_, c)| c);
        let (kind, width) = match (c, next) {
            ('+', Some('=')) => (TokenKind::PlusAssign, 2),
            ('-', Some('=')) => (TokenKind::MinusAssign, 2),
            ('=', Some('=')) => (TokenKind::EqEq, 2),
            ('!', Some('=')) => (TokenKind::NotEq, 2),
            ('<', Some('=')) => (TokenKind::Le, 2),
            ('>', Some('=')) => (TokenKind::Ge, 2),
            ('&', Some('&')) => (TokenKind::AndAnd, 2),
            ('|', Some('|')) => (TokenKind::OrOr, 2),
            ('+', _) => (TokenKind::Plus, 1),
            ('-', _) => (TokenKind::Minus, 1),
            ('*', _) => (TokenKind::Star, 1),
            ('/', _) => (TokenKind::Slash, 1),
            ('%', _) => (TokenKind::Percent, 1),
            ('=', _) => (TokenKind::Assign, 1),
            ('<', _) => (TokenKind::Lt, 1),
            ('>', _) => (TokenKind::Gt, 1),
            ('!', _) => (TokenKind::Bang, 1),
            ('(', _) => (TokenKind::LParen, 1),
            (')', _) => (TokenKind::RParen, 1),
            (',', _) => (TokenKind::Comma, 1),
            (';', _) => (TokenKind::Semi, 1),
            _ => {
                return Err(ScriptError::syntax(
                    offset,
                    format!("unexpected character '{c}'"),
                ));
            }
        };
        tokens.push(Token { kind, offset });
        i += width;
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        offset: src.len(),
    });
    Ok(tokens)
}

/// Lex an integer or float starting at `start`; returns the kind and next index.
fn lex_number(
    src: &str,
    chars: &[(usize, char)],
    start: usize,
) -> Result<(TokenKind, usize), ScriptError> {
    let digit_at = |i: usize| chars.get(i).is_some_and(|&(_, c)| c.is_ascii_digit());

    let mut i = start;
    while digit_at(i) {
        i += 1;
    }
    let is_float = chars.get(i).is_some_and(|&(_, c)| c == '.') && digit_at(i + 1);
    if is_float {
        i += 1;
        while digit_at(i) {
            i += 1;
        }
    }

    let offset = chars[start].0;
    let end = chars.get(i).map_or(src.len(), |&(o, _)| o);
    let text = &src[offset..end];

    let kind = if is_float {
        text.parse()
            .map(TokenKind::Float)
            .map_err(|_| ScriptError::syntax(offset, format!("invalid number '{text}'")))?
    } else {
        text.parse()
            .map(TokenKind::Int)
            .map_err(|_| ScriptError::syntax(offset, format!("integer '{text}' out of range")))?
    };
    Ok((kind, i))
}

/// Lex a quoted string starting at the opening quote.
///
/// Known escapes are `\n`, `\t`, `\\` and the quote characters; any other
/// backslash is kept so LaTeX commands survive unchanged.
fn lex_string(chars: &[(usize, char)], start: usize) -> Result<(String, usize), ScriptError> {
    let (offset, quote) = chars[start];
    let mut text = String::new();
    let mut i = start + 1;

    while let Some(&(_, c)) = chars.get(i) {
        if c == quote {
            return Ok((text, i + 1));
        }
        if c == '\\' {
            match chars.get(i + 1).map(|&(_, c)| c) {
                Some('n') => text.push('\n'),
                Some('t') => text.push('\t'),
                Some(e @ ('\\' | '"' | '\'')) => text.push(e),
                Some(other) => {
                    text.push('\\');
                    text.push(other);
                }
                None => break,
            }
            i += 2;
            continue;
        }
        text.push(c);
        i += 1;
    }

    Err(ScriptError::syntax(offset, "unterminated string"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_assignment_tokens() {
        assert_eq!(
            kinds("count += 2"),
            vec![
                TokenKind::Ident("count".to_owned()),
                TokenKind::PlusAssign,
                TokenKind::Int(2),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("3 2.5 10"),
            vec![
                TokenKind::Int(3),
                TokenKind::Float(2.5),
                TokenKind::Int(10),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_trailing_dot_is_not_a_float() {
        let err = tokenize("7.").unwrap_err();
        assert!(matches!(err, ScriptError::Syntax { offset: 1, .. }));
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#""a\"b\n" '\section'"#),
            vec![
                TokenKind::Str("a\"b\n".to_owned()),
                TokenKind::Str("\\section".to_owned()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_two_char_operators() {
        assert_eq!(
            kinds("<= >= == != && ||"),
            vec![
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_offsets() {
        let tokens = tokenize("a = 1").unwrap();
        let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, vec![0, 2, 4, 5]);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("x = \"abc").unwrap_err();
        assert_eq!(err, ScriptError::syntax(4, "unterminated string"));
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("a @ b").unwrap_err();
        assert!(matches!(err, ScriptError::Syntax { offset: 2, .. }));
    }

    #[test]
    fn test_integer_out_of_range() {
        assert!(tokenize("99999999999999999999").is_err());
    }
}
