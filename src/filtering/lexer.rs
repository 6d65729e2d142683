//! Filter text tokenizer

use super::errors::{FilterError, FilterResult};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Str(String),
    /// Numeric literal text, typed by the parser
    Number(String),
    And,
    Or,
    Not,
    Minus,
    LParen,
    RParen,
    Comma,
    Dot,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Colon,
    Eof,
}

impl TokenKind {
    /// Human-readable token description for error messages
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(s) => format!("identifier '{}'", s),
            TokenKind::Str(s) => format!("string {:?}", s),
            TokenKind::Number(s) => format!("number {}", s),
            TokenKind::And => "AND".into(),
            TokenKind::Or => "OR".into(),
            TokenKind::Not => "NOT".into(),
            TokenKind::Minus => "'-'".into(),
            TokenKind::LParen => "'('".into(),
            TokenKind::RParen => "')'".into(),
            TokenKind::Comma => "','".into(),
            TokenKind::Dot => "'.'".into(),
            TokenKind::Eq => "'='".into(),
            TokenKind::Ne => "'!='".into(),
            TokenKind::Lt => "'<'".into(),
            TokenKind::Le => "'<='".into(),
            TokenKind::Gt => "'>'".into(),
            TokenKind::Ge => "'>='".into(),
            TokenKind::Colon => "':'".into(),
            TokenKind::Eof => "end of filter".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Character offset of the first character
    pub pos: usize,
}

/// Splits filter text into tokens, ending with `Eof`
pub fn tokenize(input: &str) -> FilterResult<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let start = i;

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let kind = match c {
            '(' => {
                i += 1;
                TokenKind::LParen
            }
            ')' => {
                i += 1;
                TokenKind::RParen
            }
            ',' => {
                i += 1;
                TokenKind::Comma
            }
            '.' => {
                i += 1;
                TokenKind::Dot
            }
            ':' => {
                i += 1;
                TokenKind::Colon
            }
            '-' => {
                i += 1;
                TokenKind::Minus
            }
            '=' => {
                i += 1;
                TokenKind::Eq
            }
            '!' if chars.get(i + 1) == Some(&'=') => {
                i += 2;
                TokenKind::Ne
            }
            '<' if chars.get(i + 1) == Some(&'=') => {
                i += 2;
                TokenKind::Le
            }
            '<' => {
                i += 1;
                TokenKind::Lt
            }
            '>' if chars.get(i + 1) == Some(&'=') => {
                i += 2;
                TokenKind::Ge
            }
            '>' => {
                i += 1;
                TokenKind::Gt
            }
            '"' | '\'' => {
                let (text, next) = read_string(&chars, i)?;
                i = next;
                TokenKind::Str(text)
            }
            c if c.is_ascii_digit() => {
                let next = read_number(&chars, i);
                let text: String = chars[i..next].iter().collect();
                i = next;
                TokenKind::Number(text)
            }
            c if c.is_alphabetic() || c == '_' => {
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                match word.as_str() {
                    "AND" => TokenKind::And,
                    "OR" => TokenKind::Or,
                    "NOT" => TokenKind::Not,
                    _ => TokenKind::Ident(word),
                }
            }
            other => {
                return Err(FilterError::UnexpectedChar {
                    ch: other,
                    pos: start,
                })
            }
        };

        tokens.push(Token { kind, pos: start });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        pos: chars.len(),
    });
    Ok(tokens)
}

/// Reads a quoted string starting at `start`; returns the text and the next offset
fn read_string(chars: &[char], start: usize) -> FilterResult<(String, usize)> {
    let quote = chars[start];
    let mut out = String::new();
    let mut i = start + 1;

    while i < chars.len() {
        match chars[i] {
            '\\' if i + 1 < chars.len() => {
                let escaped = chars[i + 1];
                out.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => other,
                });
                i += 2;
            }
            c if c == quote => return Ok((out, i + 1)),
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    Err(FilterError::UnterminatedString(start))
}

/// Scans digits, an optional fraction, an optional exponent and an optional `u` suffix
fn read_number(chars: &[char], start: usize) -> usize {
    let mut i = start;
    let digits = |i: &mut usize| {
        while *i < chars.len() && chars[*i].is_ascii_digit() {
            *i += 1;
        }
    };

    digits(&mut i);
    if i + 1 < chars.len() && chars[i] == '.' && chars[i + 1].is_ascii_digit() {
        i += 1;
        digits(&mut i);
    }
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            i = j;
            digits(&mut i);
        }
    }
    if i < chars.len() && chars[i] == 'u' {
        i += 1;
    }
    i
}
