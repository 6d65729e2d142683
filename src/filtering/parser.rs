//! AIP-160 filter parser
//!
//! Grammar (subset):
//!
//! ```text
//! expression  := sequence { "AND" sequence }
//! sequence    := factor { factor }
//! factor      := term { "OR" term }
//! term        := [ "NOT" | "-" ] simple
//! simple      := "(" expression ")" | restriction
//! restriction := comparable [ comparator arg ]
//! comparable  := member | function | literal
//! ```
//!
//! Juxtaposed factors in a sequence are combined with `AND`.
//!
//! Parenthesised groups and call arguments nest at most `MAX_NESTING` deep,
//! and the resulting tree is at most `MAX_DEPTH` nodes deep.

use std::collections::HashMap;

use super::errors::{FilterError, FilterResult};
use super::expr::{
    Constant, Expr, FUNCTION_AND, FUNCTION_EQUALS, FUNCTION_GREATER_EQUALS,
    FUNCTION_GREATER_THAN, FUNCTION_HAS, FUNCTION_LESS_EQUALS, FUNCTION_LESS_THAN,
    FUNCTION_NOT, FUNCTION_NOT_EQUALS, FUNCTION_OR,
};
use super::lexer::{tokenize, Token, TokenKind};

/// Deepest group or call nesting accepted
pub const MAX_NESTING: usize = 64;

/// Deepest expression tree accepted, counting chained `AND`/`OR` operands
pub const MAX_DEPTH: usize = 256;

/// Parses filter text into an untyped tree. Blank text yields `None`.
pub fn parse(input: &str) -> FilterResult<Option<Expr>> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        cursor: 0,
        next_id: 1,
        nesting: 0,
        depths: HashMap::new(),
    };

    if parser.peek() == &TokenKind::Eof {
        return Ok(None);
    }

    let expr = parser.expression()?;
    parser.expect(TokenKind::Eof, "end of filter")?;
    Ok(Some(expr))
}

struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
    next_id: i64,
    nesting: usize,
    // Depth of every non-leaf node built so far; leaves are depth 1
    depths: HashMap<i64, usize>,
}

impl Parser {
    fn id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn peek(&self) -> &TokenKind {
        &self.tokens[self.cursor].kind
    }

    fn pos(&self) -> usize {
        self.tokens[self.cursor].pos
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.cursor].clone();
        if token.kind != TokenKind::Eof {
            self.cursor += 1;
        }
        token
    }

    fn unexpected(&self, expected: &'static str) -> FilterError {
        FilterError::UnexpectedToken {
            found: self.peek().describe(),
            expected,
            pos: self.pos(),
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> FilterResult<Token> {
        if self.peek() == &kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn too_deep(&self) -> FilterError {
        FilterError::TooDeep { pos: self.pos() }
    }

    fn enter(&mut self) -> FilterResult<()> {
        self.nesting += 1;
        if self.nesting > MAX_NESTING {
            return Err(self.too_deep());
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.nesting -= 1;
    }

    fn depth_of(&self, expr: &Expr) -> usize {
        self.depths.get(&expr.id).copied().unwrap_or(1)
    }

    /// Records `expr` one level above its deepest child
    fn track(&mut self, expr: Expr, child_depth: usize) -> FilterResult<Expr> {
        let depth = child_depth + 1;
        if depth > MAX_DEPTH {
            return Err(self.too_deep());
        }
        self.depths.insert(expr.id, depth);
        Ok(expr)
    }

    fn binary(&mut self, function: &str, lhs: Expr, rhs: Expr) -> FilterResult<Expr> {
        let child_depth = self.depth_of(&lhs).max(self.depth_of(&rhs));
        let id = self.id();
        self.track(Expr::call(id, function, vec![lhs, rhs]), child_depth)
    }

    fn expression(&mut self) -> FilterResult<Expr> {
        let mut lhs = self.sequence()?;
        while self.peek() == &TokenKind::And {
            self.advance();
            let rhs = self.sequence()?;
            lhs = self.binary(FUNCTION_AND, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn sequence(&mut self) -> FilterResult<Expr> {
        let mut lhs = self.factor()?;
        while !matches!(
            self.peek(),
            TokenKind::And | TokenKind::RParen | TokenKind::Comma | TokenKind::Eof
        ) {
            let rhs = self.factor()?;
            lhs = self.binary(FUNCTION_AND, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> FilterResult<Expr> {
        let mut lhs = self.term()?;
        while self.peek() == &TokenKind::Or {
            self.advance();
            let rhs = self.term()?;
            lhs = self.binary(FUNCTION_OR, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn term(&mut self) -> FilterResult<Expr> {
        if matches!(self.peek(), TokenKind::Not | TokenKind::Minus) {
            self.advance();
            let operand = self.simple()?;
            let child_depth = self.depth_of(&operand);
            let id = self.id();
            return self.track(Expr::call(id, FUNCTION_NOT, vec![operand]), child_depth);
        }
        self.simple()
    }

    fn simple(&mut self) -> FilterResult<Expr> {
        if self.peek() == &TokenKind::LParen {
            self.advance();
            self.enter()?;
            let inner = self.expression()?;
            self.expect(TokenKind::RParen, "')'")?;
            self.leave();
            return Ok(inner);
        }
        self.restriction()
    }

    fn restriction(&mut self) -> FilterResult<Expr> {
        let lhs = self.comparable()?;

        let function = match self.peek() {
            TokenKind::Eq => FUNCTION_EQUALS,
            TokenKind::Ne => FUNCTION_NOT_EQUALS,
            TokenKind::Lt => FUNCTION_LESS_THAN,
            TokenKind::Le => FUNCTION_LESS_EQUALS,
            TokenKind::Gt => FUNCTION_GREATER_THAN,
            TokenKind::Ge => FUNCTION_GREATER_EQUALS,
            TokenKind::Colon => FUNCTION_HAS,
            _ => return Ok(lhs),
        };
        self.advance();

        let rhs = if function == FUNCTION_HAS {
            self.field_name()?
        } else {
            self.arg()?
        };
        self.binary(function, lhs, rhs)
    }

    /// Right-hand side of `:`, a bare or quoted field name
    fn field_name(&mut self) -> FilterResult<Expr> {
        let name = match self.peek().clone() {
            TokenKind::Ident(name) | TokenKind::Str(name) | TokenKind::Number(name) => name,
            _ => return Err(self.unexpected("field name")),
        };
        self.advance();
        let id = self.id();
        Ok(Expr::constant(id, Constant::String(name)))
    }

    /// Right-hand side of a comparator
    fn arg(&mut self) -> FilterResult<Expr> {
        if self.peek() == &TokenKind::Minus {
            let pos = self.pos();
            self.advance();
            return match self.peek().clone() {
                TokenKind::Number(text) => {
                    self.advance();
                    let value = number(&format!("-{}", text), pos)?;
                    let id = self.id();
                    Ok(Expr::constant(id, value))
                }
                _ => Err(self.unexpected("number")),
            };
        }
        self.comparable()
    }

    fn comparable(&mut self) -> FilterResult<Expr> {
        let pos = self.pos();
        match self.peek().clone() {
            TokenKind::Str(text) => {
                self.advance();
                let id = self.id();
                Ok(Expr::constant(id, Constant::String(text)))
            }
            TokenKind::Number(text) => {
                self.advance();
                let value = number(&text, pos)?;
                let id = self.id();
                Ok(Expr::constant(id, value))
            }
            TokenKind::Ident(name) => {
                self.advance();
                match name.as_str() {
                    "true" => {
                        let id = self.id();
                        Ok(Expr::constant(id, Constant::Bool(true)))
                    }
                    "false" => {
                        let id = self.id();
                        Ok(Expr::constant(id, Constant::Bool(false)))
                    }
                    _ if self.peek() == &TokenKind::LParen => self.function(name),
                    _ => self.member(name),
                }
            }
            _ => Err(self.unexpected("field, function or literal")),
        }
    }

    fn member(&mut self, name: String) -> FilterResult<Expr> {
        let id = self.id();
        let mut expr = Expr::ident(id, name);
        while self.peek() == &TokenKind::Dot {
            self.advance();
            let field = match self.peek().clone() {
                TokenKind::Ident(field) => field,
                _ => return Err(self.unexpected("field name")),
            };
            self.advance();
            let child_depth = self.depth_of(&expr);
            let id = self.id();
            expr = self.track(Expr::select(id, expr, field), child_depth)?;
        }
        Ok(expr)
    }

    fn function(&mut self, name: String) -> FilterResult<Expr> {
        self.expect(TokenKind::LParen, "'('")?;
        self.enter()?;
        let mut args = Vec::new();
        if self.peek() != &TokenKind::RParen {
            loop {
                args.push(self.arg()?);
                if self.peek() != &TokenKind::Comma {
                    break;
                }
                self.advance();
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        self.leave();

        let function = if name == "has" {
            FUNCTION_HAS.to_string()
        } else {
            name
        };
        let child_depth = args.iter().map(|a| self.depth_of(a)).max().unwrap_or(0);
        let id = self.id();
        self.track(Expr::call(id, function, args), child_depth)
    }
}

/// Types a numeric literal: `u` suffix is uint64, a fraction or exponent is double
fn number(text: &str, pos: usize) -> FilterResult<Constant> {
    let invalid = || FilterError::InvalidNumber {
        text: text.to_string(),
        pos,
    };

    if let Some(digits) = text.strip_suffix('u') {
        return digits.parse().map(Constant::Uint64).map_err(|_| invalid());
    }
    if text.contains(['.', 'e', 'E']) {
        return text.parse().map(Constant::Double).map_err(|_| invalid());
    }
    text.parse().map(Constant::Int64).map_err(|_| invalid())
}
