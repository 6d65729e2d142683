//! Filter parse and check errors

use thiserror::Error;

/// Result type for filter parsing and checking
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors raised while turning filter text into a checked expression
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// Unrecognized character in filter text
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    /// String literal without closing quote
    #[error("unterminated string starting at position {0}")]
    UnterminatedString(usize),

    /// Numeric literal that does not fit its type
    #[error("invalid number '{text}' at position {pos}")]
    InvalidNumber { text: String, pos: usize },

    /// Token out of place
    #[error("unexpected {found} at position {pos}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        pos: usize,
    },

    /// Groups, calls or chained operands nested past the parser's limits
    #[error("filter nested too deeply at position {pos}")]
    TooDeep { pos: usize },

    /// Identifier not in the declarations
    #[error("undeclared identifier '{0}'")]
    UndeclaredIdent(String),

    /// Field not present on a message type
    #[error("unknown field '{field}' on {on}")]
    UnknownField { field: String, on: String },

    /// Function not in the declarations
    #[error("unsupported function '{0}'")]
    UnsupportedFunction(String),

    /// Operand types do not fit the function
    #[error("{0}")]
    TypeMismatch(String),
}
