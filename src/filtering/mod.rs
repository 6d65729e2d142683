//! AIP-160 filtering
//!
//! Turns filter text into a `CheckedExpr`: a tree of
//! `Ident | Select | Const | Call` nodes plus a type for every node id.
//!
//! # Usage
//!
//! ```ignore
//! use filterstore::filtering::{parse_filter, Declarations, Type};
//!
//! let decls = Declarations::new().with_ident("age", Type::Int64);
//! let checked = parse_filter("age > 30", &decls)?;
//! ```

mod checker;
mod declarations;
mod errors;
mod expr;
mod lexer;
mod parser;

pub use checker::check;
pub use declarations::{standard_functions, Declarations};
pub use errors::{FilterError, FilterResult};
pub use expr::{
    CheckedExpr, Constant, Expr, ExprKind, Type, FUNCTION_AND, FUNCTION_EQUALS,
    FUNCTION_GREATER_EQUALS, FUNCTION_GREATER_THAN, FUNCTION_HAS, FUNCTION_LESS_EQUALS,
    FUNCTION_LESS_THAN, FUNCTION_NOT, FUNCTION_NOT_EQUALS, FUNCTION_OR, RELATIONAL_FUNCTIONS,
};
pub use parser::parse;

/// Parses and type-checks filter text against the declarations
pub fn parse_filter(text: &str, declarations: &Declarations) -> FilterResult<CheckedExpr> {
    check(parse(text)?, declarations)
}
