//! Operator mapping
//!
//! Maps a relational function and the current negation to a store operator.
//! Under negation each comparison flips to its logical complement.

use crate::filtering::{
    FUNCTION_EQUALS, FUNCTION_GREATER_EQUALS, FUNCTION_GREATER_THAN, FUNCTION_LESS_EQUALS,
    FUNCTION_LESS_THAN, FUNCTION_NOT_EQUALS,
};
use crate::store::Operator;

use super::errors::{TranspileError, TranspileResult};

/// Returns the store operator for `function`, complemented when `negate`
pub fn operator(function: &str, negate: bool) -> TranspileResult<Operator> {
    let base = match function {
        FUNCTION_EQUALS => Operator::Equal,
        FUNCTION_NOT_EQUALS => Operator::NotEqual,
        FUNCTION_LESS_THAN => Operator::LessThan,
        FUNCTION_LESS_EQUALS => Operator::LessThanOrEqual,
        FUNCTION_GREATER_THAN => Operator::GreaterThan,
        FUNCTION_GREATER_EQUALS => Operator::GreaterThanOrEqual,
        _ => {
            let not = if negate { "NOT " } else { "" };
            return Err(TranspileError::invalid_argument(format!(
                "no operator for {}{}",
                not, function
            )));
        }
    };
    Ok(if negate { complement(base) } else { base })
}

/// Logical complement of a comparison
pub fn complement(op: Operator) -> Operator {
    match op {
        Operator::Equal => Operator::NotEqual,
        Operator::NotEqual => Operator::Equal,
        Operator::LessThan => Operator::GreaterThanOrEqual,
        Operator::LessThanOrEqual => Operator::GreaterThan,
        Operator::GreaterThan => Operator::LessThanOrEqual,
        Operator::GreaterThanOrEqual => Operator::LessThan,
    }
}
