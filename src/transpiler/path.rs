//! Field path resolution
//!
//! Paths are dotted and every segment is lower camel cased, the stored
//! field naming convention.

use convert_case::{Case, Casing};

use crate::filtering::{Expr, ExprKind};

use super::errors::{TranspileError, TranspileResult};

/// Converts a filter identifier to the stored field name
pub fn store_case(name: &str) -> String {
    name.to_case(Case::Camel)
}

/// Builds the dotted path for an `Ident` or `Select` chain, outermost first
pub fn resolve_path(expr: &Expr) -> TranspileResult<String> {
    match &expr.kind {
        ExprKind::Ident(name) => Ok(store_case(name)),
        ExprKind::Select { operand, field } => {
            let parent = resolve_path(operand)?;
            Ok(format!("{}.{}", parent, store_case(field)))
        }
        _ => Err(TranspileError::invalid_argument(
            "unable to get path for expression",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::Constant;

    #[test]
    fn test_ident() {
        assert_eq!(resolve_path(&Expr::ident(1, "age")).unwrap(), "age");
        assert_eq!(
            resolve_path(&Expr::ident(1, "display_name")).unwrap(),
            "displayName"
        );
    }

    #[test]
    fn test_select_chain_depth() {
        let mut expr = Expr::ident(1, "root_msg");
        let fields = ["first_field", "second", "third_one", "x"];
        for (i, f) in fields.iter().enumerate() {
            expr = Expr::select(i as i64 + 2, expr, *f);
        }
        let path = resolve_path(&expr).unwrap();
        assert_eq!(path, "rootMsg.firstField.second.thirdOne.x");
        assert_eq!(path.split('.').count(), fields.len() + 1);
    }

    #[test]
    fn test_non_path_expression() {
        let err = resolve_path(&Expr::constant(1, Constant::Int64(3))).unwrap_err();
        assert_eq!(err.to_string(), "unable to get path for expression");

        let call = Expr::call(2, "=", vec![]);
        assert!(resolve_path(&call).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_select_on_non_path_operand() {
        let expr = Expr::select(2, Expr::constant(1, Constant::Bool(true)), "x");
        assert!(resolve_path(&expr).is_err());
    }
}
