//! Expression tree walker
//!
//! Recursive descent over a checked expression. The negation flag is
//! threaded down the recursion; every effect lands in the `QueryState`.
//! The tree itself is never modified.

use std::collections::HashMap;

use serde_json::Value;

use crate::filtering::{
    Constant, Expr, ExprKind, Type, FUNCTION_AND, FUNCTION_HAS, FUNCTION_NOT,
    RELATIONAL_FUNCTIONS,
};
use crate::observability::{Diagnostic, Event};
use crate::store::{Direction, Operator};

use super::constant::unwrap_constant;
use super::errors::{TranspileError, TranspileResult};
use super::operator::operator;
use super::path::{resolve_path, store_case};
use super::state::QueryState;

pub struct Walker<'a> {
    types: &'a HashMap<i64, Type>,
    /// Store-cased collection root identifier, stripped from existence paths
    root: Option<String>,
    state: &'a mut QueryState,
}

impl<'a> Walker<'a> {
    pub fn new(types: &'a HashMap<i64, Type>, root: Option<&str>, state: &'a mut QueryState) -> Self {
        Self {
            types,
            root: root.map(store_case),
            state,
        }
    }

    /// Transpiles `expr` into the query state. `None` is a no-op.
    pub fn walk(&mut self, expr: Option<&Expr>, negate: bool) -> TranspileResult<()> {
        let expr = match expr {
            Some(expr) => expr,
            None => return Ok(()),
        };

        match &expr.kind {
            ExprKind::Call { function, args } => self.call(function, args, negate),
            // Search across all searchable fields is not supported
            ExprKind::Const(_) => Err(TranspileError::invalid_argument(
                "invalid filter expression",
            )),
            ExprKind::Ident(_) | ExprKind::Select { .. } => Err(
                TranspileError::invalid_argument("invalid filter expression").with_diagnostic(
                    Diagnostic::new(Event::UnexpectedExpression)
                        .with_field("kind", expr.kind_name())
                        .with_field("expr", expr.to_string()),
                ),
            ),
        }
    }

    fn call(&mut self, function: &str, args: &[Expr], negate: bool) -> TranspileResult<()> {
        match function {
            FUNCTION_NOT => {
                if args.len() != 1 {
                    return Err(TranspileError::invalid_argument("NOT requires one argument"));
                }
                self.walk(args.first(), !negate)
            }
            FUNCTION_AND => {
                if args.len() != 2 {
                    return Err(TranspileError::invalid_argument("AND requires two arguments"));
                }
                self.walk(args.first(), negate)?;
                self.walk(args.get(1), negate)
            }
            FUNCTION_HAS => self.has(args, negate),
            f if RELATIONAL_FUNCTIONS.contains(&f) => self.comparison(function, args, negate),
            _ => Err(TranspileError::invalid_argument(format!(
                "unknown filter function {}",
                function
            ))),
        }
    }

    /// `a <op> b`
    fn comparison(&mut self, function: &str, args: &[Expr], negate: bool) -> TranspileResult<()> {
        let (lhs, rhs) = match args {
            [lhs, rhs] => (lhs, rhs),
            _ => {
                return Err(TranspileError::invalid_argument(format!(
                    "{} requires two arguments",
                    function
                )))
            }
        };

        let path = resolve_path(lhs)?;
        let op = operator(function, negate)?;
        let value = rhs.as_constant().and_then(unwrap_constant).ok_or_else(|| {
            TranspileError::invalid_argument(format!("{} requires a constant operand", function))
        })?;
        if op.is_inequality() {
            self.state.claim_inequality(&path)?;
        }

        self.state.add_predicate(path, op, value);
        Ok(())
    }

    /// `has(a, "b")`
    fn has(&mut self, args: &[Expr], negate: bool) -> TranspileResult<()> {
        let (target, field) = match args {
            [target, field] => (target, field),
            _ => return Err(TranspileError::invalid_argument("has requires two arguments")),
        };

        // TODO: lists need an array-contains predicate and maps a key existence check
        if !matches!(self.types.get(&target.id), Some(Type::Message(_))) {
            return Err(TranspileError::invalid_argument(
                "has must be used on a message, map or list",
            ));
        }

        let field = match field.as_constant() {
            Some(Constant::String(name)) => store_case(name),
            _ => return Err(TranspileError::invalid_argument("has requires a field name")),
        };
        let path = format!("{}.{}", resolve_path(target)?, field);
        let path = self.strip_root(path);

        if negate {
            self.state.add_predicate(path, Operator::Equal, Value::Null);
            return Ok(());
        }

        // Existence is an ordering on the field, so it takes the inequality slot
        self.state.claim_inequality(&path)?;
        self.state.add_ordering(path, Direction::Asc, Value::Null);
        Ok(())
    }

    /// Drops a leading root segment naming the listed resource itself
    fn strip_root(&self, path: String) -> String {
        if let Some(root) = &self.root {
            if let Some(rest) = path.strip_prefix(root.as_str()).and_then(|p| p.strip_prefix('.')) {
                return rest.to_string();
            }
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::{parse_filter, Declarations};
    use serde_json::json;

    fn declarations() -> Declarations {
        Declarations::new()
            .with_root("user")
            .with_ident("user", Type::Message("User".into()))
            .with_ident("age", Type::Int64)
            .with_ident("height", Type::Double)
            .with_ident("display_name", Type::String)
            .with_ident("profile", Type::Message("Profile".into()))
            .with_ident("tags", Type::List(Box::new(Type::String)))
            .with_ident("labels", Type::Map {
                key: Box::new(Type::String),
                value: Box::new(Type::String),
            })
            .with_message("User", [("profile", Type::Message("Profile".into()))])
            .with_message("Profile", [("bio", Type::String), ("home_page", Type::String)])
    }

    fn walk_text(text: &str) -> TranspileResult<QueryState> {
        let decls = declarations();
        let checked = parse_filter(text, &decls)?;
        let mut state = QueryState::new("users", 10);
        Walker::new(&checked.type_map, decls.root.as_deref(), &mut state)
            .walk(checked.expr.as_ref(), false)?;
        Ok(state)
    }

    fn walk_expr(expr: &Expr) -> TranspileResult<QueryState> {
        let types = HashMap::new();
        let mut state = QueryState::new("users", 10);
        Walker::new(&types, None, &mut state).walk(Some(expr), false)?;
        Ok(state)
    }

    #[test]
    fn test_empty_filter_is_noop() {
        let state = walk_text("").unwrap();
        assert!(state.query().predicates.is_empty());
        assert!(state.query().order_by.is_empty());
    }

    #[test]
    fn test_equality_uses_store_case() {
        let state = walk_text("display_name = 'Ada'").unwrap();
        let p = &state.query().predicates[0];
        assert_eq!(p.path, "displayName");
        assert_eq!(p.op, Operator::Equal);
        assert_eq!(p.value, json!("Ada"));
        assert_eq!(state.inequality(), None);
    }

    #[test]
    fn test_not_equal_does_not_claim_inequality() {
        let state = walk_text("age != 3 AND height > 1").unwrap();
        assert_eq!(state.inequality(), Some("height"));
    }

    #[test]
    fn test_negated_range_flips_operator() {
        let state = walk_text("NOT age < 30").unwrap();
        assert_eq!(state.query().predicates[0].op, Operator::GreaterThanOrEqual);
        assert_eq!(state.inequality(), Some("age"));
    }

    #[test]
    fn test_double_negation_restores_operator() {
        let state = walk_text("NOT (NOT age < 30)").unwrap();
        assert_eq!(state.query().predicates[0].op, Operator::LessThan);
    }

    #[test]
    fn test_negation_threads_through_and() {
        let state = walk_text("NOT (age > 1 AND age <= 9)").unwrap();
        let ops: Vec<_> = state.query().predicates.iter().map(|p| p.op).collect();
        assert_eq!(ops, vec![Operator::LessThanOrEqual, Operator::GreaterThan]);
    }

    #[test]
    fn test_has_strips_declared_root() {
        let state = walk_text(r#"has(user.profile, "home_page")"#).unwrap();
        assert_eq!(state.inequality(), Some("profile.homePage"));
        assert_eq!(state.query().order_by[0].path, "profile.homePage");
    }

    #[test]
    fn test_has_on_list_or_map_rejected() {
        for text in ["tags:x", "labels:x"] {
            let err = walk_text(text).unwrap_err();
            assert_eq!(err.to_string(), "has must be used on a message, map or list");
        }
    }

    #[test]
    fn test_has_on_untyped_node_rejected() {
        let expr = Expr::call(
            3,
            FUNCTION_HAS,
            vec![Expr::ident(1, "age"), Expr::constant(2, Constant::String("x".into()))],
        );
        assert!(walk_expr(&expr).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_has_requires_field_name() {
        let mut types = HashMap::new();
        types.insert(1, Type::Message("Profile".into()));
        let expr = Expr::call(
            3,
            FUNCTION_HAS,
            vec![Expr::ident(1, "profile"), Expr::constant(2, Constant::Int64(1))],
        );
        let mut state = QueryState::new("users", 10);
        let err = Walker::new(&types, None, &mut state)
            .walk(Some(&expr), false)
            .unwrap_err();
        assert_eq!(err.to_string(), "has requires a field name");
    }

    #[test]
    fn test_arity_errors() {
        let not = Expr::call(1, FUNCTION_NOT, vec![]);
        assert_eq!(
            walk_expr(&not).unwrap_err().to_string(),
            "NOT requires one argument"
        );

        let and = Expr::call(2, FUNCTION_AND, vec![Expr::call(1, FUNCTION_NOT, vec![])]);
        assert_eq!(
            walk_expr(&and).unwrap_err().to_string(),
            "AND requires two arguments"
        );

        let eq = Expr::call(2, "=", vec![Expr::ident(1, "age")]);
        assert_eq!(
            walk_expr(&eq).unwrap_err().to_string(),
            "= requires two arguments"
        );

        let has = Expr::call(2, FUNCTION_HAS, vec![Expr::ident(1, "profile")]);
        assert_eq!(
            walk_expr(&has).unwrap_err().to_string(),
            "has requires two arguments"
        );
    }

    #[test]
    fn test_and_short_circuits() {
        let expr = Expr::call(
            5,
            FUNCTION_AND,
            vec![
                Expr::call(1, "OR", vec![]),
                Expr::call(
                    4,
                    "=",
                    vec![Expr::ident(2, "age"), Expr::constant(3, Constant::Int64(1))],
                ),
            ],
        );
        let types = HashMap::new();
        let mut state = QueryState::new("users", 10);
        let result = Walker::new(&types, None, &mut state).walk(Some(&expr), false);
        assert_eq!(result.unwrap_err().to_string(), "unknown filter function OR");
        assert!(state.query().predicates.is_empty());
    }

    #[test]
    fn test_or_is_rejected() {
        let err = walk_text("age = 1 OR age = 2").unwrap_err();
        assert_eq!(err.to_string(), "unknown filter function OR");
    }

    #[test]
    fn test_comparison_requires_constant_operand() {
        let expr = Expr::call(
            3,
            "=",
            vec![Expr::ident(1, "age"), Expr::ident(2, "height")],
        );
        assert_eq!(
            walk_expr(&expr).unwrap_err().to_string(),
            "= requires a constant operand"
        );

        let expr = Expr::call(
            3,
            "=",
            vec![Expr::ident(1, "age"), Expr::constant(2, Constant::Null)],
        );
        assert!(walk_expr(&expr).is_err());
    }

    #[test]
    fn test_rejected_range_leaves_inequality_unclaimed() {
        let expr = Expr::call(
            3,
            ">",
            vec![Expr::ident(1, "height"), Expr::ident(2, "age")],
        );
        let types = HashMap::new();
        let mut state = QueryState::new("users", 10);
        let err = Walker::new(&types, None, &mut state)
            .walk(Some(&expr), false)
            .unwrap_err();
        assert_eq!(err.to_string(), "> requires a constant operand");
        assert_eq!(state.inequality(), None);
        assert!(state.query().predicates.is_empty());
    }

    #[test]
    fn test_comparison_on_non_path() {
        let expr = Expr::call(
            3,
            "=",
            vec![Expr::constant(1, Constant::Int64(1)), Expr::constant(2, Constant::Int64(1))],
        );
        assert_eq!(
            walk_expr(&expr).unwrap_err().to_string(),
            "unable to get path for expression"
        );
    }

    #[test]
    fn test_top_level_constant_rejected_without_diagnostic() {
        let err = walk_text("'needle'").unwrap_err();
        assert_eq!(err.to_string(), "invalid filter expression");
        assert!(err.diagnostic().is_none());
    }

    #[test]
    fn test_top_level_member_carries_diagnostic() {
        let expr = Expr::select(2, Expr::ident(1, "profile"), "bio");
        let err = walk_expr(&expr).unwrap_err();
        assert_eq!(err.to_string(), "invalid filter expression");
        let diagnostic = err.diagnostic().unwrap();
        assert_eq!(diagnostic.event(), Event::UnexpectedExpression);
        assert_eq!(diagnostic.field("kind"), Some("select"));
        assert_eq!(diagnostic.field("expr"), Some("profile.bio"));
    }

    #[test]
    fn test_unknown_function() {
        let expr = Expr::call(1, "fuzzy", vec![]);
        assert_eq!(
            walk_expr(&expr).unwrap_err().to_string(),
            "unknown filter function fuzzy"
        );
    }
}
