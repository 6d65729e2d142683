//! Type checker
//!
//! Resolves every node of a parsed filter against the declarations and
//! records its type by node id.

use std::collections::HashMap;

use super::declarations::Declarations;
use super::errors::{FilterError, FilterResult};
use super::expr::{
    CheckedExpr, Constant, Expr, ExprKind, Type, FUNCTION_AND, FUNCTION_HAS, FUNCTION_NOT,
    FUNCTION_OR, RELATIONAL_FUNCTIONS,
};

/// Type-checks a parsed tree. `None` (empty filter) checks trivially.
pub fn check(expr: Option<Expr>, declarations: &Declarations) -> FilterResult<CheckedExpr> {
    let mut checker = Checker {
        declarations,
        type_map: HashMap::new(),
    };
    if let Some(ref root) = expr {
        let ty = checker.check(root)?;
        if ty != Type::Bool && root.as_constant().is_none() {
            return Err(FilterError::TypeMismatch(format!(
                "filter must be a boolean expression, found {}",
                ty
            )));
        }
    }
    Ok(CheckedExpr::new(expr, checker.type_map))
}

struct Checker<'a> {
    declarations: &'a Declarations,
    type_map: HashMap<i64, Type>,
}

impl Checker<'_> {
    fn check(&mut self, expr: &Expr) -> FilterResult<Type> {
        let ty = match &expr.kind {
            ExprKind::Ident(name) => self
                .declarations
                .ident(name)
                .cloned()
                .ok_or_else(|| FilterError::UndeclaredIdent(name.clone()))?,
            ExprKind::Select { operand, field } => {
                let operand_type = self.check(operand)?;
                self.select(&operand_type, field)?
            }
            ExprKind::Const(value) => value.type_of().ok_or_else(|| {
                FilterError::TypeMismatch("null literals are not supported".into())
            })?,
            ExprKind::Call { function, args } => self.call(function, args)?,
        };
        self.type_map.insert(expr.id, ty.clone());
        Ok(ty)
    }

    fn select(&self, operand: &Type, field: &str) -> FilterResult<Type> {
        match operand {
            Type::Message(name) => self
                .declarations
                .field(name, field)
                .cloned()
                .ok_or_else(|| FilterError::UnknownField {
                    field: field.to_string(),
                    on: format!("message {}", name),
                }),
            Type::Map { value, .. } => Ok((**value).clone()),
            other => Err(FilterError::TypeMismatch(format!(
                "cannot select field '{}' on {}",
                field, other
            ))),
        }
    }

    fn call(&mut self, function: &str, args: &[Expr]) -> FilterResult<Type> {
        if !self.declarations.supports(function) {
            return Err(FilterError::UnsupportedFunction(function.to_string()));
        }

        match function {
            FUNCTION_AND | FUNCTION_OR => {
                arity(function, args, 2)?;
                for arg in args {
                    self.expect_bool(function, arg)?;
                }
            }
            FUNCTION_NOT => {
                arity(function, args, 1)?;
                self.expect_bool(function, &args[0])?;
            }
            FUNCTION_HAS => {
                arity(function, args, 2)?;
                let target = self.check(&args[0])?;
                self.check(&args[1])?;
                let field = match args[1].as_constant() {
                    Some(Constant::String(field)) => field,
                    _ => {
                        return Err(FilterError::TypeMismatch(
                            "has requires a field name".into(),
                        ))
                    }
                };
                if let Type::Message(name) = &target {
                    if self.declarations.has_message(name)
                        && self.declarations.field(name, field).is_none()
                    {
                        return Err(FilterError::UnknownField {
                            field: field.clone(),
                            on: format!("message {}", name),
                        });
                    }
                }
            }
            f if RELATIONAL_FUNCTIONS.contains(&f) => {
                arity(function, args, 2)?;
                let lhs = self.check(&args[0])?;
                let rhs = self.check(&args[1])?;
                if !comparable(&lhs, &rhs) {
                    return Err(FilterError::TypeMismatch(format!(
                        "cannot compare {} with {}",
                        lhs, rhs
                    )));
                }
            }
            _ => {
                for arg in args {
                    self.check(arg)?;
                }
            }
        }
        Ok(Type::Bool)
    }

    fn expect_bool(&mut self, function: &str, arg: &Expr) -> FilterResult<()> {
        let ty = self.check(arg)?;
        if ty != Type::Bool {
            return Err(FilterError::TypeMismatch(format!(
                "{} requires boolean arguments, found {}",
                function, ty
            )));
        }
        Ok(())
    }
}

fn arity(function: &str, args: &[Expr], expected: usize) -> FilterResult<()> {
    if args.len() != expected {
        return Err(FilterError::TypeMismatch(format!(
            "{} requires {} argument(s), found {}",
            function,
            expected,
            args.len()
        )));
    }
    Ok(())
}

/// Scalars compare with their own type; numbers compare with each other
fn comparable(lhs: &Type, rhs: &Type) -> bool {
    if !lhs.is_scalar() || !rhs.is_scalar() {
        return false;
    }
    lhs == rhs || (lhs.is_numeric() && rhs.is_numeric())
}
