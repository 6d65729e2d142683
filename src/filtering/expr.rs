//! Checked expression model
//!
//! The tree produced by the filter parser and annotated by the checker.
//! Node ids are dense integers used as keys into the type map.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Equality function name
pub const FUNCTION_EQUALS: &str = "=";
/// Inequality function name
pub const FUNCTION_NOT_EQUALS: &str = "!=";
/// Less-than function name
pub const FUNCTION_LESS_THAN: &str = "<";
/// Less-or-equal function name
pub const FUNCTION_LESS_EQUALS: &str = "<=";
/// Greater-than function name
pub const FUNCTION_GREATER_THAN: &str = ">";
/// Greater-or-equal function name
pub const FUNCTION_GREATER_EQUALS: &str = ">=";
/// Presence function name (`a:b` or `has(a, "b")`)
pub const FUNCTION_HAS: &str = ":";
/// Conjunction function name
pub const FUNCTION_AND: &str = "AND";
/// Disjunction function name
pub const FUNCTION_OR: &str = "OR";
/// Negation function name
pub const FUNCTION_NOT: &str = "NOT";

/// Relational function names, in declaration order
pub const RELATIONAL_FUNCTIONS: [&str; 6] = [
    FUNCTION_EQUALS,
    FUNCTION_NOT_EQUALS,
    FUNCTION_LESS_THAN,
    FUNCTION_LESS_EQUALS,
    FUNCTION_GREATER_THAN,
    FUNCTION_GREATER_EQUALS,
];

/// Literal value carried by a `Const` node
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// No usable value
    Null,
    Bool(bool),
    Bytes(Vec<u8>),
    Double(f64),
    Int64(i64),
    String(String),
    Uint64(u64),
}

impl Constant {
    /// Returns the checked type of this literal, if it has one
    pub fn type_of(&self) -> Option<Type> {
        match self {
            Constant::Null => None,
            Constant::Bool(_) => Some(Type::Bool),
            Constant::Bytes(_) => Some(Type::Bytes),
            Constant::Double(_) => Some(Type::Double),
            Constant::Int64(_) => Some(Type::Int64),
            Constant::String(_) => Some(Type::String),
            Constant::Uint64(_) => Some(Type::Uint64),
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Null => write!(f, "null"),
            Constant::Bool(b) => write!(f, "{}", b),
            Constant::Bytes(b) => write!(f, "b[{}]", b.len()),
            Constant::Double(d) => write!(f, "{}", d),
            Constant::Int64(i) => write!(f, "{}", i),
            Constant::String(s) => write!(f, "{:?}", s),
            Constant::Uint64(u) => write!(f, "{}u", u),
        }
    }
}

/// Node payload
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Bare identifier, e.g. `age`
    Ident(String),
    /// Field selection, e.g. `profile.bio`
    Select { operand: Box<Expr>, field: String },
    /// Literal
    Const(Constant),
    /// Function call, including operators
    Call { function: String, args: Vec<Expr> },
}

/// Expression tree node
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub id: i64,
    pub kind: ExprKind,
}

impl Expr {
    pub fn ident(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            kind: ExprKind::Ident(name.into()),
        }
    }

    pub fn select(id: i64, operand: Expr, field: impl Into<String>) -> Self {
        Self {
            id,
            kind: ExprKind::Select {
                operand: Box::new(operand),
                field: field.into(),
            },
        }
    }

    pub fn constant(id: i64, value: Constant) -> Self {
        Self {
            id,
            kind: ExprKind::Const(value),
        }
    }

    pub fn call(id: i64, function: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            id,
            kind: ExprKind::Call {
                function: function.into(),
                args,
            },
        }
    }

    /// Short name of the node kind, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ExprKind::Ident(_) => "ident",
            ExprKind::Select { .. } => "select",
            ExprKind::Const(_) => "const",
            ExprKind::Call { .. } => "call",
        }
    }

    /// Returns the constant payload, if this node is a literal
    pub fn as_constant(&self) -> Option<&Constant> {
        match &self.kind {
            ExprKind::Const(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Ident(name) => write!(f, "{}", name),
            ExprKind::Select { operand, field } => write!(f, "{}.{}", operand, field),
            ExprKind::Const(c) => write!(f, "{}", c),
            ExprKind::Call { function, args } => {
                write!(f, "{}(", function)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Checked type of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    Bool,
    Int64,
    Uint64,
    Double,
    String,
    Bytes,
    /// Named message type, resolved through the declarations
    Message(String),
    List(Box<Type>),
    Map { key: Box<Type>, value: Box<Type> },
}

impl Type {
    /// Returns true for bool, numeric, string and bytes types
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Type::Message(_) | Type::List(_) | Type::Map { .. })
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int64 | Type::Uint64 | Type::Double)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => write!(f, "bool"),
            Type::Int64 => write!(f, "int64"),
            Type::Uint64 => write!(f, "uint64"),
            Type::Double => write!(f, "double"),
            Type::String => write!(f, "string"),
            Type::Bytes => write!(f, "bytes"),
            Type::Message(name) => write!(f, "message {}", name),
            Type::List(elem) => write!(f, "list<{}>", elem),
            Type::Map { key, value } => write!(f, "map<{}, {}>", key, value),
        }
    }
}

/// An expression tree paired with the type of each node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckedExpr {
    /// Root node; `None` for an empty filter
    pub expr: Option<Expr>,
    pub type_map: HashMap<i64, Type>,
}

impl CheckedExpr {
    pub fn new(expr: Option<Expr>, type_map: HashMap<i64, Type>) -> Self {
        Self { expr, type_map }
    }

    /// Looks up the type recorded for a node
    pub fn type_of(&self, id: i64) -> Option<&Type> {
        self.type_map.get(&id)
    }
}
