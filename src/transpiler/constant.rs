//! Constant unwrapping

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{Number, Value};

use crate::filtering::Constant;

/// Converts a literal into a query operand.
///
/// Bytes become standard base64 text. `Null` and non-finite doubles have no
/// usable operand and yield `None`.
pub fn unwrap_constant(constant: &Constant) -> Option<Value> {
    match constant {
        Constant::Bool(b) => Some(Value::Bool(*b)),
        Constant::Bytes(bytes) => Some(Value::String(STANDARD.encode(bytes))),
        Constant::Double(d) => Number::from_f64(*d).map(Value::Number),
        Constant::Int64(i) => Some(Value::from(*i)),
        Constant::String(s) => Some(Value::String(s.clone())),
        Constant::Uint64(u) => Some(Value::from(*u)),
        Constant::Null => None,
    }
}
