//! JSON output for CLI commands
//!
//! One JSON object per invocation, written to stdout.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::Value;

use super::errors::CliResult;

/// Write a success response to stdout
pub fn write_response<T: Serialize>(data: &T) -> CliResult<()> {
    let mut stdout = io::stdout();
    write_to(&mut stdout, &success_body(data)?)
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    write_to(&mut stdout, &error_body(code, message))
}

fn success_body<T: Serialize>(data: &T) -> CliResult<Value> {
    Ok(serde_json::json!({
        "status": "ok",
        "data": serde_json::to_value(data)?,
    }))
}

fn error_body(code: &str, message: &str) -> Value {
    serde_json::json!({
        "status": "error",
        "code": code,
        "message": message,
    })
}

fn write_to<W: Write>(out: &mut W, body: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *out, body)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
