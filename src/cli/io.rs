//! JSON I/O for the render command
//!
//! - Input: one JSON document on stdin, empty input is `{}`
//! - Output: one JSON object per line on stdout

use std::io::{self, Read, Write};

use serde_json::{json, Map, Value};

use super::errors::CliResult;

/// Read a JSON request body from stdin
pub fn read_request() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_request(&input)
}

fn parse_request(input: &str) -> CliResult<Value> {
    if input.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    Ok(serde_json::from_str(input)?)
}

/// Write a generated statement to stdout
pub fn write_statement(sql: &str) -> CliResult<()> {
    write_line(&json!({"status": "ok", "sql": sql}))
}

/// Write a generation error to stdout
pub fn write_error(message: &str) -> CliResult<()> {
    write_line(&json!({"status": "error", "msg": message}))
}

fn write_line(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
