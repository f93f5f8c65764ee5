//! # Request Body Parser
//!
//! Extracts the pieces of a request body the statement builders need.

use serde_json::Value;

use super::errors::GenerateError;

/// One `column = value` pair of a SET clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnAssignment {
    pub column: String,
    pub value: String,
}

/// Text form of a scalar JSON value, as it is interpolated into SQL.
///
/// Arrays and objects are not scalars.
pub fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parse the `values` field into ordered column assignments
pub fn parse_assignments(body: &Value) -> Result<Vec<ColumnAssignment>, GenerateError> {
    let values = body.get("values").ok_or(GenerateError::MissingValues)?;
    let entries = values.as_array().ok_or(GenerateError::MalformedValue)?;

    let assignments = entries
        .iter()
        .map(parse_assignment)
        .collect::<Result<Vec<_>, _>>()?;

    if assignments.is_empty() {
        return Err(GenerateError::EmptyValues);
    }

    Ok(assignments)
}

fn parse_assignment(entry: &Value) -> Result<ColumnAssignment, GenerateError> {
    let (column, value) = match (entry.get("column"), entry.get("value")) {
        (Some(Value::String(column)), Some(value)) => (column, value),
        _ => return Err(GenerateError::MalformedValue),
    };

    let value = render_scalar(value).ok_or_else(|| GenerateError::NonScalarValue(column.clone()))?;

    Ok(ColumnAssignment {
        column: column.clone(),
        value,
    })
}

/// Parse the projection list; `None` selects every column.
///
/// Only an array counts as a column list, any other `columns` value is ignored.
pub fn parse_columns(body: &Value) -> Result<Option<Vec<String>>, GenerateError> {
    let Some(entries) = body.get("columns").and_then(Value::as_array) else {
        return Ok(None);
    };

    if entries.is_empty() {
        return Err(GenerateError::EmptyColumns);
    }

    entries
        .iter()
        .map(|entry| render_scalar(entry).ok_or(GenerateError::InvalidColumn))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// The condition tree, if one was submitted.
///
/// `null`, `false`, `0` and `""` count as absent; objects and arrays are
/// always present, even when empty.
pub fn conditions(body: &Value) -> Option<&Value> {
    body.get("conditions").filter(|value| is_truthy(value))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
