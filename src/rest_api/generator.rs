//! # Statement Generator
//!
//! Builds complete SQL statements from a table name and a request body.
//! Each builder validates the body shape first; a builder that fails never
//! produces partial SQL.

use serde_json::Value;
use tracing::{debug, warn};

use super::compiler::compile_where;
use super::errors::GenerateError;
use super::parser::{conditions, parse_assignments, parse_columns, ColumnAssignment};

/// Statement kinds reachable through the REST surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// POST `?type=create`
    Create,
    /// POST `?type=update`
    Update,
    /// DELETE
    Delete,
    /// PUT
    ComplexQuery,
    /// GET
    SimpleQuery,
}

impl Operation {
    /// Map an HTTP method (and the POST `type` parameter) to an operation
    pub fn resolve(method: &str, request_type: Option<&str>) -> Result<Self, GenerateError> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Ok(Operation::SimpleQuery),
            "PUT" => Ok(Operation::ComplexQuery),
            "DELETE" => Ok(Operation::Delete),
            "POST" => match request_type {
                Some("create") => Ok(Operation::Create),
                Some("update") => Ok(Operation::Update),
                _ => Err(GenerateError::InvalidRequestType),
            },
            _ => Err(GenerateError::InvalidRequestType),
        }
    }

    /// Whether the statement returns rows rather than a row count
    pub fn is_read(&self) -> bool {
        matches!(self, Operation::ComplexQuery | Operation::SimpleQuery)
    }

    /// Build the statement for a body-driven operation.
    ///
    /// For [`Operation::SimpleQuery`] the body is read as a flat object of
    /// equality filters.
    pub fn generate(&self, table: &str, body: &Value) -> Result<String, GenerateError> {
        match self {
            Operation::Create => insert_statement(table, body),
            Operation::Update => update_statement(table, body),
            Operation::Delete => delete_statement(table, body),
            Operation::ComplexQuery => select_statement(table, body),
            Operation::SimpleQuery => {
                let params = body
                    .as_object()
                    .map(|object| {
                        object
                            .iter()
                            .map(|(key, value)| {
                                let value = value
                                    .as_str()
                                    .map(str::to_string)
                                    .unwrap_or_else(|| value.to_string());
                                (key.clone(), value)
                            })
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default();
                Ok(simple_query_statement(table, &params))
            }
        }
    }
}

/// `INSERT INTO <table> SET c1="v1",c2="v2"`
pub fn insert_statement(table: &str, body: &Value) -> Result<String, GenerateError> {
    let assignments = parse_assignments(body)?;
    let sql = format!("INSERT INTO {} SET {}", table, set_clause(&assignments));

    debug!(sql = %sql, "Generate SQL");
    Ok(sql)
}

/// `UPDATE <table> SET ... [WHERE (...)]`; without conditions the whole table is updated
pub fn update_statement(table: &str, body: &Value) -> Result<String, GenerateError> {
    let assignments = parse_assignments(body)?;
    let mut sql = format!("UPDATE {} SET {}", table, set_clause(&assignments));

    if let Some(tree) = conditions(body) {
        push_where(&mut sql, tree)?;
    }

    debug!(sql = %sql, "Generate SQL");
    Ok(sql)
}

/// `DELETE FROM <table> WHERE (...)`; conditions are mandatory
pub fn delete_statement(table: &str, body: &Value) -> Result<String, GenerateError> {
    let Some(tree) = conditions(body) else {
        warn!(table, "Do not allow delete whole table!");
        return Err(GenerateError::WholeTableDelete);
    };

    let mut sql = format!("DELETE FROM {}", table);
    push_where(&mut sql, tree)?;

    debug!(sql = %sql, "Generate SQL");
    Ok(sql)
}

/// `SELECT <cols|*> FROM <table> [WHERE (...)]`
pub fn select_statement(table: &str, body: &Value) -> Result<String, GenerateError> {
    let projection = match parse_columns(body)? {
        Some(columns) => columns.join(","),
        None => "*".to_string(),
    };
    let mut sql = format!("SELECT {} FROM {}", projection, table);

    if let Some(tree) = conditions(body) {
        push_where(&mut sql, tree)?;
    }

    debug!(sql = %sql, "Generate SQL");
    Ok(sql)
}

/// `SELECT * FROM <table> [WHERE k1="v1" AND ...];` from query-string pairs, in order
pub fn simple_query_statement(table: &str, params: &[(String, String)]) -> String {
    let mut sql = format!("SELECT * FROM {}", table);

    if !params.is_empty() {
        let filter = params
            .iter()
            .map(|(column, value)| format!("{}=\"{}\"", column, value))
            .collect::<Vec<_>>()
            .join(" AND ");
        sql.push_str(" WHERE ");
        sql.push_str(&filter);
    }
    sql.push(';');

    debug!(sql = %sql, "Generate SQL");
    sql
}

fn set_clause(assignments: &[ColumnAssignment]) -> String {
    assignments
        .iter()
        .map(|assignment| format!("{}=\"{}\"", assignment.column, assignment.value))
        .collect::<Vec<_>>()
        .join(",")
}

fn push_where(sql: &mut String, tree: &Value) -> Result<(), GenerateError> {
    let clause = compile_where(tree).map_err(|err| {
        warn!(error = %err, "Where conditions error");
        GenerateError::from(err)
    })?;
    sql.push_str(" WHERE (");
    sql.push_str(&clause);
    sql.push(')');
    Ok(())
}
