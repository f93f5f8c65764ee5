//! # Response Formatting
//!
//! Success payloads for the REST API. Errors are shaped in `errors.rs`.

use serde::Serialize;
use serde_json::Value;

use crate::store::{Row, WriteOutcome};

/// Result of a create, update or delete
#[derive(Debug, Clone, Serialize)]
pub struct WriteResponse {
    pub status: u32,
    pub msg: String,
    pub affected: u64,
    pub changed: u64,
}

impl From<WriteOutcome> for WriteResponse {
    fn from(outcome: WriteOutcome) -> Self {
        Self {
            status: 0,
            msg: outcome.message,
            affected: outcome.affected_rows,
            changed: outcome.changed_rows,
        }
    }
}

/// Result of a simple or complex query
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub status: u32,
    pub msg: String,
    pub data: QueryData,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryData {
    pub items: Vec<Value>,
    pub total: usize,
}

impl QueryResponse {
    pub fn new(rows: Vec<Row>) -> Self {
        let total = rows.len();
        Self {
            status: 0,
            msg: "Success".to_string(),
            data: QueryData {
                items: rows.into_iter().map(Value::Object).collect(),
                total,
            },
        }
    }
}
