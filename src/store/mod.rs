//! # Store
//!
//! The relational store statements are executed against. The REST layer
//! only sees the [`Store`] capability; connection management belongs to the
//! implementation.

mod config;
mod errors;
mod mysql;

pub use config::MySqlConfig;
pub use errors::{StoreError, StoreResult};
pub use mysql::MySqlStore;

use async_trait::async_trait;
use serde_json::{Map, Value};

/// One result row, keyed by column name in select order
pub type Row = Map<String, Value>;

/// Outcome of a statement that modifies rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Free-text status reported by the store, may be empty
    pub message: String,
    pub affected_rows: u64,
    pub changed_rows: u64,
}

/// Executes raw statement text
#[async_trait]
pub trait Store: Send + Sync {
    /// Run a statement that modifies rows
    async fn execute(&self, statement: &str) -> StoreResult<WriteOutcome>;

    /// Run a statement that returns rows
    async fn query(&self, statement: &str) -> StoreResult<Vec<Row>>;
}
