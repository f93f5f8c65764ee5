//! # REST API Handler
//!
//! Turns a decoded request into one statement, runs it against the store and
//! shapes the result.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, warn};

use crate::store::{Store, StoreError};

use super::errors::{RestError, RestResult};
use super::generator::{simple_query_statement, Operation};
use super::response::{QueryResponse, WriteResponse};

/// Request handler over a shared store
pub struct RestHandler<S: Store> {
    store: Arc<S>,
}

impl<S: Store> RestHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Insert one row (POST `?type=create`)
    pub async fn create(&self, table: &str, body: Value) -> RestResult<WriteResponse> {
        self.write(Operation::Create, table, body).await
    }

    /// Update matching rows (POST `?type=update`)
    pub async fn update(&self, table: &str, body: Value) -> RestResult<WriteResponse> {
        self.write(Operation::Update, table, body).await
    }

    /// Delete matching rows (DELETE)
    pub async fn delete(&self, table: &str, body: Value) -> RestResult<WriteResponse> {
        self.write(Operation::Delete, table, body).await
    }

    /// Projection and condition tree from the body (PUT)
    pub async fn complex_query(&self, table: &str, body: Value) -> RestResult<QueryResponse> {
        let sql = generate(Operation::ComplexQuery, table, body)?;
        let rows = self.store.query(&sql).await.map_err(store_failure)?;

        info!(table, total = rows.len(), "Complex query result");
        Ok(QueryResponse::new(rows))
    }

    /// Equality filters from the query string (GET)
    pub async fn simple_query(
        &self,
        table: &str,
        params: &[(String, String)],
    ) -> RestResult<QueryResponse> {
        let sql = simple_query_statement(table, params);
        let rows = self.store.query(&sql).await.map_err(store_failure)?;

        info!(table, total = rows.len(), "Simple query result");
        Ok(QueryResponse::new(rows))
    }

    async fn write(&self, operation: Operation, table: &str, body: Value) -> RestResult<WriteResponse> {
        let sql = generate(operation, table, body)?;
        let outcome = self.store.execute(&sql).await.map_err(store_failure)?;

        info!(
            table,
            affected = outcome.affected_rows,
            changed = outcome.changed_rows,
            "Statement executed"
        );
        Ok(WriteResponse::from(outcome))
    }
}

fn generate(operation: Operation, table: &str, body: Value) -> RestResult<String> {
    operation.generate(table, &body).map_err(|err| {
        warn!(table, error = %err, "Rejected request");
        RestError::generation(err, body)
    })
}

fn store_failure(err: StoreError) -> RestError {
    if err.is_missing_table() {
        error!(errno = ?err.errno(), "{}", err.message());
    } else {
        error!(errno = ?err.errno(), sqlstate = ?err.sqlstate(), error = %err, "Statement failed");
    }
    RestError::Store(err)
}
