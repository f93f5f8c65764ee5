//! # REST API Errors
//!
//! Error types for the REST API module.
//!
//! Failures come in two tiers: generation errors are caused by the request
//! and never reach the store, store errors carry the database's own code and
//! message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::store::StoreError;

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// Why a condition tree could not be compiled
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("condition group requires 'conjunction' and 'children'")]
    NotAGroup,

    #[error("invalid conjunction: {0}")]
    InvalidConjunction(String),

    #[error("condition group has no children")]
    EmptyGroup,

    #[error("condition node is neither a group nor a condition")]
    InvalidNode,

    #[error("left operand must be a field reference")]
    InvalidLeftOperand,

    #[error("invalid condition op: {0}")]
    UnknownOp(String),

    #[error("invalid right operand for '{0}'")]
    InvalidRightOperand(&'static str),
}

/// Statement generation errors (client-caused)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("Do not contains 'values' field!")]
    MissingValues,

    #[error("Do not contains 'column' or 'value' field!")]
    MalformedValue,

    #[error("Invalid value for column '{0}'")]
    NonScalarValue(String),

    #[error("'values' field is empty")]
    EmptyValues,

    #[error("Has columns but empty!")]
    EmptyColumns,

    #[error("Invalid entry in 'columns'")]
    InvalidColumn,

    #[error("Where conditions error")]
    Conditions(#[source] CompileError),

    #[error("Do not allow delete whole table!")]
    WholeTableDelete,

    #[error("req type invalid!")]
    InvalidRequestType,

    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),
}

impl From<CompileError> for GenerateError {
    fn from(err: CompileError) -> Self {
        GenerateError::Conditions(err)
    }
}

/// REST API errors
#[derive(Debug, Clone, Error)]
pub enum RestError {
    /// The request could not be turned into a statement
    #[error("{source}")]
    Generation {
        source: GenerateError,
        /// Original request body, echoed back to the client
        request: Value,
    },

    /// The store rejected the statement
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl RestError {
    pub fn generation(source: GenerateError, request: Value) -> Self {
        RestError::Generation { source, request }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::Generation { .. } => StatusCode::BAD_REQUEST,
            RestError::Store(err) if err.is_missing_table() => StatusCode::NOT_FOUND,
            RestError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: u32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub req: Option<Value>,
}

impl From<RestError> for ErrorResponse {
    fn from(err: RestError) -> Self {
        let http_status = u32::from(err.status_code().as_u16());
        match err {
            RestError::Generation { source, request } => Self {
                status: http_status,
                msg: source.to_string(),
                req: Some(request),
            },
            // Store errors report the database's native error number when there is one
            RestError::Store(store_err) => Self {
                status: store_err.errno().unwrap_or(http_status),
                msg: store_err.message().to_string(),
                req: None,
            },
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
