//! # REST API HTTP Routes
//!
//! Axum routes for `/:table`. The verb selects the statement kind, POST
//! additionally needs `?type=create` or `?type=update`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::store::Store;

use super::errors::{GenerateError, RestError, RestResult};
use super::generator::Operation;
use super::handler::RestHandler;
use super::response::{QueryResponse, WriteResponse};

/// Shared state type
type HandlerState<S> = Arc<RestHandler<S>>;

/// POST query string
#[derive(Debug, Deserialize)]
struct WriteParams {
    #[serde(rename = "type")]
    request_type: Option<String>,
}

/// Build the table router
pub fn rest_routes<S: Store + 'static>(handler: Arc<RestHandler<S>>) -> Router {
    Router::new()
        .route(
            "/:table",
            get(simple_query_handler::<S>)
                .post(write_handler::<S>)
                .put(complex_query_handler::<S>)
                .delete(delete_handler::<S>),
        )
        .with_state(handler)
}

/// Decode a JSON body; an empty body is an empty object
fn decode_body(bytes: &Bytes) -> RestResult<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(bytes).map_err(|err| {
        RestError::generation(GenerateError::InvalidBody(err.to_string()), Value::Null)
    })
}

/// Create or update handler
async fn write_handler<S: Store + 'static>(
    State(handler): State<HandlerState<S>>,
    Path(table): Path<String>,
    Query(params): Query<WriteParams>,
    body: Bytes,
) -> RestResult<Json<WriteResponse>> {
    let body = decode_body(&body)?;

    let response = match Operation::resolve("POST", params.request_type.as_deref()) {
        Ok(Operation::Create) => handler.create(&table, body).await?,
        Ok(Operation::Update) => handler.update(&table, body).await?,
        _ => return Err(RestError::generation(GenerateError::InvalidRequestType, body)),
    };
    Ok(Json(response))
}

/// Delete handler
async fn delete_handler<S: Store + 'static>(
    State(handler): State<HandlerState<S>>,
    Path(table): Path<String>,
    body: Bytes,
) -> RestResult<Json<WriteResponse>> {
    let body = decode_body(&body)?;
    Ok(Json(handler.delete(&table, body).await?))
}

/// Simple query handler; every query pair is an equality filter
async fn simple_query_handler<S: Store + 'static>(
    State(handler): State<HandlerState<S>>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> RestResult<Json<QueryResponse>> {
    Ok(Json(handler.simple_query(&table, &params).await?))
}

/// Complex query handler
async fn complex_query_handler<S: Store + 'static>(
    State(handler): State<HandlerState<S>>,
    Path(table): Path<String>,
    body: Bytes,
) -> RestResult<Json<QueryResponse>> {
    let body = decode_body(&body)?;
    Ok(Json(handler.complex_query(&table, body).await?))
}
