//! HTTP Gateway Tests
//!
//! Drives the full router (CORS, tracing, table routes) with in-memory
//! requests against a store that records every statement it receives.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use tablegate::http_server::{HttpServer, HttpServerConfig};
use tablegate::store::{Row, Store, StoreError, StoreResult, WriteOutcome};

/// Store double: records statements, returns canned rows or a canned error
#[derive(Default)]
struct RecordingStore {
    statements: Mutex<Vec<String>>,
    rows: Vec<Row>,
    failure: Option<StoreError>,
}

impl RecordingStore {
    fn with_rows(rows: Vec<Value>) -> Self {
        let rows = rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        Self {
            rows,
            ..Default::default()
        }
    }

    fn failing(err: StoreError) -> Self {
        Self {
            failure: Some(err),
            ..Default::default()
        }
    }

    fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    fn record(&self, statement: &str) -> StoreResult<()> {
        self.statements.lock().unwrap().push(statement.to_string());
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Store for RecordingStore {
    async fn execute(&self, statement: &str) -> StoreResult<WriteOutcome> {
        self.record(statement)?;
        Ok(WriteOutcome {
            message: String::new(),
            affected_rows: 2,
            changed_rows: 1,
        })
    }

    async fn query(&self, statement: &str) -> StoreResult<Vec<Row>> {
        self.record(statement)?;
        Ok(self.rows.clone())
    }
}

fn router(store: &Arc<RecordingStore>) -> Router {
    HttpServer::new(HttpServerConfig::default(), Arc::clone(store)).router()
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn email_is_empty() -> Value {
    json!({
        "conjunction": "OR",
        "children": [{"op": "is_empty", "left": {"type": "field", "field": "email"}}]
    })
}

// =============================================================================
// QUERIES
// =============================================================================

/// Test: GET turns query parameters into equality filters.
#[tokio::test]
async fn test_get_simple_query() {
    let store = Arc::new(RecordingStore::with_rows(vec![
        json!({"id": 1, "name": "bob", "age": 30}),
    ]));

    let response = router(&store)
        .oneshot(request("GET", "/users?name=bob&age=30", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "status": 0,
            "msg": "Success",
            "data": {"items": [{"id": 1, "name": "bob", "age": 30}], "total": 1}
        })
    );
    assert_eq!(
        store.statements(),
        vec![r#"SELECT * FROM users WHERE name="bob" AND age="30";"#]
    );
}

/// Test: GET without parameters selects the whole table.
#[tokio::test]
async fn test_get_without_parameters() {
    let store = Arc::new(RecordingStore::default());

    let response = router(&store)
        .oneshot(request("GET", "/users", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["total"], 0);
    assert_eq!(store.statements(), vec!["SELECT * FROM users;"]);
}

/// Test: PUT compiles the projection and the condition tree.
#[tokio::test]
async fn test_put_complex_query() {
    let store = Arc::new(RecordingStore::default());
    let body = json!({"columns": ["id", "name"], "conditions": email_is_empty()});

    let response = router(&store)
        .oneshot(request("PUT", "/users", Some(body)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        store.statements(),
        vec!["SELECT id,name FROM users WHERE ((email IS NULL))"]
    );
}

/// Test: PUT with an empty body selects every column of every row.
#[tokio::test]
async fn test_put_empty_body() {
    let store = Arc::new(RecordingStore::default());

    let response = router(&store)
        .oneshot(request("PUT", "/users", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.statements(), vec!["SELECT * FROM users"]);
}

// =============================================================================
// WRITES
// =============================================================================

/// Test: POST ?type=create inserts and reports the row counters.
#[tokio::test]
async fn test_post_create() {
    let store = Arc::new(RecordingStore::default());
    let body = json!({"values": [
        {"column": "name", "value": "Alice"},
        {"column": "age", "value": 30}
    ]});

    let response = router(&store)
        .oneshot(request("POST", "/users?type=create", Some(body)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"status": 0, "msg": "", "affected": 2, "changed": 1})
    );
    assert_eq!(
        store.statements(),
        vec![r#"INSERT INTO users SET name="Alice",age="30""#]
    );
}

/// Test: POST ?type=update appends the compiled WHERE clause.
#[tokio::test]
async fn test_post_update() {
    let store = Arc::new(RecordingStore::default());
    let body = json!({
        "values": [{"column": "active", "value": 0}],
        "conditions": email_is_empty()
    });

    let response = router(&store)
        .oneshot(request("POST", "/users?type=update", Some(body)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        store.statements(),
        vec![r#"UPDATE users SET active="0" WHERE ((email IS NULL))"#]
    );
}

/// Test: POST with a missing or unknown type is rejected before the store.
#[tokio::test]
async fn test_post_invalid_type() {
    for uri in ["/users", "/users?type=upsert"] {
        let store = Arc::new(RecordingStore::default());
        let body = json!({"values": [{"column": "a", "value": 1}]});

        let response = router(&store)
            .oneshot(request("POST", uri, Some(body.clone())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"status": 400, "msg": "req type invalid!", "req": body})
        );
        assert!(store.statements().is_empty());
    }
}

/// Test: DELETE with conditions runs; without them it is refused.
#[tokio::test]
async fn test_delete() {
    let store = Arc::new(RecordingStore::default());

    let response = router(&store)
        .oneshot(request(
            "DELETE",
            "/users",
            Some(json!({"conditions": email_is_empty()})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router(&store)
        .oneshot(request("DELETE", "/users", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({"status": 400, "msg": "Do not allow delete whole table!", "req": {}})
    );

    assert_eq!(
        store.statements(),
        vec!["DELETE FROM users WHERE ((email IS NULL))"]
    );
}

// =============================================================================
// ERRORS
// =============================================================================

/// Test: Generation errors echo the original body.
#[tokio::test]
async fn test_generation_error_echoes_request() {
    let store = Arc::new(RecordingStore::default());
    let body = json!({
        "columns": ["id"],
        "conditions": {"conjunction": "AND", "children": [
            {"op": "between", "left": {"type": "field", "field": "age"}, "right": [1]}
        ]}
    });

    let response = router(&store)
        .oneshot(request("PUT", "/users", Some(body.clone())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = json_body(response).await;
    assert_eq!(payload["msg"], "Where conditions error");
    assert_eq!(payload["req"], body);
    assert!(store.statements().is_empty());
}

/// Test: A body that is not JSON is a client error.
#[tokio::test]
async fn test_invalid_json_body() {
    let store = Arc::new(RecordingStore::default());
    let request = Request::builder()
        .method("PUT")
        .uri("/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{columns"))
        .unwrap();

    let response = router(&store).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = json_body(response).await;
    assert_eq!(payload["status"], 400);
    assert!(payload["msg"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON body"));
}

/// Test: A missing table is reported as 404 with the native error number.
#[tokio::test]
async fn test_missing_table_is_not_found() {
    let store = Arc::new(RecordingStore::failing(StoreError::database(
        1146,
        Some("42S02"),
        "Table 'app.ghosts' doesn't exist",
    )));

    let response = router(&store)
        .oneshot(request("GET", "/ghosts", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await,
        json!({"status": 1146, "msg": "Table 'app.ghosts' doesn't exist"})
    );
}

/// Test: Any other store failure is a 500.
#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let store = Arc::new(RecordingStore::failing(StoreError::database(
        1054,
        Some("42S22"),
        "Unknown column 'nope' in 'field list'",
    )));
    let body = json!({"values": [{"column": "nope", "value": 1}]});

    let response = router(&store)
        .oneshot(request("POST", "/users?type=create", Some(body)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["status"], 1054);
}

// =============================================================================
// CORS
// =============================================================================

/// Test: The request origin is mirrored and credentials are allowed.
#[tokio::test]
async fn test_cors_mirrors_origin() {
    let store = Arc::new(RecordingStore::default());
    let request = Request::builder()
        .method("GET")
        .uri("/users")
        .header(header::ORIGIN, "http://admin.example.com")
        .body(Body::empty())
        .unwrap();

    let response = router(&store).oneshot(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://admin.example.com"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

/// Test: Preflight requests are answered without touching the store.
#[tokio::test]
async fn test_cors_preflight() {
    let store = Arc::new(RecordingStore::default());
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/users")
        .header(header::ORIGIN, "http://admin.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = router(&store).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap()
        .to_string();
    assert!(methods.contains("DELETE"));
    assert!(store.statements().is_empty());
}
