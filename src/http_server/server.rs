//! # HTTP Server
//!
//! Wraps the table routes with CORS and request tracing and serves them.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::rest_api::{rest_routes, RestHandler};
use crate::store::Store;

use super::config::HttpServerConfig;

/// HTTP server for the table gateway
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server executing statements against `store`
    pub fn new<S: Store + 'static>(config: HttpServerConfig, store: Arc<S>) -> Self {
        let router = Self::build_router(store);
        Self { config, router }
    }

    /// Build the router with CORS and tracing layers
    fn build_router<S: Store + 'static>(store: Arc<S>) -> Router {
        let handler = Arc::new(RestHandler::new(store));

        rest_routes(handler)
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer())
            .layer(middleware::from_fn(preflight_no_content))
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        info!(addr = %listener.local_addr()?, "Server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

/// The request origin is mirrored back and credentials are allowed
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request())
}

/// Answer successful CORS preflights with 204 No Content
async fn preflight_no_content(req: Request<Body>, next: Next) -> Response {
    let preflight = req.method() == Method::OPTIONS
        && req.headers().contains_key(header::ACCESS_CONTROL_REQUEST_METHOD);

    let mut res = next.run(req).await;
    if preflight && res.status() == StatusCode::OK {
        *res.status_mut() = StatusCode::NO_CONTENT;
    }
    res
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
