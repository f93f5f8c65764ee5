//! # HTTP Server Module
//!
//! Serves the table routes over HTTP.
//!
//! # Endpoints
//!
//! - `GET /:table` - Simple query
//! - `PUT /:table` - Complex query
//! - `POST /:table?type=create|update` - Insert or update
//! - `DELETE /:table` - Delete

pub mod config;
pub mod server;

pub use config::HttpServerConfig;
pub use server::HttpServer;
