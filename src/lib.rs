//! tablegate - A generic HTTP-to-SQL table gateway
//!
//! Every `/:table` request is turned into exactly one SQL statement:
//! GET and PUT select, POST inserts or updates, DELETE deletes. Row filters
//! are sent as JSON condition trees and compiled into WHERE clauses.

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod rest_api;
pub mod store;
