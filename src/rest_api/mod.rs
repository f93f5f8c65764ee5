//! # REST API Module
//!
//! Maps HTTP requests on `/:table` to generated SQL statements and runs them
//! against the store.

pub mod compiler;
pub mod errors;
pub mod filter;
pub mod generator;
pub mod handler;
pub mod parser;
pub mod response;
pub mod server;

pub use compiler::compile_where;
pub use errors::{CompileError, GenerateError, RestError, RestResult};
pub use filter::{Condition, ConditionGroup, ConditionNode, Conjunction, OpCode, Operand};
pub use generator::{
    delete_statement, insert_statement, select_statement, simple_query_statement,
    update_statement, Operation,
};
pub use handler::RestHandler;
pub use parser::ColumnAssignment;
pub use response::{QueryResponse, WriteResponse};
pub use server::rest_routes;
