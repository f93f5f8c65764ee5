//! CLI module for tablegate
//!
//! Provides command-line interface for:
//! - serve: Connect to MySQL and serve the HTTP gateway
//! - render: Print the SQL for one request without executing it

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{render, render_statement, run, run_command, serve, Config};
pub use errors::{CliError, CliResult};
