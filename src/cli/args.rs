//! CLI argument definitions using clap
//!
//! Commands:
//! - tablegate serve --config <path>
//! - tablegate render --table <name> --method <verb> [--type create|update]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tablegate - HTTP-to-SQL table gateway
#[derive(Parser, Debug)]
#[command(name = "tablegate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP gateway
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./tablegate.json")]
        config: PathBuf,
    },

    /// Print the SQL a request would generate, without executing it.
    ///
    /// The request body is read from stdin. For GET it is a flat object of
    /// equality filters.
    Render {
        /// Target table
        #[arg(long)]
        table: String,

        /// HTTP method: GET, PUT, POST or DELETE
        #[arg(long, default_value = "GET")]
        method: String,

        /// POST request type: create or update
        #[arg(long = "type")]
        request_type: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_render() {
        let cli = Cli::try_parse_from([
            "tablegate", "render", "--table", "users", "--method", "POST", "--type", "create",
        ])
        .unwrap();

        match cli.command {
            Command::Render {
                table,
                method,
                request_type,
            } => {
                assert_eq!(table, "users");
                assert_eq!(method, "POST");
                assert_eq!(request_type.as_deref(), Some("create"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_serve_default_config_path() {
        let cli = Cli::try_parse_from(["tablegate", "serve"]).unwrap();
        match cli.command {
            Command::Serve { config } => assert_eq!(config, PathBuf::from("./tablegate.json")),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
