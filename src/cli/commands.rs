//! CLI command implementations

use std::env;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability;
use crate::rest_api::{GenerateError, Operation};
use crate::store::{MySqlConfig, MySqlStore};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_statement};

/// Environment variable overriding `server.port`
const PORT_ENV: &str = "PORT";

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener settings
    #[serde(default)]
    pub server: HttpServerConfig,

    /// MySQL connection settings
    #[serde(default)]
    pub mysql: MySqlConfig,
}

impl Config {
    /// Load configuration from file, then apply the `PORT` override
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.apply_port_override(env::var(PORT_ENV).ok().as_deref())?;
        config.validate()?;

        Ok(config)
    }

    fn apply_port_override(&mut self, port: Option<&str>) -> CliResult<()> {
        if let Some(port) = port {
            self.server.port = port.trim().parse().map_err(|_| {
                CliError::config_error(format!("Invalid {} value: '{}'", PORT_ENV, port))
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> CliResult<()> {
        if self.mysql.max_connections == 0 {
            return Err(CliError::config_error("mysql.max_connections must be > 0"));
        }
        if self.mysql.host.is_empty() {
            return Err(CliError::config_error("mysql.host must not be empty"));
        }
        Ok(())
    }
}

/// Main CLI entry point
///
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config } => serve(&config),
        Command::Render {
            table,
            method,
            request_type,
        } => render(&table, &method, request_type.as_deref()),
    }
}

/// Connect to MySQL (retrying until it answers) and serve the gateway
pub fn serve(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    observability::init_tracing_with_level(&config.server.log_level);

    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let store = Arc::new(MySqlStore::connect_with_retry(&config.mysql).await);
        let server = HttpServer::new(config.server.clone(), Arc::clone(&store));

        let served = server.start().await;
        store.close().await;
        info!("Server stopped");
        served
    })?;

    Ok(())
}

/// Print the statement for one request read from stdin
pub fn render(table: &str, method: &str, request_type: Option<&str>) -> CliResult<()> {
    let request = read_request()?;

    match render_statement(table, method, request_type, &request) {
        Ok(sql) => write_statement(&sql),
        Err(err) => write_error(&err.to_string()),
    }
}

/// Generate the statement a request would execute
pub fn render_statement(
    table: &str,
    method: &str,
    request_type: Option<&str>,
    request: &Value,
) -> Result<String, GenerateError> {
    Operation::resolve(method, request_type)?.generate(table, request)
}
