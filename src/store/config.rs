//! MySQL connection configuration
//!
//! Field names follow the usual `mysql-config.json` layout so an existing
//! connection file can be reused as the `mysql` section.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use mysql_async::{Opts, OptsBuilder, PoolConstraints, PoolOpts};

/// MySQL connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MySqlConfig {
    /// Server host (default: "localhost")
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port (default: 3306)
    #[serde(default = "default_port")]
    pub port: u16,

    /// User name (default: "root")
    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    /// Default database for unqualified table names
    #[serde(default)]
    pub database: Option<String>,

    /// Pool size (default: 10)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Delay between connection attempts at startup (default: 2s)
    #[serde(default = "default_retry_interval_secs")]
    pub retry_interval_secs: u64,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    3306
}

fn default_user() -> String {
    "root".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_retry_interval_secs() -> u64 {
    2
}

impl Default for MySqlConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: default_user(),
            password: String::new(),
            database: None,
            max_connections: default_max_connections(),
            retry_interval_secs: default_retry_interval_secs(),
        }
    }
}

impl MySqlConfig {
    /// Build driver options.
    ///
    /// Found rows are reported as affected rows, and the session runs in UTC
    /// so TIMESTAMP values can be rendered with a `Z` suffix.
    pub fn opts(&self) -> Opts {
        let constraints = PoolConstraints::new(0, self.max_connections as usize).unwrap_or_default();

        OptsBuilder::default()
            .ip_or_hostname(self.host.clone())
            .tcp_port(self.port)
            .user(Some(self.user.clone()))
            .pass(Some(self.password.clone()))
            .db_name(self.database.clone())
            .client_found_rows(true)
            .init(vec!["SET time_zone = '+00:00'"])
            .pool_opts(PoolOpts::default().with_constraints(constraints))
            .into()
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }
}
