//! Store errors

use thiserror::Error;

/// MySQL `ER_NO_SUCH_TABLE`
const ER_NO_SUCH_TABLE: u32 = 1146;

/// SQLSTATE for a missing base table
const SQLSTATE_NO_SUCH_TABLE: &str = "42S02";

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// A failure reported by the store, carrying its native code and message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StoreError {
    errno: Option<u32>,
    sqlstate: Option<String>,
    message: String,
}

impl StoreError {
    /// Error raised by the database server for a statement
    pub fn database(errno: u32, sqlstate: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            errno: Some(errno),
            sqlstate: sqlstate.map(str::to_string),
            message: message.into(),
        }
    }

    /// Error without a server error number (pool, network, decoding)
    pub fn connection(message: impl Into<String>) -> Self {
        Self {
            errno: None,
            sqlstate: None,
            message: message.into(),
        }
    }

    /// Native error number, if the server produced one
    pub fn errno(&self) -> Option<u32> {
        self.errno
    }

    pub fn sqlstate(&self) -> Option<&str> {
        self.sqlstate.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The statement referenced a table that does not exist
    pub fn is_missing_table(&self) -> bool {
        self.errno == Some(ER_NO_SUCH_TABLE) || self.sqlstate() == Some(SQLSTATE_NO_SUCH_TABLE)
    }
}

impl From<mysql_async::Error> for StoreError {
    fn from(err: mysql_async::Error) -> Self {
        match err {
            mysql_async::Error::Server(server) => {
                Self::database(u32::from(server.code), Some(&server.state), server.message)
            }
            other => Self::connection(other.to_string()),
        }
    }
}
