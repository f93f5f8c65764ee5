//! MySQL store backed by a `mysql_async` connection pool.
//!
//! Statements go over the text protocol, so every column value arrives as
//! bytes and is converted to JSON according to the column's declared type.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use mysql_async::consts::{ColumnFlags, ColumnType};
use mysql_async::prelude::Queryable;
use mysql_async::{Pool, Row as MySqlRow, Value as MySqlValue};
use serde_json::{Number, Value};
use tracing::{error, info};

use super::config::MySqlConfig;
use super::errors::StoreResult;
use super::{Row, Store, WriteOutcome};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Store handle shared by all requests
#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: Pool,
}

impl MySqlStore {
    /// Open a pool and check out one connection, failing on the first error
    pub async fn connect(config: &MySqlConfig) -> StoreResult<Self> {
        let pool = Pool::new(config.opts());

        match pool.get_conn().await {
            Ok(conn) => {
                drop(conn);
                Ok(Self { pool })
            }
            Err(err) => {
                let _ = pool.disconnect().await;
                Err(err.into())
            }
        }
    }

    /// Keep trying to open the pool until the server accepts a connection.
    ///
    /// Once connected, broken connections are replaced by the pool itself.
    pub async fn connect_with_retry(config: &MySqlConfig) -> Self {
        loop {
            match Self::connect(config).await {
                Ok(store) => {
                    info!(host = %config.host, port = config.port, "Connect to MySQL success!");
                    return store;
                }
                Err(err) => {
                    error!(
                        error = %err,
                        errno = ?err.errno(),
                        retry_in = ?config.retry_interval(),
                        "Connect to MySQL failed"
                    );
                    tokio::time::sleep(config.retry_interval()).await;
                }
            }
        }
    }

    /// Close all pooled connections
    pub async fn close(&self) {
        if let Err(err) = self.pool.clone().disconnect().await {
            error!(error = %err, "Closing MySQL pool failed");
        }
    }
}

#[async_trait]
impl Store for MySqlStore {
    async fn execute(&self, statement: &str) -> StoreResult<WriteOutcome> {
        let mut conn = self.pool.get_conn().await?;
        conn.query_drop(statement).await?;

        let message = conn.info().into_owned();
        Ok(WriteOutcome {
            changed_rows: changed_rows(&message),
            affected_rows: conn.affected_rows(),
            message,
        })
    }

    async fn query(&self, statement: &str) -> StoreResult<Vec<Row>> {
        let mut conn = self.pool.get_conn().await?;
        let rows: Vec<MySqlRow> = conn.query(statement).await?;

        Ok(rows.iter().map(row_to_json).collect())
    }
}

/// Changed-row count from the server's info string.
///
/// Only UPDATE reports one (`Rows matched: 2  Changed: 1  Warnings: 0`);
/// every other statement counts as zero changed rows.
fn changed_rows(info: &str) -> u64 {
    let lower = info.to_ascii_lowercase();
    lower
        .find("changed:")
        .map(|pos| lower[pos + "changed:".len()..].trim_start())
        .and_then(|rest| {
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        })
        .unwrap_or(0)
}

/// JSON rendering chosen for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Signed,
    Unsigned,
    Float,
    Json,
    DateTime,
    /// Rendered as UTC; the session time zone is set at connect time
    Timestamp,
    Text,
}

impl ColumnKind {
    fn of(column_type: ColumnType, flags: ColumnFlags) -> Self {
        use ColumnType::*;

        match column_type {
            MYSQL_TYPE_TINY | MYSQL_TYPE_SHORT | MYSQL_TYPE_INT24 | MYSQL_TYPE_LONG
            | MYSQL_TYPE_LONGLONG | MYSQL_TYPE_YEAR => {
                if flags.contains(ColumnFlags::UNSIGNED_FLAG) {
                    ColumnKind::Unsigned
                } else {
                    ColumnKind::Signed
                }
            }
            MYSQL_TYPE_FLOAT | MYSQL_TYPE_DOUBLE => ColumnKind::Float,
            MYSQL_TYPE_JSON => ColumnKind::Json,
            MYSQL_TYPE_DATETIME | MYSQL_TYPE_DATETIME2 => ColumnKind::DateTime,
            MYSQL_TYPE_TIMESTAMP | MYSQL_TYPE_TIMESTAMP2 => ColumnKind::Timestamp,
            _ => ColumnKind::Text,
        }
    }
}

/// Convert a row into a JSON object, keeping column order
fn row_to_json(row: &MySqlRow) -> Row {
    row.columns_ref()
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let kind = ColumnKind::of(column.column_type(), column.flags());
            let value = row
                .as_ref(index)
                .map(|value| column_value(kind, value))
                .unwrap_or(Value::Null);
            (column.name_str().into_owned(), value)
        })
        .collect()
}

fn column_value(kind: ColumnKind, value: &MySqlValue) -> Value {
    match value {
        MySqlValue::NULL => Value::Null,
        MySqlValue::Bytes(bytes) => text_column(kind, bytes),
        MySqlValue::Int(n) => Value::from(*n),
        MySqlValue::UInt(n) => Value::from(*n),
        MySqlValue::Float(f) => float_value(f64::from(*f)).unwrap_or(Value::Null),
        MySqlValue::Double(f) => float_value(*f).unwrap_or(Value::Null),
        // Binary-protocol temporal values; statements here never produce them
        other => Value::String(other.as_sql(true).trim_matches('\'').to_string()),
    }
}

/// Decode a text-protocol value. Anything the typed decoders reject (zero
/// dates, out-of-range numbers, NaN) is returned as its text.
fn text_column(kind: ColumnKind, bytes: &[u8]) -> Value {
    let text = String::from_utf8_lossy(bytes);

    let typed = match kind {
        ColumnKind::Signed => text.parse::<i64>().ok().map(Value::from),
        ColumnKind::Unsigned => text.parse::<u64>().ok().map(Value::from),
        ColumnKind::Float => text.parse::<f64>().ok().and_then(float_value),
        ColumnKind::Json => serde_json::from_slice(bytes).ok(),
        ColumnKind::DateTime => NaiveDateTime::parse_from_str(&text, DATETIME_FORMAT)
            .ok()
            .map(|dt| Value::String(dt.format("%Y-%m-%dT%H:%M:%S%.3f").to_string())),
        ColumnKind::Timestamp => NaiveDateTime::parse_from_str(&text, DATETIME_FORMAT)
            .ok()
            .map(|dt| Value::String(dt.and_utc().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())),
        ColumnKind::Text => None,
    };

    typed.unwrap_or_else(|| Value::String(text.into_owned()))
}

fn float_value(f: f64) -> Option<Value> {
    Number::from_f64(f).map(Value::Number)
}
