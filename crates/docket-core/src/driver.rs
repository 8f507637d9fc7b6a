mod isolation;
pub use isolation::IsolationLevel;

mod rows;
pub use rows::{Row, Rows};

use crate::{async_trait, stmt::Value, Error, Result};

use std::fmt::Debug;

/// A connection to the database, shared by every model that uses it.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Closes the connection. Later calls fail with a no-connection error.
    async fn close(&self) -> Result<()>;

    /// Runs a statement and returns the number of rows it affected.
    async fn execute(&self, sql: &str, args: &[Value]) -> Result<u64>;

    async fn query(&self, sql: &str, args: &[Value]) -> Result<Rows>;

    /// Returns the first row of the result, or the driver's no-rows error.
    async fn query_one(&self, sql: &str, args: &[Value]) -> Result<Row> {
        let mut rows = self.query(sql, args).await?;
        match rows.next().await {
            Some(row) => row,
            None => Err(self.no_rows()),
        }
    }

    /// Opens a transaction, optionally at a specific isolation level.
    async fn begin(&self, isolation: Option<IsolationLevel>) -> Result<Box<dyn Transaction>>;

    /// The error reported when a single-row query finds nothing.
    fn no_rows(&self) -> Error {
        Error::no_rows()
    }

    /// Returns `true` if `err` carries the database error code `code`
    /// (a SQLSTATE for PostgreSQL).
    fn error_has_code(&self, _err: &Error, _code: &str) -> bool {
        false
    }
}

/// An open transaction.
///
/// Implementations roll back when dropped without `commit` or `rollback`
/// having been called.
#[async_trait]
pub trait Transaction: Send {
    async fn execute(&mut self, sql: &str, args: &[Value]) -> Result<u64>;

    async fn query(&mut self, sql: &str, args: &[Value]) -> Result<Rows>;

    async fn query_one(&mut self, sql: &str, args: &[Value]) -> Result<Row> {
        let mut rows = self.query(sql, args).await?;
        match rows.next().await {
            Some(row) => row,
            None => Err(Error::no_rows()),
        }
    }

    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}
