use crate::ExecLog;

use docket::{
    async_trait,
    driver::{IsolationLevel, Row, Rows, Transaction},
    Driver, Error, Result, Value,
};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

/// An in-memory driver that records every call and answers with scripted
/// results.
///
/// Queries pop the next scripted row set (no rows when none is left) and
/// statements pop the next scripted row count (0 when none is left). Any
/// statement containing a registered failure pattern fails with a driver
/// error.
#[derive(Debug, Clone, Default)]
pub struct LoggingDriver {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
pub(crate) struct State {
    /// Log of all operations executed through this driver
    pub(crate) ops: Vec<DriverOp>,
    rows: VecDeque<Vec<Row>>,
    counts: VecDeque<u64>,
    failures: Vec<String>,
    closed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DriverOp {
    Execute { sql: String, args: Vec<Value> },
    Query { sql: String, args: Vec<Value> },
    Begin(Option<IsolationLevel>),
    Commit,
    Rollback,

    /// A transaction dropped without commit or rollback
    Dropped,
}

impl DriverOp {
    /// The statement as the database would have seen it.
    pub fn sql(&self) -> String {
        match self {
            DriverOp::Execute { sql, .. } | DriverOp::Query { sql, .. } => sql.clone(),
            DriverOp::Begin(None) => "BEGIN".to_string(),
            DriverOp::Begin(Some(level)) => format!("BEGIN ISOLATION LEVEL {}", level.sql_name()),
            DriverOp::Commit => "COMMIT".to_string(),
            DriverOp::Rollback => "ROLLBACK".to_string(),
            DriverOp::Dropped => "<dropped>".to_string(),
        }
    }
}

impl LoggingDriver {
    pub fn new() -> LoggingDriver {
        LoggingDriver::default()
    }

    /// A shared handle for a model's `with_driver`.
    pub fn handle(&self) -> Arc<dyn Driver> {
        Arc::new(self.clone())
    }

    /// Get a handle to access the operations log
    pub fn log(&self) -> ExecLog {
        ExecLog::new(self.state.clone())
    }

    /// Scripts the rows returned by the next query.
    pub fn push_rows(&self, rows: Vec<Vec<Value>>) -> &LoggingDriver {
        self.lock()
            .rows
            .push_back(rows.into_iter().map(Row::new).collect());
        self
    }

    /// Scripts the row count returned by the next statement.
    pub fn push_count(&self, count: u64) -> &LoggingDriver {
        self.lock().counts.push_back(count);
        self
    }

    /// Fails every statement whose SQL contains `pattern`.
    pub fn fail_on(&self, pattern: &str) -> &LoggingDriver {
        self.lock().failures.push(pattern.to_string());
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("Failed to acquire driver state lock")
    }

    fn record(state: &Mutex<State>, op: DriverOp) -> Result<()> {
        let mut state = state.lock().expect("Failed to acquire driver state lock");
        if state.closed {
            return Err(Error::no_connection());
        }

        let sql = op.sql();
        state.ops.push(op);

        match state.failures.iter().find(|pattern| sql.contains(pattern.as_str())) {
            Some(_) => Err(Error::driver(std::io::Error::other(format!(
                "scripted failure: {sql}"
            )))),
            None => Ok(()),
        }
    }

    fn execute_on(state: &Mutex<State>, sql: &str, args: &[Value]) -> Result<u64> {
        LoggingDriver::record(
            state,
            DriverOp::Execute {
                sql: sql.to_string(),
                args: args.to_vec(),
            },
        )?;
        let mut state = state.lock().expect("Failed to acquire driver state lock");
        Ok(state.counts.pop_front().unwrap_or(0))
    }

    fn query_on(state: &Mutex<State>, sql: &str, args: &[Value]) -> Result<Rows> {
        LoggingDriver::record(
            state,
            DriverOp::Query {
                sql: sql.to_string(),
                args: args.to_vec(),
            },
        )?;
        let mut state = state.lock().expect("Failed to acquire driver state lock");
        Ok(Rows::from_vec(state.rows.pop_front().unwrap_or_default()))
    }
}

#[async_trait]
impl Driver for LoggingDriver {
    async fn close(&self) -> Result<()> {
        self.lock().closed = true;
        Ok(())
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> Result<u64> {
        LoggingDriver::execute_on(&self.state, sql, args)
    }

    async fn query(&self, sql: &str, args: &[Value]) -> Result<Rows> {
        LoggingDriver::query_on(&self.state, sql, args)
    }

    async fn begin(&self, isolation: Option<IsolationLevel>) -> Result<Box<dyn Transaction>> {
        LoggingDriver::record(&self.state, DriverOp::Begin(isolation))?;
        Ok(Box::new(LoggingTransaction {
            state: self.state.clone(),
            finished: false,
        }))
    }
}

#[derive(Debug)]
struct LoggingTransaction {
    state: Arc<Mutex<State>>,
    finished: bool,
}

#[async_trait]
impl Transaction for LoggingTransaction {
    async fn execute(&mut self, sql: &str, args: &[Value]) -> Result<u64> {
        LoggingDriver::execute_on(&self.state, sql, args)
    }

    async fn query(&mut self, sql: &str, args: &[Value]) -> Result<Rows> {
        LoggingDriver::query_on(&self.state, sql, args)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let mut this = self;
        this.finished = true;
        LoggingDriver::record(&this.state, DriverOp::Commit)
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        let mut this = self;
        this.finished = true;
        LoggingDriver::record(&this.state, DriverOp::Rollback)
    }
}

impl Drop for LoggingTransaction {
    fn drop(&mut self) {
        if !self.finished {
            if let Ok(mut state) = self.state.lock() {
                state.ops.push(DriverOp::Dropped);
            }
        }
    }
}
