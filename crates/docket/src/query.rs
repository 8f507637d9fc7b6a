use crate::{log, transaction::Scope, Destination, Model, Record, TxOptions};

use docket_core::{driver::Transaction, stmt::Value, Result};
use docket_sql::Statement;

/// A statement bound to the model that built it.
///
/// Nothing touches the database until one of the `execute` or `query`
/// methods is awaited.
#[derive(Debug)]
pub struct Query<'a, R: Record> {
    model: &'a Model<R>,
    stmt: Statement,
}

impl<'a, R: Record> Query<'a, R> {
    pub(crate) fn new(model: &'a Model<R>, stmt: Statement) -> Query<'a, R> {
        Query { model, stmt }
    }

    pub fn sql(&self) -> &str {
        &self.stmt.sql
    }

    pub fn values(&self) -> &[Value] {
        &self.stmt.values
    }

    pub fn statement(&self) -> &Statement {
        &self.stmt
    }

    pub fn into_statement(self) -> Statement {
        self.stmt
    }

    /// Runs the statement and returns the number of rows it affected.
    pub async fn execute(&self) -> Result<u64> {
        let driver = self.model.driver()?;
        self.log();
        driver.execute(&self.stmt.sql, &self.stmt.values).await
    }

    /// Runs the statement and loads the result into `dest`.
    ///
    /// Single-value destinations read the first row and fail with the
    /// driver's no-rows error when there is none. Collections take every
    /// row.
    pub async fn query<D: Destination<R>>(&self, dest: &mut D) -> Result<()> {
        let driver = self.model.driver()?;
        self.log();

        if D::MANY {
            let mut rows = driver.query(&self.stmt.sql, &self.stmt.values).await?;
            while let Some(row) = rows.next().await {
                dest.load(row?)?;
            }
        } else {
            let row = driver.query_one(&self.stmt.sql, &self.stmt.values).await?;
            dest.load(row)?;
        }
        Ok(())
    }

    /// Runs the statement on an already open transaction, typically from
    /// inside a hook.
    pub async fn exec_tx(&self, tx: &mut dyn Transaction) -> Result<u64> {
        self.model.driver()?;
        self.log();
        tx.execute(&self.stmt.sql, &self.stmt.values).await
    }

    /// Like [`Query::query`], on an already open transaction.
    pub async fn query_tx<D: Destination<R>>(
        &self,
        tx: &mut dyn Transaction,
        dest: &mut D,
    ) -> Result<()> {
        self.model.driver()?;
        self.log();

        if D::MANY {
            let mut rows = tx.query(&self.stmt.sql, &self.stmt.values).await?;
            while let Some(row) = rows.next().await {
                dest.load(row?)?;
            }
        } else {
            let row = tx.query_one(&self.stmt.sql, &self.stmt.values).await?;
            dest.load(row)?;
        }
        Ok(())
    }

    /// Runs the statement inside a transaction shaped by `options`.
    ///
    /// The sequence is `BEGIN`, the `before` hook, the statement, the
    /// `after` hook, then `COMMIT`. The first failure rolls the transaction
    /// back and is returned as is.
    pub async fn execute_in(&self, options: TxOptions<'_>) -> Result<u64> {
        if options.is_direct() {
            return self.execute().await;
        }

        let TxOptions {
            isolation,
            before,
            after,
        } = options;

        let driver = self.model.driver()?;
        let mut scope = Scope::begin(&**driver, isolation, self.model.logging()).await?;

        let res: Result<u64> = async {
            if let Some(hook) = before {
                hook(scope.tx()).await?;
            }
            let count = self.exec_tx(scope.tx()).await?;
            if let Some(hook) = after {
                hook(scope.tx()).await?;
            }
            Ok(count)
        }
        .await;

        scope.finish(res).await
    }

    /// Like [`Query::execute_in`], loading the result into `dest`.
    pub async fn query_in<D: Destination<R>>(
        &self,
        options: TxOptions<'_>,
        dest: &mut D,
    ) -> Result<()> {
        if options.is_direct() {
            return self.query(dest).await;
        }

        let TxOptions {
            isolation,
            before,
            after,
        } = options;

        let driver = self.model.driver()?;
        let mut scope = Scope::begin(&**driver, isolation, self.model.logging()).await?;

        let res: Result<()> = async {
            if let Some(hook) = before {
                hook(scope.tx()).await?;
            }
            self.query_tx(scope.tx(), dest).await?;
            if let Some(hook) = after {
                hook(scope.tx()).await?;
            }
            Ok(())
        }
        .await;

        scope.finish(res).await
    }

    /// Like [`Query::execute`], panicking on error.
    pub async fn must_execute(&self) -> u64 {
        must(self.execute().await)
    }

    /// Like [`Query::query`], panicking on error.
    pub async fn must_query<D: Destination<R>>(&self, dest: &mut D) {
        must(self.query(dest).await)
    }

    /// Like [`Query::execute_in`], panicking on error.
    pub async fn must_execute_in(&self, options: TxOptions<'_>) -> u64 {
        must(self.execute_in(options).await)
    }

    /// Like [`Query::query_in`], panicking on error.
    pub async fn must_query_in<D: Destination<R>>(&self, options: TxOptions<'_>, dest: &mut D) {
        must(self.query_in(options, dest).await)
    }

    fn log(&self) {
        if self.model.logging() {
            log::statement(&self.stmt.sql, &self.stmt.values);
        }
    }
}

#[track_caller]
pub(crate) fn must<T>(res: Result<T>) -> T {
    match res {
        Ok(value) => value,
        Err(err) => panic!("{err}"),
    }
}
