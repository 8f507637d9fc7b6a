use crate::log;

use docket_core::{
    driver::{Driver, IsolationLevel, Transaction},
    Result,
};

use std::{future::Future, pin::Pin};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Work run inside the transaction before or after the main statement.
pub type Hook<'a> =
    Box<dyn for<'t> FnOnce(&'t mut dyn Transaction) -> BoxFuture<'t, Result<()>> + Send + 'a>;

/// How [`Query::execute_in`](crate::Query::execute_in) and
/// [`Query::query_in`](crate::Query::query_in) wrap their statement.
///
/// With neither an isolation level nor hooks the statement runs directly on
/// the driver.
#[derive(Default)]
pub struct TxOptions<'a> {
    pub(crate) isolation: Option<IsolationLevel>,
    pub(crate) before: Option<Hook<'a>>,
    pub(crate) after: Option<Hook<'a>>,
}

impl<'a> TxOptions<'a> {
    pub fn new() -> TxOptions<'a> {
        TxOptions::default()
    }

    pub fn isolation(mut self, level: IsolationLevel) -> TxOptions<'a> {
        self.isolation = Some(level);
        self
    }

    pub fn before<F>(mut self, hook: F) -> TxOptions<'a>
    where
        F: for<'t> FnOnce(&'t mut dyn Transaction) -> BoxFuture<'t, Result<()>> + Send + 'a,
    {
        self.before = Some(Box::new(hook));
        self
    }

    pub fn after<F>(mut self, hook: F) -> TxOptions<'a>
    where
        F: for<'t> FnOnce(&'t mut dyn Transaction) -> BoxFuture<'t, Result<()>> + Send + 'a,
    {
        self.after = Some(Box::new(hook));
        self
    }

    pub(crate) fn is_direct(&self) -> bool {
        self.isolation.is_none() && self.before.is_none() && self.after.is_none()
    }
}

impl core::fmt::Debug for TxOptions<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TxOptions")
            .field("isolation", &self.isolation)
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}

/// An open transaction that ends in exactly one `COMMIT` or `ROLLBACK`.
///
/// Dropping an unfinished scope, for example while unwinding from a panic in
/// a hook, drops the driver transaction, which rolls it back.
pub(crate) struct Scope {
    tx: Option<Box<dyn Transaction>>,
    logging: bool,
}

impl Scope {
    pub(crate) async fn begin(
        driver: &dyn Driver,
        isolation: Option<IsolationLevel>,
        logging: bool,
    ) -> Result<Scope> {
        if logging {
            log::statement("BEGIN", &[]);
        }
        let tx = driver.begin(isolation).await?;
        Ok(Scope {
            tx: Some(tx),
            logging,
        })
    }

    #[track_caller]
    pub(crate) fn tx(&mut self) -> &mut dyn Transaction {
        match &mut self.tx {
            Some(tx) => &mut **tx,
            None => panic!("transaction already finished"),
        }
    }

    /// Commits when `res` is `Ok`, otherwise rolls back and returns the
    /// original error. A failed rollback is only logged.
    pub(crate) async fn finish<T>(mut self, res: Result<T>) -> Result<T> {
        let Some(tx) = self.tx.take() else {
            return res;
        };

        match res {
            Ok(value) => {
                if self.logging {
                    log::statement("COMMIT", &[]);
                }
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if self.logging {
                    log::statement("ROLLBACK", &[]);
                }
                if let Err(rollback) = tx.rollback().await {
                    tracing::warn!(target: "docket::sql", error = %rollback, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        if self.tx.is_some() && self.logging {
            log::statement("ROLLBACK", &[]);
        }
    }
}
