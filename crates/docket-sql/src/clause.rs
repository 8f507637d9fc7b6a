use docket_core::stmt::Value;

/// Trailing SQL appended to a generated statement, such as `WHERE id = $1`
/// or `ORDER BY created_at DESC`, together with its placeholder arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clause {
    pub sql: String,
    pub args: Vec<Value>,
}

/// Builds a [`Clause`] from SQL text followed by its arguments.
///
/// ```
/// let clause = docket_sql::clause!("WHERE id = $1 AND status = $2", 7, "new");
/// assert_eq!(clause.args.len(), 2);
/// ```
#[macro_export]
macro_rules! clause {
    ($sql:expr $(, $arg:expr)* $(,)?) => {
        $crate::Clause::new($sql)$(.arg($arg))*
    };
}

impl Clause {
    pub fn new(sql: impl Into<String>) -> Clause {
        Clause {
            sql: sql.into(),
            args: vec![],
        }
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Clause {
        self.args.push(value.into());
        self
    }
}

impl From<()> for Clause {
    fn from(_: ()) -> Clause {
        Clause::default()
    }
}

impl From<&str> for Clause {
    fn from(sql: &str) -> Clause {
        Clause::new(sql)
    }
}

impl From<String> for Clause {
    fn from(sql: String) -> Clause {
        Clause::new(sql)
    }
}
