use docket_core::stmt::Value;

/// SQL text and its ordered parameter values, ready for the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub values: Vec<Value>,
}

impl Statement {
    /// Leading and trailing whitespace is stripped from `sql`.
    pub fn new(sql: impl AsRef<str>, values: Vec<Value>) -> Statement {
        Statement {
            sql: sql.as_ref().trim().to_string(),
            values,
        }
    }
}

impl core::fmt::Display for Statement {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.sql)
    }
}
