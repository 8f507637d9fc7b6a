use docket_core::stmt::Value;

/// How a logged statement affects the database, judged by its first word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// `DELETE`, `DROP`, `ROLLBACK`
    Destructive,

    /// `INSERT`, `CREATE`, `COMMIT`
    Creating,

    /// `UPDATE`, `ALTER`
    Modifying,

    /// Anything else
    Reading,
}

impl Verb {
    pub fn classify(sql: &str) -> Verb {
        let word = match sql.find(' ') {
            Some(idx) => &sql[..idx],
            None => sql,
        };

        match word.to_ascii_uppercase().as_str() {
            "DELETE" | "DROP" | "ROLLBACK" => Verb::Destructive,
            "INSERT" | "CREATE" | "COMMIT" => Verb::Creating,
            "UPDATE" | "ALTER" => Verb::Modifying,
            _ => Verb::Reading,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Destructive => "destructive",
            Verb::Creating => "creating",
            Verb::Modifying => "modifying",
            Verb::Reading => "reading",
        }
    }
}

pub(crate) fn statement(sql: &str, args: &[Value]) {
    let verb = Verb::classify(sql).as_str();

    if args.is_empty() {
        tracing::debug!(target: "docket::sql", verb, "{sql}");
    } else {
        tracing::debug!(target: "docket::sql", verb, ?args, "{sql}");
    }
}
