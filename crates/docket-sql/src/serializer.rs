#[macro_use]
mod fmt;
use fmt::ToSql;

mod assignments;
use assignments::Assignments;

mod delim;
use delim::Comma;

mod params;
use params::Param;
pub use params::{Params, Placeholder};

use crate::{Clause, Statement};

use docket_core::{
    schema::RecordSchema,
    stmt::{ChangeSet, Value},
};

/// Generates statements against one table.
///
/// Column layout comes from the record schema; the table name is passed
/// separately so models can override it at run time.
#[derive(Debug, Clone, Copy)]
pub struct Serializer<'a> {
    table: &'a str,
    schema: &'a RecordSchema,
}

struct Formatter<'a, P> {
    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut P,
}

impl<'a> Serializer<'a> {
    pub fn new(table: &'a str, schema: &'a RecordSchema) -> Serializer<'a> {
        Serializer { table, schema }
    }

    /// `SELECT <projection> FROM <table> <clause>`
    pub fn select(&self, projection: &str, clause: Clause) -> Statement {
        let table = self.table;
        let where_ = clause.sql.as_str();
        self.serialize(clause.args, |f| {
            fmt!(f, "SELECT " projection " FROM " table " " where_);
        })
    }

    /// Selects every flat column followed by each document column.
    pub fn find(&self, clause: Clause) -> Statement {
        let columns = self.schema.columns().join(", ");
        self.select(&columns, clause)
    }

    /// `INSERT INTO <table> (<columns>) VALUES (<placeholders>) <suffix>`
    ///
    /// Later change sets override earlier ones field by field. Each document
    /// column receives one JSON object holding all of its keys.
    pub fn insert(&self, changes: &[ChangeSet], suffix: &str) -> Statement {
        let assignments = Assignments::new(changes);
        let table = self.table;

        self.serialize(vec![], |f| {
            let columns = Comma(assignments.columns());
            let values = Comma(assignments.insert_params());
            fmt!(f, "INSERT INTO " table " (" columns ") VALUES (" values ") " suffix);
        })
    }

    /// `UPDATE <table> SET <assignments> <clause>`
    ///
    /// Clause arguments take the first placeholders; assignments continue
    /// the numbering after them.
    pub fn update(&self, changes: &[ChangeSet], clause: Clause) -> Statement {
        let assignments = Assignments::new(changes);
        let table = self.table;
        let where_ = clause.sql.as_str();

        self.serialize(clause.args, |f| {
            let set = Comma(assignments.update_items());
            fmt!(f, "UPDATE " table " SET " set " " where_);
        })
    }

    /// `DELETE FROM <table> <clause>`
    pub fn delete(&self, clause: Clause) -> Statement {
        let table = self.table;
        let where_ = clause.sql.as_str();
        self.serialize(clause.args, |f| {
            fmt!(f, "DELETE FROM " table " " where_);
        })
    }

    /// `CREATE TABLE` for the schema, wrapped in the type's before and after
    /// SQL when it declares any.
    pub fn create_table(&self) -> String {
        let mut lines = vec![];
        for field in self.schema.flat_fields() {
            lines.push(format!(
                "\t{} {}",
                field.column,
                field.data_type.as_deref().unwrap_or_default()
            ));
        }

        for doc in &self.schema.document_columns {
            let data_type = self
                .schema
                .document_fields(doc)
                .find_map(|field| field.data_type.as_deref())
                .unwrap_or("jsonb DEFAULT '{}'::jsonb NOT NULL");
            lines.push(format!("\t{doc} {data_type}"));
        }

        let mut out = format!("CREATE TABLE {} (\n{}\n);\n", self.table, lines.join(",\n"));

        if let Some(before) = &self.schema.before_create {
            out = format!("{before}\n\n{out}");
        }

        if let Some(after) = &self.schema.after_create {
            out.push('\n');
            out.push_str(after);
            out.push('\n');
        }

        out
    }

    /// `DROP TABLE IF EXISTS <table>;`
    pub fn drop_table(&self) -> String {
        format!("DROP TABLE IF EXISTS {};\n", self.table)
    }

    fn serialize(
        &self,
        mut params: Vec<Value>,
        body: impl FnOnce(&mut Formatter<'_, Vec<Value>>),
    ) -> Statement {
        let mut sql = String::new();

        let mut f = Formatter {
            dst: &mut sql,
            params: &mut params,
        };
        body(&mut f);

        Statement::new(sql, params)
    }
}
