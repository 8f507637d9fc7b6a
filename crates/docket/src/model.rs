use crate::{
    input::{Fields, Input},
    record::unknown_field,
    Permit, Query, Record,
};

use docket_core::{
    schema::{Field, FieldId, RecordSchema, SchemaBuilder},
    stmt::{ChangeSet, Value},
    Driver, Error, Result,
};
use docket_sql::{Clause, Serializer, Statement};

use chrono::Utc;
use std::{marker::PhantomData, sync::Arc, sync::OnceLock};

/// A table bound to a record type.
///
/// Builds statements from change sets and runs them through the configured
/// driver. Cloning is cheap; clones share the driver.
pub struct Model<R: Record> {
    driver: Option<Arc<dyn Driver>>,
    table_name: String,
    logging: bool,
    _record: PhantomData<fn() -> R>,
}

/// Stand-in record for models that only know their table name.
#[derive(Debug, Default, Clone, Copy)]
pub struct Untyped;

impl<R: Record> Model<R> {
    pub fn new() -> Model<R> {
        Model {
            driver: None,
            table_name: R::schema().table_name.clone(),
            logging: false,
            _record: PhantomData,
        }
    }

    pub fn with_driver(mut self, driver: Arc<dyn Driver>) -> Model<R> {
        self.driver = Some(driver);
        self
    }

    /// Overrides the table name declared on the record type.
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Model<R> {
        self.table_name = table_name.into();
        self
    }

    /// Emits every statement this model runs as a `tracing` event.
    pub fn with_logging(mut self, logging: bool) -> Model<R> {
        self.logging = logging;
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn record_schema(&self) -> &'static RecordSchema {
        R::schema()
    }

    pub fn fields(&self) -> &'static [Field] {
        &R::schema().fields
    }

    pub fn document_columns(&self) -> &'static [String] {
        &R::schema().document_columns
    }

    pub fn field_by_name(&self, name: &str) -> Option<&'static Field> {
        R::schema().field_by_name(name)
    }

    pub(crate) fn driver(&self) -> Result<&Arc<dyn Driver>> {
        self.driver.as_ref().ok_or_else(Error::no_connection)
    }

    pub(crate) fn logging(&self) -> bool {
        self.logging
    }

    fn serializer(&self) -> Serializer<'_> {
        Serializer::new(&self.table_name, R::schema())
    }

    /// Permits the named fields for mass assignment. Names are declared
    /// field names; unknown names are ignored.
    pub fn permit(&self, names: &[&str]) -> Permit<'_, R> {
        let fields = self
            .fields()
            .iter()
            .filter(|field| names.contains(&field.name.as_str()))
            .map(|field| field.id)
            .collect();
        Permit::new(self, fields)
    }

    /// Permits every field except the named ones.
    pub fn permit_all_except(&self, names: &[&str]) -> Permit<'_, R> {
        let fields = self
            .fields()
            .iter()
            .filter(|field| !names.contains(&field.name.as_str()))
            .map(|field| field.id)
            .collect();
        Permit::new(self, fields)
    }

    /// Builds a change set from `input` with every field eligible.
    pub fn changes(&self, input: impl Into<Input>) -> ChangeSet {
        let input = input.into().parse();
        let mut changes = ChangeSet::new(R::schema());
        self.collect(self.fields().iter().map(|field| field.id), &input, &mut changes);
        changes
    }

    pub(crate) fn collect(
        &self,
        fields: impl IntoIterator<Item = FieldId>,
        input: &Fields,
        changes: &mut ChangeSet,
    ) {
        for id in fields {
            let field = R::schema().field(id);
            let Some(json) = input.get(field) else {
                continue;
            };
            if let Some(value) = R::coerce(id, json.clone()) {
                changes.insert(id, value);
            }
        }
    }

    /// Stamps `created_at` with the current time.
    pub fn created_at(&self) -> ChangeSet {
        self.changes(serde_json::json!({ "created_at": Utc::now() }))
    }

    /// Stamps `updated_at` with the current time.
    pub fn updated_at(&self) -> ChangeSet {
        self.changes(serde_json::json!({ "updated_at": Utc::now() }))
    }

    /// Writes the values of `change_sets` onto `target`, later sets
    /// overriding earlier ones. Values the target's fields do not accept are
    /// skipped. Returns the change sets for use in a following statement.
    pub fn assign(&self, target: &mut R, change_sets: Vec<ChangeSet>) -> Vec<ChangeSet> {
        for changes in &change_sets {
            if !std::ptr::eq(changes.schema(), R::schema()) {
                continue;
            }
            for (field, value) in changes.iter() {
                let _ = target.set(field.id, value.to_json());
            }
        }
        change_sets
    }

    /// `SELECT` of every column, documents last.
    pub fn find(&self, clause: impl Into<Clause>) -> Query<'_, R> {
        Query::new(self, self.serializer().find(clause.into()))
    }

    pub fn select(&self, projection: &str, clause: impl Into<Clause>) -> Query<'_, R> {
        Query::new(self, self.serializer().select(projection, clause.into()))
    }

    /// `INSERT` of the merged change sets. `suffix` is appended verbatim,
    /// for example `RETURNING id`.
    pub fn insert(&self, change_sets: &[ChangeSet], suffix: &str) -> Query<'_, R> {
        Query::new(self, self.serializer().insert(change_sets, suffix))
    }

    pub fn update(&self, change_sets: &[ChangeSet], clause: impl Into<Clause>) -> Query<'_, R> {
        Query::new(self, self.serializer().update(change_sets, clause.into()))
    }

    pub fn delete(&self, clause: impl Into<Clause>) -> Query<'_, R> {
        Query::new(self, self.serializer().delete(clause.into()))
    }

    /// Arbitrary SQL run through this model's driver.
    pub fn sql(&self, clause: impl Into<Clause>) -> Query<'_, R> {
        let clause = clause.into();
        Query::new(self, Statement::new(clause.sql, clause.args))
    }

    /// `CREATE TABLE` statement for the record type.
    pub fn schema(&self) -> String {
        self.serializer().create_table()
    }

    pub fn drop_schema(&self) -> String {
        self.serializer().drop_table()
    }

    pub async fn count(&self, clause: impl Into<Clause>) -> Result<i64> {
        let mut count = 0i64;
        self.select("COUNT(*)", clause).query(&mut count).await?;
        Ok(count)
    }

    pub async fn exists(&self, clause: impl Into<Clause>) -> Result<bool> {
        let mut one: Option<i32> = None;
        match self.select("1 AS one", clause).query(&mut one).await {
            Ok(()) => Ok(one == Some(1)),
            Err(err) if err.is_no_rows() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Like [`Model::count`], panicking on error.
    pub async fn must_count(&self, clause: impl Into<Clause>) -> i64 {
        crate::query::must(self.count(clause).await)
    }

    /// Like [`Model::exists`], panicking on error.
    pub async fn must_exists(&self, clause: impl Into<Clause>) -> bool {
        crate::query::must(self.exists(clause).await)
    }
}

impl Model<Untyped> {
    /// A model that only knows its table name, for projections and counts.
    pub fn table(table_name: impl Into<String>) -> Model<Untyped> {
        Model::new().with_table_name(table_name)
    }
}

impl<R: Record> Default for Model<R> {
    fn default() -> Model<R> {
        Model::new()
    }
}

impl<R: Record> Clone for Model<R> {
    fn clone(&self) -> Model<R> {
        Model {
            driver: self.driver.clone(),
            table_name: self.table_name.clone(),
            logging: self.logging,
            _record: PhantomData,
        }
    }
}

impl<R: Record> core::fmt::Debug for Model<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Model")
            .field("table_name", &self.table_name)
            .field("driver", &self.driver)
            .field("logging", &self.logging)
            .finish()
    }
}

impl<R: Record> core::fmt::Display for Model<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "model (table: {:?}) has {} fields",
            self.table_name,
            self.fields().len()
        )
    }
}

impl Record for Untyped {
    fn schema() -> &'static RecordSchema {
        static SCHEMA: OnceLock<RecordSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| SchemaBuilder::new("Untyped").table_name("").build())
    }

    fn get(&self, _id: FieldId) -> Option<Value> {
        None
    }

    fn set(&mut self, id: FieldId, _value: serde_json::Value) -> Result<()> {
        Err(unknown_field::<Untyped>(id))
    }

    fn coerce(_id: FieldId, _value: serde_json::Value) -> Option<Value> {
        None
    }
}
