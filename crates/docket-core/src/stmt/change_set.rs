use super::Value;
use crate::schema::{Field, FieldId, RecordSchema};

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Coerced values destined for an `INSERT` or `UPDATE`, keyed by field.
///
/// Change sets remember the order fields were added in. Inserting a field a
/// second time replaces its value but keeps its original position.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSet {
    schema: &'static RecordSchema,
    values: IndexMap<FieldId, Value>,
}

impl ChangeSet {
    pub fn new(schema: &'static RecordSchema) -> ChangeSet {
        ChangeSet {
            schema,
            values: IndexMap::new(),
        }
    }

    pub fn schema(&self) -> &'static RecordSchema {
        self.schema
    }

    pub fn insert(&mut self, field: FieldId, value: impl Into<Value>) {
        self.values.insert(field, value.into());
    }

    pub fn get(&self, field: FieldId) -> Option<&Value> {
        self.values.get(&field)
    }

    /// Returns the value of the first field declared as `name`.
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.iter()
            .find(|(field, _)| field.name == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, field: FieldId) -> bool {
        self.values.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static Field, &Value)> + '_ {
        let schema = self.schema;
        self.values
            .iter()
            .map(move |(id, value)| (schema.field(*id), value))
    }

    /// Declared names of the fields present, in insertion order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.iter().map(|(field, _)| field.name.as_str()).collect()
    }
}

impl Serialize for ChangeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries: Vec<_> = self
            .iter()
            .filter_map(|(field, value)| Some((field.external_name.as_deref()?, value.to_json())))
            .collect();

        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in &entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl core::fmt::Display for ChangeSet {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let json = serde_json::to_string_pretty(self).map_err(|_| core::fmt::Error)?;
        f.write_str(&json)
    }
}
