use super::{Formatter, Param, Params, ToSql};

use docket_core::{
    schema::Field,
    stmt::{ChangeSet, Value},
};
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Change sets merged for a single write.
///
/// Fields are keyed by declared name. The first occurrence fixes a field's
/// position and the last occurrence supplies its value. Document fields are
/// grouped under their document column, columns in first-seen order.
#[derive(Debug, Default)]
pub(super) struct Assignments<'a> {
    flat: IndexMap<&'a str, (&'a Field, &'a Value)>,
    documents: IndexMap<&'a str, IndexMap<&'a str, (&'a Field, &'a Value)>>,
}

/// One entry of an `UPDATE ... SET` list.
pub(super) enum Assignment<'a> {
    Column(&'a str, Param),
    Document(&'a str, Vec<(&'a str, Param)>),
}

impl<'a> Assignments<'a> {
    pub(super) fn new(changes: &'a [ChangeSet]) -> Assignments<'a> {
        let mut ret = Assignments::default();

        for change_set in changes {
            for (field, value) in change_set.iter() {
                let entry = (field, value);
                match field.document.as_deref() {
                    Some(doc) => {
                        ret.documents
                            .entry(doc)
                            .or_default()
                            .insert(&field.name, entry);
                    }
                    None => {
                        ret.flat.insert(&field.name, entry);
                    }
                }
            }
        }

        ret
    }

    /// Flat columns then document columns.
    pub(super) fn columns(&self) -> Vec<&'a str> {
        self.flat
            .values()
            .map(|(field, _)| field.column.as_str())
            .chain(self.documents.keys().copied())
            .collect()
    }

    /// One parameter per column returned by [`Assignments::columns`].
    pub(super) fn insert_params(&self) -> Vec<Param> {
        let flat = self.flat.values().map(|(_, value)| Param((*value).clone()));

        let documents = self.documents.values().map(|fields| {
            let object: BTreeMap<&str, serde_json::Value> = fields
                .values()
                .map(|(field, value)| (field.column.as_str(), value.to_json()))
                .collect();
            let object: serde_json::Map<String, serde_json::Value> = object
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect();
            Param(Value::String(serde_json::Value::Object(object).to_string()))
        });

        flat.chain(documents).collect()
    }

    pub(super) fn update_items(&self) -> Vec<Assignment<'a>> {
        let flat = self
            .flat
            .values()
            .map(|(field, value)| Assignment::Column(&field.column, Param((*value).clone())));

        let documents = self.documents.iter().map(|(doc, fields)| {
            let keys = fields
                .values()
                .map(|(field, value)| {
                    let json = value.to_json().to_string();
                    (field.column.as_str(), Param(Value::String(json)))
                })
                .collect();
            Assignment::Document(*doc, keys)
        });

        flat.chain(documents).collect()
    }
}

impl ToSql for Assignment<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Assignment::Column(column, param) => {
                fmt!(f, column " = " param);
            }
            Assignment::Document(doc, keys) => {
                fmt!(f, doc " = ");
                for _ in &keys {
                    fmt!(f, "jsonb_set(");
                }
                fmt!(f, "COALESCE(" doc ", '{}'::jsonb)");
                for (key, param) in keys {
                    fmt!(f, ", '{" key "}', " param ")");
                }
            }
        }
    }
}
