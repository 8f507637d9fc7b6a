use super::{Field, FieldId};

/// Everything known about a record type's table layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    /// Name of the Rust type the schema was inferred from.
    pub type_name: String,

    /// Table name, either declared on the type or derived from its name.
    pub table_name: String,

    /// Fields in declaration order, flattened members spliced in place.
    pub fields: Vec<Field>,

    /// Distinct document columns, in first-seen order.
    pub document_columns: Vec<String>,

    /// SQL placed before `CREATE TABLE`.
    pub before_create: Option<String>,

    /// SQL placed after `CREATE TABLE`.
    pub after_create: Option<String>,
}

impl RecordSchema {
    #[track_caller]
    pub fn field(&self, id: FieldId) -> &Field {
        &self.fields[id.0]
    }

    /// Looks a field up by its declared name. The last declaration wins when
    /// a flattened member repeats a name.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().rfind(|field| field.name == name)
    }

    /// Fields stored in their own column, one per declared name.
    ///
    /// A repeated name keeps the position of its first declaration and yields
    /// the last declared field.
    pub fn flat_fields(&self) -> impl Iterator<Item = &Field> + '_ {
        let flat = |field: &&Field| !field.is_document();

        self.fields
            .iter()
            .enumerate()
            .filter(move |(_, field)| flat(field))
            .filter(move |&(i, field)| {
                !self.fields[..i]
                    .iter()
                    .any(|prior| flat(&prior) && prior.name == field.name)
            })
            .filter_map(move |(_, field)| {
                self.fields
                    .iter()
                    .rfind(|later| flat(later) && later.name == field.name)
            })
    }

    /// Fields stored inside `document`.
    pub fn document_fields<'a>(&'a self, document: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields
            .iter()
            .filter(move |field| field.document.as_deref() == Some(document))
    }

    /// Columns selected when loading a full record: flat columns, then the
    /// document columns.
    pub fn columns(&self) -> Vec<&str> {
        self.flat_fields()
            .map(|field| field.column.as_str())
            .chain(self.document_columns.iter().map(String::as_str))
            .collect()
    }
}
