use super::{Field, FieldId, RecordSchema};
use crate::stmt::Type;

use std_util::str::{pluralize, snake_case};

/// A field as declared on the record type, before naming rules apply.
///
/// Produced by `#[derive(Record)]`. Fields excluded with `column = "-"`,
/// `skip`, or by being private without an explicit column never reach the
/// builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldDef<'a> {
    pub name: &'a str,
    pub column: Option<&'a str>,
    pub rename: Option<&'a str>,
    pub document: Option<&'a str>,
    pub data_type: Option<&'a str>,
    pub ty: Type,
    pub nullable: bool,
    pub exported: bool,
}

/// Assembles a [`RecordSchema`] one declared field at a time.
#[derive(Debug)]
pub struct SchemaBuilder {
    schema: RecordSchema,
}

impl SchemaBuilder {
    /// Starts a schema for the type named `type_name`. The table name
    /// defaults to the pluralized snake case of the type name.
    pub fn new(type_name: &str) -> SchemaBuilder {
        SchemaBuilder {
            schema: RecordSchema {
                type_name: type_name.to_string(),
                table_name: pluralize(&snake_case(type_name)),
                fields: vec![],
                document_columns: vec![],
                before_create: None,
                after_create: None,
            },
        }
    }

    pub fn table_name(mut self, name: &str) -> SchemaBuilder {
        self.schema.table_name = name.to_string();
        self
    }

    pub fn before_schema(mut self, sql: &str) -> SchemaBuilder {
        self.schema.before_create = Some(sql.to_string());
        self
    }

    pub fn after_schema(mut self, sql: &str) -> SchemaBuilder {
        self.schema.after_create = Some(sql.to_string());
        self
    }

    pub fn field(mut self, def: FieldDef<'_>) -> SchemaBuilder {
        let column = match def.column {
            Some(column) if !column.is_empty() => column.to_string(),
            _ => snake_case(def.name),
        };

        let external_name = match def.rename {
            Some("-") => None,
            Some(rename) if !rename.is_empty() => Some(rename.to_string()),
            _ => Some(def.name.to_string()),
        };

        let document = def.document.map(snake_case).filter(|doc| !doc.is_empty());
        if let Some(doc) = &document {
            self.register_document(doc);
        }

        let data_type = match def.data_type {
            Some(data_type) if !data_type.is_empty() => Some(data_type.to_string()),
            _ if column == "id" && def.ty.is_integer() => Some("SERIAL PRIMARY KEY".to_string()),
            _ if document.is_some() => None,
            _ if def.nullable => Some(def.ty.sql_type().to_string()),
            _ => Some(format!("{} NOT NULL", def.ty.sql_type())),
        };

        let id = FieldId(self.schema.fields.len());
        self.schema.fields.push(Field {
            id,
            name: def.name.to_string(),
            column,
            external_name,
            document,
            data_type,
            ty: def.ty,
            nullable: def.nullable,
            exported: def.exported,
        });
        self
    }

    /// Splices the fields of a flattened member in place.
    pub fn flatten(mut self, member: &RecordSchema) -> SchemaBuilder {
        for doc in &member.document_columns {
            self.register_document(doc);
        }

        let offset = self.schema.fields.len();
        self.schema
            .fields
            .extend(member.fields.iter().cloned().map(|mut field| {
                field.id = FieldId(offset + field.id.0);
                field
            }));
        self
    }

    pub fn build(self) -> RecordSchema {
        self.schema
    }

    fn register_document(&mut self, doc: &str) {
        if !self.schema.document_columns.iter().any(|d| d == doc) {
            self.schema.document_columns.push(doc.to_string());
        }
    }
}
