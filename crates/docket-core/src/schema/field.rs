use crate::stmt::Type;

/// Position of a field within its record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(pub usize);

/// Describes how a single record field maps onto the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub id: FieldId,

    /// Name of the field as declared on the record type. Permissions are
    /// expressed with this name.
    pub name: String,

    /// Column the field is stored in, or the key inside its document column.
    pub column: String,

    /// Key used when matching untyped input. `None` when the field must never
    /// be populated from external input.
    pub external_name: Option<String>,

    /// Document column holding the field, if it is not a flat column.
    pub document: Option<String>,

    /// Column definition used by `CREATE TABLE`.
    pub data_type: Option<String>,

    pub ty: Type,

    pub nullable: bool,

    /// Whether the field is `pub` on the record type.
    pub exported: bool,
}

impl Field {
    pub fn is_document(&self) -> bool {
        self.document.is_some()
    }
}
