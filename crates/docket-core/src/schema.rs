mod builder;
pub use builder::{FieldDef, SchemaBuilder};

mod field;
pub use field::{Field, FieldId};

mod record;
pub use record::RecordSchema;
