mod error;
pub(crate) use error::ErrorSet;

mod field;
pub(crate) use field::{Field, FieldKind};

mod record;
pub(crate) use record::Record;

mod record_attr;
pub(crate) use record_attr::RecordAttr;

mod ty;
pub(crate) use ty::StorageTy;
