mod input;
pub use input::{Input, RawChanges};

pub mod load;
pub use load::{Destination, FromRow, FromValue};

mod log;
pub use log::Verb;

mod model;
pub use model::{Model, Untyped};

mod permit;
pub use permit::Permit;

mod query;
pub use query::Query;

mod record;
pub use record::Record;

pub mod transaction;
pub use transaction::{BoxFuture, Hook, TxOptions};

pub use docket_macros::Record;

pub use docket_core::{
    async_trait, bail,
    driver::{self, IsolationLevel, Row, Rows},
    err,
    schema::{Field, FieldId, RecordSchema},
    stmt::{ChangeSet, Type, Value},
    Driver, Error, Result, Transaction,
};
pub use docket_sql::{clause, Clause, Statement};

#[cfg(feature = "postgresql")]
pub use docket_driver_postgresql::PostgreSQL;

#[doc(hidden)]
pub mod codegen_support {
    pub use crate::record::{coerce, from_json, to_value, unknown_field};
    pub use crate::{Record, Result};
    pub use docket_core::{
        schema::{FieldDef, FieldId, RecordSchema, SchemaBuilder},
        stmt::{Type, Value},
    };
    pub use serde_json::Value as Json;
}
