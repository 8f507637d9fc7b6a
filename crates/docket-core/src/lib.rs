pub mod driver;
pub use driver::{Driver, Transaction};

mod error;
pub use error::{Error, IntoError};

pub mod schema;
pub use schema::RecordSchema;

pub mod stmt;

/// A Result type alias that uses Docket's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
