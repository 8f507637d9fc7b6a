mod clause;
pub use clause::Clause;

pub mod serializer;
pub use serializer::{Params, Placeholder, Serializer};

mod statement;
pub use statement::Statement;
