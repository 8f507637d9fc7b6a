mod change_set;
pub use change_set::ChangeSet;

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;
