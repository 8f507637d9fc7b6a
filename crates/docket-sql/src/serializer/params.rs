use super::{Formatter, ToSql};

use docket_core::stmt::Value;

pub trait Params {
    fn push(&mut self, value: Value) -> Placeholder;
}

/// A positional placeholder, rendered as `$n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder(pub usize);

/// A value that is pushed onto the parameter list when it is serialized.
#[derive(Debug)]
pub(super) struct Param(pub(super) Value);

impl Params for Vec<Value> {
    fn push(&mut self, value: Value) -> Placeholder {
        Vec::push(self, value);
        Placeholder(self.len())
    }
}

impl ToSql for Placeholder {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        f.dst.push('$');
        f.dst.push_str(&self.0.to_string());
    }
}

impl ToSql for Param {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let placeholder = f.params.push(self.0);
        placeholder.to_sql(f);
    }
}
