use docket_core::{
    err,
    schema::{FieldId, RecordSchema},
    stmt::{Type, Value},
    Result,
};

use chrono::DateTime;
use serde::{de::DeserializeOwned, Serialize};

/// A plain data type stored as one table row.
///
/// Implemented by `#[derive(Record)]`. Fields are addressed by their position
/// in [`Record::schema`], with flattened members occupying the positions of
/// their own fields.
pub trait Record: Default + Send + Sync + 'static {
    /// The table layout inferred from the type. Computed once.
    fn schema() -> &'static RecordSchema;

    /// Reads a field as a statement value.
    fn get(&self, id: FieldId) -> Option<Value>;

    /// Overwrites a field with a decoded JSON value. The field is left
    /// untouched when the value does not decode into the field's type.
    fn set(&mut self, id: FieldId, value: serde_json::Value) -> Result<()>;

    /// Checks that `value` decodes into the field's type and returns the
    /// normalized statement value, or `None` when it does not.
    fn coerce(id: FieldId, value: serde_json::Value) -> Option<Value>;
}

pub fn to_value<T: Serialize>(field: &T, ty: Type) -> Value {
    match serde_json::to_value(field) {
        Ok(json) => Value::from_json(json, ty),
        Err(_) => Value::Null,
    }
}

/// Decodes `value` into a field of storage class `ty`.
///
/// Timestamps travel as RFC 3339 text with an offset. Types without a zone,
/// such as `NaiveDateTime`, get a second attempt with the UTC wall-clock form.
pub fn from_json<T: DeserializeOwned>(value: serde_json::Value, ty: Type) -> Result<T> {
    let naive = match (ty, &value) {
        (Type::Timestamp, serde_json::Value::String(text)) => naive_timestamp(text),
        _ => None,
    };

    match serde_json::from_value(value) {
        Ok(decoded) => Ok(decoded),
        Err(err) => match naive {
            Some(naive) => serde_json::from_value(naive).map_err(|_| err.into()),
            None => Err(err.into()),
        },
    }
}

fn naive_timestamp(text: &str) -> Option<serde_json::Value> {
    let at = DateTime::parse_from_rfc3339(text).ok()?;
    let naive = at.naive_utc().format("%Y-%m-%dT%H:%M:%S%.f").to_string();
    Some(serde_json::Value::String(naive))
}

/// Round-trips `value` through `T` so that only values the field accepts
/// make it into a change set.
pub fn coerce<T: Serialize + DeserializeOwned>(value: serde_json::Value, ty: Type) -> Option<Value> {
    let decoded: T = from_json(value, ty).ok()?;
    Some(to_value(&decoded, ty))
}

pub fn unknown_field<R: Record>(id: FieldId) -> docket_core::Error {
    err!(
        "`{}` has no field at position {}",
        R::schema().type_name,
        id.0
    )
}
