//! Materializing query results.
//!
//! A row read for a record lists the flat columns in field order followed by
//! one column per document. Document columns are split back into the fields
//! stored inside them.

use crate::Record;

use docket_core::{driver::Row, stmt::Value, Error, Result};

use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use std::{
    collections::HashMap,
    hash::{BuildHasher, Hash},
};

/// A single column value converted into a Rust type.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self>;
}

/// A whole row converted into a Rust type, for models of record type `R`.
pub trait FromRow<R>: Sized {
    fn from_row(row: Row) -> Result<Self>;
}

/// Where [`Query::query`](crate::Query::query) puts its results.
pub trait Destination<R>: Send {
    /// `true` when the destination takes every row rather than the first.
    const MANY: bool;

    fn load(&mut self, row: Row) -> Result<()>;
}

impl<R: Record> FromRow<R> for R {
    fn from_row(row: Row) -> Result<R> {
        let mut record = R::default();
        load_record(&mut record, row)?;
        Ok(record)
    }
}

impl<R: Record> Destination<R> for R {
    const MANY: bool = false;

    fn load(&mut self, row: Row) -> Result<()> {
        *self = <R as FromRow<R>>::from_row(row)?;
        Ok(())
    }
}

impl<R, T: FromRow<R> + Send> Destination<R> for Vec<T> {
    const MANY: bool = true;

    fn load(&mut self, row: Row) -> Result<()> {
        self.push(T::from_row(row)?);
        Ok(())
    }
}

impl<R, K, V, S> Destination<R> for HashMap<K, V, S>
where
    K: FromValue + Eq + Hash + Send,
    V: FromValue + Send,
    S: BuildHasher + Send,
{
    const MANY: bool = true;

    fn load(&mut self, row: Row) -> Result<()> {
        let (key, value) = pair(row)?;
        self.insert(key, value);
        Ok(())
    }
}

impl<R, K, V, S> Destination<R> for IndexMap<K, V, S>
where
    K: FromValue + Eq + Hash + Send,
    V: FromValue + Send,
    S: BuildHasher + Send,
{
    const MANY: bool = true;

    fn load(&mut self, row: Row) -> Result<()> {
        let (key, value) = pair(row)?;
        self.insert(key, value);
        Ok(())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Option<T>> {
        match value {
            Value::Null => Ok(None),
            value => T::from_value(value).map(Some),
        }
    }
}

impl<R, T: FromValue> FromRow<R> for Option<T> {
    fn from_row(row: Row) -> Result<Option<T>> {
        FromValue::from_value(single(row)?)
    }
}

impl<R, T: FromValue + Send> Destination<R> for Option<T> {
    const MANY: bool = false;

    fn load(&mut self, row: Row) -> Result<()> {
        *self = FromValue::from_value(single(row)?)?;
        Ok(())
    }
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<$ty> {
                    decode(value, stringify!($ty))
                }
            }

            impl_scalar_row!($ty);
        )*
    };
}

macro_rules! impl_scalar_row {
    ($($ty:ty),*) => {
        $(
            impl<R> FromRow<R> for $ty {
                fn from_row(row: Row) -> Result<$ty> {
                    FromValue::from_value(single(row)?)
                }
            }

            impl<R> Destination<R> for $ty {
                const MANY: bool = false;

                fn load(&mut self, row: Row) -> Result<()> {
                    *self = FromValue::from_value(single(row)?)?;
                    Ok(())
                }
            }
        )*
    };
}

impl_scalar!(
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    isize,
    usize,
    f32,
    f64,
    bool,
    String,
    DateTime<Utc>,
    serde_json::Value,
);

impl FromValue for NaiveDateTime {
    fn from_value(value: Value) -> Result<NaiveDateTime> {
        match value {
            Value::Timestamp(v) => Ok(v.naive_utc()),
            value => decode(value, "NaiveDateTime"),
        }
    }
}

impl_scalar_row!(NaiveDateTime);

fn decode<T: DeserializeOwned>(value: Value, ty: &'static str) -> Result<T> {
    serde_json::from_value(value.to_json()).map_err(|_| Error::type_conversion(value, ty))
}

fn single(row: Row) -> Result<Value> {
    if row.len() != 1 {
        return Err(Error::invalid_target(format!(
            "expected 1 column per row, found {}",
            row.len()
        )));
    }
    Ok(row.into_values().swap_remove(0))
}

fn pair<K: FromValue, V: FromValue>(row: Row) -> Result<(K, V)> {
    if row.len() != 2 {
        return Err(Error::invalid_target(format!(
            "expected 2 columns per row, found {}",
            row.len()
        )));
    }
    let mut values = row.into_values();
    let value = values.swap_remove(1);
    let key = values.swap_remove(0);
    Ok((K::from_value(key)?, V::from_value(value)?))
}

/// Writes the columns of `row` onto a freshly defaulted `record`.
///
/// Flat columns must decode into their fields. Inside document columns a
/// missing key or a value of the wrong type leaves the field at its default.
fn load_record<R: Record>(record: &mut R, row: Row) -> Result<()> {
    let schema = R::schema();
    let expected = schema.flat_fields().count() + schema.document_columns.len();
    if row.len() != expected {
        return Err(Error::invalid_target(format!(
            "`{}` expects {} columns per row, found {}",
            schema.type_name,
            expected,
            row.len()
        )));
    }

    let mut values = row.into_values().into_iter();

    for (field, value) in schema.flat_fields().zip(&mut values) {
        record
            .set(field.id, value.to_json())
            .map_err(|err| err.context(docket_core::err!("loading column `{}`", field.column)))?;
    }

    for (doc, value) in schema.document_columns.iter().zip(values) {
        let object = match document(value) {
            serde_json::Value::Object(object) => object,
            _ => continue,
        };

        for field in schema.document_fields(doc) {
            if let Some(json) = object.get(&field.column) {
                let _ = record.set(field.id, json.clone());
            }
        }
    }

    Ok(())
}

/// A document column as JSON. Drivers hand `jsonb` back either parsed or as
/// text.
fn document(value: Value) -> serde_json::Value {
    match value {
        Value::Json(json) => json,
        Value::String(text) => serde_json::from_str(&text).unwrap_or_default(),
        _ => serde_json::Value::Null,
    }
}
