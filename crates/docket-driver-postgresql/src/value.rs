use docket_core::{driver::Row, stmt::Value, Error, Result};

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use tokio_postgres::types::{private::BytesMut, to_sql_checked, IsNull, Json, ToSql, Type};

type BoxError = Box<dyn std::error::Error + Sync + Send>;

/// A statement parameter, encoded for whatever type the server inferred for
/// its placeholder.
#[derive(Debug)]
pub(crate) struct Param<'a>(pub(crate) &'a Value);

impl ToSql for Param<'_> {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError>
    where
        Self: Sized,
    {
        match self.0 {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(value) => value.to_sql(ty, out),
            Value::I32(value) => int_to_sql(i64::from(*value), ty, out),
            Value::I64(value) => int_to_sql(*value, ty, out),
            Value::F64(value) => match *ty {
                Type::FLOAT8 => value.to_sql(ty, out),
                Type::FLOAT4 => (*value as f32).to_sql(ty, out),
                Type::NUMERIC => Decimal::try_from(*value)?.to_sql(ty, out),
                Type::TEXT | Type::VARCHAR => value.to_string().to_sql(ty, out),
                _ => Err(mismatch(self.0, ty)),
            },
            Value::String(value) => match *ty {
                // jsonb's binary format is a version byte followed by the text
                Type::JSONB => {
                    out.extend_from_slice(&[1]);
                    out.extend_from_slice(value.as_bytes());
                    Ok(IsNull::No)
                }
                Type::JSON => {
                    out.extend_from_slice(value.as_bytes());
                    Ok(IsNull::No)
                }
                Type::NUMERIC => value.trim().parse::<Decimal>()?.to_sql(ty, out),
                Type::TIMESTAMPTZ => DateTime::parse_from_rfc3339(value)?
                    .with_timezone(&Utc)
                    .to_sql(ty, out),
                _ => value.as_str().to_sql(ty, out),
            },
            Value::Timestamp(value) => match *ty {
                Type::TIMESTAMPTZ => value.to_sql(ty, out),
                Type::TIMESTAMP => value.naive_utc().to_sql(ty, out),
                Type::DATE => value.date_naive().to_sql(ty, out),
                Type::TEXT | Type::VARCHAR => value.to_rfc3339().to_sql(ty, out),
                _ => Err(mismatch(self.0, ty)),
            },
            Value::Json(value) => match *ty {
                Type::JSON | Type::JSONB => Json(value).to_sql(ty, out),
                _ => value.to_string().to_sql(ty, out),
            },
        }
    }

    fn accepts(_: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn int_to_sql(value: i64, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => i16::try_from(value)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(value)?.to_sql(ty, out),
        Type::INT8 => value.to_sql(ty, out),
        Type::FLOAT4 => (value as f32).to_sql(ty, out),
        Type::FLOAT8 => (value as f64).to_sql(ty, out),
        Type::NUMERIC => Decimal::from(value).to_sql(ty, out),
        Type::TEXT | Type::VARCHAR => value.to_string().to_sql(ty, out),
        _ => Err(format!("cannot encode an integer as {ty}").into()),
    }
}

fn mismatch(value: &Value, ty: &Type) -> BoxError {
    format!("cannot encode {} as {ty}", value.kind_name()).into()
}

/// Converts a PostgreSQL row to a docket [`Row`], picking the value variant
/// from each column's type.
pub(crate) fn row_to_docket(row: &tokio_postgres::Row) -> Result<Row> {
    let mut values = Vec::with_capacity(row.len());
    for (index, column) in row.columns().iter().enumerate() {
        values.push(column_to_docket(row, index, column.type_())?);
    }
    Ok(Row::new(values))
}

fn column_to_docket(row: &tokio_postgres::Row, index: usize, ty: &Type) -> Result<Value> {
    // NOTE: the inner representation of the PostgreSQL type enum is not
    // accessible, so each type is matched by hand.
    let value = match *ty {
        Type::BOOL => get::<bool>(row, index)?.map(Value::Bool),
        Type::INT2 => get::<i16>(row, index)?.map(|v| Value::I32(v.into())),
        Type::INT4 => get::<i32>(row, index)?.map(Value::I32),
        Type::INT8 => get::<i64>(row, index)?.map(Value::I64),
        Type::FLOAT4 => get::<f32>(row, index)?.map(|v| Value::F64(v.into())),
        Type::FLOAT8 => get::<f64>(row, index)?.map(Value::F64),
        Type::NUMERIC => get::<Decimal>(row, index)?
            .map(|v| v.to_f64().map(Value::F64).unwrap_or_default()),
        Type::TIMESTAMPTZ => get::<DateTime<Utc>>(row, index)?.map(Value::Timestamp),
        Type::TIMESTAMP => get::<NaiveDateTime>(row, index)?.map(|v| Value::Timestamp(v.and_utc())),
        Type::JSON | Type::JSONB => get::<serde_json::Value>(row, index)?.map(Value::Json),
        _ => get::<String>(row, index)?.map(Value::String),
    };
    Ok(value.unwrap_or_default())
}

fn get<'a, T: tokio_postgres::types::FromSql<'a>>(
    row: &'a tokio_postgres::Row,
    index: usize,
) -> Result<Option<T>> {
    row.try_get::<usize, Option<T>>(index).map_err(Error::driver)
}
