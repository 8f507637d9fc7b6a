use super::Type;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// A statement parameter or a column read back from a row.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Null value
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// Double precision float, also used for numeric columns
    F64(f64),

    /// String value
    String(String),

    /// Instant in time
    Timestamp(DateTime<Utc>),

    /// A JSON value that has no scalar representation
    Json(serde_json::Value),
}

impl Value {
    pub const fn null() -> Value {
        Value::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::I32(v) => Some(v.into()),
            Value::I64(v) => Some(v),
            _ => None,
        }
    }

    /// Name of the variant, used in conversion errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::I32(_) => "I32",
            Value::I64(_) => "I64",
            Value::F64(_) => "F64",
            Value::String(_) => "String",
            Value::Timestamp(_) => "Timestamp",
            Value::Json(_) => "Json",
        }
    }

    /// Converts the value into JSON so it can be decoded into a Rust type
    /// with serde.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::Null => Json::Null,
            Value::Bool(v) => Json::Bool(*v),
            Value::I32(v) => Json::from(*v),
            Value::I64(v) => Json::from(*v),
            Value::F64(v) => serde_json::Number::from_f64(*v)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::String(v) => Json::String(v.clone()),
            Value::Timestamp(v) => Json::String(v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Json(v) => v.clone(),
        }
    }

    /// Builds a value from JSON, shaping it after the field's storage class.
    ///
    /// Anything that does not fit the class is kept as the closest untyped
    /// value, so the database gets the final say.
    pub fn from_json(json: serde_json::Value, ty: Type) -> Value {
        use serde_json::Value as Json;

        match (ty, json) {
            (_, Json::Null) => Value::Null,
            (Type::Integer, Json::Number(n)) if n.is_i64() => match n.as_i64() {
                Some(v) => i32::try_from(v).map(Value::I32).unwrap_or(Value::I64(v)),
                None => Value::Null,
            },
            (Type::Integer | Type::BigInt, Json::Number(n)) if n.is_i64() => {
                n.as_i64().map(Value::I64).unwrap_or_default()
            }
            (Type::Float | Type::Decimal, Json::Number(n)) => {
                n.as_f64().map(Value::F64).unwrap_or_default()
            }
            (Type::Float | Type::Decimal, Json::String(s)) => match s.trim().parse::<f64>() {
                Ok(v) => Value::F64(v),
                Err(_) => Value::String(s),
            },
            (Type::Timestamp, Json::String(s)) => match parse_timestamp(&s) {
                Some(v) => Value::Timestamp(v),
                None => Value::String(s),
            },
            (Type::Text, Json::String(s)) => Value::String(s),
            (Type::Text, json @ (Json::Array(_) | Json::Object(_))) => Value::Json(json),
            (_, json) => Value::from_untyped_json(json),
        }
    }

    fn from_untyped_json(json: serde_json::Value) -> Value {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Null,
            Json::Bool(v) => Value::Bool(v),
            Json::Number(n) => match n.as_i64() {
                Some(v) => Value::I64(v),
                None => n.as_f64().map(Value::F64).unwrap_or_default(),
            },
            Json::String(s) => Value::String(s),
            json => Value::Json(json),
        }
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(v) = DateTime::parse_from_rfc3339(s) {
        return Some(v.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|v| v.and_utc())
}

impl From<bool> for Value {
    fn from(src: bool) -> Value {
        Value::Bool(src)
    }
}

macro_rules! impl_from_int {
    ($variant:ident: $($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(src: $ty) -> Value {
                    Value::$variant(src.into())
                }
            }
        )*
    };
}

impl_from_int!(I32: i8, i16, i32, u8, u16);
impl_from_int!(I64: i64, u32);

impl From<f32> for Value {
    fn from(src: f32) -> Value {
        Value::F64(src.into())
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Value {
        Value::F64(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Value {
        Value::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Value {
        Value::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Value {
        Value::String(src.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(src: DateTime<Utc>) -> Value {
        Value::Timestamp(src)
    }
}

impl From<serde_json::Value> for Value {
    fn from(src: serde_json::Value) -> Value {
        Value::Json(src)
    }
}

impl<T> From<Option<T>> for Value
where
    Value: From<T>,
{
    fn from(value: Option<T>) -> Value {
        match value {
            Some(value) => Value::from(value),
            None => Value::Null,
        }
    }
}
