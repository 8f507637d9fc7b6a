use crate::Record;

use docket_core::schema::Field;

use serde::Serialize;
use std::io::Read;

/// An untyped key-value payload, keyed by external field names.
pub type RawChanges = serde_json::Map<String, serde_json::Value>;

/// Untrusted data offered to [`Permit::filter`](crate::Permit::filter) or
/// [`Model::changes`](crate::Model::changes).
///
/// Every shape is reduced to one flat JSON object. Input that does not parse
/// into an object contributes nothing.
pub enum Input {
    Raw(RawChanges),
    Text(String),
    Bytes(Vec<u8>),
    Reader(Box<dyn Read + Send>),

    /// A typed value whose keys are declared field names rather than
    /// external names.
    Record(RawChanges),
}

/// A parsed input ready for field lookups.
pub(crate) struct Fields {
    map: RawChanges,
    by_declared_name: bool,
}

impl Input {
    pub fn reader(reader: impl Read + Send + 'static) -> Input {
        Input::Reader(Box::new(reader))
    }

    /// Captures the fields of `record`, matched later by declared name.
    ///
    /// Keys are the names serde writes, so a `#[serde(rename)]` on `T`
    /// changes which declared name the value lands on. Use
    /// [`Input::from_record`] for record types.
    pub fn record<T: Serialize + ?Sized>(record: &T) -> Input {
        match serde_json::to_value(record) {
            Ok(serde_json::Value::Object(map)) => Input::Record(map),
            _ => Input::Record(RawChanges::new()),
        }
    }

    /// Captures the mapped fields of a record under their declared names.
    /// Serde attributes on the record play no part.
    pub fn from_record<R: Record>(record: &R) -> Input {
        let map = R::schema()
            .fields
            .iter()
            .filter_map(|field| Some((field.name.clone(), record.get(field.id)?.to_json())))
            .collect();
        Input::Record(map)
    }

    pub(crate) fn parse(self) -> Fields {
        let (map, by_declared_name) = match self {
            Input::Raw(map) => (map, false),
            Input::Text(text) => (serde_json::from_str(&text).unwrap_or_default(), false),
            Input::Bytes(bytes) => (serde_json::from_slice(&bytes).unwrap_or_default(), false),
            Input::Reader(reader) => (serde_json::from_reader(reader).unwrap_or_default(), false),
            Input::Record(map) => (map, true),
        };

        Fields {
            map,
            by_declared_name,
        }
    }
}

impl Fields {
    /// Value offered for `field`. Fields without an external name are never
    /// matched from untyped input.
    pub(crate) fn get(&self, field: &Field) -> Option<&serde_json::Value> {
        if self.by_declared_name {
            self.map.get(&field.name)
        } else {
            self.map.get(field.external_name.as_deref()?)
        }
    }
}

impl core::fmt::Debug for Input {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Input::Raw(map) => f.debug_tuple("Raw").field(map).finish(),
            Input::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Input::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Input::Reader(_) => f.write_str("Reader(..)"),
            Input::Record(map) => f.debug_tuple("Record").field(map).finish(),
        }
    }
}

impl From<RawChanges> for Input {
    fn from(map: RawChanges) -> Input {
        Input::Raw(map)
    }
}

impl From<serde_json::Value> for Input {
    fn from(value: serde_json::Value) -> Input {
        match value {
            serde_json::Value::Object(map) => Input::Raw(map),
            _ => Input::Raw(RawChanges::new()),
        }
    }
}

impl From<&str> for Input {
    fn from(text: &str) -> Input {
        Input::Text(text.to_string())
    }
}

impl From<String> for Input {
    fn from(text: String) -> Input {
        Input::Text(text)
    }
}

impl From<&[u8]> for Input {
    fn from(bytes: &[u8]) -> Input {
        Input::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Input {
    fn from(bytes: Vec<u8>) -> Input {
        Input::Bytes(bytes)
    }
}
