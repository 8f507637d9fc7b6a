/// The storage class of a field, derived from its Rust type.
///
/// The class drives two things: the column type emitted by `CREATE TABLE`
/// and how untyped JSON input is turned into a statement [`Value`].
///
/// [`Value`]: super::Value
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// `i8`, `i16`, `i32`, `u8`, `u16`, `u32`
    Integer,

    /// `i64`, `u64`, `isize`, `usize`
    BigInt,

    /// `f32`, `f64`
    Float,

    /// Fixed point decimals
    Decimal,

    /// `bool`
    Bool,

    /// chrono date-times
    Timestamp,

    /// Anything else, stored as text
    #[default]
    Text,
}

impl Type {
    /// Classifies a Rust type by the last segment of its path.
    pub fn from_ident(ident: &str) -> Type {
        match ident {
            "i8" | "i16" | "i32" | "u8" | "u16" | "u32" => Type::Integer,
            "i64" | "u64" | "isize" | "usize" => Type::BigInt,
            "f32" | "f64" => Type::Float,
            "Decimal" => Type::Decimal,
            "bool" => Type::Bool,
            "DateTime" | "NaiveDateTime" => Type::Timestamp,
            _ => Type::Text,
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(self, Type::Integer | Type::BigInt)
    }

    /// Column type used when the field carries no explicit data type.
    pub fn sql_type(self) -> &'static str {
        match self {
            Type::Integer => "integer DEFAULT 0",
            Type::BigInt => "bigint DEFAULT 0",
            Type::Float => "numeric(10,2) DEFAULT 0.0",
            Type::Decimal => "numeric(10, 2) DEFAULT 0.0",
            Type::Bool => "boolean DEFAULT false",
            Type::Timestamp => "timestamptz DEFAULT NOW()",
            Type::Text => "text DEFAULT ''::text",
        }
    }
}
