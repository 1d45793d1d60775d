//! Column types and literal values.
//!
//! [`ColumnType`] is the host-side type of an entity field. Each dialect maps
//! it to a column type definition for DDL. [`Value`] is a literal value that a
//! dialect renders through `format_literal`.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Host-side type of an entity field.
///
/// Dialects map these to column type definitions; see
/// `SqlDialect::column_type_definition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    Decimal,
    /// Variable-length text. Length 0 means unbounded.
    String,
    Char,
    DateTime,
    Date,
    Time,
    Guid,
    /// Binary blob. Length 0 means unbounded.
    Bytes,
    /// Enumeration stored as its integer discriminant (or its name when
    /// enums are rendered as strings).
    Enum,
}

impl ColumnType {
    /// Whether LIKE-based string idioms apply to this type.
    pub fn is_text(&self) -> bool {
        matches!(self, ColumnType::String | ColumnType::Char)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Bool => "bool",
            ColumnType::Int8 => "i8",
            ColumnType::UInt8 => "u8",
            ColumnType::Int16 => "i16",
            ColumnType::UInt16 => "u16",
            ColumnType::Int32 => "i32",
            ColumnType::UInt32 => "u32",
            ColumnType::Int64 => "i64",
            ColumnType::UInt64 => "u64",
            ColumnType::Float32 => "f32",
            ColumnType::Float64 => "f64",
            ColumnType::Decimal => "decimal",
            ColumnType::String => "string",
            ColumnType::Char => "char",
            ColumnType::DateTime => "datetime",
            ColumnType::Date => "date",
            ColumnType::Time => "time",
            ColumnType::Guid => "guid",
            ColumnType::Bytes => "bytes",
            ColumnType::Enum => "enum",
        };
        f.write_str(name)
    }
}

/// An enumeration that can be stored in a column.
pub trait SqlEnum {
    /// Member name, used when enums are rendered as strings.
    fn variant_name(&self) -> &'static str;

    /// Integer value, used by default.
    fn discriminant(&self) -> i64;
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float32(f32),
    Float64(f64),
    Decimal(Decimal),
    String(String),
    Char(char),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
    Guid(Uuid),
    Bytes(Vec<u8>),
    Enum { name: &'static str, value: i64 },
    /// A value list. Only meaningful as the right-hand side of IN.
    List(Vec<Value>),
}

impl Value {
    pub fn from_enum<T: SqlEnum>(value: &T) -> Self {
        Value::Enum {
            name: value.variant_name(),
            value: value.discriminant(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::UInt(_) => "unsigned integer",
            Value::Float32(_) => "f32",
            Value::Float64(_) => "f64",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Char(_) => "char",
            Value::DateTime(_) => "datetime",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::Guid(_) => "guid",
            Value::Bytes(_) => "bytes",
            Value::Enum { .. } => "enum",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::UInt(n) => write!(f, "{n}"),
            Value::Float32(n) => write!(f, "{n}"),
            Value::Float64(n) => write!(f, "{n}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Char(c) => write!(f, "{c:?}"),
            Value::DateTime(dt) => write!(f, "{dt}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::Time(t) => write!(f, "{t}"),
            Value::Guid(g) => write!(f, "{g}"),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::Enum { name, .. } => f.write_str(name),
            Value::List(values) => {
                f.write_str("[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => UInt,
    u16 => UInt,
    u32 => UInt,
    u64 => UInt,
    f32 => Float32,
    f64 => Float64,
    Decimal => Decimal,
    String => String,
    &str => String,
    char => Char,
    NaiveDateTime => DateTime,
    NaiveDate => Date,
    NaiveTime => Time,
    Uuid => Guid,
    Vec<u8> => Bytes,
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
