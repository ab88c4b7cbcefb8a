//! Bindable values with typed NULLs.
//!
//! A bare `None` cannot tell a driver which SQL type to bind, so absent values
//! are carried as [`Value::Null`] together with the declared [`SqlType`] of the
//! column they belong to.

use bytes::Bytes;
use std::fmt;

/// Storage type of a column or bind argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    Blob,
}

/// A value ready to be bound to a compiled statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Blob(Bytes),
    /// NULL that remembers the SQL type it stands for.
    Null(SqlType),
}

impl Value {
    /// The SQL type this value binds as.
    pub fn sql_type(&self) -> SqlType {
        match self {
            Value::Short(_) => SqlType::Short,
            Value::Int(_) => SqlType::Int,
            Value::Long(_) => SqlType::Long,
            Value::Float(_) => SqlType::Float,
            Value::Double(_) => SqlType::Double,
            Value::String(_) => SqlType::String,
            Value::Blob(_) => SqlType::Blob,
            Value::Null(ty) => *ty,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Short(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "'{v}'"),
            Value::Blob(v) => write!(f, "<{} bytes>", v.len()),
            Value::Null(ty) => write!(f, "NULL::{ty:?}"),
        }
    }
}

/// Rust types that map onto a single [`SqlType`].
///
/// `Option<T>` maps `None` to [`Value::Null`] carrying `T`'s SQL type.
pub trait SqlValue {
    /// Declared SQL type for columns of this Rust type.
    const SQL_TYPE: SqlType;

    /// Convert into a bindable value.
    fn into_value(self) -> Value;
}

macro_rules! impl_sql_value {
    ($($ty:ty => $sql_type:ident),* $(,)?) => {
        $(
            impl SqlValue for $ty {
                const SQL_TYPE: SqlType = SqlType::$sql_type;

                fn into_value(self) -> Value {
                    Value::$sql_type(self.into())
                }
            }
        )*
    };
}

impl_sql_value! {
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    Bytes => Blob,
    Vec<u8> => Blob,
}

impl SqlValue for bool {
    const SQL_TYPE: SqlType = SqlType::Int;

    fn into_value(self) -> Value {
        Value::Int(i32::from(self))
    }
}

impl<T: SqlValue> SqlValue for Option<T> {
    const SQL_TYPE: SqlType = T::SQL_TYPE;

    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null(T::SQL_TYPE),
        }
    }
}
