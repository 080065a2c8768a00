use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Value
///
/// One cell of a row or one named argument.
/// Null → SQL NULL; absent members materialize as their `Default`.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short label used in conversion diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a JSON scalar into a `Value`.
    ///
    /// Arrays of bytes become `Blob`; objects and other arrays are rejected.
    pub fn from_json(json: serde_json::Value) -> Result<Self, ValueError> {
        match json {
            serde_json::Value::Null => Ok(Self::Null),
            serde_json::Value::Bool(b) => Ok(Self::Bool(b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float))
                .ok_or(ValueError::Unsupported { found: "number" }),
            serde_json::Value::String(s) => Ok(Self::Text(s)),
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(|item| {
                    item.as_u64()
                        .and_then(|b| u8::try_from(b).ok())
                        .ok_or(ValueError::Unsupported { found: "array" })
                })
                .collect::<Result<Vec<u8>, _>>()
                .map(Self::Blob),
            serde_json::Value::Object(_) => Err(ValueError::Unsupported { found: "object" }),
        }
    }
}

///
/// ValueError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("value {value} is out of range for {target}")]
    OutOfRange { target: &'static str, value: i64 },

    #[error("unsupported argument shape: {found}")]
    Unsupported { found: &'static str },
}

///
/// FromValue
///
/// Conversion from a column value into a member or scalar result.
///

pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(b) => Ok(b),
            Value::Int(i) => Ok(i != 0),
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Int(i) => Ok(i),
            Value::Bool(b) => Ok(Self::from(b)),
            other => Err(mismatch("int", &other)),
        }
    }
}

macro_rules! impl_from_value_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ValueError> {
                    let wide = i64::from_value(value).map_err(|err| match err {
                        ValueError::Mismatch { found, .. } => ValueError::Mismatch {
                            expected: stringify!($ty),
                            found,
                        },
                        other => other,
                    })?;

                    <$ty>::try_from(wide).map_err(|_| ValueError::OutOfRange {
                        target: stringify!($ty),
                        value: wide,
                    })
                }
            }
        )*
    };
}

impl_from_value_int!(i8, i16, i32, u8, u16, u32, u64);

impl FromValue for f64 {
    #[allow(clippy::cast_precision_loss)]
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as Self),
            other => Err(mismatch("float", &other)),
        }
    }
}

impl FromValue for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: Value) -> Result<Self, ValueError> {
        f64::from_value(value).map(|f| f as Self)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(mismatch("text", &other)),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Blob(b) => Ok(b),
            Value::Text(s) => Ok(s.into_bytes()),
            other => Err(mismatch("blob", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

const fn mismatch(expected: &'static str, found: &Value) -> ValueError {
    ValueError::Mismatch {
        expected,
        found: found.kind(),
    }
}

//
// Into<Value>
//

macro_rules! impl_value_from {
    ($variant:ident: $($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_value_from!(Int: i8, i16, i32, i64, u8, u16, u32);
impl_value_from!(Float: f32, f64);
impl_value_from!(Text: String, &str);
impl_value_from!(Blob: Vec<u8>, &[u8]);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
