//! Decoded reply types.
//!
//! [`Value`] is one decoded reply value, [`Reply`] is what the decoder yields
//! for each complete top-level frame.
use alloc::{string::String, vec::Vec};

use bstr::BString;

/// The elements of an array reply.
pub type Array = Vec<Value>;

/// A decoded reply value.
///
/// # Examples
///
/// ```
/// use respmodem::Value;
///
/// let v = Value::Array(vec![Value::from("foo"), Value::Integer(42), Value::Null]);
/// assert_eq!(v.to_string(), r#"["foo",42,nil]"#);
/// ```
// Enable serde support for tests and when the optional `serde` feature is
// activated by downstream crates.
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Value {
    /// `$-1` or `*-1`.
    #[default]
    Null,
    /// A `:` line.
    Integer(i64),
    /// A `+` line or a bulk string, decoded with the configured encoding.
    String(String),
    /// A `+` line, bulk string or `:` line in raw-payload mode.
    Bytes(BString),
    /// A `*` frame and its elements.
    Array(Array),
    /// A `-` line received as an array element.
    Error(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<BString> for Value {
    fn from(v: BString) -> Self {
        Self::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl Value {
    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Array`].
    ///
    /// [`Array`]: Value::Array
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is [`Error`].
    ///
    /// [`Error`]: Value::Error
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(..))
    }

    /// Returns the integer, if this is an [`Integer`].
    ///
    /// [`Integer`]: Value::Integer
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the payload bytes of a [`String`] or [`Bytes`] value.
    ///
    /// [`String`]: Value::String
    /// [`Bytes`]: Value::Bytes
    ///
    /// ```
    /// use respmodem::Value;
    ///
    /// assert_eq!(Value::from("OK").as_bytes(), Some(&b"OK"[..]));
    /// assert_eq!(Value::Integer(1).as_bytes(), None);
    /// ```
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::String(s) => Some(s.as_bytes()),
            Self::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    /// Returns the elements, if this is an [`Array`].
    ///
    /// [`Array`]: Value::Array
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }
}

/// One complete top-level reply.
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// A successfully decoded value.
    Value(Value),
    /// An error reported by the peer (a top-level `-` line).
    Error(String),
}

impl Reply {
    /// Returns the value, or `None` for an error reply.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Error(_) => None,
        }
    }

    /// Returns `true` if the peer reported an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::Null => f.write_str("nil"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Bytes(b) => write!(f, "{b:?}"),
            Value::Error(e) => write!(f, "(error) {e}"),
            Value::Array(arr) => {
                f.write_str("[")?;
                let mut first = true;
                for v in arr {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl core::fmt::Display for Reply {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Reply::Value(v) => v.fmt(f),
            Reply::Error(e) => write!(f, "(error) {e}"),
        }
    }
}
