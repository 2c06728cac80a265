//! Value types for Ward properties.
//!
//! Values are the data stored in raw object fields. Ward supports scalar
//! types (String, Int, Float, Bool, Timestamp), lists of values, and
//! references to other raw objects.

use crate::ObjectRef;
use std::fmt;

/// A value that can be stored in a property.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null/missing value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Timestamp as milliseconds since Unix epoch.
    Timestamp(i64),
    /// List of values. Lists are plain data and never wrapped: objects held
    /// in a list are handed out raw, so mutating them is not intercepted
    /// and not recorded as a touch.
    List(Vec<Value>),
    /// Reference to another raw object. Compared by identity.
    Object(ObjectRef),
}

impl Value {
    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this is a boolean value.
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns true if this is an integer value.
    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    /// Returns true if this is a string value.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns true if this is an object reference.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns true for values that can never hold nested state.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Object(_) | Value::List(_))
    }

    /// Get as boolean if this is a Bool value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as integer if this is an Int value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as float if this is a Float value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as string reference if this is a String value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as timestamp if this is a Timestamp value.
    pub fn as_timestamp(&self) -> Option<i64> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Get the referenced object if this is an Object value.
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Timestamp(_) => "Timestamp",
            Value::List(_) => "List",
            Value::Object(_) => "Object",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Timestamp(t) => write!(f, "ts:{}", t),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Object(o) => write!(f, "{}@{:#x}", o.type_name(), o.addr()),
        }
    }
}

// Convenient From implementations
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}

impl From<&ObjectRef> for Value {
    fn from(o: &ObjectRef) -> Self {
        Value::Object(o.clone())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Helper macro to create raw objects.
///
/// ```
/// use ward_core::{object, Value};
///
/// let address = object!("Address", { "street" => "Main St", "country" => "1" });
/// let profile = object!("Profile", { "firstName" => "Ann", "lastName" => None::<String>, "address" => &address });
/// assert_eq!(profile.borrow().get_field("lastName"), Some(&Value::Null));
/// ```
#[macro_export]
macro_rules! object {
    ($type_name:expr) => {
        $crate::ObjectRef::new($crate::RawObject::new($type_name))
    };
    ($type_name:expr, { $($key:expr => $value:expr),* $(,)? }) => {
        {
            #[allow(unused_mut)]
            let mut raw = $crate::RawObject::new($type_name);
            $(
                raw.set_field($key, $crate::Value::from($value));
            )*
            $crate::ObjectRef::new(raw)
        }
    };
}
