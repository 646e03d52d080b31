//! Runtime value types for attribute comparison.
//!
//! A [`Value`] is what the path resolver hands to the matcher: a view borrowed
//! from the source record. Every primitive numeric width collapses into a
//! [`Number`], and primitive slices stay typed inside [`Array`] so nothing is
//! copied out of the record during a pass.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use crate::resolve::Gatherable;

/// Runtime value of a resolved attribute, borrowed from the source record.
///
/// # Example
///
/// ```
/// use gather::{Value, Number};
///
/// let name = String::from("gather");
/// let value = Value::String(&name);
/// assert_eq!(value.as_str(), Some("gather"));
/// assert_eq!(Value::from(42u8), Value::Number(Number::U64(42)));
/// ```
#[derive(Clone)]
pub enum Value<'a> {
    /// The attribute exists but holds no value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Single character.
    Char(char),
    /// Numeric value of any width.
    Number(Number),
    /// String value (borrowed).
    String(&'a str),
    /// Array or container of values.
    Array(Array<'a>),
    /// Nested record; compared by identity.
    Record(&'a dyn Gatherable),
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `Null` value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if this is a `Number` value.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns `true` if this is a `String` value.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if this is an `Array` value.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the character value, if present.
    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the array, if present.
    pub fn as_array(&self) -> Option<&Array<'a>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Extracts the nested record, if present.
    pub fn as_record(&self) -> Option<&'a dyn Gatherable> {
        match self {
            Value::Record(r) => Some(*r),
            _ => None,
        }
    }

    /// Returns the textual form used by pattern operators.
    ///
    /// Scalars render the way they print; arrays, records and null have no
    /// textual form.
    pub fn to_text(&self) -> Option<Cow<'a, str>> {
        match self {
            Value::String(s) => Some(Cow::Borrowed(s)),
            Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            Value::Char(c) => Some(Cow::Owned(c.to_string())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Null | Value::Array(_) | Value::Record(_) => None,
        }
    }

    /// Returns a short name of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Record(_) => "record",
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Char(c) => f.debug_tuple("Char").field(c).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Array(a) => f.debug_tuple("Array").field(a).finish(),
            Value::Record(r) => write!(f, "Record({:p})", *r),
        }
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => std::ptr::addr_eq(*a, *b),
            _ => false,
        }
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<char> for Value<'_> {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::String(s)
    }
}

impl From<Number> for Value<'_> {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

/// Numeric value supporting every primitive width.
///
/// Numbers are stored in one of three variants to preserve precision:
/// - `I64` for signed integers
/// - `U64` for unsigned integers
/// - `F64` for floating point
///
/// Equality and ordering between different variants are numeric, not
/// representational: `I64(1) == U64(1) == F64(1.0)`.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Converts the number to i64 with `as` narrowing (floats truncate toward zero).
    pub fn to_i64(self) -> i64 {
        match self {
            Number::I64(n) => n,
            Number::U64(n) => n as i64,
            Number::F64(n) => n as i64,
        }
    }

    /// Compares two numbers, handling mixed widths.
    ///
    /// Returns `None` when either side is NaN.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),

            // Exact for the two integer variants, no float rounding.
            (Number::I64(a), Number::U64(b)) => Some(if a < 0 {
                Ordering::Less
            } else {
                (a as u64).cmp(&b)
            }),
            (Number::U64(_), Number::I64(_)) => other.compare(self).map(Ordering::reverse),

            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    /// Returns `true` if both numbers denote the same quantity.
    pub fn same_as(self, other: Number) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(*other)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F64(n) => write!(f, "{n}"),
        }
    }
}

macro_rules! number_from {
    ($variant:ident, $wide:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Number {
                fn from(n: $t) -> Self {
                    Number::$variant(n as $wide)
                }
            }

            impl From<$t> for Value<'_> {
                fn from(n: $t) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

number_from!(I64, i64: i8, i16, i32, i64, isize);
number_from!(U64, u64: u8, u16, u32, u64, usize);
number_from!(F64, f64: f32, f64);

/// Borrowed array or container value.
///
/// Primitive slices keep their element type so membership tests can run
/// directly against the record's storage. Everything else is collected into
/// [`Array::Values`].
#[derive(Debug, Clone, PartialEq)]
pub enum Array<'a> {
    Bool(&'a [bool]),
    Char(&'a [char]),
    I8(&'a [i8]),
    I16(&'a [i16]),
    I32(&'a [i32]),
    I64(&'a [i64]),
    U8(&'a [u8]),
    U16(&'a [u16]),
    U32(&'a [u32]),
    U64(&'a [u64]),
    F32(&'a [f32]),
    F64(&'a [f64]),
    /// Slice of owned strings.
    Str(&'a [String]),
    /// Generic container of values.
    Values(Vec<Value<'a>>),
}

impl<'a> Array<'a> {
    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        match self {
            Array::Bool(s) => s.len(),
            Array::Char(s) => s.len(),
            Array::I8(s) => s.len(),
            Array::I16(s) => s.len(),
            Array::I32(s) => s.len(),
            Array::I64(s) => s.len(),
            Array::U8(s) => s.len(),
            Array::U16(s) => s.len(),
            Array::U32(s) => s.len(),
            Array::U64(s) => s.len(),
            Array::F32(s) => s.len(),
            Array::F64(s) => s.len(),
            Array::Str(s) => s.len(),
            Array::Values(v) => v.len(),
        }
    }

    /// Returns `true` if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the elements are primitive numbers.
    pub fn is_numeric(&self) -> bool {
        !matches!(
            self,
            Array::Bool(_) | Array::Char(_) | Array::Str(_) | Array::Values(_)
        )
    }

    /// Returns the element at `index` as a [`Value`].
    pub fn get(&self, index: usize) -> Option<Value<'a>> {
        fn num<T: Copy + Into<Number>>(s: &[T], index: usize) -> Option<Value<'static>> {
            s.get(index).map(|n| Value::Number((*n).into()))
        }

        match self {
            Array::Bool(s) => s.get(index).map(|b| Value::Bool(*b)),
            Array::Char(s) => s.get(index).map(|c| Value::Char(*c)),
            Array::I8(s) => num(s, index),
            Array::I16(s) => num(s, index),
            Array::I32(s) => num(s, index),
            Array::I64(s) => num(s, index),
            Array::U8(s) => num(s, index),
            Array::U16(s) => num(s, index),
            Array::U32(s) => num(s, index),
            Array::U64(s) => num(s, index),
            Array::F32(s) => num(s, index),
            Array::F64(s) => num(s, index),
            Array::Str(s) => s.get(index).map(|v| Value::String(v.as_str())),
            Array::Values(v) => v.get(index).cloned(),
        }
    }

    /// Iterates the elements as [`Value`]s.
    pub fn iter(&self) -> impl Iterator<Item = Value<'a>> + '_ {
        (0..self.len()).filter_map(move |index| self.get(index))
    }
}
