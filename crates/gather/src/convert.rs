//! Conversions from Rust field types into [`Value`].
//!
//! [`AsValue`] is what `#[derive(Gatherable)]` calls for every plain field.
//! Slices of primitives go through [`Element`] so they stay typed (an
//! `&[i32]` field becomes [`Array::I32`] without copying).

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::hash::BuildHasher;

use crate::value::{Array, Number, Value};

/// Borrows a field as a [`Value`].
pub trait AsValue {
    fn as_value(&self) -> Value<'_>;
}

/// Element type of a slice that can be exposed as an [`Array`].
///
/// The default collects the elements into [`Array::Values`]; primitives
/// override it to borrow the slice directly.
pub trait Element: AsValue + Sized {
    fn array(items: &[Self]) -> Array<'_> {
        Array::Values(items.iter().map(|item| item.as_value()).collect())
    }
}

macro_rules! primitive {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl AsValue for $t {
                fn as_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }

            impl Element for $t {
                fn array(items: &[Self]) -> Array<'_> {
                    Array::$variant(items)
                }
            }
        )*
    };
}

primitive!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
);

impl AsValue for isize {
    fn as_value(&self) -> Value<'_> {
        Value::Number(Number::from(*self))
    }
}

impl AsValue for usize {
    fn as_value(&self) -> Value<'_> {
        Value::Number(Number::from(*self))
    }
}

impl Element for isize {}
impl Element for usize {}

impl AsValue for bool {
    fn as_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl Element for bool {
    fn array(items: &[Self]) -> Array<'_> {
        Array::Bool(items)
    }
}

impl AsValue for char {
    fn as_value(&self) -> Value<'_> {
        Value::Char(*self)
    }
}

impl Element for char {
    fn array(items: &[Self]) -> Array<'_> {
        Array::Char(items)
    }
}

impl AsValue for str {
    fn as_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl AsValue for String {
    fn as_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl Element for String {
    fn array(items: &[Self]) -> Array<'_> {
        Array::Str(items)
    }
}

impl Element for &str {}

impl AsValue for Value<'_> {
    fn as_value(&self) -> Value<'_> {
        self.clone()
    }
}

impl<T: AsValue + ?Sized> AsValue for &T {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: AsValue + ?Sized> AsValue for Box<T> {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_value(&self) -> Value<'_> {
        match self {
            Some(value) => value.as_value(),
            None => Value::Null,
        }
    }
}

impl<T: AsValue> Element for Option<T> {}

impl<T: Element> AsValue for [T] {
    fn as_value(&self) -> Value<'_> {
        Value::Array(T::array(self))
    }
}

impl<T: Element, const N: usize> AsValue for [T; N] {
    fn as_value(&self) -> Value<'_> {
        Value::Array(T::array(self))
    }
}

impl<T: Element> AsValue for Vec<T> {
    fn as_value(&self) -> Value<'_> {
        Value::Array(T::array(self))
    }
}

impl<T: AsValue> AsValue for VecDeque<T> {
    fn as_value(&self) -> Value<'_> {
        Value::Array(Array::Values(self.iter().map(|v| v.as_value()).collect()))
    }
}

impl<T: AsValue, S: BuildHasher> AsValue for HashSet<T, S> {
    fn as_value(&self) -> Value<'_> {
        Value::Array(Array::Values(self.iter().map(|v| v.as_value()).collect()))
    }
}

impl<T: AsValue> AsValue for BTreeSet<T> {
    fn as_value(&self) -> Value<'_> {
        Value::Array(Array::Values(self.iter().map(|v| v.as_value()).collect()))
    }
}
