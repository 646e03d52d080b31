//! Attribute-path resolution.
//!
//! Records take part in queries by implementing [`Gatherable`], which exposes
//! their direct members by name. [`resolve`] walks a dotted path such as
//! `"owner.address.city"` across nested members and yields a [`Slot`] for the
//! final segment, or `None` when any segment is missing or null on the way.
//!
//! `#[derive(Gatherable)]` from `gather-macros` generates the implementation
//! for plain structs; maps and `serde_json::Value` (behind the `json`
//! feature) are supported out of the box.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::convert::AsValue;
use crate::error::{GatherError, Result};
use crate::value::Value;

/// A record whose members can be looked up by name.
///
/// # Manual Implementation
///
/// ```
/// use gather::{Gatherable, Member};
///
/// struct Address {
///     city: String,
/// }
///
/// struct Person {
///     name: String,
///     age: u32,
///     address: Option<Address>,
///     password: String,
/// }
///
/// impl Gatherable for Address {
///     fn member(&self, name: &str) -> Member<'_> {
///         match name {
///             "city" => Member::of(&self.city),
///             _ => Member::Absent,
///         }
///     }
/// }
///
/// impl Gatherable for Person {
///     fn member(&self, name: &str) -> Member<'_> {
///         match name {
///             "name" => Member::of(&self.name),
///             "age" => Member::of(&self.age),
///             "address" => Member::nested(&self.address),
///             "password" => Member::Sealed,
///             _ => Member::Absent,
///         }
///     }
/// }
/// ```
pub trait Gatherable {
    /// Returns the direct member called `name`.
    fn member(&self, name: &str) -> Member<'_>;

    /// Returns `true` if this record stands for "no record at all".
    ///
    /// Null records never match a query and have no members.
    fn is_null(&self) -> bool {
        false
    }
}

/// A direct member of a record, as reported by [`Gatherable::member`].
pub enum Member<'a> {
    /// A readable value (possibly [`Value::Null`]).
    Value(Value<'a>),
    /// A nested record that paths may walk into.
    Record(&'a dyn Gatherable),
    /// The member exists but its value may not be read.
    Sealed,
    /// No member with this name.
    Absent,
}

impl<'a> Member<'a> {
    /// Wraps a field that converts into a [`Value`].
    pub fn of<T: AsValue + ?Sized>(field: &'a T) -> Self {
        Member::Value(field.as_value())
    }

    /// Wraps a nested record.
    pub fn nested<G: Gatherable>(record: &'a G) -> Self {
        Member::Record(record)
    }
}

/// A resolved attribute: the record that owns it and its readable value.
pub struct Slot<'a, 'p> {
    owner: &'a dyn Gatherable,
    field: &'p str,
    path: &'p str,
    readable: Option<Value<'a>>,
}

impl<'a, 'p> Slot<'a, 'p> {
    /// The record that directly owns the attribute.
    pub fn owner(&self) -> &'a dyn Gatherable {
        self.owner
    }

    /// The last path segment.
    pub fn field(&self) -> &'p str {
        self.field
    }

    /// The full dotted path that produced this slot.
    pub fn path(&self) -> &'p str {
        self.path
    }

    /// Returns `true` if reading this slot will fail.
    pub fn is_sealed(&self) -> bool {
        self.readable.is_none()
    }

    /// Reads the attribute value.
    ///
    /// Fails with [`GatherError::Access`] if the member is sealed.
    pub fn read(self) -> Result<Value<'a>> {
        self.readable.ok_or_else(|| GatherError::Access {
            path: self.path.to_string(),
            reason: format!("member '{}' is sealed", self.field),
        })
    }
}

/// Resolves a dotted attribute path on a record.
///
/// Returns `Ok(None)` when the path is empty, the record is null, or any
/// segment is absent, null, or not a record where another segment follows.
/// A sealed intermediate member is an [`GatherError::Access`] error since the
/// walk would need to read it.
pub fn resolve<'a, 'p>(record: &'a dyn Gatherable, path: &'p str) -> Result<Option<Slot<'a, 'p>>> {
    if path.is_empty() || record.is_null() {
        return Ok(None);
    }

    let mut owner = record;
    let mut segments = path.split('.').peekable();

    while let Some(segment) = segments.next() {
        let member = owner.member(segment);

        if segments.peek().is_none() {
            let readable = match member {
                Member::Absent => return Ok(None),
                Member::Sealed => None,
                Member::Record(r) if r.is_null() => Some(Value::Null),
                Member::Record(r) => Some(Value::Record(r)),
                Member::Value(v) => Some(v),
            };

            return Ok(Some(Slot {
                owner,
                field: segment,
                path,
                readable,
            }));
        }

        owner = match member {
            Member::Record(r) | Member::Value(Value::Record(r)) if !r.is_null() => r,
            Member::Sealed => {
                return Err(GatherError::Access {
                    path: path.to_string(),
                    reason: format!("intermediate member '{segment}' is sealed"),
                })
            }
            _ => return Ok(None),
        };
    }

    Ok(None)
}

impl<T: Gatherable + ?Sized> Gatherable for &T {
    fn member(&self, name: &str) -> Member<'_> {
        (**self).member(name)
    }

    fn is_null(&self) -> bool {
        (**self).is_null()
    }
}

impl<T: Gatherable + ?Sized> Gatherable for Box<T> {
    fn member(&self, name: &str) -> Member<'_> {
        (**self).member(name)
    }

    fn is_null(&self) -> bool {
        (**self).is_null()
    }
}

impl<T: Gatherable> Gatherable for Option<T> {
    fn member(&self, name: &str) -> Member<'_> {
        match self {
            Some(record) => record.member(name),
            None => Member::Absent,
        }
    }

    fn is_null(&self) -> bool {
        match self {
            Some(record) => record.is_null(),
            None => true,
        }
    }
}

impl<V: AsValue, S: BuildHasher> Gatherable for HashMap<String, V, S> {
    fn member(&self, name: &str) -> Member<'_> {
        self.get(name).map_or(Member::Absent, Member::of)
    }
}

impl<V: AsValue> Gatherable for BTreeMap<String, V> {
    fn member(&self, name: &str) -> Member<'_> {
        self.get(name).map_or(Member::Absent, Member::of)
    }
}
