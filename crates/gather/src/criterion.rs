//! Criterion types for query predicates.
//!
//! A [`Criterion`] is a single filter condition: an attribute path, an
//! operator, an operand, a negation flag and the [`Join`] that folds it into
//! the criteria before it.

use std::borrow::Cow;

use regex::Regex;

use crate::compare;
use crate::error::Result;
use crate::operator::{Join, Operator};
use crate::value::{Number, Value};

/// A single filter condition.
///
/// # Example
///
/// ```
/// use gather::{Criterion, Join, Operator};
///
/// let criterion = Criterion::new("name", Operator::WildcardMatch, "J*")
///     .negated()
///     .with_join(Join::And);
///
/// assert_eq!(criterion.path, "name");
/// assert!(criterion.negate);
/// ```
#[derive(Debug, Clone)]
pub struct Criterion {
    /// Dotted attribute path.
    pub path: String,
    /// The comparison operator.
    pub operator: Operator,
    /// The value to compare against.
    pub operand: Operand,
    /// Invert the operator's result.
    pub negate: bool,
    /// How this criterion folds into the criteria before it.
    pub join: Join,
}

impl Criterion {
    /// Creates a criterion, joined with `OR` and not negated.
    ///
    /// An empty `path` never resolves, so the criterion is `false` for every
    /// operator (`true` once negated).
    pub fn new(path: impl Into<String>, operator: Operator, operand: impl Into<Operand>) -> Self {
        Criterion {
            path: path.into(),
            operator,
            operand: operand.into(),
            negate: false,
            join: Join::Or,
        }
    }

    /// Inverts this criterion.
    pub fn negated(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    /// Sets the join of this criterion.
    pub fn with_join(mut self, join: Join) -> Self {
        self.join = join;
        self
    }

    /// Evaluates the operator against a resolved attribute value.
    ///
    /// Negation is not applied here; the matcher applies it after resolution
    /// so that an unresolved path negates too.
    pub fn test(&self, value: &Value<'_>) -> Result<bool> {
        compare::value_matches(value, self.operator, &self.operand)
    }

    // ========================================================================
    // Shorthand constructors
    // ========================================================================

    /// `path == operand`.
    pub fn equals(path: impl Into<String>, operand: impl Into<Operand>) -> Self {
        Criterion::new(path, Operator::Equals, operand)
    }

    /// `path == operand`, ignoring case when the attribute is a string.
    pub fn equals_ignore_case(path: impl Into<String>, operand: impl Into<Operand>) -> Self {
        Criterion::new(path, Operator::EqualsIgnoreCase, operand)
    }

    /// `path > operand`.
    pub fn greater_than(path: impl Into<String>, operand: impl Into<Operand>) -> Self {
        Criterion::new(path, Operator::GreaterThan, operand)
    }

    /// `path >= operand`.
    pub fn greater_than_or_equals(path: impl Into<String>, operand: impl Into<Operand>) -> Self {
        Criterion::new(path, Operator::GreaterThanOrEquals, operand)
    }

    /// `path < operand`.
    pub fn less_than(path: impl Into<String>, operand: impl Into<Operand>) -> Self {
        Criterion::new(path, Operator::LessThan, operand)
    }

    /// `path <= operand`.
    pub fn less_than_or_equals(path: impl Into<String>, operand: impl Into<Operand>) -> Self {
        Criterion::new(path, Operator::LessThanOrEquals, operand)
    }

    /// Attribute value is one of `values`.
    pub fn is_in<I, T>(path: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Operand>,
    {
        Criterion::new(path, Operator::In, Operand::list(values))
    }

    /// Attribute resolves to null.
    pub fn is_null(path: impl Into<String>) -> Self {
        Criterion::new(path, Operator::IsNull, Operand::Null)
    }

    /// Attribute path resolves on the record.
    pub fn has_property(path: impl Into<String>) -> Self {
        Criterion::new(path, Operator::HasProperty, Operand::Null)
    }

    /// Collection attribute contains `value`.
    pub fn collection_has_value(path: impl Into<String>, value: impl Into<Operand>) -> Self {
        Criterion::new(path, Operator::CollectionHasValue, value)
    }

    /// Collection attribute contains every one of `values`.
    pub fn collection_has_all_values<I, T>(path: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Operand>,
    {
        Criterion::new(path, Operator::CollectionHasAllValues, Operand::list(values))
    }

    /// Collection attribute contains at least one of `values`.
    pub fn collection_has_any_value<I, T>(path: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Operand>,
    {
        Criterion::new(path, Operator::CollectionHasAnyValue, Operand::list(values))
    }

    /// Attribute text fully matches the regular expression `pattern`.
    ///
    /// Returns an error if the pattern is invalid.
    pub fn regex(path: impl Into<String>, pattern: &str) -> Result<Self> {
        Ok(Criterion::new(path, Operator::RegexMatch, Operand::pattern(pattern)?))
    }

    /// Attribute text matches the glob `pattern` (`*` and `?`).
    ///
    /// The glob is compiled once here. Returns an error if the compiled
    /// pattern exceeds the regex size limits.
    pub fn wildcard(path: impl Into<String>, pattern: &str) -> Result<Self> {
        Ok(Criterion::new(path, Operator::WildcardMatch, Operand::wildcard(pattern)?))
    }
}

/// Owned operand stored in a criterion.
///
/// Unlike [`Value`], which borrows from the source record, `Operand` owns its
/// data so it can be stored in query definitions.
#[derive(Debug, Clone)]
pub enum Operand {
    /// No operand.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Single character.
    Char(char),
    /// Numeric value.
    Number(Number),
    /// String value.
    String(String),
    /// Compiled regular expression, applied as-is by both pattern operators.
    Pattern(Regex),
    /// List of operands for membership operators.
    List(Vec<Operand>),
}

impl Operand {
    /// Compiles `pattern` into a [`Operand::Pattern`] that must match the
    /// whole attribute text.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(Operand::Pattern(compare::full_match_regex(pattern)?))
    }

    /// Compiles the glob `pattern` into a [`Operand::Pattern`] that must
    /// match the whole attribute text.
    pub fn wildcard(pattern: &str) -> Result<Self> {
        Ok(Operand::Pattern(compare::wildcard_regex(pattern)?))
    }

    /// Builds a list operand.
    pub fn list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Operand>,
    {
        Operand::List(values.into_iter().map(Into::into).collect())
    }

    /// Returns `true` if this is a `Null` operand.
    pub fn is_null(&self) -> bool {
        matches!(self, Operand::Null)
    }

    /// Extracts the number, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Operand::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the list elements, if this is a list.
    pub fn as_list(&self) -> Option<&[Operand]> {
        match self {
            Operand::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the textual form of a scalar operand.
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Operand::String(s) => Some(Cow::Borrowed(s)),
            Operand::Pattern(r) => Some(Cow::Borrowed(r.as_str())),
            Operand::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            Operand::Char(c) => Some(Cow::Owned(c.to_string())),
            Operand::Number(n) => Some(Cow::Owned(n.to_string())),
            Operand::Null | Operand::List(_) => None,
        }
    }
}

impl From<bool> for Operand {
    fn from(b: bool) -> Self {
        Operand::Bool(b)
    }
}

impl From<char> for Operand {
    fn from(c: char) -> Self {
        Operand::Char(c)
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Operand::String(s.to_string())
    }
}

impl From<String> for Operand {
    fn from(s: String) -> Self {
        Operand::String(s)
    }
}

impl From<Number> for Operand {
    fn from(n: Number) -> Self {
        Operand::Number(n)
    }
}

impl From<Regex> for Operand {
    fn from(r: Regex) -> Self {
        Operand::Pattern(r)
    }
}

impl<T: Into<Operand>> From<Option<T>> for Operand {
    fn from(value: Option<T>) -> Self {
        value.map_or(Operand::Null, Into::into)
    }
}

impl<T: Into<Operand>> From<Vec<T>> for Operand {
    fn from(values: Vec<T>) -> Self {
        Operand::list(values)
    }
}

impl<T: Into<Operand>, const N: usize> From<[T; N]> for Operand {
    fn from(values: [T; N]) -> Self {
        Operand::list(values)
    }
}

macro_rules! operand_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand {
                fn from(n: $t) -> Self {
                    Operand::Number(Number::from(n))
                }
            }
        )*
    };
}

operand_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);
