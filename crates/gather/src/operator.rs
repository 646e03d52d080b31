//! Comparison operators and boolean joins for query criteria.
//!
//! The [`Operator`] enum is the closed set of predicates a criterion can
//! apply. [`Join`] says how a criterion folds into the result of the
//! criteria before it.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::GatherError;

/// Comparison operator for a query criterion.
///
/// Operators are grouped by the operand they expect:
/// - **Equality**: `Equals`, `EqualsIgnoreCase` - any scalar
/// - **Ordering**: `GreaterThan`, `GreaterThanOrEquals`, `LessThan`, `LessThanOrEquals`
/// - **Membership**: `In` - a non-empty list
/// - **Presence**: `IsNull`, `HasProperty` - operand ignored
/// - **Collection**: `CollectionHasValue` (scalar), `CollectionHasAllValues`,
///   `CollectionHasAnyValue` (list)
/// - **Pattern**: `RegexMatch`, `WildcardMatch` - a pattern string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Operator {
    Equals,
    EqualsIgnoreCase,
    GreaterThan,
    GreaterThanOrEquals,
    LessThan,
    LessThanOrEquals,
    In,
    IsNull,
    HasProperty,
    CollectionHasValue,
    CollectionHasAllValues,
    CollectionHasAnyValue,
    RegexMatch,
    WildcardMatch,
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 14] = [
        Operator::Equals,
        Operator::EqualsIgnoreCase,
        Operator::GreaterThan,
        Operator::GreaterThanOrEquals,
        Operator::LessThan,
        Operator::LessThanOrEquals,
        Operator::In,
        Operator::IsNull,
        Operator::HasProperty,
        Operator::CollectionHasValue,
        Operator::CollectionHasAllValues,
        Operator::CollectionHasAnyValue,
        Operator::RegexMatch,
        Operator::WildcardMatch,
    ];

    /// Returns `true` for the four ordering comparisons.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            Operator::GreaterThan
                | Operator::GreaterThanOrEquals
                | Operator::LessThan
                | Operator::LessThanOrEquals
        )
    }

    /// Returns `true` if the operator never looks at its operand.
    pub fn ignores_operand(self) -> bool {
        matches!(self, Operator::IsNull | Operator::HasProperty)
    }

    /// Returns `true` if the operator expects a list operand.
    pub fn takes_list(self) -> bool {
        matches!(
            self,
            Operator::In | Operator::CollectionHasAllValues | Operator::CollectionHasAnyValue
        )
    }

    /// Evaluates an ordering comparison given the result of comparing the
    /// attribute value with the operand.
    ///
    /// Non-ordering operators always yield `false`.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Operator::GreaterThan => ordering == Ordering::Greater,
            Operator::GreaterThanOrEquals => ordering != Ordering::Less,
            Operator::LessThan => ordering == Ordering::Less,
            Operator::LessThanOrEquals => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the snake-case name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::EqualsIgnoreCase => "equals_ignore_case",
            Operator::GreaterThan => "greater_than",
            Operator::GreaterThanOrEquals => "greater_than_or_equals",
            Operator::LessThan => "less_than",
            Operator::LessThanOrEquals => "less_than_or_equals",
            Operator::In => "in",
            Operator::IsNull => "is_null",
            Operator::HasProperty => "has_property",
            Operator::CollectionHasValue => "collection_has_value",
            Operator::CollectionHasAllValues => "collection_has_all_values",
            Operator::CollectionHasAnyValue => "collection_has_any_value",
            Operator::RegexMatch => "regex_match",
            Operator::WildcardMatch => "wildcard_match",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operator {
    type Err = GatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| GatherError::UnknownOperator(s.to_string()))
    }
}

/// How a criterion's result folds into the results of the criteria before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Join {
    /// `result = criterion AND result`.
    And,
    /// `result = criterion OR result`.
    #[default]
    Or,
}

impl Join {
    /// Folds `criterion` into the running `result`.
    pub fn apply(self, criterion: bool, result: bool) -> bool {
        match self {
            Join::And => criterion && result,
            Join::Or => criterion || result,
        }
    }

    /// Returns the display name of this join.
    pub fn as_str(self) -> &'static str {
        match self {
            Join::And => "and",
            Join::Or => "or",
        }
    }
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Join {
    type Err = GatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "and" | "AND" => Ok(Join::And),
            "or" | "OR" => Ok(Join::Or),
            other => Err(GatherError::UnknownJoin(other.to_string())),
        }
    }
}
