//! Evaluates a query's criteria against a single record.
//!
//! Criteria are folded left to right into a running result that starts out
//! `false`. Each criterion's outcome (after negation) is combined with that
//! result using the criterion's own [`Join`](crate::Join):
//!
//! ```text
//! result = false
//! for c in criteria:
//!     outcome = evaluate(record, c) XOR c.negate
//!     result  = c.join(outcome, result)
//! ```
//!
//! A consequence of the `false` seed is that an `AND` criterion in first
//! position always yields `false`, whatever its own outcome. Queries normally
//! lead with an `OR` criterion (the default join).

use log::trace;

use crate::criterion::Criterion;
use crate::error::Result;
use crate::operator::Operator;
use crate::query::Query;
use crate::resolve::{resolve, Gatherable};

/// Tests whether `record` satisfies `query`.
///
/// A null record never matches. A query without criteria matches every other
/// record.
///
/// # Errors
///
/// Fails when an attribute resolves but cannot be read, or when a pattern
/// operand does not compile.
pub fn matches<T: Gatherable>(record: &T, query: &Query) -> Result<bool> {
    matches_criteria(record, query.criteria())
}

pub(crate) fn matches_criteria(record: &dyn Gatherable, criteria: &[Criterion]) -> Result<bool> {
    if record.is_null() {
        return Ok(false);
    }

    if criteria.is_empty() {
        return Ok(true);
    }

    let mut result = false;

    for criterion in criteria {
        let outcome = evaluate(record, criterion)? != criterion.negate;
        result = criterion.join.apply(outcome, result);

        trace!(
            "{} {}{} on '{}': {} -> {}",
            criterion.join,
            if criterion.negate { "not " } else { "" },
            criterion.operator,
            criterion.path,
            outcome,
            result
        );
    }

    Ok(result)
}

/// Evaluates one criterion against a record, without negation.
///
/// `HasProperty` is decided by path resolution alone. For every other
/// operator an unresolved path is `false`.
pub fn evaluate(record: &dyn Gatherable, criterion: &Criterion) -> Result<bool> {
    let slot = resolve(record, &criterion.path)?;

    match (criterion.operator, slot) {
        (Operator::HasProperty, slot) => Ok(slot.is_some()),
        (_, None) => Ok(false),
        (_, Some(slot)) => criterion.test(&slot.read()?),
    }
}
