//! Query builder.
//!
//! The [`Query`] struct holds an ordered list of criteria plus the paging
//! parameters used by [`Query::select`], and offers shortcuts that run it
//! through the [`executor`](crate::executor).

use crate::criterion::Criterion;
use crate::error::Result;
use crate::executor;
use crate::matcher;
use crate::operator::Join;
use crate::resolve::Gatherable;

/// An ordered list of criteria with paging parameters.
///
/// Criteria are folded in order, each one joined to the result of those
/// before it (see [`matcher`](crate::matcher) for the exact rule). A query
/// without criteria matches every non-null record.
///
/// # Example
///
/// ```
/// use gather::{Criterion, Query};
///
/// let query = Query::new()
///     .or(Criterion::equals("status", "open"))
///     .or(Criterion::equals("status", "blocked"))
///     .and(Criterion::greater_than_or_equals("priority", 3))
///     .skip(10)
///     .limit(20);
///
/// assert_eq!(query.criteria().len(), 3);
/// assert_eq!(query.get_limit(), 20);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    criteria: Vec<Criterion>,
    limit: usize,
    skip: usize,
}

impl Query {
    /// Creates a new empty query.
    ///
    /// An empty query matches all records.
    pub fn new() -> Self {
        Query::default()
    }

    // ========================================================================
    // Criteria
    // ========================================================================

    /// Appends a criterion joined with `AND`.
    ///
    /// A leading `AND` criterion always folds to `false`; start with
    /// [`or`](Self::or) unless that is what you want.
    pub fn and(self, criterion: Criterion) -> Self {
        self.push(criterion.with_join(Join::And))
    }

    /// Appends a criterion joined with `OR`.
    pub fn or(self, criterion: Criterion) -> Self {
        self.push(criterion.with_join(Join::Or))
    }

    /// Appends a criterion keeping its own join.
    pub fn push(mut self, criterion: Criterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    // ========================================================================
    // Paging
    // ========================================================================

    /// Sets the maximum number of records [`select`](Self::select) returns.
    ///
    /// Zero means no limit.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = n;
        self
    }

    /// Sets the number of matches [`select`](Self::select) discards first.
    pub fn skip(mut self, n: usize) -> Self {
        self.skip = n;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Returns the criteria in evaluation order.
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Returns the limit, zero when unbounded.
    pub fn get_limit(&self) -> usize {
        self.limit
    }

    /// Returns the number of matches to skip.
    pub fn get_skip(&self) -> usize {
        self.skip
    }

    /// Returns `true` if this query has no criteria (matches everything).
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests if a single record matches this query.
    pub fn matches<T: Gatherable>(&self, record: &T) -> Result<bool> {
        matcher::matches(record, self)
    }

    /// Counts the matching records, ignoring limit and skip.
    pub fn count<'r, T, I>(&self, records: I) -> Result<usize>
    where
        T: Gatherable + 'r,
        I: IntoIterator<Item = &'r T>,
    {
        executor::count(records, self)
    }

    /// Collects matching records using this query's limit and skip.
    pub fn select<'r, T, I>(&self, records: I) -> Result<Vec<&'r T>>
    where
        T: Gatherable + 'r,
        I: IntoIterator<Item = &'r T>,
    {
        executor::select(records, self, self.limit, self.skip)
    }

    /// Returns the first matching record after skipping, if any.
    pub fn first<'r, T, I>(&self, records: I) -> Result<Option<&'r T>>
    where
        T: Gatherable + 'r,
        I: IntoIterator<Item = &'r T>,
    {
        Ok(executor::select(records, self, 1, self.skip)?.pop())
    }
}
