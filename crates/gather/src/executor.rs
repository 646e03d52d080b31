//! Query execution and aggregation over record collections.
//!
//! Every function makes a single forward pass over its input and accepts
//! anything that iterates over record references: slices, `Vec`s, sets,
//! `VecDeque`s or a filtered iterator.
//!
//! # Example
//!
//! ```
//! use gather::{executor, Criterion, Gatherable, Member, Query};
//!
//! struct Item {
//!     price: u32,
//! }
//!
//! impl Gatherable for Item {
//!     fn member(&self, name: &str) -> Member<'_> {
//!         match name {
//!             "price" => Member::of(&self.price),
//!             _ => Member::Absent,
//!         }
//!     }
//! }
//!
//! let items = vec![Item { price: 5 }, Item { price: 15 }, Item { price: 25 }];
//! let query = Query::new().or(Criterion::greater_than("price", 10));
//!
//! assert_eq!(executor::count(&items, &query).unwrap(), 2);
//! assert_eq!(executor::sum_i64(&items, "price").unwrap(), Some(45));
//! ```

use log::debug;

use crate::aggregator::{
    Aggregator, AggregatorKind, CountingAggregator, DoubleAverage, DoubleMax, DoubleMin,
    DoubleSum, LongAverage, LongMax, LongMin, LongSum, UniqueAggregator,
};
use crate::criterion::Criterion;
use crate::error::Result;
use crate::matcher::matches_criteria;
use crate::query::Query;
use crate::resolve::{resolve, Gatherable};
use crate::value::Number;

/// Counts the records matching `query`.
///
/// The query's own limit and skip are ignored; every match counts.
pub fn count<'r, T, I>(records: I, query: &Query) -> Result<usize>
where
    T: Gatherable + 'r,
    I: IntoIterator<Item = &'r T>,
{
    let matched = scan(records, query.criteria(), 0, 0, |_| {})?;
    debug!("count: {matched} records matched");
    Ok(matched)
}

/// Collects the records matching `query`, in input order.
///
/// The first `skip` matches are discarded and do not count towards `limit`.
/// Collection stops as soon as `limit` records are gathered; a `limit` of
/// zero consumes the whole input.
pub fn select<'r, T, I>(records: I, query: &Query, limit: usize, skip: usize) -> Result<Vec<&'r T>>
where
    T: Gatherable + 'r,
    I: IntoIterator<Item = &'r T>,
{
    let mut selected = Vec::new();
    scan(records, query.criteria(), limit, skip, |record| selected.push(record))?;
    debug!(
        "select: {} records gathered (limit {limit}, skip {skip})",
        selected.len()
    );
    Ok(selected)
}

fn scan<'r, T, I, F>(
    records: I,
    criteria: &[Criterion],
    limit: usize,
    skip: usize,
    mut accept: F,
) -> Result<usize>
where
    T: Gatherable + 'r,
    I: IntoIterator<Item = &'r T>,
    F: FnMut(&'r T),
{
    let mut skipped = 0;
    let mut accepted = 0;

    for record in records {
        if !matches_criteria(record, criteria)? {
            continue;
        }

        if skipped < skip {
            skipped += 1;
            continue;
        }

        accept(record);
        accepted += 1;

        if limit > 0 && accepted == limit {
            break;
        }
    }

    Ok(accepted)
}

/// Runs `aggregator` over the value at `path` on every record.
///
/// No query is involved: records where the path does not resolve are
/// skipped and do not count as observed. Every other record bumps the
/// observed count before its value (null included) is fed in.
///
/// Returns `Ok(None)` for an empty path or an empty input.
///
/// # Errors
///
/// Fails when a resolved value cannot be read, or when the aggregator
/// rejects a value or cannot produce a result.
pub fn aggregate<'r, T, I, A>(records: I, path: &str, aggregator: A) -> Result<Option<Number>>
where
    T: Gatherable + 'r,
    I: IntoIterator<Item = &'r T>,
    A: Aggregator,
{
    let mut records = records.into_iter().peekable();
    if path.is_empty() || records.peek().is_none() {
        return Ok(None);
    }

    let mut aggregator = aggregator;
    let mut observed = 0;

    for record in records {
        let Some(slot) = resolve(record, path)? else {
            continue;
        };

        observed += 1;
        aggregator.aggregate(observed, &slot.read()?)?;
    }

    debug!("aggregate: '{path}' observed on {observed} records");
    aggregator.result(observed).map(Some)
}

/// [`aggregate`] with an aggregator chosen by kind.
pub fn aggregate_by<'r, T, I>(records: I, path: &str, kind: AggregatorKind) -> Result<Option<Number>>
where
    T: Gatherable + 'r,
    I: IntoIterator<Item = &'r T>,
{
    aggregate(records, path, kind.build())
}

// ============================================================================
// Statistics
// ============================================================================

/// Number of records on which `path` resolves.
pub fn count_present<'r, T, I>(records: I, path: &str) -> Result<Option<u64>>
where
    T: Gatherable + 'r,
    I: IntoIterator<Item = &'r T>,
{
    integral(aggregate(records, path, CountingAggregator::new())?)
}

/// Number of distinct values at `path`.
pub fn unique<'r, T, I>(records: I, path: &str) -> Result<Option<u64>>
where
    T: Gatherable + 'r,
    I: IntoIterator<Item = &'r T>,
{
    integral(aggregate(records, path, UniqueAggregator::new())?)
}

fn integral(result: Option<Number>) -> Result<Option<u64>> {
    Ok(result.map(|n| n.to_i64() as u64))
}

/// Floating-point sum of the values at `path`.
pub fn sum_f64<'r, T, I>(records: I, path: &str) -> Result<Option<f64>>
where
    T: Gatherable + 'r,
    I: IntoIterator<Item = &'r T>,
{
    Ok(aggregate(records, path, DoubleSum::new())?.map(Number::to_f64))
}

/// Integer sum of the values at `path`, wrapping on overflow.
///
/// Fails with [`GatherError::Overflow`](crate::GatherError::Overflow) on an
/// unsigned value above `i64::MAX`; the same holds for [`min_i64`] and
/// [`max_i64`].
pub fn sum_i64<'r, T, I>(records: I, path: &str) -> Result<Option<i64>>
where
    T: Gatherable + 'r,
    I: IntoIterator<Item = &'r T>,
{
    Ok(aggregate(records, path, LongSum::new())?.map(Number::to_i64))
}

/// Smallest value at `path`.
pub fn min_f64<'r, T, I>(records: I, path: &str) -> Result<Option<f64>>
where
    T: Gatherable + 'r,
    I: IntoIterator<Item = &'r T>,
{
    Ok(aggregate(records, path, DoubleMin::new())?.map(Number::to_f64))
}

/// Smallest value at `path`, floats truncated toward zero.
pub fn min_i64<'r, T, I>(records: I, path: &str) -> Result<Option<i64>>
where
    T: Gatherable + 'r,
    I: IntoIterator<Item = &'r T>,
{
    Ok(aggregate(records, path, LongMin::new())?.map(Number::to_i64))
}

/// Largest value at `path`.
pub fn max_f64<'r, T, I>(records: I, path: &str) -> Result<Option<f64>>
where
    T: Gatherable + 'r,
    I: IntoIterator<Item = &'r T>,
{
    Ok(aggregate(records, path, DoubleMax::new())?.map(Number::to_f64))
}

/// Largest value at `path`, floats truncated toward zero.
pub fn max_i64<'r, T, I>(records: I, path: &str) -> Result<Option<i64>>
where
    T: Gatherable + 'r,
    I: IntoIterator<Item = &'r T>,
{
    Ok(aggregate(records, path, LongMax::new())?.map(Number::to_i64))
}

/// Mean over the records where `path` resolves.
///
/// Fails with [`GatherError::DivideByZero`](crate::GatherError::DivideByZero)
/// when the input is non-empty but no record has the attribute.
pub fn average_f64<'r, T, I>(records: I, path: &str) -> Result<Option<f64>>
where
    T: Gatherable + 'r,
    I: IntoIterator<Item = &'r T>,
{
    Ok(aggregate(records, path, DoubleAverage::new())?.map(Number::to_f64))
}

/// Integer mean, truncated toward zero. See [`average_f64`].
pub fn average_i64<'r, T, I>(records: I, path: &str) -> Result<Option<i64>>
where
    T: Gatherable + 'r,
    I: IntoIterator<Item = &'r T>,
{
    Ok(aggregate(records, path, LongAverage::new())?.map(Number::to_i64))
}
