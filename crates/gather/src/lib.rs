//! Gather - in-process query and aggregation engine for Rust record collections.
//!
//! Gather filters, pages and aggregates in-memory collections of records by
//! attribute path. It supports:
//!
//! - Dotted attribute paths through nested records (`"owner.address.city"`)
//! - Fourteen operators: equality, ordering, membership, presence,
//!   collection containment, regex and wildcard patterns
//! - Criteria folded left to right with per-criterion `AND`/`OR` joins and
//!   negation
//! - Skip and limit paging in a single forward pass
//! - Count, unique, sum, min, max and average aggregation
//!
//! # Quick Start
//!
//! ```rust
//! use gather::{executor, Criterion, Gatherable, Member, Query};
//!
//! struct Book {
//!     title: String,
//!     year: u16,
//!     tags: Vec<String>,
//! }
//!
//! impl Gatherable for Book {
//!     fn member(&self, name: &str) -> Member<'_> {
//!         match name {
//!             "title" => Member::of(&self.title),
//!             "year" => Member::of(&self.year),
//!             "tags" => Member::of(&self.tags),
//!             _ => Member::Absent,
//!         }
//!     }
//! }
//!
//! let books = vec![
//!     Book { title: "Dune".into(), year: 1965, tags: vec!["sf".into()] },
//!     Book { title: "Emma".into(), year: 1815, tags: vec!["classic".into()] },
//!     Book { title: "Neuromancer".into(), year: 1984, tags: vec!["sf".into(), "cyberpunk".into()] },
//! ];
//!
//! let query = Query::new()
//!     .or(Criterion::collection_has_value("tags", "sf"))
//!     .and(Criterion::greater_than("year", 1970));
//!
//! let found = query.select(&books).unwrap();
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].title, "Neuromancer");
//!
//! assert_eq!(executor::max_i64(&books, "year").unwrap(), Some(1984));
//! ```
//!
//! With the `derive` feature, `#[derive(Gatherable)]` writes the `member`
//! implementation for you.
//!
//! # Matching Semantics
//!
//! Criteria fold into a running result that starts out `false`:
//!
//! ```text
//! result = false
//! for c in criteria:
//!     result = c.join(evaluate(c) XOR c.negate, result)
//! ```
//!
//! - A path that does not resolve fails every operator except `HasProperty`
//! - A null value or null operand fails every operator except `IsNull` and
//!   `HasProperty`
//! - A leading `AND` criterion always folds to `false`
//!
//! # Operators and Operands
//!
//! | Operator | Operand |
//! |----------|---------|
//! | `Equals`, `EqualsIgnoreCase` | scalar |
//! | `GreaterThan`, `GreaterThanOrEquals`, `LessThan`, `LessThanOrEquals` | number, string, char or bool |
//! | `In` | non-empty list |
//! | `IsNull`, `HasProperty` | ignored |
//! | `CollectionHasValue` | scalar |
//! | `CollectionHasAllValues`, `CollectionHasAnyValue` | list |
//! | `RegexMatch`, `WildcardMatch` | pattern string |
//!
//! # Features
//!
//! - `derive`: `#[derive(Gatherable)]`
//! - `json`: `serde_json::Value` documents as records
//! - `serde`: serializable [`Operator`], [`Join`] and [`AggregatorKind`]

mod aggregator;
pub mod compare;
mod convert;
mod criterion;
mod error;
pub mod executor;
#[cfg(feature = "json")]
mod json;
pub mod matcher;
mod operator;
mod query;
mod resolve;
mod value;

// Re-export public API
pub use aggregator::{
    Aggregator, AggregatorKind, CountingAggregator, DoubleAverage, DoubleMax, DoubleMin,
    DoubleSum, LongAverage, LongMax, LongMin, LongSum, UniqueAggregator,
};
pub use convert::{AsValue, Element};
pub use criterion::{Criterion, Operand};
pub use error::{GatherError, Result};
pub use matcher::matches;
pub use operator::{Join, Operator};
pub use query::Query;
pub use resolve::{resolve, Gatherable, Member, Slot};
pub use value::{Array, Number, Value};

#[cfg(feature = "derive")]
pub use gather_macros::Gatherable;
