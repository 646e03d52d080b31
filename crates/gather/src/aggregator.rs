//! Single-pass accumulators over attribute values.
//!
//! The executor feeds an [`Aggregator`] every value it resolves, together
//! with the number of values observed so far, then asks it for a result
//! given the total. Each statistic is its own type:
//!
//! | Type | Result |
//! |------|--------|
//! | [`CountingAggregator`] | number of values fed, nulls included |
//! | [`UniqueAggregator`] | number of distinct values |
//! | [`DoubleSum`] / [`LongSum`] | sum |
//! | [`DoubleMin`] / [`LongMin`] | minimum |
//! | [`DoubleMax`] / [`LongMax`] | maximum |
//! | [`DoubleAverage`] / [`LongAverage`] | sum divided by the total |
//!
//! Numeric aggregators skip null values and reject anything that is not a
//! number. `Long*` variants truncate floats toward zero, reject unsigned
//! values above `i64::MAX` and accumulate with wrapping arithmetic.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{GatherError, Result};
use crate::value::{Array, Number, Value};

/// A stateful accumulator producing one statistic from a stream of values.
pub trait Aggregator {
    /// Folds one value into the accumulator.
    ///
    /// `observed` is the number of values seen so far, this one included.
    fn aggregate(&mut self, observed: usize, value: &Value<'_>) -> Result<()>;

    /// Returns the statistic, given the total number of observed values.
    ///
    /// Has no side effects and may be called at any time.
    fn result(&self, total: usize) -> Result<Number>;
}

impl<A: Aggregator + ?Sized> Aggregator for Box<A> {
    fn aggregate(&mut self, observed: usize, value: &Value<'_>) -> Result<()> {
        (**self).aggregate(observed, value)
    }

    fn result(&self, total: usize) -> Result<Number> {
        (**self).result(total)
    }
}

fn numeric(aggregator: &'static str, value: &Value<'_>) -> Result<Option<Number>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(Some(*n)),
        other => Err(GatherError::NotNumeric {
            aggregator,
            found: other.kind(),
        }),
    }
}

fn long(aggregator: &'static str, value: &Value<'_>) -> Result<Option<i64>> {
    match numeric(aggregator, value)? {
        Some(Number::U64(n)) => i64::try_from(n)
            .map(Some)
            .map_err(|_| GatherError::Overflow { aggregator, value: n }),
        Some(n) => Ok(Some(n.to_i64())),
        None => Ok(None),
    }
}

// ============================================================================
// Counting
// ============================================================================

/// Counts every value fed to it.
#[derive(Debug, Clone, Default)]
pub struct CountingAggregator {
    count: u64,
}

impl CountingAggregator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Aggregator for CountingAggregator {
    fn aggregate(&mut self, _observed: usize, _value: &Value<'_>) -> Result<()> {
        self.count += 1;
        Ok(())
    }

    fn result(&self, _total: usize) -> Result<Number> {
        Ok(Number::U64(self.count))
    }
}

// ============================================================================
// Unique
// ============================================================================

/// Counts distinct values.
///
/// Scalars are distinct by content; integers of any width are the same
/// value when numerically equal, floats are keyed by their bits. Records are
/// distinct by identity, so two equal-looking records at different addresses
/// count twice.
///
/// Identity is the record's address. Values of a zero-sized type have no
/// storage of their own and may share one address, so distinct zero-sized
/// records can count once.
#[derive(Debug, Clone, Default)]
pub struct UniqueAggregator {
    seen: HashSet<Key>,
}

impl UniqueAggregator {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Key {
    Null,
    Bool(bool),
    Char(char),
    Int(i128),
    Float(u64),
    Str(String),
    Record(usize),
    Array(Vec<Key>),
}

impl Key {
    fn of(value: &Value<'_>) -> Self {
        match value {
            Value::Null => Key::Null,
            Value::Bool(b) => Key::Bool(*b),
            Value::Char(c) => Key::Char(*c),
            Value::Number(Number::I64(n)) => Key::Int(i128::from(*n)),
            Value::Number(Number::U64(n)) => Key::Int(i128::from(*n)),
            Value::Number(Number::F64(n)) => Key::Float(n.to_bits()),
            Value::String(s) => Key::Str((*s).to_string()),
            Value::Record(r) => Key::Record(std::ptr::from_ref(*r).cast::<()>() as usize),
            Value::Array(array) => Key::Array(Key::array(array)),
        }
    }

    fn array(array: &Array<'_>) -> Vec<Key> {
        array.iter().map(|element| Key::of(&element)).collect()
    }
}

impl Aggregator for UniqueAggregator {
    fn aggregate(&mut self, _observed: usize, value: &Value<'_>) -> Result<()> {
        self.seen.insert(Key::of(value));
        Ok(())
    }

    fn result(&self, _total: usize) -> Result<Number> {
        Ok(Number::U64(self.seen.len() as u64))
    }
}

// ============================================================================
// Sums
// ============================================================================

/// Floating-point sum.
#[derive(Debug, Clone, Default)]
pub struct DoubleSum {
    sum: f64,
}

impl DoubleSum {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Aggregator for DoubleSum {
    fn aggregate(&mut self, _observed: usize, value: &Value<'_>) -> Result<()> {
        if let Some(n) = numeric("double_sum", value)? {
            self.sum += n.to_f64();
        }
        Ok(())
    }

    fn result(&self, _total: usize) -> Result<Number> {
        Ok(Number::F64(self.sum))
    }
}

/// Integer sum, wrapping on overflow.
#[derive(Debug, Clone, Default)]
pub struct LongSum {
    sum: i64,
}

impl LongSum {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Aggregator for LongSum {
    fn aggregate(&mut self, _observed: usize, value: &Value<'_>) -> Result<()> {
        if let Some(n) = long("long_sum", value)? {
            self.sum = self.sum.wrapping_add(n);
        }
        Ok(())
    }

    fn result(&self, _total: usize) -> Result<Number> {
        Ok(Number::I64(self.sum))
    }
}

// ============================================================================
// Extremes
// ============================================================================

/// Floating-point minimum. Starts at `f64::MAX`.
#[derive(Debug, Clone)]
pub struct DoubleMin {
    min: f64,
}

impl DoubleMin {
    pub fn new() -> Self {
        DoubleMin { min: f64::MAX }
    }
}

impl Default for DoubleMin {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for DoubleMin {
    fn aggregate(&mut self, _observed: usize, value: &Value<'_>) -> Result<()> {
        if let Some(n) = numeric("double_min", value)? {
            self.min = self.min.min(n.to_f64());
        }
        Ok(())
    }

    fn result(&self, _total: usize) -> Result<Number> {
        Ok(Number::F64(self.min))
    }
}

/// Integer minimum. Starts at `i64::MAX`.
#[derive(Debug, Clone)]
pub struct LongMin {
    min: i64,
}

impl LongMin {
    pub fn new() -> Self {
        LongMin { min: i64::MAX }
    }
}

impl Default for LongMin {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for LongMin {
    fn aggregate(&mut self, _observed: usize, value: &Value<'_>) -> Result<()> {
        if let Some(n) = long("long_min", value)? {
            self.min = self.min.min(n);
        }
        Ok(())
    }

    fn result(&self, _total: usize) -> Result<Number> {
        Ok(Number::I64(self.min))
    }
}

/// Floating-point maximum. Starts at `f64::MIN`, the most negative finite
/// value.
#[derive(Debug, Clone)]
pub struct DoubleMax {
    max: f64,
}

impl DoubleMax {
    pub fn new() -> Self {
        DoubleMax { max: f64::MIN }
    }
}

impl Default for DoubleMax {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for DoubleMax {
    fn aggregate(&mut self, _observed: usize, value: &Value<'_>) -> Result<()> {
        if let Some(n) = numeric("double_max", value)? {
            self.max = self.max.max(n.to_f64());
        }
        Ok(())
    }

    fn result(&self, _total: usize) -> Result<Number> {
        Ok(Number::F64(self.max))
    }
}

/// Integer maximum. Starts at `i64::MIN`.
#[derive(Debug, Clone)]
pub struct LongMax {
    max: i64,
}

impl LongMax {
    pub fn new() -> Self {
        LongMax { max: i64::MIN }
    }
}

impl Default for LongMax {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for LongMax {
    fn aggregate(&mut self, _observed: usize, value: &Value<'_>) -> Result<()> {
        if let Some(n) = long("long_max", value)? {
            self.max = self.max.max(n);
        }
        Ok(())
    }

    fn result(&self, _total: usize) -> Result<Number> {
        Ok(Number::I64(self.max))
    }
}

// ============================================================================
// Averages
// ============================================================================

/// Floating-point mean over the observed total.
///
/// A total of zero is a [`GatherError::DivideByZero`].
#[derive(Debug, Clone, Default)]
pub struct DoubleAverage {
    sum: f64,
}

impl DoubleAverage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Aggregator for DoubleAverage {
    fn aggregate(&mut self, _observed: usize, value: &Value<'_>) -> Result<()> {
        if let Some(n) = numeric("double_average", value)? {
            self.sum += n.to_f64();
        }
        Ok(())
    }

    fn result(&self, total: usize) -> Result<Number> {
        if total == 0 {
            return Err(GatherError::DivideByZero {
                aggregator: "double_average",
            });
        }
        Ok(Number::F64(self.sum / total as f64))
    }
}

/// Integer mean over the observed total, truncated toward zero.
///
/// A total of zero is a [`GatherError::DivideByZero`].
#[derive(Debug, Clone, Default)]
pub struct LongAverage {
    sum: i64,
}

impl LongAverage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Aggregator for LongAverage {
    fn aggregate(&mut self, _observed: usize, value: &Value<'_>) -> Result<()> {
        if let Some(n) = long("long_average", value)? {
            self.sum = self.sum.wrapping_add(n);
        }
        Ok(())
    }

    fn result(&self, total: usize) -> Result<Number> {
        if total == 0 {
            return Err(GatherError::DivideByZero {
                aggregator: "long_average",
            });
        }
        Ok(Number::I64(self.sum.wrapping_div(total as i64)))
    }
}

// ============================================================================
// Selection by name
// ============================================================================

/// Names every built-in aggregator, for choosing one at runtime.
///
/// ```
/// use gather::AggregatorKind;
///
/// let kind: AggregatorKind = "long_max".parse().unwrap();
/// assert_eq!(kind, AggregatorKind::LongMax);
/// assert_eq!(kind.to_string(), "long_max");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AggregatorKind {
    Count,
    Unique,
    DoubleSum,
    LongSum,
    DoubleMin,
    LongMin,
    DoubleMax,
    LongMax,
    DoubleAverage,
    LongAverage,
}

impl AggregatorKind {
    /// Every kind, in declaration order.
    pub const ALL: [AggregatorKind; 10] = [
        AggregatorKind::Count,
        AggregatorKind::Unique,
        AggregatorKind::DoubleSum,
        AggregatorKind::LongSum,
        AggregatorKind::DoubleMin,
        AggregatorKind::LongMin,
        AggregatorKind::DoubleMax,
        AggregatorKind::LongMax,
        AggregatorKind::DoubleAverage,
        AggregatorKind::LongAverage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AggregatorKind::Count => "count",
            AggregatorKind::Unique => "unique",
            AggregatorKind::DoubleSum => "double_sum",
            AggregatorKind::LongSum => "long_sum",
            AggregatorKind::DoubleMin => "double_min",
            AggregatorKind::LongMin => "long_min",
            AggregatorKind::DoubleMax => "double_max",
            AggregatorKind::LongMax => "long_max",
            AggregatorKind::DoubleAverage => "double_average",
            AggregatorKind::LongAverage => "long_average",
        }
    }

    /// Creates a fresh aggregator of this kind.
    pub fn build(self) -> Box<dyn Aggregator> {
        match self {
            AggregatorKind::Count => Box::new(CountingAggregator::new()),
            AggregatorKind::Unique => Box::new(UniqueAggregator::new()),
            AggregatorKind::DoubleSum => Box::new(DoubleSum::new()),
            AggregatorKind::LongSum => Box::new(LongSum::new()),
            AggregatorKind::DoubleMin => Box::new(DoubleMin::new()),
            AggregatorKind::LongMin => Box::new(LongMin::new()),
            AggregatorKind::DoubleMax => Box::new(DoubleMax::new()),
            AggregatorKind::LongMax => Box::new(LongMax::new()),
            AggregatorKind::DoubleAverage => Box::new(DoubleAverage::new()),
            AggregatorKind::LongAverage => Box::new(LongAverage::new()),
        }
    }
}

impl fmt::Display for AggregatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregatorKind {
    type Err = GatherError;

    fn from_str(s: &str) -> Result<Self> {
        AggregatorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| GatherError::UnknownAggregator(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed<A: Aggregator>(mut aggregator: A, values: &[Value<'_>]) -> Result<Number> {
        for (index, value) in values.iter().enumerate() {
            aggregator.aggregate(index + 1, value)?;
        }
        aggregator.result(values.len())
    }

    #[test]
    fn counting_counts_everything() {
        let values = [Value::from(1), Value::Null, Value::String("x")];
        assert_eq!(feed(CountingAggregator::new(), &values).unwrap(), Number::U64(3));
    }

    #[test]
    fn counting_ignores_total() {
        let mut counter = CountingAggregator::new();
        counter.aggregate(1, &Value::Null).unwrap();
        assert_eq!(counter.result(99).unwrap(), Number::U64(1));
    }

    #[test]
    fn unique_dedups_by_content() {
        let values = [
            Value::String("a"),
            Value::String("a"),
            Value::from(1i32),
            Value::from(1u64),
            Value::from(1.0f64),
            Value::Null,
            Value::Null,
        ];
        // "a", integer 1, float 1.0, null
        assert_eq!(feed(UniqueAggregator::new(), &values).unwrap(), Number::U64(4));
    }

    #[test]
    fn unique_arrays_compare_element_wise() {
        let values = [
            Value::Array(Array::I32(&[1, 2])),
            Value::Array(Array::I64(&[1, 2])),
            Value::Array(Array::I64(&[2, 1])),
        ];
        assert_eq!(feed(UniqueAggregator::new(), &values).unwrap(), Number::U64(2));
    }

    #[test]
    fn unique_records_by_address() {
        struct Unit;
        impl crate::resolve::Gatherable for Unit {
            fn member(&self, _name: &str) -> crate::resolve::Member<'_> {
                crate::resolve::Member::Absent
            }
        }

        let a = std::collections::HashMap::from([("x".to_string(), 0u8)]);
        let b = a.clone();
        let values = [Value::Record(&a), Value::Record(&a), Value::Record(&b)];
        assert_eq!(feed(UniqueAggregator::new(), &values).unwrap(), Number::U64(2));

        // Zero-sized records have no distinct address to key by
        let units = [Unit, Unit, Unit];
        let values: Vec<Value<'_>> = units.iter().map(|u| Value::Record(u)).collect();
        assert_eq!(feed(UniqueAggregator::new(), &values).unwrap(), Number::U64(1));
    }

    #[test]
    fn sums() {
        let values = [Value::from(1.5), Value::from(2), Value::Null];
        assert_eq!(feed(DoubleSum::new(), &values).unwrap(), Number::F64(3.5));
        assert_eq!(feed(LongSum::new(), &values).unwrap(), Number::I64(3));
    }

    #[test]
    fn long_sum_wraps() {
        let values = [Value::from(i64::MAX), Value::from(1)];
        assert_eq!(feed(LongSum::new(), &values).unwrap(), Number::I64(i64::MIN));
    }

    #[test]
    fn long_aggregators_reject_unsigned_overflow() {
        let values = [Value::from(u64::MAX), Value::from(5)];
        for err in [
            feed(LongSum::new(), &values).unwrap_err(),
            feed(LongMin::new(), &values).unwrap_err(),
            feed(LongMax::new(), &values).unwrap_err(),
            feed(LongAverage::new(), &values).unwrap_err(),
        ] {
            assert!(matches!(err, GatherError::Overflow { value: u64::MAX, .. }));
        }

        // The largest representable unsigned value still fits
        let values = [Value::from(i64::MAX as u64)];
        assert_eq!(feed(LongMax::new(), &values).unwrap(), Number::I64(i64::MAX));
        // Double variants take the full unsigned range
        assert_eq!(
            feed(DoubleMax::new(), &[Value::from(u64::MAX)]).unwrap(),
            Number::F64(u64::MAX as f64)
        );
    }

    #[test]
    fn extremes() {
        let values = [Value::from(3), Value::from(-7.5), Value::from(12u8)];
        assert_eq!(feed(DoubleMin::new(), &values).unwrap(), Number::F64(-7.5));
        assert_eq!(feed(DoubleMax::new(), &values).unwrap(), Number::F64(12.0));
        assert_eq!(feed(LongMin::new(), &values).unwrap(), Number::I64(-7));
        assert_eq!(feed(LongMax::new(), &values).unwrap(), Number::I64(12));
    }

    #[test]
    fn extremes_start_at_numeric_limits() {
        assert_eq!(DoubleMin::new().result(0).unwrap(), Number::F64(f64::MAX));
        assert_eq!(DoubleMax::new().result(0).unwrap(), Number::F64(f64::MIN));
        assert_eq!(LongMin::new().result(0).unwrap(), Number::I64(i64::MAX));
        assert_eq!(LongMax::new().result(0).unwrap(), Number::I64(i64::MIN));
    }

    #[test]
    fn averages() {
        let values = [Value::from(1), Value::from(2)];
        assert_eq!(feed(DoubleAverage::new(), &values).unwrap(), Number::F64(1.5));
        assert_eq!(feed(LongAverage::new(), &values).unwrap(), Number::I64(1));

        let values = [Value::from(-3), Value::from(-4)];
        assert_eq!(feed(LongAverage::new(), &values).unwrap(), Number::I64(-3));
    }

    #[test]
    fn averages_over_zero_observations_fail() {
        assert!(matches!(
            DoubleAverage::new().result(0),
            Err(GatherError::DivideByZero { aggregator: "double_average" })
        ));
        assert!(matches!(
            LongAverage::new().result(0),
            Err(GatherError::DivideByZero { aggregator: "long_average" })
        ));
    }

    #[test]
    fn result_is_idempotent() {
        let mut sum = DoubleSum::new();
        sum.aggregate(1, &Value::from(2.0)).unwrap();
        assert_eq!(sum.result(1).unwrap(), sum.result(1).unwrap());
    }

    #[test]
    fn numeric_aggregators_reject_other_kinds() {
        let err = feed(LongMax::new(), &[Value::String("9")]).unwrap_err();
        assert!(matches!(
            err,
            GatherError::NotNumeric { aggregator: "long_max", found: "string" }
        ));
        assert!(feed(DoubleSum::new(), &[Value::Bool(true)]).is_err());
    }

    #[test]
    fn kinds_parse_and_build() {
        for kind in AggregatorKind::ALL {
            assert_eq!(kind.as_str().parse::<AggregatorKind>().unwrap(), kind);
        }
        assert!(matches!(
            "median".parse::<AggregatorKind>(),
            Err(GatherError::UnknownAggregator(ref name)) if name == "median"
        ));

        let counter = AggregatorKind::Count.build();
        assert_eq!(feed(counter, &[Value::Null]).unwrap(), Number::U64(1));
    }
}
