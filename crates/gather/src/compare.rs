//! Value comparison primitives.
//!
//! Pure functions that test a resolved attribute [`Value`] against a criterion
//! [`Operand`]. Numeric comparison ignores width, membership works uniformly
//! over every [`Array`] kind, and pattern operators run against the value's
//! textual form.
//!
//! A null attribute value or a null operand fails every operator except
//! `IsNull` and `HasProperty`.

use std::cmp::Ordering;
use std::slice;

use regex::Regex;

use crate::criterion::Operand;
use crate::error::Result;
use crate::operator::Operator;
use crate::value::{Array, Number, Value};

/// Dispatches `operator` over a resolved attribute value.
///
/// Only pattern operators can fail, when given a pattern that does not
/// compile.
pub fn value_matches(value: &Value<'_>, operator: Operator, operand: &Operand) -> Result<bool> {
    match operator {
        Operator::IsNull => Ok(value.is_null()),
        // Reaching a value at all means the path resolved.
        Operator::HasProperty => Ok(true),
        _ if value.is_null() || operand.is_null() => Ok(false),

        Operator::Equals => Ok(equals(value, operand)),
        Operator::EqualsIgnoreCase => Ok(equals_ignore_case(value, operand)),

        Operator::GreaterThan
        | Operator::GreaterThanOrEquals
        | Operator::LessThan
        | Operator::LessThanOrEquals => {
            Ok(order(value, operand).is_some_and(|ordering| operator.eval_ordering(ordering)))
        }

        Operator::In => Ok(is_in(value, operand)),

        Operator::CollectionHasValue => {
            Ok(value.as_array().is_some_and(|array| contains_element(array, operand)))
        }
        Operator::CollectionHasAllValues => Ok(value
            .as_array()
            .is_some_and(|array| contains_all_or_any(array, operand, true))),
        Operator::CollectionHasAnyValue => Ok(value
            .as_array()
            .is_some_and(|array| contains_all_or_any(array, operand, false))),

        Operator::RegexMatch => regex_value(value, operand),
        Operator::WildcardMatch => wildcard_value(value, operand),
    }
}

/// Content equality between a value and an operand.
///
/// Numbers compare numerically across widths; arrays compare element-wise
/// against list operands. Kinds never coerce into each other.
pub fn equals(value: &Value<'_>, operand: &Operand) -> bool {
    match (value, operand) {
        (Value::Bool(a), Operand::Bool(b)) => a == b,
        (Value::Char(a), Operand::Char(b)) => a == b,
        (Value::Number(a), Operand::Number(b)) => a.same_as(*b),
        (Value::String(a), Operand::String(b)) => *a == b.as_str(),
        (Value::Array(a), Operand::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(element, item)| equals(&element, item))
        }
        _ => false,
    }
}

/// Case-insensitive equality when the value is a string, [`equals`] otherwise.
pub fn equals_ignore_case(value: &Value<'_>, operand: &Operand) -> bool {
    match value {
        Value::String(text) => operand
            .to_text()
            .is_some_and(|other| eq_ignore_case(text, &other)),
        _ => equals(value, operand),
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Orders a value against an operand.
///
/// Numbers order numerically whatever their width; strings, characters and
/// booleans use their natural ordering against an operand of the same kind.
/// Anything else, NaN included, is unordered.
pub fn order(value: &Value<'_>, operand: &Operand) -> Option<Ordering> {
    match (value, operand) {
        (Value::Number(a), Operand::Number(b)) => compare_numbers(*a, *b),
        (Value::String(a), Operand::String(b)) => Some((*a).cmp(b.as_str())),
        (Value::Char(a), Operand::Char(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Operand::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Compares two numbers of any width.
pub fn compare_numbers(a: Number, b: Number) -> Option<Ordering> {
    a.compare(b)
}

/// Value appears in a non-empty list operand.
pub fn is_in(value: &Value<'_>, operand: &Operand) -> bool {
    match operand.as_list() {
        Some(items) if !items.is_empty() => items.iter().any(|item| equals(value, item)),
        _ => false,
    }
}

/// Array holds an element equal to `required`.
///
/// A non-numeric operand never matches a numeric primitive array, and so on
/// for every other kind mismatch.
pub fn contains_element(array: &Array<'_>, required: &Operand) -> bool {
    if required.is_null() {
        return false;
    }

    array.iter().any(|element| equals(&element, required))
}

/// Array holds every (`all`) or at least one (`!all`) of the required values.
///
/// A scalar `required` is treated as a one-element list. An empty list of
/// required values never matches.
pub fn contains_all_or_any(array: &Array<'_>, required: &Operand, all: bool) -> bool {
    let items = match required {
        Operand::Null => return false,
        Operand::List(items) => items.as_slice(),
        scalar => slice::from_ref(scalar),
    };

    if items.is_empty() {
        return false;
    }

    if all {
        items.iter().all(|item| contains_element(array, item))
    } else {
        items.iter().any(|item| contains_element(array, item))
    }
}

/// Compiles `pattern` so that it must match the whole text.
///
/// The pattern must be valid on its own; an unbalanced one could otherwise
/// close the anchoring group.
pub fn full_match_regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)?;
    Ok(Regex::new(&format!("^(?:{pattern})$"))?)
}

/// Compiles a glob pattern (`*` any run, `?` any single character) into a
/// whole-text regular expression.
pub fn wildcard_regex(pattern: &str) -> Result<Regex> {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push_str("^(?s:");

    let mut buf = [0u8; 4];
    for c in pattern.chars() {
        match c {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            other => source.push_str(&regex::escape(other.encode_utf8(&mut buf))),
        }
    }

    source.push_str(")$");
    Ok(Regex::new(&source)?)
}

/// Text fully matches the regular expression `pattern`.
pub fn regex_matches(text: &str, pattern: &str) -> Result<bool> {
    Ok(full_match_regex(pattern)?.is_match(text))
}

/// Text matches the glob `pattern`.
pub fn wildcard_matches(text: &str, pattern: &str) -> Result<bool> {
    Ok(wildcard_regex(pattern)?.is_match(text))
}

// A compiled `Operand::Pattern` is applied as-is under either pattern
// operator; any other scalar operand is compiled from its text on each call.
fn pattern_value(
    value: &Value<'_>,
    operand: &Operand,
    compile: fn(&str) -> Result<Regex>,
) -> Result<bool> {
    let Some(text) = value.to_text() else {
        return Ok(false);
    };

    match operand {
        Operand::Pattern(regex) => Ok(regex.is_match(&text)),
        other => match other.to_text() {
            Some(pattern) => Ok(compile(&pattern)?.is_match(&text)),
            None => Ok(false),
        },
    }
}

fn regex_value(value: &Value<'_>, operand: &Operand) -> Result<bool> {
    pattern_value(value, operand, full_match_regex)
}

fn wildcard_value(value: &Value<'_>, operand: &Operand) -> Result<bool> {
    pattern_value(value, operand, wildcard_regex)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(value: Value<'_>, operator: Operator, operand: impl Into<Operand>) -> bool {
        value_matches(&value, operator, &operand.into()).unwrap()
    }

    #[test]
    fn equals_same_kind() {
        assert!(check(Value::String("a"), Operator::Equals, "a"));
        assert!(!check(Value::String("a"), Operator::Equals, "A"));
        assert!(check(Value::Bool(true), Operator::Equals, true));
        assert!(check(Value::Char('x'), Operator::Equals, 'x'));
    }

    #[test]
    fn equals_numbers_across_widths() {
        assert!(check(Value::from(10u8), Operator::Equals, 10i64));
        assert!(check(Value::from(10i32), Operator::Equals, 10.0f64));
        assert!(!check(Value::from(10i32), Operator::Equals, 11));
    }

    #[test]
    fn equals_never_coerces_kinds() {
        assert!(!check(Value::String("10"), Operator::Equals, 10));
        assert!(!check(Value::Char('a'), Operator::Equals, "a"));
    }

    #[test]
    fn equals_arrays_against_lists() {
        let value = Value::Array(Array::I32(&[1, 2]));
        assert!(check(value.clone(), Operator::Equals, vec![1, 2]));
        assert!(!check(value, Operator::Equals, vec![2, 1]));
    }

    #[test]
    fn equals_ignore_case_on_strings_only() {
        assert!(check(Value::String("Hello"), Operator::EqualsIgnoreCase, "hELLO"));
        assert!(check(Value::String("ÄBC"), Operator::EqualsIgnoreCase, "äbc"));
        assert!(!check(Value::String("Hello"), Operator::EqualsIgnoreCase, "help"));
        // Non-string values fall back to plain equality
        assert!(check(Value::from(3), Operator::EqualsIgnoreCase, 3));
        assert!(!check(Value::Char('A'), Operator::EqualsIgnoreCase, 'a'));
    }

    #[test]
    fn ordering_numbers() {
        assert!(check(Value::from(5i8), Operator::GreaterThan, 4.5));
        assert!(check(Value::from(5u64), Operator::GreaterThanOrEquals, 5i32));
        assert!(check(Value::from(-1i64), Operator::LessThan, 0u8));
        assert!(check(Value::from(2.0f32), Operator::LessThanOrEquals, 2));
        assert!(!check(Value::from(f64::NAN), Operator::LessThan, 1));
    }

    #[test]
    fn ordering_natural_types() {
        assert!(check(Value::String("b"), Operator::GreaterThan, "a"));
        assert!(check(Value::Char('a'), Operator::LessThan, 'b'));
        assert!(check(Value::Bool(true), Operator::GreaterThan, false));
    }

    #[test]
    fn ordering_mismatched_kinds_is_false() {
        assert!(!check(Value::from(5), Operator::GreaterThan, "4"));
        assert!(!check(Value::String("5"), Operator::LessThan, 9));
        assert!(!check(
            Value::Array(Array::I32(&[1])),
            Operator::LessThan,
            vec![2]
        ));
    }

    #[test]
    fn in_requires_non_empty_list() {
        assert!(check(Value::from(2), Operator::In, vec![1, 2, 3]));
        assert!(!check(Value::from(4), Operator::In, vec![1, 2, 3]));
        assert!(!check(Value::from(2), Operator::In, Vec::<i32>::new()));
        // Scalar operand is not a container
        assert!(!check(Value::from(2), Operator::In, 2));
    }

    #[test]
    fn is_null_ignores_operand() {
        assert!(check(Value::Null, Operator::IsNull, Operand::Null));
        assert!(check(Value::Null, Operator::IsNull, "anything"));
        assert!(!check(Value::from(0), Operator::IsNull, Operand::Null));
    }

    #[test]
    fn null_value_or_operand_fails_other_operators() {
        for op in Operator::ALL {
            if op.ignores_operand() {
                continue;
            }
            assert!(!check(Value::Null, op, "x"), "{op} on null value");
            assert!(!check(Value::String("x"), op, Operand::Null), "{op} on null operand");
        }
    }

    #[test]
    fn collection_has_value_on_every_array_kind() {
        assert!(check(Value::Array(Array::Bool(&[false, true])), Operator::CollectionHasValue, true));
        assert!(check(Value::Array(Array::Char(&['a', 'b'])), Operator::CollectionHasValue, 'b'));
        assert!(check(Value::Array(Array::I8(&[1, 2])), Operator::CollectionHasValue, 2));
        assert!(check(Value::Array(Array::I16(&[1, 2])), Operator::CollectionHasValue, 2u8));
        assert!(check(Value::Array(Array::I32(&[1, 2])), Operator::CollectionHasValue, 2i64));
        assert!(check(Value::Array(Array::I64(&[1, 2])), Operator::CollectionHasValue, 2.0));
        assert!(check(Value::Array(Array::U8(&[1, 2])), Operator::CollectionHasValue, 1));
        assert!(check(Value::Array(Array::U16(&[1, 2])), Operator::CollectionHasValue, 1));
        assert!(check(Value::Array(Array::U32(&[1, 2])), Operator::CollectionHasValue, 1));
        assert!(check(Value::Array(Array::U64(&[1, 2])), Operator::CollectionHasValue, 1));
        assert!(check(Value::Array(Array::F32(&[1.5])), Operator::CollectionHasValue, 1.5));
        assert!(check(Value::Array(Array::F64(&[1.5])), Operator::CollectionHasValue, 1.5f32));

        let names = vec!["x".to_string()];
        assert!(check(Value::Array(Array::Str(&names)), Operator::CollectionHasValue, "x"));
        assert!(check(
            Value::Array(Array::Values(vec![Value::String("y")])),
            Operator::CollectionHasValue,
            "y"
        ));
    }

    #[test]
    fn collection_has_value_kind_mismatch_is_false() {
        assert!(!check(Value::Array(Array::I32(&[1, 2])), Operator::CollectionHasValue, "1"));
        assert!(!check(Value::Array(Array::Char(&['1'])), Operator::CollectionHasValue, 1));
        // Not a collection at all
        assert!(!check(Value::String("abc"), Operator::CollectionHasValue, "a"));
    }

    #[test]
    fn collection_has_all_and_any() {
        let value = Value::Array(Array::U16(&[1, 2, 3]));
        assert!(check(value.clone(), Operator::CollectionHasAllValues, vec![1, 3]));
        assert!(!check(value.clone(), Operator::CollectionHasAllValues, vec![1, 4]));
        assert!(check(value.clone(), Operator::CollectionHasAnyValue, vec![4, 3]));
        assert!(!check(value.clone(), Operator::CollectionHasAnyValue, vec![4, 5]));

        // Scalar required value behaves as a single-element list
        assert!(check(value.clone(), Operator::CollectionHasAllValues, 2));

        // Empty requirement never matches
        assert!(!check(value.clone(), Operator::CollectionHasAllValues, Vec::<i32>::new()));
        assert!(!check(value, Operator::CollectionHasAnyValue, Vec::<i32>::new()));
    }

    #[test]
    fn collection_any_skips_unsupported_required_values() {
        let value = Value::Array(Array::F64(&[0.5]));
        let mixed = Operand::List(vec![Operand::from("0.5"), Operand::from(0.5)]);
        assert!(value_matches(&value, Operator::CollectionHasAnyValue, &mixed).unwrap());
        assert!(!value_matches(&value, Operator::CollectionHasAllValues, &mixed).unwrap());
    }

    #[test]
    fn regex_matches_whole_text() {
        assert!(check(Value::String("abc123"), Operator::RegexMatch, r"[a-z]+\d+"));
        assert!(!check(Value::String("abc123!"), Operator::RegexMatch, r"[a-z]+\d+"));
        // Non-string values use their textual form
        assert!(check(Value::from(2024), Operator::RegexMatch, r"\d{4}"));
    }

    #[test]
    fn regex_with_compiled_operand() {
        let anchored = Operand::pattern("a|ab").unwrap();
        assert!(value_matches(&Value::String("ab"), Operator::RegexMatch, &anchored).unwrap());

        let loose = Operand::from(Regex::new("b").unwrap());
        assert!(value_matches(&Value::String("abc"), Operator::RegexMatch, &loose).unwrap());
    }

    #[test]
    fn regex_invalid_pattern_is_an_error() {
        let result = value_matches(
            &Value::String("x"),
            Operator::RegexMatch,
            &Operand::from("(open"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn regex_unbalanced_pattern_cannot_escape_anchors() {
        assert!(full_match_regex("zzz)|(?:.*").is_err());
        assert!(regex_matches("anything", "zzz)|(?:.*").is_err());
        assert!(Operand::pattern("a)|(b").is_err());
        assert!(full_match_regex("(a)|(b)").is_ok_and(|re| !re.is_match("ab")));
    }

    #[test]
    fn regex_on_arrays_is_false() {
        assert!(!check(Value::Array(Array::I8(&[1])), Operator::RegexMatch, ".*"));
    }

    #[test]
    fn wildcard_patterns() {
        assert!(wildcard_matches("report.txt", "*.txt").unwrap());
        assert!(wildcard_matches("a.b", "a?b").unwrap());
        assert!(!wildcard_matches("ab", "a?b").unwrap());
        assert!(wildcard_matches("", "*").unwrap());
        assert!(wildcard_matches("(x)[y]", "(x)[?]").unwrap());
        assert!(!wildcard_matches("report.txt", "*.md").unwrap());
        assert!(wildcard_matches("multi\nline", "multi*").unwrap());
    }

    #[test]
    fn compiled_wildcard_operand_is_not_reglobbed() {
        let glob = Operand::wildcard("J*n").unwrap();
        assert!(value_matches(&Value::String("Jonathan"), Operator::WildcardMatch, &glob).unwrap());
        assert!(!value_matches(&Value::String("Jon!"), Operator::WildcardMatch, &glob).unwrap());

        // The source of an anchored regex is not read as a glob
        let anchored = Operand::pattern("a.c").unwrap();
        assert!(value_matches(&Value::String("abc"), Operator::WildcardMatch, &anchored).unwrap());
        assert!(!value_matches(&Value::String("^(?:a.c)$"), Operator::WildcardMatch, &anchored).unwrap());
    }

    #[test]
    fn wildcard_operator_uses_text_form() {
        assert!(check(Value::String("Jonathan"), Operator::WildcardMatch, "J*n"));
        assert!(check(Value::from(1234), Operator::WildcardMatch, "12??"));
        assert!(!check(Value::String("Jon"), Operator::WildcardMatch, "j*"));
    }

    #[test]
    fn has_property_is_true_for_any_resolved_value() {
        assert!(check(Value::Null, Operator::HasProperty, Operand::Null));
        assert!(check(Value::from(1), Operator::HasProperty, Operand::Null));
    }

    #[test]
    fn records_only_match_presence_operators() {
        struct Empty;
        impl crate::Gatherable for Empty {
            fn member(&self, _name: &str) -> crate::Member<'_> {
                crate::Member::Absent
            }
        }

        let empty = Empty;
        let value = Value::Record(&empty);
        assert!(!check(value.clone(), Operator::Equals, "x"));
        assert!(!check(value.clone(), Operator::IsNull, Operand::Null));
        assert!(check(value, Operator::HasProperty, Operand::Null));
    }
}
