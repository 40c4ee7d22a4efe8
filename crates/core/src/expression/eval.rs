use std::cmp::Ordering;

use serde_json::{Number, Value};

use super::{CompareOp, Condition};

impl Condition {
    /// Evaluates the condition against the JSON form of an item.
    ///
    /// Numbers compare numerically and strings lexicographically. Values of
    /// different types are unordered, so ordering comparisons between them
    /// never match. Only top-level attributes are addressed.
    pub fn matches(&self, item: &Value) -> bool {
        match self {
            Self::Compare {
                attribute,
                op,
                value,
            } => {
                let Some(actual) = item.get(attribute) else {
                    return *op == CompareOp::Ne;
                };
                let ordering = compare_values(actual, value);
                match op {
                    CompareOp::Eq => values_equal(actual, value),
                    CompareOp::Ne => !values_equal(actual, value),
                    CompareOp::Lt => ordering == Some(Ordering::Less),
                    CompareOp::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
                    CompareOp::Gt => ordering == Some(Ordering::Greater),
                    CompareOp::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
                }
            }
            Self::Between {
                attribute,
                low,
                high,
            } => item.get(attribute).is_some_and(|actual| {
                matches!(
                    compare_values(actual, low),
                    Some(Ordering::Greater | Ordering::Equal)
                ) && matches!(
                    compare_values(actual, high),
                    Some(Ordering::Less | Ordering::Equal)
                )
            }),
            Self::BeginsWith { attribute, prefix } => item
                .get(attribute)
                .and_then(Value::as_str)
                .is_some_and(|s| s.starts_with(prefix.as_str())),
            Self::Contains { attribute, value } => match (item.get(attribute), value) {
                (Some(Value::String(haystack)), Value::String(needle)) => {
                    haystack.contains(needle.as_str())
                }
                (Some(Value::Array(elements)), needle) => {
                    elements.iter().any(|element| values_equal(element, needle))
                }
                _ => false,
            },
            Self::In { attribute, values } => item
                .get(attribute)
                .is_some_and(|actual| values.iter().any(|v| values_equal(actual, v))),
            Self::Exists(attribute) => item.get(attribute).is_some(),
            Self::NotExists(attribute) => item.get(attribute).is_none(),
            Self::And(left, right) => left.matches(item) && right.matches(item),
            Self::Or(left, right) => left.matches(item) || right.matches(item),
            Self::Not(inner) => !inner.matches(item),
        }
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(_), Value::Number(_)) => {
            compare_values(left, right) == Some(Ordering::Equal)
        }
        _ => left == right,
    }
}

/// Orders two values of the same kind: numbers by value, strings bytewise.
pub(crate) fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => compare_numbers(l, r),
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        _ => None,
    }
}

// Integers compare exactly; only non-integers go through f64.
fn compare_numbers(left: &Number, right: &Number) -> Option<Ordering> {
    match (integer(left), integer(right)) {
        (Some(l), Some(r)) => Some(l.cmp(&r)),
        _ => left.as_f64()?.partial_cmp(&right.as_f64()?),
    }
}

fn integer(number: &Number) -> Option<i128> {
    number
        .as_i64()
        .map(i128::from)
        .or_else(|| number.as_u64().map(i128::from))
}
