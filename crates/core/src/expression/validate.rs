use std::cmp::Ordering;

use crate::storage::{RepositoryError, Result};

use super::eval::compare_values;
use super::{CompareOp, Condition};

/// Checks that a condition has the shape the store accepts as a key condition.
///
/// A key condition is an AND of exactly one equality on the hash key and at
/// most one comparison, `BETWEEN` or `begins_with` on the range key.
pub fn validate_key_condition(
    condition: &Condition,
    hash_key: &str,
    range_key: Option<&str>,
) -> Result<()> {
    let mut leaves = Vec::new();
    flatten_and(condition, &mut leaves);

    let mut hash_seen = false;
    let mut range_seen = false;

    for leaf in leaves {
        let attribute = key_leaf_attribute(leaf)?;
        check_between_bounds(leaf)?;

        if attribute == hash_key {
            if !matches!(leaf, Condition::Compare { op: CompareOp::Eq, .. }) {
                return Err(invalid(format!(
                    "hash key '{hash_key}' only supports equality"
                )));
            }
            if hash_seen {
                return Err(invalid(format!("hash key '{hash_key}' is constrained twice")));
            }
            hash_seen = true;
        } else if Some(attribute) == range_key {
            if matches!(leaf, Condition::Compare { op: CompareOp::Ne, .. }) {
                return Err(invalid(format!(
                    "range key '{attribute}' does not support '<>'"
                )));
            }
            if range_seen {
                return Err(invalid(format!(
                    "range key '{attribute}' is constrained twice"
                )));
            }
            range_seen = true;
        } else {
            return Err(invalid(format!(
                "'{attribute}' is not a key attribute of the queried index"
            )));
        }
    }

    if !hash_seen {
        return Err(invalid(format!(
            "key condition must constrain hash key '{hash_key}'"
        )));
    }

    Ok(())
}

/// Like [`validate_key_condition`], but the range key must be constrained too.
pub fn validate_composite_key_condition(
    condition: &Condition,
    hash_key: &str,
    range_key: Option<&str>,
) -> Result<()> {
    let Some(range_key) = range_key else {
        return Err(invalid(
            "composite query on a table without a range key".to_string(),
        ));
    };

    validate_key_condition(condition, hash_key, Some(range_key))?;

    if !condition.attributes().contains(&range_key) {
        return Err(invalid(format!(
            "composite key condition must constrain range key '{range_key}'"
        )));
    }
    Ok(())
}

/// Checks a filter for constructs the store rejects outright.
pub fn validate_filter(condition: &Condition) -> Result<()> {
    match condition {
        Condition::In { attribute, values } if values.is_empty() => Err(invalid(format!(
            "IN on '{attribute}' needs at least one value"
        ))),
        Condition::And(left, right) | Condition::Or(left, right) => {
            validate_filter(left)?;
            validate_filter(right)
        }
        Condition::Not(inner) => validate_filter(inner),
        between @ Condition::Between { .. } => check_between_bounds(between),
        _ => Ok(()),
    }
}

/// `BETWEEN` needs its lower bound at or below its upper bound.
fn check_between_bounds(condition: &Condition) -> Result<()> {
    match condition {
        Condition::Between {
            attribute,
            low,
            high,
        } if compare_values(low, high) == Some(Ordering::Greater) => Err(invalid(format!(
            "BETWEEN on '{attribute}' has lower bound {low} above upper bound {high}"
        ))),
        _ => Ok(()),
    }
}

fn flatten_and<'a>(condition: &'a Condition, leaves: &mut Vec<&'a Condition>) {
    match condition {
        Condition::And(left, right) => {
            flatten_and(left, leaves);
            flatten_and(right, leaves);
        }
        leaf => leaves.push(leaf),
    }
}

fn key_leaf_attribute(leaf: &Condition) -> Result<&str> {
    match leaf {
        Condition::Compare { attribute, .. }
        | Condition::Between { attribute, .. }
        | Condition::BeginsWith { attribute, .. } => Ok(attribute.as_str()),
        other => Err(invalid(format!(
            "unsupported operator in key condition: {other:?}"
        ))),
    }
}

fn invalid(message: String) -> RepositoryError {
    RepositoryError::InvalidExpression(message)
}
