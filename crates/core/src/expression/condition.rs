use std::ops::{BitAnd, BitOr, Not};

use serde_json::Value;

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// The operator as written in an expression string.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// A condition over the attributes of a stored item.
///
/// Built with the constructor functions and combined with `&`, `|` and `!`:
///
/// ```
/// use dynarepo_core::expression::Condition;
///
/// let key = Condition::eq("customer_id", "c-1") & Condition::begins_with("order_id", "2024-");
/// let filter = Condition::gt("total", 100) | !Condition::exists("discount");
/// # let _ = (key, filter);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        attribute: String,
        op: CompareOp,
        value: Value,
    },
    Between {
        attribute: String,
        low: Value,
        high: Value,
    },
    BeginsWith {
        attribute: String,
        prefix: String,
    },
    Contains {
        attribute: String,
        value: Value,
    },
    In {
        attribute: String,
        values: Vec<Value>,
    },
    Exists(String),
    NotExists(String),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn compare(attribute: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Compare {
            attribute: attribute.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(attribute, CompareOp::Eq, value)
    }

    pub fn ne(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(attribute, CompareOp::Ne, value)
    }

    pub fn lt(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(attribute, CompareOp::Lt, value)
    }

    pub fn le(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(attribute, CompareOp::Le, value)
    }

    pub fn gt(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(attribute, CompareOp::Gt, value)
    }

    pub fn ge(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(attribute, CompareOp::Ge, value)
    }

    /// Inclusive range check.
    pub fn between(
        attribute: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        Self::Between {
            attribute: attribute.into(),
            low: low.into(),
            high: high.into(),
        }
    }

    pub fn begins_with(attribute: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::BeginsWith {
            attribute: attribute.into(),
            prefix: prefix.into(),
        }
    }

    /// Substring match on strings, membership on lists and sets.
    pub fn contains(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Contains {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    pub fn is_in<V: Into<Value>>(
        attribute: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In {
            attribute: attribute.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn exists(attribute: impl Into<String>) -> Self {
        Self::Exists(attribute.into())
    }

    pub fn not_exists(attribute: impl Into<String>) -> Self {
        Self::NotExists(attribute.into())
    }

    pub fn and(self, other: Condition) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Condition) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// Folds the conditions with AND. Returns `None` for an empty input.
    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Option<Self> {
        conditions.into_iter().reduce(Self::and)
    }

    /// Attribute names referenced by the condition, first occurrence order.
    pub fn attributes(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_attributes(&mut names);
        names
    }

    fn collect_attributes<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Self::Compare { attribute, .. }
            | Self::Between { attribute, .. }
            | Self::BeginsWith { attribute, .. }
            | Self::Contains { attribute, .. }
            | Self::In { attribute, .. }
            | Self::Exists(attribute)
            | Self::NotExists(attribute) => {
                if !names.contains(&attribute.as_str()) {
                    names.push(attribute);
                }
            }
            Self::And(left, right) | Self::Or(left, right) => {
                left.collect_attributes(names);
                right.collect_attributes(names);
            }
            Self::Not(inner) => inner.collect_attributes(names),
        }
    }
}

impl BitAnd for Condition {
    type Output = Condition;

    fn bitand(self, rhs: Condition) -> Condition {
        self.and(rhs)
    }
}

impl BitOr for Condition {
    type Output = Condition;

    fn bitor(self, rhs: Condition) -> Condition {
        self.or(rhs)
    }
}

impl Not for Condition {
    type Output = Condition;

    fn not(self) -> Condition {
        Condition::Not(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_constructors_convert_values() {
        assert_eq!(
            Condition::eq("name", "Ada"),
            Condition::Compare {
                attribute: "name".to_string(),
                op: CompareOp::Eq,
                value: json!("Ada"),
            }
        );
        assert_eq!(
            Condition::between("age", 18, 65),
            Condition::Between {
                attribute: "age".to_string(),
                low: json!(18),
                high: json!(65),
            }
        );
    }

    #[test]
    fn test_operators_build_trees() {
        let condition = Condition::eq("a", 1) & (Condition::eq("b", 2) | !Condition::exists("c"));

        let expected = Condition::And(
            Box::new(Condition::eq("a", 1)),
            Box::new(Condition::Or(
                Box::new(Condition::eq("b", 2)),
                Box::new(Condition::Not(Box::new(Condition::exists("c")))),
            )),
        );
        assert_eq!(condition, expected);
    }

    #[test]
    fn test_all_folds_with_and() {
        assert_eq!(Condition::all(Vec::new()), None);

        let folded = Condition::all([Condition::eq("a", 1), Condition::eq("b", 2)]).unwrap();
        assert_eq!(folded, Condition::eq("a", 1).and(Condition::eq("b", 2)));
    }

    #[test]
    fn test_attributes_are_deduplicated_in_order() {
        let condition = Condition::eq("pk", "x")
            & Condition::gt("score", 3)
            & Condition::lt("score", 9)
            & Condition::not_exists("deleted");

        assert_eq!(condition.attributes(), vec!["pk", "score", "deleted"]);
    }

    #[test]
    fn test_operator_symbols() {
        let symbols: Vec<_> = [
            CompareOp::Eq,
            CompareOp::Ne,
            CompareOp::Lt,
            CompareOp::Le,
            CompareOp::Gt,
            CompareOp::Ge,
        ]
        .iter()
        .map(|op| op.symbol())
        .collect();

        assert_eq!(symbols, vec!["=", "<>", "<", "<=", ">", ">="]);
    }
}
