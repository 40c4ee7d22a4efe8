use std::cmp::Ordering;
use std::fmt;

use uuid::Uuid;

/// The scalar value of a key attribute.
///
/// Key attributes in the store are restricted to strings, numbers and binary
/// blobs. Numbers are carried as their decimal text, the same representation
/// the wire protocol uses, so no precision is lost in transit.
///
/// Ordering follows the store's range key ordering: numbers by value, strings
/// and binary bytewise. Values of different types order `S < N < B`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyValue {
    S(String),
    N(String),
    B(Vec<u8>),
}

impl KeyValue {
    /// Builds a number key from anything that prints as a decimal.
    pub fn number(value: impl fmt::Display) -> Self {
        Self::N(value.to_string())
    }

    /// Short name of the attribute type, as used in key schemas.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::S(_) => "S",
            Self::N(_) => "N",
            Self::B(_) => "B",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::S(_) => 0,
            Self::N(_) => 1,
            Self::B(_) => 2,
        }
    }
}

impl Ord for KeyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::S(a), Self::S(b)) => a.cmp(b),
            (Self::B(a), Self::B(b)) => a.cmp(b),
            (Self::N(a), Self::N(b)) => compare_numbers(a, b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

// Integers compare exactly. Ties on value (e.g. "1" and "1.0") fall back to
// the text, reversed below zero so larger magnitudes stay first.
fn compare_numbers(a: &str, b: &str) -> Ordering {
    if let (Ok(x), Ok(y)) = (a.parse::<i128>(), b.parse::<i128>()) {
        return x.cmp(&y).then_with(|| a.cmp(b));
    }
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y).then_with(|| {
            if x.is_sign_negative() {
                b.cmp(a)
            } else {
                a.cmp(b)
            }
        }),
        _ => a.cmp(b),
    }
}

impl PartialOrd for KeyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::S(s) | Self::N(s) => f.write_str(s),
            Self::B(bytes) => {
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<String> for KeyValue {
    fn from(value: String) -> Self {
        Self::S(value)
    }
}

impl From<&str> for KeyValue {
    fn from(value: &str) -> Self {
        Self::S(value.to_string())
    }
}

impl From<&String> for KeyValue {
    fn from(value: &String) -> Self {
        Self::S(value.clone())
    }
}

impl From<Uuid> for KeyValue {
    fn from(value: Uuid) -> Self {
        Self::S(value.to_string())
    }
}

impl From<Vec<u8>> for KeyValue {
    fn from(value: Vec<u8>) -> Self {
        Self::B(value)
    }
}

macro_rules! number_key {
    ($($t:ty),*) => {
        $(
            impl From<$t> for KeyValue {
                fn from(value: $t) -> Self {
                    Self::N(value.to_string())
                }
            }
        )*
    };
}

number_key!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
