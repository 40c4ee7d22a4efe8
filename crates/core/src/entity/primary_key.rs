use crate::storage::{RepositoryError, Result};

use super::{Entity, KeyValue};

/// The full primary key of one item.
///
/// Construction checks the key against the entity's table layout: a
/// composite-key table needs a range value and a hash-only table must not get
/// one. The check runs before any request is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimaryKey {
    pub hash: KeyValue,
    pub range: Option<KeyValue>,
}

impl PrimaryKey {
    pub fn new<E: Entity>(hash: KeyValue, range: Option<KeyValue>) -> Result<Self> {
        match (E::is_composite(), &range) {
            (true, None) => Err(RepositoryError::InvalidKey(format!(
                "table '{}' requires range key '{}'",
                E::TABLE,
                E::RANGE_KEY.unwrap_or_default()
            ))),
            (false, Some(range)) => Err(RepositoryError::InvalidKey(format!(
                "table '{}' has no range key, got {} value '{range}'",
                E::TABLE,
                range.type_name()
            ))),
            _ => Ok(Self { hash, range }),
        }
    }

    /// The key the entity itself is stored under.
    pub fn of<E: Entity>(entity: &E) -> Result<Self> {
        Self::new::<E>(entity.id().into(), entity.range_key())
    }
}
