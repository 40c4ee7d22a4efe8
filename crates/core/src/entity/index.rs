//! Secondary index descriptors.
//!
//! Indexes are declared as constants next to the entity they belong to:
//!
//! ```
//! use dynarepo_core::entity::{GlobalIndex, LocalIndex};
//!
//! const BY_EMAIL: GlobalIndex = GlobalIndex::new("GSI1", "email", None);
//! const BY_CREATED: LocalIndex = LocalIndex::new("LSI1", "created_at");
//! ```

/// A global secondary index: its own hash key and optional range key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalIndex {
    pub name: &'static str,
    pub hash_key: &'static str,
    pub range_key: Option<&'static str>,
}

impl GlobalIndex {
    pub const fn new(
        name: &'static str,
        hash_key: &'static str,
        range_key: Option<&'static str>,
    ) -> Self {
        Self {
            name,
            hash_key,
            range_key,
        }
    }
}

/// A local secondary index: shares the table's hash key, has its own range key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalIndex {
    pub name: &'static str,
    pub range_key: &'static str,
}

impl LocalIndex {
    pub const fn new(name: &'static str, range_key: &'static str) -> Self {
        Self { name, range_key }
    }
}

/// The index a query targets, resolved to its key attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRef {
    pub name: &'static str,
    pub hash_key: &'static str,
    pub range_key: Option<&'static str>,
}

impl IndexRef {
    /// Resolves a local index against the hash key of its table.
    pub fn local(index: &LocalIndex, table_hash_key: &'static str) -> Self {
        Self {
            name: index.name,
            hash_key: table_hash_key,
            range_key: Some(index.range_key),
        }
    }
}

impl From<&GlobalIndex> for IndexRef {
    fn from(index: &GlobalIndex) -> Self {
        Self {
            name: index.name,
            hash_key: index.hash_key,
            range_key: index.range_key,
        }
    }
}
