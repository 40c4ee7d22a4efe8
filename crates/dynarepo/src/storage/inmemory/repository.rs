//! In-memory repository implementation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use dynarepo_core::entity::{Entity, KeyValue, PrimaryKey};
use dynarepo_core::expression::{validate_filter, Condition};
use dynarepo_core::storage::{Repository, RepositoryError, Result};

/// In-memory storage backend for one entity type.
///
/// Entities are keyed by their full primary key, so `get` returns them in key
/// order. Key layout rules match the DynamoDB backend: hash-only lookups on a
/// composite-key table fail with `InvalidKey`. Data is not persisted and is
/// lost when the last clone is dropped.
pub struct InMemoryRepository<E> {
    items: Arc<RwLock<BTreeMap<PrimaryKey, E>>>,
}

impl<E> Clone for InMemoryRepository<E> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<E> fmt::Debug for InMemoryRepository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryRepository").finish_non_exhaustive()
    }
}

impl<E: Entity + Clone> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity + Clone> InMemoryRepository<E> {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Number of stored entities.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Gets an entity by hash and range key.
    pub async fn get_by_id_and_range(&self, id: E::Key, range: KeyValue) -> Result<Option<E>> {
        let key = PrimaryKey::new::<E>(id.into(), Some(range))?;
        Ok(self.items.read().await.get(&key).cloned())
    }

    /// Deletes the entity with the given hash and range key.
    pub async fn delete_by_id_and_range(&self, id: E::Key, range: KeyValue) -> Result<()> {
        let key = PrimaryKey::new::<E>(id.into(), Some(range))?;
        self.items.write().await.remove(&key);
        Ok(())
    }

    async fn put(&self, entity: E) -> Result<E> {
        let key = PrimaryKey::of(&entity)?;
        self.items.write().await.insert(key, entity.clone());
        Ok(entity)
    }
}

#[async_trait]
impl<E: Entity + Clone> Repository<E> for InMemoryRepository<E> {
    async fn add(&self, entity: E) -> Result<E> {
        self.put(entity).await
    }

    async fn update(&self, entity: E) -> Result<E> {
        self.put(entity).await
    }

    async fn delete(&self, entity: &E) -> Result<()> {
        let key = PrimaryKey::of(entity)?;
        self.items.write().await.remove(&key);
        Ok(())
    }

    async fn delete_by_id(&self, id: E::Key) -> Result<()> {
        let key = PrimaryKey::new::<E>(id.into(), None)?;
        self.items.write().await.remove(&key);
        Ok(())
    }

    async fn get(&self) -> Result<Vec<E>> {
        Ok(self.items.read().await.values().cloned().collect())
    }

    async fn get_by_id(&self, id: E::Key) -> Result<Option<E>> {
        let key = PrimaryKey::new::<E>(id.into(), None)?;
        Ok(self.items.read().await.get(&key).cloned())
    }

    async fn find(&self, predicate: Condition) -> Result<Vec<E>> {
        validate_filter(&predicate)?;

        let items = self.items.read().await;
        let mut found = Vec::new();
        for entity in items.values() {
            let value = serde_json::to_value(entity)
                .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
            if predicate.matches(&value) {
                found.push(entity.clone());
            }
        }
        Ok(found)
    }
}
