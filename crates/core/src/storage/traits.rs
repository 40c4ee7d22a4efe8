use async_trait::async_trait;

use crate::entity::Entity;
use crate::expression::Condition;

use super::Result;

/// Generic CRUD repository over one entity type.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Stores a new entity, replacing any item with the same key.
    async fn add(&self, entity: E) -> Result<E>;

    /// Stores the entity, replacing any item with the same key.
    async fn update(&self, entity: E) -> Result<E>;

    /// Deletes the item addressed by the entity's own key.
    async fn delete(&self, entity: &E) -> Result<()>;

    /// Deletes the item with the given hash key.
    async fn delete_by_id(&self, id: E::Key) -> Result<()>;

    /// Gets every entity in the table.
    async fn get(&self) -> Result<Vec<E>>;

    /// Gets an entity by its hash key.
    async fn get_by_id(&self, id: E::Key) -> Result<Option<E>>;

    /// Gets every entity matching the condition.
    async fn find(&self, predicate: Condition) -> Result<Vec<E>>;
}
