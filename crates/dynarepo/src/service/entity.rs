use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use dynarepo_core::entity::Entity;
use dynarepo_core::expression::Condition;
use dynarepo_core::storage::{Repository, Result};

/// Generic service over any [`Repository`].
///
/// Every call is forwarded unchanged to the wrapped repository.
///
/// # Type Parameters
///
/// * `E` - The entity type
/// * `R` - The underlying repository implementation
pub struct EntityService<E, R> {
    repository: Arc<R>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, R> Clone for EntityService<E, R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            _entity: PhantomData,
        }
    }
}

impl<E, R> EntityService<E, R>
where
    E: Entity,
    R: Repository<E>,
{
    /// Creates a service over a shared repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            _entity: PhantomData,
        }
    }

    /// The wrapped repository.
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }
}

#[async_trait]
impl<E, R> Repository<E> for EntityService<E, R>
where
    E: Entity,
    R: Repository<E> + 'static,
{
    async fn add(&self, entity: E) -> Result<E> {
        tracing::trace!(table = E::TABLE, "add");
        self.repository.add(entity).await
    }

    async fn update(&self, entity: E) -> Result<E> {
        tracing::trace!(table = E::TABLE, "update");
        self.repository.update(entity).await
    }

    async fn delete(&self, entity: &E) -> Result<()> {
        tracing::trace!(table = E::TABLE, "delete");
        self.repository.delete(entity).await
    }

    async fn delete_by_id(&self, id: E::Key) -> Result<()> {
        tracing::trace!(table = E::TABLE, "delete_by_id");
        self.repository.delete_by_id(id).await
    }

    async fn get(&self) -> Result<Vec<E>> {
        tracing::trace!(table = E::TABLE, "get");
        self.repository.get().await
    }

    async fn get_by_id(&self, id: E::Key) -> Result<Option<E>> {
        tracing::trace!(table = E::TABLE, "get_by_id");
        self.repository.get_by_id(id).await
    }

    async fn find(&self, predicate: Condition) -> Result<Vec<E>> {
        tracing::trace!(table = E::TABLE, "find");
        self.repository.find(predicate).await
    }
}

#[cfg(all(test, feature = "inmemory"))]
mod tests {
    use super::*;
    use dynarepo_core::storage::RepositoryError;

    use crate::fixtures::{Customer, Order};
    use crate::storage::inmemory::InMemoryRepository;

    fn service<E: Entity + Clone>() -> EntityService<E, InMemoryRepository<E>> {
        EntityService::new(Arc::new(InMemoryRepository::new()))
    }

    #[tokio::test]
    async fn test_add_is_visible_through_repository() {
        let customers = service::<Customer>();
        let customer = Customer::new("Ada", "gold");

        let stored = customers.add(customer.clone()).await.unwrap();

        assert_eq!(stored, customer);
        assert_eq!(
            customers.repository().get_by_id(customer.id).await.unwrap(),
            Some(customer)
        );
    }

    #[tokio::test]
    async fn test_update_get_and_delete() {
        let customers = service::<Customer>();
        let mut customer = customers.add(Customer::new("Grace", "silver")).await.unwrap();

        customer.tier = "gold".to_string();
        customers.update(customer.clone()).await.unwrap();
        assert_eq!(customers.get().await.unwrap(), vec![customer.clone()]);

        customers.delete(&customer).await.unwrap();
        assert_eq!(customers.get_by_id(customer.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_and_delete_by_id() {
        let customers = service::<Customer>();
        let ada = customers.add(Customer::new("Ada", "gold")).await.unwrap();
        customers.add(Customer::new("Alan", "bronze")).await.unwrap();

        let gold = customers.find(Condition::eq("tier", "gold")).await.unwrap();
        assert_eq!(gold, vec![ada.clone()]);

        customers.delete_by_id(ada.id).await.unwrap();
        assert!(customers
            .find(Condition::eq("tier", "gold"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_errors_are_forwarded() {
        let orders = service::<Order>();

        let result = orders.get_by_id("c-1".to_string()).await;

        assert!(matches!(result, Err(RepositoryError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_clones_share_repository() {
        let customers = service::<Customer>();
        let clone = customers.clone();

        clone.add(Customer::new("Ada", "gold")).await.unwrap();

        assert_eq!(customers.get().await.unwrap().len(), 1);
        assert!(Arc::ptr_eq(customers.repository(), clone.repository()));
    }
}
