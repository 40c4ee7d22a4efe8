use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use dynarepo_core::entity::{Entity, GlobalIndex, KeyValue, LocalIndex};
use dynarepo_core::expression::Condition;
use dynarepo_core::storage::{Repository, Result};

use crate::storage::dynamodb::{DynamoClient, DynamoRepository, QueryRequest, ScanRequest};

/// Service over a [`DynamoRepository`].
///
/// Forwards the generic CRUD surface and the DynamoDB-specific surface
/// (composite keys, scans, queries) to the wrapped repository.
pub struct DynamoDbService<E, R> {
    repository: Arc<R>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, R> Clone for DynamoDbService<E, R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            _entity: PhantomData,
        }
    }
}

impl<E, R> DynamoDbService<E, R>
where
    E: Entity,
    R: DynamoRepository<E>,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            _entity: PhantomData,
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }
}

#[async_trait]
impl<E, R> Repository<E> for DynamoDbService<E, R>
where
    E: Entity,
    R: DynamoRepository<E> + 'static,
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

#[async_trait]
impl<E, R> DynamoRepository<E> for DynamoDbService<E, R>
where
    E: Entity,
    R: DynamoRepository<E> + 'static,
{
    fn db_client(&self) -> &DynamoClient {
        self.repository.db_client()
    }

    async fn get_by_id_and_range(&self, id: E::Key, range: KeyValue) -> Result<Option<E>> {
        tracing::trace!(table = E::TABLE, "get_by_id_and_range");
        self.repository.get_by_id_and_range(id, range).await
    }

    async fn delete_by_id_and_range(&self, id: E::Key, range: KeyValue) -> Result<()> {
        tracing::trace!(table = E::TABLE, "delete_by_id_and_range");
        self.repository.delete_by_id_and_range(id, range).await
    }

    fn scan(&self, filter: Condition) -> ScanRequest<E> {
        self.repository.scan(filter)
    }

    fn query(&self, key_condition: Condition) -> QueryRequest<E> {
        self.repository.query(key_condition)
    }

    fn query_global(&self, index: &GlobalIndex, key_condition: Condition) -> QueryRequest<E> {
        self.repository.query_global(index, key_condition)
    }

    fn query_local(&self, index: &LocalIndex, key_condition: Condition) -> QueryRequest<E> {
        self.repository.query_local(index, key_condition)
    }

    fn query_composite(&self, key_condition: Condition) -> QueryRequest<E> {
        self.repository.query_composite(key_condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynarepo_core::storage::RepositoryError;

    use crate::fixtures::{offline_client, Order, ORDERS_BY_STATUS, ORDERS_BY_TOTAL};
    use crate::storage::dynamodb::DynamoDbRepository;

    fn orders() -> DynamoDbService<Order, DynamoDbRepository<Order>> {
        DynamoDbService::new(Arc::new(DynamoDbRepository::new(offline_client("svc-"))))
    }

    #[test]
    fn test_db_client_is_the_repository_client() {
        let service = orders();

        assert_eq!(service.db_client().table_prefix(), "svc-");
        assert_eq!(service.db_client().table_name::<Order>(), "svc-orders");
    }

    #[test]
    fn test_request_builders_are_forwarded() {
        let service = orders();

        let scan = service.scan(Condition::eq("status", "open"));
        let by_status = service.query_global(&ORDERS_BY_STATUS, Condition::eq("status", "open"));
        let by_total = service.query_local(
            &ORDERS_BY_TOTAL,
            Condition::eq("customer_id", "c-1") & Condition::gt("total", 10),
        );
        let composite = service.query_composite(
            Condition::eq("customer_id", "c-1") & Condition::le("order_id", 5),
        );

        assert_eq!(scan.table_name(), "svc-orders");
        assert_eq!(by_status.index_name(), Some("status-index"));
        assert_eq!(by_total.index_name(), Some("total-index"));
        assert!(composite.build(None).is_ok());
        assert!(service
            .query(Condition::eq("status", "open"))
            .build(None)
            .is_err());
    }

    #[tokio::test]
    async fn test_key_errors_are_forwarded() {
        let service = orders();

        let result = service.delete_by_id("c-1".to_string()).await;

        assert!(matches!(result, Err(RepositoryError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_transport_errors_are_forwarded() {
        let service = orders();

        let result = service
            .get_by_id_and_range("c-1".to_string(), 4u64.into())
            .await;

        assert!(matches!(result, Err(RepositoryError::ConnectionFailed(_))));
    }
}
