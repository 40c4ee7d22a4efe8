//! DynamoDB repository implementation.
//!
//! Implements [`Repository`] and [`DynamoRepository`] for any [`Entity`] by
//! delegating to a [`DynamoClient`].

use std::fmt;
use std::marker::PhantomData;

use async_trait::async_trait;

use dynarepo_core::entity::{Entity, GlobalIndex, IndexRef, KeyValue, LocalIndex};
use dynarepo_core::expression::Condition;
use dynarepo_core::storage::{Repository, Result};

use super::client::DynamoClient;
use super::request::{QueryRequest, ScanRequest};
use super::traits::DynamoRepository;

/// DynamoDB-based repository for one entity type.
pub struct DynamoDbRepository<E> {
    client: DynamoClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for DynamoDbRepository<E> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> fmt::Debug for DynamoDbRepository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamoDbRepository")
            .field("client", &self.client)
            .finish()
    }
}

impl<E: Entity> DynamoDbRepository<E> {
    /// Creates a new repository with the given client.
    pub fn new(client: DynamoClient) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }

    /// Creates a new repository from environment configuration.
    ///
    /// See [`crate::config::DynamoConfig::from_env`] for the variables read.
    pub async fn from_env() -> Self {
        Self::new(DynamoClient::from_env().await)
    }

    /// Get the resolved table name.
    pub fn table_name(&self) -> String {
        self.client.table_name::<E>()
    }
}

// ============================================================================
// Repository implementation
// ============================================================================

#[async_trait]
impl<E: Entity> Repository<E> for DynamoDbRepository<E> {
    async fn add(&self, entity: E) -> Result<E> {
        self.client.put_item(&entity).await?;
        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E> {
        self.client.put_item(&entity).await?;
        Ok(entity)
    }

    async fn delete(&self, entity: &E) -> Result<()> {
        self.client.delete_by_item(entity).await
    }

    async fn delete_by_id(&self, id: E::Key) -> Result<()> {
        self.client.delete_item::<E>(id.into(), None).await
    }

    async fn get(&self) -> Result<Vec<E>> {
        self.client.get_all::<E>().await
    }

    async fn get_by_id(&self, id: E::Key) -> Result<Option<E>> {
        self.client.get_item::<E>(id.into(), None).await
    }

    async fn find(&self, predicate: Condition) -> Result<Vec<E>> {
        self.client.from_scan::<E>(Some(predicate)).exec().await
    }
}

// ============================================================================
// DynamoRepository implementation
// ============================================================================

#[async_trait]
impl<E: Entity> DynamoRepository<E> for DynamoDbRepository<E> {
    fn db_client(&self) -> &DynamoClient {
        &self.client
    }

    async fn get_by_id_and_range(&self, id: E::Key, range: KeyValue) -> Result<Option<E>> {
        self.client.get_item::<E>(id.into(), Some(range)).await
    }

    async fn delete_by_id_and_range(&self, id: E::Key, range: KeyValue) -> Result<()> {
        self.client.delete_item::<E>(id.into(), Some(range)).await
    }

    fn scan(&self, filter: Condition) -> ScanRequest<E> {
        self.client.from_scan(Some(filter))
    }

    fn query(&self, key_condition: Condition) -> QueryRequest<E> {
        self.client.query_index(None, key_condition)
    }

    fn query_global(&self, index: &GlobalIndex, key_condition: Condition) -> QueryRequest<E> {
        self.client.query_index(Some(IndexRef::from(index)), key_condition)
    }

    fn query_local(&self, index: &LocalIndex, key_condition: Condition) -> QueryRequest<E> {
        self.client
            .query_index(Some(IndexRef::local(index, E::HASH_KEY)), key_condition)
    }

    fn query_composite(&self, key_condition: Condition) -> QueryRequest<E> {
        self.client.query_composite(key_condition)
    }
}
