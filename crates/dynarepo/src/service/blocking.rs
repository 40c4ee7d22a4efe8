use std::fmt;
use std::marker::PhantomData;

use tokio::runtime::{Builder, Runtime};

use dynarepo_core::entity::Entity;
use dynarepo_core::expression::Condition;
use dynarepo_core::storage::{Repository, RepositoryError, Result};

#[cfg(feature = "dynamodb")]
use dynarepo_core::entity::{GlobalIndex, KeyValue, LocalIndex};

#[cfg(feature = "dynamodb")]
use crate::storage::dynamodb::{DynamoClient, DynamoRepository, QueryRequest, ScanRequest};

/// Synchronous facade over an async service or repository.
///
/// Owns a current-thread runtime and blocks on the wrapped call. Methods must
/// not be called from within an async runtime, since blocking there panics.
pub struct BlockingService<E, S> {
    service: S,
    runtime: Runtime,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S: fmt::Debug> fmt::Debug for BlockingService<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingService")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl<E, S> BlockingService<E, S>
where
    E: Entity,
    S: Repository<E>,
{
    /// Wraps a service, starting the runtime that drives it.
    pub fn new(service: S) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| RepositoryError::Runtime(e.to_string()))?;

        Ok(Self {
            service,
            runtime,
            _entity: PhantomData,
        })
    }

    /// The wrapped async service.
    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn add(&self, entity: E) -> Result<E> {
        self.runtime.block_on(self.service.add(entity))
    }

    pub fn update(&self, entity: E) -> Result<E> {
        self.runtime.block_on(self.service.update(entity))
    }

    pub fn delete(&self, entity: &E) -> Result<()> {
        self.runtime.block_on(self.service.delete(entity))
    }

    pub fn delete_by_id(&self, id: E::Key) -> Result<()> {
        self.runtime.block_on(self.service.delete_by_id(id))
    }

    pub fn get(&self) -> Result<Vec<E>> {
        self.runtime.block_on(self.service.get())
    }

    pub fn get_by_id(&self, id: E::Key) -> Result<Option<E>> {
        self.runtime.block_on(self.service.get_by_id(id))
    }

    pub fn find(&self, predicate: Condition) -> Result<Vec<E>> {
        self.runtime.block_on(self.service.find(predicate))
    }
}

#[cfg(feature = "dynamodb")]
impl<E, S> BlockingService<E, S>
where
    E: Entity,
    S: DynamoRepository<E>,
{
    pub fn db_client(&self) -> &DynamoClient {
        self.service.db_client()
    }

    pub fn get_by_id_and_range(&self, id: E::Key, range: KeyValue) -> Result<Option<E>> {
        self.runtime
            .block_on(self.service.get_by_id_and_range(id, range))
    }

    pub fn delete_by_id_and_range(&self, id: E::Key, range: KeyValue) -> Result<()> {
        self.runtime
            .block_on(self.service.delete_by_id_and_range(id, range))
    }

    /// Builds a scan. Run it with [`BlockingService::exec_scan`].
    pub fn scan(&self, filter: Condition) -> ScanRequest<E> {
        self.service.scan(filter)
    }

    /// Builds a primary-key query. Run it with [`BlockingService::exec_query`].
    pub fn query(&self, key_condition: Condition) -> QueryRequest<E> {
        self.service.query(key_condition)
    }

    pub fn query_global(&self, index: &GlobalIndex, key_condition: Condition) -> QueryRequest<E> {
        self.service.query_global(index, key_condition)
    }

    pub fn query_local(&self, index: &LocalIndex, key_condition: Condition) -> QueryRequest<E> {
        self.service.query_local(index, key_condition)
    }

    pub fn query_composite(&self, key_condition: Condition) -> QueryRequest<E> {
        self.service.query_composite(key_condition)
    }

    pub fn exec_scan(&self, request: &ScanRequest<E>) -> Result<Vec<E>> {
        self.runtime.block_on(request.exec())
    }

    pub fn exec_query(&self, request: &QueryRequest<E>) -> Result<Vec<E>> {
        self.runtime.block_on(request.exec())
    }
}
