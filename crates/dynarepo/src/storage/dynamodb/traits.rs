use async_trait::async_trait;

use dynarepo_core::entity::{Entity, GlobalIndex, KeyValue, LocalIndex};
use dynarepo_core::expression::Condition;
use dynarepo_core::storage::{Repository, Result};

use super::client::DynamoClient;
use super::request::{QueryRequest, ScanRequest};

/// DynamoDB-specific repository surface.
///
/// Extends [`Repository`] with composite-key access and un-executed scan and
/// query requests. Request constructors never fail; key condition errors are
/// reported when the request runs.
#[async_trait]
pub trait DynamoRepository<E: Entity>: Repository<E> {
    /// The client this repository delegates to.
    fn db_client(&self) -> &DynamoClient;

    /// Gets an entity by hash and range key.
    async fn get_by_id_and_range(&self, id: E::Key, range: KeyValue) -> Result<Option<E>>;

    /// Deletes the item with the given hash and range key.
    async fn delete_by_id_and_range(&self, id: E::Key, range: KeyValue) -> Result<()>;

    /// Scans the table with a filter.
    fn scan(&self, filter: Condition) -> ScanRequest<E>;

    /// Queries the table's primary key.
    fn query(&self, key_condition: Condition) -> QueryRequest<E>;

    /// Queries a global secondary index.
    fn query_global(&self, index: &GlobalIndex, key_condition: Condition) -> QueryRequest<E>;

    /// Queries a local secondary index.
    fn query_local(&self, index: &LocalIndex, key_condition: Condition) -> QueryRequest<E>;

    /// Queries the primary key of a composite-key table, constraining both
    /// the hash key and the range key.
    fn query_composite(&self, key_condition: Condition) -> QueryRequest<E>;
}
