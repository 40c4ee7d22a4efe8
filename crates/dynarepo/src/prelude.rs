//! Common imports for working with repositories and services.

pub use std::sync::Arc;

pub use crate::service::{BlockingService, EntityService};
pub use crate::{Condition, Entity, GlobalIndex, KeyValue, LocalIndex, Repository, RepositoryError};

#[cfg(feature = "dynamodb")]
pub use crate::config::DynamoConfig;
#[cfg(feature = "dynamodb")]
pub use crate::service::DynamoDbService;
#[cfg(feature = "dynamodb")]
pub use crate::storage::dynamodb::{
    DynamoClient, DynamoDbRepository, DynamoRepository, QueryRequest, ScanRequest,
};

#[cfg(feature = "inmemory")]
pub use crate::storage::inmemory::InMemoryRepository;
