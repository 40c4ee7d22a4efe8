//! Generic repository and service facades over DynamoDB.
//!
//! An [`Entity`] declares its table and key layout. A repository maps
//! entity-typed CRUD, scan and query calls onto a [`storage::dynamodb::DynamoClient`];
//! the services in [`service`] wrap a repository and forward every call.
//!
//! # Feature Flags
//!
//! - `dynamodb` (default): DynamoDB backend using `aws-sdk-dynamodb`
//! - `inmemory` (default): in-memory backend for tests and local development
//!
//! # Example
//!
//! ```rust,ignore
//! use dynarepo::prelude::*;
//!
//! let client = DynamoClient::from_env().await;
//! let orders = DynamoDbService::new(Arc::new(DynamoDbRepository::<Order>::new(client)));
//!
//! orders.add(order).await?;
//! let recent = orders
//!     .query_composite(Condition::eq("customer_id", "c-1") & Condition::gt("order_id", 100))
//!     .descending()
//!     .limit(10)
//!     .exec()
//!     .await?;
//! ```

#[cfg(feature = "dynamodb")]
pub mod config;
pub mod prelude;
pub mod service;
pub mod storage;

#[cfg(test)]
mod fixtures;

pub use dynarepo_core::entity::{Entity, GlobalIndex, IndexRef, KeyValue, LocalIndex, PrimaryKey};
pub use dynarepo_core::expression::{CompareOp, Condition};
pub use dynarepo_core::storage::{Repository, RepositoryError, Result};
