//! Storage backend implementations.
//!
//! This module provides concrete implementations of the repository traits
//! defined in `dynarepo_core::storage`. Backends are selected at compile time
//! via feature flags.
//!
//! # Feature Flags
//!
//! - `dynamodb` (default): DynamoDB backend using `aws-sdk-dynamodb`
//! - `inmemory` (default): in-memory backend backed by a `BTreeMap`
//!
//! The backends are independent of each other and can be enabled together.

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbRepository;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryRepository;
