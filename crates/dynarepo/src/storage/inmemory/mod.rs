//! In-memory storage backend for testing.
//!
//! This module provides an in-memory implementation of [`Repository`] that
//! stores entities in a `BTreeMap` wrapped in `Arc<RwLock<_>>`. Filters are
//! evaluated in process with [`Condition::matches`], so services can be
//! exercised without a live table.
//!
//! # Example
//!
//! ```rust,ignore
//! use dynarepo::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::<Order>::new();
//! repo.add(order).await?;
//! ```
//!
//! [`Repository`]: dynarepo_core::storage::Repository
//! [`Condition::matches`]: dynarepo_core::expression::Condition::matches

mod repository;

pub use repository::InMemoryRepository;
