//! Service facades over repositories.
//!
//! A service wraps a shared repository and forwards every call to it, giving
//! application code a stable seam to extend. Two execution models are offered:
//!
//! - [`EntityService`] and [`DynamoDbService`]: async, forwarding to the
//!   repository's futures.
//! - [`BlockingService`]: synchronous counterparts of the same calls, driven
//!   by an owned current-thread runtime.
//!
//! # Example
//!
//! ```rust,ignore
//! use dynarepo::prelude::*;
//!
//! let repo = Arc::new(InMemoryRepository::<Customer>::new());
//! let customers = EntityService::new(repo);
//! customers.add(customer).await?;
//!
//! let blocking = BlockingService::new(customers)?;
//! let all = blocking.get()?;
//! ```

mod blocking;
#[cfg(feature = "dynamodb")]
mod dynamodb;
mod entity;

pub use blocking::BlockingService;
#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbService;
pub use entity::EntityService;
