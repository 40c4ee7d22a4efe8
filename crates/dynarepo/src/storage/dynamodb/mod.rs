//! DynamoDB storage backend implementation.
//!
//! [`DynamoClient`] is the client object every DynamoDB repository delegates
//! to. It owns entity/item conversion (via `serde_dynamo`), key validation,
//! request construction and SDK error mapping. [`DynamoDbRepository`] is a
//! thin typed facade over it.

mod client;
mod conversions;
mod error;
mod repository;
mod request;
mod traits;

pub use client::DynamoClient;
pub use conversions::Item;
pub use repository::DynamoDbRepository;
pub use request::{Page, QueryRequest, ScanRequest};
pub use traits::DynamoRepository;
