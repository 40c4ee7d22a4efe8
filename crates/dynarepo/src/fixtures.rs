//! Entities and clients shared by the unit tests.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dynarepo_core::entity::{Entity, GlobalIndex, KeyValue, LocalIndex};

/// Hash-key-only entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub tier: String,
}

impl Customer {
    pub fn new(name: &str, tier: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            tier: tier.to_string(),
        }
    }
}

impl Entity for Customer {
    type Key = Uuid;
    const TABLE: &'static str = "customers";
    const HASH_KEY: &'static str = "id";

    fn id(&self) -> Uuid {
        self.id
    }
}

pub const CUSTOMERS_BY_EMAIL: GlobalIndex = GlobalIndex::new("email-index", "email", None);

/// Composite-key entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub customer_id: String,
    pub order_id: u64,
    pub status: String,
    pub total: f64,
}

impl Order {
    pub fn new(customer_id: &str, order_id: u64, status: &str, total: f64) -> Self {
        Self {
            customer_id: customer_id.to_string(),
            order_id,
            status: status.to_string(),
            total,
        }
    }
}

impl Entity for Order {
    type Key = String;
    const TABLE: &'static str = "orders";
    const HASH_KEY: &'static str = "customer_id";
    const RANGE_KEY: Option<&'static str> = Some("order_id");

    fn id(&self) -> String {
        self.customer_id.clone()
    }

    fn range_key(&self) -> Option<KeyValue> {
        Some(self.order_id.into())
    }
}

pub const ORDERS_BY_STATUS: GlobalIndex =
    GlobalIndex::new("status-index", "status", Some("total"));
pub const ORDERS_BY_TOTAL: LocalIndex = LocalIndex::new("total-index", "total");

/// A DynamoDB client that never reaches a real endpoint.
///
/// Building requests works as usual; sending one fails fast with a dispatch
/// error since nothing listens on the endpoint and retries are disabled.
#[cfg(feature = "dynamodb")]
pub fn offline_client(table_prefix: &str) -> crate::storage::dynamodb::DynamoClient {
    use aws_sdk_dynamodb::config::retry::RetryConfig;
    use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};

    let config = aws_sdk_dynamodb::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new("test", "test", None, None, "fixtures"))
        .endpoint_url("http://127.0.0.1:1")
        .retry_config(RetryConfig::disabled())
        .build();

    crate::storage::dynamodb::DynamoClient::new(
        aws_sdk_dynamodb::Client::from_conf(config),
        table_prefix,
    )
}
