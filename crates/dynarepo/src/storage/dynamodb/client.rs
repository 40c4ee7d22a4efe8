//! The DynamoDB client every repository delegates to.

use aws_sdk_dynamodb::operation::delete_item::builders::DeleteItemFluentBuilder;
use aws_sdk_dynamodb::operation::get_item::builders::GetItemFluentBuilder;
use aws_sdk_dynamodb::operation::put_item::builders::PutItemFluentBuilder;
use aws_sdk_dynamodb::Client;

use dynarepo_core::entity::{Entity, IndexRef, KeyValue, PrimaryKey};
use dynarepo_core::expression::{
    validate_composite_key_condition, validate_key_condition, Condition,
};
use dynarepo_core::storage::Result;

use crate::config::DynamoConfig;

use super::conversions::{entity_to_item, item_to_entity, key_item};
use super::error::{map_delete_item_error, map_get_item_error, map_put_item_error};
use super::request::{QueryRequest, ScanRequest};

/// Entity-typed access to DynamoDB tables.
///
/// Wraps an SDK [`Client`] together with the table name prefix. Cloning is
/// cheap; clones share the SDK's connection pool.
#[derive(Debug, Clone)]
pub struct DynamoClient {
    client: Client,
    table_prefix: String,
}

impl DynamoClient {
    /// Creates a client from an SDK client and a table name prefix.
    pub fn new(client: Client, table_prefix: impl Into<String>) -> Self {
        Self {
            client,
            table_prefix: table_prefix.into(),
        }
    }

    /// Creates a client with the given configuration.
    pub async fn connect(config: &DynamoConfig) -> Self {
        tracing::info!(target_env = %config.target_display(), "Connecting to DynamoDB");

        let sdk_config = config.load_sdk_config().await;
        Self::new(Client::new(&sdk_config), config.table_prefix.clone())
    }

    /// Creates a client from environment configuration.
    ///
    /// See [`DynamoConfig::from_env`] for the variables read.
    pub async fn from_env() -> Self {
        Self::connect(&DynamoConfig::from_env()).await
    }

    /// The underlying SDK client, for operations this crate does not wrap.
    pub fn sdk(&self) -> &Client {
        &self.client
    }

    pub fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    /// Resolved table name of an entity type.
    pub fn table_name<E: Entity>(&self) -> String {
        format!("{}{}", self.table_prefix, E::TABLE)
    }

    // ========================================================================
    // Items
    // ========================================================================

    /// Writes the entity, replacing any item with the same key.
    pub async fn put_item<E: Entity>(&self, entity: &E) -> Result<()> {
        let table_name = self.table_name::<E>();
        let request = self.put_item_request(entity)?;

        tracing::debug!(table = %table_name, "PutItem");

        request
            .send()
            .await
            .map_err(|e| map_put_item_error(e, &table_name))?;

        Ok(())
    }

    /// Reads one item by key. `range` is required on composite-key tables.
    pub async fn get_item<E: Entity>(
        &self,
        hash: KeyValue,
        range: Option<KeyValue>,
    ) -> Result<Option<E>> {
        let table_name = self.table_name::<E>();
        let key = PrimaryKey::new::<E>(hash, range)?;

        tracing::debug!(table = %table_name, hash = %key.hash, "GetItem");

        let result = self
            .get_item_request::<E>(key)
            .send()
            .await
            .map_err(|e| map_get_item_error(e, &table_name))?;

        match result.item {
            Some(item) => Ok(Some(item_to_entity(item)?)),
            None => Ok(None),
        }
    }

    /// Deletes one item by key. Deleting a missing item is not an error.
    pub async fn delete_item<E: Entity>(&self, hash: KeyValue, range: Option<KeyValue>) -> Result<()> {
        let key = PrimaryKey::new::<E>(hash, range)?;
        self.delete_key::<E>(key).await
    }

    /// Deletes the item stored under the entity's own key.
    pub async fn delete_by_item<E: Entity>(&self, entity: &E) -> Result<()> {
        let key = PrimaryKey::of(entity)?;
        self.delete_key::<E>(key).await
    }

    /// Reads every item of the entity's table.
    pub async fn get_all<E: Entity>(&self) -> Result<Vec<E>> {
        self.from_scan::<E>(None).exec().await
    }

    async fn delete_key<E: Entity>(&self, key: PrimaryKey) -> Result<()> {
        let table_name = self.table_name::<E>();

        tracing::debug!(table = %table_name, hash = %key.hash, "DeleteItem");

        self.delete_item_request::<E>(key)
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, &table_name))?;

        Ok(())
    }

    // ========================================================================
    // Scans and queries
    // ========================================================================

    /// Starts a scan of the entity's table, optionally filtered.
    pub fn from_scan<E: Entity>(&self, filter: Option<Condition>) -> ScanRequest<E> {
        ScanRequest::new(self.clone(), filter)
    }

    /// Starts a query on the table's primary key, or on `index` when given.
    pub fn query_index<E: Entity>(
        &self,
        index: Option<IndexRef>,
        key_condition: Condition,
    ) -> QueryRequest<E> {
        let validation = match &index {
            Some(index) => validate_key_condition(&key_condition, index.hash_key, index.range_key),
            None => validate_key_condition(&key_condition, E::HASH_KEY, E::RANGE_KEY),
        };
        QueryRequest::new(self.clone(), index, key_condition, validation)
    }

    /// Starts a primary-key query that constrains both hash and range key.
    pub fn query_composite<E: Entity>(&self, key_condition: Condition) -> QueryRequest<E> {
        let validation =
            validate_composite_key_condition(&key_condition, E::HASH_KEY, E::RANGE_KEY);
        QueryRequest::new(self.clone(), None, key_condition, validation)
    }

    // ========================================================================
    // Request builders
    // ========================================================================

    fn put_item_request<E: Entity>(&self, entity: &E) -> Result<PutItemFluentBuilder> {
        // Validates that the entity carries a well-formed key.
        PrimaryKey::of(entity)?;
        let item = entity_to_item(entity)?;

        Ok(self
            .client
            .put_item()
            .table_name(self.table_name::<E>())
            .set_item(Some(item)))
    }

    fn get_item_request<E: Entity>(&self, key: PrimaryKey) -> GetItemFluentBuilder {
        self.client
            .get_item()
            .table_name(self.table_name::<E>())
            .set_key(Some(key_item::<E>(key)))
    }

    fn delete_item_request<E: Entity>(&self, key: PrimaryKey) -> DeleteItemFluentBuilder {
        self.client
            .delete_item()
            .table_name(self.table_name::<E>())
            .set_key(Some(key_item::<E>(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::types::AttributeValue;
    use dynarepo_core::storage::RepositoryError;

    use crate::fixtures::{offline_client, Customer, Order, CUSTOMERS_BY_EMAIL, ORDERS_BY_TOTAL};

    #[test]
    fn test_table_name_applies_prefix() {
        assert_eq!(offline_client("dev-").table_name::<Order>(), "dev-orders");
        assert_eq!(offline_client("").table_name::<Customer>(), "customers");
    }

    #[test]
    fn test_put_item_request_carries_serialized_entity() {
        let client = offline_client("test-");
        let order = Order::new("c-1", 3, "open", 10.0);

        let request = client.put_item_request(&order).unwrap();
        let input = request.as_input();

        assert_eq!(input.get_table_name().as_deref(), Some("test-orders"));
        let item = input.get_item().as_ref().unwrap();
        assert_eq!(
            item.get("customer_id"),
            Some(&AttributeValue::S("c-1".to_string()))
        );
        assert_eq!(item.get("order_id"), Some(&AttributeValue::N("3".to_string())));
        assert_eq!(input.get_condition_expression(), &None);
    }

    #[test]
    fn test_get_item_request_uses_both_key_attributes() {
        let client = offline_client("");
        let key = PrimaryKey::new::<Order>("c-1".into(), Some(9u64.into())).unwrap();

        let request = client.get_item_request::<Order>(key);
        let key = request.as_input().get_key().as_ref().unwrap();

        assert_eq!(key.len(), 2);
        assert_eq!(key.get("order_id"), Some(&AttributeValue::N("9".to_string())));
    }

    #[test]
    fn test_delete_item_request_for_hash_only_table() {
        let client = offline_client("");
        let customer = Customer::new("Ada", "gold");
        let key = PrimaryKey::of(&customer).unwrap();

        let request = client.delete_item_request::<Customer>(key);
        let input = request.as_input();

        assert_eq!(input.get_table_name().as_deref(), Some("customers"));
        assert_eq!(
            input.get_key().as_ref().unwrap().get("id"),
            Some(&AttributeValue::S(customer.id.to_string()))
        );
    }

    #[tokio::test]
    async fn test_get_item_without_range_on_composite_table_fails_before_io() {
        let client = offline_client("");

        let result = client.get_item::<Order>("c-1".into(), None).await;

        assert!(matches!(result, Err(RepositoryError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_delete_item_with_range_on_hash_only_table_fails_before_io() {
        let client = offline_client("");

        let result = client
            .delete_item::<Customer>("id".into(), Some("extra".into()))
            .await;

        assert!(matches!(result, Err(RepositoryError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_maps_to_connection_failed() {
        let client = offline_client("");
        let customer = Customer::new("Ada", "gold");

        let result = client.put_item(&customer).await;

        assert!(matches!(result, Err(RepositoryError::ConnectionFailed(_))));
    }

    #[test]
    fn test_query_index_validates_against_index_keys() {
        let client = offline_client("");

        let valid = client.query_index::<Customer>(
            Some(IndexRef::from(&CUSTOMERS_BY_EMAIL)),
            Condition::eq("email", "ada@example.com"),
        );
        let invalid = client.query_index::<Customer>(
            Some(IndexRef::from(&CUSTOMERS_BY_EMAIL)),
            Condition::eq("id", "abc"),
        );

        assert!(valid.build(None).is_ok());
        assert_eq!(valid.index_name(), Some("email-index"));
        assert!(matches!(
            invalid.build(None),
            Err(RepositoryError::InvalidExpression(_))
        ));
    }

    #[test]
    fn test_query_local_index_shares_table_hash_key() {
        let client = offline_client("");
        let index = IndexRef::local(&ORDERS_BY_TOTAL, Order::HASH_KEY);

        let request = client.query_index::<Order>(
            Some(index),
            Condition::eq("customer_id", "c-1") & Condition::ge("total", 50),
        );

        let builder = request.build(None).unwrap();
        assert_eq!(builder.as_input().get_index_name().as_deref(), Some("total-index"));
    }

    #[test]
    fn test_query_composite_requires_range_condition() {
        let client = offline_client("");

        let hash_only = client.query_composite::<Order>(Condition::eq("customer_id", "c-1"));
        let composite = client.query_composite::<Order>(
            Condition::eq("customer_id", "c-1") & Condition::between("order_id", 1, 10),
        );
        let not_composite = client.query_composite::<Customer>(Condition::eq("id", "x"));

        assert!(hash_only.build(None).is_err());
        assert!(composite.build(None).is_ok());
        assert_eq!(composite.index_name(), None);
        assert!(not_composite.build(None).is_err());
    }
}
