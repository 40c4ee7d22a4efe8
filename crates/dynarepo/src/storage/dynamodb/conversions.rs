//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and
//! entities, keys and expression values. These are testable in isolation
//! without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::Value;

use dynarepo_core::entity::{Entity, KeyValue, PrimaryKey};
use dynarepo_core::storage::{RepositoryError, Result};

/// A DynamoDB item: attribute name to value.
pub type Item = HashMap<String, AttributeValue>;

/// Convert an entity to a DynamoDB item.
pub fn entity_to_item<E: Entity>(entity: &E) -> Result<Item> {
    serde_dynamo::to_item(entity).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

/// Convert a DynamoDB item to an entity.
pub fn item_to_entity<E: Entity>(item: Item) -> Result<E> {
    serde_dynamo::from_item(item).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

/// Convert a page of DynamoDB items to entities.
pub fn items_to_entities<E: Entity>(items: Vec<Item>) -> Result<Vec<E>> {
    items.into_iter().map(item_to_entity).collect()
}

/// Convert a key value to its attribute value.
pub fn key_to_attribute(key: KeyValue) -> AttributeValue {
    match key {
        KeyValue::S(s) => AttributeValue::S(s),
        KeyValue::N(n) => AttributeValue::N(n),
        KeyValue::B(bytes) => AttributeValue::B(Blob::new(bytes)),
    }
}

/// Convert an expression value to its attribute value.
pub fn json_to_attribute(value: Value) -> Result<AttributeValue> {
    serde_dynamo::to_attribute_value(value)
        .map_err(|e| RepositoryError::Serialization(e.to_string()))
}

/// Build the `Key` map addressing one item of the entity's table.
pub fn key_item<E: Entity>(key: PrimaryKey) -> Item {
    let mut item = HashMap::new();

    item.insert(E::HASH_KEY.to_string(), key_to_attribute(key.hash));
    if let (Some(range_key), Some(range)) = (E::RANGE_KEY, key.range) {
        item.insert(range_key.to_string(), key_to_attribute(range));
    }

    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Customer, Order};
    use serde_json::json;

    #[test]
    fn test_entity_to_item_uses_serde_field_names() {
        let order = Order::new("c-1", 7, "open", 12.5);

        let item = entity_to_item(&order).unwrap();

        assert_eq!(
            item.get("customer_id"),
            Some(&AttributeValue::S("c-1".to_string()))
        );
        assert_eq!(item.get("order_id"), Some(&AttributeValue::N("7".to_string())));
        assert_eq!(item.get("status"), Some(&AttributeValue::S("open".to_string())));
        assert_eq!(item.get("total"), Some(&AttributeValue::N("12.5".to_string())));
    }

    #[test]
    fn test_item_to_entity_restores_entity() {
        let customer = Customer::new("Ada", "gold");

        let item = entity_to_item(&customer).unwrap();
        let restored: Customer = item_to_entity(item).unwrap();

        assert_eq!(restored, customer);
    }

    #[test]
    fn test_item_to_entity_reports_missing_fields() {
        let mut item = Item::new();
        item.insert("customer_id".to_string(), AttributeValue::S("c-1".to_string()));

        let result: Result<Order> = item_to_entity(item);

        assert!(matches!(result, Err(RepositoryError::Serialization(_))));
    }

    #[test]
    fn test_key_to_attribute() {
        assert_eq!(
            key_to_attribute(KeyValue::from("abc")),
            AttributeValue::S("abc".to_string())
        );
        assert_eq!(
            key_to_attribute(KeyValue::from(5u32)),
            AttributeValue::N("5".to_string())
        );
        assert_eq!(
            key_to_attribute(KeyValue::from(vec![1u8, 2])),
            AttributeValue::B(Blob::new(vec![1u8, 2]))
        );
    }

    #[test]
    fn test_json_to_attribute() {
        assert_eq!(
            json_to_attribute(json!("open")).unwrap(),
            AttributeValue::S("open".to_string())
        );
        assert_eq!(
            json_to_attribute(json!(100)).unwrap(),
            AttributeValue::N("100".to_string())
        );
        assert_eq!(json_to_attribute(json!(true)).unwrap(), AttributeValue::Bool(true));
    }

    #[test]
    fn test_key_item_for_composite_table() {
        let key = PrimaryKey::new::<Order>("c-1".into(), Some(7u64.into())).unwrap();

        let item = key_item::<Order>(key);

        assert_eq!(item.len(), 2);
        assert_eq!(
            item.get("customer_id"),
            Some(&AttributeValue::S("c-1".to_string()))
        );
        assert_eq!(item.get("order_id"), Some(&AttributeValue::N("7".to_string())));
    }

    #[test]
    fn test_key_item_for_hash_only_table() {
        let customer = Customer::new("Ada", "gold");
        let key = PrimaryKey::of(&customer).unwrap();

        let item = key_item::<Customer>(key);

        assert_eq!(item.len(), 1);
        assert_eq!(
            item.get("id"),
            Some(&AttributeValue::S(customer.id.to_string()))
        );
    }
}
