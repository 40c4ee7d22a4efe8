use serde::de::DeserializeOwned;
use serde::Serialize;

use super::KeyValue;

/// A record stored in a single table.
///
/// The table layout is declared with associated constants and the key values
/// are read from the entity itself. Serialization goes through serde, so the
/// attribute names stored in the table are the serde field names; `HASH_KEY`
/// and `RANGE_KEY` must name serialized fields.
///
/// ```
/// use dynarepo_core::entity::{Entity, KeyValue};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Serialize, Deserialize)]
/// struct Order {
///     customer_id: String,
///     order_id: u64,
///     total: f64,
/// }
///
/// impl Entity for Order {
///     type Key = String;
///     const TABLE: &'static str = "orders";
///     const HASH_KEY: &'static str = "customer_id";
///     const RANGE_KEY: Option<&'static str> = Some("order_id");
///
///     fn id(&self) -> String {
///         self.customer_id.clone()
///     }
///
///     fn range_key(&self) -> Option<KeyValue> {
///         Some(self.order_id.into())
///     }
/// }
/// ```
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Type of the hash (partition) key.
    type Key: Into<KeyValue> + Clone + Send + Sync;

    /// Unprefixed table name.
    const TABLE: &'static str;

    /// Attribute holding the hash key.
    const HASH_KEY: &'static str;

    /// Attribute holding the range (sort) key, for composite-key tables.
    const RANGE_KEY: Option<&'static str> = None;

    /// The entity's hash key value.
    fn id(&self) -> Self::Key;

    /// The entity's range key value. Must be `Some` when `RANGE_KEY` is set.
    fn range_key(&self) -> Option<KeyValue> {
        None
    }

    /// Whether the table uses a hash + range primary key.
    fn is_composite() -> bool {
        Self::RANGE_KEY.is_some()
    }
}
