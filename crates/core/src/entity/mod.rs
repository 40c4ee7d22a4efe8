mod index;
mod key;
mod primary_key;
mod traits;

pub use index::{GlobalIndex, IndexRef, LocalIndex};
pub use key::KeyValue;
pub use primary_key::PrimaryKey;
pub use traits::Entity;
