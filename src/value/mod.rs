//! In-memory value model: everything the codec can convert.

pub mod custom;
pub mod num_array;
pub mod ordered_map;
pub mod types;

pub use custom::{CustomObject, CustomValue};
pub use num_array::NumArray;
pub use ordered_map::OrderedMap;
pub use types::Value;
