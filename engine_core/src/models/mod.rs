//! Record model shared by every engine

pub mod ordered;
pub mod record;
pub mod value;

pub use ordered::OrderedMap;
pub use record::{field_text, Record};
pub use value::{stringify_json, Value};
