//! Output formats for configuration trees
//!
//! - ISC text, the inverse of parsing ([serializer], built on [isc_writer])
//! - a one-line-per-node outline ([treeviz])
//! - JSON and YAML dumps of anything serde can serialize: trees, tokens, typed models
//!
//! [registry] maps format names to implementations.

pub mod isc_writer;
pub mod registry;
pub mod serializer;
pub mod treeviz;

pub use isc_writer::IscWriter;
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use serializer::{serialize, SerializeOptions};
pub use treeviz::to_treeviz_str;

use serde::Serialize;

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, FormatError> {
    serde_json::to_string_pretty(value).map_err(|e| FormatError::SerializationError(e.to_string()))
}

pub fn to_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String, FormatError> {
    serde_yaml::to_string(value).map_err(|e| FormatError::SerializationError(e.to_string()))
}
