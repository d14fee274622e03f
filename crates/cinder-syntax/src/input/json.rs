//! Reader for syntax trees serialized by an external parser.

use crate::ast::Module;
use crate::error::ReadError;
use crate::traits::Reader;

/// Static instance of the JSON tree reader for the registry.
pub static JSON_READER: JsonReader = JsonReader;

/// Accepts the JSON produced by [`Module::to_json`].
pub struct JsonReader;

impl Reader for JsonReader {
    fn language(&self) -> &'static str {
        "json"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn read(&self, source: &str) -> Result<Module, ReadError> {
        Module::from_json(source)
    }
}
