//! Input readers - produce a syntax tree from source text.

pub mod json;

pub use json::{JSON_READER, JsonReader};

#[cfg(feature = "read-python")]
pub mod python;

#[cfg(feature = "read-python")]
pub use python::{PYTHON_READER, PythonReader, read_python};
