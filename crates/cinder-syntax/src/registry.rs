//! Lookup of the built-in readers.

use crate::traits::Reader;

fn builtin() -> Vec<&'static dyn Reader> {
    let mut readers: Vec<&'static dyn Reader> = vec![&crate::input::json::JSON_READER];
    #[cfg(feature = "read-python")]
    {
        readers.push(&crate::input::python::PYTHON_READER);
    }
    readers
}

/// Get a reader by language name.
pub fn reader_for_language(lang: &str) -> Option<&'static dyn Reader> {
    builtin().into_iter().find(|r| r.language() == lang)
}

/// Get a reader by file extension.
pub fn reader_for_extension(ext: &str) -> Option<&'static dyn Reader> {
    builtin()
        .into_iter()
        .find(|r| r.extensions().contains(&ext))
}

/// All readers compiled into this build.
pub fn readers() -> Vec<&'static dyn Reader> {
    builtin()
}
