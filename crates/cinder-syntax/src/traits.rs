//! Reader trait shared by every syntax-tree producer.

use crate::ast::Module;
use crate::error::ReadError;

/// A reader turns source text into a syntax tree.
pub trait Reader: Send + Sync {
    /// Language identifier (e.g., "python", "json").
    fn language(&self) -> &'static str;

    /// File extensions this reader handles (e.g., &["py"]).
    fn extensions(&self) -> &'static [&'static str];

    /// Parse source text into a [`Module`].
    fn read(&self, source: &str) -> Result<Module, ReadError>;
}
