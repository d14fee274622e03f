//! Errors raised while producing a syntax tree.

/// Error that can occur when reading source code (or a serialized tree)
/// into a [`Module`](crate::Module).
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("syntax error at line {line}, column {column}")]
    Syntax { line: u32, column: u32 },

    #[error("invalid literal `{text}` at line {line}")]
    InvalidLiteral { text: String, line: u32 },

    #[error("malformed syntax tree: {0}")]
    Malformed(String),

    #[error("invalid syntax tree JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parser unavailable: {0}")]
    Parser(String),
}
