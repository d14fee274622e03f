//! Errors raised while emitting C.

use cinder_syntax::Position;
use std::fmt;

pub type Result<T, E = TranslationError> = std::result::Result<T, E>;

/// A translation aborts on the first of these; text already written to the
/// sink stays written.
#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("unknown node: {name}{}", at(.pos))]
    UnknownNode { name: String, pos: Option<Position> },

    #[error("unknown operator: {op}{}", at(.pos))]
    UnknownOperator { op: String, pos: Option<Position> },

    #[error("invalid annotation: {name}{}", at(.pos))]
    InvalidAnnotation { name: String, pos: Option<Position> },

    #[error("None is not allowed{}", at(.pos))]
    NullLiteral { pos: Option<Position> },

    #[error("constant `{name}` must have a value{}", at(.pos))]
    MissingInitializer { name: String, pos: Option<Position> },

    #[error("failed to write output")]
    Sink(#[from] fmt::Error),
}

fn at(pos: &Option<Position>) -> String {
    match pos {
        Some(pos) => format!(" at {pos}"),
        None => String::new(),
    }
}

impl TranslationError {
    /// Source position of the offending node, or of the closest node
    /// before it that carried one.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::UnknownNode { pos, .. }
            | Self::UnknownOperator { pos, .. }
            | Self::InvalidAnnotation { pos, .. }
            | Self::NullLiteral { pos }
            | Self::MissingInitializer { pos, .. } => *pos,
            Self::Sink(_) => None,
        }
    }

    /// The message without its position, for `file:line:column:` prefixes.
    pub fn message(&self) -> String {
        match self {
            Self::UnknownNode { name, .. } => format!("unknown node: {name}"),
            Self::UnknownOperator { op, .. } => format!("unknown operator: {op}"),
            Self::InvalidAnnotation { name, .. } => format!("invalid annotation: {name}"),
            Self::NullLiteral { .. } => "None is not allowed".to_string(),
            Self::MissingInitializer { name, .. } => {
                format!("constant `{name}` must have a value")
            }
            Self::Sink(err) => format!("failed to write output: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_with_position() {
        let err = TranslationError::UnknownNode {
            name: "set_comprehension".into(),
            pos: Some(Position::new(3, 4)),
        };
        assert_eq!(
            err.to_string(),
            "unknown node: set_comprehension at line 3, column 4"
        );
        assert_eq!(err.position(), Some(Position::new(3, 4)));
        assert_eq!(err.message(), "unknown node: set_comprehension");
    }

    #[test]
    fn test_message_without_position() {
        let err = TranslationError::NullLiteral { pos: None };
        assert_eq!(err.to_string(), "None is not allowed");
        assert_eq!(err.position(), None);
    }
}
