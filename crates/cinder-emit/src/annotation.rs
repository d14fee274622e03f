//! Annotation resolution for declarations, parameters and return types.

use crate::error::{Result, TranslationError};
use cinder_syntax::{Literal, Module, NodeId, NodeKind, Position};

/// Marker annotation that turns a declaration into a `#define`.
pub const CONST_MARKER: &str = "const";

/// What an annotation node means for the emitted declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    /// No annotation at all.
    Void,
    /// The compile-time constant marker.
    Const,
    /// A type name, copied verbatim.
    Type(String),
    /// A literal used as an annotation, rendered as its value.
    Literal(String),
}

impl Annotation {
    /// C text for the annotation; `untyped` stands in for [`Annotation::Void`].
    pub fn render<'a>(&'a self, untyped: &'a str) -> &'a str {
        match self {
            Self::Void => untyped,
            Self::Const => CONST_MARKER,
            Self::Type(text) | Self::Literal(text) => text,
        }
    }
}

/// Resolve an optional annotation node. `fallback` locates errors on nodes
/// that carry no position of their own.
pub fn resolve(
    module: &Module,
    annotation: Option<NodeId>,
    fallback: Option<Position>,
) -> Result<Annotation> {
    let Some(id) = annotation else {
        return Ok(Annotation::Void);
    };
    let pos = module.pos(id).or(fallback);

    let resolved = match module.kind(id) {
        NodeKind::Name { id: name } if name == CONST_MARKER => Annotation::Const,
        NodeKind::Name { id: name } => Annotation::Type(name.clone()),
        NodeKind::Constant { value } => match value {
            Literal::None => return Err(TranslationError::NullLiteral { pos }),
            Literal::Str(text) if text == CONST_MARKER => Annotation::Const,
            Literal::Str(text) => Annotation::Type(text.clone()),
            Literal::Bool(b) => Annotation::Literal(if *b { "1" } else { "0" }.to_string()),
            Literal::Int(n) => Annotation::Literal(n.to_string()),
            Literal::Float(f) => Annotation::Literal(format!("{f:?}")),
        },
        other => {
            return Err(TranslationError::InvalidAnnotation {
                name: other.name().to_string(),
                pos,
            });
        }
    };

    match &resolved {
        Annotation::Type(text) if text.trim().is_empty() => {
            Err(TranslationError::InvalidAnnotation {
                name: "empty annotation".to_string(),
                pos,
            })
        }
        _ => Ok(resolved),
    }
}
