//! Syntax tree and readers for the cinder translator.
//!
//! `cinder-syntax` owns the data model that the C emitter walks: an arena
//! of typed nodes covering the restricted Python subset, addressed by
//! [`NodeId`]. Trees come from one of the readers:
//!
//! ```text
//! Python source ──(tree-sitter)──┐
//!                                 ├─> Module ──> cinder-emit
//! JSON tree (external parser) ────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use cinder_syntax::input::read_python;
//!
//! let module = read_python("x: int = 5")?;
//! assert_eq!(module.body().len(), 1);
//! ```

pub mod ast;
pub mod error;
pub mod input;
pub mod registry;
pub mod traits;

pub use ast::{
    BinaryOp, BoolOp, CmpOp, Literal, Module, ModuleBuilder, Node, NodeId, NodeKind, Position,
    UnaryOp,
};
pub use error::ReadError;
pub use registry::{reader_for_extension, reader_for_language, readers};
pub use traits::Reader;

#[cfg(feature = "read-python")]
pub use input::read_python;
