//! C code generation for the cinder syntax tree.
//!
//! Walks a [`cinder_syntax::Module`] once, in document order, and writes C
//! text to any [`std::fmt::Write`] sink. Anything outside the translated
//! subset aborts with a [`TranslationError`] carrying the source position.
//!
//! ```ignore
//! use cinder_syntax::read_python;
//!
//! let module = read_python("x: int = 5")?;
//! assert_eq!(cinder_emit::translate_to_string(&module)?, "int x = 5;\n");
//! ```

pub mod annotation;
pub mod context;
mod dispatch;
mod emit;
pub mod error;
pub mod ops;
mod writer;

pub use annotation::Annotation;
pub use context::Context;
pub use error::{Result, TranslationError};
pub use writer::{CWriter, EmitOptions, translate, translate_to_string};
