//! Entry points: translate a whole module into C text.

use crate::context::Context;
use crate::error::Result;
use cinder_syntax::Module;
use std::fmt::Write;
use tracing::debug;

/// Formatting knobs the emitter accepts from its caller.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitOptions {
    /// One level of indentation.
    pub indent: String,
    /// Type written where a parameter or return type has no annotation.
    pub untyped: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            untyped: "void".to_string(),
        }
    }
}

/// C writer. Each call to [`CWriter::emit`] runs with its own [`Context`],
/// so one writer may serve many translations, including concurrent ones.
#[derive(Debug, Clone, Default)]
pub struct CWriter {
    options: EmitOptions,
}

impl CWriter {
    pub fn new(options: EmitOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EmitOptions {
        &self.options
    }

    /// File extension for output.
    pub fn extension(&self) -> &'static str {
        "c"
    }

    /// Emit `module` into `out`. On error, whatever was written before the
    /// failing node stays in `out`.
    pub fn emit<W: Write>(&self, module: &Module, out: W) -> Result<()> {
        debug!(nodes = module.len(), "translating module");
        let mut cx = Context::new(module, &self.options, out);
        cx.emit(module.root())
    }

    pub fn emit_to_string(&self, module: &Module) -> Result<String> {
        let mut out = String::new();
        self.emit(module, &mut out)?;
        Ok(out)
    }
}

/// Translate with default options.
pub fn translate(module: &Module, out: &mut impl Write) -> Result<()> {
    CWriter::default().emit(module, out)
}

/// Translate with default options into a new string.
pub fn translate_to_string(module: &Module) -> Result<String> {
    CWriter::default().emit_to_string(module)
}
