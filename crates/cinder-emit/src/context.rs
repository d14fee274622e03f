//! Emission context: the output sink plus the traversal state threaded
//! through every emission routine.

use crate::error::{Result, TranslationError};
use crate::writer::EmitOptions;
use cinder_syntax::{Module, NodeId, NodeKind, Position};
use std::collections::HashSet;
use std::fmt::Write;

/// State for one translation of one [`Module`].
///
/// Create a fresh context per translation. The ancestor and loop stacks
/// are not meant to be shared between concurrent runs.
pub struct Context<'a, W> {
    pub(crate) module: &'a Module,
    pub(crate) options: &'a EmitOptions,
    out: W,
    level: usize,
    /// Nodes currently being emitted, innermost last.
    pub(crate) ancestors: Vec<NodeId>,
    /// One entry per enclosing loop: does it have an `else` clause?
    pub(crate) loop_else: Vec<bool>,
    /// Nodes already emitted or consumed by their parent.
    pub(crate) visited: HashSet<NodeId>,
    pub(crate) last_pos: Option<Position>,
}

impl<'a, W: Write> Context<'a, W> {
    pub fn new(module: &'a Module, options: &'a EmitOptions, out: W) -> Self {
        Self {
            module,
            options,
            out,
            level: 0,
            ancestors: Vec::new(),
            loop_else: Vec::new(),
            visited: HashSet::new(),
            last_pos: None,
        }
    }

    /// Current indentation depth.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Hand back the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    pub(crate) fn write(&mut self, text: &str) -> Result<()> {
        self.out.write_str(text)?;
        Ok(())
    }

    pub(crate) fn write_indent(&mut self) -> Result<()> {
        for _ in 0..self.level {
            self.out.write_str(&self.options.indent)?;
        }
        Ok(())
    }

    /// Run `f` one level deeper. The level is restored whether or not `f`
    /// succeeds.
    pub(crate) fn indented<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.level += 1;
        let result = f(self);
        self.level -= 1;
        result
    }

    /// Kind of the syntactic parent of the node being emitted.
    pub(crate) fn parent_kind(&self) -> Option<&'a NodeKind> {
        let module = self.module;
        let len = self.ancestors.len();
        if len < 2 {
            return None;
        }
        Some(module.kind(self.ancestors[len - 2]))
    }

    pub(crate) fn parent_id(&self) -> Option<NodeId> {
        let len = self.ancestors.len();
        (len >= 2).then(|| self.ancestors[len - 2])
    }

    /// Position for diagnostics on `id`, falling back to the last node that
    /// had one.
    pub(crate) fn pos_of(&self, id: NodeId) -> Option<Position> {
        self.module.pos(id).or(self.last_pos)
    }

    pub(crate) fn unknown_node(&self, id: NodeId, name: impl Into<String>) -> TranslationError {
        TranslationError::UnknownNode {
            name: name.into(),
            pos: self.pos_of(id),
        }
    }

    pub(crate) fn unknown_operator(&self, id: NodeId, op: impl std::fmt::Debug) -> TranslationError {
        TranslationError::UnknownOperator {
            op: format!("{op:?}"),
            pos: self.pos_of(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_syntax::ModuleBuilder;

    #[test]
    fn test_indented_restores_level_on_error() {
        let module = ModuleBuilder::new().finish(vec![]);
        let options = EmitOptions::default();
        let mut cx = Context::new(&module, &options, String::new());

        let result = cx.indented(|cx| {
            assert_eq!(cx.level(), 1);
            cx.indented(|_| Err(TranslationError::NullLiteral { pos: None }))
        });

        assert!(result.is_err());
        assert_eq!(cx.level(), 0);
    }

    #[test]
    fn test_indent_unit_is_configurable() {
        let module = ModuleBuilder::new().finish(vec![]);
        let options = EmitOptions {
            indent: "\t".into(),
            ..EmitOptions::default()
        };
        let mut cx = Context::new(&module, &options, String::new());
        cx.indented(|cx| cx.indented(|cx| cx.write_indent())).unwrap();
        assert_eq!(cx.into_inner(), "\t\t");
    }
}
