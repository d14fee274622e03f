//! Node dispatcher: routes each node kind to its emission routine.

use crate::context::Context;
use crate::error::Result;
use cinder_syntax::{NodeId, NodeKind};
use std::fmt::Write;

impl<'a, W: Write> Context<'a, W> {
    /// Emit `id` and everything below it.
    ///
    /// A node that was already emitted, or consumed by its parent (an
    /// `elif` folded into its `if`, a docstring lifted into a comment), is
    /// skipped.
    pub fn emit(&mut self, id: NodeId) -> Result<()> {
        if !self.visited.insert(id) {
            return Ok(());
        }
        if let Some(pos) = self.module.pos(id) {
            self.last_pos = Some(pos);
        }

        self.ancestors.push(id);
        let result = self.dispatch(id);
        self.ancestors.pop();
        result
    }

    pub(crate) fn emit_opt(&mut self, id: Option<NodeId>) -> Result<()> {
        match id {
            Some(id) => self.emit(id),
            None => Ok(()),
        }
    }

    pub(crate) fn emit_each(&mut self, ids: &[NodeId]) -> Result<()> {
        for &id in ids {
            self.emit(id)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, id: NodeId) -> Result<()> {
        let module = self.module;
        match module.kind(id) {
            NodeKind::Module { body } => self.emit_each(body),

            // Statements
            NodeKind::AnnAssign {
                target,
                annotation,
                value,
            } => self.emit_declaration(id, *target, *annotation, *value),
            NodeKind::Assign { targets, value } => self.emit_assign(targets, *value),
            NodeKind::AugAssign { target, op, value } => {
                self.emit_aug_assign(id, *target, *op, *value)
            }
            NodeKind::FunctionDef {
                name,
                params,
                returns,
                body,
            } => self.emit_function(id, name, params, *returns, body),
            NodeKind::Param { name, annotation } => self.emit_param(id, name, *annotation),
            NodeKind::Return { value } => self.emit_return(*value),
            NodeKind::Delete { targets } => self.emit_delete(targets),
            NodeKind::If { test, body, orelse } => self.emit_if(*test, body, orelse),
            NodeKind::While { test, body, orelse } => self.emit_while(*test, body, orelse),
            NodeKind::Break => self.emit_break(),
            NodeKind::Continue => self.emit_continue(),
            NodeKind::Pass => Ok(()),
            NodeKind::ExprStmt { value } => self.emit_expr_stmt(*value),
            NodeKind::Import { names } => self.emit_import(names),
            NodeKind::ImportFrom { module: name, .. } => self.emit_import_from(name),

            // Expressions
            NodeKind::Constant { value } => self.emit_literal(id, value),
            NodeKind::Name { id: name } => self.write(name),
            NodeKind::BinOp { left, op, right } => self.emit_bin_op(id, *left, *op, *right),
            NodeKind::BoolOp { op, values } => self.emit_bool_op(*op, values),
            NodeKind::UnaryOp { op, operand } => self.emit_unary_op(*op, *operand),
            NodeKind::Compare {
                left,
                ops,
                comparators,
            } => self.emit_compare(id, *left, ops, comparators),
            NodeKind::Call { func, args } => self.emit_call(*func, args),
            NodeKind::IfExp { test, body, orelse } => self.emit_if_exp(*test, *body, *orelse),
            NodeKind::Attribute { value, attr } => self.emit_attribute(id, *value, attr),
            NodeKind::Lambda { params, body } => self.emit_lambda(id, params, *body),
            NodeKind::Subscript { value, slice } => self.emit_subscript(*value, *slice),

            // Representable in the tree, outside the translated subset.
            kind @ (NodeKind::Slice { .. }
            | NodeKind::Keyword { .. }
            | NodeKind::Starred { .. }
            | NodeKind::DefaultParam { .. }
            | NodeKind::Unsupported { .. }) => Err(self.unknown_node(id, kind.name())),
        }
    }
}
