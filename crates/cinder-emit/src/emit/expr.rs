use crate::annotation::{self, Annotation};
use crate::context::Context;
use crate::error::{Result, TranslationError};
use crate::ops;
use cinder_syntax::{BinaryOp, BoolOp, CmpOp, Literal, NodeId, NodeKind, UnaryOp};
use std::fmt::Write;

/// Attribute spelling that means "address of".
const LINK_ATTR: &str = "link";

/// C text for a literal; `None` has no rendering.
fn literal_text(value: &Literal) -> Option<String> {
    match value {
        Literal::None => None,
        Literal::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        Literal::Int(n) => Some(n.to_string()),
        Literal::Float(f) => Some(format!("{f:?}")),
        Literal::Str(s) => Some(format!("\"{s}\"")),
    }
}

impl<'a, W: Write> Context<'a, W> {
    fn wrap_if<F>(&mut self, parens: bool, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if parens {
            self.write("(")?;
        }
        f(self)?;
        if parens {
            self.write(")")?;
        }
        Ok(())
    }

    pub(crate) fn emit_literal(&mut self, id: NodeId, value: &Literal) -> Result<()> {
        match literal_text(value) {
            Some(text) => self.write(&text),
            None => Err(TranslationError::NullLiteral {
                pos: self.pos_of(id),
            }),
        }
    }

    pub(crate) fn emit_bin_op(
        &mut self,
        id: NodeId,
        left: NodeId,
        op: BinaryOp,
        right: NodeId,
    ) -> Result<()> {
        let op_text = ops::binary(op).ok_or_else(|| self.unknown_operator(id, op))?;
        let parens = matches!(
            self.parent_kind(),
            Some(NodeKind::BinOp { .. } | NodeKind::BoolOp { .. } | NodeKind::UnaryOp { .. })
        );

        self.wrap_if(parens, |cx| {
            cx.emit(left)?;
            cx.write(" ")?;
            cx.write(op_text)?;
            cx.write(" ")?;
            cx.emit(right)
        })
    }

    pub(crate) fn emit_bool_op(&mut self, op: BoolOp, values: &[NodeId]) -> Result<()> {
        let op_text = ops::boolean(op);
        let parens = matches!(
            self.parent_kind(),
            Some(NodeKind::BoolOp { .. } | NodeKind::UnaryOp { .. })
        );

        self.wrap_if(parens, |cx| {
            for (i, &value) in values.iter().enumerate() {
                if i > 0 {
                    cx.write(" ")?;
                    cx.write(op_text)?;
                    cx.write(" ")?;
                }
                cx.emit(value)?;
            }
            Ok(())
        })
    }

    pub(crate) fn emit_unary_op(&mut self, op: UnaryOp, operand: NodeId) -> Result<()> {
        self.write(ops::unary(op))?;
        self.emit(operand)
    }

    /// `a < b < c` is transcribed operator by operator.
    pub(crate) fn emit_compare(
        &mut self,
        id: NodeId,
        left: NodeId,
        operators: &[CmpOp],
        comparators: &[NodeId],
    ) -> Result<()> {
        let mut texts = Vec::with_capacity(operators.len());
        for &op in operators {
            texts.push(ops::compare(op).ok_or_else(|| self.unknown_operator(id, op))?);
        }
        let parens = matches!(
            self.parent_kind(),
            Some(NodeKind::BinOp { .. } | NodeKind::UnaryOp { .. })
        );

        self.wrap_if(parens, |cx| {
            cx.emit(left)?;
            for (op_text, &right) in texts.into_iter().zip(comparators) {
                cx.write(" ")?;
                cx.write(op_text)?;
                cx.write(" ")?;
                cx.emit(right)?;
            }
            Ok(())
        })
    }

    pub(crate) fn emit_call(&mut self, func: NodeId, args: &[NodeId]) -> Result<()> {
        self.emit(func)?;
        self.write("(")?;
        for (i, &arg) in args.iter().enumerate() {
            if i > 0 {
                self.write(", ")?;
            }
            self.emit(arg)?;
        }
        self.write(")")
    }

    pub(crate) fn emit_if_exp(&mut self, test: NodeId, body: NodeId, orelse: NodeId) -> Result<()> {
        let parens = matches!(
            self.parent_kind(),
            Some(NodeKind::Call { .. } | NodeKind::BoolOp { .. })
        );

        self.wrap_if(parens, |cx| {
            cx.write("(")?;
            cx.emit(test)?;
            cx.write(") ? ")?;
            cx.emit(body)?;
            cx.write(" : ")?;
            cx.emit(orelse)
        })
    }

    pub(crate) fn emit_attribute(&mut self, id: NodeId, value: NodeId, attr: &str) -> Result<()> {
        if attr != LINK_ATTR {
            return Err(self.unknown_node(id, format!("Attribute .{attr}")));
        }
        self.write("&")?;
        self.emit(value)
    }

    /// Only valid as the value of a constant declaration, where it becomes
    /// a function-like macro.
    pub(crate) fn emit_lambda(&mut self, id: NodeId, params: &[String], body: NodeId) -> Result<()> {
        if !self.under_const_declaration()? {
            return Err(self.unknown_node(id, "Lambda outside a constant declaration"));
        }
        self.write("(")?;
        self.write(&params.join(","))?;
        self.write(") ")?;
        self.emit(body)
    }

    fn under_const_declaration(&self) -> Result<bool> {
        let Some(parent) = self.parent_id() else {
            return Ok(false);
        };
        let NodeKind::AnnAssign { annotation, .. } = self.module.kind(parent) else {
            return Ok(false);
        };
        let resolved = annotation::resolve(self.module, Some(*annotation), self.pos_of(parent))?;
        Ok(resolved == Annotation::Const)
    }

    pub(crate) fn emit_subscript(&mut self, value: NodeId, slice: NodeId) -> Result<()> {
        self.emit(value)?;
        self.write("[")?;
        self.emit(slice)?;
        self.write("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_text() {
        assert_eq!(literal_text(&Literal::Bool(true)).as_deref(), Some("1"));
        assert_eq!(literal_text(&Literal::Bool(false)).as_deref(), Some("0"));
        assert_eq!(literal_text(&Literal::Int(42)).as_deref(), Some("42"));
        assert_eq!(literal_text(&Literal::Int(-7)).as_deref(), Some("-7"));
        assert_eq!(literal_text(&Literal::Float(3.14)).as_deref(), Some("3.14"));
        assert_eq!(literal_text(&Literal::Float(2.0)).as_deref(), Some("2.0"));
        assert_eq!(
            literal_text(&Literal::Str("hi".into())).as_deref(),
            Some("\"hi\"")
        );
        assert_eq!(literal_text(&Literal::None), None);
    }
}
