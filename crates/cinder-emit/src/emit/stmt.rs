use crate::annotation::{self, Annotation};
use crate::context::Context;
use crate::error::{Result, TranslationError};
use crate::ops;
use cinder_syntax::{BinaryOp, Literal, NodeId, NodeKind};
use std::fmt::Write;
use tracing::trace;

/// Flag introduced to emulate `while ... else`.
const SENTINEL: &str = "success";

/// Lines of a comment body: the first line as written, the rest with their
/// common leading whitespace removed.
fn comment_lines(text: &str) -> Vec<String> {
    let text = text.trim();
    let (first, rest) = text.split_once('\n').unwrap_or((text, ""));

    let mut lines = vec![first.trim_end().to_string()];
    if !rest.is_empty() {
        lines.extend(
            textwrap::dedent(rest)
                .lines()
                .map(|line| line.trim_end().to_string()),
        );
    }
    lines
}

impl<'a, W: Write> Context<'a, W> {
    pub(crate) fn emit_declaration(
        &mut self,
        id: NodeId,
        target: NodeId,
        annotation: NodeId,
        value: Option<NodeId>,
    ) -> Result<()> {
        let resolved = annotation::resolve(self.module, Some(annotation), self.pos_of(id))?;

        if resolved == Annotation::Const {
            let Some(value) = value else {
                return Err(TranslationError::MissingInitializer {
                    name: self.target_name(target),
                    pos: self.pos_of(id),
                });
            };

            self.write("#define ")?;
            self.emit(target)?;
            // A function-like macro needs its parameter list glued to the name.
            if !matches!(self.module.kind(value), NodeKind::Lambda { .. }) {
                self.write(" ")?;
            }
            self.emit(value)?;
            return self.write("\n");
        }

        let ty = resolved.render(&self.options.untyped).to_string();
        self.write_indent()?;
        self.write(&ty)?;
        self.write(" ")?;
        self.emit(target)?;
        if let Some(value) = value {
            self.write(" = ")?;
            self.emit(value)?;
        }
        self.write(";\n")
    }

    fn target_name(&self, target: NodeId) -> String {
        match self.module.kind(target) {
            NodeKind::Name { id } => id.clone(),
            other => other.name().to_string(),
        }
    }

    pub(crate) fn emit_assign(&mut self, targets: &[NodeId], value: NodeId) -> Result<()> {
        self.write_indent()?;
        for &target in targets {
            self.emit(target)?;
            self.write(" = ")?;
        }
        self.emit(value)?;
        self.write(";\n")
    }

    pub(crate) fn emit_aug_assign(
        &mut self,
        id: NodeId,
        target: NodeId,
        op: BinaryOp,
        value: NodeId,
    ) -> Result<()> {
        let op_text = ops::binary(op).ok_or_else(|| self.unknown_operator(id, op))?;

        self.write_indent()?;
        self.emit(target)?;
        self.write(" ")?;
        self.write(op_text)?;
        self.write("= ")?;
        self.emit(value)?;
        self.write(";\n")
    }

    pub(crate) fn emit_delete(&mut self, targets: &[NodeId]) -> Result<()> {
        for &target in targets {
            self.write_indent()?;
            self.write("delete ")?;
            self.emit(target)?;
            self.write(";\n")?;
        }
        Ok(())
    }

    pub(crate) fn emit_function(
        &mut self,
        id: NodeId,
        name: &str,
        params: &[NodeId],
        returns: Option<NodeId>,
        body: &[NodeId],
    ) -> Result<()> {
        let returns = annotation::resolve(self.module, returns, self.pos_of(id))?;

        if let Some((stmt, text)) = self.docstring(body) {
            self.visited.insert(stmt);
            self.emit_block_comment(text)?;
        }

        let ret = returns.render(&self.options.untyped).to_string();
        self.write_indent()?;
        self.write(&ret)?;
        self.write(" ")?;
        self.write(name)?;
        self.write("(")?;
        if params.is_empty() {
            self.write("void")?;
        }
        for (i, &param) in params.iter().enumerate() {
            if i > 0 {
                self.write(", ")?;
            }
            self.emit(param)?;
        }
        self.write(") {\n")?;

        self.indented(|cx| cx.emit_each(body))?;

        self.write_indent()?;
        self.write("}\n")
    }

    /// Leading string statement of a function body.
    fn docstring(&self, body: &[NodeId]) -> Option<(NodeId, &'a str)> {
        let module = self.module;
        let &first = body.first()?;
        let NodeKind::ExprStmt { value } = module.kind(first) else {
            return None;
        };
        match module.kind(*value) {
            NodeKind::Constant {
                value: Literal::Str(text),
            } => Some((first, text.as_str())),
            _ => None,
        }
    }

    pub(crate) fn emit_param(
        &mut self,
        id: NodeId,
        name: &str,
        annotation: Option<NodeId>,
    ) -> Result<()> {
        let resolved = annotation::resolve(self.module, annotation, self.pos_of(id))?;
        let ty = resolved.render(&self.options.untyped).to_string();
        self.write(&ty)?;
        self.write(" ")?;
        self.write(name)
    }

    pub(crate) fn emit_return(&mut self, value: Option<NodeId>) -> Result<()> {
        self.write_indent()?;
        self.write("return")?;
        if let Some(value) = value {
            self.write(" ")?;
            self.emit(value)?;
        }
        self.write(";\n")
    }

    pub(crate) fn emit_if(&mut self, test: NodeId, body: &[NodeId], orelse: &[NodeId]) -> Result<()> {
        let module = self.module;

        // An else holding nothing but another if is an `else if`.
        let mut branches = Vec::new();
        let mut rest = orelse;
        while let [only] = rest {
            let NodeKind::If { test, body, orelse } = module.kind(*only) else {
                break;
            };
            self.visited.insert(*only);
            branches.push((*test, body.as_slice()));
            rest = orelse;
        }

        self.write_indent()?;
        self.write("if (")?;
        self.emit(test)?;
        self.write(") {\n")?;
        self.indented(|cx| cx.emit_each(body))?;
        self.write_indent()?;
        self.write("}")?;

        for (test, body) in branches {
            self.write(" else if (")?;
            self.emit(test)?;
            self.write(") {\n")?;
            self.indented(|cx| cx.emit_each(body))?;
            self.write_indent()?;
            self.write("}")?;
        }

        if !rest.is_empty() {
            self.write(" else {\n")?;
            self.indented(|cx| cx.emit_each(rest))?;
            self.write_indent()?;
            self.write("}")?;
        }

        self.write("\n\n")
    }

    pub(crate) fn emit_while(
        &mut self,
        test: NodeId,
        body: &[NodeId],
        orelse: &[NodeId],
    ) -> Result<()> {
        let has_else = !orelse.is_empty();
        if has_else {
            trace!(depth = self.loop_else.len(), "loop has else, declaring sentinel");
            self.write_indent()?;
            self.write("unsigned byte ")?;
            self.write(SENTINEL)?;
            self.write(" = 1;\n")?;
        }

        self.write_indent()?;
        self.write("while (")?;
        self.emit(test)?;
        self.write(") {\n")?;

        self.loop_else.push(has_else);
        let result = self.indented(|cx| cx.emit_each(body));
        self.loop_else.pop();
        result?;

        self.write_indent()?;
        self.write("}\n\n")?;

        if has_else {
            self.write_indent()?;
            self.write("if (")?;
            self.write(SENTINEL)?;
            self.write(" == 1) {\n")?;
            self.indented(|cx| cx.emit_each(orelse))?;
            self.write_indent()?;
            self.write("}\n\n")?;
        }
        Ok(())
    }

    pub(crate) fn emit_break(&mut self) -> Result<()> {
        if self.loop_else.last() == Some(&true) {
            trace!("break clears sentinel");
            self.write_indent()?;
            self.write(SENTINEL)?;
            self.write(" = 0;\n")?;
        }
        self.write_indent()?;
        self.write("break;\n")
    }

    pub(crate) fn emit_continue(&mut self) -> Result<()> {
        self.write_indent()?;
        self.write("continue;\n")
    }

    pub(crate) fn emit_expr_stmt(&mut self, value: NodeId) -> Result<()> {
        let module = self.module;
        let at_top = matches!(self.parent_kind(), Some(NodeKind::Module { .. }));

        if let (true, NodeKind::Constant { value: Literal::Str(text) }) = (at_top, module.kind(value)) {
            self.visited.insert(value);
            return if text.contains('\n') {
                self.emit_block_comment(text)
            } else {
                self.write_indent()?;
                self.write("// ")?;
                self.write(text)?;
                self.write("\n")
            };
        }

        self.write_indent()?;
        self.emit(value)?;
        self.write(";\n")
    }

    fn emit_block_comment(&mut self, text: &str) -> Result<()> {
        self.write("\n")?;
        self.write_indent()?;
        self.write("/*\n")?;
        for line in comment_lines(text) {
            if !line.is_empty() {
                self.write_indent()?;
                self.write(&line)?;
            }
            self.write("\n")?;
        }
        self.write_indent()?;
        self.write("*/\n")
    }

    pub(crate) fn emit_import(&mut self, names: &[String]) -> Result<()> {
        for name in names {
            self.write("#include <")?;
            self.write(&name.replace('.', "/"))?;
            self.write(".h>\n")?;
        }
        self.write("\n")
    }

    /// The imported names do not change the directive.
    pub(crate) fn emit_import_from(&mut self, module: &str) -> Result<()> {
        self.write("#include <")?;
        self.write(&module.replace('.', "/"))?;
        self.write(".h>\n\n")
    }
}
