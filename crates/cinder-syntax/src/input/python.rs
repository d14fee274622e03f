//! Tree-sitter based Python reader.
//!
//! Produces the arena tree in the shape the host language's own parser
//! would: chained assignments share one `Assign`, `elif` chains nest as a
//! single `If` inside the previous `orelse`, and `and`/`or` chains of one
//! operator collapse into a single n-ary `BoolOp`. Constructs outside the
//! recognized subset are kept as rejectable nodes rather than dropped, so
//! the emitter can report them with a position.

use crate::ast::*;
use crate::error::ReadError;
use crate::traits::Reader;
use tree_sitter::{Node, Parser, Tree};

/// Static instance of the Python reader for the registry.
pub static PYTHON_READER: PythonReader = PythonReader;

/// Python reader using tree-sitter.
pub struct PythonReader;

impl Reader for PythonReader {
    fn language(&self) -> &'static str {
        "python"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["py"]
    }

    fn read(&self, source: &str) -> Result<Module, ReadError> {
        read_python(source)
    }
}

/// Parse Python source into a syntax tree.
pub fn read_python(source: &str) -> Result<Module, ReadError> {
    let mut parser = Parser::new();
    parser
        .set_language(&arborium_python::language().into())
        .map_err(|err| ReadError::Parser(err.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ReadError::Parser("parse was cancelled".into()))?;

    let ctx = ReadContext::new(source);
    ctx.read_module(&tree)
}

fn position(node: Node) -> Position {
    let point = node.start_position();
    Position::new(point.row as u32 + 1, point.column as u32)
}

/// First ERROR or MISSING node in document order.
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|c| c.has_error() || c.is_missing())
        .find_map(first_error)
}

fn field<'t>(node: Node<'t>, name: &str) -> Result<Node<'t>, ReadError> {
    node.child_by_field_name(name).ok_or_else(|| {
        ReadError::Malformed(format!(
            "{} missing `{}` at line {}",
            node.kind(),
            name,
            position(node).line
        ))
    })
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

fn binary_op(text: &str) -> Option<BinaryOp> {
    let op = match text {
        "+" => BinaryOp::Add,
        "-" => BinaryOp::Sub,
        "*" => BinaryOp::Mult,
        "/" => BinaryOp::Div,
        "//" => BinaryOp::FloorDiv,
        "%" => BinaryOp::Mod,
        "**" => BinaryOp::Pow,
        "<<" => BinaryOp::LShift,
        ">>" => BinaryOp::RShift,
        "|" => BinaryOp::BitOr,
        "^" => BinaryOp::BitXor,
        "&" => BinaryOp::BitAnd,
        "@" => BinaryOp::MatMult,
        _ => return None,
    };
    Some(op)
}

fn compare_op(text: &str) -> Option<CmpOp> {
    let op = match text {
        "==" => CmpOp::Eq,
        "!=" | "<>" => CmpOp::NotEq,
        "<" => CmpOp::Lt,
        "<=" => CmpOp::LtE,
        ">" => CmpOp::Gt,
        ">=" => CmpOp::GtE,
        "is" => CmpOp::Is,
        "is not" => CmpOp::IsNot,
        "in" => CmpOp::In,
        "not in" => CmpOp::NotIn,
        _ => return None,
    };
    Some(op)
}

/// Integer spelling to value, following Python's literal rules.
fn parse_int(text: &str) -> Option<i128> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        i128::from_str_radix(hex, 16).ok()
    } else if let Some(oct) = lower.strip_prefix("0o") {
        i128::from_str_radix(oct, 8).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        i128::from_str_radix(bin, 2).ok()
    } else {
        lower.parse().ok()
    }
}

struct ReadContext<'a> {
    source: &'a str,
    builder: ModuleBuilder,
}

impl<'a> ReadContext<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            builder: ModuleBuilder::new(),
        }
    }

    fn node_text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn push(&mut self, node: Node, kind: NodeKind) -> NodeId {
        self.builder.at(Some(position(node)));
        self.builder.push(kind)
    }

    fn unsupported(&mut self, node: Node, construct: impl Into<String>) -> NodeId {
        self.push(
            node,
            NodeKind::Unsupported {
                construct: construct.into(),
            },
        )
    }

    fn read_module(mut self, tree: &Tree) -> Result<Module, ReadError> {
        let root = tree.root_node();

        if root.has_error() {
            let at = first_error(root).map(position).unwrap_or(Position::new(1, 0));
            return Err(ReadError::Syntax {
                line: at.line,
                column: at.column,
            });
        }

        let body = self.read_block(root)?;
        self.builder.at(Some(Position::new(1, 0)));
        Ok(self.builder.finish(body))
    }

    fn read_block(&mut self, node: Node) -> Result<Vec<NodeId>, ReadError> {
        let mut stmts = Vec::new();
        for child in named_children(node) {
            stmts.push(self.read_stmt(child)?);
        }
        Ok(stmts)
    }

    fn read_stmt(&mut self, node: Node) -> Result<NodeId, ReadError> {
        match node.kind() {
            "expression_statement" => {
                let children = named_children(node);
                match children.as_slice() {
                    [inner] => match inner.kind() {
                        "assignment" => self.read_assignment(*inner),
                        "augmented_assignment" => self.read_augmented_assignment(*inner),
                        _ => {
                            let value = self.read_expr(*inner)?;
                            Ok(self.push(node, NodeKind::ExprStmt { value }))
                        }
                    },
                    _ => Ok(self.unsupported(node, "expression list statement")),
                }
            }

            "return_statement" => {
                let value = match named_children(node).first() {
                    Some(expr) => Some(self.read_expr(*expr)?),
                    None => None,
                };
                Ok(self.push(node, NodeKind::Return { value }))
            }

            "delete_statement" => {
                let mut targets = Vec::new();
                for child in named_children(node) {
                    if child.kind() == "expression_list" {
                        for item in named_children(child) {
                            targets.push(self.read_expr(item)?);
                        }
                    } else {
                        targets.push(self.read_expr(child)?);
                    }
                }
                Ok(self.push(node, NodeKind::Delete { targets }))
            }

            "pass_statement" => Ok(self.push(node, NodeKind::Pass)),
            "break_statement" => Ok(self.push(node, NodeKind::Break)),
            "continue_statement" => Ok(self.push(node, NodeKind::Continue)),

            "if_statement" => self.read_if_statement(node),
            "while_statement" => self.read_while_statement(node),
            "function_definition" => self.read_function_definition(node),

            "import_statement" => {
                let names = self.read_import_names(node);
                Ok(self.push(node, NodeKind::Import { names }))
            }

            "import_from_statement" => {
                let module = self.node_text(field(node, "module_name")?).to_string();
                let mut names = self.read_import_names(node);
                if named_children(node)
                    .iter()
                    .any(|c| c.kind() == "wildcard_import")
                {
                    names.push("*".to_string());
                }
                Ok(self.push(node, NodeKind::ImportFrom { module, names }))
            }

            other => Ok(self.unsupported(node, other)),
        }
    }

    fn read_import_names(&self, node: Node) -> Vec<String> {
        let mut cursor = node.walk();
        node.children_by_field_name("name", &mut cursor)
            .map(|name| match name.kind() {
                "aliased_import" => name
                    .child_by_field_name("name")
                    .map(|n| self.node_text(n))
                    .unwrap_or(""),
                _ => self.node_text(name),
            })
            .map(str::to_string)
            .collect()
    }

    fn read_assignment(&mut self, node: Node) -> Result<NodeId, ReadError> {
        let left = field(node, "left")?;

        if let Some(annotation) = node.child_by_field_name("type") {
            let target = self.read_expr(left)?;
            let annotation = self.read_type(annotation)?;
            let value = match node.child_by_field_name("right") {
                Some(right) => Some(self.read_expr(right)?),
                None => None,
            };
            return Ok(self.push(
                node,
                NodeKind::AnnAssign {
                    target,
                    annotation,
                    value,
                },
            ));
        }

        // a = b = value nests as assignment(a, assignment(b, value))
        let mut targets = vec![self.read_expr(left)?];
        let mut right = field(node, "right")?;
        while right.kind() == "assignment" {
            if right.child_by_field_name("type").is_some() {
                return Ok(self.unsupported(right, "annotated chained assignment"));
            }
            targets.push(self.read_expr(field(right, "left")?)?);
            right = field(right, "right")?;
        }
        let value = self.read_expr(right)?;

        Ok(self.push(node, NodeKind::Assign { targets, value }))
    }

    fn read_augmented_assignment(&mut self, node: Node) -> Result<NodeId, ReadError> {
        let left = field(node, "left")?;
        let right = field(node, "right")?;
        let op_node = field(node, "operator")?;

        let op_text = self.node_text(op_node);
        let Some(op) = binary_op(op_text.trim_end_matches('=')) else {
            return Err(ReadError::Malformed(format!(
                "unknown augmented operator {op_text}"
            )));
        };

        let target = self.read_expr(left)?;
        let value = self.read_expr(right)?;
        Ok(self.push(node, NodeKind::AugAssign { target, op, value }))
    }

    fn read_if_statement(&mut self, node: Node) -> Result<NodeId, ReadError> {
        let test = self.read_expr(field(node, "condition")?)?;
        let body = self.read_block(field(node, "consequence")?)?;

        let alternatives: Vec<Node> = {
            let mut cursor = node.walk();
            node.children_by_field_name("alternative", &mut cursor)
                .collect()
        };

        // Fold from the last clause so each elif lands as the single
        // statement of its predecessor's orelse.
        let mut orelse = Vec::new();
        for alt in alternatives.into_iter().rev() {
            match alt.kind() {
                "else_clause" => {
                    orelse = self.read_block(field(alt, "body")?)?;
                }
                "elif_clause" => {
                    let test = self.read_expr(field(alt, "condition")?)?;
                    let body = self.read_block(field(alt, "consequence")?)?;
                    let nested = self.push(
                        alt,
                        NodeKind::If {
                            test,
                            body,
                            orelse: std::mem::take(&mut orelse),
                        },
                    );
                    orelse = vec![nested];
                }
                _ => {}
            }
        }

        Ok(self.push(node, NodeKind::If { test, body, orelse }))
    }

    fn read_while_statement(&mut self, node: Node) -> Result<NodeId, ReadError> {
        let test = self.read_expr(field(node, "condition")?)?;
        let body = self.read_block(field(node, "body")?)?;
        let orelse = match node.child_by_field_name("alternative") {
            Some(alt) => self.read_block(field(alt, "body")?)?,
            None => Vec::new(),
        };
        Ok(self.push(node, NodeKind::While { test, body, orelse }))
    }

    fn read_function_definition(&mut self, node: Node) -> Result<NodeId, ReadError> {
        let mut cursor = node.walk();
        let is_async = node.children(&mut cursor).any(|c| c.kind() == "async");
        if is_async {
            return Ok(self.unsupported(node, "async function"));
        }

        let name = self.node_text(field(node, "name")?).to_string();
        let params = match node.child_by_field_name("parameters") {
            Some(p) => self.read_parameters(p)?,
            None => Vec::new(),
        };
        let returns = match node.child_by_field_name("return_type") {
            Some(r) => Some(self.read_type(r)?),
            None => None,
        };
        let body = self.read_block(field(node, "body")?)?;

        Ok(self.push(
            node,
            NodeKind::FunctionDef {
                name,
                params,
                returns,
                body,
            },
        ))
    }

    fn read_parameters(&mut self, node: Node) -> Result<Vec<NodeId>, ReadError> {
        let mut params = Vec::new();

        for child in named_children(node) {
            let param = match child.kind() {
                "identifier" => {
                    let name = self.node_text(child).to_string();
                    self.push(
                        child,
                        NodeKind::Param {
                            name,
                            annotation: None,
                        },
                    )
                }
                "typed_parameter" => {
                    let inner = named_children(child)
                        .into_iter()
                        .next()
                        .ok_or_else(|| ReadError::Malformed("typed_parameter is empty".into()))?;
                    if inner.kind() == "identifier" {
                        let name = self.node_text(inner).to_string();
                        let annotation = Some(self.read_type(field(child, "type")?)?);
                        self.push(child, NodeKind::Param { name, annotation })
                    } else {
                        self.read_splat(inner)?
                    }
                }
                "default_parameter" | "typed_default_parameter" => {
                    let name = self.node_text(field(child, "name")?).to_string();
                    let annotation = match child.child_by_field_name("type") {
                        Some(t) => Some(self.read_type(t)?),
                        None => None,
                    };
                    let default = self.read_expr(field(child, "value")?)?;
                    self.push(
                        child,
                        NodeKind::DefaultParam {
                            name,
                            annotation,
                            default,
                        },
                    )
                }
                "list_splat_pattern" | "dictionary_splat_pattern" => self.read_splat(child)?,
                other => self.unsupported(child, other),
            };
            params.push(param);
        }

        Ok(params)
    }

    fn read_splat(&mut self, node: Node) -> Result<NodeId, ReadError> {
        let value = match named_children(node).first() {
            Some(inner) => self.read_expr(*inner)?,
            None => self.unsupported(node, node.kind()),
        };
        Ok(self.push(node, NodeKind::Starred { value }))
    }

    /// `type` nodes wrap the annotation expression.
    fn read_type(&mut self, node: Node) -> Result<NodeId, ReadError> {
        if node.kind() == "type" {
            match named_children(node).first() {
                Some(inner) => self.read_expr(*inner),
                None => Ok(self.unsupported(node, "empty annotation")),
            }
        } else {
            self.read_expr(node)
        }
    }

    fn read_expr(&mut self, node: Node) -> Result<NodeId, ReadError> {
        match node.kind() {
            "identifier" => {
                let id = self.node_text(node).to_string();
                Ok(self.push(node, NodeKind::Name { id }))
            }

            "integer" => {
                let text = self.node_text(node);
                if text.ends_with(['j', 'J']) {
                    return Ok(self.unsupported(node, "complex literal"));
                }
                let value = parse_int(text).ok_or_else(|| ReadError::InvalidLiteral {
                    text: text.to_string(),
                    line: position(node).line,
                })?;
                Ok(self.push(
                    node,
                    NodeKind::Constant {
                        value: Literal::Int(value),
                    },
                ))
            }

            "float" => {
                let text = self.node_text(node);
                if text.ends_with(['j', 'J']) {
                    return Ok(self.unsupported(node, "complex literal"));
                }
                let cleaned: String = text.chars().filter(|c| *c != '_').collect();
                let value: f64 = cleaned.parse().map_err(|_| ReadError::InvalidLiteral {
                    text: text.to_string(),
                    line: position(node).line,
                })?;
                Ok(self.push(
                    node,
                    NodeKind::Constant {
                        value: Literal::Float(value),
                    },
                ))
            }

            "true" | "false" => {
                let value = Literal::Bool(node.kind() == "true");
                Ok(self.push(node, NodeKind::Constant { value }))
            }

            "none" => Ok(self.push(
                node,
                NodeKind::Constant {
                    value: Literal::None,
                },
            )),

            "string" => match self.string_content(node) {
                Some(text) => Ok(self.push(
                    node,
                    NodeKind::Constant {
                        value: Literal::Str(text),
                    },
                )),
                None => Ok(self.unsupported(node, "f-string")),
            },

            "concatenated_string" => {
                let mut joined = String::new();
                for part in named_children(node) {
                    match self.string_content(part) {
                        Some(text) => joined.push_str(&text),
                        None => return Ok(self.unsupported(node, "f-string")),
                    }
                }
                Ok(self.push(
                    node,
                    NodeKind::Constant {
                        value: Literal::Str(joined),
                    },
                ))
            }

            "binary_operator" => self.read_binary_operator(node),
            "comparison_operator" => self.read_comparison_operator(node),
            "boolean_operator" => self.read_boolean_operator(node),

            "unary_operator" => {
                let op_text = self.node_text(field(node, "operator")?);
                let op = match op_text {
                    "+" => UnaryOp::UAdd,
                    "-" => UnaryOp::USub,
                    "~" => UnaryOp::Invert,
                    _ => {
                        return Err(ReadError::Malformed(format!(
                            "unknown unary operator {op_text}"
                        )));
                    }
                };
                let operand = self.read_expr(field(node, "argument")?)?;
                Ok(self.push(node, NodeKind::UnaryOp { op, operand }))
            }

            "not_operator" => {
                let operand = self.read_expr(field(node, "argument")?)?;
                Ok(self.push(
                    node,
                    NodeKind::UnaryOp {
                        op: UnaryOp::Not,
                        operand,
                    },
                ))
            }

            "call" => self.read_call(node),

            "attribute" => {
                let value = self.read_expr(field(node, "object")?)?;
                let attr = self.node_text(field(node, "attribute")?).to_string();
                Ok(self.push(node, NodeKind::Attribute { value, attr }))
            }

            "subscript" => self.read_subscript(node),

            "parenthesized_expression" => match named_children(node).first() {
                Some(inner) => self.read_expr(*inner),
                None => Ok(self.unsupported(node, "empty parentheses")),
            },

            "conditional_expression" => {
                // body if test else orelse
                let parts = named_children(node);
                let [body, test, orelse] = parts.as_slice() else {
                    return Err(ReadError::Malformed(
                        "conditional_expression needs 3 parts".into(),
                    ));
                };
                let body = self.read_expr(*body)?;
                let test = self.read_expr(*test)?;
                let orelse = self.read_expr(*orelse)?;
                Ok(self.push(node, NodeKind::IfExp { test, body, orelse }))
            }

            "lambda" => self.read_lambda(node),

            "list_splat" => self.read_splat(node),

            other => Ok(self.unsupported(node, other)),
        }
    }

    /// Raw text between the quotes, or `None` for interpolated strings.
    fn string_content(&self, node: Node) -> Option<String> {
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        if children.iter().any(|c| c.kind() == "interpolation") {
            return None;
        }
        let start = children
            .iter()
            .find(|c| c.kind() == "string_start")
            .map_or(node.start_byte(), |c| c.end_byte());
        let end = children
            .iter()
            .rev()
            .find(|c| c.kind() == "string_end")
            .map_or(node.end_byte(), |c| c.start_byte());
        Some(self.source.get(start..end).unwrap_or("").to_string())
    }

    fn read_binary_operator(&mut self, node: Node) -> Result<NodeId, ReadError> {
        let op_text = self.node_text(field(node, "operator")?);
        let op = binary_op(op_text)
            .ok_or_else(|| ReadError::Malformed(format!("unknown binary operator {op_text}")))?;
        let left = self.read_expr(field(node, "left")?)?;
        let right = self.read_expr(field(node, "right")?)?;
        Ok(self.push(node, NodeKind::BinOp { left, op, right }))
    }

    fn read_comparison_operator(&mut self, node: Node) -> Result<NodeId, ReadError> {
        // Operands are named children; operators are the anonymous tokens
        // between them ("not in" and "is not" arrive as single tokens).
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();

        let mut operands = Vec::new();
        let mut ops = Vec::new();
        for child in children {
            if child.is_named() {
                if child.kind() != "comment" {
                    operands.push(self.read_expr(child)?);
                }
            } else {
                let text = child.kind();
                let op = compare_op(text).ok_or_else(|| {
                    ReadError::Malformed(format!("unknown comparison operator {text}"))
                })?;
                ops.push(op);
            }
        }

        if operands.len() != ops.len() + 1 || ops.is_empty() {
            return Err(ReadError::Malformed(format!(
                "comparison at line {} has {} operands for {} operators",
                position(node).line,
                operands.len(),
                ops.len()
            )));
        }

        let left = operands.remove(0);
        Ok(self.push(
            node,
            NodeKind::Compare {
                left,
                ops,
                comparators: operands,
            },
        ))
    }

    fn read_boolean_operator(&mut self, node: Node) -> Result<NodeId, ReadError> {
        let op_text = self.node_text(field(node, "operator")?);
        let op = match op_text {
            "and" => BoolOp::And,
            "or" => BoolOp::Or,
            _ => {
                return Err(ReadError::Malformed(format!(
                    "unknown boolean operator {op_text}"
                )));
            }
        };

        // Left-nested chains of the same operator flatten into one operand
        // list; a parenthesized sub-chain stays a separate node.
        let mut operands = vec![field(node, "right")?];
        let mut left = field(node, "left")?;
        while left.kind() == "boolean_operator"
            && left
                .child_by_field_name("operator")
                .is_some_and(|o| self.node_text(o) == op_text)
        {
            operands.push(field(left, "right")?);
            left = field(left, "left")?;
        }
        operands.push(left);
        operands.reverse();

        let mut values = Vec::with_capacity(operands.len());
        for operand in operands {
            values.push(self.read_expr(operand)?);
        }
        Ok(self.push(node, NodeKind::BoolOp { op, values }))
    }

    fn read_call(&mut self, node: Node) -> Result<NodeId, ReadError> {
        let func = self.read_expr(field(node, "function")?)?;

        let mut args = Vec::new();
        if let Some(arguments) = node.child_by_field_name("arguments") {
            if arguments.kind() == "generator_expression" {
                args.push(self.unsupported(arguments, "generator_expression"));
            } else {
                for child in named_children(arguments) {
                    let arg = match child.kind() {
                        "keyword_argument" => {
                            let arg = Some(self.node_text(field(child, "name")?).to_string());
                            let value = self.read_expr(field(child, "value")?)?;
                            self.push(child, NodeKind::Keyword { arg, value })
                        }
                        "dictionary_splat" => {
                            let value = match named_children(child).first() {
                                Some(inner) => self.read_expr(*inner)?,
                                None => self.unsupported(child, "dictionary_splat"),
                            };
                            self.push(child, NodeKind::Keyword { arg: None, value })
                        }
                        _ => self.read_expr(child)?,
                    };
                    args.push(arg);
                }
            }
        }

        Ok(self.push(node, NodeKind::Call { func, args }))
    }

    fn read_subscript(&mut self, node: Node) -> Result<NodeId, ReadError> {
        let value = self.read_expr(field(node, "value")?)?;

        let subscripts: Vec<Node> = {
            let mut cursor = node.walk();
            node.children_by_field_name("subscript", &mut cursor)
                .collect()
        };

        let slice = match subscripts.as_slice() {
            [single] if single.kind() == "slice" => self.read_slice(*single)?,
            [single] => self.read_expr(*single)?,
            _ => self.unsupported(node, "tuple subscript"),
        };

        Ok(self.push(node, NodeKind::Subscript { value, slice }))
    }

    fn read_slice(&mut self, node: Node) -> Result<NodeId, ReadError> {
        // lower:upper:step - ':' tokens separate the optional parts.
        let mut parts: [Option<NodeId>; 3] = [None, None, None];
        let mut segment = 0;
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        for child in children {
            if child.is_named() {
                if segment < parts.len() && child.kind() != "comment" {
                    parts[segment] = Some(self.read_expr(child)?);
                }
            } else if child.kind() == ":" {
                segment += 1;
            }
        }
        let [lower, upper, step] = parts;
        Ok(self.push(node, NodeKind::Slice { lower, upper, step }))
    }

    fn read_lambda(&mut self, node: Node) -> Result<NodeId, ReadError> {
        let mut params = Vec::new();
        if let Some(list) = node.child_by_field_name("parameters") {
            for child in named_children(list) {
                if child.kind() != "identifier" {
                    return Ok(self.unsupported(node, "lambda with non-positional parameters"));
                }
                params.push(self.node_text(child).to_string());
            }
        }
        let body = self.read_expr(field(node, "body")?)?;
        Ok(self.push(node, NodeKind::Lambda { params, body }))
    }
}
