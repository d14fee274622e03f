//! Arena-allocated syntax tree for the recognized Python subset.
//!
//! Nodes live contiguously in a [`Module`] and refer to each other by
//! [`NodeId`]. A module is immutable once [`ModuleBuilder::finish`] returns;
//! consumers that need traversal bookkeeping keep it on their side, keyed
//! by node id.
//!
//! The node kinds follow the source grammar closely. Kinds such as
//! [`NodeKind::Slice`] or [`NodeKind::Keyword`] exist so that a reader can
//! represent them faithfully and let the emitter reject them with a
//! positioned diagnostic.

use serde::{Deserialize, Serialize};

use crate::error::ReadError;

/// Index of a node inside its [`Module`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Source location of a node. Lines are 1-based, columns 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<Position>,
}

/// Literal values as written in the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    None,
    Bool(bool),
    /// Wide enough for the whole unsigned 64-bit range.
    Int(#[serde(with = "wide_int")] i128),
    Float(f64),
    /// Source spelling between the quotes, not escape-decoded.
    Str(String),
}

/// Integers are carried as decimal strings in JSON; serde's buffered
/// content (used by `flatten`) has no 128-bit integers.
mod wide_int {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &i128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i128, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mult,
    Div,
    FloorDiv,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
    MatMult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoolOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    UAdd,
    USub,
    Not,
    Invert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

/// Every node kind a reader can produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum NodeKind {
    Module {
        body: Vec<NodeId>,
    },
    /// `target: annotation [= value]`
    AnnAssign {
        target: NodeId,
        annotation: NodeId,
        value: Option<NodeId>,
    },
    /// `t1 = t2 = ... = value`
    Assign {
        targets: Vec<NodeId>,
        value: NodeId,
    },
    AugAssign {
        target: NodeId,
        op: BinaryOp,
        value: NodeId,
    },
    FunctionDef {
        name: String,
        params: Vec<NodeId>,
        returns: Option<NodeId>,
        body: Vec<NodeId>,
    },
    /// Plain positional parameter, optionally annotated.
    Param {
        name: String,
        annotation: Option<NodeId>,
    },
    Return {
        value: Option<NodeId>,
    },
    Delete {
        targets: Vec<NodeId>,
    },
    If {
        test: NodeId,
        body: Vec<NodeId>,
        orelse: Vec<NodeId>,
    },
    While {
        test: NodeId,
        body: Vec<NodeId>,
        orelse: Vec<NodeId>,
    },
    Break,
    Continue,
    Pass,
    /// Expression evaluated for its effect.
    ExprStmt {
        value: NodeId,
    },
    Import {
        names: Vec<String>,
    },
    ImportFrom {
        module: String,
        names: Vec<String>,
    },
    Constant {
        value: Literal,
    },
    Name {
        id: String,
    },
    BinOp {
        left: NodeId,
        op: BinaryOp,
        right: NodeId,
    },
    BoolOp {
        op: BoolOp,
        values: Vec<NodeId>,
    },
    UnaryOp {
        op: UnaryOp,
        operand: NodeId,
    },
    Compare {
        left: NodeId,
        ops: Vec<CmpOp>,
        comparators: Vec<NodeId>,
    },
    Call {
        func: NodeId,
        args: Vec<NodeId>,
    },
    /// `body if test else orelse`
    IfExp {
        test: NodeId,
        body: NodeId,
        orelse: NodeId,
    },
    Attribute {
        value: NodeId,
        attr: String,
    },
    Lambda {
        params: Vec<String>,
        body: NodeId,
    },
    Subscript {
        value: NodeId,
        slice: NodeId,
    },
    Slice {
        lower: Option<NodeId>,
        upper: Option<NodeId>,
        step: Option<NodeId>,
    },
    /// `name=value` call argument, or `**value` when `arg` is absent.
    Keyword {
        arg: Option<String>,
        value: NodeId,
    },
    /// `*value` argument or parameter.
    Starred {
        value: NodeId,
    },
    DefaultParam {
        name: String,
        annotation: Option<NodeId>,
        default: NodeId,
    },
    /// Any other grammar production, named by the reader.
    Unsupported {
        construct: String,
    },
}

impl NodeKind {
    /// Kind name used in diagnostics.
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Module { .. } => "Module",
            NodeKind::AnnAssign { .. } => "AnnAssign",
            NodeKind::Assign { .. } => "Assign",
            NodeKind::AugAssign { .. } => "AugAssign",
            NodeKind::FunctionDef { .. } => "FunctionDef",
            NodeKind::Param { .. } => "Param",
            NodeKind::Return { .. } => "Return",
            NodeKind::Delete { .. } => "Delete",
            NodeKind::If { .. } => "If",
            NodeKind::While { .. } => "While",
            NodeKind::Break => "Break",
            NodeKind::Continue => "Continue",
            NodeKind::Pass => "Pass",
            NodeKind::ExprStmt { .. } => "Expr",
            NodeKind::Import { .. } => "Import",
            NodeKind::ImportFrom { .. } => "ImportFrom",
            NodeKind::Constant { .. } => "Constant",
            NodeKind::Name { .. } => "Name",
            NodeKind::BinOp { .. } => "BinOp",
            NodeKind::BoolOp { .. } => "BoolOp",
            NodeKind::UnaryOp { .. } => "UnaryOp",
            NodeKind::Compare { .. } => "Compare",
            NodeKind::Call { .. } => "Call",
            NodeKind::IfExp { .. } => "IfExp",
            NodeKind::Attribute { .. } => "Attribute",
            NodeKind::Lambda { .. } => "Lambda",
            NodeKind::Subscript { .. } => "Subscript",
            NodeKind::Slice { .. } => "Slice",
            NodeKind::Keyword { .. } => "keyword",
            NodeKind::Starred { .. } => "Starred",
            NodeKind::DefaultParam { .. } => "default parameter",
            NodeKind::Unsupported { construct } => construct,
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        match self {
            NodeKind::Module { body } => out.extend(body),
            NodeKind::AnnAssign {
                target,
                annotation,
                value,
            } => {
                out.push(*target);
                out.push(*annotation);
                out.extend(value);
            }
            NodeKind::Assign { targets, value } => {
                out.extend(targets);
                out.push(*value);
            }
            NodeKind::AugAssign { target, value, .. } => {
                out.push(*target);
                out.push(*value);
            }
            NodeKind::FunctionDef {
                params,
                returns,
                body,
                ..
            } => {
                out.extend(params);
                out.extend(returns);
                out.extend(body);
            }
            NodeKind::Param { annotation, .. } => out.extend(annotation),
            NodeKind::Return { value } => out.extend(value),
            NodeKind::Delete { targets } => out.extend(targets),
            NodeKind::If { test, body, orelse } | NodeKind::While { test, body, orelse } => {
                out.push(*test);
                out.extend(body);
                out.extend(orelse);
            }
            NodeKind::ExprStmt { value }
            | NodeKind::Keyword { value, .. }
            | NodeKind::Starred { value } => out.push(*value),
            NodeKind::BinOp { left, right, .. } => {
                out.push(*left);
                out.push(*right);
            }
            NodeKind::BoolOp { values, .. } => out.extend(values),
            NodeKind::UnaryOp { operand, .. } => out.push(*operand),
            NodeKind::Compare {
                left, comparators, ..
            } => {
                out.push(*left);
                out.extend(comparators);
            }
            NodeKind::Call { func, args } => {
                out.push(*func);
                out.extend(args);
            }
            NodeKind::IfExp { test, body, orelse } => {
                out.push(*test);
                out.push(*body);
                out.push(*orelse);
            }
            NodeKind::Attribute { value, .. } => out.push(*value),
            NodeKind::Lambda { body, .. } => out.push(*body),
            NodeKind::Subscript { value, slice } => {
                out.push(*value);
                out.push(*slice);
            }
            NodeKind::Slice { lower, upper, step } => {
                out.extend(lower);
                out.extend(upper);
                out.extend(step);
            }
            NodeKind::DefaultParam {
                annotation,
                default,
                ..
            } => {
                out.extend(annotation);
                out.push(*default);
            }
            NodeKind::Break
            | NodeKind::Continue
            | NodeKind::Pass
            | NodeKind::Import { .. }
            | NodeKind::ImportFrom { .. }
            | NodeKind::Constant { .. }
            | NodeKind::Name { .. }
            | NodeKind::Unsupported { .. } => {}
        }
        out
    }
}

/// A complete syntax tree. The root is always a [`NodeKind::Module`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Module {
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node. Ids handed out by the builder, or checked by
    /// [`Module::from_json`], are always in range.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn pos(&self, id: NodeId) -> Option<Position> {
        self.node(id).pos
    }

    /// Top-level statements.
    pub fn body(&self) -> &[NodeId] {
        match self.kind(self.root) {
            NodeKind::Module { body } => body,
            _ => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn to_json(&self) -> Result<String, ReadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a tree produced by an external parser, rejecting dangling ids.
    pub fn from_json(text: &str) -> Result<Module, ReadError> {
        let module: Module = serde_json::from_str(text)?;
        module.validate()?;
        Ok(module)
    }

    fn validate(&self) -> Result<(), ReadError> {
        let len = self.nodes.len();
        if self.root.index() >= len {
            return Err(ReadError::Malformed(format!(
                "root {} is out of range ({len} nodes)",
                self.root.0
            )));
        }
        if !matches!(self.kind(self.root), NodeKind::Module { .. }) {
            return Err(ReadError::Malformed("root is not a Module node".into()));
        }
        for (index, node) in self.nodes.iter().enumerate() {
            if let Some(child) = node.kind.children().into_iter().find(|c| c.index() >= len) {
                return Err(ReadError::Malformed(format!(
                    "node {index} refers to missing node {}",
                    child.0
                )));
            }
        }
        Ok(())
    }
}

/// Incrementally allocates nodes; children must be pushed before parents.
#[derive(Debug, Default)]
pub struct ModuleBuilder {
    nodes: Vec<Node>,
    pos: Option<Position>,
}

impl ModuleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position stamped on nodes pushed from now on.
    pub fn at(&mut self, pos: Option<Position>) -> &mut Self {
        self.pos = pos;
        self
    }

    pub fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            pos: self.pos,
        });
        id
    }

    /// Allocate the root module over `body` and seal the tree.
    pub fn finish(mut self, body: Vec<NodeId>) -> Module {
        let root = self.push(NodeKind::Module { body });
        Module {
            nodes: self.nodes,
            root,
        }
    }

    // Expression shorthands.

    pub fn name(&mut self, id: impl Into<String>) -> NodeId {
        self.push(NodeKind::Name { id: id.into() })
    }

    pub fn constant(&mut self, value: Literal) -> NodeId {
        self.push(NodeKind::Constant { value })
    }

    pub fn int(&mut self, value: i128) -> NodeId {
        self.constant(Literal::Int(value))
    }

    pub fn float(&mut self, value: f64) -> NodeId {
        self.constant(Literal::Float(value))
    }

    pub fn string(&mut self, value: impl Into<String>) -> NodeId {
        self.constant(Literal::Str(value.into()))
    }

    pub fn boolean(&mut self, value: bool) -> NodeId {
        self.constant(Literal::Bool(value))
    }

    pub fn none(&mut self) -> NodeId {
        self.constant(Literal::None)
    }

    pub fn bin_op(&mut self, left: NodeId, op: BinaryOp, right: NodeId) -> NodeId {
        self.push(NodeKind::BinOp { left, op, right })
    }

    pub fn bool_op(&mut self, op: BoolOp, values: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::BoolOp { op, values })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: NodeId) -> NodeId {
        self.push(NodeKind::UnaryOp { op, operand })
    }

    pub fn compare(&mut self, left: NodeId, ops: Vec<CmpOp>, comparators: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::Compare {
            left,
            ops,
            comparators,
        })
    }

    pub fn call(&mut self, func: NodeId, args: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::Call { func, args })
    }

    pub fn if_exp(&mut self, test: NodeId, body: NodeId, orelse: NodeId) -> NodeId {
        self.push(NodeKind::IfExp { test, body, orelse })
    }

    pub fn attribute(&mut self, value: NodeId, attr: impl Into<String>) -> NodeId {
        self.push(NodeKind::Attribute {
            value,
            attr: attr.into(),
        })
    }

    pub fn lambda(&mut self, params: Vec<String>, body: NodeId) -> NodeId {
        self.push(NodeKind::Lambda { params, body })
    }

    pub fn subscript(&mut self, value: NodeId, slice: NodeId) -> NodeId {
        self.push(NodeKind::Subscript { value, slice })
    }

    // Statement shorthands.

    pub fn ann_assign(&mut self, target: NodeId, annotation: NodeId, value: Option<NodeId>) -> NodeId {
        self.push(NodeKind::AnnAssign {
            target,
            annotation,
            value,
        })
    }

    pub fn assign(&mut self, targets: Vec<NodeId>, value: NodeId) -> NodeId {
        self.push(NodeKind::Assign { targets, value })
    }

    pub fn aug_assign(&mut self, target: NodeId, op: BinaryOp, value: NodeId) -> NodeId {
        self.push(NodeKind::AugAssign { target, op, value })
    }

    pub fn expr_stmt(&mut self, value: NodeId) -> NodeId {
        self.push(NodeKind::ExprStmt { value })
    }

    pub fn param(&mut self, name: impl Into<String>, annotation: Option<NodeId>) -> NodeId {
        self.push(NodeKind::Param {
            name: name.into(),
            annotation,
        })
    }

    pub fn function(
        &mut self,
        name: impl Into<String>,
        params: Vec<NodeId>,
        returns: Option<NodeId>,
        body: Vec<NodeId>,
    ) -> NodeId {
        self.push(NodeKind::FunctionDef {
            name: name.into(),
            params,
            returns,
            body,
        })
    }

    pub fn return_stmt(&mut self, value: Option<NodeId>) -> NodeId {
        self.push(NodeKind::Return { value })
    }

    pub fn if_stmt(&mut self, test: NodeId, body: Vec<NodeId>, orelse: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::If { test, body, orelse })
    }

    pub fn while_loop(&mut self, test: NodeId, body: Vec<NodeId>, orelse: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::While { test, body, orelse })
    }

    pub fn break_stmt(&mut self) -> NodeId {
        self.push(NodeKind::Break)
    }

    pub fn continue_stmt(&mut self) -> NodeId {
        self.push(NodeKind::Continue)
    }

    pub fn pass(&mut self) -> NodeId {
        self.push(NodeKind::Pass)
    }
}
