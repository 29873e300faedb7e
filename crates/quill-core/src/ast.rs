//! Syntax tree produced by the Quill parser.
//!
//! The tree is deliberately untyped: every node is a [`NodeKind`] tag plus an
//! ordered list of [`Child`] entries. The shape of each kind is fixed by the
//! constructors in this module, which are the only way the parser builds
//! nodes.
//!
//! | Kind            | Children                                              |
//! |-----------------|-------------------------------------------------------|
//! | `PROGRAM`       | sequence of statements                                |
//! | `BLOCK`         | sequence of statements                                |
//! | `ASSIGN`        | target name, value                                    |
//! | `IF`            | condition, `BLOCK`, `BLOCK` or absent                 |
//! | `WHILE`         | condition, `BLOCK`                                    |
//! | `FOR`           | loop variable, iterable, `BLOCK`                      |
//! | `FUNCTION_DEF`  | name, sequence of parameter names, `BLOCK`            |
//! | `FUNCTION_CALL` | name, sequence of arguments                           |
//! | `PRINT`         | argument                                              |
//! | `RETURN`        | value                                                 |
//! | `BINARY_OP`     | operator, left operand, right operand                 |
//! | `VALUE`         | lexeme                                                |
//! | `LIST`          | sequence of elements                                  |
//!
//! - `printer`: Depth-first indentation printer (see [`Node::pretty`])

mod printer;

use std::fmt;

/// Tag identifying what a [`Node`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    Block,
    Assign,
    If,
    While,
    For,
    FunctionDef,
    FunctionCall,
    Print,
    Return,
    BinaryOp,
    Value,
    List,
}

impl NodeKind {
    /// Upper-case tag printed by the tree printer.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Program => "PROGRAM",
            NodeKind::Block => "BLOCK",
            NodeKind::Assign => "ASSIGN",
            NodeKind::If => "IF",
            NodeKind::While => "WHILE",
            NodeKind::For => "FOR",
            NodeKind::FunctionDef => "FUNCTION_DEF",
            NodeKind::FunctionCall => "FUNCTION_CALL",
            NodeKind::Print => "PRINT",
            NodeKind::Return => "RETURN",
            NodeKind::BinaryOp => "BINARY_OP",
            NodeKind::Value => "VALUE",
            NodeKind::List => "LIST",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in a node's child list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    /// A nested node.
    Node(Node),
    /// A bare string such as an identifier name or operator.
    Literal(String),
    /// An ordered list, e.g. statements or arguments.
    Sequence(Vec<Child>),
    /// An optional branch that was not written, e.g. a missing `else`.
    Absent,
}

impl Child {
    /// The nested node, if this child is one.
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Child::Node(node) => Some(node),
            _ => None,
        }
    }

    /// The literal text, if this child is one.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Child::Literal(text) => Some(text),
            _ => None,
        }
    }

    /// The sequence items, if this child is a sequence.
    pub fn as_sequence(&self) -> Option<&[Child]> {
        match self {
            Child::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Child::Absent)
    }
}

impl From<Node> for Child {
    fn from(node: Node) -> Self {
        Child::Node(node)
    }
}

impl From<Option<Node>> for Child {
    fn from(node: Option<Node>) -> Self {
        node.map_or(Child::Absent, Child::Node)
    }
}

fn nodes(items: Vec<Node>) -> Child {
    Child::Sequence(items.into_iter().map(Child::Node).collect())
}

fn literal(text: impl Into<String>) -> Child {
    Child::Literal(text.into())
}

/// A tagged syntax tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: NodeKind,
    children: Vec<Child>,
}

impl Node {
    /// Create a node from raw parts.
    ///
    /// Prefer the kind-specific constructors, which fix the child layout.
    pub fn new(kind: NodeKind, children: Vec<Child>) -> Self {
        Self { kind, children }
    }

    pub fn program(statements: Vec<Node>) -> Self {
        Self::new(NodeKind::Program, vec![nodes(statements)])
    }

    pub fn block(statements: Vec<Node>) -> Self {
        Self::new(NodeKind::Block, vec![nodes(statements)])
    }

    pub fn assign(target: impl Into<String>, value: Node) -> Self {
        Self::new(NodeKind::Assign, vec![literal(target), value.into()])
    }

    pub fn if_else(condition: Node, then_block: Node, else_block: Option<Node>) -> Self {
        Self::new(
            NodeKind::If,
            vec![condition.into(), then_block.into(), else_block.into()],
        )
    }

    pub fn while_loop(condition: Node, body: Node) -> Self {
        Self::new(NodeKind::While, vec![condition.into(), body.into()])
    }

    pub fn for_loop(variable: impl Into<String>, iterable: Node, body: Node) -> Self {
        Self::new(
            NodeKind::For,
            vec![literal(variable), iterable.into(), body.into()],
        )
    }

    pub fn function_def(name: impl Into<String>, params: Vec<String>, body: Node) -> Self {
        let params = Child::Sequence(params.into_iter().map(Child::Literal).collect());
        Self::new(NodeKind::FunctionDef, vec![literal(name), params, body.into()])
    }

    pub fn function_call(name: impl Into<String>, args: Vec<Node>) -> Self {
        Self::new(NodeKind::FunctionCall, vec![literal(name), nodes(args)])
    }

    pub fn print(argument: Node) -> Self {
        Self::new(NodeKind::Print, vec![argument.into()])
    }

    pub fn return_value(value: Node) -> Self {
        Self::new(NodeKind::Return, vec![value.into()])
    }

    pub fn binary_op(op: impl Into<String>, lhs: Node, rhs: Node) -> Self {
        Self::new(NodeKind::BinaryOp, vec![literal(op), lhs.into(), rhs.into()])
    }

    pub fn value(lexeme: impl Into<String>) -> Self {
        Self::new(NodeKind::Value, vec![literal(lexeme)])
    }

    pub fn list(elements: Vec<Node>) -> Self {
        Self::new(NodeKind::List, vec![nodes(elements)])
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Child at `index`, if present.
    pub fn child(&self, index: usize) -> Option<&Child> {
        self.children.get(index)
    }

    /// Nodes of the first sequence child, e.g. the statements of a `PROGRAM`.
    pub fn sequence_nodes(&self) -> impl Iterator<Item = &Node> {
        self.children
            .iter()
            .find_map(Child::as_sequence)
            .unwrap_or_default()
            .iter()
            .filter_map(Child::as_node)
    }

    /// Depth-first search for every node of a kind, this node included.
    pub fn find_all(&self, kind: NodeKind) -> Vec<&Node> {
        let mut found = Vec::new();
        self.collect_kind(kind, &mut found);
        found
    }

    fn collect_kind<'a>(&'a self, kind: NodeKind, found: &mut Vec<&'a Node>) {
        if self.kind == kind {
            found.push(self);
        }
        for child in &self.children {
            child_nodes(child, &mut |node| node.collect_kind(kind, found));
        }
    }

    /// Render this tree with the indentation printer.
    pub fn pretty(&self) -> String {
        printer::render(self)
    }
}

fn child_nodes<'a>(child: &'a Child, visit: &mut dyn FnMut(&'a Node)) {
    match child {
        Child::Node(node) => visit(node),
        Child::Sequence(items) => {
            for item in items {
                child_nodes(item, visit);
            }
        }
        Child::Literal(_) | Child::Absent => {}
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty())
    }
}
