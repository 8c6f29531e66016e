//! AST (Abstract Syntax Tree) definitions
//!
//! Nodes live in an [`Ast`] arena and refer to each other by [`NodeId`].
//! Parent/child relations are index pairs kept by the arena, so the tree can be
//! walked in both directions without shared ownership.
//!
//! A node only ever references nodes that were allocated before it, and each
//! node can be claimed by one parent, so the arena is always a forest rooted at
//! the [`Node::Program`] entry created by [`Ast::new`].

use super::lexer::{SourceLocation, Token};

/// Unique identifier for AST nodes (index into the arena)
pub type NodeId = usize;

/// Operand of an assignment, binary expression or call: either a parsed node
/// or raw token text kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Node(NodeId),
    Raw(String),
}

impl Operand {
    pub fn raw(text: impl Into<String>) -> Self {
        Operand::Raw(text.into())
    }

    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Operand::Node(id) => Some(*id),
            Operand::Raw(_) => None,
        }
    }
}

/// AST node variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Root of a parsed unit; top-level constructs are its children.
    Program,

    /// Variable declaration (`var_type` set) or reference to an existing one.
    Variable {
        name: String,
        var_type: Option<String>,
    },
    Assignment {
        left: Operand,
        right: Operand,
    },
    BinaryOperator {
        operator: String,
        left: Operand,
        right: Operand,
    },
    /// Boolean test of a loop header; operands stay as raw token slices.
    LoopCondition {
        left: Vec<Token>,
        comparator: String,
        right: Vec<Token>,
    },
    ForLoop {
        initialization: NodeId,
        condition: NodeId,
        update: NodeId,
        body: Vec<Token>,
    },

    // Reserved for constructs the parser does not recognise yet
    Array {
        name: String,
        size: Option<usize>,
        elements: Vec<Operand>,
    },
    Struct {
        name: String,
        fields: Vec<NodeId>,
    },
    Macro {
        name: String,
        body: Vec<Token>,
    },
    IfStatement {
        condition: NodeId,
        body: Vec<NodeId>,
        else_body: Option<Vec<NodeId>>,
    },
    WhileLoop {
        condition: NodeId,
        body: Vec<NodeId>,
    },
    FunctionDeclaration {
        return_type: String,
        name: String,
        parameters: Vec<NodeId>,
        body: Vec<NodeId>,
    },
    FunctionCall {
        name: String,
        arguments: Vec<Operand>,
    },
}

impl Node {
    /// Tag identifying the variant, used as the header of rendered output.
    pub fn node_type(&self) -> &'static str {
        match self {
            Node::Program => "Program",
            Node::Variable { .. } => "Variable",
            Node::Assignment { .. } => "Assignment",
            Node::BinaryOperator { .. } => "Binary Expression",
            Node::LoopCondition { .. } => "Loop Condition",
            Node::ForLoop { .. } => "For Loop",
            Node::Array { .. } => "Array",
            Node::Struct { .. } => "Struct",
            Node::Macro { .. } => "Macro",
            Node::IfStatement { .. } => "If Statement",
            Node::WhileLoop { .. } => "While Loop",
            Node::FunctionDeclaration { .. } => "Function Declaration",
            Node::FunctionCall { .. } => "Function Call",
        }
    }

    /// Scalar value shown next to the node type, if the variant has one.
    pub fn value(&self) -> Option<String> {
        match self {
            Node::Variable {
                name,
                var_type: Some(ty),
            } => Some(format!("{} ({})", name, ty)),
            Node::Variable {
                name,
                var_type: None,
            } => Some(name.clone()),
            Node::BinaryOperator { operator, .. } => Some(operator.clone()),
            Node::LoopCondition { comparator, .. } => Some(comparator.clone()),
            Node::Array {
                name,
                size: Some(size),
                ..
            } => Some(format!("{}[{}]", name, size)),
            Node::Array { name, size: None, .. } => Some(format!("{}[]", name)),
            Node::Struct { name, .. } | Node::Macro { name, .. } | Node::FunctionCall { name, .. } => {
                Some(name.clone())
            }
            Node::FunctionDeclaration {
                return_type, name, ..
            } => Some(format!("{} {}", return_type, name)),
            Node::Program
            | Node::Assignment { .. }
            | Node::ForLoop { .. }
            | Node::IfStatement { .. }
            | Node::WhileLoop { .. } => None,
        }
    }

    /// Sub-nodes owned through typed fields, in declared field order.
    pub fn field_ids(&self) -> Vec<NodeId> {
        match self {
            Node::Program
            | Node::Variable { .. }
            | Node::LoopCondition { .. }
            | Node::Macro { .. } => Vec::new(),
            Node::Assignment { left, right } | Node::BinaryOperator { left, right, .. } => {
                [left, right].iter().filter_map(|op| op.node_id()).collect()
            }
            Node::ForLoop {
                initialization,
                condition,
                update,
                ..
            } => vec![*initialization, *condition, *update],
            Node::Array { elements, .. } => elements.iter().filter_map(Operand::node_id).collect(),
            Node::FunctionCall { arguments, .. } => {
                arguments.iter().filter_map(Operand::node_id).collect()
            }
            Node::Struct { fields, .. } => fields.clone(),
            Node::IfStatement {
                condition,
                body,
                else_body,
            } => std::iter::once(*condition)
                .chain(body.iter().copied())
                .chain(else_body.iter().flatten().copied())
                .collect(),
            Node::WhileLoop { condition, body } => {
                std::iter::once(*condition).chain(body.iter().copied()).collect()
            }
            Node::FunctionDeclaration {
                parameters, body, ..
            } => parameters.iter().chain(body.iter()).copied().collect(),
        }
    }
}

/// Errors raised when linking nodes inside the arena
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AstError {
    #[error("Unknown AST node id {0}")]
    UnknownNode(NodeId),

    #[error("AST node {child} is already attached to node {parent}")]
    AlreadyAttached { child: NodeId, parent: NodeId },

    #[error("Attaching node {child} under node {parent} would create a cycle")]
    WouldCycle { child: NodeId, parent: NodeId },
}

#[derive(Debug, Clone)]
struct Entry {
    node: Node,
    location: SourceLocation,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena owning every node of one parsed unit
#[derive(Debug, Clone)]
pub struct Ast {
    entries: Vec<Entry>,
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}

impl Ast {
    /// Id of the [`Node::Program`] root created with every arena.
    pub const ROOT: NodeId = 0;

    pub fn new() -> Self {
        Ast {
            entries: vec![Entry {
                node: Node::Program,
                location: SourceLocation::default(),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    /// Allocate `node` and make it the parent of every sub-node its fields
    /// reference. Nothing is allocated if any of them is unknown or taken.
    pub fn add(&mut self, node: Node, location: SourceLocation) -> Result<NodeId, AstError> {
        let id = self.entries.len();
        let claimed = node.field_ids();

        for (i, &child) in claimed.iter().enumerate() {
            let entry = self.entries.get(child).ok_or(AstError::UnknownNode(child))?;
            if child == Self::ROOT {
                return Err(AstError::WouldCycle { child, parent: id });
            }
            if let Some(parent) = entry.parent {
                return Err(AstError::AlreadyAttached { child, parent });
            }
            if claimed[..i].contains(&child) {
                return Err(AstError::AlreadyAttached { child, parent: id });
            }
        }

        for &child in &claimed {
            self.entries[child].parent = Some(id);
        }
        self.entries.push(Entry {
            node,
            location,
            parent: None,
            children: Vec::new(),
        });
        Ok(id)
    }

    /// Append `child` to the ordered child list of `parent`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), AstError> {
        if parent >= self.entries.len() {
            return Err(AstError::UnknownNode(parent));
        }
        let existing = self
            .entries
            .get(child)
            .ok_or(AstError::UnknownNode(child))?
            .parent;
        if let Some(owner) = existing {
            return Err(AstError::AlreadyAttached {
                child,
                parent: owner,
            });
        }
        if self.ancestors(parent).any(|id| id == child) {
            return Err(AstError::WouldCycle { child, parent });
        }

        self.entries[child].parent = Some(parent);
        self.entries[parent].children.push(child);
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.entries.get(id).map(|e| &e.node)
    }

    pub fn location(&self, id: NodeId) -> Option<SourceLocation> {
        self.entries.get(id).map(|e| e.location)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entries.get(id).and_then(|e| e.parent)
    }

    /// Ordered children attached with [`Ast::add_child`].
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.entries
            .get(id)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    /// `id` followed by its parent, grandparent and so on up to a root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.entries.get(id).map(|_| id), move |&current| {
            self.parent(current)
        })
    }

    /// Top-level `for` loops of the program, in source order.
    pub fn for_loops(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children(Self::ROOT)
            .iter()
            .copied()
            .filter(|&id| matches!(self.node(id), Some(Node::ForLoop { .. })))
    }

    /// Number of allocated nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.entries.len()
    }

    /// Drop every node allocated at or after `len`, unlinking them from older
    /// nodes. Used to discard the pieces of a construct that failed to parse.
    pub(crate) fn truncate(&mut self, len: usize) {
        let len = len.max(1);
        self.entries.truncate(len);
        for entry in &mut self.entries {
            if entry.parent.is_some_and(|p| p >= len) {
                entry.parent = None;
            }
            entry.children.retain(|&c| c < len);
        }
    }
}
