use compact_str::CompactString;

use super::InfixOperator;
use crate::lexer::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionAtomKind {
    Constant(f64),
    Variable(CompactString),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionAtom {
    pub kind: ExpressionAtomKind,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpressionNodeRef(u32);

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionNode {
    Atom(ExpressionAtom),
    Infix {
        operator: InfixOperator,
        lhs: ExpressionNodeRef,
        rhs: ExpressionNodeRef,
        position: Position,
    },
    Call {
        name: CompactString,
        arguments: Vec<ExpressionNodeRef>,
        position: Position,
    },
}

impl ExpressionNode {
    pub fn position(&self) -> Position {
        match self {
            ExpressionNode::Atom(atom) => atom.position,
            ExpressionNode::Infix { position, .. } | ExpressionNode::Call { position, .. } => {
                *position
            }
        }
    }
}

/// An expression that is still being built by the parser.
#[derive(Debug, Clone, Default)]
pub struct IncompleteExpression {
    nodes: Vec<ExpressionNode>,
}

/// A fully parsed expression. Nodes are stored children-first in a flat arena and never
/// change once the root has been fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    nodes: Vec<ExpressionNode>,
    root: ExpressionNodeRef,
}

impl IncompleteExpression {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn push(&mut self, node: ExpressionNode) -> ExpressionNodeRef {
        self.nodes.push(node);
        ExpressionNodeRef(self.nodes.len() as u32 - 1)
    }
}

impl Expression {
    pub fn new(tree: IncompleteExpression, root: ExpressionNodeRef) -> Option<Self> {
        if !(0..tree.nodes.len()).contains(&(root.0 as usize)) {
            None
        } else {
            Some(Self {
                nodes: tree.nodes,
                root,
            })
        }
    }

    pub fn get_root_ref(&self) -> ExpressionNodeRef {
        self.root
    }

    pub fn get_root(&self) -> &ExpressionNode {
        self.get_node(self.get_root_ref())
            .expect("The root exists within the tree.")
    }

    pub fn get_node(&self, node: ExpressionNodeRef) -> Option<&ExpressionNode> {
        self.nodes.get(node.0 as usize)
    }

    pub fn position(&self) -> Position {
        self.get_root().position()
    }
}
