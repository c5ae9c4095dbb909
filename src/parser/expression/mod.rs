mod operator;
mod tree;

pub use operator::InfixOperator;
pub use tree::{
    Expression, ExpressionAtom, ExpressionAtomKind, ExpressionNode, ExpressionNodeRef,
    IncompleteExpression,
};
