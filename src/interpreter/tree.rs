use super::context::Context;
use super::error::{LoopRangeError, Phase, RuntimeError, RuntimeErrorKind};
use crate::parser::expression::{
    Expression, ExpressionAtom, ExpressionAtomKind, ExpressionNode, ExpressionNodeRef,
};
use crate::parser::statement::{
    AssignmentStatement, CallStatement, ErrorStatement, LoopStatement, Statement,
};
use crate::parser::Program;

pub struct TreeWalkInterpreter<C: Context> {
    context: C,
}

impl<C> TreeWalkInterpreter<C>
where
    C: Context,
{
    pub fn new(context: C) -> Self {
        Self { context }
    }

    /// Runs every statement in order, stopping at the first failure.
    pub fn run(mut self, program: &Program) -> Result<C, RuntimeError> {
        for statement in program.iter() {
            self.interpret_statement(statement)?;
        }
        Ok(self.context)
    }

    pub fn interpret_statement(&mut self, statement: &Statement) -> Result<(), RuntimeError> {
        tracing::trace!(position = %statement.position(), "statement");
        match statement {
            Statement::Assignment(stmt) => self.interpret_assignment(stmt),
            Statement::Call(stmt) => self.interpret_call(stmt),
            Statement::Loop(stmt) => self.interpret_loop(stmt),
            Statement::Error(stmt) => self.interpret_error(stmt),
        }
    }

    pub fn evaluate(&mut self, expr: &Expression) -> Result<f64, RuntimeErrorKind> {
        self.evaluate_expression_node(expr, expr.get_root_ref())
    }
}

// Statement interpreter
impl<C: Context> TreeWalkInterpreter<C> {
    fn interpret_assignment(&mut self, stmt: &AssignmentStatement) -> Result<(), RuntimeError> {
        let value = self
            .evaluate(&stmt.value)
            .map_err(|kind| RuntimeError::new(Phase::Assignment, stmt.position, kind))?;
        self.context.assign(&stmt.name, value);
        Ok(())
    }

    fn interpret_call(&mut self, stmt: &CallStatement) -> Result<(), RuntimeError> {
        let _ = self
            .evaluate(&stmt.call)
            .map_err(|kind| RuntimeError::new(Phase::Call, stmt.position, kind))?;
        Ok(())
    }

    fn interpret_loop(&mut self, stmt: &LoopStatement) -> Result<(), RuntimeError> {
        let fail = |kind: RuntimeErrorKind| RuntimeError::new(Phase::Loop, stmt.position, kind);

        let start = self.evaluate(&stmt.start).map_err(fail)?;
        let end = self.evaluate(&stmt.end).map_err(fail)?;
        let step = match stmt.step {
            Some(ref step) => {
                let step = self.evaluate(step).map_err(fail)?;
                check_step(start, end, step).map_err(|e| fail(e.into()))?;
                Some(step)
            }
            None => None,
        };

        for value in self.context.range(start, end, step, stmt.inclusive) {
            self.context.assign(&stmt.variable, value);
            for inner in stmt.body.iter() {
                self.interpret_statement(inner)
                    .map_err(|e| fail(RuntimeErrorKind::Statement(Box::new(e))))?;
            }
        }
        Ok(())
    }

    fn interpret_error(&mut self, stmt: &ErrorStatement) -> Result<(), RuntimeError> {
        Err(RuntimeError::new(
            Phase::Assignment,
            stmt.position,
            RuntimeErrorKind::IllegalAssignmentTarget(stmt.message.clone()),
        ))
    }
}

/// A supplied step has to move from `start` towards `end`.
fn check_step(start: f64, end: f64, step: f64) -> Result<(), LoopRangeError> {
    if start != end && step == 0.0 {
        Err(LoopRangeError::ZeroStep { start, end })
    } else if start > end && step > 0.0 {
        Err(LoopRangeError::AscendingStepOnDescendingRange { start, end, step })
    } else if start < end && step < 0.0 {
        Err(LoopRangeError::DescendingStepOnAscendingRange { start, end, step })
    } else {
        Ok(())
    }
}

// Expression evaluator
impl<C: Context> TreeWalkInterpreter<C> {
    fn evaluate_expression_atom(&self, atom: &ExpressionAtom) -> Result<f64, RuntimeErrorKind> {
        match atom.kind {
            ExpressionAtomKind::Constant(v) => Ok(v),
            ExpressionAtomKind::Variable(ref name) => self.context.value_of(name),
        }
    }

    fn evaluate_expression_node(
        &mut self,
        tree: &Expression,
        node: ExpressionNodeRef,
    ) -> Result<f64, RuntimeErrorKind> {
        let current_node = tree
            .get_node(node)
            .expect("Node ref came from the tree so it must exist.");

        match current_node {
            ExpressionNode::Atom(atom) => self.evaluate_expression_atom(atom),
            ExpressionNode::Infix {
                operator, lhs, rhs, ..
            } => {
                let lhs = self.evaluate_expression_node(tree, *lhs)?;
                let rhs = self.evaluate_expression_node(tree, *rhs)?;
                Ok(operator.apply(lhs, rhs))
            }
            ExpressionNode::Call {
                name, arguments, ..
            } => {
                let arguments = arguments
                    .iter()
                    .map(|argument| self.evaluate_expression_node(tree, *argument))
                    .collect::<Result<Vec<_>, _>>()?;
                self.context.dispatch(name, &arguments)
            }
        }
    }
}
