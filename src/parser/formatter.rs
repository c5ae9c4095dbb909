use super::{
    expression::{Expression, ExpressionAtom, ExpressionAtomKind, ExpressionNode, ExpressionNodeRef},
    statement::{LoopStatement, Statement},
    ParserError, ParserErrorKind, Program,
};
use crate::lexer::formatter::write_report;

pub trait ProgramFormatter {
    fn format(&self, program: &Program) -> String;
    fn format_error(&self, error: &ParserError) -> String;
}

pub struct DebugFormatter;

impl ProgramFormatter for DebugFormatter {
    fn format(&self, program: &Program) -> String {
        format!("{program:#?}")
    }

    fn format_error(&self, error: &ParserError) -> String {
        format!("{error:?}")
    }
}

/// Writes one S-expression per top level statement.
pub struct SExpressionFormatter;

impl SExpressionFormatter {
    fn format_atom(atom: &ExpressionAtom) -> String {
        match atom.kind {
            ExpressionAtomKind::Constant(v) => format!("{v:?}"),
            ExpressionAtomKind::Variable(ref name) => format!("{name}"),
        }
    }

    fn format_node(tree: &Expression, node: ExpressionNodeRef) -> String {
        let current_node = tree
            .get_node(node)
            .expect("Caller should make sure the ref is valid.");

        match current_node {
            ExpressionNode::Atom(atom) => Self::format_atom(atom),
            ExpressionNode::Infix {
                operator, lhs, rhs, ..
            } => {
                format!(
                    "({} {} {})",
                    operator.symbol(),
                    Self::format_node(tree, *lhs),
                    Self::format_node(tree, *rhs),
                )
            }
            ExpressionNode::Call {
                name, arguments, ..
            } => {
                let mut buffer = format!("(call {name}");
                for argument in arguments.iter() {
                    buffer.push(' ');
                    buffer.push_str(&Self::format_node(tree, *argument));
                }
                buffer.push(')');
                buffer
            }
        }
    }

    pub fn format_expression(&self, expression: &Expression) -> String {
        Self::format_node(expression, expression.get_root_ref())
    }

    fn format_loop(&self, stmt: &LoopStatement) -> String {
        let close = if stmt.inclusive { ']' } else { ')' };
        let mut buffer = format!(
            "(for {} [{} {}{close}",
            stmt.variable,
            self.format_expression(&stmt.start),
            self.format_expression(&stmt.end),
        );
        if let Some(ref step) = stmt.step {
            buffer.push_str(&format!(" (by {})", self.format_expression(step)));
        }
        for inner in stmt.body.iter() {
            buffer.push(' ');
            buffer.push_str(&self.format_statement(inner));
        }
        buffer.push(')');
        buffer
    }

    pub fn format_statement(&self, statement: &Statement) -> String {
        match statement {
            Statement::Assignment(stmt) => {
                format!("(= {} {})", stmt.name, self.format_expression(&stmt.value))
            }
            Statement::Call(stmt) => self.format_expression(&stmt.call),
            Statement::Loop(stmt) => self.format_loop(stmt),
            Statement::Error(stmt) => format!("(error {:?})", stmt.message.as_str()),
        }
    }
}

impl ProgramFormatter for SExpressionFormatter {
    fn format(&self, program: &Program) -> String {
        let mut buffer = String::new();
        for statement in program.iter() {
            buffer.push_str(&self.format_statement(statement));
            buffer.push('\n');
        }
        buffer
    }

    fn format_error(&self, error: &ParserError) -> String {
        format!("[{}] Error: {}", error.position, error.kind)
    }
}

pub struct PrettyFormatter<'src> {
    text: &'src str,
    path: &'src str,
}

impl<'src> PrettyFormatter<'src> {
    pub fn new(text: &'src str, path: &'src str) -> Self {
        Self { text, path }
    }
}

impl<'src> ProgramFormatter for PrettyFormatter<'src> {
    fn format(&self, program: &Program) -> String {
        SExpressionFormatter.format(program)
    }

    fn format_error(&self, error: &ParserError) -> String {
        let (message, label) = match &error.kind {
            ParserErrorKind::UnexpectedToken { actual, expected } => (
                "Expected a different token",
                format!("Expected {expected} but got {actual}"),
            ),
            ParserErrorKind::NonExpression(kind) => (
                "Expected a valid expression",
                format!("Not an expression token {kind}"),
            ),
            ParserErrorKind::UnexpectedEof => ("Unexpected EOF", "File ends here...".into()),
            ParserErrorKind::InvalidStatement(kind) => (
                "Expected a statement",
                format!("Statements can't start with {kind}"),
            ),
            ParserErrorKind::InvalidVariable(name) => (
                "Invalid variable name",
                format!("`{name}` can't name a variable"),
            ),
            ParserErrorKind::InvalidFunctionName(name) => (
                "Invalid function name",
                format!("`{name}` can't name a function"),
            ),
            ParserErrorKind::InvalidRangeEnd(kind) => (
                "Unclosed range",
                format!("Expected `)` or `]` but got {kind}"),
            ),
            ParserErrorKind::EmptyBlock => ("Empty loop body", "This block is empty".into()),
            ParserErrorKind::EmptyProgram => ("Empty program", "Nothing to run".into()),
            ParserErrorKind::LexicalError(e) => {
                ("Unexpected character", format!("{}", e.kind))
            }
        };
        write_report(
            self.path,
            self.text,
            error.code(),
            message,
            error.position.span,
            label,
        )
    }
}
