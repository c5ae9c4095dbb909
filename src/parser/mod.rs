mod error;
pub mod expression;
pub mod formatter;
pub mod statement;

use compact_str::CompactString;
pub use error::{ParserError, ParserErrorKind};
use expression::{
    Expression, ExpressionAtom, ExpressionAtomKind, ExpressionNode, ExpressionNodeRef,
    IncompleteExpression, InfixOperator,
};
use statement::{AssignmentStatement, CallStatement, ErrorStatement, LoopStatement, Statement};

use crate::lexer::{Lexer, Position, Token, TokenKind};

/// A parsed program: a non-empty sequence of statements in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    statements: Vec<Statement>,
}

impl Program {
    pub fn get_statement(&self, index: usize) -> Option<&Statement> {
        self.statements.get(index)
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Parses `source` into a program. No partial program is returned on failure.
pub fn parse(source: &str) -> Result<Program, ParserError> {
    Parser::new(source).parse()
}

/// The value of a reserved constant name, if `name` is one.
pub fn reserved_constant(name: &str) -> Option<f64> {
    match name {
        "pi" | "π" => Some(std::f64::consts::PI),
        "e" => Some(std::f64::consts::E),
        _ => None,
    }
}

/// Variables start with an ASCII lowercase letter, a Greek lowercase letter or `_`.
pub fn is_variable_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_lowercase() || ('α'..='ω').contains(&first) || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Function names are lowercase ASCII letters, digits and `_`, starting with a letter.
pub fn is_function_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_lowercase()
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

pub struct Parser<'src> {
    lexer: Lexer<'src>,
    lookahead: Option<Result<Token, ParserError>>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            lexer: Lexer::new(source),
            lookahead: None,
        }
    }

    fn peek(&mut self) -> Result<Token, ParserError> {
        match self.lookahead {
            Some(ref token_or_error) => token_or_error.clone(),
            None => {
                let next_token = self.next_token();
                self.lookahead = Some(next_token.clone());
                next_token
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ParserError> {
        match self.lookahead.take() {
            Some(token_or_error) => token_or_error,
            None => Ok(self.lexer.next_token()?),
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParserError> {
        let next_token = self.next_token()?;
        if next_token.kind != expected {
            Err(ParserError {
                position: next_token.position,
                kind: match next_token.kind {
                    TokenKind::Eof => ParserErrorKind::UnexpectedEof,
                    actual => ParserErrorKind::UnexpectedToken { actual, expected },
                },
            })
        } else {
            Ok(next_token)
        }
    }

    fn eat_if(&mut self, next: TokenKind) -> Result<Option<Token>, ParserError> {
        let next_token = self.peek()?;
        if next_token.kind != next {
            Ok(None)
        } else {
            self.lookahead = None;
            Ok(Some(next_token))
        }
    }

    fn lexeme(&self, token: &Token) -> &'src str {
        self.lexer
            .get_lexeme(&token.span())
            .expect("Lexed token has a valid span")
    }

    fn parse_number(&self, token: &Token) -> f64 {
        self.lexeme(token)
            .parse()
            .expect("Numeric literal tokens are valid `f64`")
    }
}

// Expressions: sums of products of factors, each level folded left to right.
impl<'src> Parser<'src> {
    pub fn parse_expression(&mut self) -> Result<Expression, ParserError> {
        let mut tree = IncompleteExpression::new();
        let root = self.parse_sum(&mut tree)?;

        Ok(Expression::new(tree, root)
            .expect("Root was obtained from the tree itself so it must be valid."))
    }

    fn parse_sum(
        &mut self,
        tree: &mut IncompleteExpression,
    ) -> Result<ExpressionNodeRef, ParserError> {
        let mut lhs = self.parse_product(tree)?;
        loop {
            let token = self.peek()?;
            let Some(operator) = InfixOperator::additive(token.kind) else {
                break;
            };
            self.lookahead = None;
            let rhs = self.parse_product(tree)?;
            lhs = tree.push(ExpressionNode::Infix {
                operator,
                lhs,
                rhs,
                position: token.position,
            });
        }
        Ok(lhs)
    }

    fn parse_product(
        &mut self,
        tree: &mut IncompleteExpression,
    ) -> Result<ExpressionNodeRef, ParserError> {
        let mut lhs = self.parse_factor(tree)?;
        loop {
            let token = self.peek()?;
            let Some(operator) = InfixOperator::multiplicative(token.kind) else {
                break;
            };
            self.lookahead = None;
            let rhs = self.parse_factor(tree)?;
            lhs = tree.push(ExpressionNode::Infix {
                operator,
                lhs,
                rhs,
                position: token.position,
            });
        }
        Ok(lhs)
    }

    fn parse_factor(
        &mut self,
        tree: &mut IncompleteExpression,
    ) -> Result<ExpressionNodeRef, ParserError> {
        let token = self.next_token()?;

        let node = match token.kind {
            TokenKind::NumericLiteral => tree.push(ExpressionNode::Atom(ExpressionAtom {
                kind: ExpressionAtomKind::Constant(self.parse_number(&token)),
                position: token.position,
            })),
            TokenKind::Minus | TokenKind::Plus => {
                let (value, position) = self.parse_signed_number(token)?;
                tree.push(ExpressionNode::Atom(ExpressionAtom {
                    kind: ExpressionAtomKind::Constant(value),
                    position,
                }))
            }
            TokenKind::Ident => {
                if self.eat_if(TokenKind::LeftParenthesis)?.is_some() {
                    self.parse_call(token, tree)?
                } else {
                    let kind = self.parse_atom_identifier(&token)?;
                    tree.push(ExpressionNode::Atom(ExpressionAtom {
                        kind,
                        position: token.position,
                    }))
                }
            }
            // Bracketed expression
            TokenKind::LeftParenthesis => {
                let inner = self.parse_sum(tree)?;
                self.expect(TokenKind::RightParenthesis)?;
                inner
            }
            TokenKind::Eof => {
                return Err(ParserError {
                    kind: ParserErrorKind::UnexpectedEof,
                    position: token.position,
                })
            }
            kind => {
                return Err(ParserError {
                    kind: ParserErrorKind::NonExpression(kind),
                    position: token.position,
                })
            }
        };
        Ok(node)
    }

    /// A sign only belongs to a literal when the digits follow it immediately.
    fn parse_signed_number(&mut self, sign: Token) -> Result<(f64, Position), ParserError> {
        let digits = self.peek()?;
        if digits.kind != TokenKind::NumericLiteral || digits.span().start != sign.span().end() {
            return Err(ParserError {
                kind: ParserErrorKind::NonExpression(sign.kind),
                position: sign.position,
            });
        }
        self.lookahead = None;
        let magnitude = self.parse_number(&digits);
        let value = match sign.kind {
            TokenKind::Minus => -magnitude,
            _ => magnitude,
        };
        let span = sign.span().merge(&digits.span());
        Ok((value, sign.position.with_span(span)))
    }

    fn parse_atom_identifier(&self, token: &Token) -> Result<ExpressionAtomKind, ParserError> {
        let name = self.lexeme(token);
        if let Some(value) = reserved_constant(name) {
            Ok(ExpressionAtomKind::Constant(value))
        } else if is_variable_name(name) {
            Ok(ExpressionAtomKind::Variable(name.into()))
        } else {
            Err(ParserError {
                kind: ParserErrorKind::InvalidVariable(name.into()),
                position: token.position,
            })
        }
    }

    /// Parses the arguments of a call whose name and opening parenthesis were consumed.
    fn parse_call(
        &mut self,
        name: Token,
        tree: &mut IncompleteExpression,
    ) -> Result<ExpressionNodeRef, ParserError> {
        let lexeme = self.lexeme(&name);
        if !is_function_name(lexeme) {
            return Err(ParserError {
                kind: ParserErrorKind::InvalidFunctionName(lexeme.into()),
                position: name.position,
            });
        }

        let mut arguments = vec![self.parse_sum(tree)?];
        while self.eat_if(TokenKind::Comma)?.is_some() {
            arguments.push(self.parse_sum(tree)?);
        }
        self.expect(TokenKind::RightParenthesis)?;

        Ok(tree.push(ExpressionNode::Call {
            name: lexeme.into(),
            arguments,
            position: name.position,
        }))
    }
}

// Parse program/statements
impl<'src> Parser<'src> {
    pub fn parse(&mut self) -> Result<Program, ParserError> {
        let mut statements = Vec::new();

        loop {
            let first = self.peek()?;
            if first.kind == TokenKind::Eof {
                if statements.is_empty() {
                    return Err(ParserError {
                        kind: ParserErrorKind::EmptyProgram,
                        position: first.position,
                    });
                }
                break;
            }
            statements.push(self.parse_statement()?);
        }

        tracing::debug!(statements = statements.len(), "parsed program");
        Ok(Program { statements })
    }

    fn parse_statement(&mut self) -> Result<Statement, ParserError> {
        let first = self.next_token()?;
        match first.kind {
            TokenKind::KeywordFor => self.parse_loop(first),
            TokenKind::Ident => {
                if self.eat_if(TokenKind::LeftParenthesis)?.is_some() {
                    let mut tree = IncompleteExpression::new();
                    let root = self.parse_call(first, &mut tree)?;
                    let call = Expression::new(tree, root)
                        .expect("Root was obtained from the tree itself so it must be valid.");
                    Ok(Statement::Call(CallStatement {
                        call,
                        position: first.position,
                    }))
                } else {
                    let name = self.lexeme(&first);
                    match reserved_constant(name) {
                        Some(value) => self.parse_illegal_assignment(value, first.position),
                        None if is_variable_name(name) => {
                            self.expect(TokenKind::Equal)?;
                            let value = self.parse_expression()?;
                            Ok(Statement::Assignment(AssignmentStatement {
                                name: name.into(),
                                value,
                                position: first.position,
                            }))
                        }
                        None => Err(ParserError {
                            kind: ParserErrorKind::InvalidVariable(name.into()),
                            position: first.position,
                        }),
                    }
                }
            }
            TokenKind::NumericLiteral => {
                let value = self.parse_number(&first);
                self.parse_illegal_assignment(value, first.position)
            }
            TokenKind::Minus | TokenKind::Plus => {
                let (value, position) = self.parse_signed_number(first)?;
                self.parse_illegal_assignment(value, position)
            }
            TokenKind::Eof => Err(ParserError {
                kind: ParserErrorKind::UnexpectedEof,
                position: first.position,
            }),
            kind => Err(ParserError {
                kind: ParserErrorKind::InvalidStatement(kind),
                position: first.position,
            }),
        }
    }

    /// Assignments to constants still parse their right hand side, but turn into an error
    /// statement that fails once the program is validated.
    fn parse_illegal_assignment(
        &mut self,
        target: f64,
        position: Position,
    ) -> Result<Statement, ParserError> {
        self.expect(TokenKind::Equal)?;
        let _ = self.parse_expression()?;
        Ok(Statement::Error(ErrorStatement {
            message: CompactString::from(format!("{target:.5} is not a variable")),
            position,
        }))
    }

    fn parse_loop(&mut self, keyword: Token) -> Result<Statement, ParserError> {
        let variable = self.expect(TokenKind::Ident)?;
        let name = self.lexeme(&variable);
        if reserved_constant(name).is_some() || !is_variable_name(name) {
            return Err(ParserError {
                kind: ParserErrorKind::InvalidVariable(name.into()),
                position: variable.position,
            });
        }

        self.expect(TokenKind::KeywordOver)?;
        self.expect(TokenKind::LeftBracket)?;
        let start = self.parse_expression()?;
        self.expect(TokenKind::Comma)?;
        let end = self.parse_expression()?;

        let close = self.next_token()?;
        let inclusive = match close.kind {
            TokenKind::RightParenthesis => false,
            TokenKind::RightBracket => true,
            kind => {
                return Err(ParserError {
                    kind: ParserErrorKind::InvalidRangeEnd(kind),
                    position: close.position,
                })
            }
        };

        let step = match self.eat_if(TokenKind::KeywordBy)? {
            Some(_) => Some(self.parse_expression()?),
            None => None,
        };

        let open = self.expect(TokenKind::LeftBrace)?;
        let mut body = Vec::new();
        while self.eat_if(TokenKind::RightBrace)?.is_none() {
            body.push(self.parse_statement()?);
        }
        if body.is_empty() {
            return Err(ParserError {
                kind: ParserErrorKind::EmptyBlock,
                position: open.position,
            });
        }

        Ok(Statement::Loop(LoopStatement {
            variable: name.into(),
            start,
            end,
            step,
            inclusive,
            body,
            position: keyword.position,
        }))
    }
}
