use super::cursor::SourceChar;
use super::token::{Position, Span, SpanIndex, Token, TokenKind, KEYWORD_HASHMAP};
use super::{LexicalError, LexicalErrorKind};

pub enum LexerStateTransition {
    Stay,
    ChangeState(LexerState),
    ChangeStateAndEmit {
        new_state: LexerState,
        token_or_error: Result<Token, LexicalError>,
    },
    ChangeStateAndEmitAndPutBack {
        new_state: LexerState,
        token_or_error: Result<Token, LexicalError>,
        put_back: SourceChar,
    },
    ChangeStateAndEmitAndPutBackTwo {
        new_state: LexerState,
        token_or_error: Result<Token, LexicalError>,
        put_back: (SourceChar, SourceChar),
    },
}

trait LexerStateExecutor {
    fn execute(&self, source: &str, next_char: Option<SourceChar>) -> LexerStateTransition;
}

#[derive(Debug, Clone)]
pub enum LexerState {
    Normal(NormalState),
    Ident(IdentState),
    Number(NumberState),
    NumberDot(NumberDotState),
    Dot(DotState),
    Comment,
}

impl LexerState {
    pub fn execute(&self, source: &str, next_char: Option<SourceChar>) -> LexerStateTransition {
        match self {
            LexerState::Normal(s) => s.execute(source, next_char),
            LexerState::Ident(s) => s.execute(source, next_char),
            LexerState::Number(s) => s.execute(source, next_char),
            LexerState::NumberDot(s) => s.execute(source, next_char),
            LexerState::Dot(s) => s.execute(source, next_char),
            LexerState::Comment => match next_char {
                Some(SourceChar { value: '\n', .. }) => {
                    LexerStateTransition::ChangeState(LexerState::default())
                }
                Some(_) => LexerStateTransition::Stay,
                None => LexerStateTransition::ChangeState(LexerState::default()),
            },
        }
    }
}

impl std::default::Default for LexerState {
    fn default() -> Self {
        Self::Normal(NormalState)
    }
}

fn end_of(source: &str, next_char: &Option<SourceChar>) -> SpanIndex {
    match next_char {
        Some(c) => c.offset,
        None => source.len().into(),
    }
}

/// Emits `token` and hands the terminating character, if any, back to the lexer.
fn emit_before(
    next_char: Option<SourceChar>,
    token_or_error: Result<Token, LexicalError>,
) -> LexerStateTransition {
    match next_char {
        Some(put_back) => LexerStateTransition::ChangeStateAndEmitAndPutBack {
            new_state: LexerState::default(),
            token_or_error,
            put_back,
        },
        None => LexerStateTransition::ChangeStateAndEmit {
            new_state: LexerState::default(),
            token_or_error,
        },
    }
}

#[derive(Debug, Clone)]
pub struct NormalState;

impl LexerStateExecutor for NormalState {
    fn execute(&self, source: &str, next_char: Option<SourceChar>) -> LexerStateTransition {
        let Some(c) = next_char else {
            let end: SpanIndex = source.len().into();
            let (line, column) = last_position(source);
            return LexerStateTransition::ChangeStateAndEmit {
                new_state: LexerState::default(),
                token_or_error: Ok(Token {
                    kind: TokenKind::Eof,
                    position: Position {
                        line,
                        column,
                        span: Span::new(end, 0.into()),
                    },
                }),
            };
        };

        let just = |kind: TokenKind| LexerStateTransition::ChangeStateAndEmit {
            new_state: LexerState::default(),
            token_or_error: Ok(Token {
                kind,
                position: c.position(),
            }),
        };

        match c.value {
            // Single character tokens
            '(' => just(TokenKind::LeftParenthesis),
            ')' => just(TokenKind::RightParenthesis),
            '[' => just(TokenKind::LeftBracket),
            ']' => just(TokenKind::RightBracket),
            '{' => just(TokenKind::LeftBrace),
            '}' => just(TokenKind::RightBrace),
            ',' => just(TokenKind::Comma),
            '=' => just(TokenKind::Equal),
            '-' => just(TokenKind::Minus),
            '+' => just(TokenKind::Plus),
            '*' => just(TokenKind::Star),
            '/' => just(TokenKind::Slash),
            '#' => LexerStateTransition::ChangeState(LexerState::Comment),
            // Numeric literals
            '0'..='9' => LexerStateTransition::ChangeState(LexerState::Number(NumberState {
                start: c,
                fraction: false,
            })),
            '.' => LexerStateTransition::ChangeState(LexerState::Dot(DotState { dot: c })),
            // Identifier/keyword token
            v if v.is_alphabetic() || v == '_' => {
                LexerStateTransition::ChangeState(LexerState::Ident(IdentState { start: c }))
            }
            v if v.is_whitespace() => LexerStateTransition::Stay,
            v => LexerStateTransition::ChangeStateAndEmit {
                new_state: LexerState::default(),
                token_or_error: Err(LexicalError {
                    kind: LexicalErrorKind::Unrecognized(v),
                    position: c.position(),
                }),
            },
        }
    }
}

/// Line and column just past the final character of the source.
fn last_position(source: &str) -> (u32, u32) {
    let line = source.matches('\n').count() as u32 + 1;
    let last_line = source.rsplit('\n').next().unwrap_or("");
    (line, last_line.chars().count() as u32 + 1)
}

#[derive(Debug, Clone)]
pub struct IdentState {
    start: SourceChar,
}

impl IdentState {
    fn lex_ident_or_keyword(&self, source: &str, end: SpanIndex) -> Token {
        let position = self.start.position_until(end);
        let lexeme = &source[position.span.range()];
        Token {
            kind: KEYWORD_HASHMAP
                .get(lexeme)
                .cloned()
                .unwrap_or(TokenKind::Ident),
            position,
        }
    }
}

impl LexerStateExecutor for IdentState {
    fn execute(&self, source: &str, next_char: Option<SourceChar>) -> LexerStateTransition {
        match next_char {
            Some(c) if c.value.is_alphanumeric() || c.value == '_' => LexerStateTransition::Stay,
            _ => {
                let token = self.lex_ident_or_keyword(source, end_of(source, &next_char));
                emit_before(next_char, Ok(token))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct NumberState {
    start: SourceChar,
    fraction: bool,
}

impl LexerStateExecutor for NumberState {
    fn execute(&self, source: &str, next_char: Option<SourceChar>) -> LexerStateTransition {
        match next_char {
            Some(c) if c.value.is_ascii_digit() => LexerStateTransition::Stay,
            Some(c) if c.value == '.' && !self.fraction => {
                LexerStateTransition::ChangeState(LexerState::NumberDot(NumberDotState {
                    start: self.start,
                    dot: c,
                }))
            }
            _ => {
                let token = Token {
                    kind: TokenKind::NumericLiteral,
                    position: self.start.position_until(end_of(source, &next_char)),
                };
                emit_before(next_char, Ok(token))
            }
        }
    }
}

/// An integer part followed by a dot, waiting to see whether a fraction follows.
#[derive(Debug, Clone)]
pub struct NumberDotState {
    start: SourceChar,
    dot: SourceChar,
}

impl LexerStateExecutor for NumberDotState {
    fn execute(&self, source: &str, next_char: Option<SourceChar>) -> LexerStateTransition {
        let _ = source;
        let token = Token {
            kind: TokenKind::NumericLiteral,
            position: self.start.position_until(self.dot.offset),
        };
        match next_char {
            Some(c) if c.value.is_ascii_digit() => {
                LexerStateTransition::ChangeState(LexerState::Number(NumberState {
                    start: self.start,
                    fraction: true,
                }))
            }
            Some(c) => LexerStateTransition::ChangeStateAndEmitAndPutBackTwo {
                new_state: LexerState::default(),
                token_or_error: Ok(token),
                put_back: (self.dot, c),
            },
            None => LexerStateTransition::ChangeStateAndEmitAndPutBack {
                new_state: LexerState::default(),
                token_or_error: Ok(token),
                put_back: self.dot,
            },
        }
    }
}

/// A leading dot, which is only valid as the start of a bare fraction such as `.5`.
#[derive(Debug, Clone)]
pub struct DotState {
    dot: SourceChar,
}

impl LexerStateExecutor for DotState {
    fn execute(&self, source: &str, next_char: Option<SourceChar>) -> LexerStateTransition {
        let _ = source;
        match next_char {
            Some(c) if c.value.is_ascii_digit() => {
                LexerStateTransition::ChangeState(LexerState::Number(NumberState {
                    start: self.dot,
                    fraction: true,
                }))
            }
            _ => emit_before(
                next_char,
                Err(LexicalError {
                    kind: LexicalErrorKind::Unrecognized('.'),
                    position: self.dot.position(),
                }),
            ),
        }
    }
}
