mod cursor;
mod error;
pub mod formatter;
mod state;
mod token;

use cursor::SourceChar;
pub use error::{LexicalError, LexicalErrorKind};
use state::{LexerState, LexerStateTransition};
use std::str::Chars;
pub use token::{Position, Span, SpanIndex, SpanLength, Token, TokenKind};

#[derive(Debug)]
enum LookAhead {
    None,
    Single(SourceChar),
    Double(SourceChar, SourceChar),
}

#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    chars: Chars<'src>,
    state: LexerState,
    offset: SpanIndex,
    lookahead: LookAhead,
    line: u32,
    column: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.chars(),
            state: LexerState::default(),
            lookahead: LookAhead::None,
            offset: 0.into(),
            line: 1,
            column: 1,
        }
    }

    pub fn get_source(&self) -> &'src str {
        self.source
    }

    pub fn get_lexeme(&self, span: &Span) -> Option<&'src str> {
        self.source.get(span.range())
    }
}

impl<'src> Lexer<'src> {
    fn next_char(&mut self) -> Option<SourceChar> {
        match self.lookahead {
            LookAhead::None => {
                let c = self.chars.next()?;
                let current = SourceChar {
                    value: c,
                    offset: self.offset,
                    line: self.line,
                    column: self.column,
                };
                self.offset = current.next_offset();
                if c == '\n' {
                    self.line += 1;
                    self.column = 1;
                } else {
                    self.column += 1;
                }
                Some(current)
            }
            LookAhead::Single(lookahead) => {
                self.lookahead = LookAhead::None;
                Some(lookahead)
            }
            LookAhead::Double(first, second) => {
                self.lookahead = LookAhead::Single(second);
                Some(first)
            }
        }
    }

    fn put_back_char(&mut self, c: SourceChar) {
        self.lookahead = match self.lookahead {
            LookAhead::None => LookAhead::Single(c),
            LookAhead::Single(pending) => LookAhead::Double(c, pending),
            LookAhead::Double(..) => unreachable!("At most two characters are ever put back."),
        };
    }

    fn put_back_two_chars(&mut self, first: SourceChar, second: SourceChar) {
        self.put_back_char(second);
        self.put_back_char(first);
    }

    pub fn next_token(&mut self) -> Result<Token, LexicalError> {
        loop {
            let next_char = self.next_char();
            let transition = self.state.execute(self.source, next_char);

            match transition {
                LexerStateTransition::Stay => {}
                LexerStateTransition::ChangeState(new_state) => {
                    self.state = new_state;
                }
                LexerStateTransition::ChangeStateAndEmit {
                    new_state,
                    token_or_error,
                } => {
                    self.state = new_state;
                    return token_or_error;
                }
                LexerStateTransition::ChangeStateAndEmitAndPutBack {
                    new_state,
                    token_or_error,
                    put_back,
                } => {
                    self.state = new_state;
                    self.put_back_char(put_back);

                    return token_or_error;
                }
                LexerStateTransition::ChangeStateAndEmitAndPutBackTwo {
                    new_state,
                    token_or_error,
                    put_back,
                } => {
                    self.state = new_state;
                    self.put_back_two_chars(put_back.0, put_back.1);

                    return token_or_error;
                }
            }
        }
    }
}
