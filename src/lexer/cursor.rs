use super::token::{Position, Span, SpanIndex};

#[derive(Debug, Clone, Copy)]
pub struct SourceChar {
    pub value: char,
    pub offset: SpanIndex,
    pub line: u32,
    pub column: u32,
}

impl SourceChar {
    pub fn next_offset(&self) -> SpanIndex {
        self.offset + self.value.len_utf8()
    }

    /// The position of a token starting at this character and ending just before `end`.
    pub fn position_until(&self, end: SpanIndex) -> Position {
        Position {
            line: self.line,
            column: self.column,
            span: Span::new(self.offset, end - self.offset),
        }
    }

    pub fn position(&self) -> Position {
        self.position_until(self.next_offset())
    }
}
