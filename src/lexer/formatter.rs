use super::token::{Span, Token, TokenKind};
use crate::lexer::{Lexer, LexicalError, LexicalErrorKind};
use ariadne::{Color, Label, Report, ReportKind, Source};

/// Interface for creating new token formatters.
pub trait TokenFormatter {
    /// Formats a token into a string.
    fn format(&self, token: &Token) -> String;
    /// Formats a lexer error into a string.
    fn format_lexical_error(&self, error: &LexicalError) -> String;
}

pub trait ToFormatter<F>
where
    F: TokenFormatter,
{
    fn create_formatter(&self) -> F;
}

pub struct BasicFormatter<'src> {
    text: &'src str,
}

impl<'src> ToFormatter<BasicFormatter<'src>> for Lexer<'src> {
    fn create_formatter(&self) -> BasicFormatter<'src> {
        BasicFormatter {
            text: self.get_source(),
        }
    }
}

impl<'src> TokenFormatter for BasicFormatter<'src> {
    fn format(&self, token: &Token) -> String {
        let lexeme = &self.text[token.span().range()];
        match token.kind {
            TokenKind::Eof => format!("{} {}", token.position, token.kind),
            TokenKind::NumericLiteral => {
                let value: f64 = lexeme
                    .parse()
                    .expect("Numeric literals are guaranteed to be parseable into f64.");
                format!("{} {} {lexeme} {value:?}", token.position, token.kind)
            }
            kind => format!("{} {kind} {lexeme}", token.position),
        }
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        match error.kind {
            LexicalErrorKind::Unrecognized(c) => {
                format!("[{}] Error: Unexpected character: {c}", error.position)
            }
        }
    }
}

pub struct DebugFormatter;

impl<'src> ToFormatter<DebugFormatter> for Lexer<'src> {
    fn create_formatter(&self) -> DebugFormatter {
        DebugFormatter {}
    }
}

impl TokenFormatter for DebugFormatter {
    fn format(&self, token: &Token) -> String {
        format!("{token:?}")
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        format!("{error:?}")
    }
}

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

/// Renders a single-label ariadne report into a string.
pub(crate) fn write_report(
    path: &str,
    text: &str,
    code: &str,
    message: &str,
    span: Span,
    label: String,
) -> String {
    let mut output = std::io::Cursor::new(Vec::new());
    Report::build(ReportKind::Error, (path, span.range()))
        .with_code(code)
        .with_message(message)
        .with_label(
            Label::new((path, span.range()))
                .with_message(label)
                .with_color(Color::BrightRed),
        )
        .finish()
        .write((path, Source::from(text)), &mut output)
        .expect(ARIADNE_WRITE_MSG);
    String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
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

impl<'src> TokenFormatter for PrettyFormatter<'src> {
    fn format(&self, token: &Token) -> String {
        BasicFormatter { text: self.text }.format(token)
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        match error.kind {
            LexicalErrorKind::Unrecognized(c) => write_report(
                self.path,
                self.text,
                error.code(),
                "Unexpected character",
                error.position.span,
                format!("{c:?} does not start any token"),
            ),
        }
    }
}
