use std::error::Error;

use super::error::{ExecutionError, RuntimeError};
use crate::lexer::formatter::write_report;

/// `error` followed by one indented `caused by:` line per link in its source chain.
fn cause_chain(error: &dyn Error) -> String {
    let mut buffer = format!("{error}");
    let mut cause = error.source();
    while let Some(inner) = cause {
        buffer.push_str(&format!("\n  caused by: {inner}"));
        cause = inner.source();
    }
    buffer
}

/// Every message in the chain on one line, separated by colons.
fn inline_chain(error: &dyn Error) -> String {
    let mut buffer = format!("{error}");
    let mut cause = error.source();
    while let Some(inner) = cause {
        buffer.push_str(&format!(": {inner}"));
        cause = inner.source();
    }
    buffer
}

pub trait RuntimeErrorFormatter {
    fn format_error(&self, error: &RuntimeError) -> String;
    fn format_execution_error(&self, error: &ExecutionError) -> String {
        match error {
            ExecutionError::Runtime(e) => self.format_error(e),
            ExecutionError::Close(e) => format!("{}\n  [{}]", cause_chain(error), e.code()),
        }
    }
}

pub struct DebugFormatter;

impl RuntimeErrorFormatter for DebugFormatter {
    fn format_error(&self, error: &RuntimeError) -> String {
        format!("{error:?}")
    }
}

/// One line per link in the cause chain, outermost statement first.
pub struct BasicFormatter;

impl RuntimeErrorFormatter for BasicFormatter {
    fn format_error(&self, error: &RuntimeError) -> String {
        cause_chain(error)
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

impl<'src> RuntimeErrorFormatter for PrettyFormatter<'src> {
    fn format_error(&self, error: &RuntimeError) -> String {
        let innermost = error.innermost();
        write_report(
            self.path,
            self.text,
            error.code(),
            &format!("{error}"),
            innermost.position.span,
            format!("{} error: {}", innermost.phase, inline_chain(&innermost.kind)),
        )
    }
}
