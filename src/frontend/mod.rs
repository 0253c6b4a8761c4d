use std::path::PathBuf;

use colored::Colorize;

use self::lexer::Span;

pub mod ast;
pub mod lexer;
pub mod parser;

#[derive(Debug)]
pub struct SourceFile {
    pub contents: String,
    pub origin: SourceFileOrigin,
}

impl SourceFile {
    pub fn value_of_span(&self, span: Span) -> &str {
        &self.contents[span.start..span.end]
    }

    /// 1-based line number of the line containing `position`.
    pub fn row_for_position(&self, position: usize) -> usize {
        let position = position.min(self.contents.len());

        self.contents[..position]
            .bytes()
            .filter(|byte| *byte == b'\n')
            .count()
            + 1
    }

    /// 1-based column of `position` within its line.
    pub fn column_for_position(&self, position: usize) -> usize {
        let position = position.min(self.contents.len());

        position - self.line_start(position) + 1
    }

    /// Prints the line containing `span` to stderr with carets underneath
    /// the offending range.
    pub fn highlight_span(&self, span: Span) {
        let start = span.start.min(self.contents.len());
        let line_start = self.line_start(start);
        let line_end = self.contents[line_start..]
            .find('\n')
            .map(|offset| line_start + offset)
            .unwrap_or(self.contents.len());

        let carets = span.end.clamp(start, line_end).saturating_sub(start).max(1);

        eprintln!("{}", &self.contents[line_start..line_end]);
        eprintln!(
            "{}{}",
            " ".repeat(start - line_start),
            "^".repeat(carets).red().bold()
        );
    }

    fn line_start(&self, position: usize) -> usize {
        self.contents[..position]
            .rfind('\n')
            .map(|index| index + 1)
            .unwrap_or(0)
    }
}

#[derive(Debug)]
pub enum SourceFileOrigin {
    Memory,
    File(PathBuf),
}

impl core::fmt::Display for SourceFileOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFileOrigin::Memory => f.write_str("<expression>"),
            SourceFileOrigin::File(path) => f.write_fmt(format_args!("{}", path.display())),
        }
    }
}

/// A tokenizing or parsing failure, positioned within the source it came
/// from. The driver renders the position and caret line; `Display` is just
/// the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub span: Span,
    pub message: String,
}

impl SyntaxError {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

impl core::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SyntaxError {}

// ── Tests ────────────────────────────────────────────────────────────────────
