//! Source code representation and error management.

use std::{cell::RefCell, fmt, ops::Range};
use thiserror::Error;

/// Represents source code.
pub struct Source<'a> {
    /// Original source code.
    pub content: &'a str,
    /// The first error reported while compiling `content`.
    pub errors: ErrorReporter,
}

impl<'a> Source<'a> {
    /// Create a new `Source` with the specified `content`.
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            errors: ErrorReporter::new(),
        }
    }

    /// Returns `true` if `Source` has no accumulated errors. Returns `false` otherwise.
    pub fn has_no_errors(&self) -> bool {
        !self.errors.has_errors()
    }

    /// Returns the text of the 1-based `line`, without its line terminator.
    pub fn line_text(&self, line: usize) -> Option<&'a str> {
        if line == 0 {
            return None;
        }
        self.content
            .split('\n')
            .nth(line - 1)
            .map(|text| text.strip_suffix('\r').unwrap_or(text))
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(content: &'a str) -> Self {
        Source::new(content)
    }
}

/// A 1-based line/column pair. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position of the first character of a buffer.
    pub const fn start() -> Self {
        Self::new(1, 1)
    }

    /// Returns the position reached after consuming `bytes` starting at `self`.
    /// UTF-8 continuation bytes do not advance the column.
    pub fn advance(self, bytes: &[u8]) -> Self {
        bytes.iter().fold(self, |pos, &byte| match byte {
            b'\n' => Position::new(pos.line + 1, 1),
            byte if byte & 0xC0 == 0x80 => pos,
            _ => Position::new(pos.line, pos.column + 1),
        })
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Classification of a compile time error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unrecognized character or malformed token.
    Lexical,
    /// Token sequence that does not match the grammar.
    Syntax,
    /// Undeclared identifier or duplicate declaration.
    Semantic,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Lexical => "lexical",
            ErrorKind::Syntax => "syntax",
            ErrorKind::Semantic => "semantic",
        })
    }
}

/// Represents a compile time error located in the source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error at {position}: {message}")]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub message: String,
    /// Byte range of the offending token.
    pub span: Range<usize>,
    pub position: Position,
}

impl Diagnostic {
    /// Create a new diagnostic with the specified `kind`, `message` and location.
    pub fn new(
        kind: ErrorKind,
        message: impl ToString,
        span: Range<usize>,
        position: Position,
    ) -> Self {
        Self {
            kind,
            message: message.to_string(),
            span,
            position,
        }
    }
}

/// Keeps the first error reported for a [`Source`].
///
/// Compilation is fail-fast, so any later report is a consequence of the first one and is dropped.
pub struct ErrorReporter {
    first: RefCell<Option<Diagnostic>>,
}

impl ErrorReporter {
    /// Create an empty `ErrorReporter`.
    pub fn new() -> Self {
        Self {
            first: RefCell::new(None),
        }
    }

    /// Records `error` unless an earlier error was already recorded.
    /// This method uses the interior mutability pattern. This does not require mutability for ergonomics.
    pub fn add_error(&self, error: Diagnostic) {
        // This should be the only place where self.first is borrowed mutably.
        let mut first = self.first.borrow_mut();
        match &*first {
            Some(existing) => log::debug!("dropping `{}`, already reported `{}`", error, existing),
            None => *first = Some(error),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.first.borrow().is_some()
    }

    /// Returns a copy of the first reported error, if any.
    pub fn first(&self) -> Option<Diagnostic> {
        self.first.borrow().clone()
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &*self.first.borrow() {
            writeln!(f, "ERROR: {}", error)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_advance() {
        let pos = Position::start().advance(b"ab\ncd");
        assert_eq!(pos, Position::new(2, 3));
        assert_eq!(Position::start().advance("é".as_bytes()), Position::new(1, 2));
    }

    #[test]
    fn test_line_text() {
        let source = Source::new("int a;\r\nint b;\nreturn");
        assert_eq!(source.line_text(1), Some("int a;"));
        assert_eq!(source.line_text(2), Some("int b;"));
        assert_eq!(source.line_text(3), Some("return"));
        assert_eq!(source.line_text(0), None);
        assert_eq!(source.line_text(4), None);
    }

    #[test]
    fn test_first_error_wins() {
        let source = Source::new("");
        assert!(source.has_no_errors());

        let first = Diagnostic::new(ErrorKind::Syntax, "first", 0..1, Position::new(1, 1));
        let second = Diagnostic::new(ErrorKind::Semantic, "second", 2..3, Position::new(1, 3));
        source.errors.add_error(first.clone());
        source.errors.add_error(second);

        assert!(!source.has_no_errors());
        assert_eq!(source.errors.first(), Some(first));
        assert_eq!(
            source.errors.to_string(),
            "ERROR: syntax error at 1:1: first\n"
        );
    }
}
