//! Compiler driver: reads source files, runs the front end and hands the validated AST on.

pub mod report;
pub mod stats;

use leancc_parser::ast::Program;
use leancc_source::{Diagnostic, ErrorKind, Source};
use stats::AstStats;
use std::{error, fmt, fs, path::Path};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum length, in characters, of [`CompileError::message`].
pub const MAX_MESSAGE_LEN: usize = 255;

pub fn version_string() -> &'static str {
    VERSION
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Syntax,
    Semantic,
    Io,
}

impl From<ErrorKind> for ErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Lexical | ErrorKind::Syntax => ErrorCode::Syntax,
            ErrorKind::Semantic => ErrorCode::Semantic,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorCode::Syntax => "syntax",
            ErrorCode::Semantic => "semantic",
            ErrorCode::Io => "io",
        })
    }
}

/// The error reported to the user when compilation fails.
/// `line` and `column` are 1-based, or `0` when the error is not tied to a source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub code: ErrorCode,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl CompileError {
    /// Creates a new error. `message` is truncated to [`MAX_MESSAGE_LEN`] characters.
    pub fn new(code: ErrorCode, message: impl ToString, line: usize, column: usize) -> Self {
        let mut message = message.to_string();
        if let Some((end, _)) = message.char_indices().nth(MAX_MESSAGE_LEN) {
            message.truncate(end);
        }
        Self {
            code,
            message,
            line,
            column,
        }
    }

    /// Returns `true` if the error points into the source.
    pub fn has_location(&self) -> bool {
        self.line > 0
    }
}

impl From<Diagnostic> for CompileError {
    fn from(diagnostic: Diagnostic) -> Self {
        CompileError::new(
            diagnostic.kind.into(),
            diagnostic.message,
            diagnostic.position.line,
            diagnostic.position.column,
        )
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_location() {
            write!(f, "{} error at {}:{}: {}", self.code, self.line, self.column, self.message)
        } else {
            write!(f, "{} error: {}", self.code, self.message)
        }
    }
}

impl error::Error for CompileError {}

/// Reads the source file at `path`.
pub fn read_source(path: &Path) -> Result<String, CompileError> {
    fs::read_to_string(path).map_err(|err| {
        CompileError::new(
            ErrorCode::Io,
            format!("could not read `{}`: {}", path.display(), err),
            0,
            0,
        )
    })
}

/// Parses and validates `content`. Fails with the first error recorded for the source.
pub fn compile_source(content: &str) -> Result<Program, CompileError> {
    let source = Source::new(content);
    let parsed = leancc_parser::parse(&source);
    if let Some(error) = source.errors.first() {
        log::debug!("{}", source.errors.to_string().trim_end());
        return Err(error.into());
    }

    let program = parsed?;
    log::info!("parsed {}", AstStats::collect(&program));
    Ok(program)
}

/// Hands a validated program to the code generator.
pub fn generate(program: &Program, output: &Path) {
    // TODO: lower `program` to assembly once a backend exists.
    log::warn!(
        "code generation is not implemented, {} was not written ({} top level declarations validated)",
        output.display(),
        program.decls.len()
    );
}

/// Compiles the file at `input` to `output`. Returns the validated program.
pub fn compile_file(input: &Path, output: &Path) -> Result<Program, CompileError> {
    let content = read_source(input)?;
    let program = compile_source(&content)?;
    generate(&program, output);
    Ok(program)
}
