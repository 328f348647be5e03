use leancc_source::{ErrorKind, Position};
use thiserror::Error;

/// The cause of a failed parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unrecognized character `{0}`")]
    UnrecognizedCharacter(char),

    #[error("`!` must be followed by `=`")]
    IncompleteOperator,

    #[error("integer literal `{0}` is out of range for a 64-bit signed integer")]
    IntegerOutOfRange(String),

    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("invalid assignment target")]
    InvalidAssignmentTarget,

    #[error("expression or block nests too deeply (limit is {0} levels)")]
    NestingTooDeep(usize),

    #[error("use of undeclared identifier `{0}`")]
    UndeclaredIdentifier(String),

    #[error("`{name}` is already declared in this scope (previous declaration at {previous})")]
    DuplicateDeclaration { name: String, previous: Position },

    #[error("`{0}` is a function and cannot be used as a variable")]
    NotAVariable(String),
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::UnrecognizedCharacter(_)
            | ParseError::IncompleteOperator
            | ParseError::IntegerOutOfRange(_) => ErrorKind::Lexical,
            ParseError::UnexpectedToken { .. }
            | ParseError::InvalidAssignmentTarget
            | ParseError::NestingTooDeep(_) => ErrorKind::Syntax,
            ParseError::UndeclaredIdentifier(_)
            | ParseError::DuplicateDeclaration { .. }
            | ParseError::NotAVariable(_) => ErrorKind::Semantic,
        }
    }
}
