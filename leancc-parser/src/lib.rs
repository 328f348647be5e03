//! Lexer, scope table and recursive descent parser for the leancc language.
//!
//! Parsing and scope checking happen in a single pass: [`parser::Parser::parse_program`] either returns a
//! fully validated [`ast::Program`] or the first lexical, syntax or semantic error.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod scope;
pub mod visitor;

use leancc_source::{Diagnostic, Source};

/// Parses `source` into a validated [`ast::Program`].
pub fn parse(source: &Source) -> Result<ast::Program, Diagnostic> {
    parser::Parser::new(source).parse_program()
}
