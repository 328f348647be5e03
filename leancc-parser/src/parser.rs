use crate::ast::{Ident, Program};
use crate::error::ParseError;
use crate::lexer::{Lexeme, Lexer, Token};
use crate::scope::{ScopeTable, SymbolKind};
use leancc_source::{Diagnostic, Source};
use std::{fmt, mem};

mod expr;
mod stmt;

pub type ParseResult<T> = Result<T, Diagnostic>;

/// Maximum number of nested expression and block levels.
/// Every operand, parenthesized expression, call argument, block and left associated operator
/// uses one level, which keeps the height of any parsed tree bounded.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Recursive descent parser with interleaved scope checking.
///
/// Every parse function either returns a complete node or the first error encountered. Partially built
/// nodes are owned by the failing stack frames and dropped as the error propagates.
pub struct Parser<'a> {
    /// Cached token for peeking.
    current: Lexeme,
    /// The token after `current`, only filled when a declaration needs two tokens of look-ahead.
    peeked: Option<Lexeme>,
    lexer: Lexer<'a>,
    scopes: ScopeTable,
    /// Nesting levels in use, see [`MAX_NESTING_DEPTH`].
    depth: usize,
    /// Source code
    source: &'a Source<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a Source<'a>) -> Self {
        let mut lexer = Lexer::new(source.content);
        Self {
            current: lexer.next_lexeme(),
            peeked: None,
            lexer,
            scopes: ScopeTable::new(),
            depth: 0,
            source,
        }
    }

    /// Parses a whole translation unit.
    /// On failure the error is also recorded in the [`Source`]'s error reporter.
    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let result = self.parse_decls();
        if let Err(error) = &result {
            log::debug!("parse failed: {}", error);
            self.source.errors.add_error(error.clone());
        }
        result
    }

    /// The current scope depth. `0` is global scope.
    pub fn scope_depth(&self) -> usize {
        self.scopes.depth()
    }

    fn parse_decls(&mut self) -> ParseResult<Program> {
        let mut decls = Vec::new();
        while self.current.token != Token::Eof {
            decls.push(self.parse_declaration()?);
        }
        Ok(Program { decls })
    }
}

/// Parse utilities
impl<'a> Parser<'a> {
    /// Advances to the next token and returns the one that was current.
    fn next(&mut self) -> Lexeme {
        let next = match self.peeked.take() {
            Some(lexeme) => lexeme,
            None => self.lexer.next_lexeme(),
        };
        mem::replace(&mut self.current, next)
    }

    /// Returns the token after the current one without consuming anything.
    fn peek(&mut self) -> &Token {
        let lexer = &mut self.lexer;
        &self.peeked.get_or_insert_with(|| lexer.next_lexeme()).token
    }

    /// Predicate that tests whether the current token has the same discriminant as `tok`.
    fn at(&self, tok: &Token) -> bool {
        mem::discriminant(&self.current.token) == mem::discriminant(tok)
    }

    /// Predicate that tests whether the next token has the same discriminant and eats the next token if yes as a side effect.
    fn eat(&mut self, tok: Token) -> bool {
        if self.at(&tok) {
            self.next(); // eat token
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: Token) -> ParseResult<Lexeme> {
        if self.at(&tok) {
            Ok(self.next())
        } else {
            Err(self.unexpected(tok))
        }
    }

    /// Eats an identifier, taking ownership of its text.
    fn expect_ident(&mut self, what: &str) -> ParseResult<Ident> {
        if let Token::Identifier(name) = &mut self.current.token {
            let ident = Ident::new(
                mem::take(name),
                self.current.span.clone(),
                self.current.position,
            );
            self.next();
            Ok(ident)
        } else {
            Err(self.unexpected(what))
        }
    }

    /// Runs `f` inside a fresh child scope. The scope is popped whether `f` succeeds or not.
    fn with_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        self.scopes.push_scope();
        let result = f(self);
        self.scopes.pop_scope();
        result
    }

    /// Runs `f` one nesting level deeper.
    /// Levels taken with [`Self::descend`] while `f` runs are released when it returns.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let depth = self.depth;
        let result = self.descend().and_then(|()| f(self));
        self.depth = depth;
        result
    }

    /// Takes one more nesting level, failing at the current token once none are left.
    fn descend(&mut self) -> ParseResult<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error_at_current(ParseError::NestingTooDeep(MAX_NESTING_DEPTH)));
        }
        self.depth += 1;
        Ok(())
    }

    /// Declares `ident` in the current scope.
    fn declare(&mut self, ident: &Ident, kind: SymbolKind) -> ParseResult<()> {
        self.scopes
            .declare(&ident.name, kind, ident.position)
            .map_err(|duplicate| {
                Self::error_at_ident(
                    ParseError::DuplicateDeclaration {
                        name: ident.name.clone(),
                        previous: duplicate.existing.position,
                    },
                    ident,
                )
            })
    }

    /// Checks that `ident` refers to a variable visible from the current scope.
    fn resolve_variable(&self, ident: &Ident) -> ParseResult<()> {
        match self.scopes.resolve(&ident.name) {
            Some(symbol) if symbol.kind == SymbolKind::Variable => Ok(()),
            Some(_) => Err(Self::error_at_ident(
                ParseError::NotAVariable(ident.name.clone()),
                ident,
            )),
            None => Err(Self::error_at_ident(
                ParseError::UndeclaredIdentifier(ident.name.clone()),
                ident,
            )),
        }
    }

    /// Creates an error located at the current token.
    /// If the current token is invalid, the error is a lexical error describing it instead.
    fn unexpected(&self, expected: impl fmt::Display) -> Diagnostic {
        let cause = match &self.current.token {
            Token::Error => self.lexical_error(),
            found => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: found.to_string(),
            },
        };
        self.error_at_current(cause)
    }

    fn lexical_error(&self) -> ParseError {
        let content = self.source.content;
        let text = content.get(self.current.span.clone()).unwrap_or_default();
        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            ParseError::IntegerOutOfRange(text.to_string())
        } else if text == "!" {
            ParseError::IncompleteOperator
        } else {
            let c = content
                .get(self.current.span.start..)
                .and_then(|rest| rest.chars().next())
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            ParseError::UnrecognizedCharacter(c)
        }
    }

    fn error_at_current(&self, cause: ParseError) -> Diagnostic {
        Diagnostic::new(
            cause.kind(),
            cause,
            self.current.span.clone(),
            self.current.position,
        )
    }

    fn error_at_ident(cause: ParseError, ident: &Ident) -> Diagnostic {
        Diagnostic::new(cause.kind(), cause, ident.span.clone(), ident.position)
    }
}
