use crate::ast::BinaryOp;
use leancc_source::Position;
use logos::Logos;
use std::{fmt, ops::Range};

#[derive(Debug, Logos, Clone, PartialEq)]
pub enum Token {
    // literals
    /// A decimal literal. Literals that do not fit in an `i64` lex as [`Token::Error`].
    #[regex("[0-9]+", |lex| lex.slice().parse())]
    Number(i64),

    // identifiers
    #[regex("[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // binary operators
    // - arithmetics
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash,
    // - assignment
    #[token("=")]
    Equals,
    // - equality
    #[token("==")]
    EqualsEquals,
    #[token("!=")]
    NotEquals,
    // - ordering
    #[token(">")]
    GreaterThan,
    #[token(">=")]
    GreaterThanEquals,
    #[token("<")]
    LessThan,
    #[token("<=")]
    LessThanEquals,

    // punctuation
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,

    // keywords
    #[token("int")]
    Int,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,

    // misc
    #[regex(r"[ \t\n\r\f]+", logos::skip)]
    #[regex(r"//[^\n]*", logos::skip)] // single line comments
    #[error]
    Error,

    /// Only generated by [`Lexer::next_lexeme`] once the source is exhausted.
    Eof,
}

impl Token {
    /// Returns the binary operator denoted by this token or `None` if not a binary operator.
    /// Assignment (`Token::Equals`) is not a binary operator: it is parsed together with its target.
    pub fn binary_op(&self) -> Option<BinaryOp> {
        match self {
            Token::Plus => Some(BinaryOp::Add),
            Token::Minus => Some(BinaryOp::Subtract),
            Token::Asterisk => Some(BinaryOp::Multiply),
            Token::Slash => Some(BinaryOp::Divide),
            Token::EqualsEquals => Some(BinaryOp::Equal),
            Token::NotEquals => Some(BinaryOp::NotEqual),
            Token::LessThan => Some(BinaryOp::Less),
            Token::GreaterThan => Some(BinaryOp::Greater),
            Token::LessThanEquals => Some(BinaryOp::LessEqual),
            Token::GreaterThanEquals => Some(BinaryOp::GreaterEqual),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let punct = match self {
            Token::Number(value) => return write!(f, "number `{}`", value),
            Token::Identifier(ident) => return write!(f, "identifier `{}`", ident),
            Token::Error => return f.write_str("invalid token"),
            Token::Eof => return f.write_str("end of input"),
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Asterisk => "*",
            Token::Slash => "/",
            Token::Equals => "=",
            Token::EqualsEquals => "==",
            Token::NotEquals => "!=",
            Token::GreaterThan => ">",
            Token::GreaterThanEquals => ">=",
            Token::LessThan => "<",
            Token::LessThanEquals => "<=",
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            Token::OpenBrace => "{",
            Token::CloseBrace => "}",
            Token::Comma => ",",
            Token::Semi => ";",
            Token::Int => "int",
            Token::Return => "return",
            Token::If => "if",
            Token::Else => "else",
            Token::While => "while",
        };
        write!(f, "`{}`", punct)
    }
}

/// A token together with its location in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub token: Token,
    /// Byte range of the token.
    pub span: Range<usize>,
    /// Line and column of the first character of the token.
    pub position: Position,
}

/// Pull-based tokenizer producing [`Lexeme`]s on demand.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, Token>,
    source: &'a str,
    /// Byte offset that `position` corresponds to.
    offset: usize,
    position: Position,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: Token::lexer(source),
            source,
            offset: 0,
            position: Position::start(),
        }
    }

    /// Returns the next lexeme, skipping whitespace and comments.
    /// Once the source is exhausted, every call returns a [`Token::Eof`] lexeme located at the end.
    pub fn next_lexeme(&mut self) -> Lexeme {
        match self.inner.next() {
            Some(token) => {
                let span = self.inner.span();
                let position = self.seek(span.start);
                Lexeme {
                    token,
                    span,
                    position,
                }
            }
            None => {
                let end = self.source.len();
                let position = self.seek(end);
                Lexeme {
                    token: Token::Eof,
                    span: end..end,
                    position,
                }
            }
        }
    }

    /// Moves the line/column bookkeeping forward to `offset`.
    fn seek(&mut self, offset: usize) -> Position {
        let bytes = self.source.as_bytes();
        if offset > self.offset && offset <= bytes.len() {
            self.position = self.position.advance(&bytes[self.offset..offset]);
            self.offset = offset;
        }
        self.position
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Lexeme;

    /// Same as [`Lexer::next_lexeme`] but returns `None` instead of [`Token::Eof`].
    fn next(&mut self) -> Option<Lexeme> {
        let lexeme = self.next_lexeme();
        if lexeme.token == Token::Eof {
            None
        } else {
            Some(lexeme)
        }
    }
}
