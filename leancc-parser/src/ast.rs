//! Abstract syntax tree.
//!
//! Every node exclusively owns its children through [`Box`] and [`Vec`], so the tree has no sharing
//! and no back edges. Dropping a node drops its whole subtree.

use leancc_source::Position;
use std::{fmt, mem, ops::Range};

/// An identifier occurrence (e.g. `foo`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Range<usize>,
    pub position: Position,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Range<usize>, position: Position) -> Self {
        Self {
            name: name.into(),
            span,
            position,
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
}

impl BinaryOp {
    pub fn precedence(self) -> Precedence {
        match self {
            BinaryOp::Equal | BinaryOp::NotEqual => Precedence::Equality,
            BinaryOp::Less | BinaryOp::Greater | BinaryOp::LessEqual | BinaryOp::GreaterEqual => {
                Precedence::Comparison
            }
            BinaryOp::Add | BinaryOp::Subtract => Precedence::Term,
            BinaryOp::Multiply | BinaryOp::Divide => Precedence::Factor,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEqual => "<=",
            BinaryOp::GreaterEqual => ">=",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binding strength of operators, from loosest to tightest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Accepts any expression.
    None,
    /// `=`, right associative.
    Assignment,
    /// `==` `!=`
    Equality,
    /// `<` `>` `<=` `>=`
    Comparison,
    /// `+` `-`
    Term,
    /// `*` `/`
    Factor,
    Primary,
}

impl Precedence {
    /// The next tighter level. Parsing a right operand at `op.precedence().next()` makes `op` left associative.
    pub fn next(self) -> Precedence {
        match self {
            Precedence::None => Precedence::Assignment,
            Precedence::Assignment => Precedence::Equality,
            Precedence::Equality => Precedence::Comparison,
            Precedence::Comparison => Precedence::Term,
            Precedence::Term => Precedence::Factor,
            Precedence::Factor | Precedence::Primary => Precedence::Primary,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A 64-bit integer literal (e.g. `42`).
    Number(i64),
    /// A reference to a declared variable.
    Variable(Ident),
    /// A binary expression (e.g. `1+1`).
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// An assignment to a declared variable (e.g. `x = 1`). Evaluates to the assigned value.
    Assignment { target: Ident, value: Box<Expr> },
    /// A function call (e.g. `foo(1, x)`).
    Call { callee: Ident, args: Vec<Expr> },
}

impl Expr {
    /// Moves the sub-expressions of `self` into `out`, leaving literals in their place.
    fn take_children(&mut self, out: &mut Vec<Expr>) {
        match self {
            Expr::Number(_) | Expr::Variable(_) => {}
            Expr::Binary { lhs, rhs, .. } => {
                out.push(mem::replace(&mut **lhs, Expr::Number(0)));
                out.push(mem::replace(&mut **rhs, Expr::Number(0)));
            }
            Expr::Assignment { value, .. } => out.push(mem::replace(&mut **value, Expr::Number(0))),
            Expr::Call { args, .. } => out.append(args),
        }
    }
}

/// Drops the tree with an explicit stack so that a long operator chain cannot overflow the call stack.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut expr) = pending.pop() {
            expr.take_children(&mut pending);
        }
    }
}

/// A `{ ... }` delimited statement list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

/// `int name;` or `int name = initializer;`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: Ident,
    pub initializer: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl(VarDecl),
    If {
        condition: Expr,
        then_block: Block,
        else_block: Option<Block>,
    },
    While {
        condition: Expr,
        body: Block,
    },
    Return(Expr),
    /// An expression followed by `;`.
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Block,
}

/// A top level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Function(Function),
    Variable(VarDecl),
}

/// The root of the tree: every top level declaration in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub decls: Vec<Decl>,
}

impl Program {
    /// Returns the function named `name`, if declared.
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.decls.iter().find_map(|decl| match decl {
            Decl::Function(function) if function.name.name == name => Some(function),
            _ => None,
        })
    }
}

/* S-expression rendering */

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(value) => write!(f, "{}", value),
            Expr::Variable(ident) => write!(f, "{}", ident),
            Expr::Binary { op, lhs, rhs } => write!(f, "({} {} {})", op, lhs, rhs),
            Expr::Assignment { target, value } => write!(f, "(= {} {})", target, value),
            Expr::Call { callee, args } => {
                write!(f, "(call {}", callee)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(block")?;
        for stmt in &self.stmts {
            write!(f, " {}", stmt)?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for VarDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.initializer {
            Some(initializer) => write!(f, "(int {} {})", self.name, initializer),
            None => write!(f, "(int {})", self.name),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::VarDecl(decl) => write!(f, "{}", decl),
            Stmt::If {
                condition,
                then_block,
                else_block: Some(else_block),
            } => write!(f, "(if {} {} {})", condition, then_block, else_block),
            Stmt::If {
                condition,
                then_block,
                else_block: None,
            } => write!(f, "(if {} {})", condition, then_block),
            Stmt::While { condition, body } => write!(f, "(while {} {})", condition, body),
            Stmt::Return(expr) => write!(f, "(return {})", expr),
            Stmt::Expr(expr) => write!(f, "{}", expr),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(fn {} (", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ") {})", self.body)
    }
}

impl fmt::Display for Decl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decl::Function(function) => write!(f, "{}", function),
            Decl::Variable(decl) => write!(f, "{}", decl),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(program")?;
        for decl in &self.decls {
            write!(f, " {}", decl)?;
        }
        f.write_str(")")
    }
}
