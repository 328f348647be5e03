//! Visitor pattern for AST nodes.

use crate::ast::{Block, Decl, Expr, Function, Program, Stmt};

pub trait Visitor<'ast>: Sized {
    fn visit_program(&mut self, program: &'ast Program) {
        walk_program(self, program);
    }
    fn visit_function(&mut self, function: &'ast Function) {
        walk_block(self, &function.body);
    }
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }
    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }
}

pub fn walk_program<'ast>(visitor: &mut impl Visitor<'ast>, program: &'ast Program) {
    for decl in &program.decls {
        match decl {
            Decl::Function(function) => visitor.visit_function(function),
            Decl::Variable(decl) => {
                if let Some(initializer) = &decl.initializer {
                    visitor.visit_expr(initializer);
                }
            }
        }
    }
}

/// Iteratively visit all statements in a [`Block`].
pub fn walk_block<'ast>(visitor: &mut impl Visitor<'ast>, block: &'ast Block) {
    for stmt in &block.stmts {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_expr<'ast>(visitor: &mut impl Visitor<'ast>, expr: &'ast Expr) {
    match expr {
        Expr::Number(_) => {}
        Expr::Variable(_) => {}
        Expr::Call { callee: _, args } => {
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::Binary { op: _, lhs, rhs } => {
            visitor.visit_expr(lhs);
            visitor.visit_expr(rhs);
        }
        Expr::Assignment { target: _, value } => visitor.visit_expr(value),
    }
}

pub fn walk_stmt<'ast>(visitor: &mut impl Visitor<'ast>, stmt: &'ast Stmt) {
    match stmt {
        Stmt::VarDecl(decl) => {
            if let Some(initializer) = &decl.initializer {
                visitor.visit_expr(initializer);
            }
        }
        Stmt::If {
            condition,
            then_block,
            else_block,
        } => {
            visitor.visit_expr(condition);
            walk_block(visitor, then_block);
            if let Some(else_block) = else_block {
                walk_block(visitor, else_block);
            }
        }
        Stmt::While { condition, body } => {
            visitor.visit_expr(condition);
            walk_block(visitor, body);
        }
        Stmt::Return(expr) => visitor.visit_expr(expr),
        Stmt::Expr(expr) => visitor.visit_expr(expr),
    }
}
