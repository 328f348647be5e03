//! Node counts of a validated program.

use leancc_parser::ast::{Expr, Function, Program, Stmt};
use leancc_parser::visitor::{walk_block, walk_expr, walk_program, walk_stmt, Visitor};
use std::fmt;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AstStats {
    pub functions: usize,
    /// Top level variable declarations.
    pub globals: usize,
    pub statements: usize,
    pub expressions: usize,
    pub calls: usize,
}

impl AstStats {
    pub fn collect(program: &Program) -> Self {
        let mut stats = Self::default();
        stats.visit_program(program);
        stats
    }
}

impl<'ast> Visitor<'ast> for AstStats {
    fn visit_program(&mut self, program: &'ast Program) {
        self.globals = program.decls.len();
        walk_program(self, program);
        self.globals -= self.functions;
    }

    fn visit_function(&mut self, function: &'ast Function) {
        self.functions += 1;
        walk_block(self, &function.body);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        self.statements += 1;
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        self.expressions += 1;
        if let Expr::Call { .. } = expr {
            self.calls += 1;
        }
        walk_expr(self, expr);
    }
}

impl fmt::Display for AstStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} functions, {} globals, {} statements, {} expressions ({} calls)",
            self.functions, self.globals, self.statements, self.expressions, self.calls
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leancc_source::Source;

    #[test]
    fn test_counts() {
        let source = Source::new(
            "int g = 2;
            int sq(int x) { return x * x; }
            int main() {
                int i = 0;
                while (i < g) { i = i + sq(i); }
                return i;
            }",
        );
        let program = leancc_parser::parse(&source).unwrap();
        let stats = AstStats::collect(&program);
        assert_eq!(
            stats,
            AstStats {
                functions: 2,
                globals: 1,
                // return, int i, while, assignment, return
                statements: 5,
                // g: 2 | sq: x*x, x, x | main: 0, i<g, i, g, i=.., i+sq(i), i, sq(i), i, i
                expressions: 14,
                calls: 1,
            }
        );
        assert_eq!(
            stats.to_string(),
            "2 functions, 1 globals, 5 statements, 14 expressions (1 calls)"
        );
    }
}
