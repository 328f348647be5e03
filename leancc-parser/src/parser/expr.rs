use super::*;
use crate::ast::{Expr, Precedence};

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses any expression.
    /// This is equivalent to calling [`Self::parse_expr_prec`] with [`Precedence::None`].
    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_expr_prec(Precedence::None)
    }

    /// Parses a primary (atom) expression.
    fn parse_primary_expr(&mut self) -> ParseResult<Expr> {
        match self.current.token {
            Token::Number(value) => {
                self.next();
                Ok(Expr::Number(value))
            }
            Token::Identifier(_) => self.parse_identifier_expr(),
            Token::OpenParen => {
                self.next();
                let expr = self.parse_expr()?;
                self.expect(Token::CloseParen)?;
                Ok(expr)
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Parses an expression whose binary operators all bind at least as tightly as `min_prec`.
    /// To parse any expression use, [`Self::parse_expr`].
    fn parse_expr_prec(&mut self, min_prec: Precedence) -> ParseResult<Expr> {
        self.nested(|this| this.parse_binary_chain(min_prec))
    }

    fn parse_binary_chain(&mut self, min_prec: Precedence) -> ParseResult<Expr> {
        let mut lhs = self.parse_primary_expr()?;

        loop {
            if self.at(&Token::Equals) {
                // identifiers followed by `=` are consumed by parse_identifier_expr
                return Err(self.error_at_current(ParseError::InvalidAssignmentTarget));
            }

            let op = match self.current.token.binary_op() {
                Some(op) => op,
                None => break, // not a valid binop, stop parsing
            };
            if op.precedence() < min_prec {
                break; // binds looser than the caller allows, stop parsing
            }
            // the left operand sinks one level deeper with every operator
            self.descend()?;
            self.next();

            let rhs = self.parse_expr_prec(op.precedence().next())?;

            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    /* Expressions.Identifier */
    /// Parses a variable reference, an assignment or a call expression.
    fn parse_identifier_expr(&mut self) -> ParseResult<Expr> {
        let ident = self.expect_ident("identifier")?;

        if self.at(&Token::OpenParen) {
            return self.parse_call_expr(ident);
        }

        self.resolve_variable(&ident)?;
        if self.eat(Token::Equals) {
            // right associative: the value is a full expression
            let value = self.parse_expr()?;
            Ok(Expr::Assignment {
                target: ident,
                value: Box::new(value),
            })
        } else {
            Ok(Expr::Variable(ident))
        }
    }

    /// Parses the argument list of a call to `callee`.
    /// The callee is not resolved and the argument count is not checked.
    fn parse_call_expr(&mut self, callee: Ident) -> ParseResult<Expr> {
        self.expect(Token::OpenParen)?;

        let mut args = Vec::new();
        if !self.eat(Token::CloseParen) {
            loop {
                args.push(self.parse_expr()?);

                if self.eat(Token::CloseParen) {
                    break;
                } else if !self.eat(Token::Comma) {
                    return Err(self.unexpected("`,` or `)`"));
                }
            }
        }

        Ok(Expr::Call { callee, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOp;
    use insta::assert_snapshot;
    use leancc_source::{ErrorKind, Position};

    /// Parses `source` as an expression in a scope where `a`, `b` and `c` are declared variables.
    fn parse(source: &str) -> ParseResult<Expr> {
        let source = source.into();
        let mut parser = Parser::new(&source);
        for name in &["a", "b", "c"] {
            parser
                .scopes
                .declare(name, SymbolKind::Variable, Position::start())
                .unwrap();
        }
        let expr = parser.parse_expr()?;
        parser.expect(Token::Eof)?;
        Ok(expr)
    }

    fn expr(source: &str) -> String {
        parse(source).unwrap().to_string()
    }

    #[test]
    fn test_literal() {
        assert_eq!(parse("1").unwrap(), Expr::Number(1));
        assert_eq!(parse("9223372036854775807").unwrap(), Expr::Number(i64::MAX));
    }

    #[test]
    fn test_binary_expr() {
        assert_snapshot!(expr("1 + 2 * 3"), @"(+ 1 (* 2 3))");
        assert_snapshot!(expr("(2 + 3) * 4"), @"(* (+ 2 3) 4)");
        assert_snapshot!(expr("1 == 2 - 1"), @"(== 1 (- 2 1))");
        assert_snapshot!(expr("a < b == b >= c"), @"(== (< a b) (>= b c))");
        assert_snapshot!(expr("2 * (3 + 4 * (5 + 1))"), @"(* 2 (+ 3 (* 4 (+ 5 1))))");
    }

    #[test]
    fn test_left_associativity() {
        let parsed = parse("10 - 2 - 3").unwrap();
        assert_eq!(
            parsed,
            Expr::Binary {
                op: BinaryOp::Subtract,
                lhs: Box::new(Expr::Binary {
                    op: BinaryOp::Subtract,
                    lhs: Box::new(Expr::Number(10)),
                    rhs: Box::new(Expr::Number(2)),
                }),
                rhs: Box::new(Expr::Number(3)),
            }
        );
        assert_snapshot!(expr("2 * 2 * 2"), @"(* (* 2 2) 2)"); // should be (2 * 2) * 2
        assert_snapshot!(expr("8 / 4 / 2"), @"(/ (/ 8 4) 2)");
    }

    #[test]
    fn test_assignment() {
        assert_snapshot!(expr("a = b = c"), @"(= a (= b c))"); // should be a = (b = c)
        assert_snapshot!(expr("a = 1 + 2 * b"), @"(= a (+ 1 (* 2 b)))");
        assert_snapshot!(expr("1 + (a = 2)"), @"(+ 1 (= a 2))");
    }

    #[test]
    fn test_invalid_assignment_target() {
        for source in &["1 = 2", "(a) = 1", "a + 1 = 2", "f() = 1", "a = 1 = 2"] {
            let err = parse(source).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Syntax, "{}", source);
            assert_eq!(err.message, "invalid assignment target");
        }
    }

    #[test]
    fn test_identifier() {
        assert_snapshot!(expr("a"), @"a");
        let err = parse("a + foo").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Semantic);
        assert_eq!(err.message, "use of undeclared identifier `foo`");
        assert_eq!(err.position, Position::new(1, 5));

        let err = parse("foo = 1").unwrap_err();
        assert_eq!(err.message, "use of undeclared identifier `foo`");
    }

    #[test]
    fn test_fn_call() {
        assert_snapshot!(expr("foo()"), @"(call foo)");
        assert_snapshot!(expr("foo(1, b)"), @"(call foo 1 b)");
        assert_snapshot!(expr("foo(1, bar(a + 1), baz())"), @"(call foo 1 (call bar (+ a 1)) (call baz))");
        assert_snapshot!(expr("f(1) + f(2) * 3"), @"(+ (call f 1) (* (call f 2) 3))");

        match &parse("f(1, 2, 3)").unwrap() {
            Expr::Call { callee, args } => {
                assert_eq!(callee.name, "f");
                assert_eq!(args.len(), 3);
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        let chain = |terms: usize| vec!["1"; terms].join(" + ");
        assert_eq!(parse(&nested(100)).unwrap(), Expr::Number(1));
        assert!(parse(&chain(200)).is_ok());

        let err = parse(&nested(20_000)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(
            err.message,
            "expression or block nests too deeply (limit is 256 levels)"
        );
        // the 257th `(` would be the 257th level
        assert_eq!(err.position, Position::new(1, 257));

        // a flat chain builds a left leaning tree just as deep
        let err = parse(&chain(200_000)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(
            err.message,
            "expression or block nests too deeply (limit is 256 levels)"
        );
    }

    #[test]
    fn test_syntax_errors() {
        let err = parse("(1 + 2").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.message, "expected `)`, found end of input");
        assert_eq!(err.position, Position::new(1, 7));

        let err = parse("f(1 2)").unwrap_err();
        assert_eq!(err.message, "expected `,` or `)`, found number `2`");

        let err = parse("1 + * 2").unwrap_err();
        assert_eq!(err.message, "expected expression, found `*`");
        assert_eq!(err.position, Position::new(1, 5));

        let err = parse("f(1,)").unwrap_err();
        assert_eq!(err.message, "expected expression, found `)`");
    }
}
