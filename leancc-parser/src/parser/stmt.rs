use super::*;
use crate::ast::{Block, Decl, Expr, Function, Stmt, VarDecl};

impl<'a> Parser<'a> {
    /// Parses a top level declaration: `int name (...) { ... }` or `int name ( = expr )? ;`.
    pub fn parse_declaration(&mut self) -> ParseResult<Decl> {
        self.expect(Token::Int)?;

        // `int name (` starts a function, anything else after the name is a variable
        if let Token::Identifier(_) = self.current.token {
            if *self.peek() == Token::OpenParen {
                return self.parse_fn_declaration().map(Decl::Function);
            }
        }
        self.parse_var_declaration().map(Decl::Variable)
    }

    /// Parses a statement.
    pub fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        match self.current.token {
            Token::Int => {
                self.next();
                self.parse_var_declaration().map(Stmt::VarDecl)
            }
            Token::If => self.parse_if_stmt(),
            Token::While => self.parse_while_stmt(),
            Token::Return => self.parse_return_stmt(),
            Token::Identifier(_) => {
                // expression statement
                let expr = self.parse_expr()?;
                self.expect(Token::Semi)?;
                Ok(Stmt::Expr(expr))
            }
            _ => Err(self.unexpected("statement")),
        }
    }

    /// Parses `{ stmt* }`. Does not open a scope: declarations land in the enclosing one.
    pub fn parse_block(&mut self) -> ParseResult<Block> {
        self.nested(|this| {
            this.expect(Token::OpenBrace)?;

            let mut stmts = Vec::new();
            while !this.eat(Token::CloseBrace) {
                stmts.push(this.parse_stmt()?);
            }

            Ok(Block { stmts })
        })
    }

    /// Parses the rest of a variable declaration after `int`.
    fn parse_var_declaration(&mut self) -> ParseResult<VarDecl> {
        let name = self.expect_ident("variable name")?;
        self.declare(&name, SymbolKind::Variable)?;

        let initializer = if self.eat(Token::Equals) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(Token::Semi)?;

        Ok(VarDecl { name, initializer })
    }

    /// Parses the rest of a function declaration after `int`.
    ///
    /// Parameters live in their own scope and the body in a nested one, so a body local may shadow a parameter.
    fn parse_fn_declaration(&mut self) -> ParseResult<Function> {
        let name = self.expect_ident("function name")?;
        // declared before the body to allow for recursion
        self.declare(&name, SymbolKind::Function)?;

        self.with_scope(|this| {
            this.expect(Token::OpenParen)?;
            let params = this.parse_params()?;
            let body = this.with_scope(Self::parse_block)?;
            Ok(Function { name, params, body })
        })
    }

    /// Parses `( int a, int b )` up to and including the closing paren, declaring every parameter.
    fn parse_params(&mut self) -> ParseResult<Vec<Ident>> {
        let mut params = Vec::new();
        if self.eat(Token::CloseParen) {
            return Ok(params);
        }

        loop {
            self.expect(Token::Int)?;
            let param = self.expect_ident("parameter name")?;
            self.declare(&param, SymbolKind::Variable)?;
            params.push(param);

            if self.eat(Token::CloseParen) {
                break;
            } else if !self.eat(Token::Comma) {
                return Err(self.unexpected("`,` or `)`"));
            }
        }

        Ok(params)
    }

    fn parse_if_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(Token::If)?;
        let condition = self.parse_condition()?;
        let then_block = self.parse_block()?;
        let else_block = if self.eat(Token::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_block,
            else_block,
        })
    }

    fn parse_while_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(Token::While)?;
        let condition = self.parse_condition()?;
        let body = self.parse_block()?;
        Ok(Stmt::While { condition, body })
    }

    fn parse_return_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(Token::Return)?;
        let expr = self.parse_expr()?;
        self.expect(Token::Semi)?;
        Ok(Stmt::Return(expr))
    }

    /// Parses `( expr )`.
    fn parse_condition(&mut self) -> ParseResult<Expr> {
        self.expect(Token::OpenParen)?;
        let condition = self.parse_expr()?;
        self.expect(Token::CloseParen)?;
        Ok(condition)
    }
}
