//! Statement parsing implementation
//!
//! This module handles parsing of all toyscript statement types:
//!
//! - Variable declarations: `let x = 42`, `const a = 0, b: char`
//! - Control flow: `if`/`else`, `for`, `while`
//! - Jump statements: `return`, `break`, `continue`
//! - Blocks: `{ ... }`
//! - Expression statements: function calls, assignments, `i++`
//!
//! # Grammar
//!
//! ```text
//! statement  ::= var_decl end | for_stmt | while_stmt | if_stmt
//!              | return_stmt end | ("break" | "continue") end
//!              | block | expression end
//! var_decl   ::= ("let" | "const") declarator ("," declarator)*
//! declarator ::= identifier (":" type)? ("=" expression)?
//! for_stmt   ::= "for" "(" (var_decl | expression)? ";" expression? ";" expression? ")" block
//! while_stmt ::= "while" expression block
//! if_stmt    ::= "if" expression block ("else" (if_stmt | block))?
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse block statements (inside braces, excluding the braces themselves)
    pub(crate) fn parse_block_statements(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.descend("Block")?;
        let mut statements = Vec::new();

        while !self.check(&Token::RBrace(self.current_location())) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        self.ascend(1);
        Ok(statements)
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();

        if self.check(&Token::Let(loc)) || self.check(&Token::Const(loc)) {
            let decl = self.parse_var_declaration()?;
            self.expect_statement_end("after variable declaration")?;
            return Ok(decl);
        }

        if self.match_token(&Token::For(loc)) {
            return self.parse_for_statement(loc);
        }

        if self.match_token(&Token::While(loc)) {
            return self.parse_while_statement(loc);
        }

        if self.match_token(&Token::If(loc)) {
            return self.parse_if_statement(loc);
        }

        if self.match_token(&Token::Break(loc)) {
            self.expect_statement_end("after 'break'")?;
            return Ok(Stmt::Break { location: loc });
        }

        if self.match_token(&Token::Continue(loc)) {
            self.expect_statement_end("after 'continue'")?;
            return Ok(Stmt::Continue { location: loc });
        }

        if self.match_token(&Token::Return(loc)) {
            return self.parse_return_statement(loc);
        }

        if self.match_token(&Token::LBrace(loc)) {
            let statements = self.parse_block_statements()?;
            self.expect_rbrace("to close block")?;
            return Ok(Stmt::Block {
                statements,
                location: loc,
            });
        }

        // Expression statement
        let expr = self.parse_expression()?;
        self.expect_statement_end("after expression")?;
        Ok(Stmt::Expression {
            expr,
            location: loc,
        })
    }

    /// Parse `let`/`const` with one or more declarators (keyword not yet consumed)
    pub(crate) fn parse_var_declaration(&mut self) -> Result<Stmt, ParseError> {
        let location = self.current_location();
        let is_const = matches!(self.advance(), Token::Const(_));

        let mut declarators = Vec::new();
        loop {
            let decl_loc = self.current_location();
            let name = self.expect_identifier()?;

            let var_type = if self.match_token(&Token::Colon(self.current_location())) {
                Some(self.parse_type()?)
            } else {
                None
            };

            let init = if self.match_token(&Token::Eq(self.current_location())) {
                Some(self.parse_expression()?)
            } else {
                None
            };

            declarators.push(Declarator {
                name,
                var_type,
                init,
                location: decl_loc,
            });

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        Ok(Stmt::VarDecl {
            is_const,
            declarators,
            location,
        })
    }

    /// Parse for loop (after the `for` keyword)
    fn parse_for_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        self.expect_lparen("after 'for'")?;

        let loc = self.current_location();
        let init = if self.check(&Token::Semicolon(loc)) {
            None
        } else if self.check(&Token::Let(loc)) || self.check(&Token::Const(loc)) {
            Some(Box::new(self.parse_var_declaration()?))
        } else {
            let expr = self.parse_expression()?;
            Some(Box::new(Stmt::Expression {
                expr,
                location: loc,
            }))
        };
        self.expect_semicolon("after for loop initializer")?;

        let condition = if self.check(&Token::Semicolon(self.current_location())) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_semicolon("after for loop condition")?;

        let increment = if self.check(&Token::RParen(self.current_location())) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_rparen("after for loop clauses")?;

        self.expect_lbrace("before for loop body")?;
        let body = self.parse_block_statements()?;
        self.expect_rbrace("after for loop body")?;

        Ok(Stmt::For {
            init,
            condition,
            increment,
            body,
            location,
        })
    }

    /// Parse while loop (after the `while` keyword)
    fn parse_while_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        let condition = self.parse_expression()?;

        self.expect_lbrace("after while condition")?;
        let body = self.parse_block_statements()?;
        self.expect_rbrace("after while body")?;

        Ok(Stmt::While {
            condition,
            body,
            location,
        })
    }

    /// Parse if statement (after the `if` keyword)
    fn parse_if_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        let condition = self.parse_expression()?;

        self.expect_lbrace("after if condition")?;
        let then_branch = self.parse_block_statements()?;
        self.expect_rbrace("after if body")?;

        let else_loc = self.current_location();
        let else_branch = if self.match_token(&Token::Else(else_loc)) {
            let if_loc = self.current_location();
            if self.match_token(&Token::If(if_loc)) {
                self.descend("Block")?;
                let else_if = self.parse_if_statement(if_loc)?;
                self.ascend(1);
                Some(vec![else_if])
            } else {
                self.expect_lbrace("after 'else'")?;
                let stmts = self.parse_block_statements()?;
                self.expect_rbrace("after else body")?;
                Some(stmts)
            }
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            location,
        })
    }

    /// Parse return statement (after the `return` keyword)
    fn parse_return_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        let expr = if self.at_statement_end() {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect_statement_end("after return")?;
        Ok(Stmt::Return { expr, location })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::Parser;

    fn statements(source: &str) -> Vec<Stmt> {
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();
        program.statements().cloned().collect()
    }

    #[test]
    fn test_multi_declarator_let() {
        let stmts = statements("let a = 0, b = 1, c: char");
        match &stmts[0] {
            Stmt::VarDecl {
                is_const,
                declarators,
                ..
            } => {
                assert!(!is_const);
                assert_eq!(declarators.len(), 3);
                assert_eq!(declarators[2].name, "c");
                assert_eq!(declarators[2].var_type.as_ref().unwrap().name, "char");
                assert!(declarators[2].init.is_none());
            }
            other => panic!("Expected variable declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_for_loop_clauses() {
        let stmts = statements("for (let i = 0; i <= 10; i++) {\n  f(i)\n}");
        match &stmts[0] {
            Stmt::For {
                init,
                condition,
                increment,
                body,
                ..
            } => {
                assert!(matches!(init.as_deref(), Some(Stmt::VarDecl { .. })));
                assert!(matches!(
                    condition,
                    Some(Expr::BinaryOp { op: BinOp::Le, .. })
                ));
                assert!(matches!(
                    increment,
                    Some(Expr::IncDec {
                        op: IncDec::PostInc,
                        ..
                    })
                ));
                assert_eq!(body.len(), 1);
            }
            other => panic!("Expected for loop, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_for_clauses() {
        let stmts = statements("for (;;) { return }");
        assert!(matches!(
            stmts[0],
            Stmt::For {
                init: None,
                condition: None,
                increment: None,
                ..
            }
        ));
    }

    #[test]
    fn test_if_without_parentheses_and_else_if() {
        let stmts = statements("if i < 10 { a() } else if i < 20 { b() } else { c() }");
        match &stmts[0] {
            Stmt::If { else_branch, .. } => {
                let else_branch = else_branch.as_ref().unwrap();
                assert!(matches!(
                    else_branch[0],
                    Stmt::If {
                        else_branch: Some(_),
                        ..
                    }
                ));
            }
            other => panic!("Expected if statement, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_return_before_newline() {
        let mut parser = Parser::new("function f() {\n  return\n  g()\n}").unwrap();
        let program = parser.parse_program().unwrap();
        let func = program.functions().next().unwrap();
        assert!(matches!(func.body[0], Stmt::Return { expr: None, .. }));
        assert!(matches!(func.body[1], Stmt::Expression { .. }));
    }

    #[test]
    fn test_while_with_break_and_continue() {
        let stmts = statements("while i < 10 {\n  i++\n  if i == 3 { continue }\n  break\n}");
        match &stmts[0] {
            Stmt::While {
                condition, body, ..
            } => {
                assert!(matches!(condition, Expr::BinaryOp { op: BinOp::Lt, .. }));
                assert_eq!(body.len(), 3);
                assert!(matches!(body[2], Stmt::Break { .. }));
            }
            other => panic!("Expected while loop, got {:?}", other),
        }
    }

    #[test]
    fn test_deeply_nested_blocks_are_rejected() {
        let source = format!("{}{}", "{".repeat(1_000), "}".repeat(1_000));
        let mut parser = Parser::new(&source).unwrap();
        let err = parser.parse_program().unwrap_err();
        assert!(err.message().contains("nested too deeply"));
    }
}
