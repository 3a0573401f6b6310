//! Declaration parsing implementation
//!
//! This module handles parsing of top-level items:
//!
//! - Function declarations: `function name(params): type { ... }`
//! - External declarations: `declare function name(params): type`
//! - Top-level statements, which form the implicit entry point
//!
//! # Grammar
//!
//! ```text
//! item          ::= function_decl | external_decl | statement
//! function_decl ::= "function" identifier "(" params? ")" (":" type)? block
//! external_decl ::= "declare" "function" identifier "(" params? ")" (":" type)? end
//! params        ::= identifier ":" type ("," identifier ":" type)*
//! type          ::= identifier
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse a top-level item
    pub(crate) fn parse_item(&mut self) -> Result<Item, ParseError> {
        let loc = self.current_location();

        if self.match_token(&Token::Function(loc)) {
            return Ok(Item::Function(self.parse_function_declaration(loc)?));
        }

        if self.match_token(&Token::Declare(loc)) {
            return Ok(Item::External(self.parse_external_declaration(loc)?));
        }

        Ok(Item::Statement(self.parse_statement()?))
    }

    /// Parse function declaration (after the `function` keyword)
    fn parse_function_declaration(
        &mut self,
        location: SourceLocation,
    ) -> Result<FunctionDecl, ParseError> {
        let name = self.expect_identifier()?;
        let params = self.parse_parameters(&name)?;
        let return_type = self.parse_return_type()?;

        self.expect_lbrace("before function body")?;
        let body = self.parse_block_statements()?;
        self.expect_rbrace("after function body")?;

        Ok(FunctionDecl {
            name,
            params,
            return_type,
            body,
            location,
        })
    }

    /// Parse `declare function` (after the `declare` keyword)
    fn parse_external_declaration(
        &mut self,
        location: SourceLocation,
    ) -> Result<ExternalDecl, ParseError> {
        self.expect_token(
            &Token::Function(self.current_location()),
            "Expected 'function' after 'declare'",
        )?;

        let name = self.expect_identifier()?;
        let params = self.parse_parameters(&name)?;
        let return_type = self.parse_return_type()?;
        self.expect_statement_end("after external declaration")?;

        Ok(ExternalDecl {
            name,
            params,
            return_type,
            location,
        })
    }

    /// Parse parenthesized parameter list
    fn parse_parameters(&mut self, function_name: &str) -> Result<Vec<Param>, ParseError> {
        self.expect_lparen(&format!("after function name '{function_name}'"))?;

        let mut params = Vec::new();
        if !self.check(&Token::RParen(self.current_location())) {
            loop {
                let location = self.current_location();
                let name = self.expect_identifier()?;
                self.expect_token(
                    &Token::Colon(self.current_location()),
                    &format!("Expected ':' after parameter '{name}'"),
                )?;
                let param_type = self.parse_type()?;
                params.push(Param {
                    name,
                    param_type,
                    location,
                });

                if !self.match_token(&Token::Comma(self.current_location())) {
                    break;
                }
            }
        }

        self.expect_rparen("after parameters")?;
        Ok(params)
    }

    /// Parse optional `: type` after a parameter list
    fn parse_return_type(&mut self) -> Result<Option<TypeName>, ParseError> {
        if self.match_token(&Token::Colon(self.current_location())) {
            Ok(Some(self.parse_type()?))
        } else {
            Ok(None)
        }
    }

    /// Parse a type name. Resolution of the name happens during checking.
    pub(crate) fn parse_type(&mut self) -> Result<TypeName, ParseError> {
        let location = self.current_location();
        match self.peek_token() {
            Token::Ident(name, _) => {
                self.advance();
                Ok(TypeName { name, location })
            }
            other => Err(ParseError::new(
                format!("Expected type name, found {}", other),
                location,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::Parser;

    #[test]
    fn test_external_declaration() {
        let mut parser = Parser::new("declare function putchar(c: char)").unwrap();
        let program = parser.parse_program().unwrap();

        let ext = program.externals().next().unwrap();
        assert_eq!(ext.name, "putchar");
        assert_eq!(ext.params.len(), 1);
        assert_eq!(ext.params[0].param_type.name, "char");
        assert!(ext.return_type.is_none());
    }

    #[test]
    fn test_function_with_params() {
        let mut parser =
            Parser::new("function add(a: int, b: int): int {\n  return a + b\n}").unwrap();
        let program = parser.parse_program().unwrap();

        let func = program.functions().next().unwrap();
        assert_eq!(func.params.len(), 2);
        assert_eq!(func.params[1].name, "b");
        assert_eq!(func.params[1].location, SourceLocation::new(1, 22));
        assert!(matches!(func.body[0], Stmt::Return { expr: Some(_), .. }));
    }

    #[test]
    fn test_declare_requires_function_keyword() {
        let mut parser = Parser::new("declare putchar(c: char)").unwrap();
        let err = parser.parse_program().unwrap_err();
        assert!(err.message().contains("'function'"));
    }
}
