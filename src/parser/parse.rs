//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: Parsing function and `declare function` items
//! - `statements`: Parsing statements (`let`, `for`, `if`, `return`, blocks)
//! - `expressions`: Parsing expressions with precedence climbing
//!
//! # Statement terminators
//!
//! A statement ends at a `;`, at a line break, before a closing `}` or at the
//! end of input. The line-break rule is implemented by comparing the line of
//! the last consumed token with the line of the next one, so the lexer never
//! has to emit newline tokens.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use thiserror::Error;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Parse error at line {}, column {}: {message}", .location.line, .location.column)]
    Syntax {
        message: String,
        location: SourceLocation,
    },
    /// The source failed to tokenize
    #[error(transparent)]
    Lex(#[from] LexError),
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        ParseError::Syntax {
            message: message.into(),
            location,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ParseError::Syntax { message, .. } => message,
            ParseError::Lex(err) => &err.message,
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::Syntax { location, .. } => *location,
            ParseError::Lex(err) => err.location,
        }
    }
}

/// Deepest nesting of blocks and sub-expressions the parser accepts
pub const MAX_NESTING_DEPTH: usize = 128;

/// Recursive descent parser for toyscript
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    /// Current nesting of blocks and sub-expressions
    depth: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        tracing::debug!(tokens = tokens.len(), "tokenized source");
        Ok(Self {
            tokens,
            position: 0,
            depth: 0,
        })
    }

    /// Parse the entire program (top-level items in source order)
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while !self.is_at_end() {
            let item = self.parse_item()?;
            program.items.push(item);
        }

        tracing::debug!(items = program.items.len(), "parsed program");
        Ok(program)
    }

    // ===== Helper methods =====

    /// Enter one level of nesting, failing past [`MAX_NESTING_DEPTH`]
    pub(crate) fn descend(&mut self, what: &str) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(ParseError::new(
                format!("{what} nested too deeply (limit {MAX_NESTING_DEPTH})"),
                self.current_location(),
            ));
        }
        Ok(())
    }

    pub(crate) fn ascend(&mut self, levels: usize) {
        self.depth = self.depth.saturating_sub(levels);
    }

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        // The lexer always terminates the stream with Eof, and `advance`
        // never moves past it.
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_token(&self) -> Token {
        self.peek().clone()
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.previous().location()
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    /// True when the next token starts on a later line than the last consumed one
    pub(crate) fn at_line_break(&self) -> bool {
        self.position > 0 && self.current_location().line > self.previous_location().line
    }

    /// True when the current statement may end here without consuming anything
    pub(crate) fn at_statement_end(&self) -> bool {
        self.check(&Token::Semicolon(self.current_location()))
            || self.check(&Token::RBrace(self.current_location()))
            || self.is_at_end()
            || self.at_line_break()
    }

    /// Consume a statement terminator: `;`, a line break, `}` (not consumed)
    /// or end of input (not consumed).
    pub(crate) fn expect_statement_end(&mut self, ctx: &str) -> Result<(), ParseError> {
        if self.match_token(&Token::Semicolon(self.current_location())) {
            return Ok(());
        }
        if self.at_statement_end() {
            return Ok(());
        }
        Err(ParseError::new(
            format!("Expected ';' or newline {ctx}, found {}", self.peek()),
            self.current_location(),
        ))
    }

    pub(crate) fn expect_token(&mut self, token: &Token, message: &str) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::new(
                format!("{}, found {}", message, self.peek()),
                self.current_location(),
            ))
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LParen(self.current_location()),
            &format!("Expected '(' {ctx}"),
        )
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RParen(self.current_location()),
            &format!("Expected ')' {ctx}"),
        )
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LBrace(self.current_location()),
            &format!("Expected '{{' {ctx}"),
        )
    }

    pub(crate) fn expect_rbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RBrace(self.current_location()),
            &format!("Expected '}}' {ctx}"),
        )
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::Semicolon(self.current_location()),
            &format!("Expected ';' {ctx}"),
        )
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            Ok(name)
        } else {
            Err(ParseError::new(
                format!("Expected identifier, found {}", self.peek()),
                self.current_location(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        Parser::new(source).unwrap().parse_program().unwrap()
    }

    fn parse_err(source: &str) -> ParseError {
        match Parser::new(source) {
            Ok(mut parser) => parser.parse_program().unwrap_err(),
            Err(err) => err,
        }
    }

    #[test]
    fn test_parse_simple_function() {
        let program = parse("function main(): int { return 0 }");

        assert_eq!(program.items.len(), 1);
        match &program.items[0] {
            Item::Function(FunctionDecl {
                name,
                params,
                return_type,
                body,
                ..
            }) => {
                assert_eq!(name, "main");
                assert_eq!(params.len(), 0);
                assert_eq!(return_type.as_ref().unwrap().name, "int");
                assert_eq!(body.len(), 1);
            }
            _ => panic!("Expected function declaration"),
        }
    }

    #[test]
    fn test_newline_terminates_statements() {
        let program = parse("let a = 1\nlet b = 2; let c = 3\n");
        assert_eq!(program.statements().count(), 3);
    }

    #[test]
    fn test_missing_terminator_on_same_line() {
        let err = parse_err("let a = 1 let b = 2");
        assert!(matches!(err, ParseError::Syntax { .. }));
        assert_eq!(err.location(), SourceLocation::new(1, 11));
    }

    #[test]
    fn test_items_in_any_order() {
        let program = parse(
            "print(1)\nfunction print(n: int) {}\ndeclare function putchar(c: char)\n",
        );
        assert_eq!(program.statements().count(), 1);
        assert_eq!(program.functions().count(), 1);
        assert_eq!(program.externals().count(), 1);
    }

    #[test]
    fn test_lex_error_surfaces_as_lex_kind() {
        let err = parse_err("let c = '\n");
        assert!(matches!(err, ParseError::Lex(_)));
        assert_eq!(err.location(), SourceLocation::new(1, 9));
    }

    #[test]
    fn test_unexpected_token_reports_location() {
        let err = parse_err("function f( {}");
        assert_eq!(err.location(), SourceLocation::new(1, 13));
        assert!(err.message().contains("identifier"));
    }
}
