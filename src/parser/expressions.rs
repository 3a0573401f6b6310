//! Expression parsing implementation
//!
//! This module handles parsing of toyscript expressions using precedence
//! climbing for binary operators and recursive descent for other forms.
//!
//! # Precedence (lowest to highest)
//!
//! ```text
//! assignment     ::= identifier ("=" | "+=" | "-=" | "*=" | "/=" | "%=") assignment
//!                  | logical_or
//! logical_or     ::= logical_and ("||" logical_and)*
//! logical_and    ::= equality ("&&" equality)*
//! equality       ::= relational (("==" | "!=") relational)*
//! relational     ::= additive (("<" | ">" | "<=" | ">=") additive)*
//! additive       ::= multiplicative (("+" | "-") multiplicative)*
//! multiplicative ::= unary (("*" | "/" | "%") unary)*
//! unary          ::= "-" int_literal postfix_ops | ("-" | "!" | "++" | "--") unary | postfix
//! postfix        ::= primary postfix_ops
//! postfix_ops    ::= ("as" type | "(" args ")" | "++" | "--")*
//! primary        ::= int_literal | char_literal | identifier | "(" expression ")"
//! ```
//!
//! Casts are postfix, so `'0' + n % 10 as char` casts `10`, while
//! `'0' + (n % 10) as char` casts the remainder. A minus sign directly in
//! front of an integer literal is part of the literal: `-1 as char` is
//! `(-1) as char`, and `-2147483648` is a valid `int`.
//!
//! A call's `(` and a postfix `++`/`--` must sit on the same line as their
//! operand; otherwise the line break ends the statement.
//!
//! Every nested sub-expression and every operator of a chain counts toward
//! [`MAX_NESTING_DEPTH`](crate::parser::parse::MAX_NESTING_DEPTH).

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.descend("Expression")?;
        let expr = self.parse_assignment()?;
        self.ascend(1);
        Ok(expr)
    }

    /// Parse assignment (right-associative)
    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_logical_or()?;

        let loc = self.current_location();
        let op = match self.peek() {
            Token::Eq(_) => None,
            Token::PlusEq(_) => Some(BinOp::Add),
            Token::MinusEq(_) => Some(BinOp::Sub),
            Token::StarEq(_) => Some(BinOp::Mul),
            Token::SlashEq(_) => Some(BinOp::Div),
            Token::PercentEq(_) => Some(BinOp::Mod),
            _ => return Ok(expr),
        };
        self.advance();

        let target = match expr {
            Expr::Variable(name, _) => name,
            other => {
                return Err(ParseError::new(
                    "Invalid assignment target: expected a variable name",
                    other.location(),
                ));
            }
        };

        let value = Box::new(self.parse_expression()?);
        Ok(Expr::Assignment {
            target,
            op,
            value,
            location: loc,
        })
    }

    /// Parse logical or (||)
    fn parse_logical_or(&mut self) -> Result<Expr, ParseError> {
        self.parse_logical_chain(LogicalOp::Or, Self::parse_logical_and)
    }

    /// Parse logical and (&&)
    fn parse_logical_and(&mut self) -> Result<Expr, ParseError> {
        self.parse_logical_chain(LogicalOp::And, Self::parse_equality)
    }

    fn parse_logical_chain(
        &mut self,
        op: LogicalOp,
        operand: fn(&mut Self) -> Result<Expr, ParseError>,
    ) -> Result<Expr, ParseError> {
        let mut left = operand(self)?;
        let mut levels = 0;

        loop {
            let loc = self.current_location();
            let matched = match op {
                LogicalOp::And => self.match_token(&Token::AndAnd(loc)),
                LogicalOp::Or => self.match_token(&Token::OrOr(loc)),
            };
            if !matched {
                break;
            }
            self.descend("Expression")?;
            levels += 1;

            let right = Box::new(operand(self)?);
            left = Expr::Logical {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        self.ascend(levels);
        Ok(left)
    }

    /// Parse equality (==, !=)
    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_chain(Self::parse_relational, |token| match token {
            Token::EqEq(_) => Some(BinOp::Eq),
            Token::NotEq(_) => Some(BinOp::Ne),
            _ => None,
        })
    }

    /// Parse relational (<, >, <=, >=)
    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_chain(Self::parse_additive, |token| match token {
            Token::Lt(_) => Some(BinOp::Lt),
            Token::Le(_) => Some(BinOp::Le),
            Token::Gt(_) => Some(BinOp::Gt),
            Token::Ge(_) => Some(BinOp::Ge),
            _ => None,
        })
    }

    /// Parse additive (+, -)
    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_chain(Self::parse_multiplicative, |token| match token {
            Token::Plus(_) => Some(BinOp::Add),
            Token::Minus(_) => Some(BinOp::Sub),
            _ => None,
        })
    }

    /// Parse multiplicative (*, /, %)
    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_chain(Self::parse_unary, |token| match token {
            Token::Star(_) => Some(BinOp::Mul),
            Token::Slash(_) => Some(BinOp::Div),
            Token::Percent(_) => Some(BinOp::Mod),
            _ => None,
        })
    }

    /// Left-associative chain of one precedence level
    fn parse_binary_chain(
        &mut self,
        operand: fn(&mut Self) -> Result<Expr, ParseError>,
        operator: fn(&Token) -> Option<BinOp>,
    ) -> Result<Expr, ParseError> {
        let mut left = operand(self)?;
        let mut levels = 0;

        while let Some(op) = operator(self.peek()) {
            let loc = self.current_location();
            self.advance();
            self.descend("Expression")?;
            levels += 1;

            let right = Box::new(operand(self)?);
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        self.ascend(levels);
        Ok(left)
    }

    /// Parse unary prefix operators (-, !, ++, --)
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        if self.match_token(&Token::Minus(loc)) {
            if let Token::IntLiteral(magnitude, _) = self.peek_token() {
                self.advance();
                let literal = Expr::IntLiteral(0i32.wrapping_sub_unsigned(magnitude), loc);
                return self.parse_postfix_operators(literal);
            }
            let operand = Box::new(self.parse_prefix_operand()?);
            return Ok(Expr::UnaryOp {
                op: UnOp::Neg,
                operand,
                location: loc,
            });
        }

        if self.match_token(&Token::Bang(loc)) {
            let operand = Box::new(self.parse_prefix_operand()?);
            return Ok(Expr::UnaryOp {
                op: UnOp::Not,
                operand,
                location: loc,
            });
        }

        if self.match_token(&Token::PlusPlus(loc)) {
            let operand = self.parse_prefix_operand()?;
            return Self::inc_dec(IncDec::PreInc, operand, loc);
        }

        if self.match_token(&Token::MinusMinus(loc)) {
            let operand = self.parse_prefix_operand()?;
            return Self::inc_dec(IncDec::PreDec, operand, loc);
        }

        self.parse_postfix()
    }

    fn parse_prefix_operand(&mut self) -> Result<Expr, ParseError> {
        self.descend("Expression")?;
        let operand = self.parse_unary()?;
        self.ascend(1);
        Ok(operand)
    }

    /// Parse a primary expression and its postfix operators
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let primary = self.parse_primary()?;
        self.parse_postfix_operators(primary)
    }

    /// Apply postfix operators (as, call, ++, --) to `expr`
    fn parse_postfix_operators(&mut self, mut expr: Expr) -> Result<Expr, ParseError> {
        loop {
            let loc = self.current_location();

            if self.match_token(&Token::As(loc)) {
                let target_type = self.parse_type()?;
                expr = Expr::Cast {
                    target_type,
                    expr: Box::new(expr),
                    location: loc,
                };
                continue;
            }

            // Everything below must continue the operand's line
            if self.at_line_break() {
                break;
            }

            if self.check(&Token::LParen(loc)) {
                let (name, name_loc) = match expr {
                    Expr::Variable(name, name_loc) => (name, name_loc),
                    other => {
                        return Err(ParseError::new(
                            "Only named functions can be called",
                            other.location(),
                        ));
                    }
                };
                self.advance();
                let args = self.parse_arguments()?;
                expr = Expr::FunctionCall {
                    name,
                    args,
                    location: name_loc,
                };
            } else if self.match_token(&Token::PlusPlus(loc)) {
                expr = Self::inc_dec(IncDec::PostInc, expr, loc)?;
            } else if self.match_token(&Token::MinusMinus(loc)) {
                expr = Self::inc_dec(IncDec::PostDec, expr, loc)?;
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse call arguments (after the opening parenthesis)
    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();

        if !self.check(&Token::RParen(self.current_location())) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(&Token::Comma(self.current_location())) {
                    break;
                }
            }
        }

        self.expect_rparen("after function arguments")?;
        Ok(args)
    }

    /// Parse primary expressions (literals, identifiers, parentheses)
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        match self.peek_token() {
            Token::IntLiteral(n, _) => {
                self.advance();
                let value = i32::try_from(n).map_err(|_| {
                    ParseError::new(
                        format!("Integer literal out of range: {} (only -{} is valid)", n, n),
                        loc,
                    )
                })?;
                Ok(Expr::IntLiteral(value, loc))
            }
            Token::CharLiteral(c, _) => {
                self.advance();
                Ok(Expr::CharLiteral(c, loc))
            }
            Token::Ident(name, _) => {
                self.advance();
                Ok(Expr::Variable(name, loc))
            }
            Token::LParen(_) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_rparen("to close parenthesized expression")?;
                Ok(expr)
            }
            other => Err(ParseError::new(
                format!("Expected expression, found {}", other),
                loc,
            )),
        }
    }

    fn inc_dec(op: IncDec, operand: Expr, location: SourceLocation) -> Result<Expr, ParseError> {
        match operand {
            Expr::Variable(target, _) => Ok(Expr::IncDec {
                op,
                target,
                location,
            }),
            other => Err(ParseError::new(
                format!(
                    "Operand of '{}' must be a variable",
                    if op.is_increment() { "++" } else { "--" }
                ),
                other.location(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::Parser;

    fn expr(source: &str) -> Expr {
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();
        let result = match program.statements().next() {
            Some(Stmt::Expression { expr, .. }) => expr.clone(),
            other => panic!("Expected expression statement, got {:?}", other),
        };
        result
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3 == 7  =>  ((1 + (2 * 3)) == 7)
        match expr("1 + 2 * 3 == 7") {
            Expr::BinaryOp {
                op: BinOp::Eq,
                left,
                ..
            } => match *left {
                Expr::BinaryOp {
                    op: BinOp::Add,
                    right,
                    ..
                } => assert!(matches!(*right, Expr::BinaryOp { op: BinOp::Mul, .. })),
                other => panic!("Expected addition, got {:?}", other),
            },
            other => panic!("Expected equality, got {:?}", other),
        }
    }

    #[test]
    fn test_cast_binds_tighter_than_addition() {
        match expr("'0' + (i % 10) as char") {
            Expr::BinaryOp {
                op: BinOp::Add,
                right,
                ..
            } => match *right {
                Expr::Cast {
                    target_type, expr, ..
                } => {
                    assert_eq!(target_type.name, "char");
                    assert!(matches!(*expr, Expr::BinaryOp { op: BinOp::Mod, .. }));
                }
                other => panic!("Expected cast, got {:?}", other),
            },
            other => panic!("Expected addition, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment_is_right_associative() {
        match expr("a = b += 2") {
            Expr::Assignment {
                target, op, value, ..
            } => {
                assert_eq!(target, "a");
                assert!(op.is_none());
                assert!(matches!(
                    *value,
                    Expr::Assignment {
                        op: Some(BinOp::Add),
                        ..
                    }
                ));
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_assignment_target() {
        let mut parser = Parser::new("1 = 2").unwrap();
        let err = parser.parse_program().unwrap_err();
        assert!(err.message().contains("assignment target"));
    }

    #[test]
    fn test_call_must_be_on_same_line() {
        let mut parser = Parser::new("let x = f\n(1)").unwrap();
        let program = parser.parse_program().unwrap();
        assert_eq!(program.statements().count(), 2);
    }

    #[test]
    fn test_prefix_and_postfix_increment() {
        assert!(matches!(
            expr("++i"),
            Expr::IncDec {
                op: IncDec::PreInc,
                ..
            }
        ));
        assert!(matches!(
            expr("i--"),
            Expr::IncDec {
                op: IncDec::PostDec,
                ..
            }
        ));
    }

    #[test]
    fn test_call_arguments() {
        match expr("fib(n - 1, 'a')") {
            Expr::FunctionCall { name, args, .. } => {
                assert_eq!(name, "fib");
                assert_eq!(args.len(), 2);
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_logical_operators_precedence() {
        // a || b && c  =>  a || (b && c)
        match expr("a == 1 || b < 2 && !c") {
            Expr::Logical {
                op: LogicalOp::Or,
                left,
                right,
                ..
            } => {
                assert!(matches!(*left, Expr::BinaryOp { op: BinOp::Eq, .. }));
                assert!(matches!(*right, Expr::Logical { op: LogicalOp::And, .. }));
            }
            other => panic!("Expected logical or, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_literal_folding() {
        assert!(matches!(expr("-2147483648"), Expr::IntLiteral(i32::MIN, _)));
        match expr("-1 as char") {
            Expr::Cast { expr, .. } => assert!(matches!(*expr, Expr::IntLiteral(-1, _))),
            other => panic!("Expected cast of a negative literal, got {:?}", other),
        }
        assert!(matches!(
            expr("-x"),
            Expr::UnaryOp { op: UnOp::Neg, .. }
        ));
        assert!(matches!(expr("a - 1"), Expr::BinaryOp { op: BinOp::Sub, .. }));
    }

    #[test]
    fn test_min_magnitude_without_minus_is_rejected() {
        let mut parser = Parser::new("let x = 2147483648").unwrap();
        let err = parser.parse_program().unwrap_err();
        assert!(err.message().contains("out of range"));
    }

    #[test]
    fn test_deep_nesting_is_a_parse_error() {
        let source = format!("let x = {}1", "-".repeat(200_000));
        let mut parser = Parser::new(&source).unwrap();
        let err = parser.parse_program().unwrap_err();
        assert!(err.message().contains("nested too deeply"));

        let source = format!("let x = {}1{}", "(".repeat(10_000), ")".repeat(10_000));
        let mut parser = Parser::new(&source).unwrap();
        assert!(parser.parse_program().is_err());

        let source = format!("let x = 1{}", " + 1".repeat(10_000));
        let mut parser = Parser::new(&source).unwrap();
        assert!(parser.parse_program().is_err());
    }

    #[test]
    fn test_moderate_nesting_is_accepted() {
        let source = format!("let x = {}1{}", "(".repeat(50), ")".repeat(50));
        let mut parser = Parser::new(&source).unwrap();
        assert!(parser.parse_program().is_ok());
    }
}
