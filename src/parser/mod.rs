//! toyscript source parser
//!
//! This module transforms source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parser struct and helpers (tokens → AST)
//! - [`ast`]: AST node definitions
//!
//! # Supported language
//!
//! - Types: `int`, `char` (resolved by the checker, not the parser)
//! - Items: `function`, `declare function`, top-level statements
//! - Statements: `let`/`const`, `for`, `if`/`else`, `return`, blocks
//! - Expressions: arithmetic, comparison, `!`, casts with `as`, calls,
//!   assignment and compound assignment, `++`/`--`
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

pub use parse::{ParseError, Parser};
