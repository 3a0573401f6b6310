//! Operator semantics, all as `impl Interpreter` blocks

mod assign;
mod binary;
mod unary;
