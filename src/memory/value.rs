//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents all possible runtime
//! values in the interpreter. Values are tagged, and the checker guarantees
//! that every operation receives the variant it expects.
//!
//! # Value Types
//!
//! - [`Value::Int`]: 32-bit signed integer, wrapping arithmetic
//! - [`Value::Char`]: 8-bit unsigned code unit (`0..=255`), wrapping arithmetic
//! - [`Value::Bool`]: result of a comparison; only ever used as a condition

use crate::checker::types::Type;
use std::fmt;

/// Runtime values in the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Int(i32),
    Char(u8),
    Bool(bool),
}

impl Value {
    /// The zero value a declaration without initializer starts at
    pub fn zero(ty: &Type) -> Value {
        match ty {
            Type::Char => Value::Char(0),
            Type::Bool => Value::Bool(false),
            _ => Value::Int(0),
        }
    }

    /// The static type this value belongs to
    pub fn type_of(&self) -> Type {
        match self {
            Value::Int(_) => Type::Int,
            Value::Char(_) => Type::Char,
            Value::Bool(_) => Type::Bool,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Char(c) if c.is_ascii_graphic() || *c == b' ' => write!(f, "'{}'", *c as char),
            Value::Char(c) => write!(f, "'\\x{:02x}'", c),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}
