//! Unary operator and cast evaluation

use crate::checker::types::Type;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{SourceLocation, UnOp};

impl Interpreter<'_> {
    pub(crate) fn unary_op(op: UnOp, operand: Value, location: SourceLocation) -> Result<Value, RuntimeError> {
        match (op, operand) {
            (UnOp::Neg, Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
            (UnOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
            (UnOp::Neg, other) => Err(RuntimeError::TypeMismatch {
                expected: "int".to_string(),
                got: other.type_of().to_string(),
                location,
            }),
            (UnOp::Not, other) => Err(RuntimeError::TypeMismatch {
                expected: "bool".to_string(),
                got: other.type_of().to_string(),
                location,
            }),
        }
    }

    /// `value as target`: `int as char` keeps the value modulo 256,
    /// `char as int` yields the code unit
    pub(crate) fn cast_value(value: Value, target: &Type, location: SourceLocation) -> Result<Value, RuntimeError> {
        match (value, target) {
            (Value::Int(n), Type::Char) => Ok(Value::Char(n.rem_euclid(256) as u8)),
            (Value::Char(c), Type::Int) => Ok(Value::Int(i32::from(c))),
            (Value::Int(_), Type::Int) | (Value::Char(_), Type::Char) => Ok(value),
            (other, target) => Err(RuntimeError::TypeMismatch {
                expected: format!("a value castable to {}", target),
                got: other.type_of().to_string(),
                location,
            }),
        }
    }
}
