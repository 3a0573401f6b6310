//! Binary operator evaluation
//!
//! `int` arithmetic is 32-bit two's complement and wraps; `/` truncates
//! toward zero and `%` takes the sign of the dividend. `char` arithmetic
//! wraps modulo 256. Both report division by zero.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{BinOp, SourceLocation};

impl Interpreter<'_> {
    pub(crate) fn binary_op(
        op: BinOp,
        left: Value,
        right: Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match (left, right) {
            (Value::Int(a), Value::Int(b)) => Self::int_binary_op(op, a, b, location),
            (Value::Char(a), Value::Char(b)) => Self::char_binary_op(op, a, b, location),
            (Value::Bool(a), Value::Bool(b)) if op == BinOp::Eq => Ok(Value::Bool(a == b)),
            (Value::Bool(a), Value::Bool(b)) if op == BinOp::Ne => Ok(Value::Bool(a != b)),
            (l, r) => Err(RuntimeError::TypeMismatch {
                expected: format!("matching operands for '{}'", op.symbol()),
                got: format!("{} and {}", l.type_of(), r.type_of()),
                location,
            }),
        }
    }

    fn int_binary_op(op: BinOp, a: i32, b: i32, location: SourceLocation) -> Result<Value, RuntimeError> {
        let result = match op {
            BinOp::Add => Value::Int(a.wrapping_add(b)),
            BinOp::Sub => Value::Int(a.wrapping_sub(b)),
            BinOp::Mul => Value::Int(a.wrapping_mul(b)),
            // i32::MIN / -1 wraps to i32::MIN, i32::MIN % -1 is 0
            BinOp::Div => Value::Int(a.wrapping_div(Self::nonzero(b, op, location)?)),
            BinOp::Mod => Value::Int(a.wrapping_rem(Self::nonzero(b, op, location)?)),
            BinOp::Eq => Value::Bool(a == b),
            BinOp::Ne => Value::Bool(a != b),
            BinOp::Lt => Value::Bool(a < b),
            BinOp::Le => Value::Bool(a <= b),
            BinOp::Gt => Value::Bool(a > b),
            BinOp::Ge => Value::Bool(a >= b),
        };
        Ok(result)
    }

    fn char_binary_op(op: BinOp, a: u8, b: u8, location: SourceLocation) -> Result<Value, RuntimeError> {
        let result = match op {
            BinOp::Add => Value::Char(a.wrapping_add(b)),
            BinOp::Sub => Value::Char(a.wrapping_sub(b)),
            BinOp::Mul => Value::Char(a.wrapping_mul(b)),
            BinOp::Div => Value::Char(a / Self::nonzero(b, op, location)?),
            BinOp::Mod => Value::Char(a % Self::nonzero(b, op, location)?),
            BinOp::Eq => Value::Bool(a == b),
            BinOp::Ne => Value::Bool(a != b),
            BinOp::Lt => Value::Bool(a < b),
            BinOp::Le => Value::Bool(a <= b),
            BinOp::Gt => Value::Bool(a > b),
            BinOp::Ge => Value::Bool(a >= b),
        };
        Ok(result)
    }

    fn nonzero<T: Default + PartialEq>(
        divisor: T,
        op: BinOp,
        location: SourceLocation,
    ) -> Result<T, RuntimeError> {
        if divisor == T::default() {
            Err(RuntimeError::DivisionByZero {
                operation: op.symbol().to_string(),
                location,
            })
        } else {
            Ok(divisor)
        }
    }
}
