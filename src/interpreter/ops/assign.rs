//! Assignment and increment/decrement
//!
//! Targets are always plain variables in the current frame. The value of an
//! assignment expression is the value stored.

use crate::checker::typed::TypedExpr;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{BinOp, IncDec, SourceLocation};

impl Interpreter<'_> {
    /// `target = value` or `target op= value`
    pub(crate) fn execute_assignment(
        &mut self,
        target: &str,
        op: Option<BinOp>,
        value: &TypedExpr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let rhs = self.evaluate_expr(value)?;

        let new_value = match op {
            Some(op) => {
                let current = self.read_var(target, location)?;
                Self::binary_op(op, current, rhs, location)?
            }
            None => rhs,
        };

        self.write_var(target, new_value, location)?;
        Ok(new_value)
    }

    /// `++x`, `--x`, `x++`, `x--`
    pub(crate) fn execute_inc_dec(
        &mut self,
        op: IncDec,
        target: &str,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let current = self.read_var(target, location)?;

        let new_value = match (current, op.is_increment()) {
            (Value::Int(n), true) => Value::Int(n.wrapping_add(1)),
            (Value::Int(n), false) => Value::Int(n.wrapping_sub(1)),
            (Value::Char(c), true) => Value::Char(c.wrapping_add(1)),
            (Value::Char(c), false) => Value::Char(c.wrapping_sub(1)),
            (other, _) => {
                return Err(RuntimeError::TypeMismatch {
                    expected: "int or char".to_string(),
                    got: other.type_of().to_string(),
                    location,
                });
            }
        };

        self.write_var(target, new_value, location)?;
        Ok(if op.is_prefix() { new_value } else { current })
    }
}
