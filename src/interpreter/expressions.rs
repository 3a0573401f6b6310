//! Expression evaluation
//!
//! Operands and arguments are evaluated left to right. Operator semantics
//! live in `ops`; this module handles dispatch, variables and calls.

use crate::checker::typed::{Callee, TypedExpr, TypedExprKind};
use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{LogicalOp, SourceLocation};

impl Interpreter<'_> {
    pub(crate) fn evaluate_expr(&mut self, expr: &TypedExpr) -> Result<Value, RuntimeError> {
        let location = expr.location;
        self.check_native_stack(location)?;

        match &expr.kind {
            TypedExprKind::IntLiteral(n) => Ok(Value::Int(*n)),

            TypedExprKind::CharLiteral(c) => Ok(Value::Char(*c)),

            TypedExprKind::Variable(name) => self.read_var(name, location),

            TypedExprKind::Binary { op, left, right } => {
                let left = self.evaluate_expr(left)?;
                let right = self.evaluate_expr(right)?;
                Self::binary_op(*op, left, right, location)
            }

            TypedExprKind::Logical { op, left, right } => {
                let left = self.evaluate_condition(left)?;
                // The right operand only runs when the left one doesn't decide
                let decided = match op {
                    LogicalOp::And => !left,
                    LogicalOp::Or => left,
                };
                if decided {
                    return Ok(Value::Bool(left));
                }
                Ok(Value::Bool(self.evaluate_condition(right)?))
            }

            TypedExprKind::Unary { op, operand } => {
                let operand = self.evaluate_expr(operand)?;
                Self::unary_op(*op, operand, location)
            }

            TypedExprKind::Assign { target, op, value } => {
                self.execute_assignment(target, *op, value, location)
            }

            TypedExprKind::IncDec { op, target } => self.execute_inc_dec(*op, target, location),

            TypedExprKind::Call { callee, args } => self
                .execute_call(*callee, args, location)?
                .ok_or_else(|| RuntimeError::TypeMismatch {
                    expected: expr.ty.to_string(),
                    got: "void".to_string(),
                    location,
                }),

            TypedExprKind::Cast(inner) => {
                let value = self.evaluate_expr(inner)?;
                Self::cast_value(value, &expr.ty, location)
            }
        }
    }

    /// Evaluate a condition to a boolean
    pub(crate) fn evaluate_condition(&mut self, expr: &TypedExpr) -> Result<bool, RuntimeError> {
        let value = self.evaluate_expr(expr)?;
        value.as_bool().ok_or_else(|| RuntimeError::TypeMismatch {
            expected: "bool".to_string(),
            got: value.type_of().to_string(),
            location: expr.location,
        })
    }

    /// Evaluate arguments and call a user function or a foreign function
    pub(crate) fn execute_call(
        &mut self,
        callee: Callee,
        args: &[TypedExpr],
        location: SourceLocation,
    ) -> Result<Option<Value>, RuntimeError> {
        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            arg_values.push(self.evaluate_expr(arg)?);
        }

        match callee {
            Callee::User(idx) => self.call_user_function(idx, arg_values, location),
            Callee::Foreign(idx) => self.call_foreign_function(idx, &arg_values, location),
        }
    }

    fn call_user_function(
        &mut self,
        idx: usize,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Option<Value>, RuntimeError> {
        let program = self.program;
        let func = program
            .functions
            .get(idx)
            .ok_or_else(|| RuntimeError::UndefinedFunction {
                name: program.callee_name(Callee::User(idx)).to_string(),
                location,
            })?;

        // The entry frame is not a call
        let call_depth = self.stack.depth().saturating_sub(1);
        let limit = self.config.call_depth_limit();
        if call_depth >= limit {
            return Err(RuntimeError::StackOverflow {
                function: func.name.clone(),
                limit,
                location,
            });
        }
        self.check_native_stack(location)?;

        tracing::trace!(function = %func.name, depth = call_depth + 1, "call");

        self.stack.push_frame(func.name.clone(), Some(location));
        self.enter_scope();
        for (param, value) in func.params.iter().zip(args) {
            self.declare_var(&param.name, value, location)?;
        }

        let result = self.execute_scoped_block(&func.body);
        let return_value = self.return_value.take();
        self.control_flow = ControlFlow::Normal;
        self.stack.pop_frame();

        result?;
        Ok(return_value)
    }

    fn call_foreign_function(
        &mut self,
        idx: usize,
        args: &[Value],
        location: SourceLocation,
    ) -> Result<Option<Value>, RuntimeError> {
        let program = self.program;
        let ext = program
            .externals
            .get(idx)
            .ok_or_else(|| RuntimeError::UndefinedFunction {
                name: program.callee_name(Callee::Foreign(idx)).to_string(),
                location,
            })?;

        tracing::trace!(function = %ext.name, ?args, "foreign call");

        let result = self
            .host
            .call(&ext.name, args)
            .map_err(|source| RuntimeError::HostFailure {
                function: ext.name.clone(),
                source,
                location,
            })?;

        match (ext.signature.return_type(), result) {
            (None, None) => Ok(None),
            (Some(expected), Some(value)) if value.type_of() == *expected => Ok(Some(value)),
            (expected, got) => Err(RuntimeError::ForeignCall {
                function: ext.name.clone(),
                message: format!(
                    "declared to return {} but the host returned {}",
                    expected.map_or_else(|| "nothing".to_string(), |t| t.to_string()),
                    got.map_or_else(|| "nothing".to_string(), |v| v.type_of().to_string()),
                ),
                location,
            }),
        }
    }
}
