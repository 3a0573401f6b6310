//! Loop statement execution (`for`, `while`).
//!
//! A `for` loop owns a scope for its init clause; every iteration's body runs
//! in a fresh nested scope. How the body ended is reported through
//! [`LoopBodyResult`], so the drivers never inspect `control_flow` themselves.

use crate::checker::typed::{TypedExpr, TypedStmt};
use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::SourceLocation;

/// Result returned by [`Interpreter::execute_loop_body`] to signal how the body ended.
pub(crate) enum LoopBodyResult {
    /// Body completed normally or hit `continue`; the loop should iterate again.
    Continue,
    /// `break` was hit; the loop should stop.
    Break,
    /// `return` was triggered; the loop driver should unwind and propagate
    /// `self.control_flow` to the caller.
    Exit,
}

impl Interpreter<'_> {
    /// Executes all statements in `body` inside a fresh scope.
    ///
    /// `break` and `continue` are consumed here; `return` is left set.
    pub(crate) fn execute_loop_body(
        &mut self,
        body: &[TypedStmt],
    ) -> Result<LoopBodyResult, RuntimeError> {
        self.execute_scoped_block(body)?;
        match self.control_flow {
            ControlFlow::Normal => Ok(LoopBodyResult::Continue),
            ControlFlow::Continue => {
                self.control_flow = ControlFlow::Normal;
                Ok(LoopBodyResult::Continue)
            }
            ControlFlow::Break => {
                self.control_flow = ControlFlow::Normal;
                Ok(LoopBodyResult::Break)
            }
            ControlFlow::Return => Ok(LoopBodyResult::Exit),
        }
    }

    /// Executes a `for (init; condition; increment) { body }` loop.
    ///
    /// A missing condition loops until `break`, `return` or until the step
    /// budget runs out. `continue` still runs the increment.
    pub(crate) fn execute_for(
        &mut self,
        init: Option<&TypedStmt>,
        condition: Option<&TypedExpr>,
        increment: Option<&TypedExpr>,
        body: &[TypedStmt],
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        self.enter_scope();
        let result = self.run_for(init, condition, increment, body, location);
        self.exit_scope();
        result
    }

    fn run_for(
        &mut self,
        init: Option<&TypedStmt>,
        condition: Option<&TypedExpr>,
        increment: Option<&TypedExpr>,
        body: &[TypedStmt],
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        if let Some(init) = init {
            self.execute_statement(init)?;
        }

        loop {
            if let Some(cond) = condition {
                if !self.evaluate_condition(cond)? {
                    break;
                }
            }

            match self.execute_loop_body(body)? {
                LoopBodyResult::Exit | LoopBodyResult::Break => return Ok(()),
                LoopBodyResult::Continue => {}
            }

            // The increment is a statement position: a void call is fine here
            if let Some(inc) = increment {
                self.execute_expression_statement(inc)?;
            }

            // An empty body would otherwise never reach a statement boundary
            self.tick(location)?;
        }

        Ok(())
    }

    /// Executes a `while condition { body }` loop.
    pub(crate) fn execute_while(
        &mut self,
        condition: &TypedExpr,
        body: &[TypedStmt],
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        while self.evaluate_condition(condition)? {
            match self.execute_loop_body(body)? {
                LoopBodyResult::Exit | LoopBodyResult::Break => break,
                LoopBodyResult::Continue => {}
            }
            self.tick(location)?;
        }
        Ok(())
    }
}
