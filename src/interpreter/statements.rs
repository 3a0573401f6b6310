//! Statement execution implementation
//!
//! This module handles the execution of checked statements:
//!
//! - Variable declarations (`let`/`const`, zero-initialized when no initializer)
//! - `if`/`else`, each branch in a fresh scope
//! - Blocks and expression statements
//!
//! Loops live in `loops`; `break`, `continue` and `return` in `jumps`.
//!
//! Every statement counts as one step against the step budget.

use crate::checker::typed::{TypedDeclarator, TypedExpr, TypedExprKind, TypedStmt};
use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;

impl Interpreter<'_> {
    /// Execute statements in the current scope until one raises a control flow signal
    pub(crate) fn execute_block(&mut self, stmts: &[TypedStmt]) -> Result<(), RuntimeError> {
        for stmt in stmts {
            self.execute_statement(stmt)?;
            if self.control_flow != ControlFlow::Normal {
                break;
            }
        }
        Ok(())
    }

    /// Execute statements inside a fresh nested scope
    pub(crate) fn execute_scoped_block(&mut self, stmts: &[TypedStmt]) -> Result<(), RuntimeError> {
        self.enter_scope();
        let result = self.execute_block(stmts);
        self.exit_scope();
        result
    }

    pub(crate) fn execute_statement(&mut self, stmt: &TypedStmt) -> Result<(), RuntimeError> {
        self.tick(stmt.location())?;
        self.check_native_stack(stmt.location())?;

        match stmt {
            TypedStmt::Let { declarators, .. } => {
                for decl in declarators {
                    self.execute_declarator(decl)?;
                }
                Ok(())
            }

            TypedStmt::For {
                init,
                condition,
                increment,
                body,
                location,
            } => self.execute_for(
                init.as_deref(),
                condition.as_ref(),
                increment.as_ref(),
                body,
                *location,
            ),

            TypedStmt::While {
                condition,
                body,
                location,
            } => self.execute_while(condition, body, *location),

            TypedStmt::Break { .. } => self.execute_break(),

            TypedStmt::Continue { .. } => self.execute_continue(),

            TypedStmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if self.evaluate_condition(condition)? {
                    self.execute_scoped_block(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute_scoped_block(else_branch)
                } else {
                    Ok(())
                }
            }

            TypedStmt::Return { value, .. } => self.execute_return(value.as_ref()),

            TypedStmt::Block { statements, .. } => self.execute_scoped_block(statements),

            TypedStmt::Expression { expr, .. } => self.execute_expression_statement(expr),
        }
    }

    fn execute_declarator(&mut self, decl: &TypedDeclarator) -> Result<(), RuntimeError> {
        let value = match &decl.init {
            Some(init) => self.evaluate_expr(init)?,
            None => Value::zero(&decl.ty),
        };
        self.declare_var(&decl.name, value, decl.location)
    }

    /// Evaluate for side effects; a call may produce no value here
    pub(crate) fn execute_expression_statement(&mut self, expr: &TypedExpr) -> Result<(), RuntimeError> {
        match &expr.kind {
            TypedExprKind::Call { callee, args } => {
                self.execute_call(*callee, args, expr.location)?;
            }
            _ => {
                self.evaluate_expr(expr)?;
            }
        }
        Ok(())
    }
}
