use crate::checker::typed::TypedExpr;
use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;

impl Interpreter<'_> {
    pub(crate) fn execute_break(&mut self) -> Result<(), RuntimeError> {
        self.control_flow = ControlFlow::Break;
        Ok(())
    }

    pub(crate) fn execute_continue(&mut self) -> Result<(), RuntimeError> {
        self.control_flow = ControlFlow::Continue;
        Ok(())
    }

    pub(crate) fn execute_return(&mut self, expr: Option<&TypedExpr>) -> Result<(), RuntimeError> {
        self.return_value = match expr {
            Some(ret_expr) => Some(self.evaluate_expr(ret_expr)?),
            None => None,
        };

        self.control_flow = ControlFlow::Return;
        Ok(())
    }
}
