//! Execution limits
//!
//! [`InterpreterConfig`] bounds a run: how deep calls may nest, how many
//! statements may execute, and a [`CancellationToken`] the host can trip
//! from another thread. Budget and token are checked between statements.
//!
//! Call depth is capped at [`MAX_CALL_DEPTH_LIMIT`]; the interpreter thread's
//! native stack is sized from the effective depth.

use super::constants::{
    DEFAULT_MAX_CALL_DEPTH, MAX_CALL_DEPTH_LIMIT, NATIVE_STACK_BASE, NATIVE_STACK_PER_CALL,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag a host sets to stop a running program
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Requested call depth; values above [`MAX_CALL_DEPTH_LIMIT`] are capped
    pub max_call_depth: usize,
    /// Maximum number of executed statements and loop iterations
    pub step_budget: Option<u64>,
    pub cancellation: Option<CancellationToken>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            step_budget: None,
            cancellation: None,
        }
    }
}

impl InterpreterConfig {
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth.min(MAX_CALL_DEPTH_LIMIT);
        self
    }

    /// The call depth a run actually enforces
    pub fn call_depth_limit(&self) -> usize {
        self.max_call_depth.min(MAX_CALL_DEPTH_LIMIT)
    }

    /// Native stack size for the interpreter thread
    pub(crate) fn native_stack_size(&self) -> usize {
        NATIVE_STACK_BASE + self.call_depth_limit() * NATIVE_STACK_PER_CALL
    }

    pub fn with_step_budget(mut self, steps: u64) -> Self {
        self.step_budget = Some(steps);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}
