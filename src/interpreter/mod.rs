//! Tree-walking execution engine
//!
//! This module runs a [`CheckedProgram`](crate::checker::typed::CheckedProgram):
//! - [`engine`]: the [`Interpreter`] and its variable access helpers
//! - [`errors`]: runtime error types
//! - [`config`]: call depth, step budget and cancellation
//!
//! # Execution Model
//!
//! Top-level statements run in an entry frame. Each call to a user function
//! pushes a new [`StackFrame`](crate::memory::stack::StackFrame) whose scopes
//! mirror the blocks of the function body. Calls to `declare function`
//! names go through the [`HostRegistry`](crate::host::HostRegistry).
//!
//! Every statement and every loop iteration counts as one step; the step
//! budget and the cancellation token are checked at each step.
//!
//! A run executes on its own thread with a native stack sized from the
//! call depth limit, so deep recursion ends in `StackOverflow` or
//! `StackExhausted` rather than a process abort.

pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
mod expressions;
mod jumps;
mod loops;
mod ops;
mod statements;

pub use config::{CancellationToken, InterpreterConfig};
pub use engine::Interpreter;
pub use errors::RuntimeError;
