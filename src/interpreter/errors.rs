//! Runtime error types for the interpreter
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! during program execution (as opposed to lex, parse or type errors).
//!
//! All runtime errors are fatal: they halt execution. The last few variants
//! describe broken internal invariants that a type-checked program never
//! triggers.

use crate::host::HostError;
use crate::parser::ast::SourceLocation;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Division or remainder by zero
    #[error("Division by zero in '{operation}' at line {}, column {}", .location.line, .location.column)]
    DivisionByZero {
        operation: String,
        location: SourceLocation,
    },

    /// Call depth exceeded the configured maximum
    #[error(
        "Stack overflow: call to '{function}' exceeds the maximum call depth of {limit} at line {}, column {}",
        .location.line,
        .location.column
    )]
    StackOverflow {
        function: String,
        limit: usize,
        location: SourceLocation,
    },

    /// The interpreter thread's native stack ran low
    #[error(
        "Stack overflow: native stack exhausted in '{function}' at line {}, column {}",
        .location.line,
        .location.column
    )]
    StackExhausted {
        function: String,
        location: SourceLocation,
    },

    /// The interpreter thread could not be started
    #[error("Could not start the interpreter thread: {message}")]
    ThreadSpawn {
        message: String,
        location: SourceLocation,
    },

    /// A host function broke the contract of its declaration
    #[error(
        "Foreign call to '{function}' violated its declaration: {message} at line {}, column {}",
        .location.line,
        .location.column
    )]
    ForeignCall {
        function: String,
        message: String,
        location: SourceLocation,
    },

    /// A host function reported a failure
    #[error("Host function '{function}' failed: {source} at line {}, column {}", .location.line, .location.column)]
    HostFailure {
        function: String,
        source: HostError,
        location: SourceLocation,
    },

    /// The step budget ran out or the host cancelled the run
    #[error("Execution cancelled: {reason} at line {}, column {}", .location.line, .location.column)]
    Cancelled {
        reason: String,
        location: SourceLocation,
    },

    /// Undefined variable reference
    #[error("Undefined variable '{name}' at line {}, column {}", .location.line, .location.column)]
    UndefinedVariable {
        name: String,
        location: SourceLocation,
    },

    /// Call to a function index the program does not contain
    #[error("Undefined function '{name}' at line {}, column {}", .location.line, .location.column)]
    UndefinedFunction {
        name: String,
        location: SourceLocation,
    },

    /// An operation received a value of the wrong type
    #[error(
        "Type mismatch: expected {expected}, got {got} at line {}, column {}",
        .location.line,
        .location.column
    )]
    TypeMismatch {
        expected: String,
        got: String,
        location: SourceLocation,
    },

    /// No stack frame available
    #[error("No active stack frame at line {}, column {}", .location.line, .location.column)]
    NoStackFrame { location: SourceLocation },
}

impl RuntimeError {
    pub fn location(&self) -> SourceLocation {
        match self {
            RuntimeError::DivisionByZero { location, .. }
            | RuntimeError::StackOverflow { location, .. }
            | RuntimeError::StackExhausted { location, .. }
            | RuntimeError::ThreadSpawn { location, .. }
            | RuntimeError::ForeignCall { location, .. }
            | RuntimeError::HostFailure { location, .. }
            | RuntimeError::Cancelled { location, .. }
            | RuntimeError::UndefinedVariable { location, .. }
            | RuntimeError::UndefinedFunction { location, .. }
            | RuntimeError::TypeMismatch { location, .. }
            | RuntimeError::NoStackFrame { location } => *location,
        }
    }

    /// True for [`RuntimeError::Cancelled`], which is not a program error
    pub fn is_cancellation(&self) -> bool {
        matches!(self, RuntimeError::Cancelled { .. })
    }
}
