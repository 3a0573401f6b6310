//! Call stack implementation
//!
//! This module provides the call stack for function execution:
//! - [`Stack`]: The call stack containing frames
//! - [`StackFrame`]: A single function's activation record
//!
//! # Scoping
//!
//! Locals live in one map per frame. Each nested scope records the names it
//! declared and the outer bindings it shadowed, so leaving the scope removes
//! the former and restores the latter.

use super::value::Value;
use crate::parser::ast::SourceLocation;
use rustc_hash::FxHashMap;

/// Stack frame for a function call (or the top-level entry point)
#[derive(Debug, Clone)]
pub struct StackFrame {
    pub function_name: String,
    /// Call site, `None` for the entry frame
    pub call_location: Option<SourceLocation>,
    locals: FxHashMap<String, Value>,
    scope_stack: Vec<ScopeData>,
}

#[derive(Debug, Clone, Default)]
struct ScopeData {
    shadowed: Vec<(String, Value)>,
    declared: Vec<String>,
}

impl StackFrame {
    pub fn new(function_name: String, call_location: Option<SourceLocation>) -> Self {
        StackFrame {
            function_name,
            call_location,
            locals: FxHashMap::default(),
            scope_stack: Vec::new(),
        }
    }

    /// Enter a new scope
    pub fn push_scope(&mut self) {
        self.scope_stack.push(ScopeData::default());
    }

    /// Exit the current scope
    pub fn pop_scope(&mut self) {
        if let Some(scope) = self.scope_stack.pop() {
            // Remove variables declared in this scope
            for name in scope.declared {
                self.locals.remove(&name);
            }

            // Restore shadowed variables
            for (name, value) in scope.shadowed {
                self.locals.insert(name, value);
            }
        }
    }

    /// Declare a new local variable in the innermost scope
    pub fn declare_var(&mut self, name: String, value: Value) {
        let previous = self.locals.insert(name.clone(), value);

        if let Some(scope) = self.scope_stack.last_mut() {
            match previous {
                Some(old) => scope.shadowed.push((name, old)),
                None => scope.declared.push(name),
            }
        }
    }

    /// Get a local variable
    pub fn get_var(&self, name: &str) -> Option<Value> {
        self.locals.get(name).copied()
    }

    /// Get a mutable reference to a local variable
    pub fn get_var_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.locals.get_mut(name)
    }

    pub fn scope_depth(&self) -> usize {
        self.scope_stack.len()
    }
}

/// The call stack
#[derive(Debug, Clone, Default)]
pub struct Stack {
    frames: Vec<StackFrame>,
}

impl Stack {
    pub fn new() -> Self {
        Stack { frames: Vec::new() }
    }

    /// Push a new stack frame
    pub fn push_frame(&mut self, function_name: String, call_location: Option<SourceLocation>) {
        self.frames
            .push(StackFrame::new(function_name, call_location));
    }

    /// Pop the top stack frame
    pub fn pop_frame(&mut self) -> Option<StackFrame> {
        self.frames.pop()
    }

    /// Get the current (top) frame
    pub fn current_frame(&self) -> Option<&StackFrame> {
        self.frames.last()
    }

    /// Get a mutable reference to the current frame
    pub fn current_frame_mut(&mut self) -> Option<&mut StackFrame> {
        self.frames.last_mut()
    }

    /// Get the depth of the call stack
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
