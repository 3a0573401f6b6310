// Execution engine for the interpreter

use crate::checker::typed::CheckedProgram;
use crate::host::HostRegistry;
use crate::interpreter::config::InterpreterConfig;
use crate::interpreter::constants::{ENTRY_FRAME_NAME, NATIVE_STACK_RED_ZONE, RUN_THREAD_NAME};
use crate::interpreter::errors::RuntimeError;
use crate::memory::stack::{Stack, StackFrame};
use crate::memory::value::Value;
use crate::parser::ast::SourceLocation;

/// Control flow signal raised by a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ControlFlow {
    Normal,
    Break,
    Continue,
    Return,
}

/// Native stack of the interpreter thread, measured from where the run began
#[derive(Debug, Clone, Copy)]
pub(crate) struct NativeStack {
    origin: usize,
    usable: usize,
}

impl NativeStack {
    fn new(size: usize) -> Self {
        NativeStack {
            origin: Self::position(),
            usable: size.saturating_sub(NATIVE_STACK_RED_ZONE),
        }
    }

    #[inline(never)]
    fn position() -> usize {
        let marker = 0u8;
        std::hint::black_box(std::ptr::addr_of!(marker)) as usize
    }

    fn is_exhausted(&self) -> bool {
        self.origin.abs_diff(Self::position()) > self.usable
    }
}

/// The interpreter that executes a checked program
pub struct Interpreter<'a> {
    /// Checked program, borrowed so it can be run again
    pub(crate) program: &'a CheckedProgram,

    /// Foreign functions available to `declare function`
    pub(crate) host: &'a mut HostRegistry,

    pub(crate) config: InterpreterConfig,

    /// Call stack
    pub(crate) stack: Stack,

    /// Signal set by `break`, `continue` or `return`, cleared by the loop or call that consumes it
    pub(crate) control_flow: ControlFlow,

    /// Return value of the function currently unwinding
    pub(crate) return_value: Option<Value>,

    /// Statements and loop iterations executed in the current run
    steps: u64,

    /// Set while a run is executing on the interpreter thread
    native_stack: Option<NativeStack>,
}

impl<'a> Interpreter<'a> {
    pub fn new(
        program: &'a CheckedProgram,
        host: &'a mut HostRegistry,
        config: InterpreterConfig,
    ) -> Self {
        Interpreter {
            program,
            host,
            config,
            stack: Stack::new(),
            control_flow: ControlFlow::Normal,
            return_value: None,
            steps: 0,
            native_stack: None,
        }
    }

    /// Run the top-level statements from start to finish.
    ///
    /// The run executes on a dedicated thread whose stack is sized from the
    /// configured call depth; this call blocks until it finishes. A panic in
    /// a host function is resumed on the calling thread.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        let stack_size = self.config.native_stack_size();

        std::thread::scope(|scope| {
            let handle = std::thread::Builder::new()
                .name(RUN_THREAD_NAME.to_string())
                .stack_size(stack_size)
                .spawn_scoped(scope, || self.run_on_current_thread(stack_size))
                .map_err(|err| RuntimeError::ThreadSpawn {
                    message: err.to_string(),
                    location: SourceLocation::default(),
                })?;

            match handle.join() {
                Ok(result) => result,
                Err(payload) => std::panic::resume_unwind(payload),
            }
        })
    }

    fn run_on_current_thread(&mut self, stack_size: usize) -> Result<(), RuntimeError> {
        self.native_stack = Some(NativeStack::new(stack_size));
        self.stack = Stack::new();
        self.control_flow = ControlFlow::Normal;
        self.return_value = None;
        self.steps = 0;

        let program = self.program;
        self.stack.push_frame(ENTRY_FRAME_NAME.to_string(), None);
        let result = self.execute_scoped_block(&program.entry);
        self.stack.pop_frame();
        self.native_stack = None;

        match &result {
            Ok(()) => tracing::debug!(steps = self.steps, "run finished"),
            Err(err) => tracing::warn!(error = %err, steps = self.steps, "run aborted"),
        }
        result
    }

    /// Number of steps the last (or current) run has taken
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub(crate) fn enter_scope(&mut self) {
        if let Some(frame) = self.stack.current_frame_mut() {
            frame.push_scope();
        }
    }

    pub(crate) fn exit_scope(&mut self) {
        if let Some(frame) = self.stack.current_frame_mut() {
            frame.pop_scope();
        }
    }

    /// Fail with `StackExhausted` when the native stack is nearly used up
    pub(crate) fn check_native_stack(&self, location: SourceLocation) -> Result<(), RuntimeError> {
        match self.native_stack {
            Some(native) if native.is_exhausted() => Err(RuntimeError::StackExhausted {
                function: self
                    .stack
                    .current_frame()
                    .map_or(ENTRY_FRAME_NAME, |frame| frame.function_name.as_str())
                    .to_string(),
                location,
            }),
            _ => Ok(()),
        }
    }

    /// Count one step and honour the step budget and cancellation token
    pub(crate) fn tick(&mut self, location: SourceLocation) -> Result<(), RuntimeError> {
        self.steps += 1;

        if let Some(budget) = self.config.step_budget {
            if self.steps > budget {
                return Err(RuntimeError::Cancelled {
                    reason: format!("step budget of {} exhausted", budget),
                    location,
                });
            }
        }

        if let Some(token) = &self.config.cancellation {
            if token.is_cancelled() {
                return Err(RuntimeError::Cancelled {
                    reason: "cancelled by host".to_string(),
                    location,
                });
            }
        }

        Ok(())
    }

    pub(crate) fn current_frame_mut(
        &mut self,
        location: SourceLocation,
    ) -> Result<&mut StackFrame, RuntimeError> {
        self.stack
            .current_frame_mut()
            .ok_or(RuntimeError::NoStackFrame { location })
    }

    pub(crate) fn read_var(&self, name: &str, location: SourceLocation) -> Result<Value, RuntimeError> {
        self.stack
            .current_frame()
            .ok_or(RuntimeError::NoStackFrame { location })?
            .get_var(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_string(),
                location,
            })
    }

    pub(crate) fn write_var(
        &mut self,
        name: &str,
        value: Value,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let slot = self
            .current_frame_mut(location)?
            .get_var_mut(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_string(),
                location,
            })?;
        *slot = value;
        Ok(())
    }

    pub(crate) fn declare_var(
        &mut self,
        name: &str,
        value: Value,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        self.current_frame_mut(location)?
            .declare_var(name.to_string(), value);
        Ok(())
    }
}
