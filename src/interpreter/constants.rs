// Constants for the interpreter

/// Maximum number of nested function calls before `StackOverflow`
/// The entry frame for top-level statements does not count
pub const DEFAULT_MAX_CALL_DEPTH: usize = 128;

/// Largest call depth a configuration may ask for
pub const MAX_CALL_DEPTH_LIMIT: usize = 1024;

/// Native stack reserved for the interpreter thread before any call
pub const NATIVE_STACK_BASE: usize = 4 * 1024 * 1024;

/// Native stack reserved per allowed level of call depth
pub const NATIVE_STACK_PER_CALL: usize = 64 * 1024;

/// Headroom kept free below the native stack guard
pub const NATIVE_STACK_RED_ZONE: usize = 256 * 1024;

/// Name of the interpreter thread
pub const RUN_THREAD_NAME: &str = "toyscript-run";

/// Name of the frame that runs top-level statements
pub const ENTRY_FRAME_NAME: &str = "<entry>";
