//! Runtime memory model
//!
//! - [`value`]: Runtime value representation (Int, Char, Bool)
//! - [`stack`]: Call stack with frames and scoped local variables
//!
//! There is no heap and no addressable memory: every variable is a named
//! slot in the frame of the function that declared it.

pub mod stack;
pub mod value;
