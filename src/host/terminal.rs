//! Capturing terminal
//!
//! [`Terminal`] provides `putchar` to programs and records every byte they
//! write. Output is shared through an `Arc<Mutex<_>>`, so the registry can
//! own the installed closure (which runs on the interpreter thread) while the
//! host keeps a handle to read what was printed.

use super::{HostError, HostRegistry};
use crate::checker::types::{FunctionType, Type};
use crate::memory::value::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Default)]
pub struct Terminal {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Terminal {
    pub fn new() -> Self {
        Terminal::default()
    }

    /// Register `putchar(c: char)` in `registry`, writing into this terminal
    pub fn install(&self, registry: &mut HostRegistry) {
        let buffer = Arc::clone(&self.buffer);
        registry.register_typed(
            "putchar",
            FunctionType::new(vec![Type::Char], None),
            move |args: &[Value]| match args {
                [Value::Char(c)] => {
                    buffer
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(*c);
                    Ok(None)
                }
                _ => Err(HostError::new("putchar expects a single char argument")),
            },
        );
    }

    fn buffer(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Raw bytes written so far
    pub fn bytes(&self) -> Vec<u8> {
        self.buffer().clone()
    }

    /// Output decoded as text (bytes above 0x7f become U+FFFD)
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.buffer()).into_owned()
    }

    /// Get all lines, without their terminating newlines
    pub fn lines(&self) -> Vec<String> {
        let text = self.output();
        let mut result: Vec<String> = text.split('\n').map(|s| s.to_string()).collect();
        // Remove trailing empty string if text ended with newline
        if result.last().is_some_and(|s| s.is_empty()) {
            result.pop();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_putchar_records_bytes() {
        let terminal = Terminal::new();
        let mut host = HostRegistry::new();
        terminal.install(&mut host);

        for &c in b"hi\nthere\n" {
            assert_eq!(host.call("putchar", &[Value::Char(c)]), Ok(None));
        }

        assert_eq!(terminal.output(), "hi\nthere\n");
        assert_eq!(terminal.lines(), vec!["hi", "there"]);
    }

    #[test]
    fn test_putchar_rejects_wrong_arguments() {
        let terminal = Terminal::new();
        let mut host = HostRegistry::new();
        terminal.install(&mut host);

        assert!(host.call("putchar", &[Value::Int(65)]).is_err());
        assert!(terminal.bytes().is_empty());
    }
}
