//! Foreign call bridge
//!
//! Programs reach the outside world only through functions they `declare`.
//! The embedding host supplies the implementations in a [`HostRegistry`]:
//! a map from name to [`HostFunction`]. The checker rejects any external
//! declaration with no registry entry, and when a binding was registered
//! with a signature, the declaration must match it exactly.
//!
//! ```
//! use toyscript::checker::types::{FunctionType, Type};
//! use toyscript::host::{HostError, HostRegistry};
//! use toyscript::memory::value::Value;
//!
//! let mut host = HostRegistry::new();
//! host.register_typed(
//!     "double",
//!     FunctionType::new(vec![Type::Int], Some(Type::Int)),
//!     |args: &[Value]| match args {
//!         [Value::Int(n)] => Ok(Some(Value::Int(n.wrapping_mul(2)))),
//!         _ => Err(HostError::new("double expects one int")),
//!     },
//! );
//! assert!(host.contains("double"));
//! ```

pub mod terminal;

use crate::checker::types::FunctionType;
use crate::memory::value::Value;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Failure reported by a host function
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        HostError {
            message: message.into(),
        }
    }
}

/// A callable provided by the host.
///
/// Programs run on a dedicated interpreter thread, so bindings must be `Send`.
pub trait HostFunction: Send {
    fn call(&mut self, args: &[Value]) -> Result<Option<Value>, HostError>;
}

impl<F> HostFunction for F
where
    F: FnMut(&[Value]) -> Result<Option<Value>, HostError> + Send,
{
    fn call(&mut self, args: &[Value]) -> Result<Option<Value>, HostError> {
        self(args)
    }
}

pub struct HostBinding {
    signature: Option<FunctionType>,
    function: Box<dyn HostFunction>,
}

impl HostBinding {
    /// The signature the host requires, if it registered one
    pub fn signature(&self) -> Option<&FunctionType> {
        self.signature.as_ref()
    }
}

impl std::fmt::Debug for HostBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostBinding")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Name → host function table
#[derive(Debug, Default)]
pub struct HostRegistry {
    bindings: FxHashMap<String, HostBinding>,
}

impl HostRegistry {
    pub fn new() -> Self {
        HostRegistry::default()
    }

    /// Register a function that accepts whatever signature the program declares
    pub fn register<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: FnMut(&[Value]) -> Result<Option<Value>, HostError> + Send + 'static,
    {
        self.insert(name.into(), None, Box::new(function));
    }

    /// Register a function that programs must declare with exactly `signature`
    pub fn register_typed<F>(&mut self, name: impl Into<String>, signature: FunctionType, function: F)
    where
        F: FnMut(&[Value]) -> Result<Option<Value>, HostError> + Send + 'static,
    {
        self.insert(name.into(), Some(signature), Box::new(function));
    }

    fn insert(&mut self, name: String, signature: Option<FunctionType>, function: Box<dyn HostFunction>) {
        tracing::trace!(%name, "registering host function");
        self.bindings.insert(
            name,
            HostBinding {
                signature,
                function,
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn binding(&self, name: &str) -> Option<&HostBinding> {
        self.bindings.get(name)
    }

    /// Invoke a host function by name
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Option<Value>, HostError> {
        match self.bindings.get_mut(name) {
            Some(binding) => binding.function.call(args),
            None => Err(HostError::new(format!("no host function named '{}'", name))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::types::Type;

    #[test]
    fn test_closure_keeps_state_between_calls() {
        let mut count = 0;
        let mut host = HostRegistry::new();
        host.register("tick", move |_: &[Value]| {
            count += 1;
            Ok(Some(Value::Int(count)))
        });

        assert_eq!(host.call("tick", &[]), Ok(Some(Value::Int(1))));
        assert_eq!(host.call("tick", &[]), Ok(Some(Value::Int(2))));
    }

    #[test]
    fn test_signature_is_recorded() {
        let mut host = HostRegistry::new();
        host.register_typed(
            "id",
            FunctionType::new(vec![Type::Int], Some(Type::Int)),
            |args: &[Value]| Ok(args.first().copied()),
        );
        host.register("any", |_: &[Value]| Ok(None));

        let sig = host.binding("id").and_then(HostBinding::signature).unwrap();
        assert_eq!(sig.params, vec![Type::Int]);
        assert!(host.binding("any").unwrap().signature().is_none());
    }

    #[test]
    fn test_missing_function() {
        let mut host = HostRegistry::new();
        assert!(!host.contains("nope"));
        assert!(host.call("nope", &[]).is_err());
    }
}
