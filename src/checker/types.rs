//! Resolved types
//!
//! [`Type`] is the canonical form the checker works with once a
//! [`TypeName`] from the source has been resolved. `bool` and `void` are
//! internal: they describe comparison results and calls without a return
//! value, and source code can never name them.

use crate::parser::ast::TypeName;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    Char,
    Bool,
    Void,
    Function(FunctionType),
}

/// Signature of a user function or an external declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionType {
    pub params: Vec<Type>,
    /// [`Type::Void`] when the function declares no return type
    pub ret: Box<Type>,
}

impl FunctionType {
    pub fn new(params: Vec<Type>, ret: Option<Type>) -> Self {
        FunctionType {
            params,
            ret: Box::new(ret.unwrap_or(Type::Void)),
        }
    }

    /// The declared return type, `None` for `void`
    pub fn return_type(&self) -> Option<&Type> {
        match self.ret.as_ref() {
            Type::Void => None,
            ty => Some(ty),
        }
    }
}

impl Type {
    /// Resolve a source type name. Only `int` and `char` can be written.
    pub fn from_name(name: &TypeName) -> Option<Type> {
        match name.name.as_str() {
            "int" => Some(Type::Int),
            "char" => Some(Type::Char),
            _ => None,
        }
    }

    /// Types a variable or parameter may have
    pub fn is_storable(&self) -> bool {
        matches!(self, Type::Int | Type::Char)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Char => write!(f, "char"),
            Type::Bool => write!(f, "bool"),
            Type::Void => write!(f, "void"),
            Type::Function(sig) => write!(f, "{}", sig),
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "function(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")")?;
        if let Some(ret) = self.return_type() {
            write!(f, ": {}", ret)?;
        }
        Ok(())
    }
}
