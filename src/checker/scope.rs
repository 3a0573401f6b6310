//! Lexical scopes for the checker
//!
//! A [`SymbolTable`] is a stack of name → [`Symbol`] maps. Lookups walk from
//! the innermost scope outward; declarations only conflict with names in
//! the innermost scope, so shadowing an outer variable is allowed.

use super::types::Type;
use crate::parser::ast::SourceLocation;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
pub struct Symbol {
    pub ty: Type,
    pub is_const: bool,
    pub location: SourceLocation,
}

/// Scope stack; the outermost scope is never popped
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<FxHashMap<String, Symbol>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![FxHashMap::default()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Declare a name in the innermost scope.
    ///
    /// On conflict, returns the location of the earlier declaration.
    pub fn declare(&mut self, name: &str, symbol: Symbol) -> Result<(), SourceLocation> {
        let Some(scope) = self.scopes.last_mut() else {
            return Ok(());
        };
        if let Some(existing) = scope.get(name) {
            return Err(existing.location);
        }
        scope.insert(name.to_string(), symbol);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(ty: Type, line: usize) -> Symbol {
        Symbol {
            ty,
            is_const: false,
            location: SourceLocation::new(line, 1),
        }
    }

    #[test]
    fn test_shadowing_and_scope_exit() {
        let mut table = SymbolTable::new();
        table.push_scope();
        table.declare("x", symbol(Type::Int, 1)).unwrap();

        table.push_scope();
        table.declare("x", symbol(Type::Char, 2)).unwrap();
        assert_eq!(table.lookup("x").unwrap().ty, Type::Char);

        table.pop_scope();
        assert_eq!(table.lookup("x").unwrap().ty, Type::Int);
    }

    #[test]
    fn test_redeclaration_in_same_scope() {
        let mut table = SymbolTable::new();
        table.push_scope();
        table.declare("x", symbol(Type::Int, 1)).unwrap();
        let err = table.declare("x", symbol(Type::Int, 3)).unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_declare_after_popping_to_global_scope() {
        let mut table = SymbolTable::new();
        table.push_scope();
        table.declare("inner", symbol(Type::Int, 1)).unwrap();
        table.pop_scope();
        table.pop_scope();

        table.declare("outer", symbol(Type::Char, 2)).unwrap();
        assert!(table.lookup("inner").is_none());
        assert_eq!(table.lookup("outer").unwrap().ty, Type::Char);
        assert!(table.declare("outer", symbol(Type::Char, 3)).is_err());
    }

    #[test]
    fn test_unknown_name() {
        let table = SymbolTable::new();
        assert!(table.lookup("missing").is_none());
    }
}
