//! Static type checker
//!
//! Turns a parsed [`Program`] into a [`CheckedProgram`] or reports the first
//! [`TypeError`]. Nothing executes unless checking succeeds.
//!
//! # Passes
//!
//! 1. `declarations`: every `function` and `declare function` signature is
//!    resolved and registered in a global table, so calls may refer to
//!    functions declared later in the file. External declarations are
//!    validated against the [`HostRegistry`].
//! 2. `statements` / `expressions`: function bodies are checked, each with
//!    a fresh scope stack holding only its parameters and locals, then the
//!    top-level statements are checked as the entry point.
//!
//! # Modules
//!
//! - [`types`]: resolved [`Type`] and [`FunctionType`]
//! - [`scope`]: [`scope::SymbolTable`] for locals
//! - [`typed`]: the checked program handed to the interpreter

mod declarations;
mod expressions;
pub mod scope;
mod statements;
pub mod typed;
pub mod types;

use crate::host::HostRegistry;
use crate::parser::ast::{Program, SourceLocation};
use rustc_hash::FxHashMap;
use scope::SymbolTable;
use thiserror::Error;
use typed::{Callee, CheckedProgram};
use types::{FunctionType, Type};

/// Type checking error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Type error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct TypeError {
    pub message: String,
    pub location: SourceLocation,
}

impl TypeError {
    pub(crate) fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        TypeError {
            message: message.into(),
            location,
        }
    }
}

/// The function whose body is being checked
struct FunctionContext {
    name: String,
    return_type: Option<Type>,
}

pub struct Checker<'h> {
    host: &'h HostRegistry,
    /// Global function table: user functions and externals
    functions: FxHashMap<String, (Callee, FunctionType)>,
    scopes: SymbolTable,
    /// `None` while checking top-level statements
    current_function: Option<FunctionContext>,
    /// Number of enclosing `for`/`while` bodies
    loop_depth: usize,
}

impl<'h> Checker<'h> {
    pub fn new(host: &'h HostRegistry) -> Self {
        Checker {
            host,
            functions: FxHashMap::default(),
            scopes: SymbolTable::new(),
            current_function: None,
            loop_depth: 0,
        }
    }

    /// Check a whole program
    pub fn check_program(mut self, program: &Program) -> Result<CheckedProgram, TypeError> {
        let mut checked = CheckedProgram::default();

        // Pass 1: signatures
        self.register_declarations(program, &mut checked)?;

        // Pass 2: function bodies, then the entry point
        for (idx, func) in program.functions().enumerate() {
            let body = self.check_function_body(func, &checked.functions[idx].signature)?;
            checked.functions[idx].body = body;
        }

        self.scopes = SymbolTable::new();
        self.current_function = None;
        self.loop_depth = 0;
        checked.entry = program
            .statements()
            .map(|stmt| self.check_statement(stmt))
            .collect::<Result<_, _>>()?;

        tracing::debug!(
            functions = checked.functions.len(),
            externals = checked.externals.len(),
            entry_statements = checked.entry.len(),
            "type checked program"
        );
        Ok(checked)
    }
}

/// Type check `program` against the functions `host` provides
pub fn check(program: &Program, host: &HostRegistry) -> Result<CheckedProgram, TypeError> {
    Checker::new(host).check_program(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::terminal::Terminal;
    use crate::parser::Parser;

    fn check_source(source: &str) -> Result<CheckedProgram, TypeError> {
        let program = Parser::new(source).unwrap().parse_program().unwrap();
        let mut host = HostRegistry::new();
        Terminal::new().install(&mut host);
        check(&program, &host)
    }

    fn check_err(source: &str) -> TypeError {
        check_source(source).unwrap_err()
    }

    #[test]
    fn test_forward_reference_and_recursion() {
        let checked = check_source(
            "print(fib(10))\n\
             function fib(n: int): int {\n  if n < 2 { return n }\n  return fib(n - 1) + fib(n - 2)\n}\n\
             function print(n: int) {}\n",
        )
        .unwrap();
        assert_eq!(checked.functions.len(), 2);
        assert_eq!(checked.entry.len(), 1);
    }

    #[test]
    fn test_char_arithmetic_for_putchar() {
        check_source(
            "declare function putchar(c: char)\n\
             let i = 7\n\
             putchar('0' + (i as char))\n",
        )
        .unwrap();
    }

    #[test]
    fn test_mixed_arithmetic_is_rejected() {
        let err = check_err("let x = 'a' + 1");
        assert!(err.message.contains("same type"), "{}", err.message);
        assert_eq!(err.location, SourceLocation::new(1, 13));
    }

    #[test]
    fn test_undeclared_function() {
        let err = check_err("foo(1)");
        assert!(err.message.contains("undeclared function 'foo'"));
        assert_eq!(err.location, SourceLocation::new(1, 1));
    }

    #[test]
    fn test_external_without_binding() {
        let err = check_err("declare function getchar(): char");
        assert!(err.message.contains("getchar"));
    }

    #[test]
    fn test_external_signature_must_match_host() {
        let err = check_err("declare function putchar(c: int)");
        assert!(err.message.contains("function(char)"), "{}", err.message);
    }

    #[test]
    fn test_missing_return_path() {
        let err = check_err("function f(n: int): int {\n  if n > 0 { return 1 }\n}");
        assert!(err.message.contains("every path"));
        assert_eq!(err.location, SourceLocation::new(1, 1));
    }

    #[test]
    fn test_if_else_returns_on_every_path() {
        check_source("function sign(n: int): int {\n  if n < 0 { return -1 } else if n > 0 { return 1 } else { return 0 }\n}")
            .unwrap();
    }

    #[test]
    fn test_void_function_cannot_return_value() {
        let err = check_err("function f() { return 1 }");
        assert!(err.message.contains("no return type"));
    }

    #[test]
    fn test_return_outside_function() {
        let err = check_err("return");
        assert!(err.message.contains("outside"));
    }

    #[test]
    fn test_assignment_to_const() {
        let err = check_err("const x = 1\nx = 2");
        assert!(err.message.contains("constant 'x'"));
        assert_eq!(err.location.line, 2);

        let err = check_err("const c = 'a'\nc++");
        assert!(err.message.contains("constant 'c'"));
    }

    #[test]
    fn test_redeclaration_and_shadowing() {
        let err = check_err("let x = 1\nlet x = 2");
        assert!(err.message.contains("already declared"));

        check_source("let x = 1\n{ let x = 'a' }\nx = 2").unwrap();
    }

    #[test]
    fn test_top_level_variables_are_not_visible_in_functions() {
        let err = check_err("let g = 1\nfunction f(): int { return g }");
        assert!(err.message.contains("Unresolved identifier 'g'"));
    }

    #[test]
    fn test_condition_must_be_bool() {
        let err = check_err("let x = 1\nif x { x = 2 }");
        assert!(err.message.contains("bool"));
    }

    #[test]
    fn test_casts() {
        check_source("let a = 65 as char\nlet b = a as int\nlet c = b as int").unwrap();
    }

    #[test]
    fn test_unknown_type_name() {
        let err = check_err("let x: bool = 1 < 2");
        assert!(err.message.contains("Unknown type 'bool'"));
        assert_eq!(err.location, SourceLocation::new(1, 8));
    }

    #[test]
    fn test_cannot_store_void_or_bool() {
        let err = check_err("function f() {}\nlet v = f()");
        assert!(err.message.contains("void"));

        let err = check_err("let b = 1 < 2");
        assert!(err.message.contains("bool"));
    }

    #[test]
    fn test_uninitialized_declaration_needs_annotation() {
        let err = check_err("let x");
        assert!(err.message.contains("annotation"));
        check_source("let x: char\nx = 'a'").unwrap();
    }

    #[test]
    fn test_argument_checks() {
        let err = check_err("function f(a: int) {}\nf(1, 2)");
        assert!(err.message.contains("expects 1 argument"));

        let err = check_err("function f(a: int) {}\nf('a')");
        assert!(err.message.contains("Argument 1"));
        assert_eq!(err.location, SourceLocation::new(2, 3));
    }

    #[test]
    fn test_function_name_is_not_a_value() {
        let err = check_err("function f() {}\nlet x = f");
        assert!(err.message.contains("cannot be used as a value"));
    }

    #[test]
    fn test_while_break_continue() {
        let checked = check_source(
            "let i = 0
             while i < 10 {
  i++
  if i == 3 { continue }
  if i > 5 { break }
}
",
        )
        .unwrap();
        assert!(matches!(checked.entry[1], typed::TypedStmt::While { .. }));

        let err = check_err("let i = 0
while i { i++ }");
        assert!(err.message.contains("'while' must be bool"), "{}", err.message);
    }

    #[test]
    fn test_break_and_continue_outside_loop() {
        let err = check_err("break");
        assert!(err.message.contains("'break' outside of a loop"));

        let err = check_err("continue");
        assert!(err.message.contains("'continue' outside of a loop"));
    }

    #[test]
    fn test_loop_does_not_leak_into_called_function_body() {
        let err = check_err(
            "for (let i = 0; i < 3; i++) { f() }
function f() { break }",
        );
        assert!(err.message.contains("'break' outside of a loop"));
        assert_eq!(err.location, SourceLocation::new(2, 16));

        check_source("function f() { for (;;) { { break } } }").unwrap();
    }

    #[test]
    fn test_logical_operators_need_bool() {
        check_source("let a = 1
if a > 0 && !(a == 2) || a < -5 { a = 0 }").unwrap();

        let err = check_err("let a = 1
if a && a > 0 { a = 0 }");
        assert!(err.message.contains("'&&' requires bool operands"), "{}", err.message);
        assert_eq!(err.location, SourceLocation::new(2, 6));
    }

    #[test]
    fn test_duplicate_function() {
        let err = check_err("function f() {}\nfunction f() {}");
        assert!(err.message.contains("already declared"));
        assert_eq!(err.location.line, 2);
    }
}
