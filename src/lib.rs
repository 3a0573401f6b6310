//! # Introduction
//!
//! toyscript is a small, statically typed, C-flavoured scripting language.
//! Source text is tokenised, parsed, type checked and then executed by a
//! tree-walking interpreter. Programs reach the outside world only through
//! `declare function` bindings supplied by the embedding host.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Checker → CheckedProgram → Interpreter
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds an AST.
//! 2. [`checker`]: resolves names, checks types and produces a
//!    [`checker::typed::CheckedProgram`] with every call resolved.
//! 3. [`interpreter`]: walks the checked program with a call stack of
//!    [`memory::stack::StackFrame`]s holding [`memory::value::Value`]s.
//! 4. [`host`]: the [`host::HostRegistry`] of foreign functions, plus a
//!    capturing [`host::terminal::Terminal`] that provides `putchar`.
//! 5. [`diagnostics`]: every error as a positioned [`diagnostics::Diagnostic`].
//!
//! ## Language
//!
//! Types: `int` (32-bit, wrapping), `char` (byte, wrapping), and `bool`
//! as the type of comparisons and of `&&`/`||`. Statements: `let`/`const`,
//! `for`, `while`, `break`/`continue`, `if/else`, `return`, blocks and
//! expressions. Statements end at `;` or a newline.
//!
//! ```
//! use toyscript::host::{terminal::Terminal, HostRegistry};
//! use toyscript::interpreter::InterpreterConfig;
//!
//! let terminal = Terminal::new();
//! let mut host = HostRegistry::new();
//! terminal.install(&mut host);
//!
//! let source = "
//! declare function putchar(c: char)
//! for (let i = 0; i < 3; i++) { putchar('a' + i as char) }
//! ";
//! toyscript::run(source, &mut host, InterpreterConfig::default()).unwrap();
//! assert_eq!(terminal.output(), "abc");
//! ```

pub mod checker;
pub mod diagnostics;
pub mod host;
pub mod interpreter;
pub mod memory;
pub mod parser;

use checker::typed::CheckedProgram;
use checker::TypeError;
use diagnostics::Diagnostic;
use host::HostRegistry;
use interpreter::{Interpreter, InterpreterConfig, RuntimeError};
use parser::ast::Program;
use parser::lexer::LexError;
use parser::{ParseError, Parser};
use thiserror::Error;

/// Any error the pipeline can produce
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    pub fn diagnostic(&self) -> Diagnostic {
        match self {
            Error::Lex(err) => Diagnostic::from(err),
            Error::Parse(err) => Diagnostic::from(err),
            Error::Type(err) => Diagnostic::from(err),
            Error::Runtime(err) => Diagnostic::from(err),
        }
    }
}

/// Parse `source` into an AST
pub fn parse(source: &str) -> Result<Program, Error> {
    let mut parser = Parser::new(source)?;
    Ok(parser.parse_program()?)
}

/// Parse and type check `source` against the functions `host` provides
pub fn compile(source: &str, host: &HostRegistry) -> Result<CheckedProgram, Error> {
    let program = parse(source)?;
    Ok(checker::check(&program, host)?)
}

/// Compile and run `source`. Nothing executes unless the whole program checks.
pub fn run(source: &str, host: &mut HostRegistry, config: InterpreterConfig) -> Result<(), Error> {
    let program = compile(source, host)?;
    let mut interpreter = Interpreter::new(&program, host, config);
    interpreter.run()?;
    Ok(())
}

/// Pretty-printed AST of `source`
pub fn explain_ast(source: &str) -> Result<String, Error> {
    Ok(format!("{:#?}", parse(source)?))
}

/// Pretty-printed checked program of `source`
pub fn explain_types(source: &str, host: &HostRegistry) -> Result<String, Error> {
    Ok(format!("{:#?}", compile(source, host)?))
}
