//! Uniform error reporting
//!
//! Every failure a source file can produce, whether while lexing, parsing,
//! checking or running, converts into a [`Diagnostic`]. Hosts that only
//! want to show the user what went wrong use [`Diagnostic::render`]:
//!
//! ```text
//! fib.toy:3:14: runtime error: Division by zero in '/'
//!     let q = n / 0
//!               ^
//! ```

use crate::checker::TypeError;
use crate::interpreter::RuntimeError;
use crate::parser::ast::SourceLocation;
use crate::parser::lexer::LexError;
use crate::parser::ParseError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lex,
    Parse,
    Type,
    Runtime,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticKind::Lex => "lex error",
            DiagnosticKind::Parse => "parse error",
            DiagnosticKind::Type => "type error",
            DiagnosticKind::Runtime => "runtime error",
        };
        write!(f, "{}", label)
    }
}

/// An error with its kind and 1-based position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, location: SourceLocation) -> Self {
        Diagnostic {
            kind,
            message: message.into(),
            line: location.line,
            column: location.column,
        }
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }

    /// Render as `file:line:col: kind: message`, followed by the offending
    /// source line and a caret under the column when the line exists
    pub fn render(&self, file_name: &str, source: &str) -> String {
        let mut out = format!(
            "{}:{}:{}: {}: {}",
            file_name, self.line, self.column, self.kind, self.message
        );

        if let Some(text) = self.line.checked_sub(1).and_then(|idx| source.lines().nth(idx)) {
            let gutter = "    ";
            let padding: String = text
                .chars()
                .take(self.column.saturating_sub(1))
                .map(|c| if c == '\t' { '\t' } else { ' ' })
                .collect();
            out.push('\n');
            out.push_str(gutter);
            out.push_str(text);
            out.push('\n');
            out.push_str(gutter);
            out.push_str(&padding);
            out.push('^');
        }

        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, column {}: {}",
            self.kind, self.line, self.column, self.message
        )
    }
}

impl From<&LexError> for Diagnostic {
    fn from(err: &LexError) -> Self {
        Diagnostic::new(DiagnosticKind::Lex, err.message.clone(), err.location)
    }
}

impl From<&ParseError> for Diagnostic {
    fn from(err: &ParseError) -> Self {
        match err {
            ParseError::Lex(lex) => Diagnostic::from(lex),
            ParseError::Syntax { message, location } => {
                Diagnostic::new(DiagnosticKind::Parse, message.clone(), *location)
            }
        }
    }
}

impl From<&TypeError> for Diagnostic {
    fn from(err: &TypeError) -> Self {
        Diagnostic::new(DiagnosticKind::Type, err.message.clone(), err.location)
    }
}

impl From<&RuntimeError> for Diagnostic {
    fn from(err: &RuntimeError) -> Self {
        let location = err.location();
        // Runtime messages end with their position; the diagnostic carries it separately
        let full = err.to_string();
        let suffix = format!(" at line {}, column {}", location.line, location.column);
        let message = full.strip_suffix(&suffix).unwrap_or(&full).to_string();
        Diagnostic::new(DiagnosticKind::Runtime, message, location)
    }
}
