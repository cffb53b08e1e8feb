//! Lexical and syntax errors are not raised, they are collected. Every stage
//! of a run receives the same `Diagnostics` and appends to it; the driver
//! checks [`Diagnostics::has_errors`] before handing the output of one stage
//! to the next.

use std::fmt::Display;

use cursor::Line;
use itertools::Itertools;

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("[line {line}] Error{}: {message}", if at.is_empty() { "".to_string() } else { format!(" at {at}") })]
pub struct Diagnostic {
    pub line: Line,
    /// Already quoted location, e.g. `'+'` or `end`. Empty if the diagnostic
    /// is only anchored to a line.
    pub at: String,
    pub message: String,
}

impl Diagnostic {
    fn new(line: Line, message: impl ToString) -> Self {
        Self { line, at: String::new(), message: message.to_string() }
    }

    fn at(line: Line, at: impl ToString, message: impl ToString) -> Self {
        Self { line, at: at.to_string(), message: message.to_string() }
    }
}

#[derive(thiserror::Error, Debug, Default, Clone, PartialEq, derive_more::Deref)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, line: Line, message: impl ToString) {
        self.push(Diagnostic::new(line, message));
    }

    pub fn report_at(&mut self, line: Line, at: impl ToString, message: impl ToString) {
        self.push(Diagnostic::at(line, at, message));
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        !self.0.is_empty()
    }
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}
