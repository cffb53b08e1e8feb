//! Entry points for the `tokenize`, `parse` and `evaluate` commands. Each call
//! is an independent run with its own [`Diagnostics`].

use std::{
    io::{BufRead, Write},
    path::Path,
};

use cursor::Line;
use diagnostics::Diagnostics;
use interpreter::{Interpreter, RuntimeErrorType, Value};
use parser::{Expr, Parser};
use scanner::{Scanner, Token};

#[derive(thiserror::Error, Debug)]
pub enum InterpretError {
    /// Lexical or syntax errors.
    #[error("{0}")]
    CompileError(Diagnostics),
    #[error("{error}\n[line {line}]")]
    RuntimeError { error: RuntimeErrorType, line: Line },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl InterpretError {
    /// sysexits.h codes: EX_DATAERR, EX_SOFTWARE and EX_IOERR.
    pub fn exit_code(&self) -> i32 {
        match self {
            InterpretError::CompileError(_) => 65,
            InterpretError::RuntimeError { .. } => 70,
            InterpretError::Io(_) => 74,
        }
    }
}

pub type Result<T> = std::result::Result<T, InterpretError>;

fn check(diagnostics: Diagnostics) -> Result<()> {
    if diagnostics.has_errors() {
        Err(InterpretError::CompileError(diagnostics))
    } else {
        Ok(())
    }
}

/// Scans `source`. The tokens are returned even if there were lexical errors.
pub fn scan<'a>(source: &'a str, diagnostics: &mut Diagnostics) -> Vec<Token<'a>> {
    Scanner::new(source).scan_tokens(diagnostics)
}

/// Writes one `<TYPE> <lexeme> <literal>` line per token, including `EOF`.
/// All tokens are written even if the source contains lexical errors; the
/// errors are returned afterwards.
pub fn tokenize(source: &str, out: &mut impl Write) -> Result<()> {
    let mut diagnostics = Diagnostics::new();
    for token in scan(source, &mut diagnostics) {
        writeln!(out, "{token:#}")?;
    }
    check(diagnostics)
}

/// Scans and parses `source`. The parser also runs after lexical errors so
/// that syntax errors are reported in the same pass, but any error discards
/// the tree.
pub fn parse_source(source: &str) -> Result<Expr<'_>> {
    let mut diagnostics = Diagnostics::new();
    let tokens = scan(source, &mut diagnostics);
    let expr = Parser::new(tokens).parse(&mut diagnostics);

    match expr {
        Some(expr) if !diagnostics.has_errors() => Ok(expr),
        _ => {
            log::debug!("Parsing failed with {} error(s)", diagnostics.len());
            Err(InterpretError::CompileError(diagnostics))
        }
    }
}

/// Writes the parenthesized form of the expression in `source`.
pub fn parse(source: &str, out: &mut impl Write) -> Result<()> {
    let expr = parse_source(source)?;
    writeln!(out, "{}", parser::print(&expr))?;
    Ok(())
}

pub fn evaluate_source(source: &str) -> Result<Value> {
    let expr = parse_source(source)?;
    Interpreter::new()
        .evaluate(&expr)
        .map_err(|e| InterpretError::RuntimeError { error: e.error, line: e.line() })
}

/// Writes the value of the expression in `source`.
pub fn evaluate(source: &str, out: &mut impl Write) -> Result<()> {
    let value = evaluate_source(source)?;
    writeln!(out, "{value}")?;
    Ok(())
}

/// Reads a source file. Bytes that are not valid UTF-8 are replaced with
/// U+FFFD so that the scanner reports them instead of the read failing.
pub fn read_source(path: impl AsRef<Path>) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Evaluates `input` line by line, prompting with `> ` on `out`. Lexical,
/// syntax and runtime errors are written to `err` and the session goes on
/// with the next line. Returns at end of input.
pub fn run_prompt(mut input: impl BufRead, out: &mut impl Write, err: &mut impl Write) -> Result<()> {
    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }

        match evaluate(line.trim_end_matches(['\n', '\r']), out) {
            Ok(()) => {}
            Err(e @ InterpretError::Io(_)) => return Err(e),
            Err(e) => {
                log::debug!("Prompt input failed with exit code {}", e.exit_code());
                writeln!(err, "{e}")?;
            }
        }
    }
}
