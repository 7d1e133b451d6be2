//! Diagnostics shared across the lexer, parser, and evaluator.
//!
//! Faults fall into a few kinds in practice (upstream-prevented,
//! runtime-detectable, host-callable, control-flow misuse), but all of
//! them surface through `CError::Runtime` here since, by the time they
//! reach this interpreter, they're all "abort interpretation and report" —
//! the distinction only matters for *who* is supposed to prevent them,
//! not for how this crate reacts.

use std::fmt;

#[derive(Debug, Clone)]
pub enum CError {
    Lex { message: String, line: u32 },
    Parse { message: String, line: u32 },
    Runtime { message: String },
}

impl CError {
    pub fn lex(message: impl Into<String>, line: u32) -> Self {
        Self::Lex { message: message.into(), line }
    }

    pub fn parse(message: impl Into<String>, line: u32) -> Self {
        Self::Parse { message: message.into(), line }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime { message: message.into() }
    }
}

impl fmt::Display for CError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex { message, line } => write!(f, "lexical error at line {line}: {message}"),
            Self::Parse { message, line } => write!(f, "syntax error at line {line}: {message}"),
            Self::Runtime { message } => write!(f, "runtime error: {message}"),
        }
    }
}

impl std::error::Error for CError {}
