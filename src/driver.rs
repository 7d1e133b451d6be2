//! The external interface. Wires the lexer, parser, analyzer and
//! evaluator into the single entry point everything else in this crate
//! exists to support.

use crate::analyzer;
use crate::error::CError;
use crate::evaluator;
use crate::intern::Interner;
use crate::lexer::Lexer;
use crate::memory::Memory;
use crate::parser;

/// Lexes, parses, analyzes and interprets `source`, returning `main`'s
/// exit status. No console banner — printing is the caller's job (see
/// `bin/main.rs`).
pub fn run(source: &str) -> Result<i64, CError> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut interner = Interner::new();
    let program = parser::parse(tokens, &mut interner)?;
    analyzer::check(&program, &interner)?;
    let mut memory = Memory::new(interner);
    evaluator::run_program(&mut memory, &program)
}
