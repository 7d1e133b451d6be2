//! Semantic analyzer: the thin pre-interpretation check this crate owns.
//! Name resolution, type checking and redeclaration checks are treated as
//! an upstream collaborator's job; the only invariant actually enforced
//! here is the one the evaluator cannot recover from gracefully — a
//! translation unit with no `main` has nothing to run.

use crate::ast::{Program, TopLevel};
use crate::error::CError;
use crate::intern::Interner;

pub fn check(program: &Program, interner: &Interner) -> Result<(), CError> {
    let has_main = program.items.iter().any(|item| {
        matches!(item, TopLevel::FunctionDecl(f) if interner.resolve(f.name) == "main")
    });
    if !has_main {
        return Err(CError::runtime("no 'main' function defined"));
    }
    Ok(())
}
