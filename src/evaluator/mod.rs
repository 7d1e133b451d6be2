//! Tree-walking evaluator: the recursive AST visitor that actually runs a
//! parsed program against a [`Memory`].
//!
//! Control flow is a single [`Outcome`] sentinel threaded through every
//! statement executor, rather than a split between a break/continue flag
//! and a bare return value that only the function body notices. Under the
//! single sentinel, `return` correctly unwinds out of arbitrarily nested
//! blocks, loops, and `switch` bodies instead of only working at a
//! function's top level.

pub mod call;
pub mod expr;
pub mod stmt;

use std::rc::Rc;

use crate::ast::{Program, TopLevel};
use crate::ctype::StructSchema;
use crate::error::CError;
use crate::memory::Memory;
use crate::value::Value;

pub use call::call_function;

/// What executing one statement produced, propagated upward until a
/// construct that consumes it (a loop consumes `Break`/`Continue`; nothing
/// but a function call consumes `Return`).
#[derive(Debug)]
pub enum Outcome {
    Normal,
    Return(Option<Value>),
    Break,
    Continue,
}

impl Outcome {
    fn is_normal(&self) -> bool {
        matches!(self, Self::Normal)
    }
}

/// Runs a parsed program to completion: processes the top-level preamble
/// (includes, struct declarations, global variables, function declarations)
/// then calls `main`.
pub fn run_program(memory: &mut Memory, program: &Program) -> Result<i64, CError> {
    for item in &program.items {
        match item {
            TopLevel::IncludeLibrary { library_name, .. } => {
                crate::builtins::register_library(memory, library_name)?;
            }
            TopLevel::StructDecl(decl) => {
                memory.declare_struct(decl.name, StructSchema { name: decl.name, fields: decl.fields.clone() });
            }
            TopLevel::FunctionDecl(f) => {
                memory.declare_fun(f.name, Rc::new(f.clone()));
            }
            TopLevel::VarDecl(v) => {
                stmt::declare_var(memory, v)?;
            }
        }
    }

    let main_id = memory.interner.intern("main");
    match call_function(memory, main_id, Vec::new())? {
        Some(v) => Ok(v.payload.as_i64()),
        None => Err(CError::runtime("'main' completed without returning a status")),
    }
}
