//! Function-call mechanics: argument evaluation, frame setup, and dispatch
//! between user functions and host builtins.
//!
//! Every call — including the initial call to `main` — goes through this
//! single path, so frame push/pop is always paired exactly once.

use std::rc::Rc;

use crate::ast::FunctionDecl;
use crate::error::CError;
use crate::evaluator::{stmt, Outcome};
use crate::intern::StringId;
use crate::memory::{Callable, Memory};
use crate::value::{CallArg, Value};

/// Evaluates a call to `name` with already-evaluated `args`, in source
/// left-to-right order (the caller is responsible for that ordering —
/// `expr::eval_call_args` does it).
pub fn call_function(memory: &mut Memory, name: StringId, args: Vec<CallArg>) -> Result<Option<Value>, CError> {
    let callable = memory
        .resolve_callable(name)
        .ok_or_else(|| CError::runtime(format!("call to undeclared function '{}'", memory.interner.resolve(name))))?;
    match callable {
        Callable::Builtin(entry) => {
            let result = (entry.func)(memory, &args)?;
            Ok(match (result, entry.return_type) {
                (Some(value), Some(ty)) => Some(value.cast(ty)),
                (Some(value), None) => Some(value),
                (None, _) => None,
            })
        }
        Callable::User(decl) => call_user_function(memory, &decl, args),
    }
}

fn call_user_function(memory: &mut Memory, decl: &Rc<FunctionDecl>, args: Vec<CallArg>) -> Result<Option<Value>, CError> {
    if args.len() != decl.params.len() {
        return Err(CError::runtime(format!(
            "'{}' expects {} argument(s), got {}",
            memory.interner.resolve(decl.name),
            decl.params.len(),
            args.len()
        )));
    }
    let values = args.into_iter().map(|a| a.as_value().map(|v| v.clone())).collect::<Result<Vec<_>, _>>()?;

    memory.new_frame(decl.name);
    for (param, value) in decl.params.iter().zip(values) {
        // By-value parameter passing: a fresh cell per call, typed as the
        // declared parameter, holding the argument's payload.
        let addr = memory.declare_num(&param.ty, param.name);
        memory.set_at_address(addr, value.cast(param.ty.clone())).expect("freshly declared cell");
    }

    let outcome = stmt::exec_block(memory, &decl.body);
    memory.del_frame();

    match outcome? {
        Outcome::Return(value) => Ok(value.map(|v| v.cast(decl.return_ty.clone()))),
        Outcome::Normal => Ok(None),
        Outcome::Break | Outcome::Continue => {
            Err(CError::runtime(format!("'{}' has a break/continue outside any loop", memory.interner.resolve(decl.name))))
        }
    }
}
