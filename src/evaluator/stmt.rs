//! Statement execution: everything that isn't purely expression evaluation.
//!
//! Every executor threads the single [`Outcome`] sentinel (see `evaluator`
//! module docs) so `return` unwinds correctly from any nesting depth
//! instead of only a function's top-level statement list.

use crate::ast::{Stmt, Switch, SwitchItem, VarDeclStmt};
use crate::ctype::CType;
use crate::error::CError;
use crate::evaluator::expr;
use crate::evaluator::Outcome;
use crate::memory::Memory;

/// Runs a function body: no extra scope push, since the frame's root scope
/// (pushed by `Memory::new_frame`) already serves as the function's
/// top-level lexical scope.
pub fn exec_block(memory: &mut Memory, stmts: &[Stmt]) -> Result<Outcome, CError> {
    exec_stmts(memory, stmts)
}

fn exec_stmts(memory: &mut Memory, stmts: &[Stmt]) -> Result<Outcome, CError> {
    for stmt in stmts {
        let outcome = exec_stmt(memory, stmt)?;
        if !outcome.is_normal() {
            return Ok(outcome);
        }
    }
    Ok(Outcome::Normal)
}

pub fn exec_stmt(memory: &mut Memory, stmt: &Stmt) -> Result<Outcome, CError> {
    match stmt {
        Stmt::Compound { children, .. } => {
            memory.new_scope();
            let outcome = exec_stmts(memory, children);
            memory.del_scope();
            outcome
        }
        Stmt::Expr(e) => {
            expr::eval_expr(memory, e)?;
            Ok(Outcome::Normal)
        }
        Stmt::Empty { .. } => Ok(Outcome::Normal),
        Stmt::VarDecl(decl) => {
            declare_var(memory, decl)?;
            Ok(Outcome::Normal)
        }
        Stmt::If { condition, then_body, else_body, .. } => {
            if expr::eval_expr(memory, condition)?.is_truthy() {
                exec_stmt(memory, then_body)
            } else if let Some(else_body) = else_body {
                exec_stmt(memory, else_body)
            } else {
                Ok(Outcome::Normal)
            }
        }
        Stmt::While { condition, body, .. } => exec_while(memory, condition, body),
        Stmt::DoWhile { condition, body, .. } => exec_do_while(memory, condition, body),
        Stmt::For { setup, condition, increment, body, .. } => exec_for(memory, setup, condition, increment, body),
        Stmt::Switch(switch) => exec_switch(memory, switch),
        Stmt::Return { expr: ret_expr, .. } => {
            let value = match ret_expr {
                Some(e) => Some(expr::eval_expr(memory, e)?),
                None => None,
            };
            Ok(Outcome::Return(value))
        }
        Stmt::Break { .. } => Ok(Outcome::Break),
        Stmt::Continue { .. } => Ok(Outcome::Continue),
    }
}

fn exec_while(memory: &mut Memory, condition: &crate::ast::Expr, body: &Stmt) -> Result<Outcome, CError> {
    while expr::eval_expr(memory, condition)?.is_truthy() {
        match exec_stmt(memory, body)? {
            Outcome::Normal | Outcome::Continue => {}
            Outcome::Break => break,
            Outcome::Return(v) => return Ok(Outcome::Return(v)),
        }
    }
    Ok(Outcome::Normal)
}

fn exec_do_while(memory: &mut Memory, condition: &crate::ast::Expr, body: &Stmt) -> Result<Outcome, CError> {
    loop {
        match exec_stmt(memory, body)? {
            Outcome::Normal | Outcome::Continue => {}
            Outcome::Break => break,
            Outcome::Return(v) => return Ok(Outcome::Return(v)),
        }
        if !expr::eval_expr(memory, condition)?.is_truthy() {
            break;
        }
    }
    Ok(Outcome::Normal)
}

fn exec_for(
    memory: &mut Memory,
    setup: &Option<crate::ast::Expr>,
    condition: &Option<crate::ast::Expr>,
    increment: &Option<crate::ast::Expr>,
    body: &Stmt,
) -> Result<Outcome, CError> {
    if let Some(setup) = setup {
        expr::eval_expr(memory, setup)?;
    }
    loop {
        let keep_going = match condition {
            Some(c) => expr::eval_expr(memory, c)?.is_truthy(),
            None => true,
        };
        if !keep_going {
            break;
        }
        match exec_stmt(memory, body)? {
            Outcome::Normal | Outcome::Continue => {
                if let Some(increment) = increment {
                    expr::eval_expr(memory, increment)?;
                }
            }
            Outcome::Break => break,
            Outcome::Return(v) => return Ok(Outcome::Return(v)),
        }
    }
    Ok(Outcome::Normal)
}

/// A `switch`'s body is a flat list of labels and statements, not a tree of
/// per-case bodies. `active` is the "did we pass a matching label yet"
/// latch: once set, every following statement runs regardless of further
/// `case`/`default` labels, until `break` or the body ends.
fn exec_switch(memory: &mut Memory, switch: &Switch) -> Result<Outcome, CError> {
    let discriminant = expr::eval_expr(memory, &switch.discriminant)?;
    let mut active = false;
    for item in &switch.items {
        if !active {
            match item {
                SwitchItem::CaseLabel(label_expr) => {
                    let label_value = expr::eval_expr(memory, label_expr)?;
                    if label_value.payload.as_i64() == discriminant.payload.as_i64() {
                        active = true;
                    }
                }
                SwitchItem::DefaultLabel => active = true,
                SwitchItem::Stmt(_) => {}
            }
            continue;
        }
        if let SwitchItem::Stmt(inner) = item {
            match exec_stmt(memory, inner)? {
                Outcome::Normal => {}
                Outcome::Break => return Ok(Outcome::Normal),
                other => return Ok(other),
            }
        }
    }
    Ok(Outcome::Normal)
}

/// Declares one local or global variable.
pub fn declare_var(memory: &mut Memory, decl: &VarDeclStmt) -> Result<(), CError> {
    if let CType::Struct { name, pointer_level: 0 } = &decl.ty {
        if decl.init.is_some() {
            return Err(CError::runtime("struct variables cannot have an initializer"));
        }
        memory.declare_struct_var(*name, decl.name)?;
        return Ok(());
    }
    let addr = memory.declare_num(&decl.ty, decl.name);
    if let Some(init) = &decl.init {
        let value = expr::eval_expr(memory, init)?;
        memory.set_at_address(addr, value.cast(decl.ty.clone()))?;
    }
    Ok(())
}
