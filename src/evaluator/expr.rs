//! Expression evaluation and lvalue resolution.
//!
//! Lvalue resolution accepts arbitrary pointer-valued subexpressions
//! (`*(p + 1) = 5`) rather than only bare variable names, since pointer
//! arithmetic through a dereference is the common case here.

use crate::ast::{AssignOp, BinOp, Expr, UnOp};
use crate::error::CError;
use crate::evaluator::call_function;
use crate::memory::{Address, Memory};
use crate::value::{CallArg, Value};

/// Resolves an expression that appears on the left of an assignment (or
/// under `&`, `++`, `--`) to the store address it denotes.
fn lvalue_address(memory: &mut Memory, expr: &Expr) -> Result<Address, CError> {
    match expr {
        Expr::Var { name, .. } => memory.get_value_in_scope(*name),
        Expr::Unary { op: UnOp::Deref, expr: inner, .. } => {
            let pointer = eval_expr(memory, inner)?;
            Ok(Address::from_payload(pointer.payload.as_i64()))
        }
        Expr::FieldAccess { base, field, arrow, .. } => {
            let struct_addr = if *arrow {
                let pointer = eval_expr(memory, base)?;
                Address::from_payload(pointer.payload.as_i64())
            } else {
                lvalue_address(memory, base)?
            };
            memory.field_address(struct_addr, *field)
        }
        _ => Err(CError::runtime(format!("line {}: expression is not assignable", expr.line()))),
    }
}

pub fn eval_expr(memory: &mut Memory, expr: &Expr) -> Result<Value, CError> {
    match expr {
        Expr::IntLit { value, .. } => Ok(Value::int(*value)),
        Expr::CharLit { value, .. } => Ok(Value::char(*value)),
        Expr::FloatLit { value, .. } => Ok(Value::double(*value)),
        Expr::StringLit { .. } => {
            Err(CError::runtime(format!("line {}: string literals may only appear as call arguments", expr.line())))
        }
        Expr::Var { name, .. } => memory.read_var(*name),
        Expr::Unary { op, expr: inner, .. } => eval_unary(memory, *op, inner),
        Expr::Cast { ty, expr: inner, .. } => Ok(eval_expr(memory, inner)?.cast(ty.clone())),
        Expr::Binary { op, left, right, .. } => eval_binary(memory, *op, left, right),
        Expr::Assign { op, target, value, .. } => eval_assign(memory, *op, target, value),
        Expr::FieldAccess { .. } => {
            let addr = lvalue_address(memory, expr)?;
            memory.get_value_at(addr).map(|v| v.clone())
        }
        Expr::Call { name, args, .. } => eval_call(memory, *name, args, expr.line()),
        Expr::Comma { children, .. } => {
            let mut last = None;
            for child in children {
                last = Some(eval_expr(memory, child)?);
            }
            Ok(last.expect("parser never produces an empty comma expression"))
        }
    }
}

fn eval_unary(memory: &mut Memory, op: UnOp, inner: &Expr) -> Result<Value, CError> {
    match op {
        UnOp::AddressOf => {
            let addr = lvalue_address(memory, inner)?;
            Ok(Value::int(addr.to_payload()))
        }
        UnOp::Deref => {
            let pointer = eval_expr(memory, inner)?;
            let addr = Address::from_payload(pointer.payload.as_i64());
            memory.get_value_at(addr).map(|v| v.clone())
        }
        UnOp::PreInc | UnOp::PreDec => {
            let addr = lvalue_address(memory, inner)?;
            let current = memory.get_value_at(addr)?.clone();
            let updated = if op == UnOp::PreInc { current.add(&Value::int(1)) } else { current.sub(&Value::int(1)) };
            memory.set_at_address(addr, updated.clone())?;
            Ok(updated)
        }
        UnOp::PostInc | UnOp::PostDec => {
            let addr = lvalue_address(memory, inner)?;
            let current = memory.get_value_at(addr)?.clone();
            let updated = if op == UnOp::PostInc { current.add(&Value::int(1)) } else { current.sub(&Value::int(1)) };
            memory.set_at_address(addr, updated)?;
            Ok(current)
        }
        UnOp::Plus => eval_expr(memory, inner),
        UnOp::Minus => Ok(eval_expr(memory, inner)?.neg()),
        UnOp::Not => Ok(eval_expr(memory, inner)?.logical_not()),
    }
}

fn eval_binary(memory: &mut Memory, op: BinOp, left: &Expr, right: &Expr) -> Result<Value, CError> {
    // Left-to-right evaluation order holds even for the operators compiled
    // here eagerly; `And`/`Or` additionally short-circuit the right side.
    if op == BinOp::And {
        let lhs = eval_expr(memory, left)?;
        return lhs.logical_and(|| Ok(eval_expr(memory, right)?.is_truthy()));
    }
    if op == BinOp::Or {
        let lhs = eval_expr(memory, left)?;
        return lhs.logical_or(|| Ok(eval_expr(memory, right)?.is_truthy()));
    }

    let lhs = eval_expr(memory, left)?;
    let rhs = eval_expr(memory, right)?;
    match op {
        BinOp::Add => Ok(lhs.add(&rhs)),
        BinOp::Sub => Ok(lhs.sub(&rhs)),
        BinOp::Mul => Ok(lhs.mul(&rhs)),
        BinOp::Div => lhs.div(&rhs),
        BinOp::Mod => lhs.rem(&rhs),
        BinOp::Lt => Ok(lhs.lt(&rhs)),
        BinOp::Gt => Ok(lhs.gt(&rhs)),
        BinOp::Le => Ok(lhs.le(&rhs)),
        BinOp::Ge => Ok(lhs.ge(&rhs)),
        BinOp::Eq => Ok(lhs.eq(&rhs)),
        BinOp::Ne => Ok(lhs.ne(&rhs)),
        BinOp::BitAnd => lhs.bitand(&rhs),
        BinOp::BitOr => lhs.bitor(&rhs),
        BinOp::BitXor => lhs.bitxor(&rhs),
        BinOp::Shl => lhs.shl(&rhs),
        BinOp::Shr => lhs.shr(&rhs),
        BinOp::And | BinOp::Or => unreachable!("handled above with short-circuit evaluation"),
    }
}

fn eval_assign(memory: &mut Memory, op: AssignOp, target: &Expr, value: &Expr) -> Result<Value, CError> {
    let addr = lvalue_address(memory, target)?;
    let current = memory.get_value_at(addr)?.clone();
    let rhs = eval_expr(memory, value)?;
    let result = match op {
        AssignOp::Assign => rhs.cast(current.ty.clone()),
        AssignOp::AddAssign => current.add(&rhs),
        AssignOp::SubAssign => current.sub(&rhs),
        AssignOp::MulAssign => current.mul(&rhs),
        AssignOp::DivAssign => current.div(&rhs)?,
    };
    memory.set_at_address(addr, result.clone())?;
    Ok(result)
}

fn eval_call(memory: &mut Memory, name: crate::intern::StringId, args: &[Expr], line: u32) -> Result<Value, CError> {
    let mut call_args = Vec::with_capacity(args.len());
    for arg in args {
        if let Expr::StringLit { value, .. } = arg {
            call_args.push(CallArg::Str(value.clone()));
        } else {
            call_args.push(CallArg::Value(eval_expr(memory, arg)?));
        }
    }
    match call_function(memory, name, call_args)? {
        Some(value) => Ok(value),
        None => Err(CError::runtime(format!("line {line}: '{}' does not return a value", memory.interner.resolve(name)))),
    }
}
