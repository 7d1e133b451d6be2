//! `<stdio.h>`: `printf` and `scanf`.
//!
//! The exact conversion-to-argument protocol lives here rather than in the
//! evaluator: a builtin's contract with the `Memory` handle it's given is
//! the builtin module's own business. Supports the `%d`, `%c`, `%f`, `%s`
//! and `%%` conversions; anything else is a runtime fault rather than
//! silently ignored.

use std::io::Write;

use crate::ctype::CType;
use crate::error::CError;
use crate::memory::{Address, BuiltinEntry, Memory};
use crate::value::{CallArg, Value};

pub fn register(memory: &mut Memory) {
    let printf_id = memory.interner.intern("printf");
    memory.declare_builtin(
        printf_id,
        BuiltinEntry { name: "printf", return_type: Some(CType::int()), func: std::rc::Rc::new(printf) },
    );
    let scanf_id = memory.interner.intern("scanf");
    memory.declare_builtin(
        scanf_id,
        BuiltinEntry { name: "scanf", return_type: Some(CType::int()), func: std::rc::Rc::new(scanf) },
    );
}

fn next_value<'a>(args: &mut impl Iterator<Item = &'a CallArg>, conversion: char) -> Result<Value, CError> {
    args.next()
        .ok_or_else(|| CError::runtime(format!("printf: missing argument for '%{conversion}'")))?
        .as_value()
        .map(|v| v.clone())
}

fn printf(_memory: &mut Memory, args: &[CallArg]) -> Result<Option<Value>, CError> {
    let (format_arg, rest) = args.split_first().ok_or_else(|| CError::runtime("printf requires a format string"))?;
    let format = format_arg.as_str()?;
    let mut arg_iter = rest.iter();
    let mut out = String::new();
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some('d') => out.push_str(&next_value(&mut arg_iter, 'd')?.payload.as_i64().to_string()),
            Some('c') => out.push(next_value(&mut arg_iter, 'c')?.payload.as_i64() as u8 as char),
            Some('f') => out.push_str(&format!("{:.6}", next_value(&mut arg_iter, 'f')?.payload.as_f64())),
            Some('s') => {
                let arg = arg_iter.next().ok_or_else(|| CError::runtime("printf: missing argument for '%s'"))?;
                out.push_str(arg.as_str()?);
            }
            Some(other) => return Err(CError::runtime(format!("printf: unsupported conversion '%{other}'"))),
            None => return Err(CError::runtime("printf: dangling '%' at end of format string")),
        }
    }
    print!("{out}");
    std::io::stdout().flush().ok();
    Ok(Some(Value::int(out.chars().count() as i64)))
}

/// Reads one line of whitespace-separated tokens from stdin and stores
/// them, left to right, into the addresses named by the trailing pointer
/// arguments, matching `scanf`'s usual contract: it writes into the
/// addresses supplied as pointer arguments.
fn scanf(memory: &mut Memory, args: &[CallArg]) -> Result<Option<Value>, CError> {
    let (format_arg, ptrs) = args.split_first().ok_or_else(|| CError::runtime("scanf requires a format string"))?;
    let format = format_arg.as_str()?;

    let mut conversions = Vec::new();
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            continue;
        }
        match chars.next() {
            Some(conv @ ('d' | 'f' | 'c')) => conversions.push(conv),
            Some(other) => return Err(CError::runtime(format!("scanf: unsupported conversion '%{other}'"))),
            None => return Err(CError::runtime("scanf: dangling '%' at end of format string")),
        }
    }
    if conversions.len() != ptrs.len() {
        return Err(CError::runtime("scanf: conversion count does not match argument count"));
    }

    let mut line = String::new();
    std::io::stdin().read_line(&mut line).map_err(|e| CError::runtime(format!("scanf: {e}")))?;
    let mut tokens = line.split_whitespace();

    let mut filled = 0i64;
    for (conversion, ptr_arg) in conversions.into_iter().zip(ptrs) {
        let Some(token) = tokens.next() else { break };
        let addr = Address::from_payload(ptr_arg.as_value()?.payload.as_i64());
        let value = match conversion {
            'd' => Value::int(token.parse().map_err(|_| CError::runtime("scanf: expected an integer"))?),
            'f' => Value::double(token.parse().map_err(|_| CError::runtime("scanf: expected a real number"))?),
            'c' => Value::char(token.chars().next().map_or(0, |c| c as i64)),
            _ => unreachable!("conversions is filtered to d/f/c above"),
        };
        memory.set_at_address(addr, value)?;
        filled += 1;
    }
    Ok(Some(Value::int(filled)))
}
