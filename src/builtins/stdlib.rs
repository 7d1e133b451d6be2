//! `<stdlib.h>`: `malloc` and `free`.
//!
//! `malloc` allocates *n* fresh, contiguous scalar cells and returns the
//! address of the first (contiguity is what lets `p + k` reach the k-th
//! cell under this interpreter's no-scaling pointer arithmetic). `free` is
//! advisory — the store never recycles an address, so this is a
//! deliberate, documented leak rather than a missing feature.

use std::rc::Rc;

use crate::ctype::{CType, Specifier};
use crate::error::CError;
use crate::memory::{BuiltinEntry, Memory};
use crate::value::{CallArg, Value};

pub fn register(memory: &mut Memory) {
    let malloc_id = memory.interner.intern("malloc");
    memory.declare_builtin(
        malloc_id,
        BuiltinEntry {
            name: "malloc",
            return_type: Some(CType::scalar(Specifier::Void).referenced()),
            func: Rc::new(malloc),
        },
    );
    let free_id = memory.interner.intern("free");
    memory.declare_builtin(free_id, BuiltinEntry { name: "free", return_type: None, func: Rc::new(free) });
}

fn malloc(memory: &mut Memory, args: &[CallArg]) -> Result<Option<Value>, CError> {
    let count = args.first().ok_or_else(|| CError::runtime("malloc requires a size argument"))?.as_value()?.payload.as_i64();
    if count <= 0 {
        return Ok(Some(Value::int(0)));
    }
    let addr = memory.alloc_scalars(count as usize);
    Ok(Some(Value::int(addr.to_payload())))
}

fn free(_memory: &mut Memory, args: &[CallArg]) -> Result<Option<Value>, CError> {
    args.first().ok_or_else(|| CError::runtime("free requires a pointer argument"))?.as_value()?;
    Ok(None)
}
