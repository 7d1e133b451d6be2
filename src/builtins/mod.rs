//! Host-callable builtin registry: what `#include <...>` actually binds
//! into the global namespace.
//!
//! Each library has its own module exposing a single `register` entry
//! point, one name per `#include` directive mapped to a namespaced set
//! of host callables and constants.

mod math_lib;
mod stdio;
mod stdlib;

use crate::error::CError;
use crate::memory::Memory;

/// Binds the host callables and constants named by one `#include` directive.
pub fn register_library(memory: &mut Memory, library_name: &str) -> Result<(), CError> {
    match library_name {
        "stdio.h" => Ok(stdio::register(memory)),
        "stdlib.h" => Ok(stdlib::register(memory)),
        "math.h" => Ok(math_lib::register(memory)),
        other => Err(CError::runtime(format!("unknown library '{other}'"))),
    }
}
