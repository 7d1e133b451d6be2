//! `<math.h>`: a handful of pure floating-point functions plus `M_PI`.

use std::rc::Rc;

use crate::ctype::{CType, Specifier};
use crate::error::CError;
use crate::memory::{BuiltinEntry, Memory};
use crate::value::{CallArg, Value};

pub fn register(memory: &mut Memory) {
    register_unary(memory, "sqrt", |x| x.sqrt());
    register_unary(memory, "fabs", |x| x.abs());
    register_unary(memory, "floor", |x| x.floor());
    register_unary(memory, "ceil", |x| x.ceil());

    let pow_id = memory.interner.intern("pow");
    memory.declare_builtin(
        pow_id,
        BuiltinEntry { name: "pow", return_type: Some(CType::scalar(Specifier::Double)), func: Rc::new(pow) },
    );

    let pi_id = memory.interner.intern("M_PI");
    memory.declare_constant(pi_id, Value::double(std::f64::consts::PI));
}

fn register_unary(memory: &mut Memory, name: &'static str, op: fn(f64) -> f64) {
    let id = memory.interner.intern(name);
    let func: Rc<dyn Fn(&mut Memory, &[CallArg]) -> Result<Option<Value>, CError>> = Rc::new(move |_memory, args| {
        let x = args.first().ok_or_else(|| CError::runtime(format!("{name} requires one argument")))?.as_value()?;
        Ok(Some(Value::double(op(x.payload.as_f64()))))
    });
    memory.declare_builtin(id, BuiltinEntry { name, return_type: Some(CType::scalar(Specifier::Double)), func });
}

fn pow(_memory: &mut Memory, args: &[CallArg]) -> Result<Option<Value>, CError> {
    let [base, exponent] = args else { return Err(CError::runtime("pow requires two arguments")) };
    Ok(Some(Value::double(base.as_value()?.payload.as_f64().powf(exponent.as_value()?.payload.as_f64()))))
}
