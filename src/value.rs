//! Typed Value: a runtime numeric paired with its C-type descriptor.
//!
//! Arithmetic, comparison, and logical operators all live here rather than
//! on the evaluator, so the evaluator's binary-operator dispatch (see
//! `evaluator::expr`) stays a thin match over token kind.

use crate::ctype::{CType, Specifier};
use crate::error::CError;

/// The host-native payload behind a Typed Value.
///
/// Two variants, not one: an address-of result and arithmetic on it must
/// round-trip through `i64` exactly, while floating arithmetic needs `f64`.
/// No narrower host type is used anywhere; there's no bit-exact C
/// promotion to model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload {
    Int(i64),
    Float(f64),
}

impl Payload {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    pub fn as_i64(self) -> i64 {
        match self {
            Self::Int(i) => i,
            Self::Float(f) => f as i64,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Self::Int(i) => i == 0,
            Self::Float(f) => f == 0.0,
        }
    }
}

/// A runtime value: a C-type descriptor plus its numeric payload.
///
/// Pointer values are represented as `Payload::Int` holding an `Address`
/// (or 0 for null); a pointer's payload is always either 0 or a valid
/// address.
#[derive(Debug, Clone)]
pub struct Value {
    pub ty: CType,
    pub payload: Payload,
}

impl Value {
    pub fn new(ty: CType, payload: Payload) -> Self {
        Self { ty, payload }
    }

    pub fn int(n: i64) -> Self {
        Self::new(CType::int(), Payload::Int(n))
    }

    pub fn double(n: f64) -> Self {
        Self::new(CType::scalar(Specifier::Double), Payload::Float(n))
    }

    pub fn char(c: i64) -> Self {
        Self::new(CType::scalar(Specifier::Char), Payload::Int(c))
    }

    /// The zero-valued cell a freshly declared variable of `ty` starts
    /// out holding.
    pub fn zero_of(ty: &CType) -> Self {
        let payload = if ty.is_floating() { Payload::Float(0.0) } else { Payload::Int(0) };
        Self::new(ty.clone(), payload)
    }

    pub fn is_truthy(&self) -> bool {
        !self.payload.is_zero()
    }

    fn numeric_binop(&self, other: &Self, int_op: impl Fn(i64, i64) -> i64, float_op: impl Fn(f64, f64) -> f64) -> Self {
        let payload = if self.ty.is_floating() || other.ty.is_floating() {
            Payload::Float(float_op(self.payload.as_f64(), other.payload.as_f64()))
        } else {
            Payload::Int(int_op(self.payload.as_i64(), other.payload.as_i64()))
        };
        // Result carries the left operand's type: no implicit promotion
        // even when the right operand is wider.
        Self::new(self.ty.clone(), payload)
    }

    pub fn add(&self, other: &Self) -> Self {
        self.numeric_binop(other, i64::wrapping_add, |a, b| a + b)
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.numeric_binop(other, i64::wrapping_sub, |a, b| a - b)
    }

    pub fn mul(&self, other: &Self) -> Self {
        self.numeric_binop(other, i64::wrapping_mul, |a, b| a * b)
    }

    pub fn div(&self, other: &Self) -> Result<Self, CError> {
        if other.payload.is_zero() {
            return Err(CError::runtime("division by zero"));
        }
        Ok(if self.ty.is_floating() || other.ty.is_floating() {
            Self::new(self.ty.clone(), Payload::Float(self.payload.as_f64() / other.payload.as_f64()))
        } else {
            // Integer division truncates toward zero, matching Rust's `/`.
            Self::new(self.ty.clone(), Payload::Int(self.payload.as_i64() / other.payload.as_i64()))
        })
    }

    pub fn rem(&self, other: &Self) -> Result<Self, CError> {
        if self.ty.is_floating() || other.ty.is_floating() {
            return Err(CError::runtime("modulus is defined for integer types only"));
        }
        if other.payload.as_i64() == 0 {
            return Err(CError::runtime("division by zero"));
        }
        Ok(Self::new(self.ty.clone(), Payload::Int(self.payload.as_i64() % other.payload.as_i64())))
    }

    fn bitwise(&self, other: &Self, op: impl Fn(i64, i64) -> i64) -> Result<Self, CError> {
        if self.ty.is_floating() || other.ty.is_floating() {
            return Err(CError::runtime("bitwise operator requires integer operands"));
        }
        Ok(Self::new(self.ty.clone(), Payload::Int(op(self.payload.as_i64(), other.payload.as_i64()))))
    }

    pub fn bitand(&self, other: &Self) -> Result<Self, CError> {
        self.bitwise(other, |a, b| a & b)
    }

    pub fn bitor(&self, other: &Self) -> Result<Self, CError> {
        self.bitwise(other, |a, b| a | b)
    }

    pub fn bitxor(&self, other: &Self) -> Result<Self, CError> {
        self.bitwise(other, |a, b| a ^ b)
    }

    pub fn shl(&self, other: &Self) -> Result<Self, CError> {
        self.bitwise(other, |a, b| a.wrapping_shl(b as u32))
    }

    pub fn shr(&self, other: &Self) -> Result<Self, CError> {
        self.bitwise(other, |a, b| a.wrapping_shr(b as u32))
    }

    fn compare(&self, other: &Self, cmp: impl Fn(f64, f64) -> bool) -> Self {
        Self::int(i64::from(cmp(self.payload.as_f64(), other.payload.as_f64())))
    }

    pub fn lt(&self, other: &Self) -> Self {
        self.compare(other, |a, b| a < b)
    }

    pub fn gt(&self, other: &Self) -> Self {
        self.compare(other, |a, b| a > b)
    }

    pub fn le(&self, other: &Self) -> Self {
        self.compare(other, |a, b| a <= b)
    }

    pub fn ge(&self, other: &Self) -> Self {
        self.compare(other, |a, b| a >= b)
    }

    pub fn eq(&self, other: &Self) -> Self {
        self.compare(other, |a, b| a == b)
    }

    pub fn ne(&self, other: &Self) -> Self {
        self.compare(other, |a, b| a != b)
    }

    pub fn logical_and(&self, other_truthy: impl FnOnce() -> Result<bool, CError>) -> Result<Self, CError> {
        // Short-circuit: `other_truthy` is a thunk so the right operand is
        // evaluated only when the left doesn't already decide the result.
        let result = self.is_truthy() && other_truthy()?;
        Ok(Self::int(i64::from(result)))
    }

    pub fn logical_or(&self, other_truthy: impl FnOnce() -> Result<bool, CError>) -> Result<Self, CError> {
        let result = self.is_truthy() || other_truthy()?;
        Ok(Self::int(i64::from(result)))
    }

    pub fn logical_not(&self) -> Self {
        Self::int(i64::from(!self.is_truthy()))
    }

    pub fn neg(&self) -> Self {
        let payload = match self.payload {
            Payload::Int(i) => Payload::Int(i.wrapping_neg()),
            Payload::Float(f) => Payload::Float(-f),
        };
        Self::new(self.ty.clone(), payload)
    }

    /// Casts to `ty`, retaining the numeric payload verbatim (no implicit
    /// narrowing).
    pub fn cast(&self, ty: CType) -> Self {
        let payload = if ty.is_floating() {
            Payload::Float(self.payload.as_f64())
        } else {
            Payload::Int(self.payload.as_i64())
        };
        Self::new(ty, payload)
    }
}

/// One evaluated call argument passed to a builtin: most arguments are
/// Typed Values, but a bare string literal (a `printf`/`scanf` format
/// string) has no Typed Value representation, so it rides alongside as
/// raw text.
#[derive(Debug, Clone)]
pub enum CallArg {
    Value(Value),
    Str(String),
}

impl CallArg {
    pub fn as_value(&self) -> Result<&Value, CError> {
        match self {
            Self::Value(v) => Ok(v),
            Self::Str(_) => Err(CError::runtime("expected a numeric argument, found a string literal")),
        }
    }

    pub fn as_str(&self) -> Result<&str, CError> {
        match self {
            Self::Str(s) => Ok(s),
            Self::Value(_) => Err(CError::runtime("expected a string literal argument")),
        }
    }
}
