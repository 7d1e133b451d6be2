//! The flat, address-indexed store backing every scalar and struct cell.

use indexmap::IndexMap;

use crate::error::CError;
use crate::intern::StringId;
use crate::value::Value;

/// A stable index into the `Store`. Addresses are assigned monotonically
/// and never reused (no free-list — `free` is advisory, see `Memory`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(usize);

impl Address {
    /// Reinterprets a pointer payload as an address. `0` means null;
    /// callers that dereference null get a runtime fault from `Store::get`
    /// rather than a panic.
    pub fn from_payload(raw: i64) -> Self {
        Address(raw.max(0) as usize)
    }

    pub fn to_payload(self) -> i64 {
        self.0 as i64
    }
}

/// A struct instance: field name to the address of that field's own cell,
/// recursively a scalar or nested struct. Ordered so field initialization
/// order and iteration are deterministic.
#[derive(Debug, Clone, Default)]
pub struct StructInstance(pub IndexMap<StringId, Address>);

impl StructInstance {
    pub fn field_address(&self, field: StringId) -> Option<Address> {
        self.0.get(&field).copied()
    }
}

/// A cell in the store: either a scalar Typed Value or a struct instance.
#[derive(Debug, Clone)]
pub enum Cell {
    Scalar(Value),
    Struct(StructInstance),
}

impl Cell {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Struct(_) => "struct",
        }
    }
}

/// Flat address space. Address 0 is reserved as the null sentinel and is
/// never handed out by `alloc` — the first real allocation is address 1.
#[derive(Debug, Default)]
pub struct Store {
    cells: Vec<Cell>,
}

impl Store {
    pub fn new() -> Self {
        // Slot 0 is reserved for null so a zero-initialized pointer never
        // aliases a live allocation.
        Self { cells: vec![Cell::Scalar(Value::int(0))] }
    }

    /// Allocates one cell, returning its address.
    pub fn alloc(&mut self, cell: Cell) -> Address {
        let addr = Address(self.cells.len());
        self.cells.push(cell);
        addr
    }

    /// Allocates `count` contiguous scalar cells, returning the address of
    /// the first. Contiguity is what lets `p + k` reach the k-th cell under
    /// this interpreter's no-scaling pointer arithmetic.
    pub fn alloc_contiguous(&mut self, count: usize, fill: impl Fn() -> Value) -> Address {
        let first = Address(self.cells.len());
        for _ in 0..count.max(1) {
            self.cells.push(Cell::Scalar(fill()));
        }
        first
    }

    pub fn get(&self, addr: Address) -> Result<&Cell, CError> {
        self.cells.get(addr.0).ok_or_else(|| CError::runtime(format!("dereference of invalid address {}", addr.0)))
    }

    pub fn get_mut(&mut self, addr: Address) -> Result<&mut Cell, CError> {
        self.cells
            .get_mut(addr.0)
            .ok_or_else(|| CError::runtime(format!("dereference of invalid address {}", addr.0)))
    }

    pub fn get_value(&self, addr: Address) -> Result<&Value, CError> {
        match self.get(addr)? {
            Cell::Scalar(v) => Ok(v),
            other => Err(CError::runtime(format!("expected scalar at address, found {}", other.type_name()))),
        }
    }

    pub fn set_value(&mut self, addr: Address, value: Value) -> Result<(), CError> {
        match self.get_mut(addr)? {
            Cell::Scalar(slot) => {
                *slot = value;
                Ok(())
            }
            other => Err(CError::runtime(format!("expected scalar at address, found {}", other.type_name()))),
        }
    }

    pub fn get_struct(&self, addr: Address) -> Result<&StructInstance, CError> {
        match self.get(addr)? {
            Cell::Struct(s) => Ok(s),
            other => Err(CError::runtime(format!("expected struct at address, found {}", other.type_name()))),
        }
    }
}
