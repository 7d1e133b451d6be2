//! The memory model.
//!
//! Owns the flat [`Store`] plus the call stack of [`Frame`]s and the global
//! namespace, and is the single point of contact the evaluator uses for
//! every declaration, lookup, and lvalue resolution. Two arenas: a
//! monotonically-growing store indexed by small integers, and a stack of
//! (frame -> stack of scopes).

pub mod scope;
pub mod store;

use std::rc::Rc;

use ahash::AHashMap;

use crate::ast::FunctionDecl;
use crate::ctype::{CType, StructSchema};
use crate::error::CError;
use crate::intern::{Interner, StringId};
use crate::value::{CallArg, Value};

pub use scope::{Frame, Scope};
pub use store::{Address, Cell, Store, StructInstance};

/// What a builtin's declared return-type tag carries: the `CType` it
/// returns, or `None` for a `void` builtin.
pub type ReturnTypeTag = Option<CType>;

/// A host-implemented callable bound into the global namespace by an
/// `#include` directive.
#[derive(Clone)]
pub struct BuiltinEntry {
    pub name: &'static str,
    /// Wrapped around the closure's result in `call_function`, the way a
    /// user function's return value is cast to its declared return type.
    pub return_type: ReturnTypeTag,
    pub func: Rc<dyn Fn(&mut Memory, &[CallArg]) -> Result<Option<Value>, CError>>,
}

impl std::fmt::Debug for BuiltinEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinEntry").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Either half of a callable's dispatch target: a user AST node, or a
/// host callable.
#[derive(Clone)]
pub enum Callable {
    User(Rc<FunctionDecl>),
    Builtin(BuiltinEntry),
}

/// Owns every piece of interpreter state: the store, the call stack, the
/// global namespace, the struct declaration table, and the string
/// interner used to turn source identifiers into `StringId`s.
pub struct Memory {
    store: Store,
    frames: Vec<Frame>,
    globals: Scope,
    functions: AHashMap<StringId, Rc<FunctionDecl>>,
    builtins: AHashMap<StringId, BuiltinEntry>,
    struct_decls: AHashMap<StringId, Rc<StructSchema>>,
    pub interner: Interner,
}

impl Memory {
    pub fn new(interner: Interner) -> Self {
        Self {
            store: Store::new(),
            frames: Vec::new(),
            globals: Scope::new(),
            functions: AHashMap::new(),
            builtins: AHashMap::new(),
            struct_decls: AHashMap::new(),
            interner,
        }
    }

    // ----- declarations -----------------------------------------------

    /// Binds a user function's name in the global namespace. Redeclaration
    /// is the upstream analyzer's responsibility to reject.
    pub fn declare_fun(&mut self, name: StringId, decl: Rc<FunctionDecl>) {
        self.functions.insert(name, decl);
    }

    /// Binds a host callable's name in the global namespace.
    pub fn declare_builtin(&mut self, name: StringId, entry: BuiltinEntry) {
        self.builtins.insert(name, entry);
    }

    /// Binds a library constant (e.g. `M_PI`) as a global variable with
    /// the given initial value.
    pub fn declare_constant(&mut self, name: StringId, value: Value) {
        let addr = self.store.alloc(Cell::Scalar(value));
        self.globals.declare(name, addr);
    }

    /// Allocates a fresh zero-valued scalar cell in the current innermost
    /// scope (the top of the current frame, or the global namespace
    /// outside any frame) and binds `name` to it.
    pub fn declare_num(&mut self, ty: &CType, name: StringId) -> Address {
        let addr = self.store.alloc(Cell::Scalar(Value::zero_of(ty)));
        self.bind_in_current_scope(name, addr);
        addr
    }

    /// Registers a struct schema in the Struct Declaration Table.
    pub fn declare_struct(&mut self, name: StringId, schema: StructSchema) {
        self.struct_decls.insert(name, Rc::new(schema));
    }

    /// Materializes a fresh struct instance: one cell per field,
    /// recursively zero-initialized, and binds `name` to the instance's
    /// address in the current scope.
    pub fn declare_struct_var(&mut self, struct_name: StringId, name: StringId) -> Result<Address, CError> {
        let instance_addr = self.materialize_struct(struct_name)?;
        self.bind_in_current_scope(name, instance_addr);
        Ok(instance_addr)
    }

    fn materialize_struct(&mut self, struct_name: StringId) -> Result<Address, CError> {
        let schema = self
            .struct_decls
            .get(&struct_name)
            .cloned()
            .ok_or_else(|| CError::runtime(format!("unknown struct '{}'", self.interner.resolve(struct_name))))?;
        let mut instance = StructInstance::default();
        for (field_name, field_ty) in &schema.fields {
            let field_addr = if let CType::Struct { name: nested_name, .. } = field_ty {
                self.materialize_struct(*nested_name)?
            } else {
                self.store.alloc(Cell::Scalar(Value::zero_of(field_ty)))
            };
            instance.0.insert(*field_name, field_addr);
        }
        Ok(self.store.alloc(Cell::Struct(instance)))
    }

    fn bind_in_current_scope(&mut self, name: StringId, addr: Address) {
        match self.frames.last_mut() {
            Some(frame) => frame.current_scope_mut().declare(name, addr),
            None => self.globals.declare(name, addr),
        }
    }

    // ----- frame / scope discipline ------------------------------------

    pub fn new_frame(&mut self, name: StringId) {
        self.frames.push(Frame::new(name));
    }

    /// Pops the current frame. All of its locals become unreachable; their
    /// store cells are left in place (no reuse).
    pub fn del_frame(&mut self) {
        self.frames.pop().expect("del_frame without a matching new_frame");
    }

    pub fn new_scope(&mut self) {
        self.current_frame_mut("new_scope").push_scope();
    }

    pub fn del_scope(&mut self) {
        self.current_frame_mut("del_scope").pop_scope();
    }

    fn current_frame_mut(&mut self, caller: &str) -> &mut Frame {
        self.frames.last_mut().unwrap_or_else(|| panic!("{caller} called outside any frame"))
    }

    pub fn frame_depth(&self) -> usize {
        self.frames.len()
    }

    // ----- lookup & access -----------------------------------------------

    /// Resolves `name` to its address: innermost-scope-first within the
    /// current frame, then the global namespace.
    pub fn get_value_in_scope(&self, name: StringId) -> Result<Address, CError> {
        if let Some(frame) = self.frames.last() {
            if let Some(addr) = frame.resolve(name) {
                return Ok(addr);
            }
        }
        self.globals.get(name).ok_or_else(|| CError::runtime(format!("unbound identifier '{}'", self.interner.resolve(name))))
    }

    /// Reads the current value bound to `name`, for the scalar case —
    /// struct reads go through `get_struct_at`.
    pub fn read_var(&self, name: StringId) -> Result<Value, CError> {
        let addr = self.get_value_in_scope(name)?;
        self.get_value_at(addr).map(|v| v.clone())
    }

    pub fn get_value_at(&self, addr: Address) -> Result<&Value, CError> {
        self.store.get_value(addr)
    }

    pub fn set_at_address(&mut self, addr: Address, value: Value) -> Result<(), CError> {
        self.store.set_value(addr, value)
    }

    pub fn get_struct_at(&self, addr: Address) -> Result<&StructInstance, CError> {
        self.store.get_struct(addr)
    }

    pub fn field_address(&self, struct_addr: Address, field: StringId) -> Result<Address, CError> {
        self.get_struct_at(struct_addr)?.field_address(field).ok_or_else(|| {
            CError::runtime(format!("struct has no field '{}'", self.interner.resolve(field)))
        })
    }

    pub fn resolve_function(&self, name: StringId) -> Option<Rc<FunctionDecl>> {
        self.functions.get(&name).cloned()
    }

    pub fn resolve_builtin(&self, name: StringId) -> Option<BuiltinEntry> {
        self.builtins.get(&name).cloned()
    }

    pub fn resolve_callable(&self, name: StringId) -> Option<Callable> {
        self.resolve_function(name)
            .map(Callable::User)
            .or_else(|| self.resolve_builtin(name).map(Callable::Builtin))
    }

    // ----- malloc/free support -------------------------------------------

    pub fn alloc_scalars(&mut self, count: usize) -> Address {
        self.store.alloc_contiguous(count, || Value::int(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_depth_tracks_call_nesting() {
        let mut memory = Memory::new(Interner::new());
        let f = memory.interner.intern("f");
        let g = memory.interner.intern("g");
        assert_eq!(memory.frame_depth(), 0);
        memory.new_frame(f);
        assert_eq!(memory.frame_depth(), 1);
        memory.new_frame(g);
        assert_eq!(memory.frame_depth(), 2);
        memory.del_frame();
        assert_eq!(memory.frame_depth(), 1);
        memory.del_frame();
        assert_eq!(memory.frame_depth(), 0);
    }

    #[test]
    #[should_panic(expected = "del_frame without a matching new_frame")]
    fn del_frame_without_new_frame_panics() {
        let mut memory = Memory::new(Interner::new());
        memory.del_frame();
    }
}
