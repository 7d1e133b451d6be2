//! A lexical scope: an ordered identifier-to-address binding map.

use indexmap::IndexMap;

use crate::intern::StringId;
use crate::memory::store::Address;

/// A single lexical block's bindings. Ordered, though nothing here relies
/// on iteration order — `IndexMap` is used because it's the ordered map
/// already in the dependency stack rather than pulling in a second hashing
/// map type just for the handful of unordered lookups.
#[derive(Debug, Default)]
pub struct Scope(IndexMap<StringId, Address>);

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: StringId, addr: Address) {
        self.0.insert(name, addr);
    }

    pub fn get(&self, name: StringId) -> Option<Address> {
        self.0.get(&name).copied()
    }
}

/// A call-stack entry: a LIFO stack of scopes. The bottom scope holds the
/// function's parameters and root locals; it is pushed by `Frame::new` and
/// never popped except by `Memory::del_frame`.
#[derive(Debug)]
pub struct Frame {
    pub name: StringId,
    scopes: Vec<Scope>,
}

impl Frame {
    pub fn new(name: StringId) -> Self {
        Self { name, scopes: vec![Scope::new()] }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    /// Pops the innermost scope. Panics if called on the root scope —
    /// callers must pair every `new_scope` with exactly one `del_scope` on
    /// every exit path, so the root scope (pushed by `Frame::new`) is only
    /// ever removed by popping the whole frame.
    pub fn pop_scope(&mut self) {
        assert!(self.scopes.len() > 1, "cannot pop a function's root scope");
        self.scopes.pop();
    }

    /// Resolves `name` innermost-scope-first within this frame.
    pub fn resolve(&self, name: StringId) -> Option<Address> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// The scope new declarations land in.
    pub fn current_scope_mut(&mut self) -> &mut Scope {
        self.scopes.last_mut().expect("frame always has at least its root scope")
    }

    /// Lexical nesting depth: the number of active scopes within this
    /// frame equals the lexical nesting depth plus one.
    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> StringId {
        // `StringId` has no public constructor; round-trip through an
        // `Interner` to get one without depending on its private layout.
        let mut interner = crate::intern::Interner::new();
        interner.intern(&format!("s{n}"))
    }

    #[test]
    fn fresh_frame_has_depth_one_for_its_root_scope() {
        let frame = Frame::new(id(0));
        assert_eq!(frame.scope_depth(), 1);
    }

    #[test]
    fn scope_depth_tracks_lexical_nesting_plus_one() {
        let mut frame = Frame::new(id(0));
        frame.push_scope();
        frame.push_scope();
        assert_eq!(frame.scope_depth(), 3);
        frame.pop_scope();
        assert_eq!(frame.scope_depth(), 2);
        frame.pop_scope();
        assert_eq!(frame.scope_depth(), 1);
    }

    #[test]
    #[should_panic(expected = "cannot pop a function's root scope")]
    fn popping_the_root_scope_panics() {
        let mut frame = Frame::new(id(0));
        frame.pop_scope();
    }

    #[test]
    fn inner_scope_shadows_outer_binding_for_the_same_name() {
        let mut frame = Frame::new(id(0));
        let name = id(1);
        frame.current_scope_mut().declare(name, Address::from_payload(7));
        frame.push_scope();
        frame.current_scope_mut().declare(name, Address::from_payload(9));
        assert_eq!(frame.resolve(name), Some(Address::from_payload(9)));
        frame.pop_scope();
        assert_eq!(frame.resolve(name), Some(Address::from_payload(7)));
    }
}
