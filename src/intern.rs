//! String interning for identifiers and struct/field names.
//!
//! Source text is tokenized and parsed once; after that, every further use of
//! an identifier (variable lookups, struct field access, function dispatch)
//! compares cheap `StringId`s instead of cloning or hashing whole strings.

use ahash::AHashMap;

/// Index into the interner's backing storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StringId(u32);

/// Owns the unique strings seen while lexing a program.
///
/// Built up during lexing/parsing, then read-only for the rest of the
/// pipeline (evaluator, diagnostics).
#[derive(Debug, Default)]
pub struct Interner {
    strings: Vec<String>,
    lookup: AHashMap<String, StringId>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `text`, returning its `StringId`. Re-interning the same text
    /// returns the same id.
    pub fn intern(&mut self, text: &str) -> StringId {
        if let Some(&id) = self.lookup.get(text) {
            return id;
        }
        let id = StringId(self.strings.len().try_into().expect("too many distinct identifiers"));
        self.strings.push(text.to_owned());
        self.lookup.insert(text.to_owned(), id);
        id
    }

    /// Resolves a `StringId` back to its text. Panics if `id` was not
    /// produced by this interner.
    pub fn resolve(&self, id: StringId) -> &str {
        &self.strings[id.0 as usize]
    }
}
