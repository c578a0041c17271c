//! Visited-object ledger.
//!
//! Maps original-object identity to the clone already produced for it within
//! one top-level copy call. A hit means the original was reached before along
//! another path (shared reference) or is currently being copied further up
//! the stack (cycle); either way the same clone is returned, preserving the
//! reference topology of the input graph.
//!
//! The ledger is born empty per call, only ever grows, and is dropped with
//! the call. Identity is the arena index, so a plain integer-keyed map
//! suffices.

use rustc_hash::FxHashMap;

use crate::value::ObjId;

/// Original → clone mapping for a single copy operation.
#[derive(Debug, Default)]
pub struct IdentityLedger {
    entries: FxHashMap<ObjId, ObjId>,
}

impl IdentityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The clone previously produced for `original`, if any.
    #[inline]
    pub fn lookup(&self, original: ObjId) -> Option<ObjId> {
        self.entries.get(&original).copied()
    }

    /// Record that `original` has been cloned as `clone`.
    ///
    /// Entries are never overwritten; registering the same original twice is
    /// a walker bug.
    #[inline]
    pub fn register(&mut self, original: ObjId, clone: ObjId) {
        let previous = self.entries.insert(original, clone);
        debug_assert!(previous.is_none(), "original registered twice");
    }

    /// Number of distinct originals cloned so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::value::Object;

    fn two_ids() -> (ObjId, ObjId) {
        let mut shapes = crate::shape::ShapeStore::new();
        let int = shapes.scalar(crate::shape::ScalarKind::Int);
        let arr = shapes.array(int);
        let mut arena: Arena<Object> = Arena::new();
        let empty = Object::Array {
            shape: arr,
            extents: Default::default(),
            elems: Vec::new(),
        };
        let a = arena.alloc(empty.clone());
        let b = arena.alloc(empty);
        (a, b)
    }

    #[test]
    fn lookup_miss_then_hit() {
        let (a, b) = two_ids();
        let mut ledger = IdentityLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.lookup(a), None);

        ledger.register(a, b);
        assert_eq!(ledger.lookup(a), Some(b));
        assert_eq!(ledger.lookup(b), None);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "registered twice")]
    fn double_register_is_a_bug() {
        let (a, b) = two_ids();
        let mut ledger = IdentityLedger::new();
        ledger.register(a, b);
        ledger.register(a, b);
    }
}
