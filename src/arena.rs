//! Typed arena for heap objects.
//!
//! Objects are addressed by a stable integer index (`Idx<T>`), and that index
//! *is* the object's identity: two slots are the same object exactly when
//! their indices are equal. This sidesteps pointer-identity hashing entirely.
//!
//! The arena is monotone: a copy operation only ever allocates, so there is
//! no free list and indices stay valid for the arena's lifetime.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

// ============================================================================
// Idx - typed index into an arena
// ============================================================================

/// A typed index into an arena.
///
/// The phantom type prevents mixing indices from different arenas.
pub struct Idx<T> {
    raw: u32,
    _ty: PhantomData<fn() -> T>,
}

impl<T> Clone for Idx<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Idx<T> {}

impl<T> PartialEq for Idx<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Idx<T> {}

impl<T> Hash for Idx<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for Idx<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Idx({})", self.raw)
    }
}

impl<T> Idx<T> {
    fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _ty: PhantomData,
        }
    }

    #[inline]
    fn index(self) -> usize {
        self.raw as usize
    }
}

// ============================================================================
// Arena
// ============================================================================

/// Vec-backed arena with typed indices.
pub struct Arena<T> {
    slots: Vec<T>,
}

impl<T> Arena<T> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Allocate a new item, returning its index.
    ///
    /// # Panics
    /// Panics if the arena exceeds `u32::MAX` slots.
    pub fn alloc(&mut self, value: T) -> Idx<T> {
        let raw = u32::try_from(self.slots.len()).expect("arena full");
        self.slots.push(value);
        Idx::from_raw(raw)
    }

    /// Get a reference to an item.
    ///
    /// # Panics
    /// Panics if the index does not belong to this arena.
    #[inline]
    pub fn get(&self, id: Idx<T>) -> &T {
        &self.slots[id.index()]
    }

    /// Get a mutable reference to an item.
    ///
    /// # Panics
    /// Panics if the index does not belong to this arena.
    #[inline]
    pub fn get_mut(&mut self, id: Idx<T>) -> &mut T {
        &mut self.slots[id.index()]
    }

    /// Number of allocated items.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}
