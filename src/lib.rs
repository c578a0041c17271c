//! # calque
//!
//! Deep structural copy of arbitrary object graphs.
//!
//! Given a root value, `calque` produces a fully independent duplicate:
//! cycles terminate, shared references stay shared (one clone per original,
//! ever), arrays of arbitrary rank are walked element by element, fields
//! inherited from a chain of base types are copied including private ones,
//! primitive values are shared as-is, and callback references clone to null.
//!
//! Objects live in a [`Heap`] and are addressed by stable arena index, so
//! object identity is just index equality. Types are described by a
//! store-based shape system ([`ShapeStore`]): shapes reference each other by
//! handle, which puts recursion in data instead of types and lets a struct's
//! field name the struct's own shape.
//!
//! The copier is generic over [`IHost`], the contract for everything it
//! needs from an object model: field enumeration with declaring-type and
//! visibility filters, get/set by descriptor, memberwise shallow
//! duplication, and array element access.
//!
//! ```
//! use calque::{DeepCopy, FieldDef, Heap, IHost, ScalarKind, ShapeStore, Value};
//!
//! let mut shapes = ShapeStore::new();
//! let int = shapes.scalar(ScalarKind::Int);
//! let node = shapes.declare_struct("Node", None);
//! shapes.define_fields(
//!     node,
//!     vec![FieldDef::new("value", int), FieldDef::new("next", node)],
//! );
//!
//! let mut heap = Heap::new(shapes);
//! let a = heap.alloc_struct(node);
//! let next = heap.field_named(node, "next").unwrap();
//! // A one-node cycle: a.next = a.
//! heap.field_set(a, next, Value::Obj(a)).unwrap();
//!
//! let clone = a.deep_copy(&mut heap).unwrap();
//! assert_ne!(clone, a);
//! // The clone's cycle points at the clone, not the original.
//! assert_eq!(heap.field_get(clone, next).unwrap(), Value::Obj(clone));
//! ```

// Important rule: we do not declare all modules as pub, we will be very
// intentional about what our public interface is.

// --- arena ---
pub(crate) mod arena;
pub use arena::{Arena, Idx};

// --- shape ---
mod shape;
pub use shape::{
    ArrayDef, FieldDef, FieldVis, ScalarKind, ShapeDef, ShapeHandle, ShapeStore, StructDef,
};

// --- value ---
mod value;
pub use value::{CallbackId, Extents, ObjId, Object, Value};

// --- errors ---
mod errors;
pub use errors::{CopyError, CopyErrorKind};

// --- host contract ---
mod host;
pub use host::{FieldQuery, FieldRef, IHost};

// --- heap ---
mod heap;
pub use heap::Heap;

// --- ledger ---
pub(crate) mod ledger;
pub use ledger::IdentityLedger;

// --- stepper ---
mod stepper;
pub use stepper::{linear_index, ArrayStepper, IndexTuple};

// --- copy ---
mod copy;
pub use copy::{deep_copy, DeepCopy};
