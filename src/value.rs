//! Runtime values and heap objects.
//!
//! A `Value` is what one field or array-element slot holds. Composite state
//! lives in the heap's arena as an `Object` and is referenced by `ObjId`;
//! everything else is carried inline in the slot.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::arena::Idx;
use crate::shape::ShapeHandle;

/// Per-dimension array extents. Most arrays have low rank.
pub type Extents = SmallVec<[usize; 4]>;

/// An object reference: a typed index into the heap's arena.
pub type ObjId = Idx<Object>;

/// An opaque function-reference token. Never duplicated; clones to null.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackId(pub u32);

/// One slot's worth of state.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Char(char),
    /// Shared immutable text. Clones share the allocation.
    Text(Arc<str>),
    /// Reference to a composite object in the heap.
    Obj(ObjId),
    Callback(CallbackId),
}

impl Value {
    /// Shorthand for building a text value.
    pub fn text(s: &str) -> Self {
        Value::Text(Arc::from(s))
    }

    /// Whether this value is atomic/immutable for copy purposes.
    ///
    /// Null and callbacks are *not* primitive: null is its own identity case
    /// and callbacks have dedicated handling (they clone to null).
    #[inline]
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Value::Int(_) | Value::Float(_) | Value::Bool(_) | Value::Char(_) | Value::Text(_)
        )
    }

    /// The referenced object, if this is an object reference.
    #[inline]
    pub fn as_obj(&self) -> Option<ObjId> {
        match self {
            Value::Obj(id) => Some(*id),
            _ => None,
        }
    }
}

/// A composite instance owned by the heap.
///
/// Struct slots flatten the whole inheritance chain, base-most ancestor's
/// declared fields first (see `ShapeStore::slot_of`). Array elements are
/// stored in row-major-equivalent order with dimension 0 fastest-varying
/// (see `stepper::linear_index`).
#[derive(Debug, Clone)]
pub enum Object {
    Struct {
        shape: ShapeHandle,
        slots: Vec<Value>,
    },
    Array {
        /// The array shape (`ShapeDef::Array`), not the element shape.
        shape: ShapeHandle,
        extents: Extents,
        elems: Vec<Value>,
    },
}

impl Object {
    /// The concrete shape of this instance.
    #[inline]
    pub fn shape(&self) -> ShapeHandle {
        match self {
            Object::Struct { shape, .. } | Object::Array { shape, .. } => *shape,
        }
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Object::Array { .. })
    }
}
