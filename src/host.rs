//! Host capability contract.
//!
//! The copier itself never inspects object storage directly. Everything it
//! needs from the object model is expressed here as the `IHost` trait:
//! shape lookup and classification, inheritance-chain walking, field
//! enumeration and get/set by descriptor, shallow memberwise duplication,
//! and array element access. `Heap` is the in-crate implementation; the
//! walker is generic over any host honoring this contract.

use crate::errors::CopyError;
use crate::shape::ShapeHandle;
use crate::stepper::IndexTuple;
use crate::value::{Extents, ObjId, Value};

/// Identifies one data member together with the type that declares it.
///
/// Used only for iteration; never retained across calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef {
    /// The type in the inheritance chain that declares the field.
    pub declaring: ShapeHandle,
    /// Position within the declaring type's own field list.
    pub index: usize,
}

/// Which fields an enumeration should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldQuery {
    /// Every field declared on the queried type (any visibility) plus the
    /// public fields of all its ancestors. Ancestor privates are *not*
    /// visible here; they are reached by querying the ancestor directly.
    Flattened,
    /// Only fields declared directly on the queried type.
    Declared,
    /// Only private fields declared directly on the queried type.
    DeclaredPrivate,
}

/// Capabilities the copier consumes from the object model.
pub trait IHost {
    /// Concrete shape of an instance. For arrays, the array's element shape
    /// is reported through [`array_info`](Self::array_info) instead.
    fn shape_of(&self, obj: ObjId) -> ShapeHandle;

    /// Whether values of this shape are atomic/immutable for copy purposes.
    fn is_primitive(&self, shape: ShapeHandle) -> bool;

    /// The base type of a struct shape, if any.
    fn base_of(&self, shape: ShapeHandle) -> Option<ShapeHandle>;

    /// Enumerate field descriptors per the query. Non-struct shapes have no
    /// fields.
    fn fields(&self, shape: ShapeHandle, query: FieldQuery) -> Vec<FieldRef>;

    /// Declared type of a field.
    ///
    /// # Panics
    /// May panic if the descriptor was not produced by this host.
    fn field_shape(&self, field: FieldRef) -> ShapeHandle;

    /// Read a field's current value on an instance.
    fn field_get(&self, obj: ObjId, field: FieldRef) -> Result<Value, CopyError>;

    /// Write a field's value on an instance.
    fn field_set(&mut self, obj: ObjId, field: FieldRef, value: Value) -> Result<(), CopyError>;

    /// Memberwise duplicate: a new instance of the same concrete shape with
    /// every slot's raw value copied, no deep semantics, no user construction
    /// logic involved.
    fn shallow_dup(&mut self, obj: ObjId) -> Result<ObjId, CopyError>;

    /// Element shape and per-dimension extents, if the instance is an array.
    fn array_info(&self, obj: ObjId) -> Option<(ShapeHandle, Extents)>;

    /// Read the element at an index tuple.
    fn element_get(&self, obj: ObjId, index: &IndexTuple) -> Result<Value, CopyError>;

    /// Write the element at an index tuple.
    fn element_set(
        &mut self,
        obj: ObjId,
        index: &IndexTuple,
        value: Value,
    ) -> Result<(), CopyError>;
}
