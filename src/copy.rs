//! The graph walker: recursive deep copy over a host.
//!
//! `deep_copy` allocates a fresh ledger and recurses. The one load-bearing
//! ordering constraint lives in `copy_object`: the original→clone pair is
//! registered in the ledger immediately after the shallow duplicate exists
//! and before *any* recursion, so a back-reference encountered deeper in the
//! graph (a cycle, a self-referencing array, a shared sub-object) resolves
//! to the in-progress clone instead of recursing forever.

use crate::errors::CopyError;
use crate::host::{FieldQuery, IHost};
use crate::ledger::IdentityLedger;
use crate::shape::ShapeHandle;
use crate::stepper::ArrayStepper;
use crate::value::{ObjId, Value};

/// Deep-copy a value: a fully independent structural duplicate, with cycles
/// and shared references preserved in the clone's topology, primitive values
/// shared, and callback references cloned to null.
///
/// Each call owns its own ledger; two calls never share state, even over
/// overlapping graphs (they will just produce independent clone sets).
pub fn deep_copy<H: IHost>(host: &mut H, value: Value) -> Result<Value, CopyError> {
    let mut ledger = IdentityLedger::new();
    copy_value(host, &mut ledger, value)
}

/// Values with the "same type in, same type out" guarantee: a `Value` copies
/// to a `Value`, an `ObjId` to an `ObjId`, no downcast at the call site.
pub trait DeepCopy: Sized {
    fn deep_copy<H: IHost>(&self, host: &mut H) -> Result<Self, CopyError>;
}

impl DeepCopy for Value {
    fn deep_copy<H: IHost>(&self, host: &mut H) -> Result<Self, CopyError> {
        deep_copy(host, self.clone())
    }
}

impl DeepCopy for ObjId {
    fn deep_copy<H: IHost>(&self, host: &mut H) -> Result<Self, CopyError> {
        let mut ledger = IdentityLedger::new();
        copy_object(host, &mut ledger, *self)
    }
}

fn copy_value<H: IHost>(
    host: &mut H,
    ledger: &mut IdentityLedger,
    value: Value,
) -> Result<Value, CopyError> {
    match value {
        // Identity case: no allocation, no ledger entry.
        Value::Null => Ok(Value::Null),
        // Callables are not duplicated.
        Value::Callback(_) => Ok(Value::Null),
        // Primitives are immutable by value; share them as-is.
        v @ (Value::Int(_) | Value::Float(_) | Value::Bool(_) | Value::Char(_)
        | Value::Text(_)) => Ok(v),
        Value::Obj(id) => Ok(Value::Obj(copy_object(host, ledger, id)?)),
    }
}

fn copy_object<H: IHost>(
    host: &mut H,
    ledger: &mut IdentityLedger,
    original: ObjId,
) -> Result<ObjId, CopyError> {
    if let Some(clone) = ledger.lookup(original) {
        return Ok(clone);
    }

    let clone = host.shallow_dup(original)?;
    // Must precede all recursion; see module docs.
    ledger.register(original, clone);

    if let Some((elem, extents)) = host.array_info(original) {
        // Primitive elements were value-copied by the shallow duplicate.
        // Everything else (callback elements included, which clone to null)
        // gets the per-element walk.
        if !host.is_primitive(elem) {
            for index in ArrayStepper::new(&extents) {
                let value = host.element_get(original, &index)?;
                let copied = copy_value(host, ledger, value)?;
                host.element_set(clone, &index, copied)?;
            }
        }
        return Ok(clone);
    }

    let shape = host.shape_of(original);
    copy_fields(host, ledger, original, clone, shape, FieldQuery::Flattened)?;
    copy_base_private_fields(host, ledger, original, clone, shape)?;
    Ok(clone)
}

/// Walk the ancestor chain base-most first, copying each ancestor's declared
/// private fields (the ones the flattened enumeration cannot see). A shape
/// with no base terminates the walk.
fn copy_base_private_fields<H: IHost>(
    host: &mut H,
    ledger: &mut IdentityLedger,
    original: ObjId,
    clone: ObjId,
    shape: ShapeHandle,
) -> Result<(), CopyError> {
    let Some(base) = host.base_of(shape) else {
        return Ok(());
    };
    copy_base_private_fields(host, ledger, original, clone, base)?;
    copy_fields(
        host,
        ledger,
        original,
        clone,
        base,
        FieldQuery::DeclaredPrivate,
    )
}

fn copy_fields<H: IHost>(
    host: &mut H,
    ledger: &mut IdentityLedger,
    original: ObjId,
    clone: ObjId,
    shape: ShapeHandle,
    query: FieldQuery,
) -> Result<(), CopyError> {
    for field in host.fields(shape, query) {
        // Fields of primitive declared type were covered by the shallow dup.
        if host.is_primitive(host.field_shape(field)) {
            continue;
        }
        let value = host.field_get(original, field)?;
        let copied = copy_value(host, ledger, value)?;
        host.field_set(clone, field, copied)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::Heap;
    use crate::shape::{FieldDef, ScalarKind, ShapeStore};
    use crate::value::CallbackId;

    #[test]
    fn null_copies_to_null() {
        let mut heap = Heap::new(ShapeStore::new());
        assert_eq!(deep_copy(&mut heap, Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn primitives_copy_to_themselves() {
        let mut heap = Heap::new(ShapeStore::new());
        let before = heap.object_count();
        assert_eq!(deep_copy(&mut heap, Value::Int(5)).unwrap(), Value::Int(5));
        assert_eq!(
            deep_copy(&mut heap, Value::Char('q')).unwrap(),
            Value::Char('q')
        );
        // No allocation for primitives.
        assert_eq!(heap.object_count(), before);
    }

    #[test]
    fn callbacks_copy_to_null() {
        let mut heap = Heap::new(ShapeStore::new());
        let copied = deep_copy(&mut heap, Value::Callback(CallbackId(3))).unwrap();
        assert_eq!(copied, Value::Null);
    }

    #[test]
    fn composite_copy_is_a_new_object() {
        let mut shapes = ShapeStore::new();
        let int = shapes.scalar(ScalarKind::Int);
        let point = shapes.struct_shape(
            "Point",
            None,
            vec![FieldDef::new("x", int), FieldDef::new("y", int)],
        );
        let mut heap = Heap::new(shapes);
        let obj = heap.alloc_struct(point);
        let x = heap.field_named(point, "x").unwrap();
        heap.field_set(obj, x, Value::Int(4)).unwrap();

        let clone = obj.deep_copy(&mut heap).unwrap();
        assert_ne!(clone, obj);
        assert_eq!(heap.field_get(clone, x).unwrap(), Value::Int(4));
    }

    #[test]
    fn error_aborts_the_copy() {
        let mut shapes = ShapeStore::new();
        let ghost = shapes.abstract_shape("Ghost", None, vec![]);
        let holder = shapes.struct_shape("Holder", None, vec![FieldDef::new("g", ghost)]);
        let mut heap = Heap::new(shapes);

        let g = heap.alloc_struct(ghost);
        let h = heap.alloc_struct(holder);
        let f = heap.field_named(holder, "g").unwrap();
        heap.field_set(h, f, Value::Obj(g)).unwrap();

        assert!(h.deep_copy(&mut heap).is_err());
    }
}
