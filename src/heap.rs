//! Object heap: the in-crate host implementation.
//!
//! `Heap` owns a shape store and an arena of instances, and implements the
//! `IHost` contract on top of them. Struct instances keep one flattened slot
//! vector covering the whole inheritance chain; array instances keep their
//! extents plus elements in stepper order.
//!
//! Construction misuse (allocating with a non-struct handle, rank-0 arrays)
//! panics; the copy-path accessors return `CopyError` instead, since a bad
//! descriptor there is the caller's object model disagreeing with itself.

use crate::arena::Arena;
use crate::errors::CopyError;
use crate::host::{FieldQuery, FieldRef, IHost};
use crate::shape::{FieldVis, ShapeDef, ShapeHandle, ShapeStore};
use crate::stepper::{linear_index, IndexTuple};
use crate::value::{Extents, ObjId, Object, Value};

pub struct Heap {
    shapes: ShapeStore,
    objects: Arena<Object>,
}

impl Heap {
    pub fn new(shapes: ShapeStore) -> Self {
        Self {
            shapes,
            objects: Arena::new(),
        }
    }

    #[inline]
    pub fn shapes(&self) -> &ShapeStore {
        &self.shapes
    }

    #[inline]
    pub fn shapes_mut(&mut self) -> &mut ShapeStore {
        &mut self.shapes
    }

    /// Number of live instances, clones included.
    #[inline]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Allocate a struct instance with every slot null.
    ///
    /// Abstract shapes are allocatable; they only refuse shallow duplication.
    ///
    /// # Panics
    /// Panics if `shape` is not a struct shape.
    pub fn alloc_struct(&mut self, shape: ShapeHandle) -> ObjId {
        let slots = vec![Value::Null; self.shapes.total_slots(shape)];
        self.objects.alloc(Object::Struct { shape, slots })
    }

    /// Allocate an array instance with every element null.
    ///
    /// # Panics
    /// Panics if `shape` is not an array shape or `extents` is empty
    /// (arrays have rank >= 1).
    pub fn alloc_array(&mut self, shape: ShapeHandle, extents: &[usize]) -> ObjId {
        assert!(
            matches!(self.shapes.get(shape), ShapeDef::Array(_)),
            "not an array shape"
        );
        assert!(!extents.is_empty(), "arrays have rank >= 1");
        let count: usize = extents.iter().product();
        self.objects.alloc(Object::Array {
            shape,
            extents: Extents::from_slice(extents),
            elems: vec![Value::Null; count],
        })
    }

    #[inline]
    pub fn get(&self, obj: ObjId) -> &Object {
        self.objects.get(obj)
    }

    /// Find a field by name, searching the instance shape first and then up
    /// the base chain (private ancestor fields included). Build/test
    /// convenience; the copier only uses descriptors from `fields`.
    pub fn field_named(&self, shape: ShapeHandle, name: &str) -> Option<FieldRef> {
        let mut cursor = Some(shape);
        while let Some(h) = cursor {
            if let Some(def) = self.shapes.as_struct(h) {
                if let Some(index) = def.fields.iter().position(|f| &*f.name == name) {
                    return Some(FieldRef {
                        declaring: h,
                        index,
                    });
                }
            }
            cursor = self.shapes.base_of(h);
        }
        None
    }

    /// Diagnostic name for an instance.
    fn target_name(&self, obj: ObjId) -> &str {
        match self.objects.get(obj) {
            Object::Struct { shape, .. } => self.shapes.name_of(*shape),
            Object::Array { .. } => "array",
        }
    }

    /// Validate a descriptor against an instance and resolve its flattened
    /// slot offset.
    fn checked_slot(&self, obj: ObjId, field: FieldRef) -> Result<usize, CopyError> {
        let fail = || {
            CopyError::field_access(
                self.shapes.name_of(field.declaring),
                field.index,
                self.target_name(obj),
            )
        };
        let Object::Struct { shape, .. } = self.objects.get(obj) else {
            return Err(fail());
        };
        let declared = self
            .shapes
            .as_struct(field.declaring)
            .map_or(0, |d| d.fields.len());
        if field.index >= declared || !self.shapes.is_self_or_descendant(*shape, field.declaring) {
            return Err(fail());
        }
        Ok(self.shapes.slot_of(field.declaring, field.index))
    }

    fn checked_element(&self, obj: ObjId, index: &IndexTuple) -> Result<usize, CopyError> {
        match self.objects.get(obj) {
            Object::Array { extents, .. } => linear_index(extents, index)
                .ok_or_else(|| CopyError::element_access(self.target_name(obj), index)),
            Object::Struct { .. } => {
                Err(CopyError::element_access(self.target_name(obj), index))
            }
        }
    }
}

impl IHost for Heap {
    fn shape_of(&self, obj: ObjId) -> ShapeHandle {
        self.objects.get(obj).shape()
    }

    fn is_primitive(&self, shape: ShapeHandle) -> bool {
        self.shapes.is_primitive(shape)
    }

    fn base_of(&self, shape: ShapeHandle) -> Option<ShapeHandle> {
        self.shapes.base_of(shape)
    }

    fn fields(&self, shape: ShapeHandle, query: FieldQuery) -> Vec<FieldRef> {
        if self.shapes.as_struct(shape).is_none() {
            return Vec::new();
        }
        let declared = |h: ShapeHandle, vis: Option<FieldVis>| -> Vec<FieldRef> {
            let fields = &self.shapes.as_struct(h).expect("struct shape").fields;
            fields
                .iter()
                .enumerate()
                .filter(|(_, f)| vis.map_or(true, |v| f.vis == v))
                .map(|(index, _)| FieldRef {
                    declaring: h,
                    index,
                })
                .collect()
        };
        match query {
            FieldQuery::Declared => declared(shape, None),
            FieldQuery::DeclaredPrivate => declared(shape, Some(FieldVis::Private)),
            FieldQuery::Flattened => {
                self.shapes
                    .chain(shape)
                    .into_iter()
                    .flat_map(|h| {
                        if h == shape {
                            declared(h, None)
                        } else {
                            declared(h, Some(FieldVis::Public))
                        }
                    })
                    .collect()
            }
        }
    }

    fn field_shape(&self, field: FieldRef) -> ShapeHandle {
        self.shapes
            .as_struct(field.declaring)
            .expect("foreign descriptor")
            .fields[field.index]
            .shape
    }

    fn field_get(&self, obj: ObjId, field: FieldRef) -> Result<Value, CopyError> {
        let slot = self.checked_slot(obj, field)?;
        match self.objects.get(obj) {
            Object::Struct { slots, .. } => Ok(slots[slot].clone()),
            Object::Array { .. } => unreachable!("checked_slot admits structs only"),
        }
    }

    fn field_set(&mut self, obj: ObjId, field: FieldRef, value: Value) -> Result<(), CopyError> {
        let slot = self.checked_slot(obj, field)?;
        match self.objects.get_mut(obj) {
            Object::Struct { slots, .. } => {
                slots[slot] = value;
                Ok(())
            }
            Object::Array { .. } => unreachable!("checked_slot admits structs only"),
        }
    }

    fn shallow_dup(&mut self, obj: ObjId) -> Result<ObjId, CopyError> {
        let dup = match self.objects.get(obj) {
            Object::Struct { shape, slots } => {
                let abstract_ = self
                    .shapes
                    .as_struct(*shape)
                    .map_or(true, |d| d.abstract_);
                if abstract_ {
                    return Err(CopyError::unsupported_target(self.shapes.name_of(*shape)));
                }
                Object::Struct {
                    shape: *shape,
                    slots: slots.clone(),
                }
            }
            arr @ Object::Array { .. } => arr.clone(),
        };
        Ok(self.objects.alloc(dup))
    }

    fn array_info(&self, obj: ObjId) -> Option<(ShapeHandle, Extents)> {
        match self.objects.get(obj) {
            Object::Array { shape, extents, .. } => match self.shapes.get(*shape) {
                ShapeDef::Array(def) => Some((def.elem, extents.clone())),
                _ => unreachable!("array instance with non-array shape"),
            },
            Object::Struct { .. } => None,
        }
    }

    fn element_get(&self, obj: ObjId, index: &IndexTuple) -> Result<Value, CopyError> {
        let offset = self.checked_element(obj, index)?;
        match self.objects.get(obj) {
            Object::Array { elems, .. } => Ok(elems[offset].clone()),
            Object::Struct { .. } => unreachable!("checked_element admits arrays only"),
        }
    }

    fn element_set(
        &mut self,
        obj: ObjId,
        index: &IndexTuple,
        value: Value,
    ) -> Result<(), CopyError> {
        let offset = self.checked_element(obj, index)?;
        match self.objects.get_mut(obj) {
            Object::Array { elems, .. } => {
                elems[offset] = value;
                Ok(())
            }
            Object::Struct { .. } => unreachable!("checked_element admits arrays only"),
        }
    }
}
