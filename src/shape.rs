//! Store-based shape system.
//!
//! Type descriptors live in a `ShapeStore` and reference each other by
//! `ShapeHandle` (an index into the store). This puts recursion in data
//! instead of types: a struct's field may name the struct's own handle, which
//! is how self-referential and mutually-referential graphs get their shapes.
//!
//! A struct shape declares only its *own* fields; inherited state is reached
//! through the `base` handle chain. Instance storage flattens the chain (see
//! `heap`), but shape-level queries always answer in terms of the declaring
//! type, which is what lets private base fields stay private.

use core::fmt;

// ============================================================================
// Handles and definitions
// ============================================================================

/// A handle to a shape in a `ShapeStore`.
///
/// This is just an index into the store's shape list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeHandle(u32);

/// Scalar kinds: the primitive-classified types.
///
/// Values of these kinds are immutable by value, so copying shares them
/// as-is; the classifier short-circuit on scalars is also what terminates
/// the copy recursion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Int,
    Float,
    Bool,
    Char,
    /// Text counts as primitive exactly like the intrinsic value kinds:
    /// immutable, shared between original and clone.
    Text,
}

impl ScalarKind {
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
            ScalarKind::Bool => "bool",
            ScalarKind::Char => "char",
            ScalarKind::Text => "text",
        }
    }
}

/// Field visibility on its declaring type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldVis {
    Public,
    /// Visible only through the declaring type's own field list.
    Private,
}

/// One data member declared directly on a struct shape.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: Box<str>,
    pub vis: FieldVis,
    /// Declared type of the field.
    pub shape: ShapeHandle,
}

impl FieldDef {
    /// A public field.
    pub fn new(name: &str, shape: ShapeHandle) -> Self {
        Self {
            name: name.into(),
            vis: FieldVis::Public,
            shape,
        }
    }

    /// A private field.
    pub fn private(name: &str, shape: ShapeHandle) -> Self {
        Self {
            name: name.into(),
            vis: FieldVis::Private,
            shape,
        }
    }
}

/// A named composite type with an optional base type.
#[derive(Debug, Clone)]
pub struct StructDef {
    pub name: Box<str>,
    /// Single-inheritance chain; `None` terminates it.
    pub base: Option<ShapeHandle>,
    /// Abstract shapes admit no shallow duplication.
    pub abstract_: bool,
    /// Fields declared directly on this type, in declaration order.
    pub fields: Vec<FieldDef>,
}

/// An array type. Rank and extents are per-instance, not per-shape.
#[derive(Debug, Clone)]
pub struct ArrayDef {
    pub elem: ShapeHandle,
}

/// Type-specific definition.
#[derive(Debug, Clone)]
pub enum ShapeDef {
    Scalar(ScalarKind),
    Struct(StructDef),
    Array(ArrayDef),
    /// Opaque function reference; never duplicated.
    Callback,
}

// ============================================================================
// ShapeStore
// ============================================================================

/// A store of shape definitions, referenced by handle.
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    defs: Vec<ShapeDef>,
}

impl ShapeStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self { defs: Vec::new() }
    }

    /// Add a shape definition and return its handle.
    pub fn add(&mut self, def: ShapeDef) -> ShapeHandle {
        let raw = u32::try_from(self.defs.len()).expect("shape store full");
        self.defs.push(def);
        ShapeHandle(raw)
    }

    /// Add a scalar shape.
    pub fn scalar(&mut self, kind: ScalarKind) -> ShapeHandle {
        self.add(ShapeDef::Scalar(kind))
    }

    /// Add a concrete struct shape.
    pub fn struct_shape(
        &mut self,
        name: &str,
        base: Option<ShapeHandle>,
        fields: Vec<FieldDef>,
    ) -> ShapeHandle {
        self.add(ShapeDef::Struct(StructDef {
            name: name.into(),
            base,
            abstract_: false,
            fields,
        }))
    }

    /// Add an abstract struct shape (no shallow duplication possible).
    pub fn abstract_shape(
        &mut self,
        name: &str,
        base: Option<ShapeHandle>,
        fields: Vec<FieldDef>,
    ) -> ShapeHandle {
        self.add(ShapeDef::Struct(StructDef {
            name: name.into(),
            base,
            abstract_: true,
            fields,
        }))
    }

    /// Add an array shape over the given element shape.
    pub fn array(&mut self, elem: ShapeHandle) -> ShapeHandle {
        self.add(ShapeDef::Array(ArrayDef { elem }))
    }

    /// Add a callback (function reference) shape.
    pub fn callback(&mut self) -> ShapeHandle {
        self.add(ShapeDef::Callback)
    }

    /// Declare a struct shape with no fields yet, so its handle can appear in
    /// its own (or a mutually-referential) field list. Complete it with
    /// [`define_fields`](Self::define_fields).
    pub fn declare_struct(&mut self, name: &str, base: Option<ShapeHandle>) -> ShapeHandle {
        self.struct_shape(name, base, Vec::new())
    }

    /// Fill in the field list of a previously declared struct shape.
    ///
    /// # Panics
    /// Panics if the handle is not a struct shape or already has fields.
    pub fn define_fields(&mut self, handle: ShapeHandle, fields: Vec<FieldDef>) {
        match &mut self.defs[handle.0 as usize] {
            ShapeDef::Struct(def) => {
                assert!(def.fields.is_empty(), "fields already defined");
                def.fields = fields;
            }
            _ => panic!("not a struct shape"),
        }
    }

    /// Get a shape definition by handle.
    ///
    /// # Panics
    /// Panics if the handle does not belong to this store.
    #[inline]
    pub fn get(&self, handle: ShapeHandle) -> &ShapeDef {
        &self.defs[handle.0 as usize]
    }

    /// Whether values of this shape are atomic/immutable for copy purposes.
    #[inline]
    pub fn is_primitive(&self, handle: ShapeHandle) -> bool {
        matches!(self.get(handle), ShapeDef::Scalar(_))
    }

    /// Struct-specific information, if this is a struct shape.
    #[inline]
    pub fn as_struct(&self, handle: ShapeHandle) -> Option<&StructDef> {
        match self.get(handle) {
            ShapeDef::Struct(def) => Some(def),
            _ => None,
        }
    }

    /// The base shape, if this is a struct shape with one.
    #[inline]
    pub fn base_of(&self, handle: ShapeHandle) -> Option<ShapeHandle> {
        self.as_struct(handle).and_then(|def| def.base)
    }

    /// Human-readable name for diagnostics.
    pub fn name_of(&self, handle: ShapeHandle) -> &str {
        match self.get(handle) {
            ShapeDef::Scalar(kind) => kind.name(),
            ShapeDef::Struct(def) => &def.name,
            ShapeDef::Array(_) => "array",
            ShapeDef::Callback => "callback",
        }
    }

    /// The inheritance chain of a struct shape, base-most ancestor first,
    /// ending with the shape itself.
    ///
    /// # Panics
    /// Panics if the handle is not a struct shape.
    pub fn chain(&self, handle: ShapeHandle) -> Vec<ShapeHandle> {
        assert!(self.as_struct(handle).is_some(), "not a struct shape");
        let mut chain = Vec::new();
        let mut cursor = Some(handle);
        while let Some(h) = cursor {
            chain.push(h);
            cursor = self.base_of(h);
        }
        chain.reverse();
        chain
    }

    /// Whether `shape` is `ancestor` or has it somewhere up its base chain.
    pub fn is_self_or_descendant(&self, shape: ShapeHandle, ancestor: ShapeHandle) -> bool {
        let mut cursor = Some(shape);
        while let Some(h) = cursor {
            if h == ancestor {
                return true;
            }
            cursor = self.base_of(h);
        }
        false
    }

    /// Total number of instance slots for a struct shape: the sum of declared
    /// field counts over the whole chain.
    pub fn total_slots(&self, handle: ShapeHandle) -> usize {
        self.chain(handle)
            .iter()
            .map(|&h| self.as_struct(h).map_or(0, |d| d.fields.len()))
            .sum()
    }

    /// The flattened slot offset of field `index` declared on `declaring`:
    /// ancestors' declared fields come first, base-most ancestor first.
    ///
    /// # Panics
    /// Panics if `declaring` is not a struct shape or `index` is out of range.
    pub fn slot_of(&self, declaring: ShapeHandle, index: usize) -> usize {
        let def = self.as_struct(declaring).expect("not a struct shape");
        assert!(index < def.fields.len(), "field index out of range");
        let ancestors: usize = self
            .chain(declaring)
            .iter()
            .take_while(|&&h| h != declaring)
            .map(|&h| self.as_struct(h).map_or(0, |d| d.fields.len()))
            .sum();
        ancestors + index
    }
}

impl fmt::Display for ShapeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape#{}", self.0)
    }
}
