//! Cyclic graphs: back-references must resolve to the in-progress clone.

use calque::{DeepCopy, FieldDef, Heap, IHost, ScalarKind, ShapeStore, Value};

#[test]
fn self_reference_points_at_the_clone() {
    // A { value: 5, self: A } -> A' { value: 5, self: A' }
    let mut shapes = ShapeStore::new();
    let int = shapes.scalar(ScalarKind::Int);
    let a_shape = shapes.declare_struct("A", None);
    shapes.define_fields(
        a_shape,
        vec![
            FieldDef::new("value", int),
            FieldDef::new("self", a_shape),
        ],
    );

    let mut heap = Heap::new(shapes);
    let a = heap.alloc_struct(a_shape);
    let value = heap.field_named(a_shape, "value").unwrap();
    let self_ = heap.field_named(a_shape, "self").unwrap();
    heap.field_set(a, value, Value::Int(5)).unwrap();
    heap.field_set(a, self_, Value::Obj(a)).unwrap();

    let clone = a.deep_copy(&mut heap).unwrap();

    assert_ne!(clone, a);
    assert_eq!(heap.field_get(clone, value).unwrap(), Value::Int(5));
    assert_eq!(heap.field_get(clone, self_).unwrap(), Value::Obj(clone));
    // The original is untouched.
    assert_eq!(heap.field_get(a, self_).unwrap(), Value::Obj(a));
}

#[test]
fn two_object_cycle() {
    // P { child: C }, C { parent: P }
    let mut shapes = ShapeStore::new();
    let p_shape = shapes.declare_struct("P", None);
    let c_shape = shapes.declare_struct("C", None);
    shapes.define_fields(p_shape, vec![FieldDef::new("child", c_shape)]);
    shapes.define_fields(c_shape, vec![FieldDef::new("parent", p_shape)]);

    let mut heap = Heap::new(shapes);
    let p = heap.alloc_struct(p_shape);
    let c = heap.alloc_struct(c_shape);
    let child = heap.field_named(p_shape, "child").unwrap();
    let parent = heap.field_named(c_shape, "parent").unwrap();
    heap.field_set(p, child, Value::Obj(c)).unwrap();
    heap.field_set(c, parent, Value::Obj(p)).unwrap();

    let p2 = p.deep_copy(&mut heap).unwrap();
    let Value::Obj(c2) = heap.field_get(p2, child).unwrap() else {
        panic!("clone's child is not an object");
    };

    assert_ne!(p2, p);
    assert_ne!(c2, c);
    assert_eq!(heap.field_get(c2, parent).unwrap(), Value::Obj(p2));
}

#[test]
fn clone_count_matches_distinct_objects() {
    // A ring of five nodes: copying it allocates exactly five clones, which
    // also bounds the recursion by the number of distinct objects.
    let mut shapes = ShapeStore::new();
    let node = shapes.declare_struct("Node", None);
    shapes.define_fields(node, vec![FieldDef::new("next", node)]);

    let mut heap = Heap::new(shapes);
    let next = heap.field_named(node, "next").unwrap();
    let ring: Vec<_> = (0..5).map(|_| heap.alloc_struct(node)).collect();
    for i in 0..5 {
        heap.field_set(ring[i], next, Value::Obj(ring[(i + 1) % 5]))
            .unwrap();
    }

    let before = heap.object_count();
    let clone = ring[0].deep_copy(&mut heap).unwrap();
    assert_eq!(heap.object_count(), before + 5);

    // Walking the cloned ring comes back around without meeting an original.
    let mut cursor = clone;
    for _ in 0..5 {
        assert!(!ring.contains(&cursor));
        let Value::Obj(n) = heap.field_get(cursor, next).unwrap() else {
            panic!("broken ring");
        };
        cursor = n;
    }
    assert_eq!(cursor, clone);
}

#[test]
fn cycle_through_an_array_terminates() {
    // arr[0] -> cell, cell.items -> arr: the element walk meets the array
    // currently being copied, which must already be in the ledger.
    let mut shapes = ShapeStore::new();
    let cell = shapes.declare_struct("Cell", None);
    let arr_of_cell = shapes.array(cell);
    shapes.define_fields(cell, vec![FieldDef::new("items", arr_of_cell)]);

    let mut heap = Heap::new(shapes);
    let arr = heap.alloc_array(arr_of_cell, &[1]);
    let cell_obj = heap.alloc_struct(cell);
    let items = heap.field_named(cell, "items").unwrap();
    heap.field_set(cell_obj, items, Value::Obj(arr)).unwrap();
    heap.element_set(arr, &calque::IndexTuple::from_slice(&[0]), Value::Obj(cell_obj))
        .unwrap();

    // arr -> cell_obj -> arr is a cycle through an array.
    let clone = arr.deep_copy(&mut heap).unwrap();
    let Value::Obj(cell2) =
        heap.element_get(clone, &calque::IndexTuple::from_slice(&[0])).unwrap()
    else {
        panic!("clone element is not an object");
    };
    assert_ne!(cell2, cell_obj);
    assert_eq!(heap.field_get(cell2, items).unwrap(), Value::Obj(clone));
}
