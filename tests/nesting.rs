//! Tests for nested aggregates: reference storage versus flattened storage,
//! recursive layouts, and the isolation guarantees of flattening.

use std::sync::Arc;

use aggregen::prelude::*;

fn registry() -> GeneratedRegistry {
    GeneratedRegistry::new(Arc::new(StaticLoader::new()))
}

fn make_point(ty: &GeneratedTypeRc, x: i32, y: i32) -> Instance {
    ty.make_value(&[Value::Int32(x), Value::Int32(y)]).unwrap()
}

#[test]
fn test_reference_vs_flattened_layout() {
    let registry = registry();
    let point = registry
        .generate_value_class("Point2D", &["x:I", "y:I"])
        .unwrap();

    let line = registry
        .generate_value_class("Line2D", &["st:LPoint2D;", "en:LPoint2D;"])
        .unwrap();
    let flat = registry
        .generate_value_class(
            "FlattenedLine2D",
            &["st:QPoint2D;:value", "en:QPoint2D;:value"],
        )
        .unwrap();

    // Two handle slots vs two inlined Point2D layouts.
    assert_eq!(line.plan().width(), 2);
    assert_eq!(flat.plan().width(), 2 * point.plan().width());
}

#[test]
fn test_reference_and_flattened_layouts_agree_observably() {
    let registry = registry();
    let point = registry
        .generate_value_class("Point2D", &["x:I", "y:I"])
        .unwrap();
    let line = registry
        .generate_value_class("Line2D", &["st:LPoint2D;", "en:LPoint2D;"])
        .unwrap();
    let flat = registry
        .generate_value_class(
            "FlattenedLine2D",
            &["st:QPoint2D;:value", "en:QPoint2D;:value"],
        )
        .unwrap();

    let st = make_point(&point, 0xFFEE_FFEEu32 as i32, 0xAABB_AABBu32 as i32);
    let en = make_point(&point, 0x1122_3344, 0x9988_7766u32 as i32);

    let by_ref = line
        .make_value(&[Value::Instance(st.clone()), Value::Instance(en.clone())])
        .unwrap();
    let by_flat = flat
        .make_value(&[Value::Instance(st.clone()), Value::Instance(en.clone())])
        .unwrap();

    // Same points, different storage: the accessors are indistinguishable.
    let px = point.field("x").unwrap();
    let py = point.field("y").unwrap();
    for name in ["st", "en"] {
        let a = line.field(name).unwrap().get::<Instance>(&by_ref).unwrap();
        let b = flat.field(name).unwrap().get::<Instance>(&by_flat).unwrap();
        assert_eq!(a, b);
        assert_eq!(px.get::<i32>(&a).unwrap(), px.get::<i32>(&b).unwrap());
        assert_eq!(py.get::<i32>(&a).unwrap(), py.get::<i32>(&b).unwrap());
    }

    // Wither on the reference layout: en and the receiver stay untouched.
    let new_st = make_point(&point, 7, 8);
    let fst = line.field("st").unwrap();
    let moved = fst.with(&by_ref, new_st.clone()).unwrap();
    assert_eq!(fst.get::<Instance>(&moved).unwrap(), new_st);
    assert_eq!(
        line.field("en").unwrap().get::<Instance>(&moved).unwrap(),
        en
    );
    assert_eq!(fst.get::<Instance>(&by_ref).unwrap(), st);

    // The generic wither over boxed values lands on the same result.
    let moved_generic = fst
        .with_generic(
            &Value::Instance(by_ref.clone()),
            &Value::Instance(new_st.clone()),
        )
        .unwrap();
    assert_eq!(moved_generic, Value::Instance(moved));
}

#[test]
fn test_flattened_line_round_trip() {
    let registry = registry();
    let point = registry
        .generate_value_class("Point2D", &["x:I", "y:I"])
        .unwrap();
    let flat = registry
        .generate_value_class(
            "FlattenedLine2D",
            &["st:QPoint2D;:value", "en:QPoint2D;:value"],
        )
        .unwrap();

    let st = make_point(&point, 0xFFEE_FFEEu32 as i32, 0xAABB_AABBu32 as i32);
    let en = make_point(&point, 0xCCDD_CCDDu32 as i32, 0xEEFF_EEFFu32 as i32);
    let line = flat
        .make_value(&[Value::Instance(st.clone()), Value::Instance(en.clone())])
        .unwrap();

    let got_st = flat.field("st").unwrap().get::<Instance>(&line).unwrap();
    let got_en = flat.field("en").unwrap().get::<Instance>(&line).unwrap();
    assert_eq!(got_st, st);
    assert_eq!(got_en, en);

    // Flattening copies; the materialized read is a fresh value.
    assert!(!got_st.same_identity(&st));
}

#[test]
fn test_flattened_wither_replaces_whole_span() {
    let registry = registry();
    let point = registry
        .generate_value_class("Point2D", &["x:I", "y:I"])
        .unwrap();
    let flat = registry
        .generate_value_class(
            "FlattenedLine2D",
            &["st:QPoint2D;:value", "en:QPoint2D;:value"],
        )
        .unwrap();

    let st = make_point(&point, 1, 2);
    let en = make_point(&point, 3, 4);
    let line = flat
        .make_value(&[Value::Instance(st), Value::Instance(en.clone())])
        .unwrap();

    let new_st = make_point(&point, 9, 8);
    let fst = flat.field("st").unwrap();
    let moved = fst.with(&line, new_st.clone()).unwrap();

    assert_eq!(fst.get::<Instance>(&moved).unwrap(), new_st);
    assert_eq!(
        flat.field("en").unwrap().get::<Instance>(&moved).unwrap(),
        en
    );
    // The receiver keeps its original start point.
    assert_ne!(fst.get::<Instance>(&line).unwrap(), new_st);
}

#[test]
fn test_mutating_source_after_flattening_does_not_leak() {
    let registry = registry();
    registry
        .generate_value_class("Point2D", &["x:I", "y:I"])
        .unwrap();
    let point = registry.get("Point2D").unwrap();
    let holder = registry
        .generate_ref_class("Holder", &["p:QPoint2D;:value"])
        .unwrap();

    let src = make_point(&point, 1, 2);
    let h = holder.make_value(&[Value::Instance(src.clone())]).unwrap();

    // Replacing the field later leaves previous reads untouched.
    let fp = holder.field("p").unwrap();
    let before = fp.get::<Instance>(&h).unwrap();
    fp.set(&h, make_point(&point, 7, 7)).unwrap();
    assert_eq!(before, src);
    assert_eq!(fp.get::<Instance>(&h).unwrap(), make_point(&point, 7, 7));
}

#[test]
fn test_deeply_nested_flattening() {
    let registry = registry();
    let point = registry
        .generate_value_class("Point2D", &["x:I", "y:I"])
        .unwrap();
    let line = registry
        .generate_value_class(
            "FlattenedLine2D",
            &["st:QPoint2D;:value", "en:QPoint2D;:value"],
        )
        .unwrap();
    let triangle = registry
        .generate_value_class(
            "Triangle2D",
            &["ab:QFlattenedLine2D;:value", "c:QPoint2D;:value"],
        )
        .unwrap();

    assert_eq!(triangle.plan().width(), 6);

    let a = make_point(&point, 1, 2);
    let b = make_point(&point, 3, 4);
    let c = make_point(&point, 5, 6);
    let ab = line
        .make_value(&[Value::Instance(a), Value::Instance(b.clone())])
        .unwrap();
    let t = triangle
        .make_value(&[Value::Instance(ab.clone()), Value::Instance(c.clone())])
        .unwrap();

    let got_ab = triangle.field("ab").unwrap().get::<Instance>(&t).unwrap();
    assert_eq!(got_ab, ab);
    assert_eq!(
        line.field("en").unwrap().get::<Instance>(&got_ab).unwrap(),
        b
    );
    assert_eq!(triangle.field("c").unwrap().get::<Instance>(&t).unwrap(), c);
}

#[test]
fn test_reference_fields_preserve_identity() {
    let registry = registry();
    let point = registry
        .generate_ref_class("RefPoint", &["x:I", "y:I"])
        .unwrap();
    let line = registry
        .generate_ref_class("RefLine", &["st:LRefPoint;", "en:LRefPoint;"])
        .unwrap();

    let p = point.make_value(&[Value::Int32(1), Value::Int32(2)]).unwrap();
    let l = line
        .make_value(&[Value::Instance(p.clone()), Value::Instance(p.clone())])
        .unwrap();

    let st = line.field("st").unwrap().get::<Instance>(&l).unwrap();
    let en = line.field("en").unwrap().get::<Instance>(&l).unwrap();
    assert!(st.same_identity(&p));
    assert!(st.same_identity(&en));

    // Mutation through the stored handle is visible through the original.
    point.field("x").unwrap().set(&st, 42i32).unwrap();
    assert_eq!(point.field("x").unwrap().get::<i32>(&p).unwrap(), 42);
}

#[test]
fn test_null_reference_fields() {
    let registry = registry();
    registry
        .generate_value_class("Point2D", &["x:I", "y:I"])
        .unwrap();
    let line = registry
        .generate_ref_class("NullableLine", &["st:LPoint2D;", "en:LPoint2D;"])
        .unwrap();

    let l = line.make_value(&[Value::Null, Value::Null]).unwrap();
    let fst = line.field("st").unwrap();
    assert_eq!(fst.get_generic(&Value::Instance(l.clone())).unwrap(), Value::Null);

    // Null is not admissible for flattened storage.
    let flat = registry
        .generate_value_class("FlatHolder", &["p:QPoint2D;:value"])
        .unwrap();
    let result = flat.make_value(&[Value::Null]);
    assert!(matches!(result, Err(Error::TypeMismatch { .. })));
}

#[test]
fn test_loader_declared_reference_accepts_any_instance() {
    let loader = StaticLoader::new();
    loader.register("java/lang/Object", AggregateKind::Reference);
    let registry = GeneratedRegistry::new(Arc::new(loader));

    let point = registry
        .generate_value_class("Point2D", &["x:I", "y:I"])
        .unwrap();
    let holder = registry
        .generate_ref_class("ObjectHolder", &["o:Ljava/lang/Object;"])
        .unwrap();

    // The loader owns no plan for the name, so any generated instance fits.
    let p = make_point(&point, 1, 2);
    let h = holder.make_value(&[Value::Instance(p.clone())]).unwrap();
    assert_eq!(holder.field("o").unwrap().get::<Instance>(&h).unwrap(), p);
}
