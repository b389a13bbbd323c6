//! JSON exchange of declarations and objects.
#![cfg(feature = "serde")]

use pddl_types::{Type, TypedObject, set_supertypes};

#[test]
fn test_type_declarations_from_json() {
    let json = r#"[
        {"name": "object", "basetype_name": null},
        {"name": "truck", "basetype_name": "object"}
    ]"#;
    let mut types: Vec<Type> = serde_json::from_str(json).unwrap();
    assert!(types.iter().all(|t| !t.is_resolved()));

    set_supertypes(&mut types).unwrap();
    let out = serde_json::to_value(&types[1]).unwrap();

    assert_eq!(out["supertype_names"], serde_json::json!(["object"]));
}

#[test]
fn test_typed_object_uses_type_key() {
    let obj = TypedObject::new("t1", "truck");
    let value = serde_json::to_value(&obj).unwrap();

    assert_eq!(value, serde_json::json!({"name": "t1", "type": "truck"}));
    assert_eq!(serde_json::from_value::<TypedObject>(value).unwrap(), obj);
}
