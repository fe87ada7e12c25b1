use super::{Number, Object, Value};
use num_bigint::BigInt;

#[test]
fn accessors() {
    let v = Value::String("hi".into());
    assert_eq!(v.as_str(), Some("hi"));
    assert_eq!(v.as_bool(), None);
    assert_eq!(v.type_name(), "string");

    let v = Value::Boolean(true);
    assert_eq!(v.as_bool(), Some(true));
    assert_eq!(v.as_str(), None);
    assert_eq!(v.type_name(), "boolean");

    let v = Value::Number(Number::Int32(7));
    assert_eq!(v.as_i64(), Some(7));
    assert_eq!(v.as_f64(), None);
    assert_eq!(v.type_name(), "number");

    let v = Value::Array(vec![Value::Boolean(false)]);
    assert_eq!(v.as_array().map(<[Value]>::len), Some(1));
    assert_eq!(v.type_name(), "array");

    let v = Value::Object(Object::new());
    assert!(v.as_object().unwrap().is_empty());
    assert_eq!(v.get("nope"), None);
    assert_eq!(v.type_name(), "table");
}

#[test]
fn number_conversions() {
    assert_eq!(Number::Int32(5).as_i32(), Some(5));
    assert_eq!(Number::Int32(5).as_i64(), Some(5));
    assert_eq!(Number::Int64(5).as_i32(), None);
    assert_eq!(Number::Int64(1 << 40).as_i64(), Some(1 << 40));

    // small big-integers narrow, oversized ones do not
    assert_eq!(Number::BigInt(BigInt::from(7)).as_i64(), Some(7));
    let big: BigInt = "99999999999999999999999999".parse().unwrap();
    assert_eq!(Number::BigInt(big.clone()).as_i64(), None);
    assert_eq!(Number::BigInt(big.clone()).as_big_int(), Some(&big));

    assert_eq!(Number::Float(1.5).as_f64(), Some(1.5));
    assert_eq!(Number::Float(1.5).as_i64(), None);
}

#[test]
fn object_preserves_insertion_order() {
    let mut object = Object::new();
    object.insert("zebra".into(), Value::Boolean(true));
    object.insert("apple".into(), Value::Boolean(false));
    object.insert("mango".into(), Value::Boolean(true));

    let keys: Vec<_> = object.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["zebra", "apple", "mango"]);
    assert_eq!(object.len(), 3);
    assert!(object.contains_key("apple"));
    assert!(!object.contains_key("pear"));
    assert_eq!(object.get("mango"), Some(&Value::Boolean(true)));

    // entries() exposes the same order
    assert_eq!(object.entries()[0].0, "zebra");
}

#[test]
fn object_debug_renders_as_map() {
    let mut object = Object::new();
    object.insert("a".into(), Value::Boolean(true));
    let rendered = format!("{object:?}");
    assert!(rendered.starts_with('{'));
    assert!(rendered.contains("\"a\""));
}
