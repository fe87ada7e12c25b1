use super::DocumentBuilder;
use crate::value::{Number, Value};

#[test]
fn object_lookup_across_index_threshold() {
    let mut doc = DocumentBuilder::new();
    let obj = doc.new_object();
    let mut ids = Vec::new();
    for i in 0..20 {
        let child = doc.new_scalar(Value::Number(Number::Int32(i)));
        doc.object_mut(obj).insert(format!("key{i}"), child);
        ids.push(child);
    }
    // linear scan below the threshold, hash index above; both must agree
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(doc.object(obj).find(&format!("key{i}")), Some(*id));
    }
    assert_eq!(doc.object(obj).find("missing"), None);
    assert!(doc.object(obj).contains("key0"));
    assert!(!doc.object(obj).contains("key20"));

    // insertion order survives indexing
    let names: Vec<_> = doc
        .object(obj)
        .entries
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(names.first(), Some(&"key0"));
    assert_eq!(names.last(), Some(&"key19"));
}

#[test]
fn flags_default_off() {
    let mut doc = DocumentBuilder::new();
    let obj = doc.new_object();
    assert!(!doc.object(obj).closed);
    assert!(!doc.object(obj).defined);
    let arr = doc.new_array();
    assert!(!doc.array(arr).closed);
}

#[test]
fn array_of_tables_appends() {
    let mut doc = DocumentBuilder::new();
    let root = doc.new_object();
    let arr = doc.put_array(root, "items".into());
    let first = doc.push_object(arr);
    let second = doc.push_object(arr);
    assert_eq!(doc.array(arr).items, vec![first, second]);
}

#[test]
fn finalize_builds_nested_tree() {
    let mut doc = DocumentBuilder::new();
    let root = doc.new_object();

    let server = doc.put_object(root, "server".into());
    let port = doc.new_scalar(Value::Number(Number::Int32(80)));
    doc.object_mut(server).insert("port".into(), port);

    let tags = doc.put_array(root, "tags".into());
    let tag = doc.new_scalar(Value::String("web".into()));
    doc.array_mut(tags).items.push(tag);

    let v = doc.finalize(root);
    assert_eq!(
        v.get("server").unwrap().get("port").and_then(Value::as_i64),
        Some(80)
    );
    let tags = v.get("tags").unwrap().as_array().unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].as_str(), Some("web"));
}
