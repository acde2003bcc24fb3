use polypage_types::{FromValue, Value};
use proptest::prelude::*;
use std::collections::HashMap;

#[test]
fn conversions_pick_storage_class() {
    assert_eq!(Value::from(7_i32), Value::Integer(7));
    assert_eq!(Value::from(true), Value::Integer(1));
    assert_eq!(Value::from("abc"), Value::Text("abc".into()));
    assert_eq!(Value::from(2.5), Value::Real(2.5));
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
}

#[test]
fn as_f64_widens_integers() {
    assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
    assert_eq!(Value::Text("3".into()).as_f64(), None);
}

#[test]
fn from_value_reports_mismatch() {
    let err = i64::from_value(&Value::Text("nope".into())).unwrap_err();
    assert!(err.to_string().contains("expected integer, found text"));
}

#[test]
fn option_decodes_null_as_none() {
    assert_eq!(Option::<String>::from_value(&Value::Null).unwrap(), None);
    assert_eq!(
        Option::<String>::from_value(&Value::Text("a".into())).unwrap(),
        Some("a".to_string())
    );
}

#[test]
fn serializes_untagged() {
    let json = serde_json::to_string(&vec![
        Value::Null,
        Value::Integer(1),
        Value::Text("t".into()),
    ])
    .unwrap();
    assert_eq!(json, r#"[null,1,"t"]"#);

    let back: Vec<Value> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, vec![Value::Null, Value::Integer(1), Value::Text("t".into())]);
}

#[test]
fn non_finite_real_becomes_json_null() {
    assert_eq!(Value::Real(f64::NAN).to_json(), serde_json::Value::Null);
}

#[test]
fn display_is_plain() {
    assert_eq!(Value::Integer(42).to_string(), "42");
    assert_eq!(Value::Text("u".into()).to_string(), "u");
    assert_eq!(Value::Null.to_string(), "NULL");
    assert_eq!(Value::Blob(vec![1, 2, 3]).to_string(), "<3 bytes>");
}

proptest! {
    /// Values usable as map keys: equal values land on the same entry.
    #[test]
    fn equal_keys_share_map_entry(ids in prop::collection::vec(0i64..20, 1..60)) {
        let mut map: HashMap<Value, usize> = HashMap::new();
        for id in &ids {
            *map.entry(Value::Integer(*id)).or_default() += 1;
        }
        let mut distinct = ids.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(map.len(), distinct.len());
        prop_assert_eq!(map.values().sum::<usize>(), ids.len());
    }
}
