#![cfg_attr(docsrs, doc(cfg(feature = "serde")))]

//! Serde serialization support for the value tree.
//!
//! Enabled by the `serde` feature flag. Serialization only — this crate
//! produces trees, it does not consume them. Arbitrary-precision integers
//! serialize as their decimal string form so the output stays representable
//! in any serde data format.

use crate::{Number, Object, Value};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(object) => object.serialize(serializer),
        }
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Number::Int32(v) => serializer.serialize_i32(*v),
            Number::Int64(v) => serializer.serialize_i64(*v),
            Number::BigInt(v) => serializer.collect_str(v),
            Number::Float(v) => serializer.serialize_f64(*v),
        }
    }
}

impl Serialize for Object {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
