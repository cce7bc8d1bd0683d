//! Style Values
//!
//! The tagged value union used for property bags and declaration maps.

use std::any::Any;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque reference to a host object (a callback or an already-resolved resource).
///
/// Two references are equal only when they point at the same allocation.
#[derive(Clone)]
pub struct OpaqueRef(Rc<dyn Any>);

impl OpaqueRef {
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value))
    }

    /// Borrow the wrapped value if it has type `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl PartialEq for OpaqueRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for OpaqueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpaqueRef({:p})", Rc::as_ptr(&self.0))
    }
}

/// A single style or prop value
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    /// Textual value (e.g., "10px", "red", "card primary")
    String(String),
    /// Numeric value (unitless, treated as px where a length is expected)
    Number(f32),
    /// Boolean value
    Bool(bool),
    /// Nested record (e.g., the inline `style` prop)
    Record(StyleRecord),
    /// Opaque host reference (functions, resolved resources)
    Opaque(OpaqueRef),
}

impl StyleValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f32> {
        match self {
            StyleValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&StyleRecord> {
        match self {
            StyleValue::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&OpaqueRef> {
        match self {
            StyleValue::Opaque(o) => Some(o),
            _ => None,
        }
    }

    /// Render a scalar value the way it would appear in markup.
    ///
    /// Records and opaque references have no textual form.
    pub fn to_css_string(&self) -> Option<String> {
        match self {
            StyleValue::String(s) => Some(s.clone()),
            StyleValue::Number(n) => Some(format_number(*n)),
            StyleValue::Bool(b) => Some(b.to_string()),
            StyleValue::Record(_) | StyleValue::Opaque(_) => None,
        }
    }
}

/// Format a number without a trailing `.0` for whole values
pub fn format_number(n: f32) -> String {
    if n.fract() == 0.0 && n.abs() < 1e9 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        StyleValue::String(s.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(s: String) -> Self {
        StyleValue::String(s)
    }
}

impl From<f32> for StyleValue {
    fn from(n: f32) -> Self {
        StyleValue::Number(n)
    }
}

impl From<bool> for StyleValue {
    fn from(b: bool) -> Self {
        StyleValue::Bool(b)
    }
}

impl From<StyleRecord> for StyleValue {
    fn from(r: StyleRecord) -> Self {
        StyleValue::Record(r)
    }
}

impl From<OpaqueRef> for StyleValue {
    fn from(o: OpaqueRef) -> Self {
        StyleValue::Opaque(o)
    }
}

/// String-keyed property bag.
///
/// Key order carries no meaning; iteration is sorted so that anything derived
/// from a record (such as attribute selectors) is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleRecord {
    entries: BTreeMap<String, StyleValue>,
}

impl StyleRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.entries.get(key)
    }

    /// Get a string value
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(StyleValue::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Option<StyleValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<StyleValue> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, StyleValue> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Shallow right-biased merge: keys in `other` replace keys in `self`
    pub fn merge(&mut self, other: &StyleRecord) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }
}

impl FromIterator<(String, StyleValue)> for StyleRecord {
    fn from_iter<I: IntoIterator<Item = (String, StyleValue)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

impl IntoIterator for StyleRecord {
    type Item = (String, StyleValue);
    type IntoIter = btree_map::IntoIter<String, StyleValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a StyleRecord {
    type Item = (&'a String, &'a StyleValue);
    type IntoIter = btree_map::Iter<'a, String, StyleValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// Serde: records map to JSON-like objects. Opaque references cannot cross a
// serialization boundary and are written as null / never produced.

impl Serialize for StyleValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StyleValue::String(s) => serializer.serialize_str(s),
            StyleValue::Number(n) => serializer.serialize_f32(*n),
            StyleValue::Bool(b) => serializer.serialize_bool(*b),
            StyleValue::Record(r) => r.serialize(serializer),
            StyleValue::Opaque(_) => serializer.serialize_unit(),
        }
    }
}

impl Serialize for StyleRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct StyleValueVisitor;

impl<'de> Visitor<'de> for StyleValueVisitor {
    type Value = StyleValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean or object")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<StyleValue, E> {
        Ok(StyleValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<StyleValue, E> {
        Ok(StyleValue::Number(v as f32))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<StyleValue, E> {
        Ok(StyleValue::Number(v as f32))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<StyleValue, E> {
        Ok(StyleValue::Number(v as f32))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<StyleValue, E> {
        Ok(StyleValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<StyleValue, E> {
        Ok(StyleValue::String(v))
    }

    fn visit_map<A: MapAccess<'de>>(self, access: A) -> Result<StyleValue, A::Error> {
        StyleRecordVisitor.visit_map(access).map(StyleValue::Record)
    }
}

impl<'de> Deserialize<'de> for StyleValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StyleValueVisitor)
    }
}

struct StyleRecordVisitor;

impl<'de> Visitor<'de> for StyleRecordVisitor {
    type Value = StyleRecord;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a style object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<StyleRecord, A::Error> {
        let mut entries = BTreeMap::new();
        while let Some((key, value)) = access.next_entry::<String, StyleValue>()? {
            entries.insert(key, value);
        }
        Ok(StyleRecord { entries })
    }
}

impl<'de> Deserialize<'de> for StyleRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(StyleRecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_is_right_biased() {
        let mut base = StyleRecord::new().with("color", "red").with("margin", 4.0);
        let over = StyleRecord::new().with("color", "blue");
        base.merge(&over);
        assert_eq!(base.get_str("color"), Some("blue"));
        assert_eq!(base.get("margin"), Some(&StyleValue::Number(4.0)));
    }

    #[test]
    fn test_to_css_string() {
        assert_eq!(StyleValue::Number(3.0).to_css_string(), Some("3".to_string()));
        assert_eq!(StyleValue::Number(1.5).to_css_string(), Some("1.5".to_string()));
        assert_eq!(StyleValue::Bool(true).to_css_string(), Some("true".to_string()));
        assert_eq!(StyleValue::Record(StyleRecord::new()).to_css_string(), None);
        assert_eq!(StyleValue::Opaque(OpaqueRef::new(1u8)).to_css_string(), None);
    }

    #[test]
    fn test_opaque_identity() {
        let a = OpaqueRef::new("texture");
        let b = a.clone();
        let c = OpaqueRef::new("texture");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.downcast_ref::<&str>(), Some(&"texture"));
    }

    #[test]
    fn test_deserialize_from_json() {
        let record: StyleRecord = serde_json::from_str(
            r#"{"className": "card", "tabIndex": 2, "disabled": false, "style": {"color": "red"}}"#,
        )
        .unwrap();
        assert_eq!(record.get_str("className"), Some("card"));
        assert_eq!(record.get("tabIndex"), Some(&StyleValue::Number(2.0)));
        assert_eq!(record.get("disabled"), Some(&StyleValue::Bool(false)));
        let style = record.get("style").and_then(StyleValue::as_record).unwrap();
        assert_eq!(style.get_str("color"), Some("red"));
    }

    #[test]
    fn test_serialize_round_trip_shape() {
        let record = StyleRecord::new().with("width", 10.0).with("display", "flex");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"display":"flex","width":10.0}"#);
    }
}
