//! Dynamic source values bound to placeholders at render time.
//!
//! A [`Value`] is the single input type of every render call. It has exactly
//! the cases a placeholder can be offered: the five scalar kinds, an ordered
//! array, and a deferred supplier that is only invoked when the value is
//! actually bound.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use indexmap::IndexMap as IndexMapRaw;

#[cfg(feature = "serde_json")]
mod json;

/// `IndexMap` alias using hashbrown's default hasher for `no_std` compatibility.
type IndexMap<K, V> = IndexMapRaw<K, V, hashbrown::DefaultHashBuilder>;

/// An ordered array value, keyed by position or by name.
pub type Array = IndexMap<Key, Value>;

/// A key of an [`Array`] entry.
///
/// Names that spell a canonical non-negative decimal (`"0"`, `"17"`, but not
/// `"01"`) are normalised to [`Key::Index`] when converted from strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Positional key.
    Index(i64),
    /// Named key.
    Name(String),
}

impl Key {
    /// Returns the key as text, as it would be offered to an identifier check.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Key::Index(i) => i.to_string(),
            Key::Name(name) => name.clone(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{i}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

impl From<i64> for Key {
    fn from(v: i64) -> Self {
        Key::Index(v)
    }
}

impl From<i32> for Key {
    fn from(v: i32) -> Self {
        Key::Index(i64::from(v))
    }
}

impl From<usize> for Key {
    fn from(v: usize) -> Self {
        i64::try_from(v).map_or_else(|_| Key::Name(v.to_string()), Key::Index)
    }
}

impl From<&str> for Key {
    fn from(v: &str) -> Self {
        match canonical_decimal(v) {
            Some(i) => Key::Index(i),
            None => Key::Name(v.to_string()),
        }
    }
}

impl From<String> for Key {
    fn from(v: String) -> Self {
        match canonical_decimal(&v) {
            Some(i) => Key::Index(i),
            None => Key::Name(v),
        }
    }
}

/// Parses `text` as a non-negative decimal without leading zeros or sign.
pub(crate) fn canonical_decimal(text: &str) -> Option<i64> {
    let bytes = text.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return None;
    }
    text.parse().ok()
}

/// A deferred value supplier.
pub type Supplier = Rc<dyn Fn() -> Value>;

/// A dynamically-typed value offered to a placeholder.
#[derive(Clone, Default)]
pub enum Value {
    /// SQL NULL / absent data.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// IEEE 754 floating point.
    Double(f64),
    /// UTF-8 text.
    Text(String),
    /// Ordered array of keyed values.
    Array(Array),
    /// Supplier invoked with no arguments when the value is bound.
    Deferred(Supplier),
}

impl Value {
    /// Wraps a closure as a deferred value.
    pub fn deferred<F>(supplier: F) -> Self
    where
        F: Fn() -> Value + 'static,
    {
        Value::Deferred(Rc::new(supplier))
    }

    /// Builds a positional array from the given values.
    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Array(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (Key::from(i), v.into()))
                .collect(),
        )
    }

    /// Builds a keyed array from the given pairs, preserving their order.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        Value::Array(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Invokes deferred suppliers until a concrete value is reached.
    #[must_use]
    pub fn resolve(self) -> Value {
        let mut value = self;
        while let Value::Deferred(supplier) = value {
            value = supplier();
        }
        value
    }

    /// Returns the source kind of this value.
    ///
    /// A deferred value has no kind of its own: its supplier is invoked on
    /// every call and the kind of the supplied value is returned. Call
    /// [`Value::resolve`] first to run the supplier only once.
    #[must_use]
    pub fn kind(&self) -> SourceKind {
        match self {
            Value::Null => SourceKind::Null,
            Value::Bool(_) => SourceKind::Boolean,
            Value::Integer(_) => SourceKind::Integer,
            Value::Double(_) => SourceKind::Double,
            Value::Text(_) => SourceKind::String,
            Value::Array(_) => SourceKind::Array,
            Value::Deferred(supplier) => supplier().kind(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Value::Integer(v) => f.debug_tuple("Integer").field(v).finish(),
            Value::Double(v) => f.debug_tuple("Double").field(v).finish(),
            Value::Text(v) => f.debug_tuple("Text").field(v).finish(),
            Value::Array(v) => f.debug_tuple("Array").field(v).finish(),
            Value::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// The kind of a concrete source value, used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// A NULL value.
    Null,
    /// A boolean value.
    Boolean,
    /// An integer value.
    Integer,
    /// A floating point value.
    Double,
    /// A text value.
    String,
    /// An array value.
    Array,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceKind::Null => "null",
            SourceKind::Boolean => "boolean",
            SourceKind::Integer => "integer",
            SourceKind::Double => "double",
            SourceKind::String => "string",
            SourceKind::Array => "array",
        })
    }
}

// From implementations for common types
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Double(f64::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Value::Array(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::list(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl From<Box<dyn Fn() -> Value>> for Value {
    fn from(supplier: Box<dyn Fn() -> Value>) -> Self {
        Value::Deferred(Rc::from(supplier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn test_numeric_names_become_positions() {
        assert_eq!(Key::from("0"), Key::Index(0));
        assert_eq!(Key::from("42"), Key::Index(42));
        assert_eq!(Key::from("042"), Key::Name("042".into()));
        assert_eq!(Key::from("-1"), Key::Name("-1".into()));
        assert_eq!(Key::from("id"), Key::Name("id".into()));
    }

    #[test]
    fn test_list_keys_are_positional() {
        let Value::Array(array) = Value::list(["a", "b"]) else {
            panic!("expected array");
        };
        let keys: Vec<Key> = array.keys().cloned().collect();
        assert_eq!(keys, [Key::Index(0), Key::Index(1)]);
    }

    #[test]
    fn test_map_preserves_order() {
        let Value::Array(array) = Value::map([("b", 2), ("a", 1)]) else {
            panic!("expected array");
        };
        let keys: Vec<String> = array.keys().map(Key::as_text).collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn test_resolve_invokes_nested_suppliers() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let value = Value::deferred(move || {
            counter.set(counter.get() + 1);
            Value::deferred(|| Value::Integer(7))
        });
        assert_eq!(calls.get(), 0);
        assert!(matches!(value.resolve(), Value::Integer(7)));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_kind_of_deferred_runs_supplier_each_call() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let value = Value::deferred(move || {
            counter.set(counter.get() + 1);
            Value::from("x")
        });
        assert_eq!(value.kind(), SourceKind::String);
        assert_eq!(calls.get(), 1);

        let resolved = value.resolve();
        assert_eq!(calls.get(), 2);
        assert_eq!(resolved.kind(), SourceKind::String);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_option_maps_to_null() {
        assert!(matches!(Value::from(None::<i64>), Value::Null));
        assert!(matches!(Value::from(Some("x")), Value::Text(ref s) if s == "x"));
    }
}
