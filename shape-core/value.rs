use std::fmt::Write as _;

use indexmap::IndexMap;

/// A decoded, JSON-like value: the "actual" side of a comparison.
///
/// Map equality ignores insertion order, but the order is kept so values print
/// the way they were decoded.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

/// The runtime type of a [`Value`], as matched by a type token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Float,
    String,
    List,
    Map,
}

impl Kind {
    /// Name of the kind in pattern notation.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::String => "str",
            Kind::List => "list",
            Kind::Map => "dict",
        }
    }

    /// Look up a type token by name. `null` is not a type token, because the
    /// literal `null` already matches exactly the values of that kind.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "bool" => Kind::Bool,
            "int" => Kind::Int,
            "float" => Kind::Float,
            "str" => Kind::String,
            "list" => Kind::List,
            "dict" => Kind::Map,
            _ => return None,
        })
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::String(_) => Kind::String,
            Value::List(_) => Kind::List,
            Value::Map(_) => Kind::Map,
        }
    }

    /// Look up a key, if this is a map.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Look up an item by index, if this is a list.
    #[must_use]
    pub fn index(&self, index: usize) -> Option<&Value> {
        match self {
            Value::List(items) => items.get(index),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    #[inline]
    fn from(i: i32) -> Self {
        Value::Int(i.into())
    }
}

impl From<u32> for Value {
    #[inline]
    fn from(i: u32) -> Self {
        Value::Int(i.into())
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    #[inline]
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<IndexMap<String, Value>> for Value {
    #[inline]
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write_float(f, *x),
            Value::String(s) => write_quoted(f, s),
            Value::List(items) => DisplaySeq(items).fmt(f),
            Value::Map(map) => DisplayMap(map).fmt(f),
        }
    }
}

/// Writes a float so that it reads back as a float (`1.0`, not `1`).
pub(crate) fn write_float(f: &mut std::fmt::Formatter<'_>, x: f64) -> std::fmt::Result {
    write!(f, "{x:?}")
}

/// Writes a string with JSON escaping.
pub(crate) fn write_quoted(f: &mut std::fmt::Formatter<'_>, s: &str) -> std::fmt::Result {
    f.write_char('"')?;
    for ch in s.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{08}' => f.write_str("\\b")?,
            '\u{0C}' => f.write_str("\\f")?,
            c if c.is_control() => write!(f, "\\u{:04x}", u32::from(c))?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

/// `[a, b, c]`
pub(crate) struct DisplaySeq<'a, T>(pub &'a [T]);

impl<T: std::fmt::Display> std::fmt::Display for DisplaySeq<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char('[')?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            item.fmt(f)?;
        }
        f.write_char(']')
    }
}

/// `{"a": 1, "b": 2}`
pub(crate) struct DisplayMap<'a, T>(pub &'a IndexMap<String, T>);

impl<T: std::fmt::Display> std::fmt::Display for DisplayMap<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char('{')?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write_quoted(f, key)?;
            write!(f, ": {value}")?;
        }
        f.write_char('}')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(Value::Null.kind(), Kind::Null);
        assert_eq!(Value::from(true).kind(), Kind::Bool);
        assert_eq!(Value::from(1).kind(), Kind::Int);
        assert_eq!(Value::from(1.0).kind(), Kind::Float);
        assert_eq!(Value::from("x").kind(), Kind::String);
        assert_eq!(Value::List(vec![]).kind(), Kind::List);
        assert_eq!(Value::Map(IndexMap::new()).kind(), Kind::Map);
    }

    #[test]
    fn kind_names() {
        for kind in [Kind::Bool, Kind::Int, Kind::Float, Kind::String, Kind::List, Kind::Map] {
            assert_eq!(Kind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(Kind::from_name("null"), None);
        assert_eq!(Kind::from_name("object"), None);
    }

    #[test]
    fn map_equality_ignores_order() {
        let a: Value = [("a", Value::from(1)), ("b", Value::from("2"))]
            .into_iter()
            .collect();
        let b: Value = [("b", Value::from("2")), ("a", Value::from(1))]
            .into_iter()
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn display() {
        let value: Value = [
            ("id", Value::from(7)),
            ("ratio", Value::from(1.0)),
            ("name", Value::from("A \"quoted\"\nname")),
            (
                "tags",
                Value::List(vec![Value::Null, Value::from(false)]),
            ),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            value.to_string(),
            r#"{"id": 7, "ratio": 1.0, "name": "A \"quoted\"\nname", "tags": [null, false]}"#
        );
    }
}
