use std::fmt::Write as _;

use indexmap::IndexMap;

use crate::{
    Error, Kind, Value,
    value::{DisplayMap, DisplaySeq, write_float, write_quoted},
};

/// An expected value, possibly containing wildcards.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Matches any value of the given kind.
    Type(Kind),
    List(Vec<ListItem>),
    Map(MapPattern),
}

/// An element of a list pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum ListItem {
    Item(Pattern),
    /// `...`: skip zero or more items.
    Gap,
}

/// The value side of a map pattern entry.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEntry {
    Value(Pattern),
    /// `key: ...`: the key must exist, with any value.
    Exists,
}

/// A map pattern.
///
/// The `...` key (the "rest" entry) puts the map in subset mode, allowing
/// unlisted keys in the data. The only valid rest entry is `...: ...`; any
/// other value is reported as a [`PatternError`](crate::PatternError) when the
/// map is matched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapPattern {
    entries: IndexMap<String, MapEntry>,
    rest: Option<Box<MapEntry>>,
}

impl Pattern {
    /// The kind of value this pattern can match.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Pattern::Null => Kind::Null,
            Pattern::Bool(_) => Kind::Bool,
            Pattern::Int(_) => Kind::Int,
            Pattern::Float(_) => Kind::Float,
            Pattern::String(_) => Kind::String,
            Pattern::Type(kind) => *kind,
            Pattern::List(_) => Kind::List,
            Pattern::Map(_) => Kind::Map,
        }
    }

    #[must_use]
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ListItem>,
    {
        Pattern::List(items.into_iter().map(Into::into).collect())
    }

    /// Convert back into a plain value. Returns `None` if the pattern contains
    /// wildcards.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        Some(match self {
            Pattern::Null => Value::Null,
            Pattern::Bool(b) => Value::Bool(b),
            Pattern::Int(i) => Value::Int(i),
            Pattern::Float(x) => Value::Float(x),
            Pattern::String(s) => Value::String(s),
            Pattern::Type(_) => return None,
            Pattern::List(items) => Value::List(
                items
                    .into_iter()
                    .map(|item| match item {
                        ListItem::Item(pattern) => pattern.into_value(),
                        ListItem::Gap => None,
                    })
                    .collect::<Option<_>>()?,
            ),
            Pattern::Map(map) => {
                if map.rest.is_some() {
                    return None;
                }
                Value::Map(
                    map.entries
                        .into_iter()
                        .map(|(key, entry)| match entry {
                            MapEntry::Value(pattern) => pattern.into_value().map(|v| (key, v)),
                            MapEntry::Exists => None,
                        })
                        .collect::<Option<_>>()?,
                )
            }
        })
    }

    /// Check `actual` against this pattern. See [`compare`](crate::compare).
    #[inline]
    pub fn check(&self, actual: &Value) -> Result<(), Error> {
        crate::compare(actual, self)
    }
}

impl MapPattern {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A map pattern in subset mode (`{...: ...}`).
    #[inline]
    #[must_use]
    pub fn open() -> Self {
        Self {
            entries: IndexMap::new(),
            rest: Some(Box::new(MapEntry::Exists)),
        }
    }

    #[must_use]
    pub fn entry(mut self, key: impl Into<String>, entry: impl Into<MapEntry>) -> Self {
        self.insert(key.into(), entry.into());
        self
    }

    /// Require that `key` exists, with any value.
    #[must_use]
    pub fn exists(self, key: impl Into<String>) -> Self {
        self.entry(key, MapEntry::Exists)
    }

    /// Set the rest entry (the value paired with the `...` key).
    #[must_use]
    pub fn with_rest(mut self, entry: impl Into<MapEntry>) -> Self {
        self.set_rest(entry.into());
        self
    }

    /// Returns the previous entry for the key, if any.
    pub fn insert(&mut self, key: String, entry: MapEntry) -> Option<MapEntry> {
        self.entries.insert(key, entry)
    }

    /// Returns the previous rest entry, if any.
    pub fn set_rest(&mut self, entry: MapEntry) -> Option<MapEntry> {
        self.rest.replace(Box::new(entry)).map(|prev| *prev)
    }

    #[inline]
    #[must_use]
    pub fn rest(&self) -> Option<&MapEntry> {
        self.rest.as_deref()
    }

    /// True if the map is in subset mode.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.rest.as_deref(), Some(MapEntry::Exists))
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MapEntry> {
        self.entries.get(key)
    }

    #[inline]
    #[must_use]
    pub fn entries(&self) -> impl ExactSizeIterator<Item = (&str, &MapEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of keyed entries, not counting the rest entry.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.rest.is_none()
    }
}

impl From<Value> for Pattern {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Pattern::Null,
            Value::Bool(b) => Pattern::Bool(b),
            Value::Int(i) => Pattern::Int(i),
            Value::Float(x) => Pattern::Float(x),
            Value::String(s) => Pattern::String(s),
            Value::List(items) => Pattern::list(items.into_iter().map(Pattern::from)),
            Value::Map(map) => Pattern::Map(MapPattern {
                entries: map
                    .into_iter()
                    .map(|(k, v)| (k, MapEntry::Value(v.into())))
                    .collect(),
                rest: None,
            }),
        }
    }
}

impl From<Kind> for Pattern {
    #[inline]
    fn from(kind: Kind) -> Self {
        Pattern::Type(kind)
    }
}

impl From<MapPattern> for Pattern {
    #[inline]
    fn from(map: MapPattern) -> Self {
        Pattern::Map(map)
    }
}

impl From<Vec<ListItem>> for Pattern {
    #[inline]
    fn from(items: Vec<ListItem>) -> Self {
        Pattern::List(items)
    }
}

macro_rules! impl_from_scalar {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Pattern {
                #[inline]
                fn from(v: $t) -> Self {
                    Pattern::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_scalar!(
    bool => Bool,
    i64 => Int,
    i32 => Int,
    u32 => Int,
    f64 => Float,
    &str => String,
    String => String,
);

macro_rules! impl_into_item {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for ListItem {
                #[inline]
                fn from(v: $t) -> Self {
                    ListItem::Item(Pattern::from(v))
                }
            }

            impl From<$t> for MapEntry {
                #[inline]
                fn from(v: $t) -> Self {
                    MapEntry::Value(Pattern::from(v))
                }
            }
        )*
    };
}

impl_into_item!(
    Pattern,
    Value,
    Kind,
    MapPattern,
    Vec<ListItem>,
    bool,
    i64,
    i32,
    u32,
    f64,
    &str,
    String,
);

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pattern::Null => f.write_str("null"),
            Pattern::Bool(b) => write!(f, "{b}"),
            Pattern::Int(i) => write!(f, "{i}"),
            Pattern::Float(x) => write_float(f, *x),
            Pattern::String(s) => write_quoted(f, s),
            Pattern::Type(kind) => write!(f, "{kind}"),
            Pattern::List(items) => DisplaySeq(items).fmt(f),
            Pattern::Map(map) => map.fmt(f),
        }
    }
}

impl std::fmt::Display for ListItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListItem::Item(pattern) => pattern.fmt(f),
            ListItem::Gap => f.write_str("..."),
        }
    }
}

impl std::fmt::Display for MapEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapEntry::Value(pattern) => pattern.fmt(f),
            MapEntry::Exists => f.write_str("..."),
        }
    }
}

impl std::fmt::Display for MapPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(rest) = self.rest.as_deref() else {
            return DisplayMap(&self.entries).fmt(f);
        };

        f.write_char('{')?;
        for (key, entry) in &self.entries {
            write_quoted(f, key)?;
            write!(f, ": {entry}, ")?;
        }
        write!(f, "...: {rest}}}")
    }
}
