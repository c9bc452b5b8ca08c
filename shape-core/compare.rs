//! Structural comparison of a [`Value`] against a [`Pattern`].
//!
//! The comparison recurses through lists and maps, short-circuits when the
//! kinds differ, and stops at the first mismatch. The path of that mismatch is
//! carried in the error, together with the pattern and data nodes found there.

mod list;
mod map;

use crate::{Error, Mismatch, MismatchReason, Path, PathSegment, Pattern, PatternError, Value};

/// Compare `actual` against `pattern`.
///
/// Returns `Err(Error::Mismatch(..))` when the data disagrees with the pattern,
/// and `Err(Error::Pattern(..))` when the pattern is malformed.
///
/// Lists are aligned greedily: after a `...` gap, the first item matching the
/// next pattern item is taken, and that choice is never revisited. This means
/// `[1, 2, 1]` does not match `[..., 1]`: the gap stops at the first `1`,
/// leaving `[2, 1]` unaccounted for.
pub fn compare(actual: &Value, pattern: &Pattern) -> Result<(), Error> {
    let result = Matcher::default().compare(actual, pattern);
    if let Err(ref err) = result {
        tracing::debug!("comparison failed at {}: {err}", err.path());
    }
    result
}

/// Like [`compare`], but mismatches are reported as `Ok(false)`. Only
/// malformed patterns are errors.
pub fn matches(actual: &Value, pattern: &Pattern) -> Result<bool, PatternError> {
    match compare(actual, pattern) {
        Ok(()) => Ok(true),
        Err(Error::Mismatch(_)) => Ok(false),
        Err(Error::Pattern(err)) => Err(err),
    }
}

/// Per-comparison state: the path from the root to the node being compared.
#[derive(Default)]
pub(crate) struct Matcher {
    path: Vec<PathSegment>,
}

impl Matcher {
    #[allow(clippy::float_cmp)]
    pub(crate) fn compare(&mut self, actual: &Value, pattern: &Pattern) -> Result<(), Error> {
        tracing::trace!("compare {} at {}", pattern, self.path());

        match (actual, pattern) {
            (_, Pattern::Type(kind)) if actual.kind() == *kind => Ok(()),
            (Value::List(items), Pattern::List(pattern_items)) => {
                self.compare_list(items, pattern_items)
            }
            (Value::Map(map), Pattern::Map(map_pattern)) => self.compare_map(map, map_pattern),
            (Value::Null, Pattern::Null) => Ok(()),
            (Value::Bool(a), Pattern::Bool(b)) if a == b => Ok(()),
            (Value::Int(a), Pattern::Int(b)) if a == b => Ok(()),
            (Value::Float(a), Pattern::Float(b)) if a == b => Ok(()),
            (Value::String(a), Pattern::String(b)) if a == b => Ok(()),
            _ if !matches!(pattern, Pattern::Type(_)) && actual.kind() == pattern.kind() => {
                Err(self.mismatch(MismatchReason::Value, pattern, actual))
            }
            _ => Err(self.mismatch(MismatchReason::Kind, pattern, actual)),
        }
    }

    /// Run `f` with `segment` appended to the current path.
    fn with_segment<T>(&mut self, segment: PathSegment, f: impl FnOnce(&mut Self) -> T) -> T {
        self.path.push(segment);
        let result = f(self);
        self.path.pop();
        result
    }

    fn path(&self) -> Path {
        Path::from(self.path.clone())
    }

    fn mismatch(
        &self,
        reason: MismatchReason,
        expected: &dyn std::fmt::Display,
        actual: &dyn std::fmt::Display,
    ) -> Error {
        Mismatch {
            path: self.path(),
            reason,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Kind, ListItem, MapPattern};

    fn map(entries: &[(&str, Value)]) -> Value {
        entries.iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    #[test]
    fn scalars() {
        assert_eq!(compare(&Value::from(1), &Pattern::from(1)), Ok(()));
        assert_eq!(compare(&Value::Null, &Pattern::Null), Ok(()));
        assert_eq!(compare(&Value::from("a"), &Pattern::from("a")), Ok(()));
        assert_eq!(compare(&Value::from(0.5), &Pattern::from(0.5)), Ok(()));

        let err = compare(&Value::from(1), &Pattern::from(2)).unwrap_err();
        let mismatch = err.as_mismatch().unwrap();
        assert_eq!(mismatch.reason, MismatchReason::Value);
        assert_eq!(mismatch.expected, "2");
        assert_eq!(mismatch.actual, "1");
        assert!(mismatch.path.is_root());
    }

    #[test]
    fn scalar_kinds_are_strict() {
        let err = compare(&Value::from(1), &Pattern::from(1.0)).unwrap_err();
        assert_eq!(err.as_mismatch().unwrap().reason, MismatchReason::Kind);
        let err = compare(&Value::from(true), &Pattern::from(1)).unwrap_err();
        assert_eq!(err.as_mismatch().unwrap().reason, MismatchReason::Kind);
        let err = compare(&Value::from("1"), &Pattern::from(1)).unwrap_err();
        assert_eq!(err.as_mismatch().unwrap().reason, MismatchReason::Kind);
    }

    #[test]
    fn type_tokens() {
        assert_eq!(compare(&Value::from(1), &Pattern::Type(Kind::Int)), Ok(()));
        assert_eq!(
            compare(&Value::List(vec![Value::from(1)]), &Pattern::Type(Kind::List)),
            Ok(())
        );
        assert_eq!(compare(&map(&[]), &Pattern::Type(Kind::Map)), Ok(()));

        let err = compare(&Value::from(1.5), &Pattern::Type(Kind::Int)).unwrap_err();
        let mismatch = err.as_mismatch().unwrap();
        assert_eq!(mismatch.reason, MismatchReason::Kind);
        assert_eq!(mismatch.expected, "int");
        assert_eq!(mismatch.actual, "1.5");
    }

    #[test]
    fn list_vs_map_short_circuits() {
        let err = compare(
            &map(&[("a", Value::from(1))]),
            &Pattern::list([ListItem::Gap]),
        )
        .unwrap_err();
        assert_eq!(err.as_mismatch().unwrap().reason, MismatchReason::Kind);

        // The malformed list pattern is never looked at.
        let err = compare(
            &map(&[]),
            &Pattern::list([ListItem::Gap, ListItem::Gap]),
        )
        .unwrap_err();
        assert!(err.is_mismatch());

        let err = compare(&Value::List(vec![]), &Pattern::from(MapPattern::open())).unwrap_err();
        assert_eq!(err.as_mismatch().unwrap().reason, MismatchReason::Kind);
    }

    #[test]
    fn matches_splits_categories() {
        let data = Value::List(vec![Value::from(1)]);
        assert_eq!(matches(&data, &Pattern::list([1])), Ok(true));
        assert_eq!(matches(&data, &Pattern::list([2])), Ok(false));
        assert!(matches(&data, &Pattern::list([ListItem::Gap, ListItem::Gap])).is_err());
    }

    #[test]
    fn deepest_path_is_reported() {
        let data = map(&[
            ("a", Value::from(1)),
            (
                "b",
                Value::List(vec![
                    Value::from(0),
                    map(&[("c", Value::from("x"))]),
                ]),
            ),
        ]);
        let pattern = Pattern::from(
            MapPattern::new().entry("a", 1).entry(
                "b",
                Pattern::list([
                    ListItem::from(0),
                    ListItem::from(MapPattern::new().entry("c", "y")),
                ]),
            ),
        );
        let err = compare(&data, &pattern).unwrap_err();
        assert_eq!(err.path().to_string(), "$.b[1].c");
        let mismatch = err.as_mismatch().unwrap();
        assert_eq!(mismatch.expected, r#""y""#);
        assert_eq!(mismatch.actual, r#""x""#);
    }

    #[test]
    fn idempotent() {
        let data = Value::List(vec![Value::from(1), Value::from(2)]);
        let pattern = Pattern::list([ListItem::from(1)]);
        assert_eq!(compare(&data, &pattern), compare(&data, &pattern));
    }
}
