use indexmap::IndexMap;

use crate::{
    Error, MapEntry, MapPattern, MismatchReason, PathSegment, PatternError, Value,
    value::DisplayMap,
};

use super::Matcher;

impl Matcher {
    pub(super) fn compare_map(
        &mut self,
        actual: &IndexMap<String, Value>,
        pattern: &MapPattern,
    ) -> Result<(), Error> {
        let subset = match pattern.rest() {
            None => false,
            Some(MapEntry::Exists) => true,
            Some(MapEntry::Value(found)) => {
                return Err(PatternError::MisusedOpenMarker {
                    path: self.path(),
                    found: found.to_string(),
                }
                .into());
            }
        };

        // Sorted, so that the reported mismatch does not depend on how the
        // pattern was written.
        let mut entries = pattern.entries().collect::<Vec<_>>();
        entries.sort_unstable_by_key(|(key, _)| *key);

        for (key, entry) in entries {
            let Some(value) = actual.get(key) else {
                return Err(self.mismatch(
                    MismatchReason::MissingKey(key.to_owned()),
                    pattern,
                    &DisplayMap(actual),
                ));
            };

            if let MapEntry::Value(expected) = entry {
                self.with_segment(PathSegment::Key(key.to_owned()), |this| {
                    this.compare(value, expected)
                })?;
            }
        }

        // Every pattern key was found, so any difference in size is extra keys.
        if !subset && actual.len() != pattern.len() {
            let mut unexpected = actual
                .keys()
                .filter(|key| pattern.get(key).is_none())
                .cloned()
                .collect::<Vec<_>>();
            unexpected.sort_unstable();
            return Err(self.mismatch(
                MismatchReason::UnexpectedKeys(unexpected),
                pattern,
                &DisplayMap(actual),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, Kind, MapEntry, MapPattern, MismatchReason, Path, Pattern, PatternError, Value, compare};

    fn map(entries: &[(&str, Value)]) -> Value {
        entries.iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    fn nested() -> Value {
        map(&[
            ("a", Value::from(1)),
            (
                "b",
                map(&[
                    ("b", map(&[("a", Value::from("test"))])),
                    ("a", Value::from(2)),
                    ("c", Value::from("")),
                ]),
            ),
        ])
    }

    fn reason(actual: &Value, pattern: impl Into<Pattern>) -> MismatchReason {
        compare(actual, &pattern.into())
            .unwrap_err()
            .as_mismatch()
            .expect("expected a mismatch")
            .reason
            .clone()
    }

    #[test]
    fn exact() {
        let data = map(&[("a", Value::from(1)), ("b", Value::from("2"))]);
        let pattern = MapPattern::new().entry("b", "2").entry("a", 1);
        assert_eq!(compare(&data, &pattern.into()), Ok(()));

        assert_eq!(
            reason(&data, MapPattern::new().entry("b", 2).entry("a", 1)),
            MismatchReason::Kind
        );
    }

    #[test]
    fn deep() {
        let pattern = MapPattern::new().entry("a", 1).entry(
            "b",
            MapPattern::new()
                .entry("a", 2)
                .entry("b", MapPattern::new().entry("a", "test"))
                .entry("c", ""),
        );
        assert_eq!(compare(&nested(), &pattern.into()), Ok(()));

        let pattern = MapPattern::new().entry("a", 1).entry(
            "b",
            MapPattern::new()
                .entry("a", 2)
                .entry("b", MapPattern::new().entry("b", 1))
                .entry("c", ""),
        );
        let err = compare(&nested(), &pattern.into()).unwrap_err();
        assert_eq!(err.path(), &Path::root().key("b").key("b"));
        assert_eq!(
            err.as_mismatch().unwrap().reason,
            MismatchReason::MissingKey("b".into())
        );
    }

    #[test]
    fn exists_only() {
        let data = map(&[("a", Value::from(1)), ("b", Value::from("2"))]);
        assert_eq!(
            compare(&data, &MapPattern::new().entry("b", "2").exists("a").into()),
            Ok(())
        );
        assert_eq!(
            reason(&data, MapPattern::new().exists("a")),
            MismatchReason::UnexpectedKeys(vec!["b".into()])
        );
        assert_eq!(
            reason(
                &data,
                MapPattern::new().entry("b", "2").exists("a").entry("c", "test")
            ),
            MismatchReason::MissingKey("c".into())
        );

        let pattern = MapPattern::new()
            .entry("a", 1)
            .entry("b", MapPattern::new().entry("a", 2).exists("b").entry("c", ""));
        assert_eq!(compare(&nested(), &pattern.into()), Ok(()));

        let pattern = MapPattern::new()
            .entry("a", 1)
            .entry("b", MapPattern::new().entry("a", 2).exists("b"));
        let err = compare(&nested(), &pattern.into()).unwrap_err();
        assert_eq!(err.path(), &Path::root().key("b"));
        assert_eq!(
            err.as_mismatch().unwrap().reason,
            MismatchReason::UnexpectedKeys(vec!["c".into()])
        );
    }

    #[test]
    fn open_map() {
        assert_eq!(compare(&map(&[]), &MapPattern::open().into()), Ok(()));
        let data = map(&[
            ("a", Value::from(1)),
            ("b", Value::from("2")),
            ("c", Value::from(3)),
        ]);
        assert_eq!(compare(&data, &MapPattern::open().into()), Ok(()));
        assert_eq!(
            compare(&data, &MapPattern::open().entry("b", "2").into()),
            Ok(())
        );
        assert_eq!(
            reason(&data, MapPattern::open().entry("b", 2)),
            MismatchReason::Kind
        );
        assert_eq!(
            reason(&data, MapPattern::open().entry("b", "2").entry("d", "test")),
            MismatchReason::MissingKey("d".into())
        );

        let pattern = MapPattern::new()
            .entry("a", 1)
            .entry("b", MapPattern::open().entry("a", 2).entry("c", ""));
        assert_eq!(compare(&nested(), &pattern.into()), Ok(()));
    }

    #[test]
    fn empty_closed_map() {
        assert_eq!(compare(&map(&[]), &MapPattern::new().into()), Ok(()));
        assert_eq!(
            reason(&map(&[("a", Value::Null)]), MapPattern::new()),
            MismatchReason::UnexpectedKeys(vec!["a".into()])
        );
    }

    #[test]
    fn unexpected_keys_are_sorted() {
        let data = map(&[
            ("z", Value::from(1)),
            ("id", Value::from(1)),
            ("m", Value::from(1)),
        ]);
        assert_eq!(
            reason(&data, MapPattern::new().entry("id", Kind::Int)),
            MismatchReason::UnexpectedKeys(vec!["m".into(), "z".into()])
        );
    }

    #[test]
    fn misused_open_marker() {
        let pattern = MapPattern::new()
            .entry("a", 1)
            .with_rest(MapPattern::new().entry("a", 2));
        let err = compare(&nested(), &pattern.into()).unwrap_err();
        assert_eq!(
            err,
            Error::from(PatternError::MisusedOpenMarker {
                path: Path::root(),
                found: r#"{"a": 2}"#.into()
            })
        );

        // Reported before any key is compared.
        let pattern = MapPattern::new()
            .entry("zzz", 1)
            .with_rest(MapEntry::Value(Pattern::Null));
        assert!(compare(&map(&[]), &pattern.into()).unwrap_err().is_invalid_pattern());
    }

    #[test]
    fn lexical_order_decides_reported_key() {
        let data = map(&[("a", Value::from(1)), ("b", Value::from(1))]);
        let forward = MapPattern::new().entry("a", 2).entry("b", 2);
        let backward = MapPattern::new().entry("b", 2).entry("a", 2);
        let forward = compare(&data, &forward.into()).unwrap_err();
        let backward = compare(&data, &backward.into()).unwrap_err();
        assert_eq!(forward.path(), &Path::root().key("a"));
        assert_eq!(forward, backward);
    }
}
