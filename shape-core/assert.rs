use crate::{Error, Pattern, Value};

/// Assert that a [`Value`] matches a [`Pattern`].
///
/// On failure, panics with the data, the pattern, and the reason, so the test
/// output is enough to diagnose the mismatch.
///
/// ```
/// use shape_core::{assert_shape, Kind, MapPattern, Pattern, Value};
///
/// let body: Value = [("id", Value::from(7))].into_iter().collect();
/// assert_shape!(body, Pattern::from(MapPattern::new().entry("id", Kind::Int)));
/// ```
#[macro_export]
macro_rules! assert_shape {
    ($actual:expr, $pattern:expr $(,)?) => {
        match (&$actual, &$pattern) {
            (actual, pattern) => {
                if let ::core::result::Result::Err(err) = $crate::compare(actual, pattern) {
                    ::core::panic!("{}", $crate::AssertionFailure::new(actual, pattern, &err));
                }
            }
        }
    };
}

/// The panic message of [`assert_shape!`].
pub struct AssertionFailure<'a> {
    actual: &'a Value,
    pattern: &'a Pattern,
    error: &'a Error,
}

impl<'a> AssertionFailure<'a> {
    #[must_use]
    pub fn new(actual: &'a Value, pattern: &'a Pattern, error: &'a Error) -> Self {
        Self {
            actual,
            pattern,
            error,
        }
    }
}

impl std::fmt::Display for AssertionFailure<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let heading = if self.error.is_invalid_pattern() {
            "invalid pattern"
        } else {
            "data does not match pattern"
        };
        let actual =
            serde_json::to_string_pretty(self.actual).map_err(|_| std::fmt::Error)?;
        writeln!(f, "assertion failed: {heading}")?;
        writeln!(f, "data:\n{actual}")?;
        writeln!(f, "pattern:\n{}", self.pattern)?;
        write!(f, "{}", self.error)
    }
}
