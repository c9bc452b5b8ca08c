/// The result of a failed comparison.
///
/// A mismatch means the data disagrees with the pattern. An invalid pattern
/// means the pattern itself is malformed, regardless of the data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Mismatch(Box<Mismatch>),
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

impl Error {
    #[inline]
    #[must_use]
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Error::Mismatch(_))
    }

    #[inline]
    #[must_use]
    pub fn is_invalid_pattern(&self) -> bool {
        matches!(self, Error::Pattern(_))
    }

    #[must_use]
    pub fn as_mismatch(&self) -> Option<&Mismatch> {
        match self {
            Error::Mismatch(mismatch) => Some(mismatch),
            Error::Pattern(_) => None,
        }
    }

    /// Location of the failure in the data (for mismatches) or in the pattern.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Error::Mismatch(mismatch) => &mismatch.path,
            Error::Pattern(err) => err.path(),
        }
    }
}

impl From<Mismatch> for Error {
    #[inline]
    fn from(mismatch: Mismatch) -> Self {
        Self::Mismatch(Box::new(mismatch))
    }
}

/// The data disagrees with the pattern at `path`.
///
/// `expected` and `actual` are the pattern node and the data node at `path`,
/// rendered in pattern notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason} at `{path}`\n  expected: {expected}\n    actual: {actual}")]
pub struct Mismatch {
    pub path: Path,
    pub reason: MismatchReason,
    pub expected: String,
    pub actual: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MismatchReason {
    #[error("type mismatch")]
    Kind,
    #[error("value mismatch")]
    Value,
    #[error("missing key {0:?}")]
    MissingKey(String),
    #[error("unexpected keys: {}", .0.join(", "))]
    UnexpectedKeys(Vec<String>),
    /// The pattern describes more items than the list has.
    #[error("list ends at index {index}, but the pattern expects more items")]
    MissingItems { index: usize },
    /// More items in data than the pattern describes.
    #[error("{count} more item(s) in data than the pattern describes, starting at index {index}")]
    LeftoverItems { index: usize, count: usize },
    /// An item following a `...` gap was never found.
    #[error("no item matching {item} at or after index {from}")]
    NotFoundAfterGap { item: String, from: usize },
}

/// The pattern is malformed. This is an error in the expectation, not in the
/// data being checked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("invalid pattern at `{path}`: consecutive `...` in list at index {index}")]
    ConsecutiveGaps { path: Path, index: usize },
    #[error("invalid pattern at `{path}`: `...` key must be paired with `...`, found {found}")]
    MisusedOpenMarker { path: Path, found: String },
}

impl PatternError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            PatternError::ConsecutiveGaps { path, .. }
            | PatternError::MisusedOpenMarker { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location within a value, printed as `$.tags[2]` or `$["odd key"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<PathSegment>);

impl Path {
    #[inline]
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.0.push(PathSegment::Key(key.into()));
        self
    }

    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.0.push(PathSegment::Index(index));
        self
    }
}

impl From<Vec<PathSegment>> for Path {
    #[inline]
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                PathSegment::Key(key) if is_plain_key(key) => write!(f, ".{key}")?,
                PathSegment::Key(key) => {
                    f.write_str("[")?;
                    crate::value::write_quoted(f, key)?;
                    f.write_str("]")?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

fn is_plain_key(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
