use crate::{
    Error, ListItem, MismatchReason, PathSegment, Pattern, PatternError, Value,
    value::DisplaySeq,
};

use super::Matcher;

impl Matcher {
    /// Align `actual` against `pattern` with two cursors, moving strictly
    /// forward through both.
    pub(super) fn compare_list(
        &mut self,
        actual: &[Value],
        pattern: &[ListItem],
    ) -> Result<(), Error> {
        self.check_gaps(pattern)?;

        let mut cursor = 0;
        let mut index = 0;

        while let Some(item) = pattern.get(index) {
            match item {
                ListItem::Item(expected) => {
                    let Some(value) = actual.get(cursor) else {
                        return Err(self.mismatch(
                            MismatchReason::MissingItems { index: cursor },
                            &DisplaySeq(pattern),
                            &DisplaySeq(actual),
                        ));
                    };
                    self.with_segment(PathSegment::Index(cursor), |this| {
                        this.compare(value, expected)
                    })?;
                    cursor += 1;
                    index += 1;
                }
                ListItem::Gap => {
                    let Some(ListItem::Item(target)) = pattern.get(index + 1) else {
                        // Trailing gap absorbs everything that is left.
                        tracing::trace!(
                            "gap absorbs {} item(s) at {}",
                            actual.len() - cursor,
                            self.path()
                        );
                        return Ok(());
                    };

                    let Some(found) = self.seek(actual, cursor, target)? else {
                        return Err(self.mismatch(
                            MismatchReason::NotFoundAfterGap {
                                item: target.to_string(),
                                from: cursor,
                            },
                            &DisplaySeq(pattern),
                            &DisplaySeq(actual),
                        ));
                    };
                    cursor = found + 1;
                    index += 2;
                }
            }
        }

        if cursor < actual.len() {
            return Err(self.mismatch(
                MismatchReason::LeftoverItems {
                    index: cursor,
                    count: actual.len() - cursor,
                },
                &DisplaySeq(pattern),
                &DisplaySeq(actual),
            ));
        }

        Ok(())
    }

    /// Find the first item at or after `from` that matches `target`.
    ///
    /// Mismatching items are skipped. A malformed pattern is reported as soon
    /// as it is encountered.
    fn seek(
        &mut self,
        actual: &[Value],
        from: usize,
        target: &Pattern,
    ) -> Result<Option<usize>, Error> {
        for (position, value) in actual.iter().enumerate().skip(from) {
            match self.with_segment(PathSegment::Index(position), |this| {
                this.compare(value, target)
            }) {
                Ok(()) => return Ok(Some(position)),
                Err(Error::Mismatch(mismatch)) => {
                    tracing::trace!("gap skips item at {}: {}", mismatch.path, mismatch.reason);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(None)
    }

    /// Two gaps in a row make the alignment ambiguous, so they are rejected
    /// before any data is looked at.
    fn check_gaps(&self, pattern: &[ListItem]) -> Result<(), PatternError> {
        match pattern
            .windows(2)
            .position(|pair| matches!(pair, [ListItem::Gap, ListItem::Gap]))
        {
            Some(index) => Err(PatternError::ConsecutiveGaps {
                path: self.path(),
                index: index + 1,
            }),
            None => Ok(()),
        }
    }
}
