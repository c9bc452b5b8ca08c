use winnow::error::{ContextError, StrContext};

/// Syntax error in pattern notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    /// Byte offset of the error in the source.
    pub offset: usize,
    pub message: String,
}

impl ParseError {
    #[must_use]
    pub fn with_location<'a>(
        self,
        file_name: &'a std::path::Path,
        source_code: &'a str,
    ) -> LocatedError<'a> {
        LocatedError {
            file_name,
            source_code,
            error: self,
        }
    }

    /// Span of the error in the source, covering at most one character.
    #[must_use]
    pub fn span(&self, source_code: &str) -> std::ops::Range<usize> {
        let start = self.offset.min(source_code.len());
        let len = source_code[start..]
            .chars()
            .next()
            .map_or(0, char::len_utf8);
        start..start + len
    }
}

impl From<winnow::error::ParseError<&str, ContextError>> for ParseError {
    fn from(err: winnow::error::ParseError<&str, ContextError>) -> Self {
        let expected = err
            .inner()
            .context()
            .filter_map(|context| match context {
                StrContext::Expected(value) => Some(value.to_string()),
                _ => None,
            })
            .collect::<Vec<_>>();

        let message = if expected.is_empty() {
            String::from("invalid pattern syntax")
        } else {
            format!("expected {}", expected.join(" or "))
        };

        Self {
            offset: err.offset(),
            message,
        }
    }
}

/// A [`ParseError`] together with the source it refers to, rendered as an
/// annotated snippet.
#[derive(Debug)]
pub struct LocatedError<'a> {
    pub file_name: &'a std::path::Path,
    pub source_code: &'a str,
    pub error: ParseError,
}

impl LocatedError<'_> {
    /// Render without colors.
    #[must_use]
    pub fn render_plain(&self) -> String {
        self.render(&annotate_snippets::Renderer::plain())
    }

    fn render(&self, renderer: &annotate_snippets::Renderer) -> String {
        use annotate_snippets::{Level, Snippet};

        let title = self.error.to_string();
        let origin = self.file_name.to_string_lossy();
        let message = Level::Error.title(&title).snippet(
            Snippet::source(self.source_code)
                .origin(&origin)
                .fold(true)
                .annotation(
                    Level::Error
                        .span(self.error.span(self.source_code))
                        .label(&title),
                ),
        );
        renderer.render(message).to_string()
    }
}

impl std::fmt::Display for LocatedError<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(&annotate_snippets::Renderer::styled()))
    }
}

impl std::error::Error for LocatedError<'_> {}

impl std::ops::Deref for LocatedError<'_> {
    type Target = ParseError;

    fn deref(&self) -> &Self::Target {
        &self.error
    }
}
