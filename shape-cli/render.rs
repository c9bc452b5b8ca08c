use std::io::Write as _;

use owo_colors::OwoColorize as _;
use shape_core::Error;

pub fn text(result: &Result<(), Error>) -> std::io::Result<()> {
    let mut out = anstream::stdout().lock();
    match result {
        Ok(()) => writeln!(out, "{}", "ok".bright_green().bold()),
        Err(Error::Mismatch(mismatch)) => {
            writeln!(out, "{}: {mismatch}", "mismatch".bright_red().bold())
        }
        Err(err @ Error::Pattern(_)) => writeln!(out, "{}: {err}", "error".bright_red().bold()),
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "snake_case")]
enum Verdict {
    Match,
    Mismatch,
    InvalidPattern,
}

#[derive(Debug, serde::Serialize)]
struct Report {
    result: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    actual: Option<String>,
}

impl From<&Result<(), Error>> for Report {
    fn from(result: &Result<(), Error>) -> Self {
        match result {
            Ok(()) => Report {
                result: Verdict::Match,
                path: None,
                reason: None,
                expected: None,
                actual: None,
            },
            Err(Error::Mismatch(mismatch)) => Report {
                result: Verdict::Mismatch,
                path: Some(mismatch.path.to_string()),
                reason: Some(mismatch.reason.to_string()),
                expected: Some(mismatch.expected.clone()),
                actual: Some(mismatch.actual.clone()),
            },
            Err(Error::Pattern(err)) => Report {
                result: Verdict::InvalidPattern,
                path: Some(err.path().to_string()),
                reason: Some(err.to_string()),
                expected: None,
                actual: None,
            },
        }
    }
}

pub fn json(result: &Result<(), Error>) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer(&mut out, &Report::from(result))?;
    writeln!(out)
}
