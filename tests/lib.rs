use std::io::Write as _;

use shape_core::{Error, Pattern, PatternError, Value};

/// Install a subscriber that honors `SHAPE_LOG`, writing through the test
/// harness so output is captured per test.
pub fn init_logging() {
    _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("SHAPE_LOG"))
        .with_test_writer()
        .try_init();
}

pub fn strip_colors(s: &str) -> String {
    let mut buf = Vec::new();
    let mut stream = anstream::StripStream::new(&mut buf);
    stream.write_all(s.as_bytes()).unwrap();
    String::from_utf8(buf).unwrap()
}

pub fn fix_newlines(s: &str) -> String {
    s.replace('\r', "")
}

/// Parse pattern notation, panicking with the rendered diagnostic on syntax
/// errors.
pub fn pattern(source: &str) -> Pattern {
    match shape_parser::parse_pattern(source) {
        Ok(pattern) => pattern,
        Err(err) => panic!(
            "{}",
            err.with_location(std::path::Path::new("INPUT"), source)
                .render_plain()
        ),
    }
}

pub fn check(actual: serde_json::Value, pattern_source: &str) -> Result<(), Error> {
    init_logging();
    shape_core::compare(&shape_core::normalize(actual), &pattern(pattern_source))
}

pub fn matches(actual: serde_json::Value, pattern_source: &str) -> Result<bool, PatternError> {
    init_logging();
    shape_core::matches(&shape_core::normalize(actual), &pattern(pattern_source))
}

/// Path of a file under `cases/`.
pub fn case_path(name: &str, extension: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("cases")
        .join(format!("{name}.{extension}"))
}

pub fn load_case(name: &str) -> anyhow::Result<(Value, Pattern)> {
    let data = std::fs::read_to_string(case_path(name, "json"))?;
    let pattern_source = std::fs::read_to_string(case_path(name, "pattern"))?;
    let pattern = shape_parser::parse_pattern(&pattern_source).map_err(|err| {
        anyhow::anyhow!(
            "{}",
            err.with_location(&case_path(name, "pattern"), &pattern_source)
                .render_plain()
        )
    })?;
    Ok((serde_json::from_str(&data)?, pattern))
}
