mod render;

use std::{io::Read as _, path::PathBuf, process::ExitCode};

use anyhow::{Context as _, Result};
use clap::Parser as _;
use shape_core::{Pattern, Value};

#[derive(Debug, clap::Parser)]
#[clap(version, about = "Check JSON documents against structural patterns.")]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,
    #[clap(long, global = true, default_value = "auto")]
    pub color: ColorChoice,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Check a JSON document against a pattern. Exits with 0 if the document
    /// matches, 1 if it does not, and 2 if the pattern is invalid.
    Check(CheckArgs),
    /// Print a pattern in canonical notation.
    Fmt(PatternArgs),
}

#[derive(Debug, clap::Args)]
pub struct PatternArgs {
    /// The path to the pattern file.
    pub pattern: String,
    /// Treat `PATTERN` as the pattern itself instead of a path.
    #[clap(long)]
    pub pattern_inline: bool,
}

#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    #[clap(flatten)]
    pub pattern: PatternArgs,
    /// The JSON document to check. Reads from stdin if omitted or `-`.
    #[clap(long, short)]
    pub actual: Option<PathBuf>,
    #[clap(long, default_value = "text")]
    pub output_format: OutputFormat,
}

/// Color mode.
#[derive(Clone, Copy, Default, Debug, clap::ValueEnum)]
pub enum ColorChoice {
    /// Probe the current terminal and environment variables for color support.
    /// Color is disabled if the output is not a terminal or the `NO_COLOR`
    /// environment variable is set, and forced on if `CLICOLOR_FORCE` is set.
    #[default]
    Auto,
    /// Force color output, even if the command is not running in a terminal.
    Always,
    /// Do not use color output, regardless of whether the command is running in
    /// a terminal. Equivalent to setting the `NO_COLOR` environment variable.
    Never,
}

impl From<ColorChoice> for anstream::ColorChoice {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => anstream::ColorChoice::Auto,
            ColorChoice::Always => anstream::ColorChoice::Always,
            ColorChoice::Never => anstream::ColorChoice::Never,
        }
    }
}

/// Report format.
#[derive(Clone, Copy, Default, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report.
    #[default]
    Text,
    /// A single JSON object on stdout. This also disables color output.
    Json,
}

/// Exit status of `shape check`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    Match,
    Mismatch,
    InvalidPattern,
}

impl Status {
    fn of(result: &Result<(), shape_core::Error>) -> Self {
        match result {
            Ok(()) => Status::Match,
            Err(err) if err.is_invalid_pattern() => Status::InvalidPattern,
            Err(_) => Status::Mismatch,
        }
    }
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Match => ExitCode::SUCCESS,
            Status::Mismatch => ExitCode::from(1),
            Status::InvalidPattern => ExitCode::from(2),
        }
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("SHAPE_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    anstream::ColorChoice::from(args.color).write_global();

    match args.command {
        Command::Check(check) => run_check(&check).map(ExitCode::from),
        Command::Fmt(fmt) => {
            anstream::println!("{}", format_pattern(&fmt)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_check(args: &CheckArgs) -> Result<Status> {
    if let OutputFormat::Json = args.output_format {
        anstream::ColorChoice::Never.write_global();
    }

    let pattern = load_pattern(&args.pattern)?;
    let actual = load_actual(args.actual.as_deref())?;

    let result = shape_core::compare(&actual, &pattern);
    let status = Status::of(&result);
    tracing::debug!(?status, "comparison finished");

    match args.output_format {
        OutputFormat::Text => render::text(&result)?,
        OutputFormat::Json => render::json(&result)?,
    }
    Ok(status)
}

/// Canonical notation of a pattern, as printed by `shape fmt`.
fn format_pattern(args: &PatternArgs) -> Result<String> {
    Ok(load_pattern(args)?.to_string())
}

fn load_pattern(args: &PatternArgs) -> Result<Pattern> {
    let (file_name, source) = if args.pattern_inline {
        (PathBuf::from("<inline>"), args.pattern.clone())
    } else {
        let path = PathBuf::from(&args.pattern);
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read pattern file {}", path.display()))?;
        (path, source)
    };
    tracing::debug!("Using pattern: {}", file_name.display());

    match shape_parser::parse_pattern(&source) {
        Ok(pattern) => Ok(pattern),
        Err(err) => {
            anstream::eprintln!("{}", err.with_location(&file_name, &source));
            anyhow::bail!("could not parse pattern {}", file_name.display())
        }
    }
}

fn load_actual(path: Option<&std::path::Path>) -> Result<Value> {
    let text = match path {
        Some(path) if path != std::path::Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            text
        }
    };
    serde_json::from_str(&text).context("data is not valid JSON")
}
