//! Purpose: `geoscrub` CLI entry point.
//! Role: Binary crate root; parses args, validates paths, runs the stream clean.
//! Invariants: Setup failures (usage, missing input, existing output) print a
//! message on stdout and exit 1 without touching the output file.
//! Invariants: Mid-stream I/O failures propagate to stderr; no retry, no recovery.
//! Invariants: The output file is only created after both path checks pass.
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use clap::{Parser, ValueHint, error::ErrorKind as ClapErrorKind};
use tracing_subscriber::EnvFilter;

mod out_paths;

use geoscrub::core::error::{Error, ErrorKind, to_exit_code};
use geoscrub::core::transform::transform;
use out_paths::default_output_path;

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }
}

#[derive(Parser)]
#[command(
    name = "geoscrub",
    version,
    about = "Clean line-oriented GeoJSON feature streams",
    long_about = r#"Read a line-oriented GeoJSON file (one pretty-printed feature per line,
trailing commas) and write a copy with HTML entities in property values
decoded, embedded newlines stripped, falsy property values dropped, and
trailing commas normalized into inter-record commas.

Lines that are not JSON (array brackets, junk) pass through verbatim."#,
    after_help = r#"EXAMPLES
  $ geoscrub features.geojson                    # writes features-cleaned.geojson
  $ geoscrub features.geojson cleaned.geojson    # explicit output path

NOTES
  - The output file must not already exist; move or delete it first.
  - Set RUST_LOG=debug for per-line diagnostics on stderr."#
)]
struct Cli {
    #[arg(
        help = "Path to the line-oriented GeoJSON input file",
        value_hint = ValueHint::FilePath
    )]
    input: String,
    #[arg(
        help = "Output path (default: <base>-cleaned.<ext> derived from the input)",
        value_hint = ValueHint::FilePath
    )]
    output: Option<String>,
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                return Ok(RunOutcome::ok());
            }
            _ => return Err(usage_error(&err)),
        },
    };

    let input = cli.input;
    let output = cli
        .output
        .unwrap_or_else(|| default_output_path(&input));

    if !Path::new(&input).exists() {
        return Err(Error::new(ErrorKind::NotFound)
            .with_message(format!("The input file {input} does not exist"))
            .with_path(&input));
    }
    if Path::new(&output).exists() {
        return Err(Error::new(ErrorKind::AlreadyExists)
            .with_message(format!(
                "The output file {output} already exists. Please move or delete it before continuing"
            ))
            .with_path(&output));
    }

    let reader = File::open(&input).map(BufReader::new).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to open input file")
            .with_path(&input)
            .with_source(err)
    })?;
    let writer = File::create(&output).map(BufWriter::new).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to create output file")
            .with_path(&output)
            .with_source(err)
    })?;

    let outcome = transform(reader, writer)?;
    tracing::info!(
        records = outcome.records,
        passthrough = outcome.passthrough,
        "cleaned {input} into {output}"
    );
    Ok(RunOutcome::ok())
}

fn usage_error(err: &clap::Error) -> Error {
    let message = match err.kind() {
        ClapErrorKind::MissingRequiredArgument => {
            "Please provide a path to a GeoJSON file".to_string()
        }
        ClapErrorKind::UnknownArgument | ClapErrorKind::TooManyValues => {
            "Too many arguments. Please provide a path to a GeoJSON file and an optional output path"
                .to_string()
        }
        _ => clap_error_summary(err),
    };
    Error::new(ErrorKind::Usage)
        .with_message(message)
        .with_hint("Usage: geoscrub <input-path> [<output-path>]")
}

fn clap_error_summary(err: &clap::Error) -> String {
    err.to_string()
        .lines()
        .next()
        .unwrap_or("invalid arguments")
        .trim_start_matches("error: ")
        .to_string()
}

// Setup failures speak on stdout (they are the user-facing contract); stream
// failures are crashes and go to stderr with their cause chain.
fn emit_error(err: &Error) {
    match err.kind() {
        ErrorKind::Usage | ErrorKind::NotFound | ErrorKind::AlreadyExists => {
            println!("Error: {}", error_message(err));
            if let Some(hint) = err.hint() {
                println!("{hint}");
            }
        }
        ErrorKind::Io | ErrorKind::Internal => {
            eprintln!("Error: {}", error_message(err));
            for cause in error_causes(err) {
                eprintln!("  caused by: {cause}");
            }
        }
    }
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::NotFound => "not found".to_string(),
        ErrorKind::AlreadyExists => "already exists".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    use std::error::Error as StdError;
    let mut causes = Vec::new();
    let mut cur = StdError::source(err);
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
