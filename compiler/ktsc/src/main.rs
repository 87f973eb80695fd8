//! `ktsc`: find where Kotlin annotations end.
//!
//! ```text
//! ktsc annotation build.gradle.kts --offset 120
//! ktsc preamble - < settings.gradle.kts
//! ```
//!
//! Exit status: 0 when an annotation matched, 1 when it was rejected, 2 on
//! unreadable input, malformed source or bad configuration.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::debug;

use kts_parse::{
    scan_annotation_at, skip_file_annotations, AnnotationGrammar, ConfigError, ParseConfig,
    ScanError, ScanOutcome,
};

#[derive(Debug, Parser)]
#[command(name = "ktsc", version, about = "Find where Kotlin annotations end")]
struct Args {
    /// Maximum nesting of recursive grammar rules (overrides KTS_MAX_DEPTH).
    #[arg(long, global = true, value_name = "N")]
    max_depth: Option<usize>,

    /// Print every grammar rule invocation as a tree on stderr.
    #[arg(long, global = true)]
    trace_rules: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scan one annotation.
    Annotation {
        /// Kotlin source file, or `-` for stdin.
        file: PathBuf,
        /// Byte offset to scan from; the first token at or after it is used.
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// List the leading `@file:` annotations and where the script body starts.
    Preamble {
        /// Kotlin source file, or `-` for stdin.
        file: PathBuf,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{path}: {source}")]
    Scan { path: String, source: ScanError },
}

/// Whether the scanned annotation was recognized.
enum Verdict {
    Matched,
    Rejected,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match config(&args) {
        Ok(config) => config,
        Err(error) => return report(&error),
    };
    init_tracing(config.trace_rules);
    debug!(?config, "configured");

    match run(&args.command, &config) {
        Ok(Verdict::Matched) => ExitCode::SUCCESS,
        Ok(Verdict::Rejected) => ExitCode::from(1),
        Err(error) => report(&error),
    }
}

fn report(error: &CliError) -> ExitCode {
    eprintln!("error: {error}");
    ExitCode::from(2)
}

/// Environment settings, overridden by command-line flags.
fn config(args: &Args) -> Result<ParseConfig, CliError> {
    let mut config = ParseConfig::from_env()?;
    if let Some(depth) = args.max_depth {
        if depth == 0 {
            return Err(ConfigError::InvalidDepth {
                var: "--max-depth",
                value: depth.to_string(),
            }
            .into());
        }
        config = config.with_max_depth(depth);
    }
    if args.trace_rules {
        config = config.with_trace_rules(true);
    }
    Ok(config)
}

/// Logs go to stderr, filtered by `KTS_LOG` (falling back to `RUST_LOG`).
/// Rule tracing switches to a tree layout and enables the rule events.
fn init_tracing(trace_rules: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let mut filter = EnvFilter::try_from_env("KTS_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    if trace_rules {
        for directive in ["kts_peg::trace=trace", "kts_parse=debug"] {
            if let Ok(directive) = directive.parse() {
                filter = filter.add_directive(directive);
            }
        }
    }

    let flat = (!trace_rules).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
    });
    let tree = trace_rules.then(|| {
        tracing_tree::HierarchicalLayer::new(2)
            .with_targets(true)
            .with_bracketed_fields(true)
    });

    // A subscriber may already be installed; keep it.
    let _ = tracing_subscriber::registry()
        .with(flat)
        .with(tree)
        .with(filter)
        .try_init();
}

fn run(command: &Command, config: &ParseConfig) -> Result<Verdict, CliError> {
    let grammar = AnnotationGrammar::with_config(config);
    match command {
        Command::Annotation { file, offset } => {
            let (path, source) = read_source(file)?;
            let outcome = scan_annotation_at(&grammar, &source, *offset)
                .map_err(|source| CliError::Scan { path, source })?;
            Ok(print_outcome(&source, &outcome))
        }
        Command::Preamble { file } => {
            let (path, source) = read_source(file)?;
            let preamble = skip_file_annotations(&grammar, &source)
                .map_err(|source| CliError::Scan { path, source })?;
            for span in &preamble.annotations {
                println!("{span}\t{}", excerpt(&source, span.to_range()));
            }
            println!("body {}", preamble.body_offset);
            Ok(Verdict::Matched)
        }
    }
}

fn print_outcome(source: &str, outcome: &ScanOutcome) -> Verdict {
    match outcome {
        ScanOutcome::Matched { span, end } => {
            println!("{span}\t{}", excerpt(source, span.to_range()));
            println!("end {end}");
            Verdict::Matched
        }
        ScanOutcome::Rejected { reason, offset } => {
            println!("rejected at {offset}: {reason}");
            Verdict::Rejected
        }
    }
}

fn excerpt(source: &str, range: std::ops::Range<usize>) -> &str {
    source.get(range).unwrap_or("")
}

/// Read `file`, or stdin for `-`. Returns the display path and the text.
fn read_source(file: &Path) -> Result<(String, String), CliError> {
    let path = file.display().to_string();
    let result = if path == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).map(|_| text)
    } else {
        std::fs::read_to_string(file)
    };
    match result {
        Ok(text) => Ok((path, text)),
        Err(source) => Err(CliError::Read { path, source }),
    }
}
