//! Page-flow CLI
//!
//! Replays a recorded height trace through the paginator without a browser.
//! The main interface is through the WASM bindings.

use clap::{Parser, Subcommand};
use page_flow::config::{load_file, ConfigError};
use page_flow::logging::{self, LoggingError};
use page_flow::{
    ApplyFailure, ChromeDiff, ChromeSurface, ConfigurationError, ContentSurface, CycleOutcome,
    LayoutConfig, Paginator, Rect, ScrollAnchor, ViewportSurface,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "page-flow")]
#[command(version)]
#[command(about = "Repagination engine for flowing rich-text surfaces")]
struct Args {
    /// Log filter directives (defaults to RUST_LOG, then "info")
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay `<ms> <height>` lines and print each committed page count
    Replay {
        /// Layout configuration (.toml or .json)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Trace file, one `<ms> <height>` observation per line
        trace: PathBuf,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("cannot read trace {path}: {source}")]
    Trace {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("trace line {line}: expected `<ms> <height>`, got {content:?}")]
    Parse { line: usize, content: String },
}

/// Surface whose height comes entirely from the trace
#[derive(Debug, Default)]
struct TraceSurface {
    height: f64,
    scroll: ScrollAnchor,
    container_height: f64,
}

impl ContentSurface for TraceSurface {
    fn natural_height(&self) -> f64 {
        self.height
    }
}

impl ViewportSurface for TraceSurface {
    fn cursor_rect(&self) -> Option<Rect> {
        None
    }

    fn scroll_position(&self) -> ScrollAnchor {
        self.scroll
    }

    fn set_scroll_position(&mut self, position: ScrollAnchor) {
        self.scroll = position;
    }

    fn viewport_height(&self) -> f64 {
        0.0
    }
}

impl ChromeSurface for TraceSurface {
    fn apply_chrome(&mut self, diff: &ChromeDiff) -> Result<(), ApplyFailure> {
        if let Some(height) = diff.container_height() {
            self.container_height = height;
        }
        Ok(())
    }
}

fn parse_trace(source: &str) -> Result<Vec<(f64, f64)>, CliError> {
    let mut samples = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parse_error = || CliError::Parse {
            line: idx + 1,
            content: raw.to_string(),
        };
        let mut fields = line.split_whitespace();
        let (Some(ms), Some(height), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(parse_error());
        };
        let ms = ms.parse::<f64>().map_err(|_| parse_error())?;
        let height = height.parse::<f64>().map_err(|_| parse_error())?;
        samples.push((ms, height));
    }
    Ok(samples)
}

fn report(now: f64, outcome: &CycleOutcome, container_height: f64) {
    if let CycleOutcome::Committed { page_count, .. } = outcome {
        println!("{:>8.0}ms  pages={}  height={}", now, page_count, container_height);
    }
}

/// Run every cycle due at or before `until`
fn advance(paginator: &mut Paginator<TraceSurface>, until: f64) {
    while let Some(deadline) = paginator.next_deadline().filter(|d| *d <= until) {
        if let Some(outcome) = paginator.tick(deadline) {
            report(deadline, &outcome, paginator.surface().container_height);
        }
    }
}

fn replay(config: Option<&Path>, trace: &Path) -> Result<usize, CliError> {
    let config = match config {
        Some(path) => load_file(path)?,
        None => LayoutConfig::default(),
    };
    let source = std::fs::read_to_string(trace).map_err(|source| CliError::Trace {
        path: trace.to_path_buf(),
        source,
    })?;
    let samples = parse_trace(&source)?;
    info!(samples = samples.len(), trace = %trace.display(), "replaying trace");

    let mut paginator = Paginator::attach(config, TraceSurface::default())?;
    for (now, height) in samples {
        advance(&mut paginator, now);
        paginator.surface_mut().height = height;
        paginator.observe(height, now);
    }
    advance(&mut paginator, f64::INFINITY);

    Ok(paginator.page_count())
}

fn run(args: Args) -> Result<(), CliError> {
    logging::init(args.log.as_deref())?;

    match args.command {
        Command::Replay { config, trace } => {
            let pages = replay(config.as_deref(), &trace)?;
            info!(pages, "replay finished");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
