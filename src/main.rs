//! textoverlay - render style-annotated overlays for text
//!
//! Reads text from a file or stdin, runs it through the configured
//! strategies and writes the annotated result.

use std::fs;
use std::io::{self, BufRead, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use textoverlay::config::{Config, OutputFormat};
use textoverlay::host::{HtmlSurface, Overlay, SegmentListSurface, Surface};
use textoverlay::overlay::{builtin, loader, Engine, Strategy};
use textoverlay::terminal::TerminalSurface;
use textoverlay::Result;

/// Style-annotated text overlays
#[derive(Parser, Debug)]
#[command(name = "textoverlay", version)]
#[command(about = "Highlight text with chained pattern strategies", long_about = None)]
struct Args {
    /// Input file (stdin when omitted)
    file: Option<PathBuf>,

    /// TOML strategy file
    #[arg(short, long)]
    strategies: Option<PathBuf>,

    /// Comma separated built-in presets
    #[arg(short, long)]
    presets: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Let later strategies match inside earlier highlights
    #[arg(long)]
    overlapping: bool,

    /// Merge multiple matchers into one alternation instead of refining
    ///
    /// Grouping characters in each matcher become literals, so chained
    /// presets change meaning: a merged mention highlights every word.
    #[arg(long)]
    merge_matchers: bool,

    /// Treat every input line as a new text-changed notification
    #[arg(long)]
    lines: bool,

    /// Write markup without the overlay container
    #[arg(long)]
    bare: bool,

    /// List built-in presets and exit
    #[arg(long)]
    list_presets: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    if args.list_presets {
        for name in builtin::PRESET_NAMES {
            println!("{}", name);
        }
        return Ok(());
    }

    let config = Config::load();
    let format = args.format.unwrap_or(config.format);

    // Flags override the strategy file, which overrides the config file
    let mut options = config.options();
    let mut strategies: Vec<Strategy> = Vec::new();
    let strategy_file = args.strategies.clone().or_else(|| config.strategies.clone());
    if let Some(path) = &strategy_file {
        let set = loader::load(path)?;
        if let Some(file_options) = set.options {
            options = file_options;
        }
        strategies.extend(set.strategies);
    }
    match &args.presets {
        Some(list) => strategies.extend(builtin::presets(list)?),
        None if strategy_file.is_none() => {
            for name in &config.presets {
                strategies.push(builtin::preset(name)?);
            }
        }
        None => {}
    }
    if args.overlapping {
        options.allow_overlapping = true;
    }
    if args.merge_matchers {
        options.allow_multi_part_matching = false;
    }

    let surface: Box<dyn Surface> = match format {
        OutputFormat::Html if args.bare => Box::new(HtmlSurface::bare(io::stdout())),
        OutputFormat::Html => Box::new(HtmlSurface::new(io::stdout())),
        OutputFormat::Ansi => Box::new(TerminalSurface::stdout()),
        OutputFormat::Segments => Box::new(SegmentListSurface::new(io::stdout())),
    };

    // Registered before binding so only renders of the input are presented
    let mut engine = Engine::new();
    engine.register(strategies, options)?;
    let mut overlay = Overlay::with_engine(engine, surface);

    if args.lines {
        for line in open_input(args.file.as_ref())?.lines() {
            overlay.notify(&line?)?;
        }
    } else {
        let mut text = String::new();
        open_input(args.file.as_ref())?.read_to_string(&mut text)?;
        overlay.notify(text.strip_suffix('\n').unwrap_or(&text))?;
    }
    overlay.detach();

    Ok(())
}

fn open_input(file: Option<&PathBuf>) -> Result<Box<dyn BufRead>> {
    Ok(match file {
        Some(path) => Box::new(io::BufReader::new(fs::File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    })
}
