// bangstats - what did I actually listen to this year?
// Reads Spotify's StreamingHistory*.json, throws out the skips, ranks what's left

use anyhow::Result;
use bangstats::{
    config::Config,
    export::ExportManager,
    history::{self, LoadedHistory},
    LoadMode, Report,
};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bangstats")]
#[command(about = "Year-in-review stats from a Spotify listening history export")]
struct Args {
    /// History export files (StreamingHistory0.json ...), overrides the config
    files: Vec<PathBuf>,

    /// How many artists to rank
    #[arg(long)]
    top: Option<usize>,

    /// List all 12 months, even ones with no listening
    #[arg(long)]
    zero_fill: bool,

    /// Skip malformed records instead of aborting
    #[arg(long)]
    lenient: bool,

    /// Write the report as JSON to this path
    #[arg(long)]
    export: Option<PathBuf>,

    /// Use this config file instead of the default one
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable developer logging (stderr + debug output)
    #[arg(long)]
    dev: bool,
}

fn init_logging(dev: bool) -> Result<WorkerGuard> {
    // Create logs directory in project root
    let log_dir = PathBuf::from("logs");
    std::fs::create_dir_all(&log_dir)?;

    // Daily rotating file appender
    let file_appender = tracing_appender::rolling::daily(&log_dir, "bangstats.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    // Base filter: info level for general logs, debug for bangstats
    let base_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bangstats=debug"));

    let builder = tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(base_filter);

    // Dev mode mirrors everything to stderr as well
    if dev {
        let subscriber = builder
            .with_writer(file_writer.and(std::io::stderr))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        eprintln!("🔧 Dev mode: Debug output enabled to stderr + file");
    } else {
        let subscriber = builder.with_writer(file_writer).finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(guard)
}

fn apply_args(config: &mut Config, args: &Args) {
    if !args.files.is_empty() {
        config.history_files = args.files.clone();
    }
    if let Some(top) = args.top {
        config.report.top_n = top;
    }
    if args.zero_fill {
        config.report.zero_fill_months = true;
    }
    if args.lenient {
        config.loader.strict = false;
    }
    if let Some(export) = &args.export {
        config.report.export_path = Some(export.clone());
    }
}

fn load_history(config: &Config) -> Result<LoadedHistory> {
    let mode: LoadMode = config.loader.mode();
    debug!("Loading {} history file(s) in {:?} mode", config.history_files.len(), mode);

    // errors carry the offending file's path
    let loaded = history::load_paths(&config.history_files, mode)?;
    Ok(loaded)
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Keep the guard alive so buffered log lines get flushed on exit
    let _log_guard = init_logging(args.dev)?;

    info!("🎧 bangstats starting up");

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    apply_args(&mut config, &args);

    // Everything is loaded before anything is reported: a bad record means no output at all
    let loaded = load_history(&config)?;
    let report = Report::build(&loaded, &config.report, &config.artists);

    if let Some(path) = &config.report.export_path {
        ExportManager::new().export_to_json(&report, path)?;
    }

    print!("{}", report.render_text());

    info!("Done");
    Ok(())
}
