//! rtedit entrypoint: replays an edit script against the rich-text model.
use anyhow::{Context, Result};
use clap::Parser;
use core_config::load_from;
use core_events::{CHANGE_EVENTS_EMITTED, CHANGE_EVENTS_SUPPRESSED, CHANGE_SEND_FAILURES};
use core_model::EditorModel;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::sync::atomic::Ordering;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

mod runner;
mod script;

use runner::ScriptRunner;
use script::parse_script;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "rtedit", version, about = "Rich-text undo/redo script runner")]
struct Args {
    /// Edit script to replay, one command per line.
    pub script: PathBuf,
    /// Optional configuration file path (overrides discovery of `rtedit.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Directory for the log file (defaults to the working directory).
    #[arg(long = "log-dir")]
    pub log_dir: Option<PathBuf>,
}

fn configure_logging(log_dir: &Path, file_name: &str) -> Option<WorkerGuard> {
    let log_path = log_dir.join(file_name);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        // Global subscriber already installed; drop guard so writer shuts down.
        Err(_err) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_from(args.config.clone())?;
    let log_dir = args.log_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let _log_guard = configure_logging(&log_dir, &config.file.log.file);
    install_panic_hook();

    let limits = config.history_limits();
    info!(
        target: "runtime.startup",
        script = %args.script.display(),
        config = config.source.as_ref().map(|p| p.display().to_string()).as_deref(),
        config_override = args.config.is_some(),
        max_operations = limits.max_operations,
        merge_window_ms = limits.merge_window.as_millis() as u64,
        skip_unchanged = limits.skip_unchanged,
        "bootstrap_complete"
    );

    let source = std::fs::read_to_string(&args.script)
        .with_context(|| format!("reading script {}", args.script.display()))?;
    let commands = parse_script(&source)?;

    let stdout = std::io::stdout();
    let mut runner = ScriptRunner::new(EditorModel::new(limits), stdout.lock());
    runner.run(&commands)?;
    runner.print_all()?;

    info!(
        target: "runtime",
        emitted = CHANGE_EVENTS_EMITTED.load(Ordering::Relaxed),
        suppressed = CHANGE_EVENTS_SUPPRESSED.load(Ordering::Relaxed),
        send_failures = CHANGE_SEND_FAILURES.load(Ordering::Relaxed),
        skipped = runner.model().history().operations_skipped(),
        "shutdown_metrics"
    );
    Ok(())
}
