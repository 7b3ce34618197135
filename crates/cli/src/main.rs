//! dirwatch - print files created or removed under a directory

use anyhow::{Context, Result};
use clap::Parser;
use cli_lib::output::{Format, Printer};
use cli_lib::settings;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use watcher::{CancellationToken, DirWatcher};

/// Poll a directory tree and report created and removed files
#[derive(Parser)]
#[command(name = "dirwatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to watch
    #[arg(required_unless_present = "example_config")]
    path: Option<PathBuf>,

    /// Time between scans in milliseconds (overrides the config file)
    #[arg(short, long)]
    interval_ms: Option<u64>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print events as JSON lines
    #[arg(long)]
    json: bool,

    /// Print an example config file and exit
    #[arg(long)]
    example_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.example_config {
        print!("{}", settings::example_config());
        return Ok(());
    }

    let path = cli.path.context("No directory given")?;
    let config = settings::resolve(settings::load(cli.config.as_deref())?, cli.interval_ms)?;
    let (watcher, mut events) = DirWatcher::with_config(config);
    tracing::debug!("Using {:?}", watcher.config());

    let cancel = CancellationToken::new();

    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupted, stopping watch");
                cancel.cancel();
            }
        }
    });

    let session = tokio::spawn({
        let cancel = cancel.clone();
        let path = path.clone();
        async move { watcher.watch(cancel, path).await }
    });

    let format = if cli.json { Format::Json } else { Format::Human };
    let stdout = std::io::stdout();
    let color = stdout.is_terminal();
    let mut printer = Printer::new(stdout.lock(), format, color);

    // Ends once the session returns and drops the watcher
    while let Some(event) = events.recv().await {
        if let Err(e) = printer.print(&event) {
            cancel.cancel();
            return Err(e.context("Failed to write event"));
        }
    }

    session
        .await
        .context("Watch task failed")?
        .with_context(|| format!("Failed to watch {}", path.display()))
}
