use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where log lines go
#[derive(Debug, Clone)]
pub enum LogTarget {
    /// Compact lines on stderr (CLI commands)
    Stderr,
    /// Append to a file (TUI mode, keeps the alternate screen clean)
    File(PathBuf),
}

fn build_filter(verbose: bool) -> EnvFilter {
    // RUST_LOG wins over the verbosity flag
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "tareas=debug,warn" } else { "warn" }))
}

/// Initialize the logging system
pub fn init_logger(target: LogTarget, verbose: bool) -> io::Result<()> {
    let filter = build_filter(verbose);

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(io::stderr)
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_thread_names(false)
                        .compact(),
                )
                .try_init()
                .ok();
        }
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(true),
                )
                .try_init()
                .ok();
        }
    }

    Ok(())
}
