use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Env var holding the log filter (same syntax as RUST_LOG)
pub const LOG_ENV: &str = "MENTION_LOG";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// CLI logging: warnings and above to stderr unless MENTION_LOG says otherwise
pub fn init_cli() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// TUI logging: only when MENTION_LOG is set, appended to `log_path` so the
/// alternate screen is never written to.
pub fn init_tui(log_path: &Path) -> std::io::Result<()> {
    if std::env::var_os(LOG_ENV).is_none() {
        return Ok(());
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}
