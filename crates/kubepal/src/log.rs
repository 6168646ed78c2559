//! Logging for kubepal.
use anyhow::Context;
use kubepal_core::get_data_dir;
use std::io::LineWriter;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::OffsetTime;

/// Initializes file-based logging in the application data directory.
///
/// Logs go to `<data_dir>/kubepal.log`; an existing log over 100KB is rotated
/// to `kubepal.log.old` first.
pub fn setup_logging() -> anyhow::Result<()> {
    let data_dir = get_data_dir().context("Failed to get data directory")?;
    let log_path = data_dir.join("kubepal.log");

    if log_path.exists() {
        let metadata = std::fs::metadata(&log_path)?;
        if metadata.len() > 100 * 1024 {
            // 100KB
            let backup_path = data_dir.join("kubepal.log.old");
            if backup_path.exists() {
                std::fs::remove_file(&backup_path)?;
            }
            std::fs::rename(&log_path, backup_path)?;
        }
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    // Ensure the logs are flushed after every line
    let writer = Mutex::new(LineWriter::new(log_file));

    tracing_subscriber::fmt()
        .with_env_filter("kubepal=debug,kubepal_core=debug,rustyline=info")
        .with_writer(writer)
        .with_ansi(false) // Disable ANSI escape codes for file logging
        .with_timer(OffsetTime::local_rfc_3339()?) // Use local time
        .init();
    Ok(())
}
