//! File-based logging bootstrap.
//!
//! Initializes rolling file logs under the data directory exactly once per
//! process. Repeated initialization is a no-op; initialization failures are
//! reported as strings and must never panic.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use once_cell::sync::OnceCell;

use crate::storage::data_dir;

const LOG_FILE_BASENAME: &str = "mindbank";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGER: OnceCell<LoggerHandle> = OnceCell::new();

/// Initialize file logging at `level` (trace|debug|info|warn|error).
///
/// Idempotent: later calls return `Ok(())` without touching the active
/// logger, whatever level they ask for.
pub fn init_logging(level: &str) -> Result<(), String> {
    if LOGGER.get().is_some() {
        return Ok(());
    }

    let log_dir = data_dir()
        .map_err(|e| format!("failed to prepare log directory: {e}"))?
        .join("logs");
    std::fs::create_dir_all(&log_dir)
        .map_err(|e| format!("failed to create log directory `{}`: {e}", log_dir.display()))?;

    let logger = Logger::try_with_str(level)
        .map_err(|e| format!("invalid log level `{level}`: {e}"))?
        .log_to_file(
            FileSpec::default()
                .directory(&log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|e| format!("failed to start logger: {e}"))?;

    let _ = LOGGER.set(logger);
    log::info!(
        "logging started: level={level} version={}",
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}

/// Default log level for the current build mode.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}
