//! FILENAME: app/pivot-cli/src/logging.rs
// PURPOSE: Unified logging for the CLI.
// FORMAT: seq|level|category|message

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use anyhow::Context;
use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::OnceCell;

// ============================================================================
// UNIFIED LOGGING SYSTEM
// ============================================================================

/// Global sequence counter
static LOG_SEQ: AtomicU64 = AtomicU64::new(0);

static LOGGER: OnceCell<UnifiedLogger> = OnceCell::new();

/// Get next sequence number
pub fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst) + 1
}

pub fn level_code(level: Level) -> &'static str {
    match level {
        Level::Error => "E",
        Level::Warn => "W",
        Level::Info => "I",
        Level::Debug => "D",
        Level::Trace => "T",
    }
}

/// One line in unified format.
pub fn format_line(seq: u64, level: Level, category: &str, message: &str) -> String {
    format!("{}|{}|{}|{}", seq, level_code(level), category, message)
}

/// `log` backend writing unified lines to stderr and an optional file.
/// Stdout is reserved for the command's JSON output.
pub struct UnifiedLogger {
    level: LevelFilter,
    file: Mutex<Option<File>>,
}

impl UnifiedLogger {
    pub fn new(level: LevelFilter, log_file: Option<&Path>) -> anyhow::Result<Self> {
        let file = match log_file {
            Some(path) => Some(
                OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(path)
                    .with_context(|| format!("Failed to create log file {:?}", path))?,
            ),
            None => None,
        };

        Ok(UnifiedLogger {
            level,
            file: Mutex::new(file),
        })
    }
}

impl Log for UnifiedLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(next_seq(), record.level(), record.target(), &record.args().to_string());

        if let Ok(mut guard) = self.file.lock() {
            if let Some(ref mut file) = *guard {
                if let Err(e) = writeln!(file, "{}", line) {
                    eprintln!("[LOG_ERROR] Failed to write: {}", e);
                }
            }
        }

        eprintln!("{}", line);
    }

    fn flush(&self) {
        if let Ok(mut guard) = self.file.lock() {
            if let Some(ref mut file) = *guard {
                let _ = file.flush();
            }
        }
    }
}

/// Installs the unified logger as the global `log` backend.
pub fn init(level: LevelFilter, log_file: Option<&Path>) -> anyhow::Result<()> {
    let logger = LOGGER.get_or_try_init(|| UnifiedLogger::new(level, log_file))?;
    log::set_logger(logger).map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))?;
    log::set_max_level(level);
    Ok(())
}
