use log::{LevelFilter, Metadata, Record};
use once_cell::sync::OnceCell;
use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::PathBuf;

use crate::error::{AppError, Result};

// The terminal is owned by the UI, so every record goes to a file.
#[derive(Debug)]
struct FileLogger {
    log_file: PathBuf,
    level: LevelFilter,
}

static LOGGER: OnceCell<FileLogger> = OnceCell::new();

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let log_entry = format!(
                "{} {:<5} {} - {}\n",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            );

            if let Ok(mut file) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.log_file)
            {
                let _ = file.write_all(log_entry.as_bytes());
            }
        }
    }

    fn flush(&self) {}
}

pub fn init(log_dir: PathBuf, debug: bool) -> Result<()> {
    create_dir_all(&log_dir)?;

    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    LOGGER
        .set(FileLogger {
            log_file: log_dir.join("log.txt"),
            level,
        })
        .map_err(|_| AppError::Logger("Logger already set".to_string()))?;

    let logger = LOGGER
        .get()
        .ok_or_else(|| AppError::Logger("Logger missing after init".to_string()))?;
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unusable_log_dir_is_an_error() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        // A regular file cannot be the log directory.
        let result = init(tmp.path().to_path_buf(), false);
        assert!(matches!(result, Err(AppError::IO(_))));
        assert!(LOGGER.get().is_none());
    }
}
