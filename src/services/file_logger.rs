//! Append-only JSON log of received webhooks with size-based rotation.
//!
//! Each record is written with a single `write_all` on an unbuffered file
//! handle and flushed before returning, so a record is on disk once
//! [`FileLogger::log`] returns even if the process is killed afterwards.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Error,
}

#[derive(Debug, Serialize)]
pub struct LogRecord<'a> {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: &'a str,
    pub data: &'a Value,
}

#[derive(Debug)]
pub struct FileLogger {
    path: PathBuf,
    file: File,
    max_bytes: u64,
    backups: usize,
}

impl FileLogger {
    /// Open (or create) the log file for appending, creating missing parent
    /// directories. `max_bytes == 0` disables rotation.
    pub fn open(path: impl AsRef<Path>, max_bytes: u64, backups: usize) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
                info!(dir = %parent.display(), "Created log directory");
            }
        }

        let file = open_append(&path)?;
        Ok(Self {
            path,
            file,
            max_bytes,
            backups,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one `{timestamp, level, message, data}` record.
    pub fn log(&mut self, level: LogLevel, message: &str, data: &Value) -> io::Result<()> {
        let record = LogRecord {
            timestamp: Utc::now().to_rfc3339(),
            level,
            message,
            data,
        };
        let mut line = serde_json::to_string_pretty(&record)?;
        line.push('\n');

        if self.should_rotate(line.len() as u64)? {
            self.rotate()?;
        }

        self.file.write_all(line.as_bytes())?;
        self.file.flush()
    }

    fn should_rotate(&self, incoming: u64) -> io::Result<bool> {
        if self.max_bytes == 0 {
            return Ok(false);
        }
        let current = self.file.metadata()?.len();
        Ok(current > 0 && current + incoming > self.max_bytes)
    }

    /// Shift `path.N-1 -> path.N ... path -> path.1`, dropping the oldest.
    /// Without backups the file is simply truncated.
    fn rotate(&mut self) -> io::Result<()> {
        if self.backups == 0 {
            self.file = File::create(&self.path)?;
            debug!(path = %self.path.display(), "Truncated webhook log");
            return Ok(());
        }

        let oldest = self.backup_path(self.backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.backups).rev() {
            let source = self.backup_path(index);
            if source.exists() {
                fs::rename(&source, self.backup_path(index + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))?;

        self.file = open_append(&self.path)?;
        debug!(path = %self.path.display(), backups = self.backups, "Rotated webhook log");
        Ok(())
    }

    pub fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
