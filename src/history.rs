//! Persistent, size-capped record of a calculator session.
//!
//! Every append rewrites the whole store (read, push, evict, write), which
//! is fine for a single interactive user and nothing else: there is no
//! locking and no crash atomicity across the sequence.

use crate::error_handling::*;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    start,
    instructions,
    user_input,
    calculation,
    end,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Category::*;
        let name = match self {
            start => "START",
            instructions => "INSTRUCTIONS",
            user_input => "USER_INPUT",
            calculation => "CALCULATION",
            end => "END",
        };
        write!(f, "{name}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub category: Category,
    pub content: String,
}

impl LogEntry {
    pub fn new(category: Category, content: impl Into<String>) -> Self {
        Self::at(Local::now(), category, content)
    }

    pub fn at(timestamp: DateTime<Local>, category: Category, content: impl Into<String>) -> Self {
        Self {
            timestamp,
            category,
            content: content.into(),
        }
    }
}

pub trait History {
    fn record(&mut self, entry: LogEntry) -> Result<()>;

    fn append(&mut self, category: Category, content: &str) -> Result<()> {
        self.record(LogEntry::new(category, content))
    }
}

/// Bytes one entry adds to a pretty-printed array, separator included.
fn element_size(entry: &LogEntry) -> io::Result<u64> {
    // "[\n" + element + "\n]", and every element after the first costs ",\n"
    let alone = serde_json::to_vec_pretty(std::slice::from_ref(entry))?;
    Ok(alone.len() as u64 - 4 + 2)
}

/// Pushes `entry`, then evicts the oldest entries until the pretty-printed
/// array fits in `max_size` bytes. Returns the bytes to persist.
///
/// The store ends up empty when `entry` alone is too large.
pub fn push_bounded(entries: &mut VecDeque<LogEntry>, entry: LogEntry, max_size: u64) -> io::Result<Vec<u8>> {
    entries.push_back(entry);
    let mut bytes = serde_json::to_vec_pretty(&*entries)?;
    let mut size = bytes.len() as u64;

    let mut evicted = 0;
    while size > max_size {
        let Some(oldest) = entries.pop_front() else {
            break;
        };
        size -= element_size(&oldest)?;
        evicted += 1;
    }

    if evicted > 0 {
        debug!(evicted, remaining = entries.len(), size, "evicted oldest history entries");
        bytes = serde_json::to_vec_pretty(&*entries)?;
    }
    Ok(bytes)
}

fn read_if_present(path: &Path) -> io::Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// The store as one JSON array of `{timestamp, category, content}` objects.
pub struct JsonHistory {
    path: PathBuf,
    max_size: u64,
}

impl JsonHistory {
    pub fn new(path: impl Into<PathBuf>, max_size: u64) -> Self {
        Self {
            path: path.into(),
            max_size,
        }
    }

    pub fn entries(&self) -> Result<VecDeque<LogEntry>> {
        self.load()
            .map_err(|e| CalcError::storage_failure(&self.path, e))
    }

    fn load(&self) -> io::Result<VecDeque<LogEntry>> {
        match read_if_present(&self.path)? {
            Some(bytes) if !bytes.iter().all(u8::is_ascii_whitespace) => Ok(serde_json::from_slice(&bytes)?),
            _ => Ok(VecDeque::new()),
        }
    }

    fn try_record(&self, entry: LogEntry) -> io::Result<()> {
        let mut entries = self.load()?;
        let bytes = push_bounded(&mut entries, entry, self.max_size)?;
        fs::write(&self.path, bytes)?;
        debug!(path = %self.path.display(), entries = entries.len(), "history saved");
        Ok(())
    }
}

impl History for JsonHistory {
    fn record(&mut self, entry: LogEntry) -> Result<()> {
        self.try_record(entry)
            .map_err(|e| CalcError::storage_failure(&self.path, e))
    }
}

/// The store as a flat text file, one `[timestamp] CATEGORY: content` line
/// per entry. Evicts whole lines from the front.
pub struct TextHistory {
    path: PathBuf,
    max_size: u64,
}

fn format_line(entry: &LogEntry) -> String {
    format!(
        "[{}] {}: {}\n",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        entry.category,
        entry.content.replace('\n', "\\n")
    )
}

impl TextHistory {
    pub fn new(path: impl Into<PathBuf>, max_size: u64) -> Self {
        Self {
            path: path.into(),
            max_size,
        }
    }

    pub fn lines(&self) -> Result<Vec<String>> {
        let text = self.read_text()
            .map_err(|e| CalcError::storage_failure(&self.path, e))?;
        Ok(text.lines().map(str::to_string).collect())
    }

    fn read_text(&self) -> io::Result<String> {
        match read_if_present(&self.path)? {
            Some(bytes) => String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            None => Ok(String::new()),
        }
    }

    fn try_record(&self, entry: LogEntry) -> io::Result<()> {
        let line = format_line(&entry);
        let current = match fs::metadata(&self.path) {
            Ok(metadata) => metadata.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e),
        };

        if current + line.len() as u64 <= self.max_size {
            let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
            return file.write_all(line.as_bytes());
        }

        let text = self.read_text()?;
        let mut lines: VecDeque<&str> = text.lines().collect();
        lines.push_back(line.trim_end_matches('\n'));

        let mut size: u64 = lines.iter().map(|l| l.len() as u64 + 1).sum();
        let mut evicted = 0;
        while size > self.max_size {
            let Some(oldest) = lines.pop_front() else {
                break;
            };
            size -= oldest.len() as u64 + 1;
            evicted += 1;
        }
        debug!(path = %self.path.display(), evicted, remaining = lines.len(), "history trimmed");

        let mut trimmed = String::with_capacity(size as usize);
        for kept in lines {
            trimmed.push_str(kept);
            trimmed.push('\n');
        }
        fs::write(&self.path, trimmed)
    }
}

impl History for TextHistory {
    fn record(&mut self, entry: LogEntry) -> Result<()> {
        self.try_record(entry)
            .map_err(|e| CalcError::storage_failure(&self.path, e))
    }
}
