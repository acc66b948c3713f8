//! Audit log — append-only text history of security-relevant actions.
//!
//! Each event is one line in `<data_dir>/audit.log`:
//!
//! ```text
//! [2024-05-01 13:37:00] ADD: Credential for GitHub added
//! ```
//!
//! Designed for graceful degradation: if the log can't be written, the
//! failure is reported through `tracing` and the operation continues.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::Local;
use regex::Regex;
use tracing::warn;

use crate::fsutil;

/// File name of the audit log inside the data directory.
pub const LOG_FILE: &str = "audit.log";

/// Timestamp format used in each line.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single parsed audit line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub timestamp: String,
    pub action: String,
    pub details: String,
}

/// Append-only audit log stored as text.
#[derive(Debug, Clone)]
pub struct AuditService {
    path: PathBuf,
}

impl AuditService {
    /// Audit log living in `data_dir`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(LOG_FILE),
        }
    }

    /// Returns the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record an event.  Fire-and-forget: failures are logged, never returned.
    pub fn log_event(&self, action: &str, details: &str) {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let line = format_line(&timestamp, action, details);
        if let Err(e) = self.append(&line) {
            warn!(path = %self.path.display(), error = %e, "failed to write audit log");
        }
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let created = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if created {
            fsutil::restrict_permissions(&self.path);
        }
        file.write_all(line.as_bytes())
    }

    /// The last `limit` well-formed entries, newest first.
    ///
    /// Malformed lines are skipped.  A missing or unreadable log yields an
    /// empty list.
    pub fn get_parsed_logs(&self, limit: usize) -> Vec<AuditEntry> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read audit log");
                return Vec::new();
            }
        };

        let lines: Vec<&str> = content.lines().collect();
        let start = lines.len().saturating_sub(limit);
        lines[start..]
            .iter()
            .rev()
            .filter_map(|line| parse_line(line))
            .collect()
    }
}

/// Render one log line, including the trailing newline.
///
/// Newlines inside `details` are flattened so one event stays one line.
fn format_line(timestamp: &str, action: &str, details: &str) -> String {
    let details = details.replace(['\r', '\n'], " ");
    format!("[{timestamp}] {}: {details}\n", action.to_uppercase())
}

fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\[(.*?)\] (.*?): (.*)$").expect("valid audit pattern"))
}

/// Parse a single line with the `[timestamp] ACTION: details` grammar.
pub fn parse_line(line: &str) -> Option<AuditEntry> {
    let caps = line_pattern().captures(line.trim_end_matches(['\r', '\n']))?;
    Some(AuditEntry {
        timestamp: caps[1].to_string(),
        action: caps[2].to_string(),
        details: caps[3].to_string(),
    })
}
