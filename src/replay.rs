use std::path::Path;

use thiserror::Error;

use crate::poller::StatusSource;
use crate::status::RawRtkStatus;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {0}: {1}")]
    Json(usize, serde_json::Error),
    #[error("no snapshots in replay file")]
    Empty,
}

/// Replays raw snapshots from a JSON-lines file, one per poll, wrapping
/// around at the end. Stands in for the live message hub in the CLI and
/// in tests.
pub struct ReplaySource {
    lines: Vec<String>,
    next: usize,
}

impl ReplaySource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_str(&content))
    }

    pub fn from_str(content: &str) -> Self {
        let lines = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        ReplaySource { lines, next: 0 }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl StatusSource for ReplaySource {
    type Error = ReplayError;

    async fn get_status(&mut self) -> Result<RawRtkStatus, ReplayError> {
        if self.lines.is_empty() {
            return Err(ReplayError::Empty);
        }
        // Advance past the line even when it fails to parse, so one bad
        // line does not wedge the replay.
        let index = self.next;
        self.next = (self.next + 1) % self.lines.len();
        serde_json::from_str(&self.lines[index]).map_err(|e| ReplayError::Json(index + 1, e))
    }
}
