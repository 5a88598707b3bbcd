use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Most recent entries kept; older ones are dropped silently.
pub const LOG_CAPACITY: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub time: DateTime<Utc>,
    pub action: String,
    pub message: String,
    pub severity: Severity,
}

/// Append-only, capped event log shown to the user.
///
/// Entries are kept oldest-first. This is application state, not the
/// `log` crate facade.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ActionLog {
    entries: Vec<ActionLogEntry>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, time: DateTime<Utc>, action: &str, message: &str, severity: Severity) {
        self.entries.push(ActionLogEntry {
            time,
            action: action.to_string(),
            message: message.to_string(),
            severity,
        });
        if self.entries.len() > LOG_CAPACITY {
            let excess = self.entries.len() - LOG_CAPACITY;
            self.entries.drain(..excess);
        }
    }

    /// Empty the log, then record that it was cleared.
    pub fn clear(&mut self, time: DateTime<Utc>) {
        self.entries.clear();
        self.append(time, "System", "Action log cleared", Severity::Info);
    }

    pub fn entries(&self) -> &[ActionLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
