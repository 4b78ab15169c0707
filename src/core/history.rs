//! Project history and operational log.
//!
//! Both sequences are append-only: entries are never removed, reordered or
//! edited in place. The recorder functions take the project by value and hand
//! back a new value extended by exactly one entry, so callers can thread them
//! through an update the same way they thread any other whole-value change.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::project::Project;

/// A user-visible milestone in the life of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique entry ID
    pub id: Uuid,
    /// Human-readable event text
    pub event: String,
    /// When the event was recorded
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create a new history entry stamped with the current time.
    pub fn new(event: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), event: event.into(), timestamp: Utc::now() }
    }
}

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational progress message
    Info,
    /// An operation completed successfully
    Success,
    /// Something was skipped or cancelled
    Warning,
    /// An operation failed
    Error,
}

impl Severity {
    /// Short label used when rendering the log.
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// An operational message shown in the project log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unique entry ID
    pub id: Uuid,
    /// Message text
    pub message: String,
    /// Severity of the message
    pub severity: Severity,
    /// When the message was recorded
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Create a new log entry stamped with the current time.
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self { id: Uuid::new_v4(), message: message.into(), severity, timestamp: Utc::now() }
    }

    /// Format as a single terminal line.
    pub fn display_line(&self) -> String {
        format!("[{}] {:<7} {}", self.timestamp.format("%H:%M:%S"), self.severity, self.message)
    }
}

/// Append a history entry to the project, if one is attached.
pub fn add_history(project: Option<Project>, event: impl Into<String>) -> Option<Project> {
    project.map(|mut project| {
        project.history.push(HistoryEntry::new(event));
        project
    })
}

/// Append a log entry to the project, if one is attached.
pub fn add_log(
    project: Option<Project>,
    message: impl Into<String>,
    severity: Severity,
) -> Option<Project> {
    project.map(|mut project| {
        project.logs.push(LogEntry::new(message, severity));
        project
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_history_appends() {
        let project = Project::new("PicoCPU", "/tmp/PicoCPU");
        let project = add_history(Some(project), "first");
        let project = add_history(project, "second").unwrap();

        let events: Vec<_> = project.history.iter().map(|h| h.event.as_str()).collect();
        assert_eq!(events, vec!["first", "second"]);
        assert_ne!(project.history[0].id, project.history[1].id);
        assert!(project.history[0].timestamp <= project.history[1].timestamp);
    }

    #[test]
    fn test_add_log_appends_with_severity() {
        let project = Project::new("PicoCPU", "/tmp/PicoCPU");
        let project = add_log(Some(project), "cancelled", Severity::Warning).unwrap();

        assert_eq!(project.logs.len(), 1);
        assert_eq!(project.logs[0].severity, Severity::Warning);
        assert_eq!(project.logs[0].message, "cancelled");
        assert!(project.history.is_empty());
    }

    #[test]
    fn test_no_project_is_noop() {
        assert!(add_history(None, "ignored").is_none());
        assert!(add_log(None, "ignored", Severity::Error).is_none());
    }

    #[test]
    fn test_severity_serialization() {
        let json = serde_json::to_string(&Severity::Success).unwrap();
        assert_eq!(json, "\"success\"");
        let parsed: Severity = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(parsed, Severity::Warning);
    }

    #[test]
    fn test_display_line() {
        let entry = LogEntry::new("Project saved successfully.", Severity::Success);
        let line = entry.display_line();
        assert!(line.contains("success"));
        assert!(line.ends_with("Project saved successfully."));
    }
}
