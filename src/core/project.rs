//! Project data model.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::history::{HistoryEntry, LogEntry};
use super::sheet::SheetSet;

/// Kind of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    /// A design specification (PDF, markdown, ...)
    Spec,
    /// A simulator or tool log
    Log,
}

/// Descriptor of a file uploaded to a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UploadedFile {
    /// File name, used as identity
    pub name: String,
    /// What the file is
    pub kind: FileKind,
}

impl UploadedFile {
    /// Descriptor for a specification file.
    pub fn spec(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: FileKind::Spec }
    }

    /// Descriptor for a log file.
    pub fn log(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: FileKind::Log }
    }
}

/// A verification project.
///
/// The workspace holds the current project behind an `Arc` and replaces it
/// wholesale on every change, so a `Project` handed out in a snapshot never
/// changes underneath its reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project name (unique within a repository)
    pub name: String,
    /// Storage location of the project
    pub location: PathBuf,
    /// Uploaded specification files
    #[serde(default)]
    pub spec_files: Vec<UploadedFile>,
    /// Milestones, oldest first
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    /// Operational messages, oldest first
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    /// Committed verification plan sheets, absent until generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheets: Option<SheetSet>,
}

impl Project {
    /// Create an empty project.
    pub fn new(name: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            spec_files: Vec::new(),
            history: Vec::new(),
            logs: Vec::new(),
            sheets: None,
        }
    }

    /// Check whether a spec file with this exact name is already known.
    pub fn has_spec_file(&self, name: &str) -> bool {
        self.spec_files.iter().any(|f| f.name == name)
    }

    /// Whether a verification plan has been generated.
    pub fn has_plan(&self) -> bool {
        self.sheets.is_some()
    }
}

/// Simulator used for runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Simulator {
    /// Synopsys VCS
    #[default]
    #[serde(rename = "VCS")]
    Vcs,
    /// Siemens QuestaSim
    QuestaSim,
    /// Anything else
    Other,
}

impl fmt::Display for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vcs => f.write_str("VCS"),
            Self::QuestaSim => f.write_str("QuestaSim"),
            Self::Other => f.write_str("Other"),
        }
    }
}

/// Simulator settings for the session.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorSettings {
    /// Which simulator to drive
    pub simulator: Simulator,
    /// Licence or API key for the simulator service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl fmt::Debug for SimulatorSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatorSettings")
            .field("simulator", &self.simulator)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
