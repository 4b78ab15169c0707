//! Core types and functionality for NexVer.
//!
//! This module contains the fundamental data structures used throughout
//! the workspace: projects, the lifecycle, plan sheets and drafts,
//! history and logs, configuration, and background operations.

mod background;
mod config;
mod draft;
mod error;
mod history;
mod lifecycle;
mod project;
mod sheet;
mod simulation;

pub use background::{
    OperationController, OperationEvent, OperationId, OperationKind, OperationOutput, Resolution,
};
pub use config::{Config, GeneralConfig, OperationsConfig, SimulationConfig};
pub use draft::DraftEditor;
pub use error::{WorkspaceError, WorkspaceResult};
pub use history::{add_history, add_log, HistoryEntry, LogEntry, Severity};
pub use lifecycle::{is_view_reachable, Lifecycle, Role, Status, View};
pub use project::{FileKind, Project, Simulator, SimulatorSettings, UploadedFile};
pub use sheet::{CellValue, Sheet, SheetName, SheetSet};
pub use simulation::{ProgressTicker, SimulationReport, COMPLETE};
