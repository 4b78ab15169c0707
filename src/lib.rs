//! # NexVer
//!
//! Workspace core for hardware verification projects.
//!
//! A project moves through a fixed pipeline: specification files are
//! uploaded, a multi-sheet verification plan is generated and edited, a UVM
//! testbench is generated, and a simulation is run to produce a report.
//!
//! ## Features
//!
//! - **Lifecycle**: ordinal status that only moves forward along the pipeline
//! - **Draft editing**: plan edits go to a draft until saved or discarded
//! - **Background operations**: cancellable generation and simulation tasks
//! - **History and logs**: every milestone and failure is recorded on the project
//!
//! ## Quick Start
//!
//! ```bash
//! # Run a scripted session against the sample backend
//! nexver demo --fast
//!
//! # List sample projects
//! nexver projects
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::significant_drop_tightening)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::struct_field_names)]

pub mod app;
pub mod core;
pub mod service;

// Re-export commonly used types
pub use app::{OperationUpdate, Workspace, WorkspaceSnapshot};
pub use core::{
    CellValue, Config, OperationKind, Project, Severity, SheetName, SheetSet, Status,
    UploadedFile, WorkspaceError, WorkspaceResult,
};
pub use service::{GenerationService, PlanSourceData, ProjectRepository};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "nexver";
