//! External collaborators of the workspace.
//!
//! The workspace never talks to storage or to the generation backend
//! directly. It goes through the two traits defined here so the backend can
//! be swapped (in-memory samples, a remote service, test doubles).

mod memory;
mod plan;

use async_trait::async_trait;

use crate::core::{Project, UploadedFile};

pub use memory::{sample_plan, InMemoryProjectRepository, SampleGenerationService};
pub use plan::{
    FeatureEntry, PdfCoverageRow, PlanSourceData, PortInfo, RegisterInfo, RegisterValueCoverage,
    ScoreboardAndChecker, TestCase, TestcaseRange, Traceability,
};

/// Project storage.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// All known projects.
    async fn list_projects(&self) -> anyhow::Result<Vec<Project>>;

    /// Full details of one project.
    async fn get_project_details(&self, name: &str) -> anyhow::Result<Project>;

    /// Create an empty project. Fails if the name is taken.
    async fn create_project(&self, name: &str) -> anyhow::Result<Project>;

    /// Store uploaded files with a project.
    async fn upload_files(&self, project: &str, files: &[UploadedFile]) -> anyhow::Result<()>;

    /// Persist a project snapshot.
    async fn save_project(&self, project: &Project) -> anyhow::Result<()>;
}

/// Verification plan and testbench generation backend.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Generate raw verification plan data for a project.
    async fn generate_verification_plan(&self, project: &str) -> anyhow::Result<PlanSourceData>;

    /// Generate the UVM testbench. `Ok(false)` means the backend declined.
    async fn generate_testbench(&self, project: &str) -> anyhow::Result<bool>;
}
