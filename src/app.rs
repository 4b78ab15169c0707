//! Workspace state and lifecycle management.
//!
//! This module contains the `Workspace` struct that owns all session state
//! and coordinates between the lifecycle, the draft editor, background
//! operations, and the external collaborators.
//!
//! Every mutating operation has the same shape: check preconditions, call
//! the collaborator or start a background task, update the status, record
//! history and log entries, and hand back a fresh [`WorkspaceSnapshot`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::core::{
    add_history, add_log, CellValue, Config, DraftEditor, FileKind, Lifecycle, OperationController,
    OperationEvent, OperationId, OperationKind, OperationOutput, Project, Resolution, Role,
    Severity, SheetName, SheetSet, SimulatorSettings, Status, UploadedFile, View, WorkspaceError,
    WorkspaceResult,
};
use crate::service::{
    GenerationService, InMemoryProjectRepository, ProjectRepository, SampleGenerationService,
};

/// Immutable view of the workspace for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceSnapshot {
    /// Current lifecycle status
    pub status: Status,

    /// The attached project
    pub project: Option<Arc<Project>>,

    /// Uncommitted sheet edits
    pub draft: Option<Arc<SheetSet>>,

    /// Operations currently in flight
    pub running: Vec<OperationKind>,

    /// Last simulation progress, while a run is in flight
    pub simulation_progress: Option<u8>,
}

impl WorkspaceSnapshot {
    /// Whether there are uncommitted sheet edits.
    pub fn has_changes(&self) -> bool {
        self.draft.is_some()
    }

    /// Whether any operation is in flight.
    pub fn is_busy(&self) -> bool {
        !self.running.is_empty()
    }

    /// The sheets to show: the draft when present, else the committed set.
    pub fn active_sheets(&self) -> Option<&SheetSet> {
        self.draft.as_deref().or_else(|| self.project.as_ref().and_then(|p| p.sheets.as_ref()))
    }
}

/// Outcome of applying one background event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationUpdate {
    /// Simulation progress
    Progress { kind: OperationKind, percent: u8 },
    /// Result applied to the project
    Succeeded(OperationKind),
    /// Failure recorded in the project log
    Failed { kind: OperationKind, message: String },
    /// Result of a cancelled or superseded task, ignored
    Suppressed(OperationKind),
}

/// Main workspace state.
///
/// The `Workspace` is the single owner of session state. It manages:
/// - The lifecycle status
/// - The attached project (replaced wholesale on every change)
/// - The verification plan draft
/// - Background operations and their results
pub struct Workspace {
    config: Config,
    repository: Arc<dyn ProjectRepository>,
    generator: Arc<dyn GenerationService>,
    lifecycle: Lifecycle,
    project: Option<Arc<Project>>,
    editor: DraftEditor,
    operations: OperationController,
    settings: SimulatorSettings,
    known_projects: Vec<Project>,
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("status", &self.lifecycle.status())
            .field("project", &self.project.as_ref().map(|p| p.name.as_str()))
            .field("has_changes", &self.editor.has_changes())
            .field("operations", &self.operations)
            .field("generator", &self.generator.name())
            .finish()
    }
}

impl Workspace {
    /// Create a workspace over the given collaborators.
    pub fn new(
        config: Config,
        repository: Arc<dyn ProjectRepository>,
        generator: Arc<dyn GenerationService>,
    ) -> Self {
        let operations = OperationController::new(config.operations.timeout());
        let settings =
            SimulatorSettings {
                simulator: config.general.simulator,
                ..SimulatorSettings::default()
            };
        Self {
            config,
            repository,
            generator,
            lifecycle: Lifecycle::new(),
            project: None,
            editor: DraftEditor::new(),
            operations,
            settings,
            known_projects: Vec::new(),
        }
    }

    /// Create a workspace over the in-memory sample collaborators.
    pub fn with_samples(config: Config) -> Self {
        let repository = InMemoryProjectRepository::with_samples(&config.general.projects_dir);
        Self::new(config, Arc::new(repository), Arc::new(SampleGenerationService::default()))
    }

    // --- Accessors ---

    /// Current lifecycle status.
    pub fn status(&self) -> Status {
        self.lifecycle.status()
    }

    /// The attached project.
    pub fn project(&self) -> Option<&Arc<Project>> {
        self.project.as_ref()
    }

    /// Whether there are uncommitted sheet edits.
    pub fn has_changes(&self) -> bool {
        self.editor.has_changes()
    }

    /// The sheets to show or export: the draft when present, else the committed set.
    pub fn active_sheets(&self) -> Option<&SheetSet> {
        self.editor.active(self.project.as_ref().and_then(|p| p.sheets.as_ref()))
    }

    /// Whether an operation of this kind is in flight.
    pub fn is_running(&self, kind: OperationKind) -> bool {
        self.operations.is_running(kind)
    }

    /// How long the operation of this kind has been running.
    pub fn elapsed(&self, kind: OperationKind) -> Option<Duration> {
        self.operations.elapsed(kind)
    }

    /// Last progress of the running simulation.
    pub fn simulation_progress(&self) -> Option<u8> {
        self.operations.progress(OperationKind::Simulation)
    }

    /// Whether a view can be opened at the current status.
    pub fn is_view_reachable(&self, view: View) -> bool {
        self.lifecycle.is_view_reachable(view)
    }

    /// Current simulator settings.
    pub fn settings(&self) -> &SimulatorSettings {
        &self.settings
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Projects returned by the last [`Workspace::list_projects`].
    pub fn known_projects(&self) -> &[Project] {
        &self.known_projects
    }

    /// Immutable view of the current state.
    pub fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            status: self.lifecycle.status(),
            project: self.project.clone(),
            draft: self.editor.draft().cloned(),
            running: self.operations.running(),
            simulation_progress: self.simulation_progress(),
        }
    }

    // --- Session ---

    /// Pick a role on the role selection screen.
    pub fn select_role(&mut self, role: Role) -> WorkspaceSnapshot {
        self.lifecycle.select_role(role);
        tracing::info!(role = ?role, "Role selected");
        self.snapshot()
    }

    /// Complete user sign-in.
    pub fn login(&mut self) -> WorkspaceResult<WorkspaceSnapshot> {
        if self.status() != Status::Auth {
            return Err(WorkspaceError::validation("select the user role before signing in"));
        }
        self.lifecycle.login();
        tracing::info!("User signed in");
        Ok(self.snapshot())
    }

    /// Complete admin sign-in.
    pub fn admin_login(&mut self) -> WorkspaceResult<WorkspaceSnapshot> {
        if self.status() != Status::AdminAuth {
            return Err(WorkspaceError::validation("select the admin role before signing in"));
        }
        self.lifecycle.admin_login();
        tracing::info!("Admin signed in");
        Ok(self.snapshot())
    }

    /// Sign out and detach the project.
    pub fn logout(&mut self) -> WorkspaceSnapshot {
        self.detach();
        self.lifecycle.logout();
        tracing::info!("Signed out");
        self.snapshot()
    }

    /// Go back to the role selection screen.
    pub fn back_to_role_selection(&mut self) -> WorkspaceSnapshot {
        self.logout()
    }

    /// Detach the project and return to the welcome view.
    pub fn return_to_welcome(&mut self) -> WorkspaceSnapshot {
        self.detach();
        self.lifecycle.return_to_welcome();
        self.snapshot()
    }

    /// Update simulator settings.
    pub fn update_settings(&mut self, settings: SimulatorSettings) {
        tracing::info!(simulator = %settings.simulator, "Simulator settings updated");
        self.settings = settings;
    }

    // --- Projects ---

    /// Refresh the list of known projects.
    pub async fn list_projects(&mut self) -> WorkspaceResult<&[Project]> {
        let projects = self.repository.list_projects().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to list projects");
            WorkspaceError::collaborator(&e)
        })?;
        self.known_projects = projects;
        Ok(&self.known_projects)
    }

    /// Create a project and attach it.
    pub async fn create_project(&mut self, name: &str) -> WorkspaceResult<WorkspaceSnapshot> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WorkspaceError::validation("project name must not be empty"));
        }

        let project = self.repository.create_project(name).await.map_err(|e| {
            tracing::warn!(project = name, error = %e, "Failed to create project");
            WorkspaceError::collaborator(&e)
        })?;

        self.attach(project, Status::ProjectCreation);
        self.push_history(format!("Project \"{}\" created.", name));
        self.push_log("Project created. Waiting for file uploads.", Severity::Info);
        tracing::info!(project = name, "Project created");
        Ok(self.snapshot())
    }

    /// Load a stored project and attach it.
    ///
    /// The status is derived from what the project already contains.
    pub async fn open_project(&mut self, name: &str) -> WorkspaceResult<WorkspaceSnapshot> {
        let project = self.repository.get_project_details(name).await.map_err(|e| {
            tracing::warn!(project = name, error = %e, "Failed to open project");
            WorkspaceError::collaborator(&e)
        })?;

        let status = if project.has_plan() {
            Status::VpGenerated
        } else if !project.spec_files.is_empty() {
            Status::Dashboard
        } else {
            Status::ProjectCreation
        };

        self.attach(project, status);
        self.push_history(format!("Opened project \"{}\".", name));
        self.push_log(format!("Project \"{}\" loaded successfully.", name), Severity::Success);
        tracing::info!(project = name, status = %status, "Project opened");
        Ok(self.snapshot())
    }

    /// Persist the attached project.
    pub async fn save_project(&mut self) -> WorkspaceResult<WorkspaceSnapshot> {
        let project = Arc::clone(self.require_project()?);

        if let Err(e) = self.repository.save_project(&project).await {
            tracing::warn!(project = %project.name, error = %e, "Failed to save project");
            self.push_log(format!("Failed to save project: {:#}", e), Severity::Error);
            return Err(WorkspaceError::collaborator(&e));
        }

        self.push_history(format!("Project \"{}\" saved.", project.name));
        self.push_log("Project saved successfully.", Severity::Success);
        Ok(self.snapshot())
    }

    /// Add specification files to the attached project.
    ///
    /// Non-spec files and names the project already has are skipped; the
    /// attempt is recorded either way.
    pub async fn upload_spec_files(
        &mut self,
        files: Vec<UploadedFile>,
    ) -> WorkspaceResult<WorkspaceSnapshot> {
        let project = Arc::clone(self.require_project()?);
        if files.is_empty() {
            return Err(WorkspaceError::validation("no files selected"));
        }

        let mut added: Vec<UploadedFile> = Vec::new();
        for file in &files {
            if file.kind == FileKind::Spec
                && !project.has_spec_file(&file.name)
                && !added.iter().any(|f| f.name == file.name)
            {
                added.push(file.clone());
            }
        }

        if !added.is_empty() {
            if let Err(e) = self.repository.upload_files(&project.name, &added).await {
                tracing::warn!(project = %project.name, error = %e, "Upload failed");
                self.push_log(format!("Failed to upload files: {:#}", e), Severity::Error);
                return Err(WorkspaceError::collaborator(&e));
            }
        }

        let attempted = join_names(&files);
        let added_count = added.len();
        let added_names = join_names(&added);
        self.modify_project(|p| p.spec_files.extend(added));

        if self.project.as_ref().is_some_and(|p| !p.spec_files.is_empty()) {
            self.lifecycle.on_files_uploaded();
        }

        self.push_history(format!("Uploaded files: {}", attempted));
        if added_count > 0 {
            self.push_log(
                format!("Successfully uploaded {} file(s): {}", added_count, added_names),
                Severity::Success,
            );
        } else {
            self.push_log(
                format!("No new specification files in upload: {}", attempted),
                Severity::Info,
            );
        }
        tracing::info!(project = %project.name, added = added_count, "Files uploaded");
        Ok(self.snapshot())
    }

    // --- Long-running operations ---

    /// Start verification plan generation.
    pub fn generate_plan(&mut self) -> WorkspaceResult<OperationId> {
        let project = self.require_project()?;
        if project.spec_files.is_empty() {
            return Err(WorkspaceError::validation(
                "upload at least one specification file before generating a plan",
            ));
        }
        if self.editor.has_changes() {
            return Err(WorkspaceError::validation(
                "save or discard pending verification plan edits first",
            ));
        }

        let name = project.name.clone();
        let generator = Arc::clone(&self.generator);
        let id = self.operations.start(OperationKind::PlanGeneration, async move {
            generator.generate_verification_plan(&name).await.map(OperationOutput::Plan)
        })?;
        tracing::info!(id, "Generating verification plan");
        Ok(id)
    }

    /// Cancel verification plan generation.
    pub fn cancel_plan_generation(&mut self) -> bool {
        self.cancel(OperationKind::PlanGeneration)
    }

    /// Start testbench generation.
    pub fn generate_testbench(&mut self) -> WorkspaceResult<OperationId> {
        let project = self.require_project()?;
        if self.editor.has_changes() {
            return Err(WorkspaceError::validation(
                "save or discard pending verification plan edits before generating the testbench",
            ));
        }
        if !self.status().has_reached(Status::VpGenerated) {
            return Err(WorkspaceError::validation(
                "generate the verification plan before the testbench",
            ));
        }

        let name = project.name.clone();
        let generator = Arc::clone(&self.generator);
        let id = self.operations.start(OperationKind::TestbenchGeneration, async move {
            if generator.generate_testbench(&name).await? {
                Ok(OperationOutput::Testbench)
            } else {
                Err(anyhow::anyhow!("generation service could not build the testbench"))
            }
        })?;
        tracing::info!(id, "Generating testbench");
        Ok(id)
    }

    /// Cancel testbench generation.
    pub fn cancel_testbench_generation(&mut self) -> bool {
        self.cancel(OperationKind::TestbenchGeneration)
    }

    /// Start a simulation run.
    pub fn run_simulation(&mut self) -> WorkspaceResult<OperationId> {
        self.require_project()?;
        if !self.status().has_reached(Status::TbAndTestsGenerated) {
            return Err(WorkspaceError::validation(
                "generate the testbench and tests before running a simulation",
            ));
        }

        let id = self.operations.start_simulation(self.config.simulation.clone())?;
        self.lifecycle.on_simulation_started();
        self.push_history("Simulation started.");
        self.push_log(
            format!("Simulation started with {}. Monitor progress here.", self.settings.simulator),
            Severity::Info,
        );
        Ok(id)
    }

    /// Cancel the simulation run.
    pub fn cancel_simulation(&mut self) -> bool {
        self.cancel(OperationKind::Simulation)
    }

    fn cancel(&mut self, kind: OperationKind) -> bool {
        if !self.operations.cancel(kind) {
            return false;
        }
        self.push_log(format!("{} cancelled by user.", kind.label()), Severity::Warning);
        true
    }

    // --- Draft editing ---

    /// Write a value into the draft, creating it from the committed sheets on first edit.
    pub fn edit_cell(
        &mut self,
        sheet: SheetName,
        row: usize,
        column: usize,
        value: impl Into<CellValue>,
    ) -> WorkspaceResult<WorkspaceSnapshot> {
        self.require_project()?;
        let committed = self.project.as_ref().and_then(|p| p.sheets.as_ref());
        self.editor.edit_cell(committed, sheet, row, column, value.into())?;
        Ok(self.snapshot())
    }

    /// Commit the draft as the project's sheets.
    pub fn save_draft(&mut self) -> WorkspaceResult<WorkspaceSnapshot> {
        self.require_project()?;
        let sheets = self.editor.take()?;
        self.modify_project(|p| p.sheets = Some(sheets));
        self.push_history("Verification plan edits saved.");
        self.push_log("Verification plan changes saved.", Severity::Success);
        tracing::info!("Draft committed");
        Ok(self.snapshot())
    }

    /// Drop the draft. Returns whether there was one.
    pub fn discard_draft(&mut self) -> bool {
        let discarded = self.editor.discard();
        if discarded {
            tracing::info!("Draft discarded");
        }
        discarded
    }

    // --- Background events ---

    /// Apply every event that is ready, without waiting.
    pub fn poll_events(&mut self) -> Vec<OperationUpdate> {
        let mut updates = Vec::new();
        while let Some(event) = self.operations.try_next_event() {
            updates.push(self.apply(event));
        }
        updates
    }

    /// Wait for and apply the next event.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_update(&mut self) -> Option<OperationUpdate> {
        let event = self.operations.next_event().await?;
        Some(self.apply(event))
    }

    /// Drive events until the operation of `kind` settles.
    pub async fn wait_for(&mut self, kind: OperationKind) -> WorkspaceResult<WorkspaceSnapshot> {
        if !self.operations.is_running(kind) {
            if self.operations.is_cancelled(kind) {
                return Err(WorkspaceError::Cancelled(kind));
            }
            return Err(WorkspaceError::validation(format!("{} is not running", kind)));
        }

        while let Some(update) = self.next_update().await {
            match update {
                OperationUpdate::Succeeded(done) if done == kind => return Ok(self.snapshot()),
                OperationUpdate::Failed { kind: done, message } if done == kind => {
                    return Err(WorkspaceError::CollaboratorFailure(message));
                }
                _ => {}
            }
            if !self.operations.is_running(kind) && self.operations.is_cancelled(kind) {
                return Err(WorkspaceError::Cancelled(kind));
            }
        }
        Err(WorkspaceError::Cancelled(kind))
    }

    fn apply(&mut self, event: OperationEvent) -> OperationUpdate {
        match self.operations.resolve(event) {
            Resolution::Progress { kind, percent } => OperationUpdate::Progress { kind, percent },
            Resolution::Suppressed { kind } => OperationUpdate::Suppressed(kind),
            Resolution::Completed { kind, result: Ok(output) } => {
                self.complete(output);
                OperationUpdate::Succeeded(kind)
            }
            Resolution::Completed { kind, result: Err(message) } => {
                tracing::warn!(kind = %kind, error = %message, "Operation failed");
                self.push_log(format!("Failed to {}: {}", kind.action(), message), Severity::Error);
                OperationUpdate::Failed { kind, message }
            }
        }
    }

    fn complete(&mut self, output: OperationOutput) {
        match output {
            OperationOutput::Plan(data) => {
                let sheets = SheetSet::from_plan(&data);
                tracing::info!(rows = sheets.total_rows(), "Verification plan generated");
                self.modify_project(|p| p.sheets = Some(sheets));
                self.lifecycle.on_plan_generated();
                self.push_history("Verification Plan generated.");
                self.push_log("Verification Plan generated successfully.", Severity::Success);
            }
            OperationOutput::Testbench => {
                self.lifecycle.on_testbench_generated();
                self.push_history("UVM Testbench & Tests generated.");
                self.push_log(
                    "UVM environment, testbench, and example tests generated.",
                    Severity::Success,
                );
            }
            OperationOutput::Simulation(report) => {
                self.lifecycle.on_simulation_finished();
                self.push_history("Simulation finished. Report is ready.");
                if let Some(detail) = &report.failure_detail {
                    self.push_log(detail.clone(), Severity::Error);
                }
                self.push_log(report.summary(), Severity::Success);
            }
        }
    }

    // --- Helpers ---

    fn require_project(&self) -> WorkspaceResult<&Arc<Project>> {
        self.project.as_ref().ok_or_else(|| WorkspaceError::validation("no project is open"))
    }

    fn attach(&mut self, project: Project, status: Status) {
        self.detach();
        self.project = Some(Arc::new(project));
        self.lifecycle.attach(status);
    }

    fn detach(&mut self) {
        self.operations.cancel_all();
        if self.editor.discard() {
            tracing::debug!("Pending draft dropped with project");
        }
        self.project = None;
    }

    fn modify_project(&mut self, f: impl FnOnce(&mut Project)) {
        if let Some(project) = self.project.take() {
            let mut project = Arc::unwrap_or_clone(project);
            f(&mut project);
            self.project = Some(Arc::new(project));
        }
    }

    fn push_history(&mut self, event: impl Into<String>) {
        let project = self.project.take().map(Arc::unwrap_or_clone);
        self.project = add_history(project, event).map(Arc::new);
    }

    fn push_log(&mut self, message: impl Into<String>, severity: Severity) {
        let project = self.project.take().map(Arc::unwrap_or_clone);
        self.project = add_log(project, message, severity).map(Arc::new);
    }
}

fn join_names(files: &[UploadedFile]) -> String {
    files.iter().map(|f| f.name.as_str()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.general.projects_dir = PathBuf::from("/tmp/nexver-tests");
        config.simulation.seed = Some(5);
        config.simulation.tick_interval_ms = 10;
        config.simulation.finalize_delay_ms = 10;
        config
    }

    fn workspace() -> Workspace {
        let config = test_config();
        let repository = InMemoryProjectRepository::with_samples(&config.general.projects_dir);
        let generator =
            SampleGenerationService::new(Duration::from_millis(100), Duration::from_millis(100));
        Workspace::new(config, Arc::new(repository), Arc::new(generator))
    }

    async fn with_plan() -> Workspace {
        let mut ws = workspace();
        ws.create_project("PicoCPU").await.unwrap();
        ws.upload_spec_files(vec![UploadedFile::spec("spec.pdf")]).await.unwrap();
        ws.generate_plan().unwrap();
        ws.wait_for(OperationKind::PlanGeneration).await.unwrap();
        ws
    }

    #[test]
    fn test_session_transitions() {
        let mut ws = workspace();
        assert_eq!(ws.status(), Status::RoleSelection);
        assert!(ws.login().is_err());

        ws.select_role(Role::User);
        assert_eq!(ws.status(), Status::Auth);
        assert!(ws.admin_login().is_err());
        ws.login().unwrap();
        assert_eq!(ws.status(), Status::Welcome);

        ws.logout();
        assert_eq!(ws.status(), Status::RoleSelection);
        ws.select_role(Role::Admin);
        ws.admin_login().unwrap();
        assert_eq!(ws.status(), Status::AdminPanel);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_project() {
        let mut ws = workspace();
        let snapshot = ws.create_project("PicoCPU").await.unwrap();
        let project = snapshot.project.unwrap();

        assert_eq!(snapshot.status, Status::ProjectCreation);
        assert!(project.spec_files.is_empty());
        assert_eq!(project.history.len(), 1);
        assert_eq!(project.history[0].event, "Project \"PicoCPU\" created.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_project_rejects_blank_and_duplicate() {
        let mut ws = workspace();
        assert!(matches!(ws.create_project("  ").await, Err(WorkspaceError::Validation(_))));

        let err = ws.create_project("AXI_Bus_Interconnect_Test").await.unwrap_err();
        assert!(matches!(err, WorkspaceError::CollaboratorFailure(_)));
        assert!(ws.project().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_project_derives_status() {
        let mut ws = workspace();
        let snapshot = ws.open_project("RISC-V_Core_Verification").await.unwrap();
        assert_eq!(snapshot.status, Status::VpGenerated);

        let snapshot = ws.open_project("AXI_Bus_Interconnect_Test").await.unwrap();
        assert_eq!(snapshot.status, Status::Dashboard);
        let project = snapshot.project.unwrap();
        assert_eq!(
            project.logs.last().unwrap().message,
            "Project \"AXI_Bus_Interconnect_Test\" loaded successfully."
        );

        assert!(ws.open_project("missing").await.is_err());
        assert_eq!(ws.status(), Status::Dashboard);

        // Without spec files a reopened project is where a new one starts.
        ws.create_project("Empty").await.unwrap();
        ws.return_to_welcome();
        let snapshot = ws.open_project("Empty").await.unwrap();
        assert_eq!(snapshot.status, Status::ProjectCreation);
        assert!(!ws.is_view_reachable(View::Dashboard));
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_filters_duplicates_and_logs() {
        let mut ws = workspace();
        ws.create_project("PicoCPU").await.unwrap();

        let snapshot = ws
            .upload_spec_files(vec![
                UploadedFile::spec("spec.pdf"),
                UploadedFile::spec("spec.pdf"),
                UploadedFile::log("run.log"),
            ])
            .await
            .unwrap();
        let project = snapshot.project.unwrap();
        assert_eq!(snapshot.status, Status::Dashboard);
        assert_eq!(project.spec_files, vec![UploadedFile::spec("spec.pdf")]);
        assert_eq!(project.logs.last().unwrap().severity, Severity::Success);

        let snapshot = ws.upload_spec_files(vec![UploadedFile::spec("spec.pdf")]).await.unwrap();
        let project = snapshot.project.unwrap();
        assert_eq!(project.spec_files.len(), 1);
        assert_eq!(project.history.len(), 3);

        assert!(matches!(
            ws.upload_spec_files(Vec::new()).await,
            Err(WorkspaceError::Validation(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_plan_requires_spec_files() {
        let mut ws = workspace();
        assert!(matches!(ws.generate_plan(), Err(WorkspaceError::Validation(_))));
        ws.create_project("PicoCPU").await.unwrap();
        assert!(matches!(ws.generate_plan(), Err(WorkspaceError::Validation(_))));
        assert!(!ws.is_running(OperationKind::PlanGeneration));
    }

    #[tokio::test(start_paused = true)]
    async fn test_plan_generation_commits_sheets() {
        let ws = with_plan().await;
        assert_eq!(ws.status(), Status::VpGenerated);
        let project = ws.project().unwrap();
        assert!(project.has_plan());
        assert_eq!(
            project.logs.last().unwrap().message,
            "Verification Plan generated successfully."
        );
        assert!(ws.is_view_reachable(View::VerificationPlan));
        assert!(!ws.is_view_reachable(View::SimulationReport));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_generation_rejected_while_running() {
        let mut ws = workspace();
        ws.create_project("PicoCPU").await.unwrap();
        ws.upload_spec_files(vec![UploadedFile::spec("spec.pdf")]).await.unwrap();

        ws.generate_plan().unwrap();
        assert!(matches!(ws.generate_plan(), Err(WorkspaceError::Validation(_))));
        assert!(ws.snapshot().is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_plan_generation() {
        let mut ws = workspace();
        ws.create_project("PicoCPU").await.unwrap();
        ws.upload_spec_files(vec![UploadedFile::spec("spec.pdf")]).await.unwrap();
        let logs_before = ws.project().unwrap().logs.len();

        ws.generate_plan().unwrap();
        assert!(ws.cancel_plan_generation());
        assert!(!ws.cancel_plan_generation());
        assert!(matches!(
            ws.wait_for(OperationKind::PlanGeneration).await,
            Err(WorkspaceError::Cancelled(OperationKind::PlanGeneration))
        ));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(
            ws.poll_events(),
            vec![OperationUpdate::Suppressed(OperationKind::PlanGeneration)]
        );

        let project = ws.project().unwrap();
        assert_eq!(ws.status(), Status::Dashboard);
        assert!(!project.has_plan());
        assert_eq!(project.logs.len(), logs_before + 1);
        assert_eq!(project.logs.last().unwrap().severity, Severity::Warning);
    }

    #[tokio::test(start_paused = true)]
    async fn test_testbench_blocked_by_draft() {
        let mut ws = with_plan().await;
        ws.edit_cell(SheetName::VerificationPlan, 0, 0, "Updated").unwrap();

        assert!(matches!(ws.generate_testbench(), Err(WorkspaceError::Validation(_))));
        assert_eq!(ws.status(), Status::VpGenerated);

        ws.save_draft().unwrap();
        ws.generate_testbench().unwrap();
        ws.wait_for(OperationKind::TestbenchGeneration).await.unwrap();
        assert_eq!(ws.status(), Status::TbAndTestsGenerated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_testbench_requires_plan() {
        let mut ws = workspace();
        ws.create_project("PicoCPU").await.unwrap();
        assert!(matches!(ws.generate_testbench(), Err(WorkspaceError::Validation(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_draft_commits() {
        let mut ws = with_plan().await;
        ws.edit_cell(SheetName::TestCases, 1, 3, "TC_RX_renamed").unwrap();
        let draft = ws.snapshot().draft.unwrap();

        let snapshot = ws.save_draft().unwrap();
        assert!(!snapshot.has_changes());
        assert_eq!(snapshot.project.unwrap().sheets.as_ref(), Some(draft.as_ref()));
        assert!(matches!(ws.save_draft(), Err(WorkspaceError::Validation(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_out_of_range() {
        let mut ws = with_plan().await;
        let err = ws.edit_cell(SheetName::VerificationPlan, 99, 0, "x").unwrap_err();
        assert!(matches!(err, WorkspaceError::OutOfRange { row: 99, .. }));
        assert!(!ws.has_changes());
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulation_run() {
        let mut ws = with_plan().await;
        ws.generate_testbench().unwrap();
        ws.wait_for(OperationKind::TestbenchGeneration).await.unwrap();

        ws.run_simulation().unwrap();
        assert_eq!(ws.status(), Status::Simulating);
        assert!(matches!(ws.run_simulation(), Err(WorkspaceError::Validation(_))));

        ws.wait_for(OperationKind::Simulation).await.unwrap();
        assert_eq!(ws.status(), Status::ReportReady);
        let last = ws.project().unwrap().logs.last().unwrap().clone();
        assert_eq!(last.message, "Simulation complete. 1253 passed, 12 failed.");
        assert!(ws.simulation_progress().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_switching_project_drops_draft_and_operations() {
        let mut ws = with_plan().await;
        ws.edit_cell(SheetName::VerificationPlan, 0, 0, "x").unwrap();
        ws.generate_testbench().unwrap_err();

        ws.return_to_welcome();
        assert_eq!(ws.status(), Status::Welcome);
        assert!(ws.project().is_none());
        assert!(!ws.has_changes());
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_project_persists() {
        let mut ws = with_plan().await;
        ws.save_project().await.unwrap();
        ws.return_to_welcome();

        let snapshot = ws.open_project("PicoCPU").await.unwrap();
        assert_eq!(snapshot.status, Status::VpGenerated);
    }
}
