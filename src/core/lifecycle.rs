//! Project lifecycle state machine.
//!
//! The status is an ordinal value along the main pipeline:
//!
//! ```text
//! RoleSelection < Auth = AdminAuth < Welcome < ProjectCreation < Dashboard
//!     < VpGenerated < TbAndTestsGenerated < Simulating < ReportReady
//! ```
//!
//! `AdminPanel` sits outside the pipeline and reaches no workspace view.
//! Forward transitions never move the status backwards; only logout and
//! returning to the welcome view reset it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    /// Choosing between user and admin
    #[default]
    RoleSelection,
    /// User sign-in
    Auth,
    /// Admin sign-in
    AdminAuth,
    /// Signed in, no project open
    Welcome,
    /// A project was just created, nothing uploaded yet
    ProjectCreation,
    /// Spec files uploaded
    Dashboard,
    /// Verification plan generated
    VpGenerated,
    /// Testbench and tests generated
    TbAndTestsGenerated,
    /// Simulation running
    Simulating,
    /// Simulation finished, report available
    ReportReady,
    /// Administration panel, disconnected from the pipeline
    AdminPanel,
}

impl Status {
    /// Position along the main pipeline, or `None` for `AdminPanel`.
    pub fn rank(self) -> Option<u8> {
        match self {
            Self::RoleSelection => Some(0),
            Self::Auth | Self::AdminAuth => Some(1),
            Self::Welcome => Some(2),
            Self::ProjectCreation => Some(3),
            Self::Dashboard => Some(4),
            Self::VpGenerated => Some(5),
            Self::TbAndTestsGenerated => Some(6),
            Self::Simulating => Some(7),
            Self::ReportReady => Some(8),
            Self::AdminPanel => None,
        }
    }

    /// Whether this status is at or past `milestone` on the main pipeline.
    pub fn has_reached(self, milestone: Status) -> bool {
        match (self.rank(), milestone.rank()) {
            (Some(current), Some(target)) => current >= target,
            _ => false,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RoleSelection => "role selection",
            Self::Auth => "sign-in",
            Self::AdminAuth => "admin sign-in",
            Self::Welcome => "welcome",
            Self::ProjectCreation => "project created",
            Self::Dashboard => "files uploaded",
            Self::VpGenerated => "verification plan generated",
            Self::TbAndTestsGenerated => "testbench generated",
            Self::Simulating => "simulating",
            Self::ReportReady => "report ready",
            Self::AdminPanel => "admin panel",
        };
        f.pad(name)
    }
}

/// Workspace views gated by the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum View {
    /// File upload and next steps
    Dashboard,
    /// Verification plan sheets
    VerificationPlan,
    /// Generated testbench and tests
    TestbenchAndTests,
    /// UVM architecture diagram
    UvmArchitecture,
    /// Simulation progress and report
    SimulationReport,
}

impl View {
    /// All views in display order.
    pub const ALL: [View; 5] = [
        View::Dashboard,
        View::VerificationPlan,
        View::TestbenchAndTests,
        View::UvmArchitecture,
        View::SimulationReport,
    ];

    /// The status at which this view becomes reachable.
    pub fn milestone(self) -> Status {
        match self {
            Self::Dashboard => Status::ProjectCreation,
            Self::VerificationPlan => Status::VpGenerated,
            Self::TestbenchAndTests | Self::UvmArchitecture => Status::TbAndTestsGenerated,
            Self::SimulationReport => Status::ReportReady,
        }
    }

    /// Tab label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Upload file",
            Self::VerificationPlan => "Verification Plan",
            Self::TestbenchAndTests => "Testbench & Tests",
            Self::UvmArchitecture => "UVM Architecture",
            Self::SimulationReport => "Simulation & Report",
        }
    }
}

/// Check whether a view can be opened at the given status.
pub fn is_view_reachable(view: View, status: Status) -> bool {
    status.has_reached(view.milestone())
}

/// Role picked on the first screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Regular verification engineer
    User,
    /// Administrator
    Admin,
}

/// Holder of the current status with the allowed transitions.
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    status: Status,
}

impl Lifecycle {
    /// Start at role selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Whether a view can be opened right now.
    pub fn is_view_reachable(&self, view: View) -> bool {
        is_view_reachable(view, self.status)
    }

    /// Move forward to `target` unless the status is already at or past it.
    ///
    /// Returns the status after the call.
    pub fn advance_to(&mut self, target: Status) -> Status {
        let forward = match (self.status.rank(), target.rank()) {
            (Some(current), Some(next)) => next > current,
            _ => false,
        };
        if forward {
            tracing::debug!(from = %self.status, to = %target, "Lifecycle advanced");
            self.status = target;
        }
        self.status
    }

    /// Pick a role on the role selection screen.
    pub fn select_role(&mut self, role: Role) {
        self.status = match role {
            Role::User => Status::Auth,
            Role::Admin => Status::AdminAuth,
        };
    }

    /// Successful user sign-in.
    pub fn login(&mut self) {
        self.status = Status::Welcome;
    }

    /// Successful admin sign-in.
    pub fn admin_login(&mut self) {
        self.status = Status::AdminPanel;
    }

    /// Reset to role selection.
    pub fn logout(&mut self) {
        self.status = Status::RoleSelection;
    }

    /// Reset to the welcome view (new or open project).
    pub fn return_to_welcome(&mut self) {
        self.status = Status::Welcome;
    }

    /// A project was attached; `status` is derived from its contents.
    pub(crate) fn attach(&mut self, status: Status) {
        self.status = status;
    }

    /// At least one spec file is known.
    pub fn on_files_uploaded(&mut self) -> Status {
        self.advance_to(Status::Dashboard)
    }

    /// The verification plan was generated.
    pub fn on_plan_generated(&mut self) -> Status {
        self.advance_to(Status::VpGenerated)
    }

    /// The testbench was generated.
    pub fn on_testbench_generated(&mut self) -> Status {
        self.advance_to(Status::TbAndTestsGenerated)
    }

    /// A simulation run started.
    pub fn on_simulation_started(&mut self) -> Status {
        self.advance_to(Status::Simulating)
    }

    /// A simulation run finished.
    pub fn on_simulation_finished(&mut self) -> Status {
        self.advance_to(Status::ReportReady)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_order() {
        let pipeline = [
            Status::RoleSelection,
            Status::Auth,
            Status::Welcome,
            Status::ProjectCreation,
            Status::Dashboard,
            Status::VpGenerated,
            Status::TbAndTestsGenerated,
            Status::Simulating,
            Status::ReportReady,
        ];
        for pair in pipeline.windows(2) {
            assert!(pair[0].rank() < pair[1].rank(), "{:?} < {:?}", pair[0], pair[1]);
        }
        assert_eq!(Status::Auth.rank(), Status::AdminAuth.rank());
        assert_eq!(Status::AdminPanel.rank(), None);
    }

    #[test]
    fn test_view_reachability() {
        assert!(!is_view_reachable(View::VerificationPlan, Status::Dashboard));
        assert!(is_view_reachable(View::VerificationPlan, Status::VpGenerated));
        assert!(is_view_reachable(View::VerificationPlan, Status::ReportReady));
        assert!(!is_view_reachable(View::UvmArchitecture, Status::VpGenerated));
        assert!(is_view_reachable(View::UvmArchitecture, Status::TbAndTestsGenerated));
        assert!(!is_view_reachable(View::SimulationReport, Status::Simulating));
        assert!(is_view_reachable(View::SimulationReport, Status::ReportReady));
        assert!(is_view_reachable(View::Dashboard, Status::ProjectCreation));
        assert!(!is_view_reachable(View::Dashboard, Status::Welcome));
    }

    #[test]
    fn test_admin_panel_reaches_nothing() {
        for view in View::ALL {
            assert!(!is_view_reachable(view, Status::AdminPanel));
        }
    }

    #[test]
    fn test_advance_never_regresses() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.attach(Status::ReportReady);

        assert_eq!(lifecycle.on_files_uploaded(), Status::ReportReady);
        assert_eq!(lifecycle.on_plan_generated(), Status::ReportReady);
        assert_eq!(lifecycle.on_simulation_started(), Status::ReportReady);
    }

    #[test]
    fn test_forward_transitions() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.select_role(Role::User);
        assert_eq!(lifecycle.status(), Status::Auth);
        lifecycle.login();
        assert_eq!(lifecycle.status(), Status::Welcome);
        lifecycle.attach(Status::ProjectCreation);

        assert_eq!(lifecycle.on_files_uploaded(), Status::Dashboard);
        assert_eq!(lifecycle.on_plan_generated(), Status::VpGenerated);
        assert_eq!(lifecycle.on_testbench_generated(), Status::TbAndTestsGenerated);
        assert_eq!(lifecycle.on_simulation_started(), Status::Simulating);
        assert_eq!(lifecycle.on_simulation_finished(), Status::ReportReady);
    }

    #[test]
    fn test_resets() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.attach(Status::Simulating);
        lifecycle.return_to_welcome();
        assert_eq!(lifecycle.status(), Status::Welcome);

        lifecycle.attach(Status::VpGenerated);
        lifecycle.logout();
        assert_eq!(lifecycle.status(), Status::RoleSelection);
    }

    #[test]
    fn test_admin_flow_is_disconnected() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.select_role(Role::Admin);
        assert_eq!(lifecycle.status(), Status::AdminAuth);
        lifecycle.admin_login();
        assert_eq!(lifecycle.status(), Status::AdminPanel);

        // Pipeline transitions have no effect outside the pipeline.
        assert_eq!(lifecycle.on_plan_generated(), Status::AdminPanel);
    }
}
