//! In-memory collaborators.
//!
//! Used by the CLI demo and by tests. The repository keeps projects in a
//! mutex-guarded list; the generation service returns a fixed UART plan
//! after a configurable delay.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use async_trait::async_trait;
use parking_lot::Mutex;

use super::plan::{
    FeatureEntry, PdfCoverageRow, PlanSourceData, PortInfo, RegisterInfo, RegisterValueCoverage,
    ScoreboardAndChecker, TestCase, TestcaseRange, Traceability,
};
use super::{GenerationService, ProjectRepository};
use crate::core::{HistoryEntry, LogEntry, Project, Severity, SheetSet, UploadedFile};

/// Project repository backed by a list in memory.
#[derive(Debug)]
pub struct InMemoryProjectRepository {
    root: PathBuf,
    projects: Mutex<Vec<Project>>,
    latency: Duration,
}

impl InMemoryProjectRepository {
    /// Create an empty repository placing projects under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), projects: Mutex::new(Vec::new()), latency: Duration::ZERO }
    }

    /// Create a repository holding the two sample projects.
    pub fn with_samples(root: impl Into<PathBuf>) -> Self {
        let repository = Self::new(root);
        {
            let mut projects = repository.projects.lock();
            projects.push(riscv_sample(&repository.root));
            projects.push(axi_sample(&repository.root));
        }
        repository
    }

    /// Delay every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of stored projects.
    pub fn len(&self) -> usize {
        self.projects.lock().len()
    }

    /// Whether the repository is empty.
    pub fn is_empty(&self) -> bool {
        self.projects.lock().is_empty()
    }

    /// Copy of a stored project, without simulated latency.
    pub fn get(&self, name: &str) -> Option<Project> {
        self.projects.lock().iter().find(|p| p.name == name).cloned()
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn list_projects(&self) -> anyhow::Result<Vec<Project>> {
        self.delay().await;
        Ok(self.projects.lock().clone())
    }

    async fn get_project_details(&self, name: &str) -> anyhow::Result<Project> {
        self.delay().await;
        self.get(name).with_context(|| format!("Project not found: {}", name))
    }

    async fn create_project(&self, name: &str) -> anyhow::Result<Project> {
        self.delay().await;
        let mut projects = self.projects.lock();
        if projects.iter().any(|p| p.name == name) {
            bail!("Project '{}' already exists", name);
        }
        let project = Project::new(name, self.root.join(name));
        projects.push(project.clone());
        tracing::debug!(project = name, "Project stored");
        Ok(project)
    }

    async fn upload_files(&self, project: &str, files: &[UploadedFile]) -> anyhow::Result<()> {
        self.delay().await;
        let mut projects = self.projects.lock();
        let stored = projects
            .iter_mut()
            .find(|p| p.name == project)
            .with_context(|| format!("Project not found: {}", project))?;
        for file in files {
            if !stored.has_spec_file(&file.name) {
                stored.spec_files.push(file.clone());
            }
        }
        Ok(())
    }

    async fn save_project(&self, project: &Project) -> anyhow::Result<()> {
        self.delay().await;
        let mut projects = self.projects.lock();
        match projects.iter_mut().find(|p| p.name == project.name) {
            Some(stored) => *stored = project.clone(),
            None => projects.push(project.clone()),
        }
        Ok(())
    }
}

fn riscv_sample(root: &Path) -> Project {
    let name = "RISC-V_Core_Verification";
    let mut project = Project::new(name, root.join(name));
    project.spec_files.push(UploadedFile::spec("ISA_Spec_v2.2.pdf"));
    project.spec_files.push(UploadedFile::spec("Privileged_Spec.pdf"));
    project.sheets = Some(SheetSet::from_plan(&sample_plan()));

    project.history.push(HistoryEntry::new("Project \"RISC-V_Core_Verification\" created."));
    project.history.push(HistoryEntry::new("Verification Plan generated."));
    project
        .logs
        .push(LogEntry::new("Verification Plan generated successfully.", Severity::Success));
    project
}

fn axi_sample(root: &Path) -> Project {
    let name = "AXI_Bus_Interconnect_Test";
    let mut project = Project::new(name, root.join(name));
    project.spec_files.push(UploadedFile::spec("AXI4_Protocol_Spec.pdf"));
    project
}

/// Generation service returning a fixed plan.
#[derive(Debug, Clone)]
pub struct SampleGenerationService {
    plan_delay: Duration,
    testbench_delay: Duration,
}

impl Default for SampleGenerationService {
    fn default() -> Self {
        Self::new(Duration::from_millis(2500), Duration::from_millis(3000))
    }
}

impl SampleGenerationService {
    /// Create a service answering after the given delays.
    pub fn new(plan_delay: Duration, testbench_delay: Duration) -> Self {
        Self { plan_delay, testbench_delay }
    }

    /// A service that answers immediately.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }
}

#[async_trait]
impl GenerationService for SampleGenerationService {
    fn name(&self) -> &str {
        "sample"
    }

    async fn generate_verification_plan(&self, project: &str) -> anyhow::Result<PlanSourceData> {
        tracing::debug!(project, "Generating sample verification plan");
        tokio::time::sleep(self.plan_delay).await;
        Ok(sample_plan())
    }

    async fn generate_testbench(&self, project: &str) -> anyhow::Result<bool> {
        tracing::debug!(project, "Generating sample testbench");
        tokio::time::sleep(self.testbench_delay).await;
        Ok(true)
    }
}

/// Verification plan data for a small UART block.
pub fn sample_plan() -> PlanSourceData {
    let tx = FeatureEntry {
        feature_id: "F001".into(),
        feature_name: "UART Transmit".into(),
        sub_feature: "Frame Generation".into(),
        spec_version: "1.0".into(),
        requirement_location: "Section 3.1, p.12".into(),
        description: "Serialize a byte into start, data, parity and stop bits".into(),
        verification_goal: "Every configured frame format is transmitted correctly".into(),
        test_type: "Directed + Random".into(),
        coverage_method: "Functional coverage".into(),
        uvm_components: "uart_tx_agent, uart_scoreboard".into(),
        pass_fail_criteria: "Received frame matches the written byte".into(),
        sequences_coverage: "uart_tx_seq".into(),
        link_register_value_coverage: "LCR".into(),
        link_register_coverage_info: "LCR, THR".into(),
        traceability: Traceability {
            test_name: "uart_tx_test".into(),
            sequence_name: "uart_tx_seq".into(),
            agent_name: "uart_tx_agent".into(),
            covergroup_name: "cg_uart_frame".into(),
        },
        test_case_coverage: "TC_TX_001, TC_TX_002".into(),
        target_register: "THR: holds the byte to send".into(),
        link_coverage: "cg_uart_frame".into(),
        testcase_range: TestcaseRange {
            min: "5 data bits".into(),
            mid: "7 data bits".into(),
            max: "8 data bits".into(),
        },
        testcase_design: "Sweep word length and parity".into(),
        testcase_steps: "Configure LCR; write THR; sample TX line".into(),
        testcase_inputs: "LCR, THR".into(),
        testcase_outputs: "TX serial line".into(),
        constraints: "Baud divisor > 0".into(),
        randomization: "Random data bytes to hit all bit patterns".into(),
        sequence_notes: "Wait for THRE before each write".into(),
        scoreboard: ScoreboardAndChecker {
            scoreboard_checks: "Compare written and received bytes".into(),
            new_checkers: "Stop bit checker".into(),
        },
        link_test_cases: "TC_TX_001".into(),
        link_ports: "tx".into(),
        link_pdf_coverage: "1".into(),
        ports: vec![PortInfo {
            feature_id: "F001".into(),
            feature_name: "UART Transmit".into(),
            sub_feature: "Frame Generation".into(),
            port_name: "tx".into(),
            direction: "output".into(),
            width: "1".into(),
            description: "Serial transmit line".into(),
            randomization: "None".into(),
            constraints: "Idle high".into(),
            related_test_types: "Directed".into(),
        }],
        test_cases: vec![TestCase {
            feature_id: "F001".into(),
            feature_name: "UART Transmit".into(),
            sub_feature: "Frame Generation".into(),
            name: "TC_TX_001".into(),
            scenario: "Transmit one byte with 8N1".into(),
            trace_test_name: "uart_tx_test".into(),
            trace_sequence_name: "uart_tx_seq".into(),
            trace_agent_name: "uart_tx_agent".into(),
            trace_covergroup_name: "cg_uart_frame".into(),
            inputs: "0xA5".into(),
            expected_outputs: "Frame 0 10100101 1".into(),
            steps: "Write 0xA5 to THR".into(),
            constraints: "None".into(),
            scoreboard_checks: "Byte match".into(),
        }],
        register_value_coverage: vec![RegisterValueCoverage {
            feature_id: "F001".into(),
            feature_name: "UART Transmit".into(),
            sub_feature: "Frame Generation".into(),
            register_names: "LCR".into(),
            covergroups: "cg_lcr".into(),
            valid_values: "0x00-0x3F".into(),
            invalid_values: "None".into(),
            bin_name: "word_length".into(),
            bin_values: "[0:3]".into(),
            bin_type: "bins".into(),
            bin_description: "Data bits 5 to 8".into(),
            cross_name: "wl_x_parity".into(),
            cross_description: "Word length crossed with parity".into(),
        }],
        registers: vec![RegisterInfo {
            feature_id: "F001".into(),
            feature_name: "UART Transmit".into(),
            sub_feature: "Frame Generation".into(),
            register_name: "THR".into(),
            address: "0x00".into(),
            access: "WO".into(),
            reset_value: "0x00".into(),
            fields: "DATA[7:0]".into(),
            description: "Transmit holding register".into(),
            related_test_cases: "TC_TX_001".into(),
        }],
    };

    let rx = FeatureEntry {
        feature_id: "F002".into(),
        feature_name: "UART Receive".into(),
        sub_feature: "Frame Sampling".into(),
        spec_version: "1.0".into(),
        requirement_location: "Section 3.2, p.15".into(),
        description: "Sample the RX line and assemble received bytes".into(),
        verification_goal: "Frames are decoded and framing errors flagged".into(),
        test_type: "Random".into(),
        coverage_method: "Functional + assertion coverage".into(),
        uvm_components: "uart_rx_agent, uart_scoreboard".into(),
        pass_fail_criteria: "RBR matches the driven byte; LSR flags errors".into(),
        sequences_coverage: "uart_rx_seq".into(),
        link_register_value_coverage: "LSR".into(),
        link_register_coverage_info: "RBR, LSR".into(),
        traceability: Traceability {
            test_name: "uart_rx_test".into(),
            sequence_name: "uart_rx_seq".into(),
            agent_name: "uart_rx_agent".into(),
            covergroup_name: "cg_uart_rx".into(),
        },
        test_case_coverage: "TC_RX_001".into(),
        target_register: "RBR: holds the received byte".into(),
        link_coverage: "cg_uart_rx".into(),
        testcase_range: TestcaseRange {
            min: "1 frame".into(),
            mid: "16 frames".into(),
            max: "FIFO full".into(),
        },
        testcase_design: "Drive frames with random gaps".into(),
        testcase_steps: "Drive RX; poll LSR; read RBR".into(),
        testcase_inputs: "RX serial line".into(),
        testcase_outputs: "RBR, LSR".into(),
        constraints: "Gap between frames >= 1 bit".into(),
        randomization: "Random data and inter-frame gaps".into(),
        sequence_notes: "Inject a bad stop bit in 10% of frames".into(),
        scoreboard: ScoreboardAndChecker {
            scoreboard_checks: "Compare driven and read bytes".into(),
            new_checkers: "Framing error checker".into(),
        },
        link_test_cases: "TC_RX_001".into(),
        link_ports: "rx".into(),
        link_pdf_coverage: "2".into(),
        ports: vec![PortInfo {
            feature_id: "F002".into(),
            feature_name: "UART Receive".into(),
            sub_feature: "Frame Sampling".into(),
            port_name: "rx".into(),
            direction: "input".into(),
            width: "1".into(),
            description: "Serial receive line".into(),
            randomization: "Data and timing".into(),
            constraints: "Idle high".into(),
            related_test_types: "Random".into(),
        }],
        test_cases: vec![TestCase {
            feature_id: "F002".into(),
            feature_name: "UART Receive".into(),
            sub_feature: "Frame Sampling".into(),
            name: "TC_RX_001".into(),
            scenario: "Receive a burst of random frames".into(),
            trace_test_name: "uart_rx_test".into(),
            trace_sequence_name: "uart_rx_seq".into(),
            trace_agent_name: "uart_rx_agent".into(),
            trace_covergroup_name: "cg_uart_rx".into(),
            inputs: "16 random bytes".into(),
            expected_outputs: "Same bytes in RBR order".into(),
            steps: "Drive frames; read RBR after each DR".into(),
            constraints: "No overrun".into(),
            scoreboard_checks: "Byte match, no spurious errors".into(),
        }],
        register_value_coverage: Vec::new(),
        registers: vec![RegisterInfo {
            feature_id: "F002".into(),
            feature_name: "UART Receive".into(),
            sub_feature: "Frame Sampling".into(),
            register_name: "LSR".into(),
            address: "0x14".into(),
            access: "RO".into(),
            reset_value: "0x60".into(),
            fields: "DR[0], OE[1], PE[2], FE[3]".into(),
            description: "Line status register".into(),
            related_test_cases: "TC_RX_001".into(),
        }],
    };

    PlanSourceData {
        features: vec![tx, rx],
        pdf_coverage: vec![
            PdfCoverageRow {
                chunk_id: 1,
                page: 12,
                lines: "1-40".into(),
                text: "The transmitter serializes data written to THR...".into(),
                features_covered: "F001".into(),
            },
            PdfCoverageRow {
                chunk_id: 2,
                page: 15,
                lines: "1-52".into(),
                text: "The receiver samples RX at 16x the baud rate...".into(),
                features_covered: "F002".into(),
            },
        ],
    }
}
