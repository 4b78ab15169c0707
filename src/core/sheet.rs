//! Verification plan sheets.
//!
//! A plan is a fixed set of six named tables. Column order and column
//! descriptions come from a static catalogue, so every sheet in a [`SheetSet`]
//! has the same headers regardless of what the generation service returned.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{WorkspaceError, WorkspaceResult};
use crate::service::PlanSourceData;

/// Names of the sheets in a verification plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SheetName {
    #[serde(rename = "Verification Plan")]
    VerificationPlan,
    #[serde(rename = "Port Information")]
    PortInformation,
    #[serde(rename = "Test Cases")]
    TestCases,
    #[serde(rename = "PDF Coverage")]
    PdfCoverage,
    #[serde(rename = "Register Value Coverage")]
    RegisterValueCoverage,
    #[serde(rename = "Register Coverage Information")]
    RegisterCoverageInformation,
}

impl SheetName {
    /// Number of sheets in a plan.
    pub const COUNT: usize = 6;

    /// All sheets in display order.
    pub const ALL: [SheetName; Self::COUNT] = [
        SheetName::VerificationPlan,
        SheetName::PortInformation,
        SheetName::TestCases,
        SheetName::PdfCoverage,
        SheetName::RegisterValueCoverage,
        SheetName::RegisterCoverageInformation,
    ];

    /// Display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VerificationPlan => "Verification Plan",
            Self::PortInformation => "Port Information",
            Self::TestCases => "Test Cases",
            Self::PdfCoverage => "PDF Coverage",
            Self::RegisterValueCoverage => "Register Value Coverage",
            Self::RegisterCoverageInformation => "Register Coverage Information",
        }
    }

    /// Position within [`SheetName::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Column catalogue: `(header, description)` in column order.
    pub fn columns(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::VerificationPlan => VERIFICATION_PLAN_COLUMNS,
            Self::PortInformation => PORT_INFORMATION_COLUMNS,
            Self::TestCases => TEST_CASES_COLUMNS,
            Self::PdfCoverage => PDF_COVERAGE_COLUMNS,
            Self::RegisterValueCoverage => REGISTER_VALUE_COVERAGE_COLUMNS,
            Self::RegisterCoverageInformation => REGISTER_COVERAGE_INFORMATION_COLUMNS,
        }
    }
}

impl fmt::Display for SheetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SheetName {
    type Err = WorkspaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| WorkspaceError::validation(format!("unknown sheet '{}'", s)))
    }
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(i64),
    Text(String),
}

impl CellValue {
    /// Whether the cell holds nothing visible.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// A named table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    /// Which sheet this is
    pub name: SheetName,
    /// Column headers in order
    pub headers: Vec<String>,
    /// Rows, each aligned to `headers`
    pub rows: Vec<Vec<CellValue>>,
    /// Column header to human-readable description
    pub descriptions: BTreeMap<String, String>,
}

impl Sheet {
    /// An empty sheet with the catalogue headers.
    pub fn empty(name: SheetName) -> Self {
        let columns = name.columns();
        Self {
            name,
            headers: columns.iter().map(|(header, _)| (*header).to_string()).collect(),
            rows: Vec::new(),
            descriptions: columns
                .iter()
                .map(|(header, description)| ((*header).to_string(), (*description).to_string()))
                .collect(),
        }
    }

    /// Build a sheet from rows; short rows are padded with blank cells and
    /// long rows truncated to the header width.
    pub fn with_rows(name: SheetName, rows: impl IntoIterator<Item = Vec<CellValue>>) -> Self {
        let mut sheet = Self::empty(name);
        let width = sheet.headers.len();
        sheet.rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Text(String::new()));
                row
            })
            .collect();
        sheet
    }

    /// Get a cell.
    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Whether `(row, column)` addresses an existing cell.
    pub fn contains(&self, row: usize, column: usize) -> bool {
        column < self.headers.len() && self.cell(row, column).is_some()
    }

    /// Description of a column.
    pub fn description(&self, header: &str) -> Option<&str> {
        self.descriptions.get(header).map(String::as_str)
    }

    /// Index of a column by header.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }
}

/// The fixed collection of all sheets of a verification plan.
///
/// Serialized as a list of sheets. On load each sheet is placed by its name,
/// so a stored list may be in any order but must hold every sheet once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Sheet>", into = "Vec<Sheet>")]
pub struct SheetSet {
    sheets: [Sheet; SheetName::COUNT],
}

impl TryFrom<Vec<Sheet>> for SheetSet {
    type Error = String;

    fn try_from(sheets: Vec<Sheet>) -> Result<Self, Self::Error> {
        let mut set = Self::empty();
        let mut seen = [false; SheetName::COUNT];
        for sheet in sheets {
            let index = sheet.name.index();
            if seen[index] {
                return Err(format!("sheet \"{}\" appears more than once", sheet.name));
            }
            seen[index] = true;
            set.sheets[index] = sheet;
        }

        match seen.iter().position(|found| !found) {
            Some(index) => Err(format!("sheet \"{}\" is missing", SheetName::ALL[index])),
            None => Ok(set),
        }
    }
}

impl From<SheetSet> for Vec<Sheet> {
    fn from(set: SheetSet) -> Self {
        set.sheets.into()
    }
}

impl Default for SheetSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl SheetSet {
    /// A set of empty sheets.
    pub fn empty() -> Self {
        Self { sheets: std::array::from_fn(|i| Sheet::empty(SheetName::ALL[i])) }
    }

    /// Flatten generation output into the six plan sheets.
    pub fn from_plan(data: &PlanSourceData) -> Self {
        let features = &data.features;

        let plan_rows = features.iter().map(|f| {
            cells([
                &f.feature_id,
                &f.feature_name,
                &f.sub_feature,
                &f.spec_version,
                &f.requirement_location,
                &f.description,
                &f.verification_goal,
                &f.test_type,
                &f.coverage_method,
                &f.uvm_components,
                &f.pass_fail_criteria,
                &f.sequences_coverage,
                &f.link_register_value_coverage,
                &f.link_register_coverage_info,
                &f.traceability.test_name,
                &f.traceability.sequence_name,
                &f.traceability.agent_name,
                &f.traceability.covergroup_name,
                &f.test_case_coverage,
                &f.target_register,
                &f.link_coverage,
                &f.testcase_range.min,
                &f.testcase_range.mid,
                &f.testcase_range.max,
                &f.testcase_design,
                &f.testcase_steps,
                &f.testcase_inputs,
                &f.testcase_outputs,
                &f.constraints,
                &f.randomization,
                &f.sequence_notes,
                &f.scoreboard.scoreboard_checks,
                &f.scoreboard.new_checkers,
                &f.link_test_cases,
                &f.link_ports,
                &f.link_pdf_coverage,
            ])
        });

        let port_rows = features.iter().flat_map(|f| &f.ports).map(|p| {
            cells([
                &p.feature_id,
                &p.feature_name,
                &p.sub_feature,
                &p.port_name,
                &p.direction,
                &p.width,
                &p.description,
                &p.randomization,
                &p.constraints,
                &p.related_test_types,
            ])
        });

        let test_case_rows = features.iter().flat_map(|f| &f.test_cases).map(|tc| {
            cells([
                &tc.feature_id,
                &tc.feature_name,
                &tc.sub_feature,
                &tc.name,
                &tc.scenario,
                &tc.trace_test_name,
                &tc.trace_sequence_name,
                &tc.trace_agent_name,
                &tc.trace_covergroup_name,
                &tc.inputs,
                &tc.expected_outputs,
                &tc.steps,
                &tc.constraints,
                &tc.scoreboard_checks,
            ])
        });

        let pdf_rows = data.pdf_coverage.iter().map(|row| {
            vec![
                CellValue::Number(row.chunk_id),
                CellValue::Number(row.page),
                row.lines.as_str().into(),
                row.text.as_str().into(),
                row.features_covered.as_str().into(),
            ]
        });

        let value_coverage_rows =
            features.iter().flat_map(|f| &f.register_value_coverage).map(|rvc| {
                cells([
                    &rvc.feature_id,
                    &rvc.feature_name,
                    &rvc.sub_feature,
                    &rvc.register_names,
                    &rvc.covergroups,
                    &rvc.valid_values,
                    &rvc.invalid_values,
                    &rvc.bin_name,
                    &rvc.bin_values,
                    &rvc.bin_type,
                    &rvc.bin_description,
                    &rvc.cross_name,
                    &rvc.cross_description,
                ])
            });

        let register_rows = features.iter().flat_map(|f| &f.registers).map(|r| {
            cells([
                &r.feature_id,
                &r.feature_name,
                &r.sub_feature,
                &r.register_name,
                &r.address,
                &r.access,
                &r.reset_value,
                &r.fields,
                &r.description,
                &r.related_test_cases,
            ])
        });

        Self {
            sheets: [
                Sheet::with_rows(SheetName::VerificationPlan, plan_rows),
                Sheet::with_rows(SheetName::PortInformation, port_rows),
                Sheet::with_rows(SheetName::TestCases, test_case_rows),
                Sheet::with_rows(SheetName::PdfCoverage, pdf_rows),
                Sheet::with_rows(SheetName::RegisterValueCoverage, value_coverage_rows),
                Sheet::with_rows(SheetName::RegisterCoverageInformation, register_rows),
            ],
        }
    }

    /// Get a sheet.
    pub fn get(&self, name: SheetName) -> &Sheet {
        &self.sheets[name.index()]
    }

    /// Iterate over all sheets in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.iter()
    }

    /// Get a cell.
    pub fn cell(&self, name: SheetName, row: usize, column: usize) -> Option<&CellValue> {
        self.get(name).cell(row, column)
    }

    /// Check that `(name, row, column)` addresses an existing cell.
    pub fn check_cell(&self, name: SheetName, row: usize, column: usize) -> WorkspaceResult<()> {
        if self.get(name).contains(row, column) {
            Ok(())
        } else {
            Err(WorkspaceError::OutOfRange { sheet: name, row, column })
        }
    }

    /// Overwrite a cell.
    pub fn set_cell(
        &mut self,
        name: SheetName,
        row: usize,
        column: usize,
        value: CellValue,
    ) -> WorkspaceResult<()> {
        self.check_cell(name, row, column)?;
        self.sheets[name.index()].rows[row][column] = value;
        Ok(())
    }

    /// Total number of rows across all sheets.
    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(|s| s.rows.len()).sum()
    }

    /// Whether no sheet has any row.
    pub fn is_empty(&self) -> bool {
        self.total_rows() == 0
    }
}

fn cells<const N: usize>(values: [&String; N]) -> Vec<CellValue> {
    values.into_iter().map(|v| CellValue::Text(v.clone())).collect()
}

const VERIFICATION_PLAN_COLUMNS: &[(&str, &str)] = &[
    ("Feature ID", "Unique internal ID for this feature (e.g., F001)."),
    ("Feature Name", "Human-readable name of the feature being verified."),
    ("Sub Feature", "Optional more specific area or sub-feature of the feature."),
    ("Spec Version", "Specification revision/version referenced."),
    ("Requirement Location", "Where the requirement appears in the spec (section/page/line)."),
    ("Description", "Brief technical description of the feature."),
    ("Verification Goal", "What the testbench must prove about the feature."),
    ("Test Type", "Type of tests to use (e.g., constrained random or directed)."),
    ("Coverage Method", "Primary coverage techniques (functional, covergroups, assertions)."),
    ("UVM Components Involved", "UVM components needed (agents, env, scoreboard, sequences)."),
    ("Pass/Fail Criteria", "Concrete criteria that determine test pass or fail."),
    ("Sequences Coverage", "List of UVM sequences or scenarios required to cover this feature."),
    ("Link to Register Value Coverage", "Link to Register Value Coverage sheet rows."),
    ("Link to Register Coverage Information", "Link to Register Coverage Information sheet rows."),
    ("Traceability.TestName", "Test name from traceability block."),
    ("Traceability.SequenceName", "Sequence name from traceability block."),
    ("Traceability.AgentName", "Agent name from traceability block."),
    ("Traceability.CovergroupName", "Covergroup name from traceability block."),
    ("Test Case Coverage", "Comma-separated names of test cases that cover this feature."),
    ("Target Register and Justification", "Registers to configure or inspect and why."),
    ("Link to Coverage", "Reference or link to a coverage report or tag."),
    ("Testcase Range.Min", "Min input range for test design."),
    ("Testcase Range.Mid", "Mid input range for test design."),
    ("Testcase Range.Max", "Max input range for test design."),
    ("Testcase Design", "How tests are designed to exercise the feature (approach)."),
    ("Testcase Steps", "High-level steps to execute a representative test."),
    ("Testcase Inputs", "Inputs or stimulus used for the testcase."),
    ("Testcase Outputs", "Expected outputs or observed signals for the testcase."),
    ("Constraints", "Constraints that must be applied to inputs or environment."),
    ("Randomization Constraints and Rationale", "Randomization restrictions and why they exist."),
    (
        "Sequence Implementation Notes",
        "Implementation notes for UVM sequences targeting the feature.",
    ),
    ("Scoreboard and Checker.ScoreboardChecks", "Summary of scoreboard checks."),
    ("Scoreboard and Checker.NewCheckers", "Special checkers to implement."),
    ("Link to Test Cases", "Link to corresponding rows in Test Cases sheet."),
    ("Link to Ports", "Link to corresponding rows in Port Information sheet."),
    ("Link to PDF Coverage", "Link to corresponding rows in PDF Coverage sheet."),
];

const PORT_INFORMATION_COLUMNS: &[(&str, &str)] = &[
    ("Feature ID", "Feature ID this port belongs to (for cross-reference)."),
    ("Feature Name", "Feature name this port is associated with."),
    ("Sub Feature", "Sub-feature associated with this port (if any)."),
    ("Port Name", "Signal name in the RTL or interface."),
    ("Direction", "Signal direction relative to DUT (input/output/inout)."),
    ("Width", "Bit width of the signal (numeric)."),
    ("Description", "Short description of the signal's function."),
    ("Randomization", "Whether the signal is randomized in tests (yes/no/constraints)."),
    ("Constraints", "Value constraints or illegal values for the port."),
    ("Related Test Types", "Which test types use this port (e.g., functional, error)."),
];

const TEST_CASES_COLUMNS: &[(&str, &str)] = &[
    ("Feature ID", "Feature ID this test case maps to."),
    ("Feature Name", "Feature name this test case exercises."),
    ("Sub Feature", "Sub-feature targeted by this test (if any)."),
    ("TestCaseName", "Unique, descriptive name for the test case."),
    ("Scenario", "Description of the scenario or condition being tested."),
    ("Traceability.TestName", "Name of the higher-level test this case maps to."),
    ("Traceability.SequenceName", "Sequence used to exercise the test (UVM sequence name)."),
    ("Traceability.AgentName", "Agent responsible for driving/checking during the test."),
    ("Traceability.CovergroupName", "Covergroup that collects coverage for this test."),
    ("Inputs", "Inputs or configuration applied for the test."),
    ("ExpectedOutputs", "What outputs/behavior are expected for test success."),
    ("Steps", "Step-by-step execution plan for the test case."),
    ("Constraints", "Any constraints on inputs or timing for the test."),
    ("ScoreboardChecks", "Specific checks the scoreboard should perform for this test."),
];

const PDF_COVERAGE_COLUMNS: &[(&str, &str)] = &[
    ("Chunk ID", "Internal chunk index referencing the source PDF text chunk."),
    ("Page", "Page number in the PDF containing the chunk."),
    ("Lines", "Start-end line numbers on the page for the chunk."),
    ("Text", "Text excerpt of the chunk (source from the PDF)."),
    ("Features Covered", "Comma-separated features that map to this chunk."),
];

const REGISTER_VALUE_COVERAGE_COLUMNS: &[(&str, &str)] = &[
    ("Feature ID", "Feature ID this register coverage entry maps to."),
    ("Feature Name", "Feature name associated with these register coverage items."),
    ("Sub Feature", "Sub-feature (if applicable)."),
    ("Register Names", "Comma-separated register names involved in this coverage."),
    ("Covergroups", "Covergroup(s) used to collect this register coverage."),
    ("Valid Values", "List or range of valid register values to test."),
    ("Invalid Values", "Values considered invalid and to be tested."),
    ("Bin Name", "Name of a coverage bin (e.g., low_range)."),
    ("Bin Values", "Values or ranges represented by the bin."),
    ("Bin Type", "Type of bin (single, range, enumerated)."),
    ("Bin Description", "Purpose of this bin (why it exists)."),
    ("Cross Name", "Cross coverage name combining two coverpoints."),
    ("Cross Description", "What behavior the cross coverage verifies."),
];

const REGISTER_COVERAGE_INFORMATION_COLUMNS: &[(&str, &str)] = &[
    ("Feature ID", "Feature ID this register info belongs to."),
    ("Feature Name", "Feature name linked to this register."),
    ("Sub Feature", "Sub-feature (if any)."),
    ("Register Name", "Register identifier/name."),
    ("Address", "Register address (hex or decimal) if available."),
    ("Access", "Access type (R/W/RO/WO) for the register."),
    ("Reset Value", "Default register reset value."),
    ("Fields", "Important bit fields within the register and bit positions."),
    ("Description", "Brief explanation of the register's function."),
    ("Related Test Cases", "Test cases that verify or rely on this register."),
];
