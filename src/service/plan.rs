//! Verification plan source data returned by the generation service.
//!
//! Field names follow the JSON keys the generation service emits, so a
//! response body deserializes straight into [`PlanSourceData`]. Every field is
//! defaulted: the service is free to omit columns it could not fill.

use serde::{Deserialize, Serialize};

/// Raw output of a verification plan generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSourceData {
    /// One entry per verified feature
    #[serde(default, rename = "geminiVpData")]
    pub features: Vec<FeatureEntry>,
    /// Mapping of spec text chunks to the features they cover
    #[serde(default, rename = "pdfCoverageData")]
    pub pdf_coverage: Vec<PdfCoverageRow>,
}

impl PlanSourceData {
    /// Parse a generation service response.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether the generation produced anything at all.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty() && self.pdf_coverage.is_empty()
    }
}

/// Traceability block of a feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Traceability {
    pub test_name: String,
    pub sequence_name: String,
    pub agent_name: String,
    pub covergroup_name: String,
}

/// Input ranges used for test design.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestcaseRange {
    pub min: String,
    pub mid: String,
    pub max: String,
}

/// Scoreboard checks and new checkers for a feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreboardAndChecker {
    pub scoreboard_checks: String,
    pub new_checkers: String,
}

/// A single feature of the verification plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureEntry {
    #[serde(rename = "Feature ID")]
    pub feature_id: String,
    #[serde(rename = "Feature Name")]
    pub feature_name: String,
    #[serde(rename = "Sub Feature")]
    pub sub_feature: String,
    #[serde(rename = "Spec Version")]
    pub spec_version: String,
    #[serde(rename = "Requirement Location")]
    pub requirement_location: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Verification Goal")]
    pub verification_goal: String,
    #[serde(rename = "Test Type")]
    pub test_type: String,
    #[serde(rename = "Coverage Method")]
    pub coverage_method: String,
    #[serde(rename = "UVM Components Involved")]
    pub uvm_components: String,
    #[serde(rename = "Pass/Fail Criteria")]
    pub pass_fail_criteria: String,
    #[serde(rename = "Sequences Coverage")]
    pub sequences_coverage: String,
    #[serde(rename = "Link to Register Value Coverage")]
    pub link_register_value_coverage: String,
    #[serde(rename = "Link to Register Coverage Information")]
    pub link_register_coverage_info: String,
    #[serde(rename = "Traceability")]
    pub traceability: Traceability,
    #[serde(rename = "Test Case Coverage")]
    pub test_case_coverage: String,
    #[serde(rename = "Target Register and Justification")]
    pub target_register: String,
    #[serde(rename = "Link to Coverage")]
    pub link_coverage: String,
    #[serde(rename = "Testcase Range")]
    pub testcase_range: TestcaseRange,
    #[serde(rename = "Testcase Design")]
    pub testcase_design: String,
    #[serde(rename = "Testcase Steps")]
    pub testcase_steps: String,
    #[serde(rename = "Testcase Inputs")]
    pub testcase_inputs: String,
    #[serde(rename = "Testcase Outputs")]
    pub testcase_outputs: String,
    #[serde(rename = "Constraints")]
    pub constraints: String,
    #[serde(rename = "Randomization Constraints and Rationale")]
    pub randomization: String,
    #[serde(rename = "Sequence Implementation Notes")]
    pub sequence_notes: String,
    #[serde(rename = "Scoreboard and Checker")]
    pub scoreboard: ScoreboardAndChecker,
    #[serde(rename = "Link to Test Cases")]
    pub link_test_cases: String,
    #[serde(rename = "Link to Ports")]
    pub link_ports: String,
    #[serde(rename = "Link to PDF Coverage")]
    pub link_pdf_coverage: String,

    #[serde(rename = "Port Information")]
    pub ports: Vec<PortInfo>,
    #[serde(rename = "Test Cases")]
    pub test_cases: Vec<TestCase>,
    #[serde(rename = "Register Value Coverage")]
    pub register_value_coverage: Vec<RegisterValueCoverage>,
    #[serde(rename = "Register Coverage Information")]
    pub registers: Vec<RegisterInfo>,
}

/// A DUT port exercised by a feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortInfo {
    #[serde(rename = "Feature ID")]
    pub feature_id: String,
    #[serde(rename = "Feature Name")]
    pub feature_name: String,
    #[serde(rename = "Sub Feature")]
    pub sub_feature: String,
    #[serde(rename = "Port Name")]
    pub port_name: String,
    #[serde(rename = "Direction")]
    pub direction: String,
    #[serde(rename = "Width")]
    pub width: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Randomization")]
    pub randomization: String,
    #[serde(rename = "Constraints")]
    pub constraints: String,
    #[serde(rename = "Related Test Types")]
    pub related_test_types: String,
}

/// A concrete test case for a feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestCase {
    #[serde(rename = "Feature ID")]
    pub feature_id: String,
    #[serde(rename = "Feature Name")]
    pub feature_name: String,
    #[serde(rename = "Sub Feature")]
    pub sub_feature: String,
    #[serde(rename = "TestCaseName")]
    pub name: String,
    #[serde(rename = "Scenario")]
    pub scenario: String,
    #[serde(rename = "Traceability.TestName")]
    pub trace_test_name: String,
    #[serde(rename = "Traceability.SequenceName")]
    pub trace_sequence_name: String,
    #[serde(rename = "Traceability.AgentName")]
    pub trace_agent_name: String,
    #[serde(rename = "Traceability.CovergroupName")]
    pub trace_covergroup_name: String,
    #[serde(rename = "Inputs")]
    pub inputs: String,
    #[serde(rename = "ExpectedOutputs")]
    pub expected_outputs: String,
    #[serde(rename = "Steps")]
    pub steps: String,
    #[serde(rename = "Constraints")]
    pub constraints: String,
    #[serde(rename = "ScoreboardChecks")]
    pub scoreboard_checks: String,
}

/// Value coverage of one or more registers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterValueCoverage {
    #[serde(rename = "Feature ID")]
    pub feature_id: String,
    #[serde(rename = "Feature Name")]
    pub feature_name: String,
    #[serde(rename = "Sub Feature")]
    pub sub_feature: String,
    #[serde(rename = "Register Names")]
    pub register_names: String,
    #[serde(rename = "Covergroups")]
    pub covergroups: String,
    #[serde(rename = "Valid Values")]
    pub valid_values: String,
    #[serde(rename = "Invalid Values")]
    pub invalid_values: String,
    #[serde(rename = "Bin Name")]
    pub bin_name: String,
    #[serde(rename = "Bin Values")]
    pub bin_values: String,
    #[serde(rename = "Bin Type")]
    pub bin_type: String,
    #[serde(rename = "Bin Description")]
    pub bin_description: String,
    #[serde(rename = "Cross Name")]
    pub cross_name: String,
    #[serde(rename = "Cross Description")]
    pub cross_description: String,
}

/// Static information about a register.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterInfo {
    #[serde(rename = "Feature ID")]
    pub feature_id: String,
    #[serde(rename = "Feature Name")]
    pub feature_name: String,
    #[serde(rename = "Sub Feature")]
    pub sub_feature: String,
    #[serde(rename = "Register Name")]
    pub register_name: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Access")]
    pub access: String,
    #[serde(rename = "Reset Value")]
    pub reset_value: String,
    #[serde(rename = "Fields")]
    pub fields: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Related Test Cases")]
    pub related_test_cases: String,
}

/// A chunk of the spec PDF and the features it covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfCoverageRow {
    #[serde(rename = "Chunk ID")]
    pub chunk_id: i64,
    #[serde(rename = "Page")]
    pub page: i64,
    #[serde(rename = "Lines")]
    pub lines: String,
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "Features Covered")]
    pub features_covered: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_service_response() {
        let json = r#"{
            "geminiVpData": [{
                "Feature ID": "F001",
                "Feature Name": "Baud Rate Generation",
                "Traceability": { "test_name": "baud_rate_tests", "agent_name": "uart_agent" },
                "Testcase Range": { "min": "2", "max": "65535" },
                "Port Information": [
                    { "Feature ID": "F001", "Port Name": "tx_o", "Direction": "output" }
                ]
            }],
            "pdfCoverageData": [{
                "Chunk ID": 1,
                "Page": 12,
                "Lines": "10-15",
                "Text": "divisor",
                "Features Covered": "Baud Rate Generation"
            }]
        }"#;

        let data = PlanSourceData::from_json(json).unwrap();
        assert_eq!(data.features.len(), 1);

        let feature = &data.features[0];
        assert_eq!(feature.feature_id, "F001");
        assert_eq!(feature.traceability.agent_name, "uart_agent");
        assert_eq!(feature.traceability.sequence_name, "");
        assert_eq!(feature.testcase_range.mid, "");
        assert_eq!(feature.ports[0].port_name, "tx_o");
        assert!(feature.test_cases.is_empty());

        assert_eq!(data.pdf_coverage[0].page, 12);
        assert!(!data.is_empty());

        let emitted = serde_json::to_string(&data).unwrap();
        assert!(emitted.contains("\"geminiVpData\"") && emitted.contains("\"pdfCoverageData\""));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(PlanSourceData::from_json("{ not json").is_err());
        assert!(PlanSourceData::from_json("{}").unwrap().is_empty());
    }
}
