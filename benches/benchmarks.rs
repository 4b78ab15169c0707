//! Performance benchmarks for NexVer.
//!
//! This module contains benchmarks for:
//! - Flattening generation output into plan sheets
//! - Draft editing (first edit clones, later edits write in place)
//! - Simulation progress ticking
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nexver::core::{DraftEditor, ProgressTicker, SheetName, SheetSet, SimulationConfig};
use nexver::service::{sample_plan, PlanSourceData};

// ============================================================================
// Mock Data Fixtures
// ============================================================================

mod fixtures {
    use super::*;

    /// Generate plan data with `num_features` features, each with nested rows.
    pub fn generate_plan(num_features: usize) -> PlanSourceData {
        let template = sample_plan();
        let mut data = PlanSourceData::default();

        for i in 0..num_features {
            let mut feature = template.features[i % template.features.len()].clone();
            let id = format!("F{:04}", i + 1);
            feature.feature_id = id.clone();
            for port in &mut feature.ports {
                port.feature_id = id.clone();
            }
            for test_case in &mut feature.test_cases {
                test_case.feature_id = id.clone();
            }
            data.features.push(feature);
        }
        data.pdf_coverage = template.pdf_coverage;
        data
    }
}

// ============================================================================
// Sheet Benchmarks
// ============================================================================

fn bench_from_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("sheets/from_plan");

    for size in [10, 100, 1000] {
        let data = fixtures::generate_plan(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| SheetSet::from_plan(black_box(data)));
        });
    }

    group.finish();
}

fn bench_draft_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("draft");
    let committed = SheetSet::from_plan(&fixtures::generate_plan(500));

    group.bench_function("first_edit", |b| {
        b.iter(|| {
            let mut editor = DraftEditor::new();
            editor
                .edit_cell(Some(&committed), SheetName::VerificationPlan, 0, 0, "edited".into())
                .unwrap();
            black_box(editor)
        });
    });

    group.bench_function("hundred_edits", |b| {
        b.iter(|| {
            let mut editor = DraftEditor::new();
            for row in 0..100 {
                let sheet = SheetName::VerificationPlan;
                editor.edit_cell(Some(&committed), sheet, row, 1, "edited".into()).unwrap();
            }
            black_box(editor)
        });
    });

    group.finish();
}

// ============================================================================
// Simulation Benchmarks
// ============================================================================

fn bench_progress_ticker(c: &mut Criterion) {
    let config = SimulationConfig { seed: Some(1), ..SimulationConfig::default() };

    c.bench_function("simulation/ticks_to_completion", |b| {
        b.iter(|| {
            let mut ticker = ProgressTicker::new(&config);
            while ticker.tick().is_some() {}
            black_box(ticker.finish(&config))
        });
    });
}

criterion_group!(benches, bench_from_plan, bench_draft_edits, bench_progress_ticker);
criterion_main!(benches);
