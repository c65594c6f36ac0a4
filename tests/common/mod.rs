//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use loadshed::config::Config;
use loadshed::grid::types::{Assessment, GridMetricsRow, HourlyRecord};
use loadshed::io::ingest::read_records_from_path;

/// One day of hourly grid metrics shipped with the crate.
pub fn sample_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data/sample_grid.csv")
}

/// Reads the sample day with the layout and threshold source of `config`.
pub fn sample_records(config: &Config) -> Vec<HourlyRecord> {
    read_records_from_path(
        &sample_path(),
        &config.input,
        config.estimator.threshold_source,
    )
    .expect("sample CSV should load")
}

/// Runs the sample day through the pipeline described by `config`.
pub fn assess_sample(config: &Config) -> Vec<Assessment> {
    config
        .pipeline()
        .assess_all(&sample_records(config))
        .expect("sample day should assess")
}

/// Row with a 1800 MW deficit and 1500 MW adjusted deficit at a 1500 threshold.
pub fn scenario_a() -> GridMetricsRow {
    GridMetricsRow {
        residual_demand: 5000.0,
        dispatchable_generation: 3000.0,
        eskom_ocgt_generation: 200.0,
        hydro_water_generation: 100.0,
        total_uclf_oclf: 0.0,
        manual_load_reduction: 500.0,
        international_imports: 300.0,
        international_exports: 100.0,
        load_shedding_threshold: 1500.0,
    }
}

/// Scenario A under oversupply: deficit -1200 MW.
pub fn scenario_b() -> GridMetricsRow {
    GridMetricsRow {
        residual_demand: 2000.0,
        ..scenario_a()
    }
}
