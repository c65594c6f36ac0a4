//! Load-shedding estimator entry point: CLI wiring and config-driven pipeline.

use std::fs::File;
use std::io::BufWriter;
use std::process;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use loadshed::cli::{self, CliOptions};
use loadshed::config::Config;
use loadshed::grid::report::ShedReport;
use loadshed::io::export::export_csv;
use loadshed::io::ingest::read_records_from_path;

/// Logs `message` and exits with status 1.
fn fail(message: &str) -> ! {
    error!("{message}");
    process::exit(1);
}

/// Resolves the configuration: `--config` takes priority, then `--preset`,
/// then the recall default. `--mlr-rule` overrides whichever was chosen.
fn load_config(cli: &CliOptions) -> Config {
    let mut config = if let Some(ref path) = cli.config {
        Config::from_toml_file(path).unwrap_or_else(|e| fail(&e.to_string()))
    } else if let Some(ref name) = cli.preset {
        Config::from_preset(name).unwrap_or_else(|e| fail(&e.to_string()))
    } else {
        Config::recall()
    };

    if let Some(rule) = cli.mlr_rule {
        config.estimator.mlr_rule = rule;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("{e}");
        }
        process::exit(1);
    }
    config
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();

    let cli = cli::parse_args().unwrap_or_else(|e| {
        cli::print_usage();
        fail(&e)
    });
    let config = load_config(&cli);
    info!(
        mlr_rule = ?config.estimator.mlr_rule,
        threshold_source = ?config.estimator.threshold_source,
        "configuration loaded"
    );

    let records = read_records_from_path(
        &cli.input,
        &config.input,
        config.estimator.threshold_source,
    )
    .unwrap_or_else(|e| fail(&e.to_string()));

    let assessments = config
        .pipeline()
        .assess_all(&records)
        .unwrap_or_else(|e| fail(&e.to_string()));

    if cli.print_rows {
        for a in &assessments {
            println!("{a}");
        }
    }

    let report = ShedReport::from_assessments(&assessments);
    println!("\n{report}");

    if let Some(ref path) = cli.out {
        if let Err(e) = export_csv(&assessments, path) {
            fail(&format!("failed to write CSV: {e}"));
        }
        info!(path = %path.display(), "assessments written");
    }

    if let Some(ref path) = cli.summary_json {
        let written = File::create(path)
            .map_err(|e| e.to_string())
            .and_then(|file| {
                serde_json::to_writer_pretty(BufWriter::new(file), &report)
                    .map_err(|e| e.to_string())
            });
        if let Err(e) = written {
            fail(&format!("failed to write summary: {e}"));
        }
        info!(path = %path.display(), "summary written");
    }
}
