//! Command-line argument parsing.

use std::env;
use std::path::PathBuf;

use crate::grid::estimator::MlrRule;

#[derive(Debug)]
pub struct CliOptions {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub preset: Option<String>,
    pub mlr_rule: Option<MlrRule>,
    pub out: Option<PathBuf>,
    pub summary_json: Option<PathBuf>,
    pub print_rows: bool,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

pub fn parse_args_from(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut input = None;
    let mut config = None;
    let mut preset = None;
    let mut mlr_rule = None;
    let mut out = None;
    let mut summary_json = None;
    let mut print_rows = false;

    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --input (expected a CSV path)")?;
                if input.replace(PathBuf::from(path)).is_some() {
                    return Err("--input provided more than once".to_string());
                }
            }
            "--config" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                if config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name =
                    args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--mlr-rule" => {
                i += 1;
                let name = args.next_or_err(
                    i,
                    "missing value for --mlr-rule (expected `literal` or `positive-deficit`)",
                )?;
                let rule = MlrRule::from_name(name).ok_or_else(|| {
                    format!(
                        "invalid value for --mlr-rule: `{name}` (expected one of: {})",
                        MlrRule::NAMES.join(", ")
                    )
                })?;
                if mlr_rule.replace(rule).is_some() {
                    return Err("--mlr-rule provided more than once".to_string());
                }
            }
            "--out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --out (expected a file path)")?;
                if out.replace(PathBuf::from(path)).is_some() {
                    return Err("--out provided more than once".to_string());
                }
            }
            "--summary-json" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --summary-json (expected a file path)")?;
                if summary_json.replace(PathBuf::from(path)).is_some() {
                    return Err("--summary-json provided more than once".to_string());
                }
            }
            "--print-rows" => print_rows = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if config.is_some() && preset.is_some() {
        return Err(
            "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    let input = input.ok_or_else(|| "missing required argument --input".to_string())?;

    Ok(CliOptions {
        input,
        config,
        preset,
        mlr_rule,
        out,
        summary_json,
        print_rows,
    })
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("loadshed - rule-based load-shedding estimator");
    eprintln!();
    eprintln!("Usage: loadshed --input <csv> [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --input <path>           Grid metrics CSV (required)");
    eprintln!("  --config <path>          Load configuration from a TOML file");
    eprintln!("  --preset <name>          Use a built-in preset (recall, accuracy, guarded)");
    eprintln!("  --mlr-rule <rule>        Override the MLR rule (literal, positive-deficit)");
    eprintln!("  --out <path>             Write per-row assessments to CSV");
    eprintln!("  --summary-json <path>    Write the summary report as JSON");
    eprintln!("  --print-rows             Print every assessment to stdout");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --config or --preset is given, the recall preset is used.");
}

#[cfg(test)]
mod tests {
    use super::parse_args_from;
    use crate::grid::estimator::MlrRule;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn input_only() {
        let opts = parse_args_from(&args(&["--input", "grid.csv"])).expect("parse should succeed");
        assert_eq!(opts.input.to_str(), Some("grid.csv"));
        assert!(opts.config.is_none());
        assert!(opts.preset.is_none());
        assert!(opts.mlr_rule.is_none());
        assert!(!opts.print_rows);
    }

    #[test]
    fn all_options() {
        let opts = parse_args_from(&args(&[
            "--input",
            "grid.csv",
            "--preset",
            "accuracy",
            "--mlr-rule",
            "positive-deficit",
            "--out",
            "out.csv",
            "--summary-json",
            "summary.json",
            "--print-rows",
        ]))
        .expect("parse should succeed");
        assert_eq!(opts.preset.as_deref(), Some("accuracy"));
        assert_eq!(opts.mlr_rule, Some(MlrRule::PositiveDeficit));
        assert_eq!(opts.out.as_deref().and_then(|p| p.to_str()), Some("out.csv"));
        assert_eq!(
            opts.summary_json.as_deref().and_then(|p| p.to_str()),
            Some("summary.json")
        );
        assert!(opts.print_rows);
    }

    #[test]
    fn input_is_required() {
        let err = parse_args_from(&args(&["--preset", "recall"])).err();
        assert_eq!(err.as_deref(), Some("missing required argument --input"));
    }

    #[test]
    fn config_and_preset_are_exclusive() {
        let result = parse_args_from(&args(&[
            "--input", "grid.csv", "--config", "a.toml", "--preset", "recall",
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_flag_is_rejected() {
        let result = parse_args_from(&args(&["--input", "a.csv", "--input", "b.csv"]));
        assert_eq!(result.err().as_deref(), Some("--input provided more than once"));
    }

    #[test]
    fn missing_value_is_rejected() {
        assert!(parse_args_from(&args(&["--input"])).is_err());
    }

    #[test]
    fn bad_rule_is_rejected() {
        let result = parse_args_from(&args(&["--input", "a.csv", "--mlr-rule", "strict"]));
        assert!(result.is_err_and(|e| e.contains("strict")));
    }

    #[test]
    fn unknown_argument_is_rejected() {
        let result = parse_args_from(&args(&["--input", "a.csv", "--bogus"]));
        assert_eq!(result.err().as_deref(), Some("unknown argument: --bogus"));
    }
}
