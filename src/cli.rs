//! Command-line interface: `dedupe-sample` and `create-experiment`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use crate::config::Config;
use crate::error::{AppError, AppResult, DataError};
use crate::experiment::{run_experiment, ExperimentOptions, RecordedResponseTarget};
use crate::langsmith::LangSmithClient;
use crate::report::{DedupeReport, ExperimentReport};
use crate::traces::{dedupe_traces, load_traces, sample_traces, write_traces, LabelSummary, SamplePlan};

/// Prepare and evaluate labeled Recipe Bot traces.
#[derive(Parser, Debug)]
#[command(name = "recipe-trace-eval", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Deduplicate labeled traces and write a seeded PASS/FAIL sample
    DedupeSample {
        /// Labeled trace CSV (default: $DATA_DIR/labeled_traces.csv)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output CSV (default: $DATA_DIR/sampled_labeled_traces.csv)
        #[arg(long)]
        output: Option<PathBuf>,

        /// PASS traces to sample
        #[arg(long)]
        n_pass: Option<usize>,

        /// FAIL traces to sample
        #[arg(long)]
        n_fail: Option<usize>,

        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Upload sampled traces as a dataset and run an experiment over them
    CreateExperiment {
        /// Sampled trace CSV (default: $DATA_DIR/sampled_labeled_traces.csv)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Dataset name on the tracking service
        #[arg(long)]
        dataset_name: Option<String>,

        /// Experiment name prefix
        #[arg(long)]
        experiment_prefix: Option<String>,
    },
}

/// Result of CLI command execution.
pub struct CliResult {
    /// Exit code (0 = success)
    pub exit_code: i32,
    /// Output message
    pub message: String,
}

impl CliResult {
    /// Create a success result with the given message.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            message: message.into(),
        }
    }

    /// Create an error result with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            exit_code: 1,
            message: message.into(),
        }
    }
}

/// Execute a CLI command.
pub async fn execute_command(command: Commands, config: &Config) -> CliResult {
    match command {
        Commands::DedupeSample {
            input,
            output,
            n_pass,
            n_fail,
            seed,
        } => {
            let defaults = SamplePlan::from(config.sampling.clone());
            let plan = SamplePlan {
                n_pass: n_pass.unwrap_or(defaults.n_pass),
                n_fail: n_fail.unwrap_or(defaults.n_fail),
                seed: seed.unwrap_or(defaults.seed),
            };
            let input = input.unwrap_or_else(|| config.data.labeled_traces_path());
            let output = output.unwrap_or_else(|| config.data.sampled_traces_path());

            match dedupe_sample(input, output, &plan) {
                Ok(report) => CliResult::success(report.to_string()),
                Err(e) => failure(e, None),
            }
        }
        Commands::CreateExperiment {
            input,
            dataset_name,
            experiment_prefix,
        } => {
            let mut options = ExperimentOptions::from(config.experiment.clone());
            if let Some(name) = dataset_name {
                options.dataset_name = name;
            }
            if let Some(prefix) = experiment_prefix {
                options.experiment_prefix = prefix;
            }
            let input = input.unwrap_or_else(|| config.data.sampled_traces_path());

            match create_experiment(input, config, &options).await {
                Ok(report) => CliResult::success(report.to_string()),
                Err(e) => failure(e, Some("Run `recipe-trace-eval dedupe-sample` first.")),
            }
        }
    }
}

/// Load, deduplicate, sample and write traces.
pub fn dedupe_sample(input: PathBuf, output: PathBuf, plan: &SamplePlan) -> AppResult<DedupeReport> {
    let traces = load_traces(&input)?;
    let loaded = traces.len();

    let deduped = dedupe_traces(traces);
    let available = LabelSummary::from_traces(&deduped);
    let sample = sample_traces(&deduped, plan);

    write_traces(&output, &sample)?;
    info!(output = %output.display(), rows = sample.len(), "Saved sampled traces");

    Ok(DedupeReport {
        input,
        output,
        loaded,
        deduped: deduped.len(),
        available,
        sample,
    })
}

/// Load sampled traces and record an experiment replaying their responses.
pub async fn create_experiment(
    input: PathBuf,
    config: &Config,
    options: &ExperimentOptions,
) -> AppResult<ExperimentReport> {
    let traces = load_traces(&input)?;
    info!(count = traces.len(), "Loaded traces");

    let client = LangSmithClient::new(&config.langsmith, config.request.clone())?;
    let target = RecordedResponseTarget::new(traces.clone());
    let summary = run_experiment(&client, &traces, &target, options).await?;

    Ok(ExperimentReport {
        loaded: traces.len(),
        dataset_name: options.dataset_name.clone(),
        summary,
    })
}

fn failure(err: AppError, missing_file_hint: Option<&str>) -> CliResult {
    error!(error = %err, "Command failed");
    match err {
        AppError::Data(DataError::NotFound { path }) => {
            let mut message = format!("Error: {} not found!", path.display());
            if let Some(hint) = missing_file_hint {
                message.push('\n');
                message.push_str(hint);
            }
            CliResult::error(message)
        }
        other => CliResult::error(format!("Error: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dedupe_sample_flags() {
        let cli = Cli::try_parse_from([
            "recipe-trace-eval",
            "dedupe-sample",
            "--n-pass",
            "5",
            "--seed",
            "7",
        ])
        .unwrap();
        match cli.command {
            Commands::DedupeSample {
                n_pass,
                n_fail,
                seed,
                input,
                ..
            } => {
                assert_eq!(n_pass, Some(5));
                assert_eq!(n_fail, None);
                assert_eq!(seed, Some(7));
                assert!(input.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_create_experiment_flags() {
        let cli = Cli::try_parse_from([
            "recipe-trace-eval",
            "create-experiment",
            "--dataset-name",
            "My Dataset",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::CreateExperiment { dataset_name: Some(ref n), .. } if n == "My Dataset"
        ));
    }

    #[test]
    fn test_missing_file_failure_message() {
        let err = AppError::Data(DataError::NotFound {
            path: PathBuf::from("data/x.csv"),
        });
        let result = failure(err, Some("hint"));
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.message, "Error: data/x.csv not found!\nhint");
    }

    #[test]
    fn test_cli_result_constructors() {
        assert_eq!(CliResult::success("ok").exit_code, 0);
        assert_eq!(CliResult::error("bad").exit_code, 1);
    }
}
