use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use super::Target;
use crate::config::ExperimentConfig;
use crate::error::AppResult;
use crate::langsmith::{
    DatasetCreate, ExampleCreate, ExperimentCreate, ExperimentUpdate, LangSmithClient, RunCreate,
    RunType,
};
use crate::traces::Trace;

/// Naming and batching for one experiment run
#[derive(Debug, Clone)]
pub struct ExperimentOptions {
    /// Dataset created, or reused if it already exists.
    pub dataset_name: String,
    /// Description set when the dataset is created.
    pub dataset_description: Option<String>,
    /// Experiment names are `<prefix>-<8 hex chars>`.
    pub experiment_prefix: String,
    /// Runs posted per batch request.
    pub batch_size: usize,
}

impl From<ExperimentConfig> for ExperimentOptions {
    fn from(config: ExperimentConfig) -> Self {
        Self {
            dataset_name: config.dataset_name,
            dataset_description: Some(
                "Sampled Recipe Bot traces labeled for dietary adherence".to_string(),
            ),
            experiment_prefix: config.experiment_prefix,
            batch_size: 100,
        }
    }
}

/// Outcome of [`run_experiment`]
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentSummary {
    /// Dataset holding the uploaded examples.
    pub dataset_id: Uuid,
    /// Session the runs were recorded in.
    pub experiment_id: Uuid,
    /// Name the session was created with.
    pub experiment_name: String,
    /// Runs recorded, one per uploaded example.
    pub runs: usize,
    /// Runs whose target returned an error.
    pub errors: usize,
}

/// One example per trace, with inputs `{query, dietary_restriction, response_index}`
/// and metadata `{trace_id, label}`.
pub fn build_examples(dataset_id: Uuid, traces: &[Trace]) -> Vec<ExampleCreate> {
    traces
        .iter()
        .enumerate()
        .map(|(i, trace)| {
            ExampleCreate::new(
                dataset_id,
                json!({
                    "query": trace.query,
                    "dietary_restriction": trace.dietary_restriction,
                    "response_index": i,
                }),
            )
            .with_metadata(json!({
                "trace_id": trace.trace_id,
                "label": trace.label,
            }))
        })
        .collect()
}

/// Upload `traces` as a dataset and record one `target` run per example in a new experiment.
pub async fn run_experiment(
    client: &LangSmithClient,
    traces: &[Trace],
    target: &dyn Target,
    options: &ExperimentOptions,
) -> AppResult<ExperimentSummary> {
    let mut dataset_request = DatasetCreate::new(&options.dataset_name);
    if let Some(description) = &options.dataset_description {
        dataset_request = dataset_request.with_description(description);
    }
    let dataset = client.ensure_dataset(dataset_request).await?;

    let examples = client
        .create_examples(build_examples(dataset.id, traces))
        .await?;
    info!(dataset_id = %dataset.id, examples = examples.len(), "Examples uploaded");

    let experiment_name = format!(
        "{}-{}",
        options.experiment_prefix,
        &Uuid::new_v4().simple().to_string()[..8]
    );
    let experiment = client
        .create_experiment(
            ExperimentCreate::new(&experiment_name, dataset.id)
                .with_extra(json!({ "metadata": { "num_traces": traces.len() } })),
        )
        .await?;

    let mut runs = Vec::with_capacity(examples.len());
    let mut errors = 0;
    for example in &examples {
        let start = Utc::now();
        let result = target.invoke(&example.inputs).await;
        if let Err(e) = &result {
            warn!(example_id = %example.id, error = %e, "Target failed");
            errors += 1;
        }
        runs.push(
            RunCreate::root(
                target.name(),
                RunType::Chain,
                experiment.id,
                example.inputs.clone(),
                start,
            )
            .with_reference_example(example.id)
            .finished(result, Utc::now()),
        );
    }

    let recorded = runs.len();
    let mut pending = runs.into_iter().peekable();
    while pending.peek().is_some() {
        let batch: Vec<RunCreate> = pending.by_ref().take(options.batch_size.max(1)).collect();
        client.post_runs(batch).await?;
    }

    client
        .close_experiment(experiment.id, ExperimentUpdate { end_time: Utc::now() })
        .await?;

    info!(
        experiment = %experiment.name,
        runs = recorded,
        errors,
        "Experiment complete"
    );

    Ok(ExperimentSummary {
        dataset_id: dataset.id,
        experiment_id: experiment.id,
        experiment_name: experiment.name,
        runs: recorded,
        errors,
    })
}
