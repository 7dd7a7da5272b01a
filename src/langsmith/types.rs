use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Request to create a dataset
#[derive(Debug, Clone, Serialize)]
pub struct DatasetCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Key-value datasets hold arbitrary JSON inputs/outputs.
    pub data_type: String,
}

/// Dataset as returned by the service
#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub example_count: Option<u64>,
}

/// One example to upload into a dataset
#[derive(Debug, Clone, Serialize)]
pub struct ExampleCreate {
    pub id: Uuid,
    pub dataset_id: Uuid,
    pub inputs: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Example as returned by the service
#[derive(Debug, Clone, Deserialize)]
pub struct Example {
    pub id: Uuid,
    pub dataset_id: Uuid,
    pub inputs: Value,
}

/// Request to open an experiment (a tracer session bound to a dataset)
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentCreate {
    pub id: Uuid,
    pub name: String,
    pub reference_dataset_id: Uuid,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
}

/// Experiment as returned by the service
#[derive(Debug, Clone, Deserialize)]
pub struct Experiment {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub reference_dataset_id: Option<Uuid>,
}

/// Patch closing an experiment
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentUpdate {
    pub end_time: DateTime<Utc>,
}

/// Run category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunType {
    Chain,
}

/// A completed root run to record in an experiment
#[derive(Debug, Clone, Serialize)]
pub struct RunCreate {
    pub id: Uuid,
    pub trace_id: Uuid,
    pub dotted_order: String,
    pub name: String,
    pub run_type: RunType,
    pub inputs: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub session_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_example_id: Option<Uuid>,
}

/// Body of the batch ingest endpoint
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunBatch {
    pub post: Vec<RunCreate>,
}

impl DatasetCreate {
    /// Create a key-value dataset request
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            data_type: "kv".to_string(),
        }
    }

    /// Set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl ExampleCreate {
    /// Create an example with fresh id and the given inputs
    pub fn new(dataset_id: Uuid, inputs: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            dataset_id,
            inputs,
            metadata: None,
        }
    }

    /// Attach metadata
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

impl ExperimentCreate {
    /// Open an experiment over `reference_dataset_id` starting now
    pub fn new(name: impl Into<String>, reference_dataset_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            reference_dataset_id,
            start_time: Utc::now(),
            extra: None,
        }
    }

    /// Set free-form metadata
    pub fn with_extra(mut self, extra: Value) -> Self {
        self.extra = Some(extra);
        self
    }
}

impl RunCreate {
    /// A root run (its own trace) in `session_id`.
    ///
    /// Ends at `start_time`; call [`RunCreate::finished`] to record the real end.
    pub fn root(
        name: impl Into<String>,
        run_type: RunType,
        session_id: Uuid,
        inputs: Value,
        start_time: DateTime<Utc>,
    ) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            trace_id: id,
            dotted_order: dotted_order(start_time, id),
            name: name.into(),
            run_type,
            inputs,
            outputs: None,
            error: None,
            start_time,
            end_time: start_time,
            session_id,
            reference_example_id: None,
        }
    }

    /// Link the run to the dataset example it evaluated
    pub fn with_reference_example(mut self, example_id: Uuid) -> Self {
        self.reference_example_id = Some(example_id);
        self
    }

    /// Record the run's result and end time
    pub fn finished(mut self, result: Result<Value, String>, end_time: DateTime<Utc>) -> Self {
        match result {
            Ok(outputs) => self.outputs = Some(outputs),
            Err(error) => self.error = Some(error),
        }
        self.end_time = end_time;
        self
    }
}

/// Ordering key of a root run: `<start time, microsecond precision>Z<run id>`.
pub(crate) fn dotted_order(start_time: DateTime<Utc>, id: Uuid) -> String {
    format!("{}Z{}", start_time.format("%Y%m%dT%H%M%S%6f"), id)
}
