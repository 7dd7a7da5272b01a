use async_trait::async_trait;
use serde_json::{json, Value};

use crate::traces::Trace;

/// System under evaluation: maps an example's inputs to outputs.
///
/// An `Err` is recorded as the run's error rather than aborting the experiment.
#[async_trait]
pub trait Target: Send + Sync {
    /// Run name shown in the experiment.
    fn name(&self) -> &str {
        "target"
    }

    /// Produce outputs for one example.
    async fn invoke(&self, inputs: &Value) -> Result<Value, String>;
}

/// Replays the response already recorded in each trace.
///
/// Examples carry a `response_index` input pointing back into the loaded traces.
#[derive(Debug, Clone)]
pub struct RecordedResponseTarget {
    traces: Vec<Trace>,
}

impl RecordedResponseTarget {
    pub fn new(traces: Vec<Trace>) -> Self {
        Self { traces }
    }
}

#[async_trait]
impl Target for RecordedResponseTarget {
    fn name(&self) -> &str {
        "recorded_response"
    }

    async fn invoke(&self, inputs: &Value) -> Result<Value, String> {
        let index = inputs
            .get("response_index")
            .and_then(Value::as_u64)
            .ok_or_else(|| "inputs missing integer 'response_index'".to_string())?;

        let trace = usize::try_from(index)
            .ok()
            .and_then(|i| self.traces.get(i))
            .ok_or_else(|| {
                format!(
                    "response_index {} out of range ({} traces)",
                    index,
                    self.traces.len()
                )
            })?;

        Ok(json!({ "response": trace.response }))
    }
}
