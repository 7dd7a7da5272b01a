//! Labeled trace records and the CSV pipeline over them.
//!
//! ```text
//! labeled_traces.csv ─► store::load_traces ─► dedupe_traces ─► sample_traces ─► store::write_traces
//! ```

mod dedupe;
mod sample;
mod store;


pub use dedupe::{dedupe_traces, DedupeKey};
pub use sample::{sample_traces, LabelSummary, SamplePlan};
pub use store::{load_traces, write_traces};

use serde::{Deserialize, Serialize};

/// Label assigned to traces that adhered to the dietary restriction.
pub const LABEL_PASS: &str = "PASS";
/// Label assigned to traces that violated the dietary restriction.
pub const LABEL_FAIL: &str = "FAIL";

/// CSV header written for trace files.
pub const TRACE_COLUMNS: [&str; 6] = [
    "query",
    "dietary_restriction",
    "trace_id",
    "label",
    "error",
    "response",
];

/// One recorded Recipe Bot interaction with its evaluation label.
///
/// Field order is the column order used when writing CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    /// The user's request.
    pub query: String,
    /// Restriction the response had to respect (e.g. "vegan").
    pub dietary_restriction: String,
    /// Identifier of the recorded trace.
    pub trace_id: String,
    /// Evaluation label, normally `PASS` or `FAIL`.
    pub label: String,
    /// Error recorded while producing or labeling the trace. Empty cells read as `None`.
    #[serde(default)]
    pub error: Option<String>,
    /// The bot's recorded answer.
    pub response: String,
}

impl Trace {
    /// Whether this trace carries the `PASS` label.
    pub fn is_pass(&self) -> bool {
        self.label == LABEL_PASS
    }

    /// Whether this trace carries the `FAIL` label.
    pub fn is_fail(&self) -> bool {
        self.label == LABEL_FAIL
    }

    /// Recorded error, ignoring blank values.
    pub fn error_message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}
