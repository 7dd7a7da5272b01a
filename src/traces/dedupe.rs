use std::collections::HashSet;

use tracing::debug;

use super::Trace;

/// Identity of a trace for deduplication: `(query, dietary_restriction, trace_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupeKey {
    /// The user's request.
    pub query: String,
    /// Restriction the response had to respect.
    pub dietary_restriction: String,
    /// Identifier of the recorded trace.
    pub trace_id: String,
}

impl From<&Trace> for DedupeKey {
    fn from(trace: &Trace) -> Self {
        Self {
            query: trace.query.clone(),
            dietary_restriction: trace.dietary_restriction.clone(),
            trace_id: trace.trace_id.clone(),
        }
    }
}

/// Drop traces whose [`DedupeKey`] was already seen, keeping the first occurrence.
///
/// Input order is preserved, and applying this twice yields the same rows as applying it once.
pub fn dedupe_traces(traces: Vec<Trace>) -> Vec<Trace> {
    let before = traces.len();
    let mut seen = HashSet::with_capacity(before);

    let deduped: Vec<Trace> = traces
        .into_iter()
        .filter(|trace| seen.insert(DedupeKey::from(trace)))
        .collect();

    debug!(
        before,
        after = deduped.len(),
        removed = before - deduped.len(),
        "Deduplicated traces"
    );
    deduped
}
