use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::SeedableRng;
use tracing::debug;

use super::{Trace, LABEL_FAIL, LABEL_PASS};
use crate::config::SamplingConfig;

/// How many PASS and FAIL traces to draw, and the RNG seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplePlan {
    /// PASS traces to draw, capped by how many exist.
    pub n_pass: usize,
    /// FAIL traces to draw, capped by how many exist.
    pub n_fail: usize,
    /// Seed for every RNG used in one sampling pass.
    pub seed: u64,
}

impl Default for SamplePlan {
    fn default() -> Self {
        SamplingConfig::default().into()
    }
}

impl From<SamplingConfig> for SamplePlan {
    fn from(config: SamplingConfig) -> Self {
        Self {
            n_pass: config.n_pass,
            n_fail: config.n_fail,
            seed: config.seed,
        }
    }
}

/// Draw a reproducible PASS/FAIL sample.
///
/// Each label group is sampled without replacement by its own RNG seeded with `plan.seed`,
/// then the combined rows are shuffled by a third RNG with the same seed. Traces with any
/// other label are never selected.
pub fn sample_traces(traces: &[Trace], plan: &SamplePlan) -> Vec<Trace> {
    let pass: Vec<&Trace> = traces.iter().filter(|t| t.is_pass()).collect();
    let fail: Vec<&Trace> = traces.iter().filter(|t| t.is_fail()).collect();

    let mut sampled = draw(&pass, plan.n_pass, plan.seed);
    sampled.extend(draw(&fail, plan.n_fail, plan.seed));

    sampled.shuffle(&mut StdRng::seed_from_u64(plan.seed));

    debug!(
        available_pass = pass.len(),
        available_fail = fail.len(),
        sampled = sampled.len(),
        seed = plan.seed,
        "Sampled traces"
    );
    sampled
}

fn draw(group: &[&Trace], requested: usize, seed: u64) -> Vec<Trace> {
    let amount = requested.min(group.len());
    let mut rng = StdRng::seed_from_u64(seed);
    index::sample(&mut rng, group.len(), amount)
        .into_iter()
        .map(|i| group[i].clone())
        .collect()
}

/// Label counts over a set of traces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSummary {
    /// Distinct label values in first-seen order.
    pub labels: Vec<String>,
    /// Traces labeled `PASS`.
    pub pass: usize,
    /// Traces labeled `FAIL`.
    pub fail: usize,
}

impl LabelSummary {
    /// Count labels over `traces`.
    pub fn from_traces(traces: &[Trace]) -> Self {
        let mut summary = Self::default();
        for trace in traces {
            if !summary.labels.iter().any(|l| *l == trace.label) {
                summary.labels.push(trace.label.clone());
            }
            match trace.label.as_str() {
                LABEL_PASS => summary.pass += 1,
                LABEL_FAIL => summary.fail += 1,
                _ => {}
            }
        }
        summary
    }
}
