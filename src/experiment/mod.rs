//! Upload sampled traces as a dataset and replay them as an experiment.
//!
//! ```text
//! traces ─► dataset (ensure) ─► examples (bulk) ─► experiment session
//!                                     │
//!                                     ▼
//!                          Target::invoke per example ─► runs (batch) ─► close session
//! ```

mod runner;
mod target;

pub use runner::{build_examples, run_experiment, ExperimentOptions, ExperimentSummary};
pub use target::{RecordedResponseTarget, Target};
