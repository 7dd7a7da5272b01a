//! # Recipe Trace Eval
//!
//! Utilities for preparing and labeling Recipe Bot evaluation traces.
//!
//! ## Features
//!
//! - **Deduplication**: Drop repeated traces on `(query, dietary_restriction, trace_id)`
//! - **Seeded Sampling**: Reproducible PASS/FAIL subsets capped by what is available
//! - **Experiments**: Upload samples to LangSmith as a dataset and replay them as an experiment
//!
//! ## Architecture
//!
//! ```text
//! labeled_traces.csv → dedupe → sample → sampled_labeled_traces.csv
//!                                                  ↓
//!                                 LangSmith dataset + experiment (HTTP)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use recipe_trace_eval::traces::{dedupe_traces, load_traces, sample_traces, SamplePlan};
//!
//! let traces = dedupe_traces(load_traces("data/labeled_traces.csv".as_ref())?);
//! let sample = sample_traces(&traces, &SamplePlan::default());
//! ```

#![warn(missing_docs)]

/// Command-line interface and command execution.
pub mod cli;
/// Configuration management loaded from the environment.
pub mod config;
/// Error types and result aliases for the application.
pub mod error;
/// Dataset upload and experiment execution.
pub mod experiment;
/// LangSmith API client and types.
pub mod langsmith;
/// Console reports for the CLI commands.
pub mod report;
/// Trace records, CSV I/O, deduplication and sampling.
pub mod traces;

pub use config::Config;
pub use error::{AppError, AppResult};
