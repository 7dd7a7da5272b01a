//! Client for the LangSmith REST API: datasets, examples, experiments and runs.

mod client;
mod types;


pub use client::LangSmithClient;
pub use types::{
    Dataset, DatasetCreate, Example, ExampleCreate, Experiment, ExperimentCreate,
    ExperimentUpdate, RunBatch, RunCreate, RunType,
};
