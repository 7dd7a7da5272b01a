//! Human-readable console reports for the CLI commands.

use std::fmt;
use std::path::PathBuf;

use crate::experiment::ExperimentSummary;
use crate::traces::{LabelSummary, Trace};

/// Characters of each query shown in the sampled trace listing.
const QUERY_PREVIEW_CHARS: usize = 100;

/// Everything `dedupe-sample` reports after writing its output.
#[derive(Debug, Clone)]
pub struct DedupeReport {
    /// Labeled trace file that was read.
    pub input: PathBuf,
    /// Sample file that was written.
    pub output: PathBuf,
    /// Rows read before deduplication.
    pub loaded: usize,
    /// Rows left after deduplication.
    pub deduped: usize,
    /// Label counts over the deduplicated traces.
    pub available: LabelSummary,
    /// Rows written, in output order.
    pub sample: Vec<Trace>,
}

impl fmt::Display for DedupeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(80);
        let sampled = LabelSummary::from_traces(&self.sample);

        writeln!(f, "Loading traces from {}...", self.input.display())?;
        writeln!(f, "Total traces loaded: {}", self.loaded)?;
        writeln!(f, "Traces after deduplication: {}", self.deduped)?;
        writeln!(f, "Available label values: {:?}", self.available.labels)?;
        writeln!(f, "Available success traces: {}", self.available.pass)?;
        writeln!(f, "Available failure traces: {}", self.available.fail)?;
        writeln!(f)?;
        writeln!(f, "Final sample contains {} traces", self.sample.len())?;
        writeln!(f, "PASS traces: {}", sampled.pass)?;
        writeln!(f, "FAIL traces: {}", sampled.fail)?;
        writeln!(f)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "SAMPLED TRACES:")?;
        writeln!(f, "{rule}")?;

        for (i, trace) in self.sample.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "--- Trace {} (Label: {}) ---", i + 1, trace.label)?;
            writeln!(f, "Query: {}...", query_preview(&trace.query))?;
            writeln!(f, "Dietary Restriction: {}", trace.dietary_restriction)?;
            writeln!(f, "Trace ID: {}", trace.trace_id)?;
            if let Some(error) = trace.error_message() {
                writeln!(f, "Error: {}", error)?;
            }
        }

        writeln!(f)?;
        write!(f, "Saved sampled traces to: {}", self.output.display())
    }
}

/// Everything `create-experiment` reports once the experiment is closed.
#[derive(Debug, Clone)]
pub struct ExperimentReport {
    /// Traces read from the sample file.
    pub loaded: usize,
    /// Dataset the examples were uploaded to.
    pub dataset_name: String,
    /// What [`crate::experiment::run_experiment`] recorded.
    pub summary: ExperimentSummary,
}

impl fmt::Display for ExperimentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Recipe Bot Trace Labeling")?;
        writeln!(f, "{}", "=".repeat(50))?;
        writeln!(f, "Loaded {} traces", self.loaded)?;
        writeln!(
            f,
            "Dataset: {} ({})",
            self.dataset_name, self.summary.dataset_id
        )?;
        writeln!(
            f,
            "Experiment: {} ({})",
            self.summary.experiment_name, self.summary.experiment_id
        )?;
        if self.summary.errors > 0 {
            writeln!(f, "Target errors: {}", self.summary.errors)?;
        }
        write!(f, "Evaluated {} traces", self.summary.runs)
    }
}

fn query_preview(query: &str) -> String {
    query.chars().take(QUERY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    use super::*;

    fn trace(query: &str, label: &str, error: Option<&str>) -> Trace {
        Trace {
            query: query.to_string(),
            dietary_restriction: "vegan".to_string(),
            trace_id: "t-1".to_string(),
            label: label.to_string(),
            error: error.map(str::to_string),
            response: "r".to_string(),
        }
    }

    #[test]
    fn test_query_preview_is_char_safe() {
        let query = "é".repeat(150);
        assert_eq!(query_preview(&query).chars().count(), 100);
        assert_eq!(query_preview("short"), "short");
    }

    #[test]
    fn test_dedupe_report_layout() {
        let sample = vec![
            trace("Vegan lasagna please", "PASS", None),
            trace("Keto bread?", "FAIL", Some("hallucinated flour")),
        ];
        let report = DedupeReport {
            input: PathBuf::from("data/labeled_traces.csv"),
            output: PathBuf::from("data/sampled_labeled_traces.csv"),
            loaded: 5,
            deduped: 4,
            available: LabelSummary {
                labels: vec!["PASS".to_string(), "FAIL".to_string()],
                pass: 2,
                fail: 2,
            },
            sample,
        };

        let text = report.to_string();
        assert!(text.starts_with("Loading traces from data/labeled_traces.csv...\n"));
        assert!(text.contains("Total traces loaded: 5\n"));
        assert!(text.contains("Traces after deduplication: 4\n"));
        assert!(text.contains("Available label values: [\"PASS\", \"FAIL\"]\n"));
        assert!(text.contains("Final sample contains 2 traces\nPASS traces: 1\nFAIL traces: 1\n"));
        assert!(text.contains("--- Trace 1 (Label: PASS) ---\nQuery: Vegan lasagna please...\n"));
        assert!(text.contains("--- Trace 2 (Label: FAIL) ---"));
        assert!(text.contains("Error: hallucinated flour\n"));
        assert_eq!(text.matches("Error:").count(), 1);
        assert!(text.ends_with("Saved sampled traces to: data/sampled_labeled_traces.csv"));
    }

    #[test]
    fn test_experiment_report_layout() {
        let report = ExperimentReport {
            loaded: 20,
            dataset_name: "Recipe Bot Dietary Adherence".to_string(),
            summary: ExperimentSummary {
                dataset_id: Uuid::nil(),
                experiment_id: Uuid::nil(),
                experiment_name: "recipe-bot-1234abcd".to_string(),
                runs: 20,
                errors: 0,
            },
        };

        let text = report.to_string();
        assert!(text.contains("Loaded 20 traces\n"));
        assert!(text.contains("Experiment: recipe-bot-1234abcd (00000000-0000-0000-0000-000000000000)"));
        assert!(!text.contains("Target errors"));
        assert!(text.ends_with("Evaluated 20 traces"));
    }
}
