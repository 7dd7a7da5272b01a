use std::env;
use std::path::PathBuf;

use crate::error::AppError;

/// File name of the full labeled trace export.
pub const LABELED_TRACES_FILE: &str = "labeled_traces.csv";
/// File name of the deduplicated, sampled subset.
pub const SAMPLED_TRACES_FILE: &str = "sampled_labeled_traces.csv";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub langsmith: LangSmithConfig,
    pub data: DataConfig,
    pub sampling: SamplingConfig,
    pub experiment: ExperimentConfig,
    pub logging: LoggingConfig,
    pub request: RequestConfig,
}

/// LangSmith API configuration
#[derive(Debug, Clone)]
pub struct LangSmithConfig {
    /// Only required by commands that talk to the service.
    pub api_key: Option<String>,
    pub endpoint: String,
}

/// Trace file locations
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub dir: PathBuf,
}

/// Sample sizes and RNG seed for `dedupe-sample`
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingConfig {
    pub n_pass: usize,
    pub n_fail: usize,
    pub seed: u64,
}

/// Dataset and experiment naming for `create-experiment`
#[derive(Debug, Clone)]
pub struct ExperimentConfig {
    pub dataset_name: String,
    pub experiment_prefix: String,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let langsmith = LangSmithConfig {
            api_key: env::var("LANGSMITH_API_KEY")
                .or_else(|_| env::var("LANGCHAIN_API_KEY"))
                .ok()
                .filter(|key| !key.trim().is_empty()),
            endpoint: env::var("LANGSMITH_ENDPOINT")
                .unwrap_or_else(|_| "https://api.smith.langchain.com".to_string()),
        };

        let data = DataConfig {
            dir: PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string())),
        };

        let defaults = SamplingConfig::default();
        let sampling = SamplingConfig {
            n_pass: parse_var("SAMPLE_PASS").unwrap_or(defaults.n_pass),
            n_fail: parse_var("SAMPLE_FAIL").unwrap_or(defaults.n_fail),
            seed: parse_var("SAMPLE_SEED").unwrap_or(defaults.seed),
        };

        let experiment = ExperimentConfig {
            dataset_name: env::var("DATASET_NAME")
                .unwrap_or_else(|_| "Recipe Bot Dietary Adherence".to_string()),
            experiment_prefix: env::var("EXPERIMENT_PREFIX")
                .unwrap_or_else(|_| "recipe-bot-dietary-adherence".to_string()),
        };

        if experiment.dataset_name.trim().is_empty() {
            return Err(AppError::Config {
                message: "DATASET_NAME must not be empty".to_string(),
            });
        }

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let request = RequestConfig {
            timeout_ms: parse_var("REQUEST_TIMEOUT_MS").unwrap_or(30000),
            max_retries: parse_var("MAX_RETRIES").unwrap_or(3),
            retry_delay_ms: parse_var("RETRY_DELAY_MS").unwrap_or(1000),
        };

        Ok(Config {
            langsmith,
            data,
            sampling,
            experiment,
            logging,
            request,
        })
    }
}

impl DataConfig {
    /// Full labeled export read by `dedupe-sample`.
    pub fn labeled_traces_path(&self) -> PathBuf {
        self.dir.join(LABELED_TRACES_FILE)
    }

    /// Sample written by `dedupe-sample` and read by `create-experiment`.
    pub fn sampled_traces_path(&self) -> PathBuf {
        self.dir.join(SAMPLED_TRACES_FILE)
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            n_pass: 10,
            n_fail: 10,
            seed: 42,
        }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30000,
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse().ok())
}
