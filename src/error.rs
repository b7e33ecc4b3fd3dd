use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot read model file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Model file {path} is not a valid XGBoost JSON model: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported objective: {0}")]
    UnsupportedObjective(String),

    #[error("Invalid base_score: {0}")]
    InvalidBaseScore(String),

    #[error("Malformed tree {tree}: {reason}")]
    MalformedTree { tree: usize, reason: String },

    #[error("Model has no trees")]
    EmptyModel,

    #[error("Model expects feature '{0}' which the form does not produce")]
    SchemaMismatch(String),

    #[error("Model has {actual} unnamed features, expected {expected}")]
    FeatureCount { expected: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Feature {name} is not finite ({value})")]
    NonFiniteFeature { name: &'static str, value: f64 },

    #[error("Classifier returned {0}, which is not a probability")]
    InvalidProbability(f64),

    #[error("Classifier failed: {0}")]
    Backend(String),
}

// Per-request failure, the form stays usable.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Scoring failed: {0}")]
    Score(#[from] ScoreError),
}
