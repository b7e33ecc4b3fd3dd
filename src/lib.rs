pub mod booster;
pub mod config;
pub mod error;
pub mod features;
pub mod loader;
pub mod model;
pub mod scorer;
pub mod ui;

pub use error::{LoadError, PredictError, ScoreError};
pub use features::{derive_features, FeatureVector};
pub use model::{Prediction, PredictionRequest, Verdict};
pub use scorer::{decide, predict, Classifier};
