use crate::error::{PredictError, ScoreError};
use crate::features::{derive_features, FeatureVector};
use crate::model::{Prediction, PredictionRequest, Verdict};
use tracing::{debug, info};

pub const THRESHOLD_PERCENT: f64 = 50.0;

pub trait Classifier {
    fn predict_positive_class_probability(
        &self,
        features: &FeatureVector,
    ) -> Result<f64, ScoreError>;
}

pub fn decide(probability: f64) -> Verdict {
    if probability * 100.0 >= THRESHOLD_PERCENT {
        Verdict::Yes
    } else {
        Verdict::No
    }
}

pub fn predict(
    req: &PredictionRequest,
    classifier: &dyn Classifier,
) -> Result<Prediction, PredictError> {
    debug!(?req, "predict");
    score(&derive_features(req), classifier)
}

// For callers that already hold the derived row.
pub fn score(
    features: &FeatureVector,
    classifier: &dyn Classifier,
) -> Result<Prediction, PredictError> {
    let probability = classifier.predict_positive_class_probability(features)?;
    if !(0.0..=1.0).contains(&probability) {
        return Err(ScoreError::InvalidProbability(probability).into());
    }

    let prediction = Prediction { probability, verdict: decide(probability) };
    info!(percent = prediction.percent(), verdict = ?prediction.verdict, "prediction");
    Ok(prediction)
}
