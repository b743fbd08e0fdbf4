use async_trait::async_trait;
use image::RgbImage;

use crate::domain::{
    detection::Detection,
    errors::DomainResult,
    metrics::{GroundTruthRecord, MetricSummary, PredictionRecord},
    model::ModelId,
};

#[async_trait]
pub trait ModelCatalogPort: Send + Sync {
    async fn validate_model(&self, model: &ModelId) -> DomainResult<()>;
}

/// A loaded detector. Failures are returned, never swallowed: callers pick
/// between aborting and continuing with zero detections.
pub trait DetectorPort: Send + Sync {
    fn detect(&self, image: &RgbImage) -> DomainResult<Vec<Detection>>;
}

/// Accumulates per-image prediction/ground-truth pairs for one evaluation run.
pub trait MetricAccumulatorPort: Send {
    fn update(&mut self, preds: PredictionRecord, target: GroundTruthRecord);
    fn compute(&self) -> MetricSummary;
}
