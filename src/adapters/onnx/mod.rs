pub mod model_catalog;
pub mod yolo_engine;

use crate::application::ports::ModelCatalogPort;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::InferenceConfig;
use yolo_engine::OnnxYoloEngine;

/// Checks the weights with the catalog, then builds the session. Either
/// failure is a startup error.
pub async fn load_detector(catalog: &dyn ModelCatalogPort, cfg: &InferenceConfig) -> DomainResult<OnnxYoloEngine> {
    catalog.validate_model(&cfg.model).await?;
    OnnxYoloEngine::load(cfg).map_err(|e| DomainError::ModelLoad(format!("{e:#}")))
}
