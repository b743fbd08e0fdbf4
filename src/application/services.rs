use image::RgbImage;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    application::{dto::Upload, ports::DetectorPort},
    domain::{
        detection::Detection,
        errors::{DomainError, DomainResult},
        media::{decode_rgb, is_supported_mime},
        model::ModelId,
    },
};

/// Use case behind `POST /detect`: validate every upload, then detect on each.
#[derive(Clone)]
pub struct DetectionService {
    detector: Arc<dyn DetectorPort>,
    model: ModelId,
}

impl DetectionService {
    pub fn new(detector: Arc<dyn DetectorPort>, model: ModelId) -> Self {
        Self { detector, model }
    }

    pub fn model(&self) -> &ModelId {
        &self.model
    }

    /// Uploads are checked one at a time in body order, content type first and
    /// then the bytes, and the first invalid one aborts the request. Detection
    /// only starts after every upload decoded, so a rejected request runs no
    /// inference at all.
    pub async fn detect_uploads(&self, uploads: Vec<Upload>) -> DomainResult<Vec<Detection>> {
        if uploads.is_empty() {
            return Err(DomainError::InvalidInput("no files uploaded".into()));
        }

        let detector = self.detector.clone();
        tokio::task::spawn_blocking(move || -> DomainResult<Vec<Detection>> {
            let mut images = Vec::with_capacity(uploads.len());
            for upload in &uploads {
                let image = check_and_decode(upload).inspect_err(|e| {
                    warn!("Rejected upload {}: {e}", upload.display_name());
                })?;
                images.push((upload.display_name(), image));
            }
            Ok(detect_all(detector.as_ref(), &images))
        })
        .await
        .map_err(|e| DomainError::OperationFailed(format!("detection task failed: {e}")))?
    }
}

fn check_and_decode(upload: &Upload) -> DomainResult<RgbImage> {
    match upload.content_type.as_deref() {
        Some(ct) if is_supported_mime(ct) => decode_rgb(&upload.bytes),
        other => Err(DomainError::UnsupportedMediaType(other.unwrap_or("unknown").to_string())),
    }
}

/// Runs the detector over each image in order. An image whose inference fails
/// contributes no detections and the rest are still processed.
fn detect_all(detector: &dyn DetectorPort, images: &[(&str, RgbImage)]) -> Vec<Detection> {
    let mut out = Vec::new();
    for (name, img) in images {
        match detector.detect(img) {
            Ok(dets) => out.extend(dets),
            Err(e) => error!("Inference failed on {name}: {e}"),
        }
    }
    info!("{} image(s), {} detection(s)", images.len(), out.len());
    out
}
