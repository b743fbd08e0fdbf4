use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::adapters::fs::images::{list_images, open_rgb};
use crate::application::{
    dto::ValidationReport,
    ports::{DetectorPort, MetricAccumulatorPort},
};
use crate::domain::{
    errors::DomainResult,
    labels::load_yolo_labels,
    metrics::{GroundTruthRecord, PredictionRecord},
};

#[derive(Debug)]
pub enum ValidationOutcome {
    /// The image directory held no supported files; nothing was computed.
    NoImages,
    Report(ValidationReport),
}

/// One evaluation run: owns its accumulator and is consumed by [`Self::validate_directory`].
pub struct ValidationService {
    detector: Arc<dyn DetectorPort>,
    accumulator: Box<dyn MetricAccumulatorPort>,
}

impl ValidationService {
    pub fn new(detector: Arc<dyn DetectorPort>, accumulator: Box<dyn MetricAccumulatorPort>) -> Self {
        Self { detector, accumulator }
    }

    /// Scores predictions on `images_dir` against `<stem>.txt` YOLO labels in `labels_dir`.
    pub fn validate_directory(mut self, images_dir: &Path, labels_dir: &Path) -> DomainResult<ValidationOutcome> {
        let images = list_images(images_dir)?;
        if images.is_empty() {
            return Ok(ValidationOutcome::NoImages);
        }

        let mut evaluated = 0usize;
        for path in images {
            let img = match open_rgb(&path) {
                Ok(img) => img,
                Err(e) => {
                    warn!("Skipping {}: {e}", path.display());
                    continue;
                }
            };

            let detections = self.detector.detect(&img).unwrap_or_else(|e| {
                error!("Inference failed on {}: {e}", path.display());
                Vec::new()
            });
            let preds = PredictionRecord::from_detections(&detections);

            let mut label_name = path.file_stem().unwrap_or_default().to_os_string();
            label_name.push(".txt");
            let label_path = labels_dir.join(label_name);
            let gt_boxes = load_yolo_labels(&label_path, img.width(), img.height())?;
            let target = GroundTruthRecord::from_boxes(&gt_boxes);

            debug!(
                "{}: {} prediction(s), {} ground truth box(es)",
                path.display(),
                preds.len(),
                target.len()
            );
            self.accumulator.update(preds, target);
            evaluated += 1;
        }

        Ok(ValidationOutcome::Report(ValidationReport {
            images: evaluated,
            summary: self.accumulator.compute(),
        }))
    }
}
