use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::adapters::fs::images::{copy_into, list_images, open_rgb};
use crate::application::{dto::TriageReport, ports::DetectorPort};
use crate::domain::errors::DomainResult;

/// Copies every image with at least one detection from one directory to another.
pub struct TriageService {
    detector: Arc<dyn DetectorPort>,
}

impl TriageService {
    pub fn new(detector: Arc<dyn DetectorPort>) -> Self {
        Self { detector }
    }

    pub fn process_directory(&self, input_dir: &Path, output_dir: &Path) -> DomainResult<TriageReport> {
        let images = list_images(input_dir)?;
        fs::create_dir_all(output_dir)?;

        let mut report = TriageReport { input_dir: input_dir.to_path_buf(), ..Default::default() };

        for path in images {
            report.total += 1;
            let start = Instant::now();

            let img = match open_rgb(&path) {
                Ok(img) => img,
                Err(e) => {
                    warn!("Error processing {}: {e}", path.display());
                    report.failed += 1;
                    continue;
                }
            };
            let found = match self.detector.detect(&img) {
                Ok(dets) => !dets.is_empty(),
                Err(e) => {
                    error!("Inference failed on {}: {e}", path.display());
                    false
                }
            };
            report.timings_secs.push(start.elapsed().as_secs_f64());

            if found {
                copy_into(&path, output_dir)?;
                report.detected += 1;
            }
        }

        info!(
            "Triage of {} finished: {}/{} with detections",
            input_dir.display(),
            report.detected,
            report.total
        );
        Ok(report)
    }
}
