use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::domain::{bbox::BoundingBox, detection::Detection, metrics::MetricSummary};

/// One file from a multipart upload, before validation.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Name used in logs; multipart parts may omit the filename.
    pub fn display_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or("<unnamed>")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBoxDto {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl From<&BoundingBox> for BoundingBoxDto {
    fn from(b: &BoundingBox) -> Self {
        // `as` truncates towards zero
        Self {
            x_min: b.x_min() as i32,
            y_min: b.y_min() as i32,
            x_max: b.x_max() as i32,
            y_max: b.y_max() as i32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionDto {
    pub bbox: BoundingBoxDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResponse {
    pub detections: Vec<DetectionDto>,
}

impl From<&[Detection]> for DetectionResponse {
    fn from(dets: &[Detection]) -> Self {
        Self {
            detections: dets.iter().map(|d| DetectionDto { bbox: (&d.bbox).into() }).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub model: String,
}

/// Outcome of a batch triage run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TriageReport {
    pub input_dir: PathBuf,
    pub total: usize,
    pub detected: usize,
    pub failed: usize,
    pub timings_secs: Vec<f64>,
}

impl TriageReport {
    pub fn not_detected(&self) -> usize {
        self.total - self.detected
    }

    pub fn avg_secs(&self) -> f64 {
        if self.timings_secs.is_empty() {
            0.0
        } else {
            self.timings_secs.iter().sum::<f64>() / self.timings_secs.len() as f64
        }
    }

    pub fn max_secs(&self) -> f64 {
        self.timings_secs.iter().copied().fold(0.0, f64::max)
    }
}

impl fmt::Display for TriageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Processing report ===")?;
        writeln!(f, "Directory: {}", self.input_dir.display())?;
        writeln!(f, "Files processed: {}", self.total)?;
        writeln!(f, "Files with detection: {}", self.detected)?;
        writeln!(f, "Files without detection: {}", self.not_detected())?;
        if self.failed > 0 {
            writeln!(f, "Files that failed to load: {}", self.failed)?;
        }
        writeln!(f, "Average processing time per image: {:.3} s", self.avg_secs())?;
        write!(f, "Max processing time per image: {:.3} s", self.max_secs())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub images: usize,
    pub summary: MetricSummary,
}

impl ValidationReport {
    pub fn f1_proxy(&self) -> Option<f64> {
        self.summary.f1_proxy()
    }
}

fn metric(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.4}")).unwrap_or_else(|| "n/a".into())
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Validation report ===")?;
        writeln!(f, "Images evaluated: {}", self.images)?;
        writeln!(f, "mAP@0.5:      {}", metric(self.summary.map_50))?;
        writeln!(f, "mAP@0.5:0.95: {}", metric(self.summary.map))?;
        writeln!(f, "mAP@0.75:     {}", metric(self.summary.map_75))?;
        write!(
            f,
            "F1 (approx., harmonic mean of mAP@0.5 and mAR@100): {}",
            metric(self.f1_proxy())
        )
    }
}
