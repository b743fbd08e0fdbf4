use serde::{Deserialize, Serialize};

use super::bbox::{BoundingBox, BoxRepr};
use super::detection::{Detection, ScoreFields, LOGO_CLASS};

/// Predictions for one image, column-wise like a metrics library expects them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionRecord {
    pub boxes: Vec<[f32; 4]>,
    pub scores: Vec<f32>,
    pub labels: Vec<usize>,
}

impl PredictionRecord {
    pub fn from_detections(detections: &[Detection]) -> Self {
        let mut rec = Self::default();
        for det in detections {
            rec.boxes.push(BoxRepr::from(det.bbox).to_xyxy());
            rec.scores.push(ScoreFields::from(det).resolve());
            rec.labels.push(LOGO_CLASS);
        }
        rec
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroundTruthRecord {
    pub boxes: Vec<[f32; 4]>,
    pub labels: Vec<usize>,
}

impl GroundTruthRecord {
    pub fn from_boxes(boxes: &[BoundingBox]) -> Self {
        Self {
            boxes: boxes.iter().map(BoundingBox::to_xyxy).collect(),
            labels: vec![LOGO_CLASS; boxes.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// Aggregate statistics. `None` means undefined (no ground truth seen).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    /// mAP averaged over IoU 0.50:0.05:0.95
    pub map: Option<f64>,
    pub map_50: Option<f64>,
    pub map_75: Option<f64>,
    /// mean average recall, 100 detections per image
    pub mar_100: Option<f64>,
}

impl MetricSummary {
    /// Harmonic mean of mAP@0.5 (as a precision stand-in) and mAR@100 (as a
    /// recall stand-in, falling back to mAP@0.5). This is an approximation
    /// and not a matched-detection F1.
    pub fn f1_proxy(&self) -> Option<f64> {
        let p = self.map_50?;
        let r = self.mar_100.unwrap_or(p);
        if p + r <= 0.0 {
            Some(0.0)
        } else {
            Some(2.0 * p * r / (p + r))
        }
    }
}
