use std::collections::BTreeSet;

use crate::application::ports::MetricAccumulatorPort;
use crate::domain::bbox::BoundingBox;
use crate::domain::metrics::{GroundTruthRecord, MetricSummary, PredictionRecord};

/// IoU thresholds 0.50:0.05:0.95.
pub const IOU_THRESHOLDS: [f64; 10] = [0.5, 0.55, 0.6, 0.65, 0.7, 0.75, 0.8, 0.85, 0.9, 0.95];
const IDX_50: usize = 0;
const IDX_75: usize = 5;
const RECALL_POINTS: usize = 101;
pub const MAX_DETECTIONS: usize = 100;

/// COCO-style mean average precision over every box size, evaluated per class
/// and averaged over the classes that have ground truth.
pub struct CocoMeanAveragePrecision {
    max_detections: usize,
    images: Vec<(PredictionRecord, GroundTruthRecord)>,
}

/// Outcome of evaluating one class at one IoU threshold.
#[derive(Debug, Clone, Copy)]
struct ClassEval {
    ap: f64,
    recall: f64,
}

impl CocoMeanAveragePrecision {
    pub fn new() -> Self {
        Self::with_max_detections(MAX_DETECTIONS)
    }

    pub fn with_max_detections(max_detections: usize) -> Self {
        Self { max_detections, images: Vec::new() }
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    fn classes(&self) -> BTreeSet<usize> {
        self.images
            .iter()
            .flat_map(|(_, gt)| gt.labels.iter().copied())
            .collect()
    }

    fn evaluate(&self, class: usize, iou_threshold: f64) -> Option<ClassEval> {
        let mut ranked: Vec<(f32, bool)> = Vec::new();
        let mut n_gt = 0usize;

        for (preds, target) in &self.images {
            let gts: Vec<BoundingBox> = target
                .boxes
                .iter()
                .zip(&target.labels)
                .filter(|(_, &l)| l == class)
                .map(|(b, _)| BoundingBox::from_corners(b[0], b[1], b[2], b[3]))
                .collect();
            n_gt += gts.len();

            let mut dets: Vec<(f32, BoundingBox)> = preds
                .boxes
                .iter()
                .zip(&preds.scores)
                .zip(&preds.labels)
                .filter(|(_, &l)| l == class)
                .map(|((b, &s), _)| (s, BoundingBox::from_corners(b[0], b[1], b[2], b[3])))
                .collect();
            // stable, so equal scores keep submission order
            dets.sort_by(|a, b| b.0.total_cmp(&a.0));
            dets.truncate(self.max_detections);

            let mut matched = vec![false; gts.len()];
            for (score, det) in dets {
                let mut best_iou = iou_threshold.min(1.0 - 1e-10);
                let mut best = None;
                for (g, gt) in gts.iter().enumerate() {
                    if matched[g] {
                        continue;
                    }
                    let iou = det.iou(gt) as f64;
                    // NaN never matches
                    if !(iou >= best_iou) {
                        continue;
                    }
                    best_iou = iou;
                    best = Some(g);
                }
                if let Some(g) = best {
                    matched[g] = true;
                }
                ranked.push((score, best.is_some()));
            }
        }

        if n_gt == 0 {
            return None;
        }

        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut recall = Vec::with_capacity(ranked.len());
        let mut precision = Vec::with_capacity(ranked.len());
        let (mut tp, mut fp) = (0.0f64, 0.0f64);
        for &(_, is_tp) in &ranked {
            if is_tp { tp += 1.0 } else { fp += 1.0 }
            recall.push(tp / n_gt as f64);
            precision.push(tp / (tp + fp));
        }

        // precision envelope: non-increasing from left to right
        for i in (1..precision.len()).rev() {
            if precision[i] > precision[i - 1] {
                precision[i - 1] = precision[i];
            }
        }

        let mut sum = 0.0;
        for k in 0..RECALL_POINTS {
            let r = k as f64 / (RECALL_POINTS - 1) as f64;
            let idx = recall.partition_point(|&rc| rc < r);
            if let Some(&p) = precision.get(idx) {
                sum += p;
            }
        }

        Some(ClassEval {
            ap: sum / RECALL_POINTS as f64,
            recall: recall.last().copied().unwrap_or(0.0),
        })
    }
}

impl Default for CocoMeanAveragePrecision {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricAccumulatorPort for CocoMeanAveragePrecision {
    fn update(&mut self, preds: PredictionRecord, target: GroundTruthRecord) {
        self.images.push((preds, target));
    }

    fn compute(&self) -> MetricSummary {
        let classes = self.classes();
        if classes.is_empty() {
            return MetricSummary::default();
        }

        let mut ap_at = [0.0f64; IOU_THRESHOLDS.len()];
        let mut recall_sum = 0.0;
        for (t, &thr) in IOU_THRESHOLDS.iter().enumerate() {
            let evals: Vec<ClassEval> = classes.iter().filter_map(|&c| self.evaluate(c, thr)).collect();
            let n = evals.len().max(1) as f64;
            ap_at[t] = evals.iter().map(|e| e.ap).sum::<f64>() / n;
            recall_sum += evals.iter().map(|e| e.recall).sum::<f64>() / n;
        }

        MetricSummary {
            map: Some(ap_at.iter().sum::<f64>() / ap_at.len() as f64),
            map_50: Some(ap_at[IDX_50]),
            map_75: Some(ap_at[IDX_75]),
            mar_100: Some(recall_sum / IOU_THRESHOLDS.len() as f64),
        }
    }
}
