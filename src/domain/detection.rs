use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::bbox::BoundingBox;

pub const DEFAULT_SCORE: f32 = 1.0;

/// Single-class label shared by every prediction and ground-truth box.
pub const LOGO_CLASS: usize = 0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub score: Option<f32>,
}

impl Detection {
    pub fn new(bbox: BoundingBox, score: Option<f32>) -> Self {
        Self { bbox, score }
    }

    pub fn score(&self) -> f32 {
        self.score.unwrap_or(DEFAULT_SCORE)
    }
}

/// Confidence fields as exposed by the different detector result layouts.
/// Resolution order is `confidence`, `score`, `conf`, then [`DEFAULT_SCORE`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct ScoreFields {
    pub confidence: Option<f32>,
    pub score: Option<f32>,
    pub conf: Option<f32>,
}

impl ScoreFields {
    pub fn from_json(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_f64).map(|v| v as f32);
        Self {
            confidence: field("confidence"),
            score: field("score"),
            conf: field("conf"),
        }
    }

    pub fn resolve(&self) -> f32 {
        self.confidence
            .or(self.score)
            .or(self.conf)
            .unwrap_or(DEFAULT_SCORE)
    }
}

impl From<&Detection> for ScoreFields {
    fn from(d: &Detection) -> Self {
        Self { confidence: d.score, ..Self::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn conf_only_is_used() {
        let fields = ScoreFields::from_json(&json!({"conf": 0.42}));
        assert_eq!(fields.resolve(), 0.42);
    }

    #[test]
    fn no_score_field_defaults_to_one() {
        assert_eq!(ScoreFields::from_json(&json!({"bbox": [0, 0, 1, 1]})).resolve(), 1.0);
        assert_eq!(ScoreFields::default().resolve(), 1.0);
    }

    #[test]
    fn confidence_has_priority() {
        let fields = ScoreFields { confidence: Some(0.9), score: Some(0.5), conf: Some(0.1) };
        assert_eq!(fields.resolve(), 0.9);
        let fields = ScoreFields { confidence: None, score: Some(0.5), conf: Some(0.1) };
        assert_eq!(fields.resolve(), 0.5);
    }

    #[test]
    fn detection_without_score_reports_one() {
        let d = Detection::new(BoundingBox::from_corners(0.0, 0.0, 1.0, 1.0), None);
        assert_eq!(d.score(), 1.0);
        assert_eq!(ScoreFields::from(&d).resolve(), 1.0);
    }
}
