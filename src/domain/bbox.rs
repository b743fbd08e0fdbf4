use serde::Serialize;
use serde_json::{Map, Value};

use super::errors::{DomainError, DomainResult};

/// Axis-aligned box in absolute pixel coordinates, `[xmin, ymin, xmax, ymax]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    x_min: f32,
    y_min: f32,
    x_max: f32,
    y_max: f32,
}

impl BoundingBox {
    /// Rejects non-finite coordinates and inverted boxes.
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> DomainResult<Self> {
        if ![x_min, y_min, x_max, y_max].iter().all(|v| v.is_finite()) {
            return Err(DomainError::InvalidInput(format!(
                "non-finite box [{x_min}, {y_min}, {x_max}, {y_max}]"
            )));
        }
        if !(x_min <= x_max && y_min <= y_max) {
            return Err(DomainError::InvalidInput(format!(
                "inverted box [{x_min}, {y_min}, {x_max}, {y_max}]"
            )));
        }
        Ok(Self { x_min, y_min, x_max, y_max })
    }

    /// Builds a box from two arbitrary corners, ordering the coordinates.
    pub fn from_corners(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x_min: x1.min(x2),
            y_min: y1.min(y2),
            x_max: x1.max(x2),
            y_max: y1.max(y2),
        }
    }

    pub fn x_min(&self) -> f32 { self.x_min }
    pub fn y_min(&self) -> f32 { self.y_min }
    pub fn x_max(&self) -> f32 { self.x_max }
    pub fn y_max(&self) -> f32 { self.y_max }

    pub fn to_xyxy(&self) -> [f32; 4] {
        [self.x_min, self.y_min, self.x_max, self.y_max]
    }

    pub fn width(&self) -> f32 { self.x_max - self.x_min }
    pub fn height(&self) -> f32 { self.y_max - self.y_min }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Drops the fractional part of every coordinate (towards zero).
    pub fn truncated(&self) -> Self {
        Self {
            x_min: self.x_min.trunc(),
            y_min: self.y_min.trunc(),
            x_max: self.x_max.trunc(),
            y_max: self.y_max.trunc(),
        }
    }

    pub fn clip(&self, width: f32, height: f32) -> Self {
        Self {
            x_min: self.x_min.clamp(0.0, width),
            y_min: self.y_min.clamp(0.0, height),
            x_max: self.x_max.clamp(0.0, width),
            y_max: self.y_max.clamp(0.0, height),
        }
    }

    pub fn iou(&self, other: &Self) -> f32 {
        let iw = (self.x_max.min(other.x_max) - self.x_min.max(other.x_min)).max(0.0);
        let ih = (self.y_max.min(other.y_max) - self.y_min.max(other.y_min)).max(0.0);
        let inter = iw * ih;
        let union = self.area() + other.area() - inter;
        if union <= 0.0 {
            0.0
        } else {
            inter / union
        }
    }
}

/// The box layouts accepted from external tooling, one variant per naming convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoxRepr {
    Corners([f32; 4]),
    MinMax { xmin: f32, ymin: f32, xmax: f32, ymax: f32 },
    SnakeMinMax { x_min: f32, y_min: f32, x_max: f32, y_max: f32 },
    LeftTopWidthHeight { left: f32, top: f32, width: f32, height: f32 },
    XyWidthHeight { x: f32, y: f32, width: f32, height: f32 },
}

impl BoxRepr {
    /// Resolves a loosely typed value into a variant. Shapes are tried in
    /// declaration order, so an object carrying both `xmin..` and `left..`
    /// keys resolves as `MinMax`.
    pub fn from_json(value: &Value) -> DomainResult<Self> {
        match value {
            Value::Array(items) => {
                if items.len() != 4 {
                    return Err(DomainError::UnrecognizedBoxShape(format!(
                        "sequence of {} elements, expected 4",
                        items.len()
                    )));
                }
                let mut out = [0.0f32; 4];
                for (slot, item) in out.iter_mut().zip(items) {
                    *slot = item.as_f64().ok_or_else(|| {
                        DomainError::UnrecognizedBoxShape(format!("non-numeric element {item}"))
                    })? as f32;
                }
                Ok(Self::Corners(out))
            }
            Value::Object(map) => {
                if let Some([xmin, ymin, xmax, ymax]) = numbers(map, ["xmin", "ymin", "xmax", "ymax"]) {
                    return Ok(Self::MinMax { xmin, ymin, xmax, ymax });
                }
                if let Some([x_min, y_min, x_max, y_max]) = numbers(map, ["x_min", "y_min", "x_max", "y_max"]) {
                    return Ok(Self::SnakeMinMax { x_min, y_min, x_max, y_max });
                }
                if let Some([left, top, width, height]) = numbers(map, ["left", "top", "width", "height"]) {
                    return Ok(Self::LeftTopWidthHeight { left, top, width, height });
                }
                if let Some([x, y, width, height]) = numbers(map, ["x", "y", "width", "height"]) {
                    return Ok(Self::XyWidthHeight { x, y, width, height });
                }
                let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                Err(DomainError::UnrecognizedBoxShape(format!("keys {keys:?}")))
            }
            other => Err(DomainError::UnrecognizedBoxShape(format!("not a sequence or mapping: {other}"))),
        }
    }

    pub fn to_xyxy(&self) -> [f32; 4] {
        match *self {
            Self::Corners(c) => c,
            Self::MinMax { xmin, ymin, xmax, ymax } => [xmin, ymin, xmax, ymax],
            Self::SnakeMinMax { x_min, y_min, x_max, y_max } => [x_min, y_min, x_max, y_max],
            Self::LeftTopWidthHeight { left, top, width, height } => {
                [left, top, left + width, top + height]
            }
            Self::XyWidthHeight { x, y, width, height } => [x, y, x + width, y + height],
        }
    }

}

impl From<BoundingBox> for BoxRepr {
    fn from(b: BoundingBox) -> Self {
        Self::SnakeMinMax { x_min: b.x_min, y_min: b.y_min, x_max: b.x_max, y_max: b.y_max }
    }
}

/// Canonical `[xmin, ymin, xmax, ymax]` for any JSON box shape.
pub fn normalize_box(value: &Value) -> DomainResult<[f32; 4]> {
    BoxRepr::from_json(value).map(|repr| repr.to_xyxy())
}

fn numbers(map: &Map<String, Value>, keys: [&str; 4]) -> Option<[f32; 4]> {
    let mut out = [0.0f32; 4];
    for (slot, key) in out.iter_mut().zip(keys) {
        *slot = map.get(key)?.as_f64()? as f32;
    }
    Some(out)
}
