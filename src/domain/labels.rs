//! YOLO text annotations: one `class x_center y_center width height` line per
//! object, coordinates relative to the image size.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::bbox::BoundingBox;
use super::errors::DomainResult;

/// Decodes label text into absolute boxes for an image of `width` x `height`.
/// Lines with fewer than five tokens, unparsable or non-finite numbers, or a
/// negative extent are skipped.
pub fn parse_yolo_labels(text: &str, width: u32, height: u32) -> Vec<BoundingBox> {
    let (w, h) = (width as f32, height as f32);
    text.lines()
        .filter_map(|line| {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < 5 {
                return None;
            }
            // class id is parsed for well-formedness only; single class
            let _class: f32 = tokens[0].parse().ok()?;
            let [cx, cy, bw, bh] = finite([tokens[1], tokens[2], tokens[3], tokens[4]])?;
            BoundingBox::new(
                (cx - bw / 2.0) * w,
                (cy - bh / 2.0) * h,
                (cx + bw / 2.0) * w,
                (cy + bh / 2.0) * h,
            )
            .ok()
        })
        .collect()
}

// `f32::from_str` accepts `nan` and `inf`
fn finite(tokens: [&str; 4]) -> Option<[f32; 4]> {
    let mut out = [0.0f32; 4];
    for (slot, token) in out.iter_mut().zip(tokens) {
        let v: f32 = token.parse().ok()?;
        if !v.is_finite() {
            return None;
        }
        *slot = v;
    }
    Some(out)
}

/// Reads a label file. A missing file means "no ground truth" and yields no
/// boxes. Invalid UTF-8 is replaced, so only the affected lines are dropped.
pub fn load_yolo_labels(path: &Path, width: u32, height: u32) -> DomainResult<Vec<BoundingBox>> {
    match fs::read(path) {
        Ok(bytes) => Ok(parse_yolo_labels(&String::from_utf8_lossy(&bytes), width, height)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}
