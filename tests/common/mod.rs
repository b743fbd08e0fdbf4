#![allow(dead_code)]

use image::{ImageFormat, Rgb, RgbImage};
use logo_detector::application::ports::DetectorPort;
use logo_detector::domain::{
    bbox::BoundingBox,
    detection::Detection,
    errors::{DomainError, DomainResult},
};
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Returns the same detections for every image and counts calls.
pub struct StubDetector {
    pub detections: Vec<Detection>,
    pub calls: AtomicUsize,
}

impl StubDetector {
    pub fn empty() -> Self {
        Self::returning(Vec::new())
    }

    pub fn one_box() -> Self {
        Self::returning(vec![Detection::new(BoundingBox::from_corners(2.0, 2.0, 6.0, 6.0), Some(0.9))])
    }

    pub fn returning(detections: Vec<Detection>) -> Self {
        Self { detections, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DetectorPort for StubDetector {
    fn detect(&self, _image: &RgbImage) -> DomainResult<Vec<Detection>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.detections.clone())
    }
}

/// Always fails, as a crashed inference backend would.
pub struct FailingDetector;

impl DetectorPort for FailingDetector {
    fn detect(&self, _image: &RgbImage) -> DomainResult<Vec<Detection>> {
        Err(DomainError::Inference("backend unavailable".into()))
    }
}

pub fn image_bytes(format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_pixel(8, 8, Rgb([200, 30, 30]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

pub fn write_image(dir: &Path, name: &str, format: ImageFormat) {
    std::fs::write(dir.join(name), image_bytes(format)).unwrap();
}
