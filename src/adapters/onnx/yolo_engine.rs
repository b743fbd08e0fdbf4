use anyhow::{anyhow, Result};
use image::{imageops::FilterType, RgbImage};
use ndarray::{s, Array4, ArrayView2, ArrayViewD, Axis, IxDyn};
use ort::execution_providers::CUDAExecutionProvider;
use ort::session::Session;
use ort::value::Value;
use std::fs;
use std::sync::Mutex;
use tracing::{debug, info, warn};

use crate::application::ports::DetectorPort;
use crate::domain::bbox::BoundingBox;
use crate::domain::detection::Detection;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::{Device, InferenceConfig, YoloParams};

/// YOLO detector backed by an ONNX Runtime session.
///
/// Expects an Ultralytics-style export with a `[1, 4 + classes, candidates]`
/// output, boxes as `cx, cy, w, h` in network input pixels.
pub struct OnnxYoloEngine {
    session: Mutex<Session>,
    params: YoloParams,
}

impl OnnxYoloEngine {
    pub fn load(cfg: &InferenceConfig) -> Result<Self> {
        let mut builder = Session::builder()?.with_intra_threads(4)?;

        if cfg.device == Device::Cuda {
            // CUDA is optional; keep the CPU builder if registration fails.
            let cuda = CUDAExecutionProvider::default().build();
            match builder.clone().with_execution_providers([cuda]) {
                Ok(builder_with_cuda) => builder = builder_with_cuda,
                Err(e) => warn!("CUDA unavailable, falling back to CPU: {e}"),
            }
        }

        let model_bytes = fs::read(&cfg.model.onnx_path)
            .map_err(|e| anyhow!("cannot read weights {}: {e}", cfg.model.onnx_path))?;
        let session = builder.commit_from_memory(&model_bytes)?;

        info!(
            "Model {} loaded from {} (conf={}, device={:?})",
            cfg.model.name, cfg.model.onnx_path, cfg.params.conf_threshold, cfg.device
        );

        Ok(Self { session: Mutex::new(session), params: cfg.params.clone() })
    }

    pub fn infer(&self, rgb: &RgbImage) -> Result<Vec<Detection>> {
        let imgsz = self.params.input_size as usize;
        let resized = image::imageops::resize(rgb, imgsz as u32, imgsz as u32, FilterType::Triangle);

        let mut input = Array4::<f32>::zeros((1, 3, imgsz, imgsz));
        for (x, y, pixel) in resized.enumerate_pixels() {
            input[[0, 0, y as usize, x as usize]] = pixel[0] as f32 / 255.0;
            input[[0, 1, y as usize, x as usize]] = pixel[1] as f32 / 255.0;
            input[[0, 2, y as usize, x as usize]] = pixel[2] as f32 / 255.0;
        }

        let input_shape = vec![1, 3, imgsz as i64, imgsz as i64];
        let (raw, _) = input.into_raw_vec_and_offset();
        let input_tensor = Value::from_array((input_shape, raw))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("session lock poisoned"))?;
        let outputs = session.run(ort::inputs![input_tensor])?;
        let (shape_out, data_out) = outputs[0].try_extract_tensor::<f32>()?;

        let dims: Vec<usize> = shape_out.iter().map(|&x| x as usize).collect();
        if dims.len() != 3 || dims[1] < 5 {
            return Err(anyhow!("unexpected output shape {:?}", dims));
        }
        let array_view = ArrayViewD::from_shape(IxDyn(&dims), data_out)?;
        let view = array_view.index_axis(Axis(0), 0).into_dimensionality()?;
        let detections = decode_candidates(view, rgb.dimensions(), &self.params);
        debug!("{} detections after NMS", detections.len());
        Ok(detections)
    }
}

/// Turns one raw output slab `[4 + classes, candidates]` into detections in
/// original image pixels: confidence threshold on the best class score, NMS,
/// then clip to the image and truncate to whole pixels.
pub fn decode_candidates(view: ArrayView2<f32>, orig: (u32, u32), params: &YoloParams) -> Vec<Detection> {
    let imgsz = params.input_size as f32;
    let (w, h) = (orig.0 as f32, orig.1 as f32);
    let (sx, sy) = (w / imgsz, h / imgsz);

    let mut candidates = Vec::new();
    for i in 0..view.shape()[1] {
        let max_score = view
            .slice(s![4.., i])
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max);

        if max_score >= params.conf_threshold {
            let cx = view[[0, i]];
            let cy = view[[1, i]];
            let bw = view[[2, i]];
            let bh = view[[3, i]];

            let bbox = BoundingBox::from_corners(
                (cx - bw / 2.0) * sx,
                (cy - bh / 2.0) * sy,
                (cx + bw / 2.0) * sx,
                (cy + bh / 2.0) * sy,
            );
            candidates.push((bbox, max_score));
        }
    }

    non_max_suppression(candidates, params.iou_threshold, params.max_detections)
        .into_iter()
        .map(|(bbox, score)| Detection::new(bbox.clip(w, h).truncated(), Some(score)))
        .collect()
}

impl DetectorPort for OnnxYoloEngine {
    fn detect(&self, image: &RgbImage) -> DomainResult<Vec<Detection>> {
        self.infer(image).map_err(|e| DomainError::Inference(e.to_string()))
    }
}

/// Greedy class-agnostic NMS, highest score first.
pub fn non_max_suppression(
    mut candidates: Vec<(BoundingBox, f32)>,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<(BoundingBox, f32)> {
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
    let mut kept: Vec<(BoundingBox, f32)> = Vec::new();
    for (bbox, score) in candidates {
        if kept.len() >= max_detections {
            break;
        }
        if kept.iter().all(|(k, _)| k.iou(&bbox) <= iou_threshold) {
            kept.push((bbox, score));
        }
    }
    kept
}
