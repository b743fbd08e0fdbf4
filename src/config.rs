use clap::{Args, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::domain::model::{Device, InferenceConfig, ModelId, YoloParams};

pub const DEFAULT_WEIGHTS: &str = "weights/best.onnx";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeviceArg {
    Cpu,
    Cuda,
}

impl From<DeviceArg> for Device {
    fn from(d: DeviceArg) -> Self {
        match d {
            DeviceArg::Cpu => Device::Cpu,
            DeviceArg::Cuda => Device::Cuda,
        }
    }
}

/// Detector options shared by the server and both batch tools.
#[derive(Debug, Clone, Args)]
pub struct DetectorArgs {
    /// Path to the YOLO ONNX export.
    #[arg(long, env = "LOGO_DETECTOR_WEIGHTS", default_value = DEFAULT_WEIGHTS)]
    pub weights: String,
    /// Confidence threshold.
    #[arg(long, env = "LOGO_DETECTOR_CONF", default_value_t = 0.25, value_parser = parse_unit)]
    pub conf: f32,
    /// IoU threshold for non-maximum suppression.
    #[arg(long, env = "LOGO_DETECTOR_IOU", default_value_t = 0.7, value_parser = parse_unit)]
    pub iou: f32,
    /// Network input size (square).
    #[arg(long, env = "LOGO_DETECTOR_IMGSZ", default_value_t = 640)]
    pub imgsz: u32,
    /// Maximum detections kept per image.
    #[arg(long, env = "LOGO_DETECTOR_MAX_DET", default_value_t = 300)]
    pub max_det: usize,
    /// Execution device; CUDA falls back to CPU when unavailable.
    #[arg(long, env = "LOGO_DETECTOR_DEVICE", value_enum, default_value_t = DeviceArg::Cpu)]
    pub device: DeviceArg,
}

impl DetectorArgs {
    pub fn inference_config(&self) -> InferenceConfig {
        InferenceConfig {
            model: ModelId { name: "logo".into(), onnx_path: self.weights.clone() },
            params: YoloParams {
                input_size: self.imgsz,
                conf_threshold: self.conf,
                iou_threshold: self.iou,
                max_detections: self.max_det,
            },
            device: self.device.into(),
        }
    }
}

fn parse_unit(s: &str) -> Result<f32, String> {
    let v: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(format!("{v} is outside [0, 1]"))
    }
}

/// fmt subscriber on stderr, `RUST_LOG` or `info` by default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
