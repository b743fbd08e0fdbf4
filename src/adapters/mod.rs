pub mod fs;
pub mod http;
pub mod metrics;
pub mod onnx;
