//! Single-class logo detection over a YOLO ONNX export: an HTTP endpoint,
//! a batch triage tool and an mAP validation tool sharing one detector.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
