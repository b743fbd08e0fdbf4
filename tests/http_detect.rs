mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use common::{image_bytes, StubDetector};
use image::ImageFormat;
use logo_detector::adapters::http::{router, state::HttpState};
use logo_detector::application::services::DetectionService;
use logo_detector::domain::model::ModelId;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "logo-test-boundary";

fn app(detector: Arc<StubDetector>) -> Router {
    let model = ModelId { name: "logo".into(), onnx_path: "weights/best.onnx".into() };
    router(HttpState {
        detection: Arc::new(DetectionService::new(detector, model)),
        max_upload_bytes: 1024 * 1024,
    })
}

/// (field name, file name, content type, bytes)
fn multipart(parts: &[(&str, &str, &str, Vec<u8>)]) -> Request<Body> {
    let mut body = Vec::new();
    for (field, file, ct, bytes) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file}\"\r\n").as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {ct}\r\n\r\n").as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/detect")
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn detects_across_all_files() {
    let detector = Arc::new(StubDetector::one_box());
    let req = multipart(&[
        ("files", "a.png", "image/png", image_bytes(ImageFormat::Png)),
        ("files", "b.jpg", "image/jpeg", image_bytes(ImageFormat::Jpeg)),
    ]);
    let resp = app(detector.clone()).oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let box_json = json!({"bbox": {"x_min": 2, "y_min": 2, "x_max": 6, "y_max": 6}});
    assert_eq!(json_body(resp).await, json!({"detections": [box_json.clone(), box_json]}));
    assert_eq!(detector.calls(), 2);
}

#[tokio::test]
async fn single_file_field_is_accepted() {
    let detector = Arc::new(StubDetector::empty());
    let req = multipart(&[("file", "a.png", "image/png", image_bytes(ImageFormat::Png))]);
    let resp = app(detector.clone()).oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!({"detections": []}));
    assert_eq!(detector.calls(), 1);
}

#[tokio::test]
async fn text_plain_rejects_whole_batch() {
    let detector = Arc::new(StubDetector::one_box());
    let req = multipart(&[
        ("files", "a.png", "image/png", image_bytes(ImageFormat::Png)),
        ("files", "notes.txt", "text/plain", b"hello".to_vec()),
        ("files", "c.png", "image/png", image_bytes(ImageFormat::Png)),
    ]);
    let resp = app(detector.clone()).oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert!(body["detail"].as_str().unwrap().contains("text/plain"));
    assert_eq!(detector.calls(), 0);
}

#[tokio::test]
async fn undecodable_image_is_bad_request() {
    let detector = Arc::new(StubDetector::one_box());
    let req = multipart(&[("files", "a.png", "image/png", b"\x89PNG broken".to_vec())]);
    let resp = app(detector.clone()).oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["detail"].as_str().unwrap().starts_with("Invalid image"));
    assert_eq!(detector.calls(), 0);
}

#[tokio::test]
async fn earliest_bad_file_in_body_order_is_reported() {
    let detector = Arc::new(StubDetector::one_box());
    let req = multipart(&[
        ("files", "broken.png", "image/png", b"\x89PNG broken".to_vec()),
        ("files", "notes.txt", "text/plain", b"hello".to_vec()),
    ]);
    let resp = app(detector.clone()).oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["detail"].as_str().unwrap().starts_with("Invalid image"));
    assert_eq!(detector.calls(), 0);
}

#[tokio::test]
async fn request_without_files_is_bad_request() {
    let resp = app(Arc::new(StubDetector::empty())).oneshot(multipart(&[])).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_model() {
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let resp = app(Arc::new(StubDetector::empty())).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], "weights/best.onnx");
}
