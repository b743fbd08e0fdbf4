use std::sync::Arc;
use crate::application::services::DetectionService;

/// Shared state for the axum handlers: the use cases plus request limits.
#[derive(Clone)]
pub struct HttpState {
    pub detection: Arc<DetectionService>,
    /// Upper bound for a whole multipart request body.
    pub max_upload_bytes: usize,
}
