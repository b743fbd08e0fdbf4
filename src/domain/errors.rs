use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Operation failed: {0}")]
    OperationFailed(String),
    #[error("Unrecognized bounding box shape: {0}")]
    UnrecognizedBoxShape(String),
    #[error("Unsupported format: {0}")]
    UnsupportedMediaType(String),
    #[error("Invalid image: {0}")]
    InvalidImage(String),
    #[error("Model load failed: {0}")]
    ModelLoad(String),
    #[error("Inference failed: {0}")]
    Inference(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DomainError {
    /// Errors caused by what the client sent, as opposed to server state.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_)
                | Self::UnrecognizedBoxShape(_)
                | Self::UnsupportedMediaType(_)
                | Self::InvalidImage(_)
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
