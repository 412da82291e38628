use thiserror::Error;

/// Fatal simulation errors. The instance that raised one must be torn down.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FieldError {
    #[error("non-finite {what} at particle {index}")]
    NonFinite { index: usize, what: &'static str },
    #[error("particle buffer is empty")]
    EmptyBuffer,
}
