use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("unknown filter preset: {0}")]
    UnknownPreset(String),
    #[error("unknown adjustment: {0}")]
    UnknownAdjustment(String),
    #[error("image source must be a base64 data url")]
    InvalidDataUrl,
}
