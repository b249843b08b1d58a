//! Error taxonomy shared by every rendering step.

/// Failure of a single generation step.
///
/// None of these are retried; the caller surfaces the message and waits for
/// the next user action.
#[derive(Debug, thiserror::Error)]
pub enum QrError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    UnsupportedFormat(String),
    #[error("Failed to load image: {0}")]
    Decode(String),
    #[error("QR encode error: {0}")]
    Encoding(String),
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),
    #[error("PNG export failed: {0}")]
    Export(String),
}

impl QrError {
    /// Short machine-readable name, used in API error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::Decode(_) => "decode",
            Self::Encoding(_) => "encoding",
            Self::InvalidDimension(_) => "invalid_dimension",
            Self::Export(_) => "export",
        }
    }
}

pub type Result<T> = std::result::Result<T, QrError>;
