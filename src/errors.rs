use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObscurationError {
    #[error("Domain error: {0}")]
    Domain(String),

    #[error("Ephemeris lookup failed: {0}")]
    Ephemeris(String),

    #[error("Invalid timestamp range: {0}")]
    TimeRange(String),

    #[error("Diagnostic rendering failed: {0}")]
    Render(String),

    #[error("Invalid settings: {0}")]
    Config(#[from] serde_json::Error),
}

impl ObscurationError {
    pub(crate) fn domain(msg: impl Into<String>) -> Self {
        ObscurationError::Domain(msg.into())
    }

    /// True for invalid physical input or unbroadcastable batches
    pub fn is_domain(&self) -> bool {
        matches!(self, ObscurationError::Domain(_))
    }
}

pub type Result<T> = std::result::Result<T, ObscurationError>;
