use thiserror::Error;

/// Transient failures talking to the marketplace. All of them are retried
/// and none of them escape the source.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Blocked by marketplace (HTTP {status})")]
    Blocked { status: u16 },

    #[error("Received HTML instead of JSON, likely a captcha page")]
    Captcha,

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl SourceError {
    /// Whether the marketplace is actively refusing us rather than flaking.
    pub fn is_block_signal(&self) -> bool {
        matches!(self, SourceError::Blocked { .. } | SourceError::Captcha)
    }
}
