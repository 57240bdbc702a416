use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image read error: {source}")]
    ImageRead {
        #[from]
        source: std::io::Error,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("No chart image supplied")]
    NoImages,
}

impl AnalysisError {
    /// Setup problems that will not go away by retrying.
    pub fn is_configuration(&self) -> bool {
        matches!(self, AnalysisError::Config(_))
    }

    /// Failures a user may reasonably retry after a notice.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AnalysisError::Transport(_)
                | AnalysisError::MalformedResponse(_)
                | AnalysisError::ImageRead { .. }
        )
    }
}

impl From<reqwest::Error> for AnalysisError {
    /// The request URL carries the credential as a query parameter, so it is
    /// dropped from the message.
    fn from(err: reqwest::Error) -> Self {
        AnalysisError::Transport(err.without_url().to_string())
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::MalformedResponse(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("Market data request failed: {source}")]
    Request {
        #[from]
        source: reqwest::Error,
    },

    #[error("Market data request returned status {status}")]
    Status { status: u16 },

    #[error("Invalid market data response: {0}")]
    InvalidResponse(String),
}
