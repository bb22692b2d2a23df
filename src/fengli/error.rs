#[derive(Debug, thiserror::Error)]
pub enum FengliError {
    #[error("invalid transcript: {0}")]
    InvalidTranscript(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },
    #[error("malformed response: {0}")]
    Response(String),
}

/// Every attempt failed. Holds the error from the final attempt.
#[derive(Debug, thiserror::Error)]
#[error("[FENGLI] {last} (gave up after {attempts} attempts)")]
pub struct RetryError {
    pub attempts: u32,
    #[source]
    pub last: FengliError,
}
