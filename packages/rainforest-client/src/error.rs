use thiserror::Error;

/// Errors returned by the Rainforest API client.
#[derive(Debug, Error)]
pub enum RainforestError {
    /// HTTP transport failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the API.
    #[error("Rainforest API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The API answered but reported the request as unsuccessful.
    #[error("Rainforest request rejected: {0}")]
    Rejected(String),

    /// The response carried no product payload.
    #[error("no product data in response")]
    MissingProduct,
}

pub type Result<T> = std::result::Result<T, RainforestError>;
