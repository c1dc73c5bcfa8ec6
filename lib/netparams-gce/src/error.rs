use netparams_core::CoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GceError>;

#[derive(Error, Debug)]
pub enum GceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Compute API returned {status} for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<GceError> for CoreError {
    fn from(e: GceError) -> Self {
        CoreError::Cloud(e.to_string())
    }
}
