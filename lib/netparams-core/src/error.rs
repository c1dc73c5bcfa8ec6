use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Failures that are not validation outcomes. Validation failures are
/// reported through a `Verdict`; these make the caller skip the status
/// update and retry later.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Cloud API error: {0}")]
    Cloud(String),

    #[error("GKENetworkParamSet not found: {0}")]
    ParamsNotFound(String),

    #[error("params {0} does not have PodIPv4Ranges")]
    MissingPodRanges(String),

    #[error("Invalid resource URL: {0}")]
    InvalidResourceUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CoreError::Cloud("HTTP 503".to_string()).to_string(),
            "Cloud API error: HTTP 503"
        );
        assert_eq!(
            CoreError::MissingPodRanges("gnp-1".to_string()).to_string(),
            "params gnp-1 does not have PodIPv4Ranges"
        );
    }
}
