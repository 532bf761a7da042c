//! Error taxonomy for the prediction pipeline

use thiserror::Error;

/// Errors surfaced to callers of the prediction pipeline.
///
/// Logging failures are deliberately absent: a failed audit append is
/// reported through diagnostics and metrics, never to the caller.
#[derive(Debug, Error)]
pub enum PredictError {
    /// Caller error: malformed, empty, or unmatched payload. Never retried.
    #[error("{0}")]
    InvalidRequest(String),

    /// Service-readiness error: the model could not be loaded from the
    /// registry, or the predictor failed during inference.
    #[error("model not available: {0}")]
    ModelUnavailable(#[source] anyhow::Error),
}

impl PredictError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        PredictError::InvalidRequest(reason.into())
    }

    /// Returns true for errors the caller can fix by changing the request.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, PredictError::InvalidRequest(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_display() {
        let err = PredictError::invalid("no features provided");
        assert_eq!(err.to_string(), "no features provided");
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_model_unavailable_carries_cause() {
        let err = PredictError::ModelUnavailable(anyhow::anyhow!("registry unreachable"));
        assert_eq!(err.to_string(), "model not available: registry unreachable");
        assert!(!err.is_caller_error());
    }
}
