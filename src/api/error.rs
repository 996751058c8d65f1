/// Failure taxonomy for an analysis request
///
/// Every variant's `Display` string is shown to the user as-is, so the
/// wording here is the user-facing copy. All of these are recoverable:
/// the selected image is retained and the request can be retried.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyzeError {
    /// The request exceeded the configured timeout.
    #[error("Request timed out. Please try again.")]
    Timeout,

    /// No response reached us at all (endpoint down, network error).
    #[error("No response from server. Please check if the backend is running.")]
    Unreachable,

    /// The server answered with a non-2xx status. The `detail` string from
    /// the error body, when present, is shown verbatim.
    #[error("{}", .detail.as_deref().unwrap_or("Error analyzing food"))]
    Server { status: u16, detail: Option<String> },

    /// A 2xx response whose body was empty or not the expected shape.
    /// An empty result list counts as invalid, not as a success with
    /// nothing to show.
    #[error("Invalid response format from server")]
    InvalidResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_detail_shown_verbatim() {
        let error = AnalyzeError::Server {
            status: 500,
            detail: Some("model unavailable".to_string()),
        };
        assert_eq!(error.to_string(), "model unavailable");
    }

    #[test]
    fn test_server_without_detail_is_generic() {
        let error = AnalyzeError::Server {
            status: 502,
            detail: None,
        };
        assert_eq!(error.to_string(), "Error analyzing food");
    }

    #[test]
    fn test_timeout_message() {
        assert_eq!(
            AnalyzeError::Timeout.to_string(),
            "Request timed out. Please try again."
        );
    }
}
