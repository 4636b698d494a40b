use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The company name is not present in the ticker table.
    #[error("Could not find ticker for '{0}'")]
    TickerNotFound(String),

    /// A provider call failed; carries the provider's message verbatim.
    #[error("{0}")]
    FetchError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl AnalysisError {
    /// Collapse a provider-side failure into a `FetchError`, keeping the
    /// provider's own message. Resolution errors pass through untouched.
    pub fn into_fetch_error(self) -> Self {
        match self {
            Self::FetchError(_) | Self::TickerNotFound(_) => self,
            Self::ApiError(msg)
            | Self::InvalidData(msg)
            | Self::RenderError(msg) => Self::FetchError(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_collapse_to_fetch_error_with_message() {
        let err = AnalysisError::ApiError("HTTP 429 Too Many Requests".to_string());
        assert_eq!(
            err.into_fetch_error(),
            AnalysisError::FetchError("HTTP 429 Too Many Requests".to_string())
        );

        let err = AnalysisError::InvalidData("missing chart.result".to_string());
        assert_eq!(err.into_fetch_error().to_string(), "missing chart.result");

        let err = AnalysisError::RenderError("no bars".to_string());
        assert_eq!(err.into_fetch_error(), AnalysisError::FetchError("no bars".to_string()));
    }

    #[test]
    fn resolution_error_is_not_rewrapped() {
        let err = AnalysisError::TickerNotFound("Acme".to_string());
        assert_eq!(err.clone().into_fetch_error(), err);
        assert_eq!(err.to_string(), "Could not find ticker for 'Acme'");
    }
}
