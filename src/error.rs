/// Error types for the translation suggestion providers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestError {
    /// Required credential or configuration is absent or unusable
    Config(String),
    /// Error establishing or completing an HTTP request
    Network(String),
    /// The external engine answered with an error
    Engine(String),
    /// The engine answered, but the payload could not be interpreted
    InvalidResponse(String),
    /// A custom placeholder pattern failed to compile
    Pattern(String),
}

impl std::fmt::Display for SuggestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestError::Config(msg) => write!(f, "Configuration error: {}", msg),
            SuggestError::Network(msg) => write!(f, "Network error: {}", msg),
            SuggestError::Engine(msg) => write!(f, "Engine error: {}", msg),
            SuggestError::InvalidResponse(msg) => write!(f, "Invalid engine response: {}", msg),
            SuggestError::Pattern(msg) => write!(f, "Invalid placeholder pattern: {}", msg),
        }
    }
}

impl std::error::Error for SuggestError {}

impl From<reqwest::Error> for SuggestError {
    fn from(error: reqwest::Error) -> Self {
        SuggestError::Network(error.to_string())
    }
}

/// Result type for suggestion operations
pub type SuggestResult<T> = Result<T, SuggestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        assert_eq!(
            SuggestError::Config("missing key".to_string()).to_string(),
            "Configuration error: missing key"
        );
        assert_eq!(
            SuggestError::Network("timed out".to_string()).to_string(),
            "Network error: timed out"
        );
        assert_eq!(
            SuggestError::Engine("HTTP 500".to_string()).to_string(),
            "Engine error: HTTP 500"
        );
        assert_eq!(
            SuggestError::InvalidResponse("no choices".to_string()).to_string(),
            "Invalid engine response: no choices"
        );
        assert_eq!(
            SuggestError::Pattern("unbalanced".to_string()).to_string(),
            "Invalid placeholder pattern: unbalanced"
        );
    }

    #[test]
    fn test_errors_are_comparable() {
        let a = SuggestError::Engine("boom".to_string());
        let b = SuggestError::Engine("boom".to_string());
        assert_eq!(a, b);
        assert_ne!(a, SuggestError::Network("boom".to_string()));
    }
}
