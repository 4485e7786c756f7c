/// Error kinds for provider queries.
///
/// All of these are recovered locally at the component boundary: logged
/// and surfaced as a quiet no-op (hidden panel, untouched overlay).
#[derive(Debug)]
pub enum ProviderError {
    /// Transport failure, non-success status, or an undecodable payload.
    NetworkFailure {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    /// The provider answered with a success status and no body.
    EmptyResponseBody,
    /// A latitude/longitude that does not parse or is out of range.
    MalformedCoordinate { raw: String },
    /// The bounded request timeout elapsed.
    Timeout,
}

impl ProviderError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkFailure {
            message: message.into(),
            source: None,
        }
    }

    pub fn network_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::NetworkFailure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Maps a transport error, folding client-side timeouts into
    /// [`ProviderError::Timeout`].
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout;
        }
        Self::network_with_source("request failed", err)
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::NetworkFailure { message, .. } => write!(f, "{message}"),
            ProviderError::EmptyResponseBody => write!(f, "empty response body"),
            ProviderError::MalformedCoordinate { raw } => {
                write!(f, "malformed coordinate: {raw:?}")
            }
            ProviderError::Timeout => write!(f, "request timed out"),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProviderError::NetworkFailure { source, .. } => {
                source.as_ref().map(|e| e.as_ref() as _)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ProviderError;

    #[test]
    fn display_names_the_kind() {
        assert_eq!(ProviderError::Timeout.to_string(), "request timed out");
        assert_eq!(
            ProviderError::MalformedCoordinate {
                raw: "abc".to_string()
            }
            .to_string(),
            "malformed coordinate: \"abc\""
        );
    }

    #[test]
    fn network_failure_chains_source() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = ProviderError::network_with_source("fetch failed", inner);
        assert!(std::error::Error::source(&err).is_some());
    }
}
