use thiserror::Error;

/// Coarse classification of a [`StorefrontError`], for callers that map
/// failures onto user-facing responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credentials or endpoint settings are missing or malformed.
    Configuration,
    /// The upstream could not be reached or answered with a non-2xx status
    /// or an unreadable body. Retrying later may succeed.
    Transport,
    /// The upstream answered but reported an error of its own.
    Upstream,
    /// The upstream refused the checkout (out of stock, invalid variant).
    Rejection,
    /// Caller input was rejected before any network call.
    Validation,
}

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("storefront is not configured: {reason}")]
    Configuration { reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("upstream reported errors for {operation}: {errors}")]
    Upstream {
        operation: &'static str,
        errors: serde_json::Value,
    },

    #[error("upstream created a cart without a usable checkout URL")]
    MissingCheckoutUrl,

    #[error("{}", .messages.join("; "))]
    Rejection { messages: Vec<String> },

    #[error("invalid input: {reason}")]
    Validation { reason: String },
}

impl StorefrontError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Http(_) | Self::UnexpectedStatus { .. } | Self::Deserialize { .. } => {
                ErrorKind::Transport
            }
            Self::Upstream { .. } | Self::MissingCheckoutUrl => ErrorKind::Upstream,
            Self::Rejection { .. } => ErrorKind::Rejection,
            Self::Validation { .. } => ErrorKind::Validation,
        }
    }

    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}

impl From<storefront_core::ConfigError> for StorefrontError {
    fn from(error: storefront_core::ConfigError) -> Self {
        Self::configuration(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_group_transport_failures() {
        let status = StorefrontError::UnexpectedStatus {
            status: 500,
            url: "https://shop.example.com/api/2024-07/graphql.json".to_string(),
        };
        assert_eq!(status.kind(), ErrorKind::Transport);

        let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let decode = StorefrontError::Deserialize {
            context: "catalog response".to_string(),
            source,
        };
        assert_eq!(decode.kind(), ErrorKind::Transport);
    }

    #[test]
    fn kinds_for_remaining_variants() {
        assert_eq!(
            StorefrontError::configuration("missing token").kind(),
            ErrorKind::Configuration
        );
        assert_eq!(StorefrontError::MissingCheckoutUrl.kind(), ErrorKind::Upstream);
        assert_eq!(
            StorefrontError::validation("quantity must be at least 1").kind(),
            ErrorKind::Validation
        );
        let rejection = StorefrontError::Rejection {
            messages: vec!["Variant is sold out".to_string()],
        };
        assert_eq!(rejection.kind(), ErrorKind::Rejection);
    }

    #[test]
    fn rejection_displays_upstream_messages() {
        let err = StorefrontError::Rejection {
            messages: vec![
                "Variant is sold out".to_string(),
                "Quantity exceeds stock".to_string(),
            ],
        };
        assert_eq!(err.to_string(), "Variant is sold out; Quantity exceeds stock");
    }
}
