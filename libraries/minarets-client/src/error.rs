//! Error types for the Minarets catalog client.

use minarets_core::MinaretsError;
use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Authentication required but no token available, or the token was rejected
    #[error("Authentication required")]
    AuthRequired,

    /// Invalid API URL
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// The requested resource does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
}

/// Result type for catalog client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

impl From<ClientError> for MinaretsError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound { entity, id } => MinaretsError::not_found(entity, id),
            ClientError::AuthRequired => MinaretsError::Unauthorized,
            ClientError::InvalidUrl(msg) => MinaretsError::invalid_input(msg),
            ClientError::ParseError(msg) => MinaretsError::Other(msg),
            other => MinaretsError::network(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_keeps_entity_and_id() {
        let err: MinaretsError = ClientError::NotFound {
            entity: "Concert".into(),
            id: "42".into(),
        }
        .into();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Concert not found: 42");
    }

    #[test]
    fn transport_failures_become_network_errors() {
        let err: MinaretsError = ClientError::ServerUnreachable("refused".into()).into();
        assert!(matches!(err, MinaretsError::Network(_)));

        let err: MinaretsError = ClientError::ServerError {
            status: 503,
            message: "maintenance".into(),
        }
        .into();
        assert!(matches!(err, MinaretsError::Network(msg) if msg.contains("503")));
    }

    #[test]
    fn auth_required_maps_to_unauthorized() {
        let err: MinaretsError = ClientError::AuthRequired.into();
        assert!(matches!(err, MinaretsError::Unauthorized));
    }
}
