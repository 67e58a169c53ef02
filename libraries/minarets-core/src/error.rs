/// Core error types for the Minarets player
use thiserror::Error;

/// Result type alias using `MinaretsError`
pub type Result<T> = std::result::Result<T, MinaretsError>;

/// Core error type for catalog access
#[derive(Error, Debug)]
pub enum MinaretsError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Network or remote API failure
    #[error("Network error: {0}")]
    Network(String),

    /// Authentication is required for this catalog call
    #[error("Authentication required")]
    Unauthorized,

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl MinaretsError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the error means the entity does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message() {
        let err = MinaretsError::not_found("Concert", "42");
        assert_eq!(err.to_string(), "Concert not found: 42");
        assert!(err.is_not_found());
    }

    #[test]
    fn network_is_not_not_found() {
        assert!(!MinaretsError::network("reset").is_not_found());
    }
}
