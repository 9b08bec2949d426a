use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        message: String,
        details: Vec<String>,
    },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// An `InvalidArgument` with no per-field detail.
    pub fn invalid(message: impl Into<String>) -> Self {
        CoreError::InvalidArgument {
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// An `InvalidArgument` carrying a list of human-readable problems.
    pub fn invalid_with_details(message: impl Into<String>, details: Vec<String>) -> Self {
        CoreError::InvalidArgument {
            message: message.into(),
            details,
        }
    }

    /// The detail list attached to this error, empty for every kind but
    /// `InvalidArgument`.
    pub fn details(&self) -> &[String] {
        match self {
            CoreError::InvalidArgument { details, .. } => details,
            _ => &[],
        }
    }
}
