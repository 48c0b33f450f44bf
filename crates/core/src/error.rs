//! Domain-level error type shared across the workspace.
//!
//! Repositories and the lifecycle service return [`CoreError`] for
//! business-rule failures; the API layer maps each variant onto an HTTP
//! status and a stable error code.

use crate::types::DbId;

/// A domain-level error.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The referenced entity does not exist (or is soft-deleted).
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed or inconsistent input.
    #[error("{0}")]
    Validation(String),

    /// The request conflicts with existing state.
    #[error("{0}")]
    Conflict(String),

    /// The operation is disallowed in the current state.
    #[error("{0}")]
    Forbidden(String),

    /// An unexpected internal failure.
    #[error("{0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a validation failure.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Shorthand for a forbidden-operation failure.
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_includes_entity_and_id() {
        let err = CoreError::NotFound {
            entity: "RepairRequest",
            id: 42,
        };
        assert_eq!(err.to_string(), "RepairRequest with id 42 not found");
    }

    #[test]
    fn validation_shorthand_wraps_message() {
        let err = CoreError::validation("device list must not be empty");
        assert_eq!(err.to_string(), "device list must not be empty");
    }
}
