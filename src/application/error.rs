// Failure values returned by gateway, store and session operations
use crate::domain::collection::{Collection, EntityId, Operation};
use crate::domain::form::ValidationError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DashboardError {
    /// Rejected locally before any network call.
    #[error("validation failed: field `{field}` {reason}")]
    ValidationFailed { field: String, reason: String },

    #[error("transport failed: {0}")]
    TransportFailed(String),

    /// The gateway answered with an error; `message` is passed through as sent.
    #[error("{message}")]
    RemoteRejected { status: u16, message: String },

    #[error("{} #{id} not found", .collection.noun())]
    NotFound { collection: Collection, id: EntityId },

    #[error("a submission is already in progress")]
    SubmitInProgress,

    #[error("no form is being edited")]
    NotEditing,

    #[error("{operation} is not supported for {collection}")]
    Unsupported {
        collection: Collection,
        operation: Operation,
    },

    #[error("invalid payload from gateway: {0}")]
    InvalidPayload(String),
}

impl From<ValidationError> for DashboardError {
    fn from(e: ValidationError) -> Self {
        DashboardError::ValidationFailed {
            field: e.field,
            reason: e.reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
