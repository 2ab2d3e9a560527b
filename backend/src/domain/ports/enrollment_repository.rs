//! Port for idempotent event-registration persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::enrollment::RegistrationOutcome;
use crate::domain::UserId;

/// Errors raised by enrollment repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrollmentRepositoryError {
    /// Repository connection could not be established.
    #[error("enrollment repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("enrollment repository query failed: {message}")]
    Query { message: String },
}

impl EnrollmentRepositoryError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for registering users to events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Register `user_id` for `event_id`.
    ///
    /// The adapter enforces the (user, event) uniqueness: a repeated call
    /// creates nothing and reports
    /// [`RegistrationOutcome::AlreadyRegistered`].
    async fn register(
        &self,
        user_id: &UserId,
        event_id: &Uuid,
    ) -> Result<RegistrationOutcome, EnrollmentRepositoryError>;
}
