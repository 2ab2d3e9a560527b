//! Port for notification-row persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::notifications::{Notification, NotificationDraft};
use crate::domain::pagination::PageRequest;
use crate::domain::UserId;

/// Errors raised by notification repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationRepositoryError {
    /// Repository connection could not be established.
    #[error("notification repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("notification repository query failed: {message}")]
    Query { message: String },
}

impl NotificationRepositoryError {
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

/// Port for inserting and reading notification rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Insert one notification row.
    async fn insert(
        &self,
        draft: &NotificationDraft,
    ) -> Result<Notification, NotificationRepositoryError>;

    /// Newest-first page of a user's notifications plus the total count.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        page: &PageRequest,
    ) -> Result<(Vec<Notification>, i64), NotificationRepositoryError>;

    /// Mark one of the user's notifications read. Returns whether a row
    /// was updated.
    async fn mark_read(
        &self,
        user_id: &UserId,
        notification_id: &Uuid,
    ) -> Result<bool, NotificationRepositoryError>;
}
