//! Port for user profile lookups.

use async_trait::async_trait;

use crate::domain::{Role, UserId};

/// A user profile as seen by the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryUser {
    pub id: UserId,
    pub display_name: String,
    pub email: String,
    pub role: Role,
}

/// Errors raised by user directory adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserDirectoryError {
    /// Directory connection could not be established.
    #[error("user directory connection failed: {message}")]
    Connection { message: String },

    /// Query failed during execution.
    #[error("user directory query failed: {message}")]
    Query { message: String },
}

impl UserDirectoryError {
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

/// Port for resolving users by id or email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up a user by id.
    async fn find_by_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<DirectoryUser>, UserDirectoryError>;

    /// Look up a user by email address.
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<DirectoryUser>, UserDirectoryError>;
}
