//! Port for category lookups.

use async_trait::async_trait;

use crate::domain::categories::{Category, CategoryName};

/// Errors raised by category repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryRepositoryError {
    /// Repository connection could not be established.
    #[error("category repository connection failed: {message}")]
    Connection { message: String },

    /// Query failed during execution.
    #[error("category repository query failed: {message}")]
    Query { message: String },
}

impl CategoryRepositoryError {
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

/// Port for reading the known point categories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Resolve a category by its unique name.
    async fn find_by_name(
        &self,
        name: &CategoryName,
    ) -> Result<Option<Category>, CategoryRepositoryError>;

    /// Every known category.
    async fn list(&self) -> Result<Vec<Category>, CategoryRepositoryError>;
}
