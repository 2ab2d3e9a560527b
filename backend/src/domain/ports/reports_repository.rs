//! Port for admin dashboard aggregation queries.

use async_trait::async_trait;

use crate::domain::reports::DashboardReport;

/// Errors raised by reports repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportsRepositoryError {
    /// Repository connection could not be established.
    #[error("reports repository connection failed: {message}")]
    Connection { message: String },

    /// Query failed during execution.
    #[error("reports repository query failed: {message}")]
    Query { message: String },
}

impl ReportsRepositoryError {
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

/// Port for reading dashboard counts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportsRepository: Send + Sync {
    /// Aggregate the dashboard figures from live data.
    async fn dashboard(&self) -> Result<DashboardReport, ReportsRepositoryError>;
}
