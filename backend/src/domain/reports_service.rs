//! Admin dashboard reporting service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::reports::DashboardReport;
use crate::domain::ports::{ReportsQuery, ReportsRepository, ReportsRepositoryError};
use crate::domain::{CallerIdentity, Error};

fn map_reports_repository_error(error: ReportsRepositoryError) -> Error {
    match error {
        ReportsRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("reports repository unavailable: {message}"))
        }
        ReportsRepositoryError::Query { message } => {
            Error::internal(format!("reports repository error: {message}"))
        }
    }
}

/// Reports service implementing the query driving port.
#[derive(Clone)]
pub struct ReportsService<R> {
    reports_repo: Arc<R>,
}

impl<R> ReportsService<R> {
    /// Create a new service with the reports repository.
    pub fn new(reports_repo: Arc<R>) -> Self {
        Self { reports_repo }
    }
}

#[async_trait]
impl<R> ReportsQuery for ReportsService<R>
where
    R: ReportsRepository,
{
    async fn dashboard(&self, caller: &CallerIdentity) -> Result<DashboardReport, Error> {
        caller.require_admin()?;
        self.reports_repo
            .dashboard()
            .await
            .map_err(map_reports_repository_error)
    }
}
