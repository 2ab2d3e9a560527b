//! Driving port for admin dashboard reads.

use async_trait::async_trait;

use crate::domain::reports::DashboardReport;
use crate::domain::{CallerIdentity, Error};

/// Use-case port for the admin dashboard.
#[async_trait]
pub trait ReportsQuery: Send + Sync {
    /// Aggregate dashboard counts; requires the admin capability.
    async fn dashboard(&self, caller: &CallerIdentity) -> Result<DashboardReport, Error>;
}

/// Fixture query used until persistence is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReportsQuery;

#[async_trait]
impl ReportsQuery for FixtureReportsQuery {
    async fn dashboard(&self, caller: &CallerIdentity) -> Result<DashboardReport, Error> {
        caller.require_admin()?;
        Ok(DashboardReport::default())
    }
}
