//! PostgreSQL-backed `ReportsRepository` implementation using Diesel.
//!
//! One aggregate query per figure against live data; nothing is cached.

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_async::RunQueryDsl;

use crate::domain::jobs::ApprovalStatus;
use crate::domain::ledger::TransactionDirection;
use crate::domain::ports::{ReportsRepository, ReportsRepositoryError};
use crate::domain::reports::DashboardReport;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::pool::{DbPool, PoolError};
use super::schema::{job_approvals, job_postings, notifications, point_transactions, users};

/// Diesel-backed implementation of the reports repository port.
#[derive(Clone)]
pub struct DieselReportsRepository {
    pool: DbPool,
}

impl DieselReportsRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> ReportsRepositoryError {
    map_pool_error(error, ReportsRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> ReportsRepositoryError {
    map_diesel_error(
        error,
        ReportsRepositoryError::query,
        ReportsRepositoryError::connection,
    )
}

#[async_trait]
impl ReportsRepository for DieselReportsRepository {
    async fn dashboard(&self) -> Result<DashboardReport, ReportsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let user_count: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;

        let active_job_count: i64 = job_postings::table
            .filter(job_postings::is_active.eq(true))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;

        let jobs_pending_review: i64 = job_approvals::table
            .filter(job_approvals::status.eq(ApprovalStatus::Pending.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;

        let transaction_count: i64 = point_transactions::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;

        // SUM(bigint) widens to numeric in PostgreSQL; cast back down.
        let points_issued: i64 = point_transactions::table
            .filter(point_transactions::direction.eq(TransactionDirection::Earn.as_str()))
            .select(sql::<BigInt>("COALESCE(SUM(amount), 0)::bigint"))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;

        let points_spent: i64 = point_transactions::table
            .filter(point_transactions::direction.eq(TransactionDirection::Spend.as_str()))
            .select(sql::<BigInt>("COALESCE(SUM(amount), 0)::bigint"))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;

        let unread_notification_count: i64 = notifications::table
            .filter(notifications::is_read.eq(false))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(DashboardReport {
            user_count,
            active_job_count,
            jobs_pending_review,
            transaction_count,
            points_issued,
            points_spent,
            unread_notification_count,
        })
    }
}
