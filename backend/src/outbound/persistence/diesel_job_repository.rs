//! PostgreSQL-backed `JobRepository` implementation using Diesel.
//!
//! Submissions insert the job row and its pending approval row in one
//! database transaction. Decisions are guarded updates on still-pending
//! rows so a job is decided exactly once. The public listing left-joins
//! the approval queue and applies the configured policy to jobs with no
//! approval row at all.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::jobs::{
    ApprovalDecision, ApprovalPolicy, ApprovalRecord, ApprovalStatus, JobDraft, JobPosting,
};
use crate::domain::pagination::PageRequest;
use crate::domain::ports::{JobRepository, JobRepositoryError};
use crate::domain::UserId;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{JobApprovalRow, JobPostingRow, NewJobApprovalRow, NewJobPostingRow};
use super::pool::{DbPool, PoolError};
use super::schema::{job_approvals, job_postings};

/// Diesel-backed implementation of the job repository port.
#[derive(Clone)]
pub struct DieselJobRepository {
    pool: DbPool,
}

impl DieselJobRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> JobRepositoryError {
    map_pool_error(error, JobRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> JobRepositoryError {
    map_diesel_error(
        error,
        JobRepositoryError::query,
        JobRepositoryError::connection,
    )
}

fn row_to_job(row: JobPostingRow) -> JobPosting {
    JobPosting {
        id: row.id,
        title: row.title,
        description: row.description,
        company: row.company,
        category: row.category,
        job_type: row.job_type,
        experience_level: row.experience_level,
        posted_by: UserId::from_uuid(row.posted_by),
        is_active: row.is_active,
        created_at: row.created_at,
    }
}

fn row_to_approval(row: JobApprovalRow) -> Result<ApprovalRecord, JobRepositoryError> {
    let status = ApprovalStatus::from_str(&row.status)
        .map_err(|err| JobRepositoryError::query(format!("decode status: {err}")))?;
    Ok(ApprovalRecord {
        job_id: row.job_id,
        status,
        approver_id: row.approver_id.map(UserId::from_uuid),
        decided_at: row.decided_at,
        rejection_reason: row.rejection_reason,
    })
}

#[async_trait]
impl JobRepository for DieselJobRepository {
    async fn submit(
        &self,
        owner: &UserId,
        draft: &JobDraft,
    ) -> Result<(JobPosting, ApprovalRecord), JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let owner_uuid = *owner.as_uuid();

        let (job_row, approval_row) = conn
            .transaction::<(JobPostingRow, JobApprovalRow), diesel::result::Error, _>(|conn| {
                async move {
                    let new_job = NewJobPostingRow {
                        id: Uuid::new_v4(),
                        title: &draft.title,
                        description: &draft.description,
                        company: &draft.company,
                        category: &draft.category,
                        job_type: &draft.job_type,
                        experience_level: &draft.experience_level,
                        posted_by: owner_uuid,
                        is_active: true,
                        created_at: Utc::now(),
                    };
                    let job_row: JobPostingRow = diesel::insert_into(job_postings::table)
                        .values(&new_job)
                        .returning(JobPostingRow::as_returning())
                        .get_result(conn)
                        .await?;

                    let new_approval = NewJobApprovalRow {
                        job_id: job_row.id,
                        status: ApprovalStatus::Pending.as_str(),
                    };
                    let approval_row: JobApprovalRow = diesel::insert_into(job_approvals::table)
                        .values(&new_approval)
                        .returning(JobApprovalRow::as_returning())
                        .get_result(conn)
                        .await?;

                    Ok((job_row, approval_row))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel)?;

        Ok((row_to_job(job_row), row_to_approval(approval_row)?))
    }

    async fn find(
        &self,
        job_id: &Uuid,
    ) -> Result<Option<(JobPosting, Option<ApprovalRecord>)>, JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let job_row = job_postings::table
            .filter(job_postings::id.eq(job_id))
            .select(JobPostingRow::as_select())
            .first::<JobPostingRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        let Some(job_row) = job_row else {
            return Ok(None);
        };

        let approval_row = job_approvals::table
            .filter(job_approvals::job_id.eq(job_id))
            .select(JobApprovalRow::as_select())
            .first::<JobApprovalRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        let approval = approval_row.map(row_to_approval).transpose()?;
        Ok(Some((row_to_job(job_row), approval)))
    }

    async fn decide(
        &self,
        decision: &ApprovalDecision,
    ) -> Result<ApprovalRecord, JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        // Guarded update: only a still-pending row may be decided.
        let updated: Option<JobApprovalRow> = diesel::update(
            job_approvals::table.filter(
                job_approvals::job_id
                    .eq(decision.job_id)
                    .and(job_approvals::status.eq(ApprovalStatus::Pending.as_str())),
            ),
        )
        .set((
            job_approvals::status.eq(decision.status.as_str()),
            job_approvals::approver_id.eq(decision.approver_id.as_uuid()),
            job_approvals::decided_at.eq(decision.decided_at),
            job_approvals::rejection_reason.eq(decision.rejection_reason.as_deref()),
        ))
        .returning(JobApprovalRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel)?;

        if let Some(row) = updated {
            return row_to_approval(row);
        }

        // Distinguish "already decided" from "no such queue row".
        let exists: i64 = job_approvals::table
            .filter(job_approvals::job_id.eq(decision.job_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;
        if exists > 0 {
            Err(JobRepositoryError::already_decided(decision.job_id))
        } else {
            Err(JobRepositoryError::not_found(decision.job_id))
        }
    }

    async fn list_public(
        &self,
        policy: ApprovalPolicy,
        page: &PageRequest,
    ) -> Result<(Vec<JobPosting>, i64), JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let approved = ApprovalStatus::Approved.as_str();

        let (total, rows): (i64, Vec<JobPostingRow>) = match policy {
            ApprovalPolicy::ImplicitApprove => {
                // A missing queue row lists as if approved.
                let visible = || {
                    job_approvals::status
                        .eq(approved)
                        .or(job_approvals::job_id.is_null())
                };
                let total = job_postings::table
                    .left_join(job_approvals::table)
                    .filter(job_postings::is_active.eq(true))
                    .filter(visible())
                    .count()
                    .get_result(&mut conn)
                    .await
                    .map_err(map_diesel)?;
                let rows = job_postings::table
                    .left_join(job_approvals::table)
                    .filter(job_postings::is_active.eq(true))
                    .filter(visible())
                    .order((job_postings::created_at.desc(), job_postings::id.desc()))
                    .limit(i64::from(page.limit()))
                    .offset(page.offset())
                    .select(JobPostingRow::as_select())
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel)?;
                (total, rows)
            }
            ApprovalPolicy::RequireReview => {
                let visible = || job_approvals::status.eq(approved);
                let total = job_postings::table
                    .inner_join(job_approvals::table)
                    .filter(job_postings::is_active.eq(true))
                    .filter(visible())
                    .count()
                    .get_result(&mut conn)
                    .await
                    .map_err(map_diesel)?;
                let rows = job_postings::table
                    .inner_join(job_approvals::table)
                    .filter(job_postings::is_active.eq(true))
                    .filter(visible())
                    .order((job_postings::created_at.desc(), job_postings::id.desc()))
                    .limit(i64::from(page.limit()))
                    .offset(page.offset())
                    .select(JobPostingRow::as_select())
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel)?;
                (total, rows)
            }
        };

        Ok((rows.into_iter().map(row_to_job).collect(), total))
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<(JobPosting, Option<ApprovalRecord>)>, JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<(JobPostingRow, Option<JobApprovalRow>)> = job_postings::table
            .left_join(job_approvals::table)
            .filter(job_postings::posted_by.eq(owner.as_uuid()))
            .order((job_postings::created_at.desc(), job_postings::id.desc()))
            .select((
                JobPostingRow::as_select(),
                Option::<JobApprovalRow>::as_select(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter()
            .map(|(job_row, approval_row)| {
                let approval = approval_row.map(row_to_approval).transpose()?;
                Ok((row_to_job(job_row), approval))
            })
            .collect()
    }

    async fn delete(&self, owner: &UserId, job_id: &Uuid) -> Result<bool, JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        // The approval row follows via ON DELETE CASCADE.
        let removed = diesel::delete(
            job_postings::table.filter(
                job_postings::id
                    .eq(job_id)
                    .and(job_postings::posted_by.eq(owner.as_uuid())),
            ),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel)?;

        Ok(removed > 0)
    }
}
