//! Port for job posting and approval-queue persistence.
//!
//! Submissions are a unit of work: the job row and its pending approval row
//! are inserted in one database transaction so neither can exist without
//! the other. Decisions are guarded updates: only a pending row may be
//! decided, and only once.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::jobs::{
    ApprovalDecision, ApprovalPolicy, ApprovalRecord, JobDraft, JobPosting,
};
use crate::domain::pagination::PageRequest;
use crate::domain::UserId;

/// Errors raised by job repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobRepositoryError {
    /// Repository connection could not be established.
    #[error("job repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("job repository query failed: {message}")]
    Query { message: String },

    /// The referenced job does not exist.
    #[error("job {job_id} not found")]
    NotFound { job_id: Uuid },

    /// The job's approval row is no longer pending.
    #[error("job {job_id} has already been decided")]
    AlreadyDecided { job_id: Uuid },
}

impl JobRepositoryError {
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

    pub fn not_found(job_id: Uuid) -> Self {
        Self::NotFound { job_id }
    }

    pub fn already_decided(job_id: Uuid) -> Self {
        Self::AlreadyDecided { job_id }
    }
}

/// Port for writing and reading job postings with their approval state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Insert the job and its pending approval row atomically.
    async fn submit(
        &self,
        owner: &UserId,
        draft: &JobDraft,
    ) -> Result<(JobPosting, ApprovalRecord), JobRepositoryError>;

    /// Look up a job and its (possibly absent) approval row.
    async fn find(
        &self,
        job_id: &Uuid,
    ) -> Result<Option<(JobPosting, Option<ApprovalRecord>)>, JobRepositoryError>;

    /// Apply a review decision to a still-pending approval row.
    async fn decide(&self, decision: &ApprovalDecision)
        -> Result<ApprovalRecord, JobRepositoryError>;

    /// Publicly visible jobs under the given policy, newest first, with the
    /// total count for pagination.
    async fn list_public(
        &self,
        policy: ApprovalPolicy,
        page: &PageRequest,
    ) -> Result<(Vec<JobPosting>, i64), JobRepositoryError>;

    /// All jobs posted by one owner, regardless of approval state.
    async fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<(JobPosting, Option<ApprovalRecord>)>, JobRepositoryError>;

    /// Delete a job owned by `owner`. Returns whether a row was removed.
    async fn delete(&self, owner: &UserId, job_id: &Uuid) -> Result<bool, JobRepositoryError>;
}
