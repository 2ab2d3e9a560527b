//! Driving ports for job submission, review, and listing.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::jobs::{ApprovalRecord, DecisionAction, JobDraft, JobPosting};
use crate::domain::pagination::{PageInfo, PageRequest};
use crate::domain::{CallerIdentity, Error};

/// A submitted job with its fresh approval-queue row.
#[derive(Debug, Clone)]
pub struct JobSubmission {
    pub job: JobPosting,
    pub approval: ApprovalRecord,
}

/// Unvalidated review request from the admin surface.
#[derive(Debug, Clone)]
pub struct DecisionRequest {
    pub job_id: Uuid,
    pub action: DecisionAction,
    pub rejection_reason: Option<String>,
}

/// One page of publicly visible jobs.
#[derive(Debug, Clone)]
pub struct JobPage {
    pub jobs: Vec<JobPosting>,
    pub page: PageInfo,
}

/// Use-case port for job mutations.
#[async_trait]
pub trait JobsCommand: Send + Sync {
    /// Submit a posting; it enters the review queue as pending.
    async fn submit(
        &self,
        caller: &CallerIdentity,
        draft: JobDraft,
    ) -> Result<JobSubmission, Error>;

    /// Decide a pending posting; requires the admin capability. Fires
    /// best-effort owner notifications after the decision commits.
    async fn decide(
        &self,
        caller: &CallerIdentity,
        request: DecisionRequest,
    ) -> Result<ApprovalRecord, Error>;

    /// Delete a posting the caller owns.
    async fn delete(&self, caller: &CallerIdentity, job_id: Uuid) -> Result<(), Error>;
}

/// Use-case port for job reads.
#[async_trait]
pub trait JobsQuery: Send + Sync {
    /// Publicly visible jobs (approved, or unreviewed under the implicit
    /// approval policy), newest first.
    async fn list_public(&self, page: PageRequest) -> Result<JobPage, Error>;

    /// The caller's own postings with their review state.
    async fn list_mine(
        &self,
        caller: &CallerIdentity,
    ) -> Result<Vec<(JobPosting, Option<ApprovalRecord>)>, Error>;
}

/// Fixture command used until persistence is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureJobsCommand;

#[async_trait]
impl JobsCommand for FixtureJobsCommand {
    async fn submit(
        &self,
        caller: &CallerIdentity,
        draft: JobDraft,
    ) -> Result<JobSubmission, Error> {
        draft
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let job = JobPosting {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            company: draft.company,
            category: draft.category,
            job_type: draft.job_type,
            experience_level: draft.experience_level,
            posted_by: *caller.user_id(),
            is_active: true,
            created_at: chrono::Utc::now(),
        };
        let approval = ApprovalRecord::pending(job.id);
        Ok(JobSubmission { job, approval })
    }

    async fn decide(
        &self,
        caller: &CallerIdentity,
        request: DecisionRequest,
    ) -> Result<ApprovalRecord, Error> {
        caller.require_admin()?;
        Err(Error::not_found(format!("job {} not found", request.job_id)))
    }

    async fn delete(&self, _caller: &CallerIdentity, job_id: Uuid) -> Result<(), Error> {
        Err(Error::not_found(format!("job {job_id} not found")))
    }
}

/// Fixture query used until persistence is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureJobsQuery;

#[async_trait]
impl JobsQuery for FixtureJobsQuery {
    async fn list_public(&self, page: PageRequest) -> Result<JobPage, Error> {
        Ok(JobPage {
            jobs: Vec::new(),
            page: PageInfo::new(0, &page),
        })
    }

    async fn list_mine(
        &self,
        _caller: &CallerIdentity,
    ) -> Result<Vec<(JobPosting, Option<ApprovalRecord>)>, Error> {
        Ok(Vec::new())
    }
}
