//! Job submission, review, and listing services.
//!
//! The review decision commits first; owner notifications and email are
//! best-effort side effects fired afterwards and never fail the decision.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use uuid::Uuid;

use crate::domain::jobs::{
    ApprovalDecision, ApprovalPolicy, ApprovalRecord, ApprovalStatus, DecisionAction, JobDraft,
    JobPosting,
};
use crate::domain::notifications::{
    EmailMessage, NotificationDraft, NotificationEvent, NotificationKind, NotificationPriority,
};
use crate::domain::pagination::{PageInfo, PageRequest};
use crate::domain::ports::{
    BestEffortNotifier, DecisionRequest, JobPage, JobRepository, JobRepositoryError, JobSubmission,
    JobsCommand, JobsQuery, UserDirectory,
};
use crate::domain::{CallerIdentity, Error};

fn map_job_repository_error(error: JobRepositoryError) -> Error {
    match error {
        JobRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("job repository unavailable: {message}"))
        }
        JobRepositoryError::Query { message } => {
            Error::internal(format!("job repository error: {message}"))
        }
        JobRepositoryError::NotFound { job_id } => {
            Error::not_found(format!("job {job_id} not found"))
        }
        JobRepositoryError::AlreadyDecided { job_id } => {
            Error::conflict(format!("job {job_id} has already been decided"))
        }
    }
}

fn decision_notification(job: &JobPosting, record: &ApprovalRecord) -> NotificationDraft {
    let (title, message) = match record.status {
        ApprovalStatus::Approved => (
            "Job Posting Approved",
            format!("Your job posting \"{}\" is now live.", job.title),
        ),
        _ => (
            "Job Posting Rejected",
            match &record.rejection_reason {
                Some(reason) => format!(
                    "Your job posting \"{}\" was rejected: {reason}",
                    job.title
                ),
                None => format!("Your job posting \"{}\" was rejected.", job.title),
            },
        ),
    };
    NotificationDraft {
        user_id: job.posted_by,
        title: title.to_owned(),
        message,
        kind: NotificationKind::JobApproval,
        priority: NotificationPriority::Normal,
        reference_id: Some(job.id),
        reference_kind: Some("job_posting".to_owned()),
        payload: Some(json!({ "status": record.status })),
    }
}

/// Job service implementing the command driving port.
pub struct JobCommandService<R> {
    job_repo: Arc<R>,
    directory: Arc<dyn UserDirectory>,
    notifier: Arc<dyn BestEffortNotifier>,
    clock: Arc<dyn Clock>,
}

impl<R> JobCommandService<R> {
    /// Create a new command service.
    pub fn new(
        job_repo: Arc<R>,
        directory: Arc<dyn UserDirectory>,
        notifier: Arc<dyn BestEffortNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            job_repo,
            directory,
            notifier,
            clock,
        }
    }
}

impl<R> JobCommandService<R>
where
    R: JobRepository,
{
    /// Build the owner's best-effort event for a committed decision.
    ///
    /// The directory lookup itself is best-effort: when the owner's email
    /// cannot be resolved the in-app row still goes out alone.
    async fn owner_event(&self, job: &JobPosting, record: &ApprovalRecord) -> NotificationEvent {
        let draft = decision_notification(job, record);
        let mut event = NotificationEvent::in_app(draft);

        match self.directory.find_by_id(&job.posted_by).await {
            Ok(Some(owner)) => {
                let email = EmailMessage {
                    to: owner.email,
                    subject: event.notification.title.clone(),
                    body: event.notification.message.clone(),
                };
                event = event.with_email(email);
            }
            Ok(None) => {
                tracing::warn!(job_id = %job.id, "job owner missing from directory; skipping email");
            }
            Err(error) => {
                tracing::warn!(
                    job_id = %job.id,
                    error = %error,
                    "owner lookup failed; skipping email"
                );
            }
        }
        event
    }
}

#[async_trait]
impl<R> JobsCommand for JobCommandService<R>
where
    R: JobRepository,
{
    async fn submit(
        &self,
        caller: &CallerIdentity,
        draft: JobDraft,
    ) -> Result<JobSubmission, Error> {
        draft.validate().map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": "job" }))
        })?;

        let (job, approval) = self
            .job_repo
            .submit(caller.user_id(), &draft)
            .await
            .map_err(map_job_repository_error)?;

        Ok(JobSubmission { job, approval })
    }

    async fn decide(
        &self,
        caller: &CallerIdentity,
        request: DecisionRequest,
    ) -> Result<ApprovalRecord, Error> {
        caller.require_admin()?;

        let (job, _) = self
            .job_repo
            .find(&request.job_id)
            .await
            .map_err(map_job_repository_error)?
            .ok_or_else(|| Error::not_found(format!("job {} not found", request.job_id)))?;

        let decision = ApprovalDecision::new(
            request.job_id,
            request.action,
            *caller.user_id(),
            self.clock.utc(),
            request.rejection_reason,
        )
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        let record = self
            .job_repo
            .decide(&decision)
            .await
            .map_err(map_job_repository_error)?;

        // Decision is committed; everything from here is best-effort.
        let event = self.owner_event(&job, &record).await;
        self.notifier.enqueue(event).await;

        Ok(record)
    }

    async fn delete(&self, caller: &CallerIdentity, job_id: Uuid) -> Result<(), Error> {
        let deleted = self
            .job_repo
            .delete(caller.user_id(), &job_id)
            .await
            .map_err(map_job_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found(format!("job {job_id} not found")))
        }
    }
}

/// Job service implementing the query driving port.
#[derive(Clone)]
pub struct JobQueryService<R> {
    job_repo: Arc<R>,
    policy: ApprovalPolicy,
}

impl<R> JobQueryService<R> {
    /// Create a new query service with the configured approval policy.
    pub fn new(job_repo: Arc<R>, policy: ApprovalPolicy) -> Self {
        Self { job_repo, policy }
    }
}

#[async_trait]
impl<R> JobsQuery for JobQueryService<R>
where
    R: JobRepository,
{
    async fn list_public(&self, page: PageRequest) -> Result<JobPage, Error> {
        let (jobs, total) = self
            .job_repo
            .list_public(self.policy, &page)
            .await
            .map_err(map_job_repository_error)?;
        Ok(JobPage {
            jobs,
            page: PageInfo::new(total, &page),
        })
    }

    async fn list_mine(
        &self,
        caller: &CallerIdentity,
    ) -> Result<Vec<(JobPosting, Option<ApprovalRecord>)>, Error> {
        self.job_repo
            .list_for_owner(caller.user_id())
            .await
            .map_err(map_job_repository_error)
    }
}

#[cfg(test)]
#[path = "job_service_tests.rs"]
mod tests;
