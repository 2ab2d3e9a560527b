//! Job postings and the approval gate controlling their public visibility.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserId;

/// Validation errors raised by job constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobValidationError {
    EmptyTitle,
    EmptyDescription,
    EmptyCompany,
    MissingRejectionReason,
    UnknownStatus,
    UnknownAction,
}

impl fmt::Display for JobValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::EmptyCompany => write!(f, "company must not be empty"),
            Self::MissingRejectionReason => {
                write!(f, "a rejection must carry a rejection reason")
            }
            Self::UnknownStatus => write!(f, "status must be pending, approved, or rejected"),
            Self::UnknownAction => write!(f, "action must be approve or reject"),
        }
    }
}

impl std::error::Error for JobValidationError {}

/// Review state of a job posting. Pending is the sole non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for ApprovalStatus {
    type Err = JobValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(JobValidationError::UnknownStatus),
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How read paths treat jobs that have no approval row at all.
///
/// `ImplicitApprove` preserves the legacy contract where jobs predating the
/// review queue list as if approved; `RequireReview` hides them until a
/// decision exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApprovalPolicy {
    #[default]
    ImplicitApprove,
    RequireReview,
}

/// Reviewer action on a pending job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionAction {
    Approve,
    Reject,
}

impl FromStr for DecisionAction {
    type Err = JobValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            _ => Err(JobValidationError::UnknownAction),
        }
    }
}

/// Validated input for submitting a job posting.
#[derive(Debug, Clone)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub company: String,
    pub category: String,
    pub job_type: String,
    pub experience_level: String,
}

impl JobDraft {
    /// Reject drafts with blank mandatory fields.
    pub fn validate(&self) -> Result<(), JobValidationError> {
        if self.title.trim().is_empty() {
            return Err(JobValidationError::EmptyTitle);
        }
        if self.description.trim().is_empty() {
            return Err(JobValidationError::EmptyDescription);
        }
        if self.company.trim().is_empty() {
            return Err(JobValidationError::EmptyCompany);
        }
        Ok(())
    }
}

/// A stored job posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPosting {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub company: String,
    pub category: String,
    pub job_type: String,
    pub experience_level: String,
    pub posted_by: UserId,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// The 1:1 approval-queue row for a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalRecord {
    pub job_id: Uuid,
    pub status: ApprovalStatus,
    pub approver_id: Option<UserId>,
    pub decided_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

impl ApprovalRecord {
    /// Fresh pending row created alongside a submission.
    pub fn pending(job_id: Uuid) -> Self {
        Self {
            job_id,
            status: ApprovalStatus::Pending,
            approver_id: None,
            decided_at: None,
            rejection_reason: None,
        }
    }
}

/// A validated, ready-to-apply review decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalDecision {
    pub job_id: Uuid,
    pub status: ApprovalStatus,
    pub approver_id: UserId,
    pub decided_at: DateTime<Utc>,
    pub rejection_reason: Option<String>,
}

impl ApprovalDecision {
    /// Build a decision, enforcing the mandatory reason on rejections.
    pub fn new(
        job_id: Uuid,
        action: DecisionAction,
        approver_id: UserId,
        decided_at: DateTime<Utc>,
        rejection_reason: Option<String>,
    ) -> Result<Self, JobValidationError> {
        let status = match action {
            DecisionAction::Approve => ApprovalStatus::Approved,
            DecisionAction::Reject => ApprovalStatus::Rejected,
        };
        let rejection_reason = match action {
            DecisionAction::Reject => {
                let reason = rejection_reason
                    .filter(|r| !r.trim().is_empty())
                    .ok_or(JobValidationError::MissingRejectionReason)?;
                Some(reason)
            }
            DecisionAction::Approve => None,
        };
        Ok(Self {
            job_id,
            status,
            approver_id,
            decided_at,
            rejection_reason,
        })
    }
}

/// Whether a job is publicly visible given its (possibly absent) approval row.
pub fn is_publicly_visible(
    job: &JobPosting,
    approval: Option<&ApprovalRecord>,
    policy: ApprovalPolicy,
) -> bool {
    if !job.is_active {
        return false;
    }
    match approval {
        Some(record) => record.status == ApprovalStatus::Approved,
        None => matches!(policy, ApprovalPolicy::ImplicitApprove),
    }
}
