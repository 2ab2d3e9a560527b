//! Job board HTTP handlers.
//!
//! ```text
//! POST   /api/v1/jobs
//! GET    /api/v1/jobs
//! GET    /api/v1/jobs/mine
//! DELETE /api/v1/jobs/{id}
//! ```

use actix_web::{delete, get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::jobs::{ApprovalRecord, JobDraft, JobPosting};
use crate::domain::pagination::{PageInfo, PageRequest};
use crate::domain::ports::{JobsCommand, JobsQuery};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_uuid, FieldName};
use crate::inbound::http::ApiResult;

/// Request payload for submitting a job posting.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobRequestBody {
    pub title: String,
    pub description: String,
    pub company: String,
    pub category: String,
    pub job_type: String,
    pub experience_level: String,
}

/// A job posting as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub company: String,
    pub category: String,
    pub job_type: String,
    pub experience_level: String,
    #[schema(format = "uuid")]
    pub posted_by: String,
    pub is_active: bool,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<JobPosting> for JobBody {
    fn from(value: JobPosting) -> Self {
        Self {
            id: value.id.to_string(),
            title: value.title,
            description: value.description,
            company: value.company,
            category: value.category,
            job_type: value.job_type,
            experience_level: value.experience_level,
            posted_by: value.posted_by.to_string(),
            is_active: value.is_active,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Review state attached to the owner's own postings.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalBody {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(format = "date-time")]
    pub decided_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl From<ApprovalRecord> for ApprovalBody {
    fn from(value: ApprovalRecord) -> Self {
        Self {
            status: value.status.to_string(),
            decided_at: value.decided_at.map(|at| at.to_rfc3339()),
            rejection_reason: value.rejection_reason,
        }
    }
}

/// Response payload for a submission.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobResponseBody {
    pub job: JobBody,
    pub approval: ApprovalBody,
}

/// Query parameters for the public listing.
#[derive(Debug, Deserialize)]
pub struct JobsQueryParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Response payload for the public listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobsResponseBody {
    pub jobs: Vec<JobBody>,
    pub pagination: PageInfo,
}

/// One of the caller's own postings with its review state.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnJobBody {
    pub job: JobBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval: Option<ApprovalBody>,
}

/// Response payload for the owner listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnJobsResponseBody {
    pub jobs: Vec<OwnJobBody>,
}

/// Submit a job posting for review.
#[utoipa::path(
    post,
    path = "/api/v1/jobs",
    request_body = SubmitJobRequestBody,
    responses(
        (status = 200, description = "Job submitted, pending review", body = SubmitJobResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["jobs"],
    operation_id = "submitJob",
    security(("SessionCookie" = []))
)]
#[post("/jobs")]
pub async fn submit_job(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubmitJobRequestBody>,
) -> ApiResult<web::Json<SubmitJobResponseBody>> {
    let caller = session.require_identity()?;
    let payload = payload.into_inner();
    let draft = JobDraft {
        title: payload.title,
        description: payload.description,
        company: payload.company,
        category: payload.category,
        job_type: payload.job_type,
        experience_level: payload.experience_level,
    };

    let submission = state.jobs.submit(&caller, draft).await?;

    Ok(web::Json(SubmitJobResponseBody {
        job: JobBody::from(submission.job),
        approval: ApprovalBody::from(submission.approval),
    }))
}

/// Publicly visible jobs: active and approved (or unreviewed, under the
/// implicit approval policy).
#[utoipa::path(
    get,
    path = "/api/v1/jobs",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Rows per page")
    ),
    responses(
        (status = 200, description = "Public job listing", body = JobsResponseBody)
    ),
    tags = ["jobs"],
    operation_id = "listJobs",
    security([])
)]
#[get("/jobs")]
pub async fn list_jobs(
    state: web::Data<HttpState>,
    params: web::Query<JobsQueryParams>,
) -> ApiResult<web::Json<JobsResponseBody>> {
    let page = PageRequest::new(params.page, params.limit);
    let result = state.jobs_query.list_public(page).await?;
    Ok(web::Json(JobsResponseBody {
        jobs: result.jobs.into_iter().map(JobBody::from).collect(),
        pagination: result.page,
    }))
}

/// The caller's own postings with their review state.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/mine",
    responses(
        (status = 200, description = "Own postings", body = OwnJobsResponseBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["jobs"],
    operation_id = "listOwnJobs",
    security(("SessionCookie" = []))
)]
#[get("/jobs/mine")]
pub async fn list_own_jobs(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<OwnJobsResponseBody>> {
    let caller = session.require_identity()?;
    let jobs = state.jobs_query.list_mine(&caller).await?;
    Ok(web::Json(OwnJobsResponseBody {
        jobs: jobs
            .into_iter()
            .map(|(job, approval)| OwnJobBody {
                job: JobBody::from(job),
                approval: approval.map(ApprovalBody::from),
            })
            .collect(),
    }))
}

/// Delete a posting the caller owns.
#[utoipa::path(
    delete,
    path = "/api/v1/jobs/{id}",
    params(("id" = String, Path, description = "Job id")),
    responses(
        (status = 204, description = "Job deleted"),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Unknown or foreign job", body = ErrorSchema)
    ),
    tags = ["jobs"],
    operation_id = "deleteJob",
    security(("SessionCookie" = []))
)]
#[delete("/jobs/{id}")]
pub async fn delete_job(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let job_id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    state.jobs.delete(&caller, job_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
