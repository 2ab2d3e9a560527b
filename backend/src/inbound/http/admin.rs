//! Admin HTTP handlers.
//!
//! ```text
//! POST /api/v1/points/admin
//! POST /api/v1/points/admin/bulk
//! POST /api/v1/admin/jobs/decide
//! GET  /api/v1/admin/dashboard
//! ```
//!
//! Every route requires an admin session; the capability travels in the
//! caller identity, never in the request body.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

use crate::domain::jobs::DecisionAction;
use crate::domain::ports::{
    AdminAward, BulkAwardCommand, BulkRowError, DecisionRequest, JobsCommand, PointsCommand,
    ReportsQuery,
};
use crate::domain::reports::DashboardReport;
use crate::domain::UserId;
use crate::inbound::http::jobs::ApprovalBody;
use crate::inbound::http::points::{BalanceBody, CreateTransactionResponseBody, TransactionBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{invalid_field_error, parse_uuid, FieldName};
use crate::inbound::http::ApiResult;

/// Request payload for an admin award.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminAwardRequestBody {
    #[schema(format = "uuid")]
    pub user_id: String,
    pub amount: i64,
    pub reason: String,
    #[schema(format = "uuid")]
    pub category_id: Option<String>,
}

/// Request payload for a CSV bulk award.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkAwardRequestBody {
    /// CSV text: `email,points[,reason]` per line, optional header.
    pub csv: String,
}

/// Response payload for a CSV bulk award.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkAwardResponseBody {
    pub processed: usize,
    pub errors: Vec<BulkRowError>,
}

/// Request payload for a review decision.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecideJobRequestBody {
    #[schema(format = "uuid")]
    pub job_id: String,
    #[schema(example = "approve")]
    pub action: String,
    pub rejection_reason: Option<String>,
}

/// Award points to a user.
#[utoipa::path(
    post,
    path = "/api/v1/points/admin",
    request_body = AdminAwardRequestBody,
    responses(
        (status = 200, description = "Points awarded", body = CreateTransactionResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Admin capability required", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminAward",
    security(("SessionCookie" = []))
)]
#[post("/points/admin")]
pub async fn admin_award(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AdminAwardRequestBody>,
) -> ApiResult<web::Json<CreateTransactionResponseBody>> {
    let caller = session.require_admin()?;
    let payload = payload.into_inner();
    let user_id = UserId::from_uuid(parse_uuid(&payload.user_id, FieldName::new("userId"))?);
    let category_id = payload
        .category_id
        .as_deref()
        .map(|raw| parse_uuid(raw, FieldName::new("categoryId")))
        .transpose()?;

    let receipt = state
        .points
        .admin_award(
            &caller,
            AdminAward {
                user_id,
                amount: payload.amount,
                reason: payload.reason,
                category_id,
            },
        )
        .await?;

    Ok(web::Json(CreateTransactionResponseBody {
        transaction: TransactionBody::from(receipt.transaction),
        balance: BalanceBody::from(receipt.balance),
    }))
}

/// Award points from a CSV upload; rows fail independently.
#[utoipa::path(
    post,
    path = "/api/v1/points/admin/bulk",
    request_body = BulkAwardRequestBody,
    responses(
        (status = 200, description = "Batch processed", body = BulkAwardResponseBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Admin capability required", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminBulkAward",
    security(("SessionCookie" = []))
)]
#[post("/points/admin/bulk")]
pub async fn admin_bulk_award(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<BulkAwardRequestBody>,
) -> ApiResult<web::Json<BulkAwardResponseBody>> {
    let caller = session.require_admin()?;
    let outcome = state
        .bulk_awards
        .award_csv(&caller, &payload.into_inner().csv)
        .await?;
    Ok(web::Json(BulkAwardResponseBody {
        processed: outcome.processed,
        errors: outcome.errors,
    }))
}

/// Approve or reject a pending job posting.
#[utoipa::path(
    post,
    path = "/api/v1/admin/jobs/decide",
    request_body = DecideJobRequestBody,
    responses(
        (status = 200, description = "Decision applied", body = ApprovalBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Admin capability required", body = ErrorSchema),
        (status = 404, description = "Unknown job", body = ErrorSchema),
        (status = 409, description = "Already decided", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "decideJob",
    security(("SessionCookie" = []))
)]
#[post("/admin/jobs/decide")]
pub async fn decide_job(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<DecideJobRequestBody>,
) -> ApiResult<web::Json<ApprovalBody>> {
    let caller = session.require_admin()?;
    let payload = payload.into_inner();
    let job_id = parse_uuid(&payload.job_id, FieldName::new("jobId"))?;
    let action = DecisionAction::from_str(&payload.action)
        .map_err(|err| invalid_field_error(FieldName::new("action"), &err.to_string(), &payload.action))?;

    let record = state
        .jobs
        .decide(
            &caller,
            DecisionRequest {
                job_id,
                action,
                rejection_reason: payload.rejection_reason,
            },
        )
        .await?;

    Ok(web::Json(ApprovalBody::from(record)))
}

/// Aggregated dashboard counts.
#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard counts", body = DashboardReport),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Admin capability required", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminDashboard",
    security(("SessionCookie" = []))
)]
#[get("/admin/dashboard")]
pub async fn admin_dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardReport>> {
    let caller = session.require_admin()?;
    let report = state.reports.dashboard(&caller).await?;
    Ok(web::Json(report))
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
