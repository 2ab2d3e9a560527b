//! Points ledger HTTP handlers.
//!
//! ```text
//! POST  /api/v1/points
//! GET   /api/v1/points
//! PATCH /api/v1/points/transactions/{id}/status
//! ```

use actix_web::{get, patch, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::ledger::{
    PointsBalance, RealTransactionStatus, Transaction, TransactionDirection, TransactionFilter,
    TransactionKind,
};
use crate::domain::pagination::{PageInfo, PageRequest};
use crate::domain::ports::{NewTransaction, PointsCommand, PointsQuery};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    parse_enum_field, parse_optional_enum_field, parse_uuid, FieldName,
};
use crate::inbound::http::ApiResult;

/// Request payload for creating a transaction.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequestBody {
    #[schema(example = "points")]
    pub kind: String,
    pub amount: i64,
    #[schema(example = "earn")]
    pub direction: String,
    pub reason: String,
    #[schema(format = "uuid")]
    pub category_id: Option<String>,
    pub metadata: Option<Value>,
}

/// A transaction as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub kind: String,
    pub amount: i64,
    pub direction: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(format = "uuid")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_note: Option<String>,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<Transaction> for TransactionBody {
    fn from(value: Transaction) -> Self {
        Self {
            id: value.id.to_string(),
            kind: value.kind.to_string(),
            amount: value.amount,
            direction: value.direction.to_string(),
            reason: value.reason,
            category_id: value.category_id.map(|id| id.to_string()),
            metadata: value.metadata,
            status: value.status.map(|status| status.to_string()),
            status_note: value.status_note,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// A balance snapshot as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceBody {
    #[schema(format = "uuid")]
    pub user_id: String,
    pub total_points: i64,
    pub total_earned: i64,
    pub total_spent: i64,
}

impl From<PointsBalance> for BalanceBody {
    fn from(value: PointsBalance) -> Self {
        Self {
            user_id: value.user_id.to_string(),
            total_points: value.total_points,
            total_earned: value.total_earned,
            total_spent: value.total_spent,
        }
    }
}

/// Response payload for transaction creation.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionResponseBody {
    pub transaction: TransactionBody,
    pub balance: BalanceBody,
}

/// Query parameters for `GET /points`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsQueryParams {
    pub transactions: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub kind: Option<String>,
    pub direction: Option<String>,
    pub status: Option<String>,
}

/// Response payload for a transaction history page.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsResponseBody {
    pub transactions: Vec<TransactionBody>,
    pub pagination: PageInfo,
}

/// Request payload for settling a real transaction.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionStatusRequestBody {
    #[schema(example = "completed")]
    pub status: String,
    pub note: Option<String>,
}

fn parse_new_transaction(payload: CreateTransactionRequestBody) -> ApiResult<NewTransaction> {
    let kind: TransactionKind = parse_enum_field(&payload.kind, FieldName::new("kind"))?;
    let direction: TransactionDirection =
        parse_enum_field(&payload.direction, FieldName::new("direction"))?;
    let category_id = payload
        .category_id
        .as_deref()
        .map(|raw| parse_uuid(raw, FieldName::new("categoryId")))
        .transpose()?;
    Ok(NewTransaction {
        kind,
        amount: payload.amount,
        direction,
        reason: payload.reason,
        category_id,
        metadata: payload.metadata,
    })
}

/// Record a transaction on the caller's ledger.
#[utoipa::path(
    post,
    path = "/api/v1/points",
    request_body = CreateTransactionRequestBody,
    responses(
        (status = 200, description = "Transaction recorded", body = CreateTransactionResponseBody),
        (status = 400, description = "Invalid request or insufficient points", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["points"],
    operation_id = "createTransaction",
    security(("SessionCookie" = []))
)]
#[post("/points")]
pub async fn create_transaction(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateTransactionRequestBody>,
) -> ApiResult<web::Json<CreateTransactionResponseBody>> {
    let caller = session.require_identity()?;
    let input = parse_new_transaction(payload.into_inner())?;

    let receipt = state.points.create_transaction(&caller, input).await?;

    Ok(web::Json(CreateTransactionResponseBody {
        transaction: TransactionBody::from(receipt.transaction),
        balance: BalanceBody::from(receipt.balance),
    }))
}

/// Read the caller's balance, or their transaction history with
/// `?transactions=true`.
#[utoipa::path(
    get,
    path = "/api/v1/points",
    params(
        ("transactions" = Option<bool>, Query, description = "Return the transaction page instead of the balance"),
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Rows per page"),
        ("kind" = Option<String>, Query, description = "Filter by transaction kind"),
        ("direction" = Option<String>, Query, description = "Filter by direction"),
        ("status" = Option<String>, Query, description = "Filter by settlement status")
    ),
    responses(
        (status = 200, description = "Balance or transaction page", body = BalanceBody),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["points"],
    operation_id = "getPoints",
    security(("SessionCookie" = []))
)]
#[get("/points")]
pub async fn get_points(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<PointsQueryParams>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let params = params.into_inner();

    if params.transactions.unwrap_or(false) {
        let filter = TransactionFilter {
            kind: parse_optional_enum_field::<TransactionKind>(
                params.kind.as_deref(),
                FieldName::new("kind"),
            )?,
            direction: parse_optional_enum_field::<TransactionDirection>(
                params.direction.as_deref(),
                FieldName::new("direction"),
            )?,
            status: parse_optional_enum_field::<RealTransactionStatus>(
                params.status.as_deref(),
                FieldName::new("status"),
            )?,
        };
        let page = PageRequest::new(params.page, params.limit);
        let result = state.points_query.transactions(&caller, filter, page).await?;
        return Ok(HttpResponse::Ok().json(TransactionsResponseBody {
            transactions: result
                .transactions
                .into_iter()
                .map(TransactionBody::from)
                .collect(),
            pagination: result.page,
        }));
    }

    let balance = state.points_query.balance(&caller).await?;
    Ok(HttpResponse::Ok().json(BalanceBody::from(balance)))
}

/// Settle a real transaction the caller owns.
#[utoipa::path(
    patch,
    path = "/api/v1/points/transactions/{id}/status",
    params(("id" = String, Path, description = "Transaction id")),
    request_body = UpdateTransactionStatusRequestBody,
    responses(
        (status = 200, description = "Status updated", body = TransactionBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Unknown transaction", body = ErrorSchema),
        (status = 409, description = "Already settled", body = ErrorSchema)
    ),
    tags = ["points"],
    operation_id = "updateTransactionStatus",
    security(("SessionCookie" = []))
)]
#[patch("/points/transactions/{id}/status")]
pub async fn update_transaction_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateTransactionStatusRequestBody>,
) -> ApiResult<web::Json<TransactionBody>> {
    let caller = session.require_identity()?;
    let transaction_id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    let payload = payload.into_inner();
    let status: RealTransactionStatus =
        parse_enum_field(&payload.status, FieldName::new("status"))?;

    let transaction = state
        .points
        .update_real_transaction_status(&caller, transaction_id, status, payload.note)
        .await?;

    Ok(web::Json(TransactionBody::from(transaction)))
}

#[cfg(test)]
#[path = "points_tests.rs"]
mod tests;
