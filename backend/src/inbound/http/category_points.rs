//! Category points HTTP handlers.
//!
//! ```text
//! GET  /api/v1/points/categories
//! POST /api/v1/points/categories/{name}/award
//! POST /api/v1/points/categories/{name}/spend
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::categories::CategoryPointsSummary;
use crate::domain::ports::{CategoryPointsChange, CategoryPointsCommand, CategoryPointsQuery};
use crate::inbound::http::points::{BalanceBody, CreateTransactionResponseBody, TransactionBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request payload for a category award or spend.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPointsChangeBody {
    pub amount: i64,
    pub reason: String,
    pub metadata: Option<Value>,
}

/// One category with the caller's derived figures.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPointsSummaryBody {
    #[schema(format = "uuid")]
    pub category_id: String,
    pub name: String,
    pub display_name: String,
    pub earned: i64,
    pub spent: i64,
    pub net: i64,
    pub transaction_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(format = "date-time")]
    pub last_activity: Option<String>,
}

impl From<CategoryPointsSummary> for CategoryPointsSummaryBody {
    fn from(value: CategoryPointsSummary) -> Self {
        Self {
            category_id: value.category.id.to_string(),
            name: value.category.name,
            display_name: value.category.display_name,
            earned: value.earned,
            spent: value.spent,
            net: value.net,
            transaction_count: value.transaction_count,
            last_activity: value.last_activity.map(|at| at.to_rfc3339()),
        }
    }
}

/// Response payload for the category listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesResponseBody {
    pub categories: Vec<CategoryPointsSummaryBody>,
}

impl From<CategoryPointsChangeBody> for CategoryPointsChange {
    fn from(value: CategoryPointsChangeBody) -> Self {
        Self {
            amount: value.amount,
            reason: value.reason,
            metadata: value.metadata,
        }
    }
}

/// Every known category with the caller's points, zero-filled.
#[utoipa::path(
    get,
    path = "/api/v1/points/categories",
    responses(
        (status = 200, description = "Categories with caller points", body = CategoriesResponseBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["points"],
    operation_id = "getCategories",
    security(("SessionCookie" = []))
)]
#[get("/points/categories")]
pub async fn get_categories(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<CategoriesResponseBody>> {
    let caller = session.require_identity()?;
    let summaries = state
        .category_points_query
        .all_categories_with_points(&caller)
        .await?;
    Ok(web::Json(CategoriesResponseBody {
        categories: summaries
            .into_iter()
            .map(CategoryPointsSummaryBody::from)
            .collect(),
    }))
}

/// Earn points within a category.
#[utoipa::path(
    post,
    path = "/api/v1/points/categories/{name}/award",
    params(("name" = String, Path, description = "Category name")),
    request_body = CategoryPointsChangeBody,
    responses(
        (status = 200, description = "Points awarded", body = CreateTransactionResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Unknown category", body = ErrorSchema)
    ),
    tags = ["points"],
    operation_id = "awardCategoryPoints",
    security(("SessionCookie" = []))
)]
#[post("/points/categories/{name}/award")]
pub async fn award_category_points(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CategoryPointsChangeBody>,
) -> ApiResult<web::Json<CreateTransactionResponseBody>> {
    let caller = session.require_identity()?;
    let receipt = state
        .category_points
        .award(&caller, &path.into_inner(), payload.into_inner().into())
        .await?;
    Ok(web::Json(CreateTransactionResponseBody {
        transaction: TransactionBody::from(receipt.transaction),
        balance: BalanceBody::from(receipt.balance),
    }))
}

/// Spend points within a category; the category-scoped net must cover the
/// amount.
#[utoipa::path(
    post,
    path = "/api/v1/points/categories/{name}/spend",
    params(("name" = String, Path, description = "Category name")),
    request_body = CategoryPointsChangeBody,
    responses(
        (status = 200, description = "Points spent", body = CreateTransactionResponseBody),
        (status = 400, description = "Invalid request or insufficient category points", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Unknown category", body = ErrorSchema)
    ),
    tags = ["points"],
    operation_id = "spendCategoryPoints",
    security(("SessionCookie" = []))
)]
#[post("/points/categories/{name}/spend")]
pub async fn spend_category_points(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CategoryPointsChangeBody>,
) -> ApiResult<web::Json<CreateTransactionResponseBody>> {
    let caller = session.require_identity()?;
    let receipt = state
        .category_points
        .spend(&caller, &path.into_inner(), payload.into_inner().into())
        .await?;
    Ok(web::Json(CreateTransactionResponseBody {
        transaction: TransactionBody::from(receipt.transaction),
        balance: BalanceBody::from(receipt.balance),
    }))
}
