//! Notification HTTP handlers.
//!
//! ```text
//! POST /api/v1/notifications
//! GET  /api/v1/notifications
//! POST /api/v1/notifications/{id}/read
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::notifications::{
    Notification, NotificationDraft, NotificationEvent, NotificationKind, NotificationPriority,
};
use crate::domain::pagination::{PageInfo, PageRequest};
use crate::domain::ports::{BestEffortNotifier, NotificationsQuery};
use crate::domain::UserId;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    parse_enum_field, parse_optional_enum_field, parse_uuid, FieldName,
};
use crate::inbound::http::ApiResult;

/// Request payload for creating a notification.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequestBody {
    /// Target user; admins may target anyone, members only themselves.
    #[schema(format = "uuid")]
    pub user_id: Option<String>,
    pub title: String,
    pub message: String,
    #[schema(example = "system")]
    pub kind: String,
    #[schema(example = "normal")]
    pub priority: Option<String>,
    #[schema(format = "uuid")]
    pub reference_id: Option<String>,
    pub reference_kind: Option<String>,
    pub payload: Option<Value>,
}

/// Acknowledgement for a best-effort dispatch.
///
/// `accepted` means the event was handed to the dispatcher, not that it was
/// delivered; delivery is at most once with no retry.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationAcceptedBody {
    pub accepted: bool,
}

/// A notification as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub priority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(format = "uuid")]
    pub reference_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    pub is_read: bool,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<Notification> for NotificationBody {
    fn from(value: Notification) -> Self {
        Self {
            id: value.id.to_string(),
            title: value.title,
            message: value.message,
            kind: value.kind.to_string(),
            priority: value.priority.to_string(),
            reference_id: value.reference_id.map(|id| id.to_string()),
            reference_kind: value.reference_kind,
            payload: value.payload,
            is_read: value.is_read,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Response payload for the notification feed.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsResponseBody {
    pub notifications: Vec<NotificationBody>,
    pub pagination: PageInfo,
}

/// Query parameters for the feed.
#[derive(Debug, Deserialize)]
pub struct NotificationsQueryParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Hand one notification to the best-effort dispatcher.
#[utoipa::path(
    post,
    path = "/api/v1/notifications",
    request_body = CreateNotificationRequestBody,
    responses(
        (status = 202, description = "Event accepted for best-effort delivery", body = NotificationAcceptedBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Members may only notify themselves", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "createNotification",
    security(("SessionCookie" = []))
)]
#[post("/notifications")]
pub async fn create_notification(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateNotificationRequestBody>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let payload = payload.into_inner();

    let target = match payload.user_id.as_deref() {
        Some(raw) => UserId::from_uuid(parse_uuid(raw, FieldName::new("userId"))?),
        None => *caller.user_id(),
    };
    if target != *caller.user_id() {
        caller.require_admin()?;
    }

    let kind: NotificationKind = parse_enum_field(&payload.kind, FieldName::new("kind"))?;
    let priority = parse_optional_enum_field::<NotificationPriority>(
        payload.priority.as_deref(),
        FieldName::new("priority"),
    )?
    .unwrap_or_default();
    let reference_id = payload
        .reference_id
        .as_deref()
        .map(|raw| parse_uuid(raw, FieldName::new("referenceId")))
        .transpose()?;

    let event = NotificationEvent::in_app(NotificationDraft {
        user_id: target,
        title: payload.title,
        message: payload.message,
        kind,
        priority,
        reference_id,
        reference_kind: payload.reference_kind,
        payload: payload.payload,
    });

    // Accepted, not delivered: failures past this point are swallowed.
    state.notifier.enqueue(event).await;

    Ok(HttpResponse::Accepted().json(NotificationAcceptedBody { accepted: true }))
}

/// The caller's notification feed, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Rows per page")
    ),
    responses(
        (status = 200, description = "Notification feed", body = NotificationsResponseBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications",
    security(("SessionCookie" = []))
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<NotificationsQueryParams>,
) -> ApiResult<web::Json<NotificationsResponseBody>> {
    let caller = session.require_identity()?;
    let page = PageRequest::new(params.page, params.limit);
    let result = state.notifications.list(&caller, page).await?;
    Ok(web::Json(NotificationsResponseBody {
        notifications: result
            .notifications
            .into_iter()
            .map(NotificationBody::from)
            .collect(),
        pagination: result.page,
    }))
}

/// Mark one of the caller's notifications as read.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = String, Path, description = "Notification id")),
    responses(
        (status = 204, description = "Marked read"),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Unknown notification", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead",
    security(("SessionCookie" = []))
)]
#[post("/notifications/{id}/read")]
pub async fn mark_notification_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let notification_id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    state
        .notifications
        .mark_read(&caller, notification_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
