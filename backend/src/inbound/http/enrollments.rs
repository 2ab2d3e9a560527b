//! Event enrollment HTTP handlers.
//!
//! ```text
//! POST /api/v1/enrollments
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::EnrollmentCommand;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_uuid, FieldName};
use crate::inbound::http::ApiResult;

/// Request payload for registering to an event.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequestBody {
    #[schema(format = "uuid")]
    pub event_id: String,
}

/// Response payload for a registration.
///
/// Re-registering is success-like: `alreadyRegistered` flips to `true` and
/// no duplicate row is created.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponseBody {
    pub registered: bool,
    pub already_registered: bool,
}

/// Register the caller for an event, idempotently.
#[utoipa::path(
    post,
    path = "/api/v1/enrollments",
    request_body = RegisterRequestBody,
    responses(
        (status = 200, description = "Registered (or already registered)", body = RegisterResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["enrollments"],
    operation_id = "registerForEvent",
    security(("SessionCookie" = []))
)]
#[post("/enrollments")]
pub async fn register_for_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequestBody>,
) -> ApiResult<web::Json<RegisterResponseBody>> {
    let caller = session.require_identity()?;
    let event_id = parse_uuid(&payload.into_inner().event_id, FieldName::new("eventId"))?;

    let receipt = state.enrollments.register(&caller, event_id).await?;

    Ok(web::Json(RegisterResponseBody {
        registered: receipt.registered,
        already_registered: receipt.already_registered,
    }))
}
