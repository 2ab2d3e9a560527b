//! Account HTTP handlers.
//!
//! ```text
//! POST /api/v1/login
//! GET  /api/v1/me
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{LoginCredentials, LoginService, UserDirectory};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request payload for logging in.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestBody {
    pub username: String,
    pub password: String,
}

/// Response payload for a successful login.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseBody {
    #[schema(format = "uuid")]
    pub user_id: String,
    #[schema(example = "member")]
    pub role: String,
}

/// The caller's own profile.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponseBody {
    #[schema(format = "uuid")]
    pub user_id: String,
    #[schema(example = "member")]
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Authenticate and establish a session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequestBody,
    responses(
        (status = 200, description = "Session established", body = LoginResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequestBody>,
) -> ApiResult<web::Json<LoginResponseBody>> {
    let payload = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(payload.username, payload.password)?;
    let identity = state.login.authenticate(&credentials).await?;
    session.persist_identity(&identity)?;

    Ok(web::Json(LoginResponseBody {
        user_id: identity.user_id().to_string(),
        role: identity.role().to_string(),
    }))
}

/// Return the authenticated caller's profile.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Caller profile", body = MeResponseBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "me",
    security(("SessionCookie" = []))
)]
#[get("/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<MeResponseBody>> {
    let identity = session.require_identity()?;

    let mut body = MeResponseBody {
        user_id: identity.user_id().to_string(),
        role: identity.role().to_string(),
        display_name: None,
        email: None,
    };

    if let Some(directory) = &state.directory {
        // Profile enrichment is optional; the identity alone is enough.
        match directory.find_by_id(identity.user_id()).await {
            Ok(Some(user)) => {
                body.display_name = Some(user.display_name);
                body.email = Some(user.email);
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(error = %error, "profile lookup failed; returning bare identity");
            }
        }
    }

    Ok(web::Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{login_as, test_app};
    use actix_web::{http::StatusCode, test as actix_test};
    use serde_json::Value;

    #[actix_web::test]
    async fn login_sets_a_session_cookie() {
        let app = actix_test::init_service(test_app(HttpState::fixture())).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(&LoginRequestBody {
                    username: "member".into(),
                    password: "password".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res
            .response()
            .cookies()
            .any(|cookie| cookie.name() == "session"));
    }

    #[actix_web::test]
    async fn wrong_password_is_unauthorised() {
        let app = actix_test::init_service(test_app(HttpState::fixture())).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(&LoginRequestBody {
                    username: "member".into(),
                    password: "wrong".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn me_reflects_the_session_identity() {
        let app = actix_test::init_service(test_app(HttpState::fixture())).await;
        let cookie = login_as(&app, "admin").await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/me")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["role"], "admin");
    }

    #[actix_web::test]
    async fn me_without_a_session_is_unauthorised() {
        let app = actix_test::init_service(test_app(HttpState::fixture())).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/me").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
