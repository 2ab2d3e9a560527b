//! Shared helpers for HTTP adapter tests.

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::{web, App};

use crate::inbound::http::state::HttpState;

/// Cookie session middleware with an ephemeral key for tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .build()
}

/// Full application wiring over the given state, mirroring production
/// route layout.
pub fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(super::accounts::login)
                .service(super::accounts::me)
                .service(super::points::create_transaction)
                .service(super::points::get_points)
                .service(super::points::update_transaction_status)
                .service(super::category_points::get_categories)
                .service(super::category_points::award_category_points)
                .service(super::category_points::spend_category_points)
                .service(super::jobs::submit_job)
                .service(super::jobs::list_jobs)
                .service(super::jobs::list_own_jobs)
                .service(super::jobs::delete_job)
                .service(super::admin::admin_award)
                .service(super::admin::admin_bulk_award)
                .service(super::admin::decide_job)
                .service(super::admin::admin_dashboard)
                .service(super::notifications::create_notification)
                .service(super::notifications::list_notifications)
                .service(super::notifications::mark_notification_read)
                .service(super::enrollments::register_for_event),
        )
}

/// Log in through the fixture contract and return the session cookie.
///
/// `username` is `"admin"` or `"member"`.
pub async fn login_as(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    username: &str,
) -> actix_web::cookie::Cookie<'static> {
    let login_req = actix_web::test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(serde_json::json!({
            "username": username,
            "password": "password",
        }))
        .to_request();
    let login_res = actix_web::test::call_service(app, login_req).await;
    assert!(login_res.status().is_success(), "fixture login succeeds");
    login_res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
