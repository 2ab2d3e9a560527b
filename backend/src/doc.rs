//! OpenAPI documentation configuration.
//!
//! Defines [`ApiDoc`], the generated specification for the REST API:
//! every HTTP endpoint from the inbound layer, the shared error schema,
//! and the session cookie security scheme. Swagger UI serves the document
//! in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::ErrorSchema;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Tradehall backend API",
        description = "Community marketplace backend: points ledger, job board with review queue, notifications, enrollments, and admin reporting."
    ),
    paths(
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::me,
        crate::inbound::http::points::create_transaction,
        crate::inbound::http::points::get_points,
        crate::inbound::http::points::update_transaction_status,
        crate::inbound::http::category_points::get_categories,
        crate::inbound::http::category_points::award_category_points,
        crate::inbound::http::category_points::spend_category_points,
        crate::inbound::http::jobs::submit_job,
        crate::inbound::http::jobs::list_jobs,
        crate::inbound::http::jobs::list_own_jobs,
        crate::inbound::http::jobs::delete_job,
        crate::inbound::http::admin::admin_award,
        crate::inbound::http::admin::admin_bulk_award,
        crate::inbound::http::admin::decide_job,
        crate::inbound::http::admin::admin_dashboard,
        crate::inbound::http::notifications::create_notification,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::mark_notification_read,
        crate::inbound::http::enrollments::register_for_event,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema)),
    tags(
        (name = "accounts", description = "Login and caller profile"),
        (name = "points", description = "Transaction ledger and category accounting"),
        (name = "jobs", description = "Job board and review queue"),
        (name = "admin", description = "Admin-gated operations"),
        (name = "notifications", description = "Best-effort notification feed"),
        (name = "enrollments", description = "Idempotent event registration"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_contains_the_core_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/api/v1/points"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/v1/jobs"));
        assert!(paths
            .iter()
            .any(|p| p.as_str() == "/api/v1/admin/jobs/decide"));
    }

    #[test]
    fn security_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components present");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
