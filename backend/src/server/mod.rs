//! Application wiring: ports to adapters, routes to handlers.

pub mod config;

use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::{Key, SameSite};
use actix_web::{web, App, HttpServer};
use async_trait::async_trait;
use mockable::DefaultClock;
use tracing::{info, warn};

#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::domain::notifications::EmailMessage;
use crate::domain::ports::{Mailer, MailerError, NoOpMailer};
use crate::domain::{
    BulkAwardService, CategoryPointsService, EnrollmentService, JobCommandService,
    JobQueryService, LedgerCommandService, LedgerQueryService, NotificationDispatchService,
    NotificationQueryService, ReportsService,
};
use crate::inbound::http::health::{live, ready, HealthState};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::middleware::Trace;
use crate::outbound::mailer::HttpMailer;
use crate::outbound::persistence::{
    DbPool, DieselCategoryRepository, DieselEnrollmentRepository, DieselJobRepository,
    DieselLedgerRepository, DieselNotificationRepository, DieselReportsRepository,
    DieselUserDirectory, PoolConfig,
};

pub use config::{ConfigError, ServerConfig};

/// Migrations compiled into the binary; applied at startup.
pub const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
    diesel_migrations::embed_migrations!();

/// Apply pending migrations over a blocking connection.
async fn run_migrations(database_url: &str) -> std::io::Result<()> {
    use diesel::Connection;
    use diesel_migrations::MigrationHarness;

    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut conn = diesel::PgConnection::establish(&url)
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        if !applied.is_empty() {
            info!(count = applied.len(), "applied pending migrations");
        }
        Ok(())
    })
    .await
    .map_err(|err| std::io::Error::other(err.to_string()))?
}

/// Concrete mailer chosen by configuration.
enum AppMailer {
    Relay(HttpMailer),
    NoOp(NoOpMailer),
}

#[async_trait]
impl Mailer for AppMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError> {
        match self {
            Self::Relay(inner) => inner.send(message).await,
            Self::NoOp(inner) => inner.send(message).await,
        }
    }
}

/// Build the HTTP state against PostgreSQL, or fall back to fixtures when
/// no database is configured.
pub async fn build_state(config: &ServerConfig) -> Result<HttpState, std::io::Error> {
    let Some(database_url) = &config.database_url else {
        warn!("DATABASE_URL not set; serving fixture data only");
        return Ok(HttpState::fixture());
    };

    run_migrations(database_url).await?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(std::io::Error::other)?;
    Ok(state_with_pool(pool, config))
}

fn state_with_pool(pool: DbPool, config: &ServerConfig) -> HttpState {
    let clock = Arc::new(DefaultClock);

    let ledger_repo = Arc::new(DieselLedgerRepository::new(pool.clone()));
    let category_repo = Arc::new(DieselCategoryRepository::new(pool.clone()));
    let job_repo = Arc::new(DieselJobRepository::new(pool.clone()));
    let notification_repo = Arc::new(DieselNotificationRepository::new(pool.clone()));
    let enrollment_repo = Arc::new(DieselEnrollmentRepository::new(pool.clone()));
    let reports_repo = Arc::new(DieselReportsRepository::new(pool.clone()));
    let directory = Arc::new(DieselUserDirectory::new(pool.clone()));

    let mailer = Arc::new(match &config.mail_relay {
        Some(relay_url) => {
            info!(relay = %relay_url, "outbound email via HTTP relay");
            AppMailer::Relay(HttpMailer::new(relay_url.clone(), config.mail_sender.clone()))
        }
        None => {
            warn!("MAIL_RELAY_URL not set; outbound email disabled");
            AppMailer::NoOp(NoOpMailer)
        }
    });

    let notifier = Arc::new(NotificationDispatchService::new(
        Arc::clone(&notification_repo),
        mailer,
    ));

    let category_points = Arc::new(CategoryPointsService::new(
        Arc::clone(&ledger_repo),
        Arc::clone(&category_repo),
        clock.clone(),
    ));

    HttpState::new(HttpStatePorts {
        login: Arc::new(crate::domain::ports::FixtureLoginService),
        directory: Some(directory.clone()),
        points: Arc::new(LedgerCommandService::new(
            Arc::clone(&ledger_repo),
            clock.clone(),
        )),
        points_query: Arc::new(LedgerQueryService::new(Arc::clone(&ledger_repo))),
        category_points: category_points.clone(),
        category_points_query: category_points,
        jobs: Arc::new(JobCommandService::new(
            job_repo.clone(),
            directory.clone(),
            notifier.clone(),
            clock.clone(),
        )),
        jobs_query: Arc::new(JobQueryService::new(job_repo, config.approval_policy)),
        notifier,
        notifications: Arc::new(NotificationQueryService::new(notification_repo)),
        enrollments: Arc::new(EnrollmentService::new(enrollment_repo)),
        reports: Arc::new(ReportsService::new(reports_repo)),
        bulk_awards: Arc::new(BulkAwardService::new(ledger_repo, directory, clock)),
    })
}

fn build_app(
    state: HttpState,
    health_state: web::Data<HealthState>,
    key: Key,
    cookie_secure: bool,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(crate::inbound::http::accounts::login)
        .service(crate::inbound::http::accounts::me)
        .service(crate::inbound::http::points::create_transaction)
        .service(crate::inbound::http::points::get_points)
        .service(crate::inbound::http::points::update_transaction_status)
        .service(crate::inbound::http::category_points::get_categories)
        .service(crate::inbound::http::category_points::award_category_points)
        .service(crate::inbound::http::category_points::spend_category_points)
        .service(crate::inbound::http::jobs::submit_job)
        .service(crate::inbound::http::jobs::list_jobs)
        .service(crate::inbound::http::jobs::list_own_jobs)
        .service(crate::inbound::http::jobs::delete_job)
        .service(crate::inbound::http::admin::admin_award)
        .service(crate::inbound::http::admin::admin_bulk_award)
        .service(crate::inbound::http::admin::decide_job)
        .service(crate::inbound::http::admin::admin_dashboard)
        .service(crate::inbound::http::notifications::create_notification)
        .service(crate::inbound::http::notifications::list_notifications)
        .service(crate::inbound::http::notifications::mark_notification_read)
        .service(crate::inbound::http::enrollments::register_for_event);

    #[allow(unused_mut)]
    let mut app = App::new()
        .app_data(web::Data::new(state))
        .app_data(health_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    {
        app = app.service(
            SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::doc::ApiDoc::openapi()),
        );
    }

    app
}

/// Bind and run the HTTP server until shutdown.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let state = build_state(&config).await?;
    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();
    let key = config.session_key.clone();
    let cookie_secure = config.cookie_secure;

    let server = HttpServer::new(move || {
        build_app(
            state.clone(),
            server_health_state.clone(),
            key.clone(),
            cookie_secure,
        )
    })
    .bind(config.bind_addr)?;

    info!(addr = %config.bind_addr, "listening");
    health_state.mark_ready();
    server.run().await
}
