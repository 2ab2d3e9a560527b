//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BestEffortNotifier, BulkAwardCommand, CategoryPointsCommand, CategoryPointsQuery,
    EnrollmentCommand, FixtureBulkAwardCommand, FixtureCategoryPointsCommand,
    FixtureCategoryPointsQuery, FixtureEnrollmentCommand, FixtureJobsCommand, FixtureJobsQuery,
    FixtureLoginService, FixtureNotificationsQuery, FixtureNotifier, FixturePointsCommand,
    FixturePointsQuery, FixtureReportsQuery, JobsCommand, JobsQuery, LoginService,
    NotificationsQuery, PointsCommand, PointsQuery, ReportsQuery, UserDirectory,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub directory: Option<Arc<dyn UserDirectory>>,
    pub points: Arc<dyn PointsCommand>,
    pub points_query: Arc<dyn PointsQuery>,
    pub category_points: Arc<dyn CategoryPointsCommand>,
    pub category_points_query: Arc<dyn CategoryPointsQuery>,
    pub jobs: Arc<dyn JobsCommand>,
    pub jobs_query: Arc<dyn JobsQuery>,
    pub notifier: Arc<dyn BestEffortNotifier>,
    pub notifications: Arc<dyn NotificationsQuery>,
    pub enrollments: Arc<dyn EnrollmentCommand>,
    pub reports: Arc<dyn ReportsQuery>,
    pub bulk_awards: Arc<dyn BulkAwardCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub directory: Option<Arc<dyn UserDirectory>>,
    pub points: Arc<dyn PointsCommand>,
    pub points_query: Arc<dyn PointsQuery>,
    pub category_points: Arc<dyn CategoryPointsCommand>,
    pub category_points_query: Arc<dyn CategoryPointsQuery>,
    pub jobs: Arc<dyn JobsCommand>,
    pub jobs_query: Arc<dyn JobsQuery>,
    pub notifier: Arc<dyn BestEffortNotifier>,
    pub notifications: Arc<dyn NotificationsQuery>,
    pub enrollments: Arc<dyn EnrollmentCommand>,
    pub reports: Arc<dyn ReportsQuery>,
    pub bulk_awards: Arc<dyn BulkAwardCommand>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            directory,
            points,
            points_query,
            category_points,
            category_points_query,
            jobs,
            jobs_query,
            notifier,
            notifications,
            enrollments,
            reports,
            bulk_awards,
        } = ports;
        Self {
            login,
            directory,
            points,
            points_query,
            category_points,
            category_points_query,
            jobs,
            jobs_query,
            notifier,
            notifications,
            enrollments,
            reports,
            bulk_awards,
        }
    }

    /// Fixture-backed state for wiring without a database.
    pub fn fixture() -> Self {
        Self::new(HttpStatePorts {
            login: Arc::new(FixtureLoginService),
            directory: None,
            points: Arc::new(FixturePointsCommand),
            points_query: Arc::new(FixturePointsQuery),
            category_points: Arc::new(FixtureCategoryPointsCommand),
            category_points_query: Arc::new(FixtureCategoryPointsQuery),
            jobs: Arc::new(FixtureJobsCommand),
            jobs_query: Arc::new(FixtureJobsQuery),
            notifier: Arc::new(FixtureNotifier),
            notifications: Arc::new(FixtureNotificationsQuery),
            enrollments: Arc::new(FixtureEnrollmentCommand),
            reports: Arc::new(FixtureReportsQuery),
            bulk_awards: Arc::new(FixtureBulkAwardCommand),
        })
    }
}
