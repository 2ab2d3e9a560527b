//! Domain entities, ports, and services.
//!
//! Transport and persistence free: inbound adapters map these types to
//! HTTP, outbound adapters implement the driven ports against PostgreSQL
//! and the mail relay.

pub mod bulk_award;
pub mod categories;
pub mod category_points_service;
pub mod enrollment;
pub mod enrollment_service;
pub mod error;
pub mod identity;
pub mod jobs;
pub mod job_service;
pub mod ledger;
pub mod ledger_service;
pub mod notification_service;
pub mod notifications;
pub mod pagination;
pub mod ports;
pub mod reports;
pub mod reports_service;

pub use self::bulk_award::BulkAwardService;
pub use self::category_points_service::CategoryPointsService;
pub use self::enrollment_service::EnrollmentService;
pub use self::error::{Error, ErrorCode};
pub use self::identity::{CallerIdentity, IdentityValidationError, Role, UserId};
pub use self::job_service::{JobCommandService, JobQueryService};
pub use self::ledger_service::{LedgerCommandService, LedgerQueryService};
pub use self::notification_service::{NotificationDispatchService, NotificationQueryService};
pub use self::reports_service::ReportsService;

/// Convenient result alias for domain operations.
pub type ApiResult<T> = Result<T, Error>;
