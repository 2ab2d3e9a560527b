//! PostgreSQL persistence adapters (driven side of the hexagon).

mod diesel_category_repository;
mod diesel_enrollment_repository;
mod diesel_job_repository;
mod diesel_ledger_repository;
mod diesel_notification_repository;
mod diesel_reports_repository;
mod diesel_user_directory;
mod error_mapping;
mod models;
mod pool;
pub mod schema;

pub use diesel_category_repository::DieselCategoryRepository;
pub use diesel_enrollment_repository::DieselEnrollmentRepository;
pub use diesel_job_repository::DieselJobRepository;
pub use diesel_ledger_repository::DieselLedgerRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_reports_repository::DieselReportsRepository;
pub use diesel_user_directory::DieselUserDirectory;
pub use pool::{DbPool, PoolConfig, PoolError};
