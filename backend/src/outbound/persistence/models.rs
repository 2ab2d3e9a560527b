//! Diesel row models for the persistence adapters.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    event_registrations, job_approvals, job_postings, notifications, point_balances,
    point_categories, point_transactions, users,
};

/// Queryable row for users.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Queryable row for point balances.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = point_balances)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PointBalanceRow {
    pub user_id: Uuid,
    pub total_points: i64,
    pub total_earned: i64,
    pub total_spent: i64,
    pub updated_at: DateTime<Utc>,
}

/// Insertable row for point balances.
#[derive(Debug, Insertable)]
#[diesel(table_name = point_balances)]
pub(crate) struct NewPointBalanceRow {
    pub user_id: Uuid,
    pub total_points: i64,
    pub total_earned: i64,
    pub total_spent: i64,
    pub updated_at: DateTime<Utc>,
}

/// Queryable row for point categories.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = point_categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PointCategoryRow {
    pub id: Uuid,
    pub name: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

/// Queryable row for point transactions.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = point_transactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PointTransactionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub amount: i64,
    pub direction: String,
    pub reason: String,
    pub category_id: Option<Uuid>,
    pub metadata: Option<serde_json::Value>,
    pub status: Option<String>,
    pub status_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable row for point transactions.
#[derive(Debug, Insertable)]
#[diesel(table_name = point_transactions)]
pub(crate) struct NewPointTransactionRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: &'a str,
    pub amount: i64,
    pub direction: &'a str,
    pub reason: &'a str,
    pub category_id: Option<Uuid>,
    pub metadata: Option<&'a serde_json::Value>,
    pub status: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

/// Queryable row for job postings.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = job_postings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct JobPostingRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub company: String,
    pub category: String,
    pub job_type: String,
    pub experience_level: String,
    pub posted_by: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable row for job postings.
#[derive(Debug, Insertable)]
#[diesel(table_name = job_postings)]
pub(crate) struct NewJobPostingRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub company: &'a str,
    pub category: &'a str,
    pub job_type: &'a str,
    pub experience_level: &'a str,
    pub posted_by: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Queryable row for job approvals.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = job_approvals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct JobApprovalRow {
    pub job_id: Uuid,
    pub status: String,
    pub approver_id: Option<Uuid>,
    pub decided_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

/// Insertable row for job approvals.
#[derive(Debug, Insertable)]
#[diesel(table_name = job_approvals)]
pub(crate) struct NewJobApprovalRow<'a> {
    pub job_id: Uuid,
    pub status: &'a str,
}

/// Queryable row for notifications.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub priority: String,
    pub reference_id: Option<Uuid>,
    pub reference_kind: Option<String>,
    pub payload: Option<serde_json::Value>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable row for notifications.
#[derive(Debug, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: &'a str,
    pub message: &'a str,
    pub kind: &'a str,
    pub priority: &'a str,
    pub reference_id: Option<Uuid>,
    pub reference_kind: Option<&'a str>,
    pub payload: Option<&'a serde_json::Value>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Queryable row for event registrations.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = event_registrations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRegistrationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Insertable row for event registrations.
#[derive(Debug, Insertable)]
#[diesel(table_name = event_registrations)]
pub(crate) struct NewEventRegistrationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub created_at: DateTime<Utc>,
}
