//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation. When migrations change the schema, regenerate with
//! `diesel print-schema` or update by hand.

diesel::table! {
    /// Registered users.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Human-readable display name.
        display_name -> Varchar,
        /// Unique email address.
        email -> Varchar,
        /// Whether the user holds the admin capability.
        is_admin -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-user derived point balances; one row per user, created lazily.
    point_balances (user_id) {
        user_id -> Uuid,
        total_points -> Int8,
        total_earned -> Int8,
        total_spent -> Int8,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Grouping dimension for parallel point economies.
    point_categories (id) {
        id -> Uuid,
        /// Unique lookup key, e.g. `tools`.
        name -> Varchar,
        display_name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only ledger of point and real-currency movements.
    point_transactions (id) {
        id -> Uuid,
        user_id -> Uuid,
        /// `points` or `real`.
        kind -> Varchar,
        amount -> Int8,
        /// `earn` or `spend`.
        direction -> Varchar,
        reason -> Text,
        category_id -> Nullable<Uuid>,
        metadata -> Nullable<Jsonb>,
        /// Settlement status, only for `real` transactions.
        status -> Nullable<Varchar>,
        status_note -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Job postings submitted by members.
    job_postings (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Text,
        company -> Varchar,
        category -> Varchar,
        job_type -> Varchar,
        experience_level -> Varchar,
        posted_by -> Uuid,
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// 1:1 approval gate controlling public job visibility.
    job_approvals (job_id) {
        job_id -> Uuid,
        /// `pending`, `approved`, or `rejected`.
        status -> Varchar,
        approver_id -> Nullable<Uuid>,
        decided_at -> Nullable<Timestamptz>,
        rejection_reason -> Nullable<Text>,
    }
}

diesel::table! {
    /// Best-effort in-app notifications.
    notifications (id) {
        id -> Uuid,
        user_id -> Uuid,
        title -> Varchar,
        message -> Text,
        kind -> Varchar,
        priority -> Varchar,
        reference_id -> Nullable<Uuid>,
        reference_kind -> Nullable<Varchar>,
        payload -> Nullable<Jsonb>,
        is_read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Idempotent event registrations, unique per (user, event).
    event_registrations (id) {
        id -> Uuid,
        user_id -> Uuid,
        event_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(job_approvals -> job_postings (job_id));
diesel::joinable!(point_transactions -> point_categories (category_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    point_balances,
    point_categories,
    point_transactions,
    job_postings,
    job_approvals,
    notifications,
    event_registrations,
);
