//! Port for transaction-ledger persistence.
//!
//! The adapter owns the unit of work: `record` must insert the transaction
//! row and mutate the balance row inside one database transaction, with the
//! overdraw guard evaluated under that same transaction so concurrent
//! spends cannot interleave a stale balance check.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::categories::CategoryRollup;
use crate::domain::ledger::{
    PointsBalance, RealTransactionStatus, Transaction, TransactionDraft, TransactionFilter,
};
use crate::domain::pagination::PageRequest;
use crate::domain::UserId;

/// Errors raised by ledger repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerRepositoryError {
    /// Repository connection could not be established.
    #[error("ledger repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("ledger repository query failed: {message}")]
    Query { message: String },

    /// A spend would have driven the balance negative; nothing was written.
    #[error("insufficient points: {available} available, {requested} requested")]
    InsufficientPoints { available: i64, requested: i64 },

    /// The referenced transaction does not exist.
    #[error("transaction {transaction_id} not found")]
    NotFound { transaction_id: Uuid },
}

impl LedgerRepositoryError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    pub fn insufficient_points(available: i64, requested: i64) -> Self {
        Self::InsufficientPoints {
            available,
            requested,
        }
    }

    pub fn not_found(transaction_id: Uuid) -> Self {
        Self::NotFound { transaction_id }
    }
}

/// Port for appending transactions and reading ledger projections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Append a transaction and apply its balance effect atomically.
    ///
    /// Returns the stored transaction and the post-mutation balance
    /// snapshot. Spends exceeding the balance fail with
    /// [`LedgerRepositoryError::InsufficientPoints`] and write nothing.
    async fn record(
        &self,
        draft: &TransactionDraft,
    ) -> Result<(Transaction, PointsBalance), LedgerRepositoryError>;

    /// Current balance row, if the user has interacted with points before.
    async fn balance(&self, user_id: &UserId)
        -> Result<Option<PointsBalance>, LedgerRepositoryError>;

    /// Newest-first transaction page plus the total row count for the filter.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        filter: &TransactionFilter,
        page: &PageRequest,
    ) -> Result<(Vec<Transaction>, i64), LedgerRepositoryError>;

    /// Look up a single transaction.
    async fn find_by_id(
        &self,
        transaction_id: &Uuid,
    ) -> Result<Option<Transaction>, LedgerRepositoryError>;

    /// Transition a real transaction's settlement status, appending a note.
    ///
    /// The caller has already validated ownership, kind, and the
    /// transition; the adapter persists it.
    async fn update_real_status(
        &self,
        transaction_id: &Uuid,
        status: RealTransactionStatus,
        note: Option<String>,
    ) -> Result<Transaction, LedgerRepositoryError>;

    /// Per-category aggregation of the user's transactions.
    async fn category_rollups(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CategoryRollup>, LedgerRepositoryError>;

    /// Net points within one category, scanning that category's history.
    async fn category_net(
        &self,
        user_id: &UserId,
        category_id: &Uuid,
    ) -> Result<i64, LedgerRepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn insufficient_points_formats_both_figures() {
        let err = LedgerRepositoryError::insufficient_points(40, 50);
        let msg = err.to_string();
        assert!(msg.contains("40"));
        assert!(msg.contains("50"));
    }

    #[rstest]
    fn query_error_formats_message() {
        let err = LedgerRepositoryError::query("broken sql");
        assert!(err.to_string().contains("broken sql"));
    }
}
