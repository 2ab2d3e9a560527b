//! Ledger domain services.
//!
//! Implements the points command and query driving ports over the ledger
//! repository. Validation runs here; atomicity of the two-step write
//! (transaction insert + balance mutation) is the repository's contract.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use uuid::Uuid;

use crate::domain::ledger::{
    PointsAmount, PointsBalance, RealTransactionStatus, Reason, Transaction, TransactionDirection,
    TransactionDraft, TransactionFilter, TransactionKind,
};
use crate::domain::pagination::{PageInfo, PageRequest};
use crate::domain::ports::{
    AdminAward, LedgerRepository, LedgerRepositoryError, NewTransaction, PointsCommand,
    PointsQuery, TransactionPage, TransactionReceipt,
};
use crate::domain::{CallerIdentity, Error, UserId};

pub(crate) fn map_ledger_repository_error(error: LedgerRepositoryError) -> Error {
    match error {
        LedgerRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("ledger repository unavailable: {message}"))
        }
        LedgerRepositoryError::Query { message } => {
            Error::internal(format!("ledger repository error: {message}"))
        }
        LedgerRepositoryError::InsufficientPoints {
            available,
            requested,
        } => Error::invalid_request("insufficient points").with_details(json!({
            "code": "insufficient_points",
            "available": available,
            "requested": requested,
        })),
        LedgerRepositoryError::NotFound { transaction_id } => {
            Error::not_found(format!("transaction {transaction_id} not found"))
        }
    }
}

pub(crate) fn validate_draft(
    user_id: UserId,
    kind: TransactionKind,
    amount: i64,
    direction: TransactionDirection,
    reason: &str,
    category_id: Option<Uuid>,
    metadata: Option<serde_json::Value>,
    created_at: chrono::DateTime<chrono::Utc>,
) -> Result<TransactionDraft, Error> {
    let amount = PointsAmount::new(amount).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({ "field": "amount" }))
    })?;
    let reason = Reason::new(reason).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({ "field": "reason" }))
    })?;
    Ok(TransactionDraft {
        user_id,
        kind,
        amount,
        direction,
        reason,
        category_id,
        metadata,
        created_at,
    })
}

/// Ledger service implementing the command driving port.
#[derive(Clone)]
pub struct LedgerCommandService<R> {
    ledger_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> LedgerCommandService<R> {
    /// Create a new command service with the ledger repository.
    pub fn new(ledger_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { ledger_repo, clock }
    }
}

#[async_trait]
impl<R> PointsCommand for LedgerCommandService<R>
where
    R: LedgerRepository,
{
    async fn create_transaction(
        &self,
        caller: &CallerIdentity,
        input: NewTransaction,
    ) -> Result<TransactionReceipt, Error> {
        let draft = validate_draft(
            *caller.user_id(),
            input.kind,
            input.amount,
            input.direction,
            &input.reason,
            input.category_id,
            input.metadata,
            self.clock.utc(),
        )?;

        let (transaction, balance) = self
            .ledger_repo
            .record(&draft)
            .await
            .map_err(map_ledger_repository_error)?;

        Ok(TransactionReceipt {
            transaction,
            balance,
        })
    }

    async fn admin_award(
        &self,
        caller: &CallerIdentity,
        input: AdminAward,
    ) -> Result<TransactionReceipt, Error> {
        caller.require_admin()?;

        let draft = validate_draft(
            input.user_id,
            TransactionKind::Points,
            input.amount,
            TransactionDirection::Earn,
            &input.reason,
            input.category_id,
            None,
            self.clock.utc(),
        )?;

        let (transaction, balance) = self
            .ledger_repo
            .record(&draft)
            .await
            .map_err(map_ledger_repository_error)?;

        Ok(TransactionReceipt {
            transaction,
            balance,
        })
    }

    async fn update_real_transaction_status(
        &self,
        caller: &CallerIdentity,
        transaction_id: Uuid,
        new_status: RealTransactionStatus,
        note: Option<String>,
    ) -> Result<Transaction, Error> {
        let existing = self
            .ledger_repo
            .find_by_id(&transaction_id)
            .await
            .map_err(map_ledger_repository_error)?
            .ok_or_else(|| Error::not_found(format!("transaction {transaction_id} not found")))?;

        if existing.user_id != *caller.user_id() {
            return Err(Error::forbidden(
                "only the transaction owner may update its status",
            ));
        }
        if existing.kind != TransactionKind::Real {
            return Err(Error::invalid_request(
                "only real transactions carry a settlement status",
            ));
        }
        let current = existing.status.unwrap_or(RealTransactionStatus::Pending);
        if !current.can_transition_to(new_status) {
            return Err(Error::conflict(format!(
                "transaction {transaction_id} is already {current}"
            )));
        }

        self.ledger_repo
            .update_real_status(&transaction_id, new_status, note)
            .await
            .map_err(map_ledger_repository_error)
    }
}

/// Ledger service implementing the query driving port.
#[derive(Clone)]
pub struct LedgerQueryService<R> {
    ledger_repo: Arc<R>,
}

impl<R> LedgerQueryService<R> {
    /// Create a new query service with the ledger repository.
    pub fn new(ledger_repo: Arc<R>) -> Self {
        Self { ledger_repo }
    }
}

#[async_trait]
impl<R> PointsQuery for LedgerQueryService<R>
where
    R: LedgerRepository,
{
    async fn balance(&self, caller: &CallerIdentity) -> Result<PointsBalance, Error> {
        let balance = self
            .ledger_repo
            .balance(caller.user_id())
            .await
            .map_err(map_ledger_repository_error)?;
        Ok(balance.unwrap_or_else(|| PointsBalance::zero(*caller.user_id())))
    }

    async fn transactions(
        &self,
        caller: &CallerIdentity,
        filter: TransactionFilter,
        page: PageRequest,
    ) -> Result<TransactionPage, Error> {
        let (transactions, total) = self
            .ledger_repo
            .list_for_user(caller.user_id(), &filter, &page)
            .await
            .map_err(map_ledger_repository_error)?;

        Ok(TransactionPage {
            transactions,
            page: PageInfo::new(total, &page),
        })
    }
}

#[cfg(test)]
#[path = "ledger_service_tests.rs"]
mod tests;
