//! PostgreSQL-backed `LedgerRepository` implementation using Diesel.
//!
//! `record` runs as one database transaction: the balance row is locked
//! with `FOR UPDATE`, the overdraw guard is evaluated under that lock, and
//! the transaction insert plus balance upsert commit together or not at
//! all.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::categories::CategoryRollup;
use crate::domain::ledger::{
    PointsBalance, RealTransactionStatus, Transaction, TransactionDirection, TransactionDraft,
    TransactionFilter, TransactionKind,
};
use crate::domain::pagination::PageRequest;
use crate::domain::ports::{LedgerRepository, LedgerRepositoryError};
use crate::domain::UserId;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewPointBalanceRow, NewPointTransactionRow, PointBalanceRow, PointTransactionRow};
use super::pool::{DbPool, PoolError};
use super::schema::{point_balances, point_transactions};

/// Diesel-backed implementation of the ledger repository port.
#[derive(Clone)]
pub struct DieselLedgerRepository {
    pool: DbPool,
}

impl DieselLedgerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> LedgerRepositoryError {
    map_pool_error(error, LedgerRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> LedgerRepositoryError {
    map_diesel_error(
        error,
        LedgerRepositoryError::query,
        LedgerRepositoryError::connection,
    )
}

/// Error type threaded through the `record` transaction so an overdraw can
/// roll the whole unit of work back.
enum RecordTxError {
    Diesel(diesel::result::Error),
    InsufficientPoints { available: i64, requested: i64 },
}

impl From<diesel::result::Error> for RecordTxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<RecordTxError> for LedgerRepositoryError {
    fn from(error: RecordTxError) -> Self {
        match error {
            RecordTxError::Diesel(inner) => map_diesel(inner),
            RecordTxError::InsufficientPoints {
                available,
                requested,
            } => LedgerRepositoryError::insufficient_points(available, requested),
        }
    }
}

fn balance_from_row(row: PointBalanceRow) -> PointsBalance {
    PointsBalance {
        user_id: UserId::from_uuid(row.user_id),
        total_points: row.total_points,
        total_earned: row.total_earned,
        total_spent: row.total_spent,
    }
}

/// Convert a database row into a validated domain transaction.
fn row_to_transaction(row: PointTransactionRow) -> Result<Transaction, LedgerRepositoryError> {
    let kind = TransactionKind::from_str(&row.kind)
        .map_err(|err| LedgerRepositoryError::query(format!("decode kind: {err}")))?;
    let direction = TransactionDirection::from_str(&row.direction)
        .map_err(|err| LedgerRepositoryError::query(format!("decode direction: {err}")))?;
    let status = row
        .status
        .as_deref()
        .map(RealTransactionStatus::from_str)
        .transpose()
        .map_err(|err| LedgerRepositoryError::query(format!("decode status: {err}")))?;

    Ok(Transaction {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        kind,
        amount: row.amount,
        direction,
        reason: row.reason,
        category_id: row.category_id,
        metadata: row.metadata,
        status,
        status_note: row.status_note,
        created_at: row.created_at,
    })
}

/// Apply the optional history filters to a boxed ledger query.
macro_rules! apply_transaction_filters {
    ($query:expr, $user_id:expr, $filter:expr) => {{
        let mut query = $query.filter(point_transactions::user_id.eq($user_id));
        if let Some(kind) = $filter.kind {
            query = query.filter(point_transactions::kind.eq(kind.as_str()));
        }
        if let Some(direction) = $filter.direction {
            query = query.filter(point_transactions::direction.eq(direction.as_str()));
        }
        if let Some(status) = $filter.status {
            query = query.filter(point_transactions::status.eq(status.as_str()));
        }
        query
    }};
}

#[async_trait]
impl LedgerRepository for DieselLedgerRepository {
    async fn record(
        &self,
        draft: &TransactionDraft,
    ) -> Result<(Transaction, PointsBalance), LedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let user_uuid = *draft.user_id.as_uuid();
        let touches_balance = draft.kind == TransactionKind::Points;

        let (transaction_row, balance) = conn
            .transaction::<(PointTransactionRow, PointsBalance), RecordTxError, _>(|conn| {
                async move {
                    // Lock the balance row so concurrent spends serialise on it.
                    let existing: Option<PointBalanceRow> = point_balances::table
                        .filter(point_balances::user_id.eq(user_uuid))
                        .for_update()
                        .select(PointBalanceRow::as_select())
                        .first::<PointBalanceRow>(conn)
                        .await
                        .optional()?;

                    let mut balance = existing
                        .map(balance_from_row)
                        .unwrap_or_else(|| PointsBalance::zero(draft.user_id));

                    // Real-currency rows are settled elsewhere; only point
                    // movements touch the points balance.
                    if touches_balance {
                        balance.apply(draft.direction, draft.amount).map_err(|err| {
                            RecordTxError::InsufficientPoints {
                                available: err.available,
                                requested: err.requested,
                            }
                        })?;

                        let balance_row = NewPointBalanceRow {
                            user_id: user_uuid,
                            total_points: balance.total_points,
                            total_earned: balance.total_earned,
                            total_spent: balance.total_spent,
                            updated_at: draft.created_at,
                        };
                        diesel::insert_into(point_balances::table)
                            .values(&balance_row)
                            .on_conflict(point_balances::user_id)
                            .do_update()
                            .set((
                                point_balances::total_points.eq(balance.total_points),
                                point_balances::total_earned.eq(balance.total_earned),
                                point_balances::total_spent.eq(balance.total_spent),
                                point_balances::updated_at.eq(draft.created_at),
                            ))
                            .execute(conn)
                            .await?;
                    }

                    let status = draft.initial_status();
                    let new_row = NewPointTransactionRow {
                        id: Uuid::new_v4(),
                        user_id: user_uuid,
                        kind: draft.kind.as_str(),
                        amount: draft.amount.value(),
                        direction: draft.direction.as_str(),
                        reason: draft.reason.as_str(),
                        category_id: draft.category_id,
                        metadata: draft.metadata.as_ref(),
                        status: status.map(RealTransactionStatus::as_str),
                        created_at: draft.created_at,
                    };
                    let inserted: PointTransactionRow =
                        diesel::insert_into(point_transactions::table)
                            .values(&new_row)
                            .returning(PointTransactionRow::as_returning())
                            .get_result(conn)
                            .await?;

                    Ok((inserted, balance))
                }
                .scope_boxed()
            })
            .await?;

        let transaction = row_to_transaction(transaction_row)?;
        Ok((transaction, balance))
    }

    async fn balance(
        &self,
        user_id: &UserId,
    ) -> Result<Option<PointsBalance>, LedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = point_balances::table
            .filter(point_balances::user_id.eq(user_id.as_uuid()))
            .select(PointBalanceRow::as_select())
            .first::<PointBalanceRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        Ok(row.map(balance_from_row))
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        filter: &TransactionFilter,
        page: &PageRequest,
    ) -> Result<(Vec<Transaction>, i64), LedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let user_uuid = *user_id.as_uuid();

        let total: i64 = apply_transaction_filters!(
            point_transactions::table.count().into_boxed(),
            user_uuid,
            filter
        )
        .get_result(&mut conn)
        .await
        .map_err(map_diesel)?;

        let rows: Vec<PointTransactionRow> = apply_transaction_filters!(
            point_transactions::table
                .select(PointTransactionRow::as_select())
                .into_boxed(),
            user_uuid,
            filter
        )
        .order((
            point_transactions::created_at.desc(),
            point_transactions::id.desc(),
        ))
        .limit(i64::from(page.limit()))
        .offset(page.offset())
        .load(&mut conn)
        .await
        .map_err(map_diesel)?;

        let transactions = rows
            .into_iter()
            .map(row_to_transaction)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((transactions, total))
    }

    async fn find_by_id(
        &self,
        transaction_id: &Uuid,
    ) -> Result<Option<Transaction>, LedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = point_transactions::table
            .filter(point_transactions::id.eq(transaction_id))
            .select(PointTransactionRow::as_select())
            .first::<PointTransactionRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_transaction).transpose()
    }

    async fn update_real_status(
        &self,
        transaction_id: &Uuid,
        status: RealTransactionStatus,
        note: Option<String>,
    ) -> Result<Transaction, LedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<PointTransactionRow> = diesel::update(
            point_transactions::table.filter(point_transactions::id.eq(transaction_id)),
        )
        .set((
            point_transactions::status.eq(status.as_str()),
            point_transactions::status_note.eq(note),
        ))
        .returning(PointTransactionRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel)?;

        let row = row.ok_or_else(|| LedgerRepositoryError::not_found(*transaction_id))?;
        row_to_transaction(row)
    }

    async fn category_rollups(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CategoryRollup>, LedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        // Category figures are derived by scanning the user's categorised
        // history; nothing is materialised.
        let rows: Vec<PointTransactionRow> = point_transactions::table
            .filter(
                point_transactions::user_id
                    .eq(user_id.as_uuid())
                    .and(point_transactions::category_id.is_not_null()),
            )
            .select(PointTransactionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        let mut rollups: HashMap<Uuid, CategoryRollup> = HashMap::new();
        for row in rows {
            let Some(category_id) = row.category_id else {
                continue;
            };
            let direction = TransactionDirection::from_str(&row.direction)
                .map_err(|err| LedgerRepositoryError::query(format!("decode direction: {err}")))?;
            let entry = rollups
                .entry(category_id)
                .or_insert_with(|| CategoryRollup::empty(category_id));
            match direction {
                TransactionDirection::Earn => entry.earned += row.amount,
                TransactionDirection::Spend => entry.spent += row.amount,
            }
            entry.transaction_count += 1;
            entry.last_activity = match entry.last_activity {
                Some(at) if at >= row.created_at => Some(at),
                _ => Some(row.created_at),
            };
        }

        Ok(rollups.into_values().collect())
    }

    async fn category_net(
        &self,
        user_id: &UserId,
        category_id: &Uuid,
    ) -> Result<i64, LedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<PointTransactionRow> = point_transactions::table
            .filter(
                point_transactions::user_id
                    .eq(user_id.as_uuid())
                    .and(point_transactions::category_id.eq(category_id)),
            )
            .select(PointTransactionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        let mut net = 0;
        for row in rows {
            let direction = TransactionDirection::from_str(&row.direction)
                .map_err(|err| LedgerRepositoryError::query(format!("decode direction: {err}")))?;
            match direction {
                TransactionDirection::Earn => net += row.amount,
                TransactionDirection::Spend => net -= row.amount,
            }
        }
        Ok(net)
    }
}
