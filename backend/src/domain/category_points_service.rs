//! Category-scoped points accounting services.
//!
//! Categories never hold their own balance: the spend check derives the
//! category net from the user's transaction history for that category at
//! request time, then delegates to the ledger's spend path (which still
//! enforces the global guard atomically).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use uuid::Uuid;

use crate::domain::categories::{Category, CategoryName, CategoryPointsSummary, CategoryRollup};
use crate::domain::ledger::{TransactionDirection, TransactionKind};
use crate::domain::ledger_service::{map_ledger_repository_error, validate_draft};
use crate::domain::ports::{
    CategoryPointsChange, CategoryPointsCommand, CategoryPointsQuery, CategoryRepository,
    CategoryRepositoryError, LedgerRepository, TransactionReceipt,
};
use crate::domain::{CallerIdentity, Error};

fn map_category_repository_error(error: CategoryRepositoryError) -> Error {
    match error {
        CategoryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("category repository unavailable: {message}"))
        }
        CategoryRepositoryError::Query { message } => {
            Error::internal(format!("category repository error: {message}"))
        }
    }
}

fn parse_category_name(raw: &str) -> Result<CategoryName, Error> {
    CategoryName::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({ "field": "category" }))
    })
}

/// Category points service implementing command and query driving ports.
#[derive(Clone)]
pub struct CategoryPointsService<L, C> {
    ledger_repo: Arc<L>,
    category_repo: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<L, C> CategoryPointsService<L, C>
where
    L: LedgerRepository,
    C: CategoryRepository,
{
    /// Create a new service over the ledger and category repositories.
    pub fn new(ledger_repo: Arc<L>, category_repo: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            ledger_repo,
            category_repo,
            clock,
        }
    }

    async fn resolve_category(&self, raw_name: &str) -> Result<Category, Error> {
        let name = parse_category_name(raw_name)?;
        self.category_repo
            .find_by_name(&name)
            .await
            .map_err(map_category_repository_error)?
            .ok_or_else(|| Error::not_found(format!("category {name} not found")))
    }

    async fn record_change(
        &self,
        caller: &CallerIdentity,
        category: &Category,
        direction: TransactionDirection,
        input: CategoryPointsChange,
    ) -> Result<TransactionReceipt, Error> {
        let draft = validate_draft(
            *caller.user_id(),
            TransactionKind::Points,
            input.amount,
            direction,
            &input.reason,
            Some(category.id),
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
}

#[async_trait]
impl<L, C> CategoryPointsCommand for CategoryPointsService<L, C>
where
    L: LedgerRepository,
    C: CategoryRepository,
{
    async fn award(
        &self,
        caller: &CallerIdentity,
        category_name: &str,
        input: CategoryPointsChange,
    ) -> Result<TransactionReceipt, Error> {
        let category = self.resolve_category(category_name).await?;
        self.record_change(caller, &category, TransactionDirection::Earn, input)
            .await
    }

    async fn spend(
        &self,
        caller: &CallerIdentity,
        category_name: &str,
        input: CategoryPointsChange,
    ) -> Result<TransactionReceipt, Error> {
        let category = self.resolve_category(category_name).await?;

        // Category balances are derived, not stored: this check scans the
        // category's transaction history at request time.
        let available = self
            .ledger_repo
            .category_net(caller.user_id(), &category.id)
            .await
            .map_err(map_ledger_repository_error)?;
        if input.amount > available {
            return Err(
                Error::invalid_request("insufficient category points").with_details(json!({
                    "code": "insufficient_category_points",
                    "category": category.name,
                    "available": available,
                    "requested": input.amount,
                })),
            );
        }

        self.record_change(caller, &category, TransactionDirection::Spend, input)
            .await
    }
}

#[async_trait]
impl<L, C> CategoryPointsQuery for CategoryPointsService<L, C>
where
    L: LedgerRepository,
    C: CategoryRepository,
{
    async fn points_by_category(
        &self,
        caller: &CallerIdentity,
    ) -> Result<Vec<CategoryPointsSummary>, Error> {
        let rollups = self
            .ledger_repo
            .category_rollups(caller.user_id())
            .await
            .map_err(map_ledger_repository_error)?;
        let categories = self
            .category_repo
            .list()
            .await
            .map_err(map_category_repository_error)?;
        let by_id: HashMap<Uuid, Category> =
            categories.into_iter().map(|c| (c.id, c)).collect();

        Ok(rollups
            .iter()
            .filter_map(|rollup| {
                by_id
                    .get(&rollup.category_id)
                    .map(|category| CategoryPointsSummary::from_rollup(category.clone(), rollup))
            })
            .collect())
    }

    async fn all_categories_with_points(
        &self,
        caller: &CallerIdentity,
    ) -> Result<Vec<CategoryPointsSummary>, Error> {
        let rollups = self
            .ledger_repo
            .category_rollups(caller.user_id())
            .await
            .map_err(map_ledger_repository_error)?;
        let by_id: HashMap<Uuid, CategoryRollup> = rollups
            .into_iter()
            .map(|rollup| (rollup.category_id, rollup))
            .collect();

        let categories = self
            .category_repo
            .list()
            .await
            .map_err(map_category_repository_error)?;

        // Quiet categories still appear, with zero values.
        Ok(categories
            .into_iter()
            .map(|category| {
                let rollup = by_id
                    .get(&category.id)
                    .copied()
                    .unwrap_or_else(|| CategoryRollup::empty(category.id));
                CategoryPointsSummary::from_rollup(category, &rollup)
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "category_points_service_tests.rs"]
mod tests;
