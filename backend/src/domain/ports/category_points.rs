//! Driving ports for category-scoped points accounting.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::categories::CategoryPointsSummary;
use crate::domain::ports::points::TransactionReceipt;
use crate::domain::{CallerIdentity, Error};

/// Unvalidated input for a category-scoped earn or spend.
#[derive(Debug, Clone)]
pub struct CategoryPointsChange {
    pub amount: i64,
    pub reason: String,
    pub metadata: Option<Value>,
}

/// Use-case port for category-scoped ledger mutations.
#[async_trait]
pub trait CategoryPointsCommand: Send + Sync {
    /// Earn points within a category, resolved by name.
    async fn award(
        &self,
        caller: &CallerIdentity,
        category_name: &str,
        input: CategoryPointsChange,
    ) -> Result<TransactionReceipt, Error>;

    /// Spend points within a category; the category-scoped net balance must
    /// cover the amount before the global spend path runs.
    async fn spend(
        &self,
        caller: &CallerIdentity,
        category_name: &str,
        input: CategoryPointsChange,
    ) -> Result<TransactionReceipt, Error>;
}

/// Use-case port for category rollup reads.
#[async_trait]
pub trait CategoryPointsQuery: Send + Sync {
    /// Rollups for categories the caller has activity in.
    async fn points_by_category(
        &self,
        caller: &CallerIdentity,
    ) -> Result<Vec<CategoryPointsSummary>, Error>;

    /// Every known category, zero-activity ones included with zero values.
    async fn all_categories_with_points(
        &self,
        caller: &CallerIdentity,
    ) -> Result<Vec<CategoryPointsSummary>, Error>;
}

/// Fixture command used until persistence is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCategoryPointsCommand;

#[async_trait]
impl CategoryPointsCommand for FixtureCategoryPointsCommand {
    async fn award(
        &self,
        _caller: &CallerIdentity,
        category_name: &str,
        _input: CategoryPointsChange,
    ) -> Result<TransactionReceipt, Error> {
        Err(Error::not_found(format!(
            "category {category_name} not found"
        )))
    }

    async fn spend(
        &self,
        _caller: &CallerIdentity,
        category_name: &str,
        _input: CategoryPointsChange,
    ) -> Result<TransactionReceipt, Error> {
        Err(Error::not_found(format!(
            "category {category_name} not found"
        )))
    }
}

/// Fixture query used until persistence is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCategoryPointsQuery;

#[async_trait]
impl CategoryPointsQuery for FixtureCategoryPointsQuery {
    async fn points_by_category(
        &self,
        _caller: &CallerIdentity,
    ) -> Result<Vec<CategoryPointsSummary>, Error> {
        Ok(Vec::new())
    }

    async fn all_categories_with_points(
        &self,
        _caller: &CallerIdentity,
    ) -> Result<Vec<CategoryPointsSummary>, Error> {
        Ok(Vec::new())
    }
}
