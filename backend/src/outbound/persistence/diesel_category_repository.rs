//! PostgreSQL-backed `CategoryRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::categories::{Category, CategoryName};
use crate::domain::ports::{CategoryRepository, CategoryRepositoryError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::PointCategoryRow;
use super::pool::{DbPool, PoolError};
use super::schema::point_categories;

/// Diesel-backed implementation of the category repository port.
#[derive(Clone)]
pub struct DieselCategoryRepository {
    pool: DbPool,
}

impl DieselCategoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> CategoryRepositoryError {
    map_pool_error(error, CategoryRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> CategoryRepositoryError {
    map_diesel_error(
        error,
        CategoryRepositoryError::query,
        CategoryRepositoryError::connection,
    )
}

fn row_to_category(row: PointCategoryRow) -> Category {
    Category {
        id: row.id,
        name: row.name,
        display_name: row.display_name,
    }
}

#[async_trait]
impl CategoryRepository for DieselCategoryRepository {
    async fn find_by_name(
        &self,
        name: &CategoryName,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = point_categories::table
            .filter(point_categories::name.eq(name.as_str()))
            .select(PointCategoryRow::as_select())
            .first::<PointCategoryRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        Ok(row.map(row_to_category))
    }

    async fn list(&self) -> Result<Vec<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<PointCategoryRow> = point_categories::table
            .order(point_categories::name.asc())
            .select(PointCategoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(rows.into_iter().map(row_to_category).collect())
    }
}
