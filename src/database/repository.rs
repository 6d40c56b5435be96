use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseManager;
use crate::database::models::Resource;
use crate::database::store::{generate_id, PageSlice, ResourceStore, StoreError};
use crate::types::{CreateInput, Page, UpdateInput};

const UNIQUE_VIOLATION: &str = "23505";

/// Postgres-backed store for one resource kind.
///
/// Name uniqueness comes from the table's UNIQUE constraint; creation order
/// comes from the `seq` identity column.
pub struct Repository<T> {
    table_name: String,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: Resource> Repository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            table_name: DatabaseManager::quote_identifier(T::TABLE),
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    fn map_write_error(err: sqlx::Error, name: &str) -> StoreError {
        match &err {
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                StoreError::duplicate_name::<T>(name)
            }
            _ => StoreError::Sqlx(err),
        }
    }
}

#[async_trait]
impl<T: Resource> ResourceStore<T> for Repository<T> {
    async fn insert(&self, input: CreateInput) -> Result<T, StoreError> {
        let sql = format!(
            "INSERT INTO {} (id, name, description) VALUES ($1, $2, $3) RETURNING id, name, description",
            self.table_name
        );
        sqlx::query_as::<_, T>(&sql)
            .bind(generate_id())
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::map_write_error(e, &input.name))
    }

    async fn find(&self, id: &str) -> Result<T, StoreError> {
        let sql = format!(
            "SELECT id, name, description FROM {} WHERE id = $1",
            self.table_name
        );
        sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found::<T>(id))
    }

    async fn patch(&self, id: &str, input: UpdateInput) -> Result<T, StoreError> {
        let mut tx = self.pool.begin().await?;

        let select = format!(
            "SELECT id, name, description FROM {} WHERE id = $1 FOR UPDATE",
            self.table_name
        );
        let current = sqlx::query_as::<_, T>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| StoreError::not_found::<T>(id))?;

        let (name, description) = input.apply(current.name(), current.description());

        let update = format!(
            "UPDATE {} SET name = $2, description = $3 WHERE id = $1 RETURNING id, name, description",
            self.table_name
        );
        let updated = sqlx::query_as::<_, T>(&update)
            .bind(id)
            .bind(&name)
            .bind(&description)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| Self::map_write_error(e, &name))?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table_name);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found::<T>(id));
        }
        Ok(())
    }

    async fn page(&self, page: Page) -> Result<PageSlice<T>, StoreError> {
        let sql = format!(
            "SELECT id, name, description FROM {} ORDER BY seq ASC LIMIT $1 OFFSET $2",
            self.table_name
        );
        let items = sqlx::query_as::<_, T>(&sql)
            .bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
            .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM {}", self.table_name);
        let (total,): (i64,) = sqlx::query_as(&count_sql).fetch_one(&self.pool).await?;

        Ok(PageSlice {
            items,
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
