//! Praise repository for database operations.

use sqlx::{SqliteExecutor, SqlitePool};

use crate::entities::PraiseEntity;
use crate::metrics::QueryTimer;

/// Repository for praise phrases, the praise pool used by message composition.
#[derive(Clone)]
pub struct PraiseRepository {
    pool: SqlitePool,
}

impl PraiseRepository {
    /// Creates a new PraiseRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all praises ordered by id.
    pub async fn find_all(&self) -> Result<Vec<PraiseEntity>, sqlx::Error> {
        Self::find_all_with(&self.pool).await
    }

    /// List all praises using the given executor (pool or transaction).
    pub async fn find_all_with<'e, E>(executor: E) -> Result<Vec<PraiseEntity>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let timer = QueryTimer::new("find_all_praises");
        let result =
            sqlx::query_as::<_, PraiseEntity>("SELECT id, text FROM praises ORDER BY id")
                .fetch_all(executor)
                .await;
        timer.record();
        result
    }

    /// Find a praise by id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<PraiseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_praise_by_id");
        let result =
            sqlx::query_as::<_, PraiseEntity>("SELECT id, text FROM praises WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Create a new praise.
    pub async fn create(&self, text: &str) -> Result<PraiseEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_praise");
        let result = sqlx::query_as::<_, PraiseEntity>(
            "INSERT INTO praises (text) VALUES (?1) RETURNING id, text",
        )
        .bind(text)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a praise. `None` keeps the current value.
    ///
    /// Returns `None` if the praise does not exist.
    pub async fn update(
        &self,
        id: i64,
        text: Option<&str>,
    ) -> Result<Option<PraiseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_praise");
        let result = sqlx::query_as::<_, PraiseEntity>(
            r#"
            UPDATE praises
            SET text = COALESCE(?2, text)
            WHERE id = ?1
            RETURNING id, text
            "#,
        )
        .bind(id)
        .bind(text)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a praise.
    ///
    /// Returns the removed row, or `None` if the praise does not exist.
    pub async fn remove(&self, id: i64) -> Result<Option<PraiseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("remove_praise");
        let result = sqlx::query_as::<_, PraiseEntity>(
            "DELETE FROM praises WHERE id = ?1 RETURNING id, text",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
