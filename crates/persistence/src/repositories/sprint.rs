//! Sprint repository for database operations.

use sqlx::{SqliteExecutor, SqlitePool};

use crate::entities::SprintEntity;
use crate::metrics::QueryTimer;

/// Repository for sprint-related database operations.
#[derive(Clone)]
pub struct SprintRepository {
    pool: SqlitePool,
}

impl SprintRepository {
    /// Creates a new SprintRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all sprints ordered by id.
    pub async fn find_all(&self) -> Result<Vec<SprintEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_all_sprints");
        let result =
            sqlx::query_as::<_, SprintEntity>("SELECT id, code, title FROM sprints ORDER BY id")
                .fetch_all(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Find a sprint by id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<SprintEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_sprint_by_id");
        let result =
            sqlx::query_as::<_, SprintEntity>("SELECT id, code, title FROM sprints WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Find a sprint by its code.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<SprintEntity>, sqlx::Error> {
        Self::find_by_code_with(&self.pool, code).await
    }

    /// Find a sprint by its code using the given executor (pool or transaction).
    pub async fn find_by_code_with<'e, E>(
        executor: E,
        code: &str,
    ) -> Result<Option<SprintEntity>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let timer = QueryTimer::new("find_sprint_by_code");
        let result = sqlx::query_as::<_, SprintEntity>(
            "SELECT id, code, title FROM sprints WHERE code = ?1",
        )
        .bind(code)
        .fetch_optional(executor)
        .await;
        timer.record();
        result
    }

    /// Create a new sprint.
    ///
    /// Fails with a unique violation if the code or title is taken.
    pub async fn create(&self, code: &str, title: &str) -> Result<SprintEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_sprint");
        let result = sqlx::query_as::<_, SprintEntity>(
            r#"
            INSERT INTO sprints (code, title)
            VALUES (?1, ?2)
            RETURNING id, code, title
            "#,
        )
        .bind(code)
        .bind(title)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a sprint. Fields left as `None` keep their current value.
    ///
    /// Returns `None` if the sprint does not exist.
    pub async fn update(
        &self,
        id: i64,
        code: Option<&str>,
        title: Option<&str>,
    ) -> Result<Option<SprintEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_sprint");
        let result = sqlx::query_as::<_, SprintEntity>(
            r#"
            UPDATE sprints
            SET code = COALESCE(?2, code),
                title = COALESCE(?3, title)
            WHERE id = ?1
            RETURNING id, code, title
            "#,
        )
        .bind(id)
        .bind(code)
        .bind(title)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a sprint and, through the foreign key cascade, its messages.
    ///
    /// Returns the removed row, or `None` if the sprint does not exist.
    pub async fn remove(&self, id: i64) -> Result<Option<SprintEntity>, sqlx::Error> {
        let timer = QueryTimer::new("remove_sprint");
        let result = sqlx::query_as::<_, SprintEntity>(
            "DELETE FROM sprints WHERE id = ?1 RETURNING id, code, title",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
