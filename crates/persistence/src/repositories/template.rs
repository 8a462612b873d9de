//! Template repository for database operations.

use sqlx::{SqliteExecutor, SqlitePool};

use crate::entities::TemplateEntity;
use crate::metrics::QueryTimer;

/// Repository for template texts, the template pool used by message composition.
#[derive(Clone)]
pub struct TemplateRepository {
    pool: SqlitePool,
}

impl TemplateRepository {
    /// Creates a new TemplateRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all templates ordered by id.
    pub async fn find_all(&self) -> Result<Vec<TemplateEntity>, sqlx::Error> {
        Self::find_all_with(&self.pool).await
    }

    /// List all templates using the given executor (pool or transaction).
    pub async fn find_all_with<'e, E>(executor: E) -> Result<Vec<TemplateEntity>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let timer = QueryTimer::new("find_all_templates");
        let result =
            sqlx::query_as::<_, TemplateEntity>("SELECT id, text FROM templates ORDER BY id")
                .fetch_all(executor)
                .await;
        timer.record();
        result
    }

    /// Find a template by id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<TemplateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_template_by_id");
        let result =
            sqlx::query_as::<_, TemplateEntity>("SELECT id, text FROM templates WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Create a new template.
    pub async fn create(&self, text: &str) -> Result<TemplateEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_template");
        let result = sqlx::query_as::<_, TemplateEntity>(
            "INSERT INTO templates (text) VALUES (?1) RETURNING id, text",
        )
        .bind(text)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a template. `None` keeps the current value.
    ///
    /// Returns `None` if the template does not exist.
    pub async fn update(
        &self,
        id: i64,
        text: Option<&str>,
    ) -> Result<Option<TemplateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_template");
        let result = sqlx::query_as::<_, TemplateEntity>(
            r#"
            UPDATE templates
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

    /// Delete a template.
    ///
    /// Returns the removed row, or `None` if the template does not exist.
    pub async fn remove(&self, id: i64) -> Result<Option<TemplateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("remove_template");
        let result = sqlx::query_as::<_, TemplateEntity>(
            "DELETE FROM templates WHERE id = ?1 RETURNING id, text",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrated_test_pool;

    #[tokio::test]
    async fn test_find_all_within_transaction() {
        let pool = migrated_test_pool().await;
        let repo = TemplateRepository::new(pool.clone());
        let created = repo
            .create("{username} nailed {title}. {praise} {emoji}")
            .await
            .unwrap();

        let mut tx = pool.begin().await.unwrap();
        let all = TemplateRepository::find_all_with(&mut *tx).await.unwrap();
        tx.commit().await.unwrap();

        assert!(all.iter().any(|t| t.id == created.id));
    }

    #[tokio::test]
    async fn test_missing_template() {
        let repo = TemplateRepository::new(migrated_test_pool().await);
        assert!(repo.find_by_id(10_000).await.unwrap().is_none());
        assert!(repo.update(10_000, Some("x")).await.unwrap().is_none());
        assert!(repo.remove(10_000).await.unwrap().is_none());
    }
}
