//! Emoji repository for database operations.

use sqlx::{SqliteExecutor, SqlitePool};

use crate::entities::EmojiEntity;
use crate::metrics::QueryTimer;

/// Repository for emoji glyphs, the emoji pool used by message composition.
#[derive(Clone)]
pub struct EmojiRepository {
    pool: SqlitePool,
}

impl EmojiRepository {
    /// Creates a new EmojiRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all emojis ordered by id.
    pub async fn find_all(&self) -> Result<Vec<EmojiEntity>, sqlx::Error> {
        Self::find_all_with(&self.pool).await
    }

    /// List all emojis using the given executor (pool or transaction).
    pub async fn find_all_with<'e, E>(executor: E) -> Result<Vec<EmojiEntity>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let timer = QueryTimer::new("find_all_emojis");
        let result =
            sqlx::query_as::<_, EmojiEntity>("SELECT id, glyph FROM emojis ORDER BY id")
                .fetch_all(executor)
                .await;
        timer.record();
        result
    }

    /// Find a emoji by id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<EmojiEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_emoji_by_id");
        let result =
            sqlx::query_as::<_, EmojiEntity>("SELECT id, glyph FROM emojis WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Create a new emoji.
    pub async fn create(&self, glyph: &str) -> Result<EmojiEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_emoji");
        let result = sqlx::query_as::<_, EmojiEntity>(
            "INSERT INTO emojis (glyph) VALUES (?1) RETURNING id, glyph",
        )
        .bind(glyph)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a emoji. `None` keeps the current value.
    ///
    /// Returns `None` if the emoji does not exist.
    pub async fn update(
        &self,
        id: i64,
        glyph: Option<&str>,
    ) -> Result<Option<EmojiEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_emoji");
        let result = sqlx::query_as::<_, EmojiEntity>(
            r#"
            UPDATE emojis
            SET glyph = COALESCE(?2, glyph)
            WHERE id = ?1
            RETURNING id, glyph
            "#,
        )
        .bind(id)
        .bind(glyph)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a emoji.
    ///
    /// Returns the removed row, or `None` if the emoji does not exist.
    pub async fn remove(&self, id: i64) -> Result<Option<EmojiEntity>, sqlx::Error> {
        let timer = QueryTimer::new("remove_emoji");
        let result = sqlx::query_as::<_, EmojiEntity>(
            "DELETE FROM emojis WHERE id = ?1 RETURNING id, glyph",
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
    async fn test_emoji_crud() {
        let repo = EmojiRepository::new(migrated_test_pool().await);

        let created = repo.create("🥳").await.unwrap();
        assert_eq!(created.glyph, "🥳");

        let found = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.glyph, "🥳");

        let updated = repo.update(created.id, Some("💯")).await.unwrap().unwrap();
        assert_eq!(updated.glyph, "💯");

        let removed = repo.remove(created.id).await.unwrap().unwrap();
        assert_eq!(removed.id, created.id);
        assert!(repo.find_by_id(created.id).await.unwrap().is_none());
    }
}
