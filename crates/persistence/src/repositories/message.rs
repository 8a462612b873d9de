//! Message repository for database operations.

use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};

use crate::entities::{MessageEntity, MessageViewEntity};
use crate::metrics::QueryTimer;

const VIEW_SELECT: &str = r#"
    SELECT m.id, m.user_id, m.sprint_id,
           u.username, s.code AS sprint_code, s.title AS sprint_title,
           m.rendered_text, m.created_on
    FROM messages m
    INNER JOIN users u ON u.id = m.user_id
    INNER JOIN sprints s ON s.id = m.sprint_id
"#;

/// Repository for message-related database operations.
#[derive(Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    /// Creates a new MessageRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all stored message rows ordered by id.
    pub async fn find_all(&self) -> Result<Vec<MessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_all_messages");
        let result = sqlx::query_as::<_, MessageEntity>(
            r#"
            SELECT id, user_id, sprint_id, rendered_text, created_on
            FROM messages
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all messages joined with their user and sprint.
    pub async fn find_all_detailed(&self) -> Result<Vec<MessageViewEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_all_messages_detailed");
        let sql = format!("{VIEW_SELECT} ORDER BY m.id");
        let result = sqlx::query_as::<_, MessageViewEntity>(&sql)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// List messages for the user with the given username.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Vec<MessageViewEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_messages_by_username");
        let sql = format!("{VIEW_SELECT} WHERE u.username = ?1 ORDER BY m.id");
        let result = sqlx::query_as::<_, MessageViewEntity>(&sql)
            .bind(username)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// List messages for the sprint with the given code.
    pub async fn find_by_sprint_code(
        &self,
        sprint_code: &str,
    ) -> Result<Vec<MessageViewEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_messages_by_sprint_code");
        let sql = format!("{VIEW_SELECT} WHERE s.code = ?1 ORDER BY m.id");
        let result = sqlx::query_as::<_, MessageViewEntity>(&sql)
            .bind(sprint_code)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Find a message by id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<MessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_message_by_id");
        let result = sqlx::query_as::<_, MessageEntity>(
            r#"
            SELECT id, user_id, sprint_id, rendered_text, created_on
            FROM messages
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Check whether a message already exists for a user and sprint.
    pub async fn exists_for_with<'e, E>(
        executor: E,
        user_id: i64,
        sprint_id: i64,
    ) -> Result<bool, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let timer = QueryTimer::new("message_exists_for_user_sprint");
        let result: Result<(i64,), sqlx::Error> = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM messages WHERE user_id = ?1 AND sprint_id = ?2
            )
            "#,
        )
        .bind(user_id)
        .bind(sprint_id)
        .fetch_one(executor)
        .await;
        timer.record();
        Ok(result?.0 != 0)
    }

    /// Create a new message.
    ///
    /// Fails with a foreign key violation if the user or sprint does not exist.
    pub async fn create(
        &self,
        user_id: i64,
        sprint_id: i64,
        rendered_text: &str,
    ) -> Result<MessageEntity, sqlx::Error> {
        Self::create_with(&self.pool, user_id, sprint_id, rendered_text).await
    }

    /// Create a new message using the given executor (pool or transaction).
    pub async fn create_with<'e, E>(
        executor: E,
        user_id: i64,
        sprint_id: i64,
        rendered_text: &str,
    ) -> Result<MessageEntity, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let timer = QueryTimer::new("create_message");
        let result = sqlx::query_as::<_, MessageEntity>(
            r#"
            INSERT INTO messages (user_id, sprint_id, rendered_text, created_on)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, user_id, sprint_id, rendered_text, created_on
            "#,
        )
        .bind(user_id)
        .bind(sprint_id)
        .bind(rendered_text)
        .bind(Utc::now())
        .fetch_one(executor)
        .await;
        timer.record();
        result
    }

    /// Update the text of a message. `id`, `user_id`, `sprint_id` and
    /// `created_on` never change.
    ///
    /// Returns `None` if the message does not exist.
    pub async fn update(
        &self,
        id: i64,
        rendered_text: Option<&str>,
    ) -> Result<Option<MessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_message");
        let result = sqlx::query_as::<_, MessageEntity>(
            r#"
            UPDATE messages
            SET rendered_text = COALESCE(?2, rendered_text)
            WHERE id = ?1
            RETURNING id, user_id, sprint_id, rendered_text, created_on
            "#,
        )
        .bind(id)
        .bind(rendered_text)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a message.
    ///
    /// Returns the removed row, or `None` if the message does not exist.
    pub async fn remove(&self, id: i64) -> Result<Option<MessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("remove_message");
        let result = sqlx::query_as::<_, MessageEntity>(
            r#"
            DELETE FROM messages
            WHERE id = ?1
            RETURNING id, user_id, sprint_id, rendered_text, created_on
            "#,
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
    use crate::repositories::{SprintRepository, UserRepository};

    struct Fixture {
        pool: SqlitePool,
        user_id: i64,
        sprint_id: i64,
    }

    async fn fixture() -> Fixture {
        let pool = migrated_test_pool().await;
        let user = UserRepository::new(pool.clone())
            .create("vjuodz")
            .await
            .unwrap();
        let sprint = SprintRepository::new(pool.clone())
            .create("WD-3.2.5", "REST APIs & Test Driven Development")
            .await
            .unwrap();
        Fixture {
            pool,
            user_id: user.id,
            sprint_id: sprint.id,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_message() {
        let fx = fixture().await;
        let repo = MessageRepository::new(fx.pool.clone());

        let created = repo
            .create(fx.user_id, fx.sprint_id, "Well done vjuodz")
            .await
            .unwrap();
        let found = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.rendered_text, "Well done vjuodz");
        assert_eq!(found.created_on, created.created_on);
    }

    #[tokio::test]
    async fn test_create_with_unknown_user_is_foreign_key_violation() {
        let fx = fixture().await;
        let repo = MessageRepository::new(fx.pool.clone());

        let err = repo.create(999, fx.sprint_id, "orphan").await.unwrap_err();
        match err {
            sqlx::Error::Database(db_err) => assert!(db_err.is_foreign_key_violation()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exists_for() {
        let fx = fixture().await;
        let repo = MessageRepository::new(fx.pool.clone());

        assert!(!MessageRepository::exists_for_with(&fx.pool, fx.user_id, fx.sprint_id)
            .await
            .unwrap());
        repo.create(fx.user_id, fx.sprint_id, "hi").await.unwrap();
        assert!(MessageRepository::exists_for_with(&fx.pool, fx.user_id, fx.sprint_id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_detailed_queries_join_user_and_sprint() {
        let fx = fixture().await;
        let repo = MessageRepository::new(fx.pool.clone());
        repo.create(fx.user_id, fx.sprint_id, "hi").await.unwrap();

        let all = repo.find_all_detailed().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].username, "vjuodz");
        assert_eq!(all[0].sprint_code, "WD-3.2.5");
        assert_eq!(all[0].sprint_title, "REST APIs & Test Driven Development");

        assert_eq!(repo.find_by_username("vjuodz").await.unwrap().len(), 1);
        assert!(repo.find_by_username("ana").await.unwrap().is_empty());
        assert_eq!(repo.find_by_sprint_code("WD-3.2.5").await.unwrap().len(), 1);
        assert!(repo.find_by_sprint_code("WD-0").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_identity_and_timestamp() {
        let fx = fixture().await;
        let repo = MessageRepository::new(fx.pool.clone());
        let created = repo.create(fx.user_id, fx.sprint_id, "hi").await.unwrap();

        let unchanged = repo.update(created.id, None).await.unwrap().unwrap();
        assert_eq!(unchanged.rendered_text, "hi");
        assert_eq!(unchanged.created_on, created.created_on);

        let edited = repo.update(created.id, Some("hello")).await.unwrap().unwrap();
        assert_eq!(edited.rendered_text, "hello");
        assert_eq!(edited.id, created.id);
        assert_eq!(edited.created_on, created.created_on);

        assert!(repo.update(999, Some("x")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleting_user_or_sprint_cascades() {
        let fx = fixture().await;
        let repo = MessageRepository::new(fx.pool.clone());
        let first = repo.create(fx.user_id, fx.sprint_id, "one").await.unwrap();

        UserRepository::new(fx.pool.clone())
            .remove(fx.user_id)
            .await
            .unwrap()
            .unwrap();
        assert!(repo.find_by_id(first.id).await.unwrap().is_none());

        let user = UserRepository::new(fx.pool.clone())
            .create("ana")
            .await
            .unwrap();
        let second = repo.create(user.id, fx.sprint_id, "two").await.unwrap();
        SprintRepository::new(fx.pool.clone())
            .remove(fx.sprint_id)
            .await
            .unwrap()
            .unwrap();
        assert!(repo.find_by_id(second.id).await.unwrap().is_none());
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_message() {
        let fx = fixture().await;
        let repo = MessageRepository::new(fx.pool.clone());
        let created = repo.create(fx.user_id, fx.sprint_id, "hi").await.unwrap();

        let removed = repo.remove(created.id).await.unwrap().unwrap();
        assert_eq!(removed.id, created.id);
        assert!(repo.remove(created.id).await.unwrap().is_none());
    }
}
