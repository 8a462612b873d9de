//! User repository for database operations.

use sqlx::{SqliteExecutor, SqlitePool};

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// List all users ordered by id.
    pub async fn find_all(&self) -> Result<Vec<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_all_users");
        let result = sqlx::query_as::<_, UserEntity>("SELECT id, username FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Find a user by id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result =
            sqlx::query_as::<_, UserEntity>("SELECT id, username FROM users WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Find a user by username.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        Self::find_by_username_with(&self.pool, username).await
    }

    /// Find a user by username using the given executor (pool or transaction).
    pub async fn find_by_username_with<'e, E>(
        executor: E,
        username: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let timer = QueryTimer::new("find_user_by_username");
        let result =
            sqlx::query_as::<_, UserEntity>("SELECT id, username FROM users WHERE username = ?1")
                .bind(username)
                .fetch_optional(executor)
                .await;
        timer.record();
        result
    }

    /// Create a new user.
    ///
    /// Fails with a unique violation if the username is taken.
    pub async fn create(&self, username: &str) -> Result<UserEntity, sqlx::Error> {
        Self::create_with(&self.pool, username).await
    }

    /// Create a new user using the given executor (pool or transaction).
    pub async fn create_with<'e, E>(executor: E, username: &str) -> Result<UserEntity, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (username)
            VALUES (?1)
            RETURNING id, username
            "#,
        )
        .bind(username)
        .fetch_one(executor)
        .await;
        timer.record();
        result
    }

    /// Update a user. Fields left as `None` keep their current value.
    ///
    /// Returns `None` if the user does not exist.
    pub async fn update(
        &self,
        id: i64,
        username: Option<&str>,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            UPDATE users
            SET username = COALESCE(?2, username)
            WHERE id = ?1
            RETURNING id, username
            "#,
        )
        .bind(id)
        .bind(username)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a user and, through the foreign key cascade, their messages.
    ///
    /// Returns the removed row, or `None` if the user does not exist.
    pub async fn remove(&self, id: i64) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("remove_user");
        let result = sqlx::query_as::<_, UserEntity>(
            "DELETE FROM users WHERE id = ?1 RETURNING id, username",
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
    use fake::faker::internet::en::Username;
    use fake::Fake;
    use std::collections::BTreeSet;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_create_and_find_user() {
        let repo = UserRepository::new(migrated_test_pool().await);

        let created = repo.create("vjuodz").await.unwrap();
        assert_eq!(created.username, "vjuodz");

        let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "vjuodz");

        let by_name = repo.find_by_username("vjuodz").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);

        assert!(repo.find_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let repo = UserRepository::new(migrated_test_pool().await);
        repo.create("vjuodz").await.unwrap();

        let err = repo.create("vjuodz").await.unwrap_err();
        match err {
            sqlx::Error::Database(db_err) => assert!(db_err.is_unique_violation()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_update_returns_current_row() {
        let repo = UserRepository::new(migrated_test_pool().await);
        let created = repo.create("ana").await.unwrap();

        let updated = repo.update(created.id, None).await.unwrap().unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.username, "ana");
    }

    #[tokio::test]
    async fn test_update_changes_username() {
        let repo = UserRepository::new(migrated_test_pool().await);
        let created = repo.create("ana").await.unwrap();

        let updated = repo.update(created.id, Some("anna")).await.unwrap().unwrap();
        assert_eq!(updated.username, "anna");
    }

    #[tokio::test]
    async fn test_missing_user_update_and_remove_return_none() {
        let repo = UserRepository::new(migrated_test_pool().await);

        assert!(repo.update(999, Some("ghost")).await.unwrap().is_none());
        assert!(repo.remove(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_returns_prior_row() {
        let repo = UserRepository::new(migrated_test_pool().await);
        let created = repo.create("ana").await.unwrap();

        let removed = repo.remove(created.id).await.unwrap().unwrap();
        assert_eq!(removed.username, "ana");
        assert!(repo.find_by_id(created.id).await.unwrap().is_none());
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_all_orders_by_id() {
        let repo = UserRepository::new(migrated_test_pool().await);
        let names: BTreeSet<String> = (0..10).map(|_| Username().fake::<String>()).collect();

        let mut created_ids = Vec::new();
        for name in &names {
            created_ids.push(assert_ok!(repo.create(name).await).id);
        }

        let all = repo.find_all().await.unwrap();
        let ids: Vec<i64> = all.iter().map(|u| u.id).collect();
        assert_eq!(ids, created_ids);
        assert!(all.iter().all(|u| names.contains(&u.username)));
    }
}
