//! Write transactions that hold the SQLite write lock from the start.

use std::ops::{Deref, DerefMut};

use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

/// A transaction opened with `BEGIN IMMEDIATE`.
///
/// A deferred transaction that reads before it writes cannot wait for a
/// concurrent writer: SQLite fails its lock upgrade with `SQLITE_BUSY`
/// without consulting the busy timeout. Taking the write lock in `BEGIN`
/// makes concurrent writers queue on the busy timeout instead.
///
/// Dropping an unfinished transaction closes its connection, which rolls
/// the transaction back.
pub struct WriteTransaction {
    conn: Option<PoolConnection<Sqlite>>,
}

/// Acquires a connection and starts an immediate transaction on it.
pub async fn begin_immediate(pool: &SqlitePool) -> Result<WriteTransaction, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
    Ok(WriteTransaction { conn: Some(conn) })
}

impl WriteTransaction {
    pub async fn commit(mut self) -> Result<(), sqlx::Error> {
        self.finish("COMMIT").await
    }

    pub async fn rollback(mut self) -> Result<(), sqlx::Error> {
        self.finish("ROLLBACK").await
    }

    async fn finish(&mut self, statement: &'static str) -> Result<(), sqlx::Error> {
        if let Some(conn) = self.conn.as_mut() {
            sqlx::query(statement).execute(&mut **conn).await?;
        }
        // Only a cleanly finished connection goes back to the pool.
        self.conn = None;
        Ok(())
    }
}

impl Deref for WriteTransaction {
    type Target = SqliteConnection;

    fn deref(&self) -> &SqliteConnection {
        self.conn
            .as_deref()
            .expect("write transaction used after commit or rollback")
    }
}

impl DerefMut for WriteTransaction {
    fn deref_mut(&mut self) -> &mut SqliteConnection {
        self.conn
            .as_deref_mut()
            .expect("write transaction used after commit or rollback")
    }
}

impl Drop for WriteTransaction {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            tracing::warn!("Write transaction dropped while open, closing its connection");
            drop(conn.detach());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, DatabaseConfig};
    use crate::repositories::UserRepository;

    async fn file_pool(dir: &tempfile::TempDir) -> SqlitePool {
        let config = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("kudos.db").display()),
            max_connections: 2,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        };
        let pool = create_pool(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    async fn user_count(pool: &SqlitePool) -> usize {
        UserRepository::new(pool.clone())
            .find_all()
            .await
            .unwrap()
            .len()
    }

    #[tokio::test]
    async fn test_commit_persists_writes() {
        let dir = tempfile::tempdir().unwrap();
        let pool = file_pool(&dir).await;

        let mut tx = begin_immediate(&pool).await.unwrap();
        UserRepository::create_with(&mut *tx, "vjuodz").await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(user_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_rollback_discards_writes() {
        let dir = tempfile::tempdir().unwrap();
        let pool = file_pool(&dir).await;

        let mut tx = begin_immediate(&pool).await.unwrap();
        UserRepository::create_with(&mut *tx, "vjuodz").await.unwrap();
        tx.rollback().await.unwrap();

        assert_eq!(user_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_drop_without_commit_discards_writes() {
        let dir = tempfile::tempdir().unwrap();
        let pool = file_pool(&dir).await;

        {
            let mut tx = begin_immediate(&pool).await.unwrap();
            UserRepository::create_with(&mut *tx, "vjuodz").await.unwrap();
        }

        assert_eq!(user_count(&pool).await, 0);
        // The write lock is released, so another writer can start.
        let tx = begin_immediate(&pool).await.unwrap();
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_second_writer_waits_for_first() {
        let dir = tempfile::tempdir().unwrap();
        let pool = file_pool(&dir).await;

        let mut first = begin_immediate(&pool).await.unwrap();
        UserRepository::create_with(&mut *first, "first").await.unwrap();

        let second = tokio::spawn({
            let pool = pool.clone();
            async move {
                let mut tx = begin_immediate(&pool).await?;
                let existing = UserRepository::find_by_username_with(&mut *tx, "first").await?;
                UserRepository::create_with(&mut *tx, "second").await?;
                tx.commit().await?;
                Ok::<_, sqlx::Error>(existing.is_some())
            }
        });

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        first.commit().await.unwrap();

        // The second writer only started once the first had committed.
        assert!(second.await.unwrap().unwrap());
        assert_eq!(user_count(&pool).await, 2);
    }
}
