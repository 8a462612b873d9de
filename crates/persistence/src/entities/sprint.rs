//! Sprint entity (database row mapping).

use sqlx::FromRow;

/// Database row mapping for the sprints table.
#[derive(Debug, Clone, FromRow)]
pub struct SprintEntity {
    pub id: i64,
    pub code: String,
    pub title: String,
}

impl From<SprintEntity> for domain::models::Sprint {
    fn from(entity: SprintEntity) -> Self {
        Self {
            id: entity.id,
            code: entity.code,
            title: entity.title,
        }
    }
}
