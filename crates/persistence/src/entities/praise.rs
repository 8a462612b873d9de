//! Praise entity (database row mapping).

use sqlx::FromRow;

/// Database row mapping for the praises table.
#[derive(Debug, Clone, FromRow)]
pub struct PraiseEntity {
    pub id: i64,
    pub text: String,
}

impl From<PraiseEntity> for domain::models::Praise {
    fn from(entity: PraiseEntity) -> Self {
        Self {
            id: entity.id,
            text: entity.text,
        }
    }
}
