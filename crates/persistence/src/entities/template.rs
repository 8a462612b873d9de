//! Template entity (database row mapping).

use sqlx::FromRow;

/// Database row mapping for the templates table.
#[derive(Debug, Clone, FromRow)]
pub struct TemplateEntity {
    pub id: i64,
    pub text: String,
}

impl From<TemplateEntity> for domain::models::Template {
    fn from(entity: TemplateEntity) -> Self {
        Self {
            id: entity.id,
            text: entity.text,
        }
    }
}
