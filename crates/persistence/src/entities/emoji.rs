//! Emoji entity (database row mapping).

use sqlx::FromRow;

/// Database row mapping for the emojis table.
#[derive(Debug, Clone, FromRow)]
pub struct EmojiEntity {
    pub id: i64,
    pub glyph: String,
}

impl From<EmojiEntity> for domain::models::Emoji {
    fn from(entity: EmojiEntity) -> Self {
        Self {
            id: entity.id,
            glyph: entity.glyph,
        }
    }
}
