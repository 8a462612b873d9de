//! Message entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the messages table.
#[derive(Debug, Clone, FromRow)]
pub struct MessageEntity {
    pub id: i64,
    pub user_id: i64,
    pub sprint_id: i64,
    pub rendered_text: String,
    pub created_on: DateTime<Utc>,
}

impl From<MessageEntity> for domain::models::Message {
    fn from(entity: MessageEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            sprint_id: entity.sprint_id,
            rendered_text: entity.rendered_text,
            created_on: entity.created_on,
        }
    }
}

/// Row mapping for messages joined with their user and sprint.
#[derive(Debug, Clone, FromRow)]
pub struct MessageViewEntity {
    pub id: i64,
    pub user_id: i64,
    pub sprint_id: i64,
    pub username: String,
    pub sprint_code: String,
    pub sprint_title: String,
    pub rendered_text: String,
    pub created_on: DateTime<Utc>,
}

impl From<MessageViewEntity> for domain::models::MessageView {
    fn from(entity: MessageViewEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            sprint_id: entity.sprint_id,
            username: entity.username,
            sprint_code: entity.sprint_code,
            sprint_title: entity.sprint_title,
            rendered_text: entity.rendered_text,
            created_on: entity.created_on,
        }
    }
}
