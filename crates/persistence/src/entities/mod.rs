//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod emoji;
pub mod message;
pub mod praise;
pub mod sprint;
pub mod template;
pub mod user;

pub use emoji::EmojiEntity;
pub use message::{MessageEntity, MessageViewEntity};
pub use praise::PraiseEntity;
pub use sprint::SprintEntity;
pub use template::TemplateEntity;
pub use user::UserEntity;
