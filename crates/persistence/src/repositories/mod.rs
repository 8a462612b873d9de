//! Repository implementations for database operations.

pub mod emoji;
pub mod message;
pub mod praise;
pub mod sprint;
pub mod template;
pub mod user;

pub use emoji::EmojiRepository;
pub use message::MessageRepository;
pub use praise::PraiseRepository;
pub use sprint::SprintRepository;
pub use template::TemplateRepository;
pub use user::UserRepository;
