//! Domain models for Kudos.

pub mod emoji;
pub mod message;
pub mod praise;
pub mod sprint;
pub mod template;
pub mod user;

pub use emoji::Emoji;
pub use message::{Message, MessageView};
pub use praise::Praise;
pub use sprint::Sprint;
pub use template::Template;
pub use user::User;
