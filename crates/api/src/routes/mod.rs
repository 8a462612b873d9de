//! HTTP route handlers.

pub mod emojis;
pub mod health;
pub mod messages;
pub mod praises;
pub mod sprints;
pub mod templates;
pub mod users;
