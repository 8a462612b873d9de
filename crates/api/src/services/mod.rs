//! Application services and external integrations.

pub mod composition;
pub mod discord;
pub mod dispatch;
pub mod giphy;

pub use composition::{CompositionError, MessageComposer};
pub use discord::DiscordNotifier;
pub use dispatch::NotificationDispatcher;
pub use giphy::GiphyClient;
