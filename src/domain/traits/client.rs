use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::domain::entities::{Channel, InboundEvent, User};

/// ChatClient trait - abstraction for chat platform adapters
///
/// Wraps whatever transport the platform provides. The event loop owns one
/// instance and drives everything through it; tests substitute an in-memory
/// fake. Lookups answer `Ok(None)` for unknown ids rather than erroring, so
/// the router can fall back (unknown channel: treated as public, unknown
/// user: treated as non-owner).
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// The identity of the connected bot user.
    fn identity(&self) -> BotIdentity;

    /// Pop the next inbound event without blocking, if one is ready.
    fn try_recv_event(&self) -> Option<InboundEvent>;

    /// Look up a channel by id.
    async fn channel(&self, channel_id: &str) -> Result<Option<Channel>, BotError>;

    /// Look up a user by id.
    async fn user(&self, user_id: &str) -> Result<Option<User>, BotError>;

    /// Send a message to a channel immediately.
    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), BotError>;
}

/// The bot's own user on the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub user_id: String,
    pub name: String,
}

impl BotIdentity {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
        }
    }

    /// The mention token other users type to address the bot.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.user_id)
    }
}
