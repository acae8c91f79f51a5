/// An event received from the chat platform.
///
/// Produced by a `ChatClient` adapter and consumed exactly once by the
/// event loop. Anything the bot does not understand is carried as `Other`
/// so the loop can ignore it without the adapter having to filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Connection established.
    Hello,
    /// A chat message was posted.
    Message(MessageEvent),
    /// Any other event kind, identified by its type tag.
    Other { kind: String },
}

/// A single inbound chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    /// Sender user id. Empty for system-generated messages.
    pub user_id: String,
    pub channel_id: String,
    pub text: String,
    /// User ids mentioned anywhere in the text (`<@ID>` tokens).
    pub mentions: Vec<String>,
}

impl MessageEvent {
    pub fn new(
        user_id: impl Into<String>,
        channel_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            channel_id: channel_id.into(),
            text: text.into(),
            mentions: Vec::new(),
        }
    }

    pub fn with_mentions(mut self, mentions: Vec<String>) -> Self {
        self.mentions = mentions;
        self
    }
}
