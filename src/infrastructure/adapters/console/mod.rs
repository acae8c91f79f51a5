//! Console adapter for development/testing
//!
//! Every stdin line becomes a direct message from an owner user, so the
//! whole router (including privileged commands) can be exercised without a
//! workspace. Sends print to stdout.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::application::errors::BotError;
use crate::domain::entities::{Channel, InboundEvent, MessageEvent, User};
use crate::domain::traits::{BotIdentity, ChatClient};

const CONSOLE_CHANNEL: &str = "console";
const CONSOLE_USER: &str = "console-user";

/// Console chat client adapter for local development
pub struct ConsoleAdapter {
    identity: BotIdentity,
    events: Mutex<mpsc::UnboundedReceiver<InboundEvent>>,
}

impl ConsoleAdapter {
    /// Create the adapter and start the stdin reader task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(name: impl Into<String>) -> Self {
        let (sink, events) = mpsc::unbounded_channel();

        let _ = sink.send(InboundEvent::Hello);
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let event = InboundEvent::Message(MessageEvent::new(
                    CONSOLE_USER,
                    CONSOLE_CHANNEL,
                    line,
                ));
                if sink.send(event).is_err() {
                    break;
                }
            }
        });

        Self {
            identity: BotIdentity::new("console-bot", name),
            events: Mutex::new(events),
        }
    }
}

#[async_trait]
impl ChatClient for ConsoleAdapter {
    fn identity(&self) -> BotIdentity {
        self.identity.clone()
    }

    fn try_recv_event(&self) -> Option<InboundEvent> {
        let mut events = self.events.lock().ok()?;
        events.try_recv().ok()
    }

    async fn channel(&self, channel_id: &str) -> Result<Option<Channel>, BotError> {
        // Dev mode: everything is a direct channel
        Ok(Some(Channel::new(channel_id).direct()))
    }

    async fn user(&self, user_id: &str) -> Result<Option<User>, BotError> {
        if user_id == CONSOLE_USER {
            Ok(Some(User::new(CONSOLE_USER).with_name("console").owner()))
        } else {
            Ok(None)
        }
    }

    async fn post_message(&self, _channel_id: &str, text: &str) -> Result<(), BotError> {
        println!("[{}] {}", self.identity.name, text);
        Ok(())
    }
}
