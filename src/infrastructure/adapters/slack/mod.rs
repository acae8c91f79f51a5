//! Slack adapter
//!
//! Implements the `ChatClient` contract over the Slack Web API. The socket
//! transport itself is an external collaborator: whoever owns the websocket
//! pushes raw event payloads into the [`EventSink`] returned by
//! [`SlackAdapter::new`], and the adapter parses them into `InboundEvent`s
//! on demand.

use std::sync::Mutex;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::application::errors::BotError;
use crate::domain::entities::{Channel, InboundEvent, MessageEvent, User};
use crate::domain::traits::{BotIdentity, ChatClient};

/// Slack Web API base URL
const API_BASE: &str = "https://slack.com/api";

static MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<@([A-Za-z0-9]+)>").expect("mention pattern compiles"));

/// Handle the external socket transport uses to deliver raw events.
pub type EventSink = mpsc::UnboundedSender<Value>;

/// Slack chat client adapter
pub struct SlackAdapter {
    token: String,
    http: Client,
    identity: BotIdentity,
    events: Mutex<mpsc::UnboundedReceiver<Value>>,
}

impl SlackAdapter {
    pub fn new(token: impl Into<String>) -> (Self, EventSink) {
        let (sink, events) = mpsc::unbounded_channel();
        let adapter = Self {
            token: token.into(),
            http: Client::new(),
            identity: BotIdentity::new("unknown", "bartender"),
            events: Mutex::new(events),
        };
        (adapter, sink)
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/{}", API_BASE, method)
    }

    /// Resolve the bot's own identity via `auth.test`.
    pub async fn connect(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct Response {
            ok: bool,
            error: Option<String>,
            user_id: Option<String>,
            user: Option<String>,
        }

        let response = self
            .http
            .post(self.api_url("auth.test"))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        if !data.ok {
            return Err(BotError::Network(format!(
                "auth.test failed: {}",
                data.error.unwrap_or_default()
            )));
        }

        self.identity = BotIdentity::new(
            data.user_id.unwrap_or_default(),
            data.user.unwrap_or_else(|| "bartender".to_string()),
        );
        tracing::info!("connected as {} ({})", self.identity.name, self.identity.user_id);
        Ok(())
    }
}

/// Parse one raw transport payload into an inbound event.
///
/// Messages without a channel or text (edits, deletions, attachments-only
/// subtypes) are carried as `Other` so the loop skips them.
fn parse_event(value: &Value) -> InboundEvent {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown");

    match kind {
        "hello" => InboundEvent::Hello,
        "message" => {
            let channel = value.get("channel").and_then(Value::as_str);
            let text = value.get("text").and_then(Value::as_str);
            let (Some(channel), Some(text)) = (channel, text) else {
                return InboundEvent::Other {
                    kind: kind.to_string(),
                };
            };
            let user = value.get("user").and_then(Value::as_str).unwrap_or_default();
            let mentions = MENTION_RE
                .captures_iter(text)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .collect();
            InboundEvent::Message(
                MessageEvent::new(user, channel, text).with_mentions(mentions),
            )
        }
        other => InboundEvent::Other {
            kind: other.to_string(),
        },
    }
}

#[async_trait]
impl ChatClient for SlackAdapter {
    fn identity(&self) -> BotIdentity {
        self.identity.clone()
    }

    fn try_recv_event(&self) -> Option<InboundEvent> {
        let mut events = self.events.lock().ok()?;
        events.try_recv().ok().map(|value| parse_event(&value))
    }

    async fn channel(&self, channel_id: &str) -> Result<Option<Channel>, BotError> {
        #[derive(Deserialize)]
        struct Response {
            ok: bool,
            error: Option<String>,
            channel: Option<ChannelInfo>,
        }

        #[derive(Deserialize)]
        struct ChannelInfo {
            id: String,
            name: Option<String>,
            #[serde(default)]
            is_im: bool,
        }

        let response = self
            .http
            .get(self.api_url("conversations.info"))
            .bearer_auth(&self.token)
            .query(&[("channel", channel_id)])
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        if !data.ok {
            tracing::debug!(
                "conversations.info for {} failed: {}",
                channel_id,
                data.error.as_deref().unwrap_or("unknown")
            );
            return Ok(None);
        }

        Ok(data.channel.map(|c| {
            let mut channel = Channel::new(c.id);
            channel.name = c.name;
            channel.is_direct = c.is_im;
            channel
        }))
    }

    async fn user(&self, user_id: &str) -> Result<Option<User>, BotError> {
        #[derive(Deserialize)]
        struct Response {
            ok: bool,
            error: Option<String>,
            user: Option<UserInfo>,
        }

        #[derive(Deserialize)]
        struct UserInfo {
            id: String,
            name: Option<String>,
            #[serde(default)]
            is_owner: bool,
        }

        let response = self
            .http
            .get(self.api_url("users.info"))
            .bearer_auth(&self.token)
            .query(&[("user", user_id)])
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        if !data.ok {
            tracing::debug!(
                "users.info for {} failed: {}",
                user_id,
                data.error.as_deref().unwrap_or("unknown")
            );
            return Ok(None);
        }

        Ok(data.user.map(|u| {
            let mut user = User::new(u.id);
            user.name = u.name;
            user.is_owner = u.is_owner;
            user
        }))
    }

    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct Response {
            ok: bool,
            error: Option<String>,
        }

        tracing::debug!("sending to {}: {}", channel_id, text);

        let response = self
            .http
            .post(self.api_url("chat.postMessage"))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({
                "channel": channel_id,
                "text": text,
            }))
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        if !data.ok {
            return Err(BotError::Network(format!(
                "chat.postMessage failed: {}",
                data.error.unwrap_or_default()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_hello_and_unknown_kinds() {
        assert_eq!(parse_event(&json!({"type": "hello"})), InboundEvent::Hello);
        assert_eq!(
            parse_event(&json!({"type": "user_typing"})),
            InboundEvent::Other {
                kind: "user_typing".to_string()
            }
        );
    }

    #[test]
    fn parses_messages_with_mentions() {
        let event = parse_event(&json!({
            "type": "message",
            "user": "U1",
            "channel": "C1",
            "text": "hey <@UBOT>, pour <@U2> a beer",
        }));
        let InboundEvent::Message(message) = event else {
            panic!("expected a message event");
        };
        assert_eq!(message.user_id, "U1");
        assert_eq!(message.channel_id, "C1");
        assert_eq!(message.mentions, vec!["UBOT".to_string(), "U2".to_string()]);
    }

    #[test]
    fn textless_message_subtypes_are_skipped() {
        let event = parse_event(&json!({
            "type": "message",
            "subtype": "message_deleted",
            "channel": "C1",
        }));
        assert_eq!(
            event,
            InboundEvent::Other {
                kind: "message".to_string()
            }
        );
    }

    #[test]
    fn sink_feeds_try_recv() {
        let (adapter, sink) = SlackAdapter::new("xoxb-test");
        assert!(adapter.try_recv_event().is_none());
        sink.send(json!({"type": "hello"})).expect("send");
        assert_eq!(adapter.try_recv_event(), Some(InboundEvent::Hello));
        assert!(adapter.try_recv_event().is_none());
    }
}
