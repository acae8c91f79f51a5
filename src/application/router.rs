//! Message routing - the bartender's conversational logic
//!
//! Classification runs in strict priority order: own messages are dropped,
//! then addressing is decided (direct channel or mention prefix), then small
//! talk phrases, then the command table. First match wins; at most one
//! response comes out of any inbound message.

use crate::application::commands::CommandRegistry;
use crate::application::errors::BotError;
use crate::application::scheduler::Delay;
use crate::domain::entities::{MessageEvent, Reply};
use crate::domain::traits::{BotIdentity, ChatClient};

/// Default pacing for conversational replies.
pub const CHAT_DELAY: Delay = Delay::Range(150, 450);
/// Slower pacing for messages the bot did not understand.
pub const CONFUSED_DELAY: Delay = Delay::Range(250, 750);

const GREETINGS: &[&str] = &["hello", "hi", "hey", "greetings", "howdy"];
const FAREWELLS: &[&str] = &["goodbye", "bye"];

/// What the event loop should do with an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No response.
    None,
    /// Send one reply with the given delay policy.
    Send {
        reply: Reply,
        channel_id: String,
        delay: Delay,
    },
    /// Post a test alert to the error-reporting channel.
    Alert { origin_channel_id: String },
    /// Send the farewell immediately and stop the loop.
    Shutdown {
        farewell: Reply,
        channel_id: String,
    },
}

pub struct Router {
    identity: BotIdentity,
    registry: CommandRegistry,
}

impl Router {
    pub fn new(identity: BotIdentity, registry: CommandRegistry) -> Self {
        Self { identity, registry }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Classify one message and produce at most one response.
    pub async fn route<C: ChatClient>(
        &self,
        client: &C,
        event: &MessageEvent,
    ) -> Result<Outcome, BotError> {
        // Ignore own messages
        if event.user_id == self.identity.user_id {
            return Ok(Outcome::None);
        }

        let channel = client.channel(&event.channel_id).await?;
        // Unknown channels are treated as public
        let is_direct = channel.as_ref().map(|c| c.is_direct).unwrap_or(false);
        let channel_id = channel
            .map(|c| c.id)
            .unwrap_or_else(|| event.channel_id.clone());

        let stripped = strip_self_mention(&event.text, &self.identity);
        let addressed = is_direct || stripped.is_some();
        let body = stripped.unwrap_or(&event.text);

        if !addressed {
            // Mentioned mid-sentence somewhere the bot was not addressed
            if event.mentions.iter().any(|m| m == &self.identity.user_id) {
                return Ok(Outcome::Send {
                    reply: Reply::choice(["My ears are burning...", "Hmmm?"]),
                    channel_id,
                    delay: CHAT_DELAY,
                });
            }
            return Ok(Outcome::None);
        }

        let tokens: Vec<&str> = body.split_whitespace().collect();
        let lower: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

        if tokens.is_empty() {
            return Ok(Outcome::Send {
                reply: Reply::choice(["Cat got your tongue?", "What was that?", "I can't hear you..."]),
                channel_id,
                delay: CHAT_DELAY,
            });
        }

        if let Some(reply) = small_talk(&lower, &event.user_id) {
            return Ok(Outcome::Send {
                reply,
                channel_id,
                delay: CHAT_DELAY,
            });
        }

        self.route_command(client, event, &tokens, &lower[0], channel_id)
            .await
    }

    async fn route_command<C: ChatClient>(
        &self,
        client: &C,
        event: &MessageEvent,
        tokens: &[&str],
        name: &str,
        channel_id: String,
    ) -> Result<Outcome, BotError> {
        match name {
            "quit" => {
                if self.sender_is_owner(client, &event.user_id).await? {
                    return Ok(Outcome::Shutdown {
                        farewell: Reply::choice(["Goodbye.", "Bye.", "Later on."]),
                        channel_id,
                    });
                }
                return Ok(Outcome::Send {
                    reply: refusal(),
                    channel_id,
                    delay: Delay::None,
                });
            }
            "error" => {
                if self.sender_is_owner(client, &event.user_id).await? {
                    return Ok(Outcome::Alert {
                        origin_channel_id: channel_id,
                    });
                }
                return Ok(Outcome::Send {
                    reply: refusal(),
                    channel_id,
                    delay: Delay::None,
                });
            }
            "help" => {
                let listing = format!("*Commands*\n{}", self.registry.names().join(", "));
                return Ok(Outcome::Send {
                    reply: Reply::Text(listing),
                    channel_id,
                    delay: Delay::None,
                });
            }
            _ => {}
        }

        match self.registry.find(name).and_then(|c| c.handler.as_ref().map(|h| (c, h))) {
            None => Ok(Outcome::Send {
                reply: Reply::choice([
                    "What?",
                    "Huh?",
                    "I don't understand.",
                    "Sorry, I don't understand.",
                    "My responses are limited. You must ask the right questions.",
                ]),
                channel_id,
                delay: CONFUSED_DELAY,
            }),
            Some((command, handler)) => {
                let args: Vec<String> = tokens[1..].iter().map(|t| t.to_string()).collect();
                let reply = handler.run(&args).await;
                let delay = if command.no_delay {
                    Delay::None
                } else {
                    CHAT_DELAY
                };
                Ok(Outcome::Send {
                    reply,
                    channel_id,
                    delay,
                })
            }
        }
    }

    async fn sender_is_owner<C: ChatClient>(
        &self,
        client: &C,
        user_id: &str,
    ) -> Result<bool, BotError> {
        // Unknown users are treated as non-owners
        Ok(client
            .user(user_id)
            .await?
            .map(|u| u.is_owner)
            .unwrap_or(false))
    }
}

/// Match the fixed small-talk phrase prefixes, first rule wins.
fn small_talk(lower: &[String], user_id: &str) -> Option<Reply> {
    let user = format!("<@{}>", user_id);
    let first = lower[0].as_str();

    if GREETINGS.contains(&first) {
        return Some(Reply::Choice(vec![
            "Hello.".to_string(),
            format!("Hello {}.", user),
            format!("Greetings, {}.", user),
            "Hi there.".to_string(),
        ]));
    }
    if FAREWELLS.contains(&first) {
        return Some(Reply::Choice(vec![
            "Later on!".to_string(),
            "Goodbye.".to_string(),
            "Bye.".to_string(),
            format!("Goodbye {}.", user),
            "See you later.".to_string(),
        ]));
    }
    if first == "thanks" || starts_with(lower, &["thank", "you"]) {
        return Some(Reply::Choice(vec![
            "You're welcome.".to_string(),
            format!("You're welcome {}.", user),
            "No problem.".to_string(),
        ]));
    }
    if starts_with(lower, &["how", "are", "you"]) {
        return Some(Reply::choice([
            "Good. You?",
            "Doing good.",
            "Well, thank you.",
            "Very well. You?",
        ]));
    }
    if starts_with(lower, &["what", "are", "you"]) {
        return Some(Reply::choice([
            "Your bartender.",
            "A humble bartender.",
            "Just a bot polishing glasses.",
        ]));
    }
    if starts_with(lower, &["knock", "knock"]) {
        return Some(Reply::choice(["Who's there?"]));
    }

    None
}

fn starts_with(lower: &[String], prefix: &[&str]) -> bool {
    lower.len() >= prefix.len() && lower.iter().zip(prefix).all(|(t, p)| t == p)
}

fn refusal() -> Reply {
    Reply::choice(["Haha", "Good one.", "You get out!"])
}

/// Strip a leading self-mention, colon optional, returning the rest of the
/// text when the message is mention-prefixed.
fn strip_self_mention<'a>(text: &'a str, identity: &BotIdentity) -> Option<&'a str> {
    let rest = text.trim_start().strip_prefix(&identity.mention())?;
    let rest = rest.trim_start();
    Some(rest.strip_prefix(':').unwrap_or(rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bot() -> BotIdentity {
        BotIdentity::new("UBOT", "bartender")
    }

    #[test]
    fn mention_prefix_is_stripped_with_or_without_colon() {
        assert_eq!(strip_self_mention("<@UBOT> hello", &bot()), Some(" hello"));
        assert_eq!(strip_self_mention("<@UBOT>: hello", &bot()), Some(" hello"));
        assert_eq!(strip_self_mention("<@UBOT> : hello", &bot()), Some(" hello"));
        assert_eq!(strip_self_mention("  <@UBOT> hi", &bot()), Some(" hi"));
    }

    #[test]
    fn non_prefixed_text_is_not_addressed() {
        assert_eq!(strip_self_mention("hello <@UBOT>", &bot()), None);
        assert_eq!(strip_self_mention("hello there", &bot()), None);
    }

    #[test]
    fn small_talk_matches_in_order() {
        let lower = |s: &str| -> Vec<String> {
            s.split_whitespace().map(|t| t.to_lowercase()).collect()
        };
        assert!(small_talk(&lower("Hello everyone"), "U1").is_some());
        assert!(small_talk(&lower("thank you very much"), "U1").is_some());
        assert!(small_talk(&lower("how are you"), "U1").is_some());
        assert!(small_talk(&lower("knock knock"), "U1").is_some());
        assert!(small_talk(&lower("roll 6"), "U1").is_none());
        // prefix match only; "you thank" is not thanks
        assert!(small_talk(&lower("you thank"), "U1").is_none());
    }
}
