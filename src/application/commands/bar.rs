//! Bar service: emoji drink rounds, optionally directed at another user.

use async_trait::async_trait;

use super::CommandHandler;
use crate::domain::entities::Reply;

/// Serves one of a fixed set of emoji. With an argument, the round is
/// directed at that user; `<@id>` markup is passed through, a bare id is
/// wrapped into a mention.
pub struct RoundCommand {
    responses: Vec<String>,
}

impl RoundCommand {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl CommandHandler for RoundCommand {
    async fn run(&self, args: &[String]) -> Reply {
        match args.first() {
            None => Reply::Choice(self.responses.clone()),
            Some(user) => {
                let mention = if user.starts_with("<@") && user.ends_with('>') {
                    user.clone()
                } else {
                    format!("<@{}>", user)
                };
                Reply::Choice(
                    self.responses
                        .iter()
                        .map(|response| format!("{}: {}", mention, response))
                        .collect(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn plain_round_serves_an_emoji() {
        let cmd = RoundCommand::new([":beer:", ":beers:"]);
        let reply = cmd.run(&[]).await;
        assert_eq!(reply, Reply::choice([":beer:", ":beers:"]));
    }

    #[tokio::test]
    async fn targeted_round_prefixes_the_mention() {
        let cmd = RoundCommand::new([":tea:"]);
        let reply = cmd.run(&["U123".to_string()]).await;
        assert_eq!(reply, Reply::choice(["<@U123>: :tea:"]));

        let reply = cmd.run(&["<@U456>".to_string()]).await;
        assert_eq!(reply, Reply::choice(["<@U456>: :tea:"]));
    }
}
