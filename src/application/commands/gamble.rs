//! One-off gambling: dice rolls and coin flips.

use async_trait::async_trait;
use rand::Rng;

use super::CommandHandler;
use crate::domain::entities::Reply;

/// `roll [max]` - roll a die from 1 to `max` (default 100).
pub struct RollCommand;

#[async_trait]
impl CommandHandler for RollCommand {
    async fn run(&self, args: &[String]) -> Reply {
        let max = match args.first() {
            None => 100,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Reply::text("You must enter a valid number for the maximum value.")
                }
            },
        };

        let value = rand::thread_rng().gen_range(1..=max);
        Reply::Text(format!("Rolling 1 - {}: {}", max, value))
    }
}

/// `flip` - flip a coin.
pub struct FlipCommand;

#[async_trait]
impl CommandHandler for FlipCommand {
    async fn run(&self, _args: &[String]) -> Reply {
        let heads = rand::thread_rng().gen_range(0..2) == 0;
        Reply::text(if heads { "Heads." } else { "Tails." })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn roll_stays_within_the_requested_range() {
        for _ in 0..50 {
            let reply = RollCommand.run(&["6".to_string()]).await;
            let Reply::Text(text) = reply else {
                panic!("roll returns a single string");
            };
            let value: i64 = text
                .strip_prefix("Rolling 1 - 6: ")
                .expect("roll format")
                .parse()
                .expect("roll value");
            assert!((1..=6).contains(&value));
        }
    }

    #[tokio::test]
    async fn roll_defaults_to_one_hundred() {
        let Reply::Text(text) = RollCommand.run(&[]).await else {
            panic!("roll returns a single string");
        };
        assert!(text.starts_with("Rolling 1 - 100: "));
    }

    #[tokio::test]
    async fn roll_rejects_garbage_and_non_positive_maxima() {
        for bad in ["six", "0", "-3"] {
            let reply = RollCommand.run(&[bad.to_string()]).await;
            assert_eq!(
                reply,
                Reply::text("You must enter a valid number for the maximum value.")
            );
        }
    }

    #[tokio::test]
    async fn flip_lands_on_a_side() {
        let Reply::Text(text) = FlipCommand.run(&[]).await else {
            panic!("flip returns a single string");
        };
        assert!(text == "Heads." || text == "Tails.");
    }
}
