//! Search link generation.

use async_trait::async_trait;

use super::CommandHandler;
use crate::domain::entities::Reply;

/// `search <words>...` - build search engine links for a query.
pub struct SearchCommand;

#[async_trait]
impl CommandHandler for SearchCommand {
    async fn run(&self, args: &[String]) -> Reply {
        if args.is_empty() {
            return Reply::choice([
                "What would you like to search for?",
                "What can I help you find?",
                "What are you looking for?",
                "Can I help you?",
            ]);
        }

        let query = args.join(" ");
        let escaped = query.replace(' ', "%20");
        Reply::Text(format!(
            "*Search results for \"{}\"*\nGoogle: http://www.google.com/search?q={}\nLMGTFY: http://www.lmgtfy.com/?q={}",
            query, escaped, escaped,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn escapes_spaces_in_the_query() {
        let args = vec!["rust".to_string(), "bots".to_string()];
        let Reply::Text(text) = SearchCommand.run(&args).await else {
            panic!("search returns a single string");
        };
        assert!(text.contains("*Search results for \"rust bots\"*"));
        assert!(text.contains("q=rust%20bots"));
    }

    #[tokio::test]
    async fn empty_args_ask_what_to_find() {
        let reply = SearchCommand.run(&[]).await;
        assert!(matches!(reply, Reply::Choice(ref c) if c.len() == 4));
    }
}
