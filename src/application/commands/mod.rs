//! Bot commands
//!
//! Every command sits behind the same contract: a list of whitespace-split
//! argument tokens in, a [`Reply`] out. Failures of external lookups are
//! turned into user-visible text inside the command, never propagated.

pub mod airport;
pub mod bar;
pub mod dns;
pub mod gamble;
pub mod search;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::entities::Reply;

pub use airport::AirportCommand;
pub use bar::RoundCommand;
pub use dns::DnsCommand;
pub use gamble::{FlipCommand, RollCommand};
pub use search::SearchCommand;

/// Command handler contract: argument tokens in, reply out.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn run(&self, args: &[String]) -> Reply;
}

/// A registered bot command
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub aliases: Vec<String>,
    pub usage: Option<String>,
    /// `None` for reserved names (`help`, `quit`, `error`) the router
    /// handles itself; they are registered so `help` lists them.
    pub handler: Option<Box<dyn CommandHandler>>,
    /// Network-bound commands reply without an artificial delay; their own
    /// latency is pacing enough.
    pub no_delay: bool,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            aliases: Vec::new(),
            usage: None,
            handler: None,
            no_delay: false,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn with_handler<H: CommandHandler + 'static>(mut self, handler: H) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn no_artificial_delay(mut self) -> Self {
        self.no_delay = true;
        self
    }

    pub fn matches(&self, input: &str) -> bool {
        let input_lower = input.to_lowercase();
        self.name.to_lowercase() == input_lower
            || self.aliases.iter().any(|a| a.to_lowercase() == input_lower)
    }
}

/// Command registry, static for the process lifetime.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Command) {
        self.commands.insert(command.name.to_lowercase(), command);
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(&name.to_lowercase())
    }

    /// Case-insensitive lookup by name or alias.
    pub fn find(&self, input: &str) -> Option<&Command> {
        self.commands.values().find(|c| c.matches(input))
    }

    /// Every invocable name (primary names and aliases), sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .commands
            .values()
            .flat_map(|c| std::iter::once(c.name.clone()).chain(c.aliases.iter().cloned()))
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Build the bartender's command table.
pub fn default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    // Bar
    registry.register(
        Command::new("beer")
            .with_description("Pour a beer")
            .with_handler(RoundCommand::new([":beer:", ":beers:"])),
    );
    registry.register(
        Command::new("champagne")
            .with_description("Pop a bottle")
            .with_handler(RoundCommand::new([":champagne:"])),
    );
    registry.register(
        Command::new("cocktail")
            .with_description("Mix a cocktail")
            .with_handler(RoundCommand::new([":cocktail:"])),
    );
    registry.register(
        Command::new("coffee")
            .with_description("Brew a coffee")
            .with_handler(RoundCommand::new([":coffee:"])),
    );
    registry.register(
        Command::new("sake")
            .with_description("Warm some sake")
            .with_handler(RoundCommand::new([":sake:"])),
    );
    registry.register(
        Command::new("tea")
            .with_description("Steep a tea")
            .with_handler(RoundCommand::new([":tea:"])),
    );
    registry.register(
        Command::new("wine")
            .with_description("Pour a glass of wine")
            .with_handler(RoundCommand::new([":wine_glass:"])),
    );

    // One-off gambling
    registry.register(
        Command::new("roll")
            .with_description("Roll a die")
            .with_usage("roll [max]")
            .with_handler(RollCommand),
    );
    registry.register(
        Command::new("flip")
            .with_description("Flip a coin")
            .with_handler(FlipCommand),
    );

    // Virtual assistant
    registry.register(
        Command::new("air")
            .with_description("FAA airport status and weather")
            .with_aliases(vec!["airport".to_string()])
            .with_usage("air <CODE> [<CODE2> ...]")
            .with_handler(AirportCommand::new())
            .no_artificial_delay(),
    );
    registry.register(
        Command::new("search")
            .with_description("Generate search links")
            .with_usage("search <words>")
            .with_handler(SearchCommand),
    );

    // IT
    registry.register(
        Command::new("dns")
            .with_description("Resolve domain names")
            .with_usage("dns <domain> [<domain2> ...]")
            .with_handler(DnsCommand)
            .no_artificial_delay(),
    );

    // Reserved names, handled by the router; registered for the help listing
    registry.register(Command::new("help").with_description("List available commands"));
    registry.register(Command::new("quit").with_description("Shut the bot down (owner only)"));
    registry.register(Command::new("error").with_description("Send a test alert (owner only)"));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_is_case_insensitive_and_knows_aliases() {
        let registry = default_registry();
        assert!(registry.find("ROLL").is_some());
        let by_alias = registry.find("Airport").expect("alias lookup");
        assert_eq!(by_alias.name, "air");
        assert!(by_alias.no_delay);
        assert!(registry.find("frobnicate").is_none());
    }

    #[test]
    fn reserved_names_are_listed_but_have_no_handler() {
        let registry = default_registry();
        for name in ["help", "quit", "error"] {
            let cmd = registry.get(name).expect(name);
            assert!(cmd.handler.is_none());
        }
        assert!(registry.names().contains(&"help".to_string()));
    }

    #[test]
    fn names_are_sorted_and_include_aliases() {
        let names = default_registry().names();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(names.contains(&"air".to_string()));
        assert!(names.contains(&"airport".to_string()));
    }
}
