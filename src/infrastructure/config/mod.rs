//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub slack: SlackConfig,
    pub alerts: Option<AlertsConfig>,
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    /// Event loop tick interval in milliseconds.
    pub tick_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SlackConfig {
    pub token: Option<String>,
}

/// Error-reporting destination.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AlertsConfig {
    pub error_channel: String,
    /// Mention prepended to alerts, e.g. `<@U123>`.
    pub mention: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "bartender".to_string(),
                tick_ms: 100,
            },
            slack: SlackConfig { token: None },
            alerts: None,
            console: ConsoleConfig { enabled: true },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn load_env() -> Self {
        // Load from environment variables
        let mut config = Config::default();

        if let Ok(token) = std::env::var("SLACK_TOKEN") {
            config.slack.token = Some(token);
        }

        if let Ok(channel) = std::env::var("ERROR_CHANNEL") {
            config.alerts = Some(AlertsConfig {
                error_channel: channel,
                mention: std::env::var("ALERT_MENTION").ok(),
            });
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_yaml() {
        let yaml = serde_yaml::to_string(&Config::default()).expect("serialize");
        let parsed: Config = serde_yaml::from_str(&yaml).expect("parse");
        assert_eq!(parsed.bot.name, "bartender");
        assert_eq!(parsed.bot.tick_ms, 100);
        assert!(parsed.console.enabled);
    }

    #[test]
    fn parses_kebab_case_keys() {
        let yaml = r#"
bot:
  name: bartender
  tick-ms: 50
slack:
  token: xoxb-test
alerts:
  error-channel: ops
  mention: "<@U1>"
console:
  enabled: false
"#;
        let parsed: Config = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(parsed.bot.tick_ms, 50);
        assert_eq!(parsed.slack.token.as_deref(), Some("xoxb-test"));
        let alerts = parsed.alerts.expect("alerts");
        assert_eq!(alerts.error_channel, "ops");
        assert_eq!(alerts.mention.as_deref(), Some("<@U1>"));
    }
}
