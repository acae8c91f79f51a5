use std::fs;
use std::time::Duration;

use clap::{Parser, Subcommand};

use bartender::application::bot::{Alerts, Bartender};
use bartender::application::commands::default_registry;
use bartender::infrastructure::adapters::console::ConsoleAdapter;
use bartender::infrastructure::adapters::slack::SlackAdapter;
use bartender::infrastructure::config::{AlertsConfig, Config};

#[derive(Parser)]
#[command(name = "bartender")]
#[command(about = "Bartender (Slack bot)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Slack API token (overrides config)
    #[arg(short, long)]
    token: Option<String>,

    /// Channel for error reports (overrides config)
    #[arg(long)]
    error_channel: Option<String>,

    /// User mention to prepend to error reports, e.g. "<@U123>"
    #[arg(long)]
    alert_mention: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let Cli {
        command,
        config,
        token,
        error_channel,
        alert_mention,
    } = Cli::parse();

    match command {
        Commands::Run => {
            run_bot(config, token, error_channel, alert_mention);
        }
        Commands::Version => {
            println!("bartender v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn run_bot(
    config_path: String,
    token_override: Option<String>,
    error_channel: Option<String>,
    alert_mention: Option<String>,
) {
    // Load config
    let mut config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    };

    // CLI overrides
    if token_override.is_some() {
        config.slack.token = token_override;
    }
    if let Some(channel) = error_channel {
        config.alerts = Some(AlertsConfig {
            error_channel: channel,
            mention: alert_mention
                .or_else(|| config.alerts.as_ref().and_then(|a| a.mention.clone())),
        });
    }

    tracing::info!("Starting bartender: {}", config.bot.name);

    let tick = Duration::from_millis(config.bot.tick_ms);
    let alerts = config.alerts.as_ref().map(|a| Alerts {
        channel: a.error_channel.clone(),
        mention: a.mention.clone(),
    });

    let rt = tokio::runtime::Runtime::new().unwrap();

    if let Some(token) = config.slack.token.clone() {
        rt.block_on(async {
            let (mut adapter, transport_sink) = SlackAdapter::new(token);
            if let Err(e) = adapter.connect().await {
                tracing::error!("Failed to connect to Slack: {}", e);
                return;
            }

            // The socket transport is external: it delivers raw events
            // through this sink for the lifetime of the loop.
            let _transport_sink = transport_sink;

            let mut bot = Bartender::new(adapter, default_registry())
                .with_tick(tick)
                .with_alerts(alerts);
            if let Err(e) = bot.run().await {
                tracing::error!("Event loop failed: {}", e);
            }
        });
    } else if config.console.enabled {
        // Run console bot (dev mode)
        rt.block_on(async {
            let adapter = ConsoleAdapter::new(config.bot.name.clone());
            let mut bot = Bartender::new(adapter, default_registry())
                .with_tick(tick)
                .with_alerts(alerts);
            if let Err(e) = bot.run().await {
                tracing::error!("Event loop failed: {}", e);
            }
        });
    } else {
        tracing::error!("No Slack token configured and console mode is disabled");
    }
}

fn init_config() {
    if std::path::Path::new("config.yaml").exists() {
        println!("config.yaml already exists");
        return;
    }

    match serde_yaml::to_string(&Config::default()) {
        Ok(yaml) => {
            if let Err(e) = fs::write("config.yaml", yaml) {
                eprintln!("Failed to write config.yaml: {}", e);
            } else {
                println!("Wrote default config to config.yaml");
            }
        }
        Err(e) => eprintln!("Failed to render default config: {}", e),
    }
}
