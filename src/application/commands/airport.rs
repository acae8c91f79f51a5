//! FAA airport status lookup.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::CommandHandler;
use crate::domain::entities::Reply;

const STATUS_URL: &str = "http://services.faa.gov/airport/status";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// `air <CODE> [<CODE2> ...]` - current weather and delay status per airport.
///
/// Lookup failures become user-visible text. One outright fetch failure
/// stops the rest of the batch; a broken upstream will fail identically for
/// the remaining codes.
pub struct AirportCommand {
    http: Client,
}

impl AirportCommand {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }

    async fn fetch(&self, code: &str) -> Result<Value, reqwest::Error> {
        self.http
            .get(format!("{}/{}", STATUS_URL, code))
            .query(&[("format", "json")])
            .timeout(LOOKUP_TIMEOUT)
            .send()
            .await?
            .json()
            .await
    }
}

impl Default for AirportCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for AirportCommand {
    async fn run(&self, args: &[String]) -> Reply {
        if args.is_empty() {
            return Reply::text("Usage: `air <CODE> [<CODE2> ...]` e.g. `air LGA`.");
        }

        let mut responses = Vec::new();
        for code in args {
            match self.fetch(code).await {
                Ok(payload) => responses.push(format_status(code, &payload, args.len() > 1)),
                Err(e) => {
                    tracing::warn!("airport lookup for {} failed: {}", code, e);
                    responses.push(format!(
                        "Error loading data for {} (is the FAA API down?)",
                        code
                    ));
                    break;
                }
            }
        }

        Reply::Text(responses.join("\n\n"))
    }
}

/// Render one airport payload, falling back to a raw dump when the expected
/// fields are missing.
fn format_status(code: &str, payload: &Value, multi: bool) -> String {
    let formatted = (|| {
        let weather = payload.get("weather")?;
        let temp = scalar(weather.get("temp")?)?;
        let conditions = scalar(weather.get("weather")?)?;
        let wind = scalar(weather.get("wind")?)?;
        let visibility = scalar(weather.get("visibility")?)?;

        let delay_flag = payload.get("delay")?;
        let delayed =
            delay_flag.as_str() == Some("true") || delay_flag.as_bool() == Some(true);
        let delay = if delayed {
            let status = payload.get("status")?;
            format!(
                "Delay reason: {} - Min: {} - Max: {} - Average: {}",
                scalar(status.get("reason")?)?,
                scalar(status.get("minDelay")?)?,
                scalar(status.get("maxDelay")?)?,
                scalar(status.get("avgDelay")?)?,
            )
        } else {
            "No delay. :thumbsup:".to_string()
        };

        let header = if multi {
            format!("*{}*\n", code)
        } else {
            String::new()
        };
        Some(format!(
            "{}Weather: {} - {} - Wind: {} - Visibility: {}\n{}",
            header, temp, conditions, wind, visibility, delay
        ))
    })();

    formatted.unwrap_or_else(|| {
        format!(
            "Unrecognized format: ```{}```",
            serde_json::to_string_pretty(payload).unwrap_or_default()
        )
    })
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
