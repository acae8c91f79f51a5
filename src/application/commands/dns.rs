//! Domain name lookups.

use async_trait::async_trait;
use tokio::net::lookup_host;

use super::CommandHandler;
use crate::domain::entities::Reply;

/// `dns <domain> [<domain2> ...]` - resolve each name to an address.
///
/// Per-item failures are reported inline and the batch continues; every
/// domain resolves independently of the others.
pub struct DnsCommand;

#[async_trait]
impl CommandHandler for DnsCommand {
    async fn run(&self, args: &[String]) -> Reply {
        if args.is_empty() {
            return Reply::choice([
                "What domains would you like to look up?",
                "Please enter a list of domains to look up.",
            ]);
        }

        let mut responses = Vec::new();
        for arg in args {
            let host = unwrap_link(arg);
            let response = match lookup_host((host.as_str(), 0)).await {
                Ok(mut addrs) => match addrs.next() {
                    Some(addr) => addr.ip().to_string(),
                    None => format!("no addresses found for {}", host),
                },
                Err(e) => e.to_string(),
            };

            if args.len() == 1 {
                responses.push(response);
            } else {
                responses.push(format!("{}: {}", host, response));
            }
        }

        Reply::Text(responses.join("\n\n"))
    }
}

/// Strip chat link markup from an argument.
///
/// The platform rewrites pasted domains into `<http://example.com|example.com>`;
/// the label after the last `|` is what the user typed. Bare arguments pass
/// through, minus any scheme prefix.
fn unwrap_link(arg: &str) -> String {
    let inner = arg
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(arg);
    let label = inner.rsplit('|').next().unwrap_or(inner);
    let label = label
        .strip_prefix("http://")
        .or_else(|| label.strip_prefix("https://"))
        .unwrap_or(label);
    label.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_platform_link_markup() {
        assert_eq!(
            unwrap_link("<http://example.com|example.com>"),
            "example.com"
        );
        assert_eq!(unwrap_link("<https://example.com/>"), "example.com");
    }

    #[test]
    fn passes_bare_domains_through() {
        assert_eq!(unwrap_link("example.com"), "example.com");
        assert_eq!(unwrap_link("https://example.com"), "example.com");
    }

    #[tokio::test]
    async fn empty_args_ask_for_domains() {
        let reply = DnsCommand.run(&[]).await;
        assert!(matches!(reply, Reply::Choice(ref c) if c.len() == 2));
    }

    #[tokio::test]
    async fn localhost_resolves_to_loopback() {
        let reply = DnsCommand.run(&["localhost".to_string()]).await;
        let Reply::Text(text) = reply else {
            panic!("dns returns a single string");
        };
        assert!(text == "127.0.0.1" || text == "::1", "got {}", text);
    }
}
