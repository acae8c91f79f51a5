//! Event loop runtime
//!
//! The loop is the sole driver of the bot: it drains whatever inbound
//! events are ready without blocking, dispatches them by kind, flushes due
//! scheduled deliveries, then sleeps one tick. Scheduled-message latency is
//! therefore bounded below by the tick interval.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::application::commands::CommandRegistry;
use crate::application::errors::BotError;
use crate::application::router::{Outcome, Router};
use crate::application::scheduler::{Delay, MessageScheduler};
use crate::domain::entities::{InboundEvent, MessageEvent, Reply};
use crate::domain::traits::ChatClient;

/// Nominal tick interval.
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// Error-reporting destination for alerts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alerts {
    pub channel: String,
    pub mention: Option<String>,
}

/// Whether the loop should keep running after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Shutdown,
}

/// The bot runtime: one chat client, one router, one outbound schedule.
pub struct Bartender<C: ChatClient> {
    client: C,
    router: Router,
    scheduler: MessageScheduler,
    rng: StdRng,
    tick: Duration,
    alerts: Option<Alerts>,
}

impl<C: ChatClient> Bartender<C> {
    pub fn new(client: C, registry: CommandRegistry) -> Self {
        let identity = client.identity();
        Self {
            router: Router::new(identity, registry),
            client,
            scheduler: MessageScheduler::new(),
            rng: StdRng::from_entropy(),
            tick: DEFAULT_TICK,
            alerts: None,
        }
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn with_alerts(mut self, alerts: Option<Alerts>) -> Self {
        self.alerts = alerts;
        self
    }

    /// Replace the random source. Tests inject a seeded one.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Number of replies still waiting on their deadline.
    pub fn pending(&self) -> usize {
        self.scheduler.len()
    }

    /// Run until a privileged `quit` stops the loop.
    pub async fn run(&mut self) -> Result<(), BotError> {
        tracing::info!(
            "{} is tending the bar",
            self.client.identity().name
        );
        loop {
            if let Flow::Shutdown = self.step(Utc::now()).await? {
                tracing::info!("shutting down");
                return Ok(());
            }
            tokio::time::sleep(self.tick).await;
        }
    }

    /// One tick of the loop: poll, dispatch, flush.
    ///
    /// `now` is injected so tests can single-step deterministically.
    pub async fn step(&mut self, now: DateTime<Utc>) -> Result<Flow, BotError> {
        while let Some(event) = self.client.try_recv_event() {
            if let Flow::Shutdown = self.dispatch(event, now).await? {
                return Ok(Flow::Shutdown);
            }
        }
        self.flush_due(now).await;
        Ok(Flow::Continue)
    }

    async fn dispatch(&mut self, event: InboundEvent, now: DateTime<Utc>) -> Result<Flow, BotError> {
        match event {
            InboundEvent::Hello => {
                self.on_hello();
                Ok(Flow::Continue)
            }
            InboundEvent::Message(message) => self.on_message(message, now).await,
            InboundEvent::Other { kind } => {
                tracing::trace!("ignoring {} event", kind);
                Ok(Flow::Continue)
            }
        }
    }

    /// Hook for connection-established logic.
    fn on_hello(&self) {
        tracing::debug!("connection established");
    }

    async fn on_message(&mut self, message: MessageEvent, now: DateTime<Utc>) -> Result<Flow, BotError> {
        let outcome = match self.router.route(&self.client, &message).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("routing failed: {}", e);
                self.report_error(&e).await;
                return Ok(Flow::Continue);
            }
        };

        match outcome {
            Outcome::None => Ok(Flow::Continue),
            Outcome::Send {
                reply,
                channel_id,
                delay,
            } => {
                match self.send(reply, &channel_id, delay, now).await {
                    Ok(()) => {}
                    // An invalid delay is a wiring bug, not a runtime hiccup
                    Err(e @ BotError::Schedule(_)) => return Err(e),
                    Err(e) => {
                        tracing::error!("send to {} failed: {}", channel_id, e);
                        self.report_error(&e).await;
                    }
                }
                Ok(Flow::Continue)
            }
            Outcome::Alert { origin_channel_id } => {
                self.send_alert(&origin_channel_id).await;
                Ok(Flow::Continue)
            }
            Outcome::Shutdown {
                farewell,
                channel_id,
            } => {
                if let Err(e) = self.send_now(&farewell, &channel_id).await {
                    tracing::error!("farewell failed: {}", e);
                }
                Ok(Flow::Shutdown)
            }
        }
    }

    /// Send a reply, via the scheduler unless the delay policy is `None`.
    pub async fn send(
        &mut self,
        reply: Reply,
        channel_id: &str,
        delay: Delay,
        now: DateTime<Utc>,
    ) -> Result<(), BotError> {
        if let Delay::None = delay {
            return self.send_now(&reply, channel_id).await;
        }
        self.scheduler
            .enqueue(reply, channel_id, delay, now, &mut self.rng)?;
        Ok(())
    }

    /// Resolve the candidate set and post through the adapter.
    async fn send_now(&mut self, reply: &Reply, channel_id: &str) -> Result<(), BotError> {
        let text = reply.pick(&mut self.rng).to_string();
        self.client.post_message(channel_id, &text).await
    }

    async fn flush_due(&mut self, now: DateTime<Utc>) {
        for delivery in self.scheduler.drain_due(now) {
            if let Err(e) = self.send_now(&delivery.reply, &delivery.channel_id).await {
                tracing::error!("delivery to {} failed: {}", delivery.channel_id, e);
                self.report_error(&e).await;
            }
        }
    }

    async fn send_alert(&mut self, origin_channel_id: &str) {
        let result = match self.alerts.clone() {
            Some(alerts) => {
                let text = format!(
                    "{}Test alert from {}.",
                    mention_prefix(&alerts.mention),
                    self.client.identity().name
                );
                self.client.post_message(&alerts.channel, &text).await
            }
            None => {
                self.client
                    .post_message(origin_channel_id, "No error channel is configured.")
                    .await
            }
        };
        if let Err(e) = result {
            tracing::error!("alert failed: {}", e);
        }
    }

    /// Best-effort report of a runtime failure to the alerts channel.
    async fn report_error(&self, error: &BotError) {
        let Some(alerts) = &self.alerts else {
            return;
        };
        let text = format!(
            "{}{} error: {}",
            mention_prefix(&alerts.mention),
            self.client.identity().name,
            error
        );
        if let Err(e) = self.client.post_message(&alerts.channel, &text).await {
            tracing::warn!("error report failed: {}", e);
        }
    }
}

fn mention_prefix(mention: &Option<String>) -> String {
    mention
        .as_ref()
        .map(|m| format!("{} ", m))
        .unwrap_or_default()
}
