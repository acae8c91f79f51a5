//! Outbound message scheduling
//!
//! Replies are usually held back for a short randomized interval so the bot
//! does not answer faster than a human could type. The scheduler owns the
//! pending deliveries; the event loop drains due ones every tick and sends
//! them through the adapter.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::application::errors::ScheduleError;
use crate::domain::entities::Reply;

/// How long to hold a reply before sending it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delay {
    /// Send immediately, bypassing the queue.
    None,
    /// Send after exactly this many milliseconds.
    Fixed(u64),
    /// Send after a uniformly random number of milliseconds in `[min, max]`.
    Range(u64, u64),
}

impl Delay {
    /// Resolve the policy to an absolute deadline relative to `now`.
    ///
    /// Resolution happens at enqueue time, not at flush time. `Ok(None)`
    /// means the reply should not be queued at all.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Option<DateTime<Utc>>, ScheduleError> {
        let millis = match *self {
            Delay::None => return Ok(None),
            Delay::Fixed(ms) => ms,
            Delay::Range(min, max) => {
                if min > max {
                    return Err(ScheduleError::InvalidDelay { min, max });
                }
                rng.gen_range(min..=max)
            }
        };
        Ok(Some(now + Duration::milliseconds(millis as i64)))
    }
}

/// A reply waiting for its deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledDelivery {
    pub deliver_at: DateTime<Utc>,
    pub reply: Reply,
    pub channel_id: String,
}

/// Queue of replies scheduled for future delivery.
///
/// Entries are kept in arrival order, but delivery is deadline-driven, so
/// the retention order carries no contract. There is no size bound and no
/// persistence; pending entries are lost on process exit.
#[derive(Debug, Default)]
pub struct MessageScheduler {
    queue: Vec<ScheduledDelivery>,
}

impl MessageScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `reply` for `channel_id`, resolving `delay` against `now`.
    ///
    /// Returns the resolved deadline. `Delay::None` becomes an entry that
    /// is due on the next flush; immediate sends normally bypass the queue
    /// entirely.
    pub fn enqueue<R: Rng + ?Sized>(
        &mut self,
        reply: Reply,
        channel_id: impl Into<String>,
        delay: Delay,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<DateTime<Utc>, ScheduleError> {
        let deliver_at = delay
            .resolve(now, rng)?
            .unwrap_or(now);
        self.queue.push(ScheduledDelivery {
            deliver_at,
            reply,
            channel_id: channel_id.into(),
        });
        Ok(deliver_at)
    }

    /// Remove and return every delivery whose deadline has passed.
    ///
    /// Retained entries keep their arrival order. Safe to call every tick,
    /// including on an empty queue.
    pub fn drain_due(&mut self, now: DateTime<Utc>) -> Vec<ScheduledDelivery> {
        let mut due = Vec::new();
        let mut retained = Vec::with_capacity(self.queue.len());
        for delivery in self.queue.drain(..) {
            if delivery.deliver_at <= now {
                due.push(delivery);
            } else {
                retained.push(delivery);
            }
        }
        self.queue = retained;
        due
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Deadline of the entry that will become due soonest.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.queue.iter().map(|d| d.deliver_at).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn fixed_delay_resolves_to_exact_deadline() {
        let now = Utc::now();
        let deadline = Delay::Fixed(250).resolve(now, &mut rng()).unwrap().unwrap();
        assert_eq!(deadline, now + Duration::milliseconds(250));
    }

    #[test]
    fn range_delay_resolves_within_bounds() {
        let now = Utc::now();
        let mut rng = rng();
        for _ in 0..100 {
            let deadline = Delay::Range(150, 450).resolve(now, &mut rng).unwrap().unwrap();
            assert!(deadline >= now + Duration::milliseconds(150));
            assert!(deadline <= now + Duration::milliseconds(450));
        }
    }

    #[test]
    fn degenerate_range_is_allowed() {
        let now = Utc::now();
        let deadline = Delay::Range(300, 300).resolve(now, &mut rng()).unwrap().unwrap();
        assert_eq!(deadline, now + Duration::milliseconds(300));
    }

    #[test]
    fn inverted_range_is_a_contract_violation() {
        let now = Utc::now();
        let err = Delay::Range(500, 100).resolve(now, &mut rng()).unwrap_err();
        assert_eq!(err, ScheduleError::InvalidDelay { min: 500, max: 100 });
    }

    #[test]
    fn no_delay_resolves_to_nothing() {
        let now = Utc::now();
        assert_eq!(Delay::None.resolve(now, &mut rng()).unwrap(), None);
    }

    #[test]
    fn drain_keeps_future_entries_in_arrival_order() {
        let now = Utc::now();
        let mut scheduler = MessageScheduler::new();
        let mut rng = rng();
        scheduler
            .enqueue(Reply::text("later"), "C1", Delay::Fixed(5_000), now, &mut rng)
            .unwrap();
        scheduler
            .enqueue(Reply::text("due"), "C1", Delay::Fixed(10), now, &mut rng)
            .unwrap();
        scheduler
            .enqueue(Reply::text("latest"), "C1", Delay::Fixed(9_000), now, &mut rng)
            .unwrap();

        let due = scheduler.drain_due(now + Duration::milliseconds(100));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].reply, Reply::text("due"));
        assert_eq!(scheduler.len(), 2);
        assert_eq!(
            scheduler.next_deadline(),
            Some(now + Duration::milliseconds(5_000))
        );
    }
}
