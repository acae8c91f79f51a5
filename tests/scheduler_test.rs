//! Scheduler contract tests
//! Run with: cargo test --test scheduler_test

use bartender::application::errors::ScheduleError;
use bartender::application::scheduler::{Delay, MessageScheduler};
use bartender::domain::entities::Reply;
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn resolved_deadlines_stay_inside_the_requested_window() {
    let now = Utc::now();
    let mut rng = StdRng::seed_from_u64(1);

    let fixed = Delay::Fixed(200).resolve(now, &mut rng).unwrap().unwrap();
    assert_eq!(fixed, now + Duration::milliseconds(200));

    for _ in 0..200 {
        let deadline = Delay::Range(150, 450).resolve(now, &mut rng).unwrap().unwrap();
        assert!(deadline >= now + Duration::milliseconds(150));
        assert!(deadline <= now + Duration::milliseconds(450));
    }
}

#[test]
fn entries_become_due_exactly_at_their_deadline() {
    let now = Utc::now();
    let mut rng = StdRng::seed_from_u64(2);
    let mut scheduler = MessageScheduler::new();
    scheduler
        .enqueue(Reply::text("on time"), "C1", Delay::Fixed(100), now, &mut rng)
        .unwrap();

    // One millisecond early: nothing is due yet
    assert!(scheduler.drain_due(now + Duration::milliseconds(99)).is_empty());
    assert_eq!(scheduler.len(), 1);

    // At the deadline: due
    let due = scheduler.drain_due(now + Duration::milliseconds(100));
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].channel_id, "C1");
    assert!(scheduler.is_empty());
}

#[test]
fn past_deadline_entries_all_flush_in_one_call_and_never_twice() {
    let now = Utc::now();
    let mut rng = StdRng::seed_from_u64(3);
    let mut scheduler = MessageScheduler::new();
    for i in 0..10 {
        scheduler
            .enqueue(
                Reply::Text(format!("message {}", i)),
                "C1",
                Delay::Fixed(i),
                now,
                &mut rng,
            )
            .unwrap();
    }

    let due = scheduler.drain_due(now + Duration::seconds(1));
    assert_eq!(due.len(), 10);
    assert!(scheduler.is_empty());

    // Drained entries are gone; a second flush is a no-op
    assert!(scheduler.drain_due(now + Duration::seconds(10)).is_empty());
}

#[test]
fn flush_on_an_empty_schedule_is_safe() {
    let mut scheduler = MessageScheduler::new();
    for _ in 0..3 {
        assert!(scheduler.drain_due(Utc::now()).is_empty());
    }
}

#[test]
fn inverted_range_faults_instead_of_queueing() {
    let now = Utc::now();
    let mut rng = StdRng::seed_from_u64(4);
    let mut scheduler = MessageScheduler::new();
    let err = scheduler
        .enqueue(Reply::text("never"), "C1", Delay::Range(400, 100), now, &mut rng)
        .unwrap_err();
    assert_eq!(err, ScheduleError::InvalidDelay { min: 400, max: 100 });
    assert!(scheduler.is_empty());
}
