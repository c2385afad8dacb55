use std::sync::mpsc;
use std::time::Duration;

use anonchat::Variant;
use anonchat::core::action::Action;
use anonchat::core::config::{ChatConfig, MAX_INTERESTS, PAIRED_TICK_MS};
use anonchat::core::peer::{
    ANONYMOUS_NAMES, BROADCAST_MESSAGES, ONLINE_MAX, ONLINE_MIN, PAIRED_MESSAGES,
};
use anonchat::core::random::ScriptedRandom;
use anonchat::core::state::{Phase, Session};
use anonchat::core::timeline::{ChatMessage, NewMessage, Origin, Timeline};
use anonchat::runtime::{ManualScheduler, SessionDriver, TokioScheduler};
use chrono::{DateTime, TimeZone, TimeDelta, Utc};

// ============================================================================
// Helper Functions
// ============================================================================

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

fn session(variant: Variant, values: Vec<f64>) -> Session {
    Session::new(
        ChatConfig::for_variant(variant),
        Box::new(ScriptedRandom::new(values)),
    )
}

/// Driver on virtual time whose random source always returns `value`.
fn driver(variant: Variant, value: f64) -> SessionDriver<ManualScheduler> {
    SessionDriver::new(session(variant, vec![value]), ManualScheduler::new(t0()))
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn ticks(count: u64) -> Duration {
    ms(PAIRED_TICK_MS * count)
}

/// Starts matching and waits long enough for any match delay.
fn connect(driver: &mut SessionDriver<ManualScheduler>) {
    driver.start_matching();
    driver.advance(ms(5000));
    assert_eq!(driver.session().phase(), Phase::Connected);
}

fn peer_count(driver: &SessionDriver<ManualScheduler>) -> usize {
    driver
        .session()
        .timeline()
        .snapshot()
        .iter()
        .filter(|message| message.origin == Origin::Peer)
        .count()
}

// ============================================================================
// Interest Set
// ============================================================================

#[test]
fn test_interest_set_is_capped_and_deduplicated() {
    let mut driver = driver(Variant::Paired, 0.5);
    let names = [
        "Gaming", "Gaming", " Gaming ", "Music", "Art", "Music", "Tech", "Food", "Books", "Anime",
    ];
    for name in names {
        driver.add_interest(name);
        let interests = driver.session().interests();
        assert!(interests.len() <= MAX_INTERESTS);

        let mut seen = interests.names();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), interests.len(), "duplicate after adding {name:?}");
    }
    assert_eq!(
        driver.session().interests().names(),
        vec!["Gaming", "Music", "Art", "Tech", "Food"]
    );
}

#[test]
fn test_remove_interest_frees_a_slot() {
    let mut driver = driver(Variant::Paired, 0.5);
    for name in ["Gaming", "Music", "Art", "Tech", "Food"] {
        driver.add_interest(name);
    }
    let id = driver.session().interests().list()[1].id;
    driver.remove_interest(id);
    driver.add_interest("Books");
    assert_eq!(
        driver.session().interests().names(),
        vec!["Gaming", "Art", "Tech", "Food", "Books"]
    );
}

// ============================================================================
// Sending
// ============================================================================

#[test]
fn test_blank_messages_never_touch_the_timeline() {
    for variant in [Variant::Broadcast, Variant::Paired, Variant::Simple] {
        let mut driver = driver(variant, 0.0);
        driver.mount();

        driver.send_message("");
        driver.send_message("   ");
        assert!(driver.session().timeline().is_empty(), "{variant:?} idle");

        if variant == Variant::Paired {
            driver.start_matching();
            driver.send_message("   ");
            assert!(driver.session().timeline().is_empty(), "searching");

            driver.advance(ms(5000));
            assert_eq!(driver.session().phase(), Phase::Connected);
            driver.send_message("");
            driver.send_message(" \t ");
            assert!(driver.session().timeline().is_empty(), "connected");
        }

        driver.unmount();
        driver.send_message("   ");
        assert!(driver.session().timeline().is_empty(), "{variant:?} unmounted");
    }
}

#[test]
fn test_paired_send_requires_connection() {
    let mut driver = driver(Variant::Paired, 0.0);
    driver.send_message("anyone?");
    assert!(driver.session().timeline().is_empty());

    connect(&mut driver);
    driver.send_message("hello");
    let snapshot = driver.session().timeline().snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].origin, Origin::Own);
    assert_eq!(snapshot[0].sender_label, None);
}

#[test]
fn test_broadcast_own_messages_are_labelled() {
    let mut driver = driver(Variant::Broadcast, 0.0);
    driver.mount();
    driver.send_message("hi all");
    let message = &driver.session().timeline().snapshot()[0];
    assert_eq!(message.sender_label.as_deref(), Some("You"));
}

// ============================================================================
// Matching
// ============================================================================

#[test]
fn test_gaming_scenario() {
    let mut driver = driver(Variant::Paired, 0.5);
    driver.add_interest("Gaming");
    driver.start_matching();
    assert_eq!(driver.session().phase(), Phase::Searching);

    driver.advance(ms(5000));

    let session = driver.session();
    assert_eq!(session.phase(), Phase::Connected);
    let partner = session.partner_label().unwrap();
    assert!(ANONYMOUS_NAMES.contains(&partner));
    assert_eq!(session.interests().names(), vec!["Gaming"]);
}

#[test]
fn test_partner_assigned_before_first_peer_message() {
    for value in [0.0, 0.3, 0.81, 0.99] {
        let mut driver = driver(Variant::Paired, value);
        driver.start_matching();
        // Step in small increments so every intermediate state is observed
        for _ in 0..40 {
            driver.advance(ms(500));
            let session = driver.session();
            if !session.timeline().is_empty() {
                let partner = session.partner_label().unwrap();
                assert!(!partner.is_empty());
                assert!(ANONYMOUS_NAMES.contains(&partner));
            }
        }
    }
}

#[test]
fn test_match_delay_stays_within_bounds() {
    for value in [0.0, 0.5, 0.999] {
        let mut driver = driver(Variant::Paired, value);
        driver.start_matching();
        driver.advance(ms(1999));
        assert_eq!(driver.session().phase(), Phase::Searching, "r={value}");
        driver.advance(ms(3001));
        assert_eq!(driver.session().phase(), Phase::Connected, "r={value}");
    }
}

#[test]
fn test_cancel_while_searching_never_connects() {
    let mut driver = driver(Variant::Paired, 0.5);
    driver.start_matching();
    driver.advance(ms(1000));
    driver.disconnect();

    assert_eq!(driver.session().phase(), Phase::Idle);
    assert_eq!(driver.scheduler().pending(), 0);

    driver.advance(ms(60_000));
    assert_eq!(driver.session().phase(), Phase::Idle);
    assert_eq!(driver.session().partner_label(), None);
}

#[test]
fn test_stale_match_continuation_is_ignored() {
    let mut driver = driver(Variant::Paired, 0.5);
    driver.start_matching();
    driver.disconnect();

    // The first search was issued token 0; deliver it as if it had already
    // been queued when the search was cancelled.
    driver.dispatch(Action::MatchFound { token: 0 });
    assert_eq!(driver.session().phase(), Phase::Idle);

    driver.start_matching();
    driver.dispatch(Action::MatchFound { token: 0 });
    assert_eq!(driver.session().phase(), Phase::Searching);
}

#[test]
fn test_broadcast_ignores_matching() {
    let mut driver = driver(Variant::Broadcast, 0.5);
    driver.mount();
    driver.start_matching();
    driver.disconnect();
    assert_eq!(driver.session().phase(), Phase::Idle);
    assert_eq!(driver.session().partner_label(), None);
}

// ============================================================================
// Peer Generator
// ============================================================================

#[test]
fn test_twenty_ticks_at_point_nine() {
    let mut driver = driver(Variant::Paired, 0.9);
    connect(&mut driver);
    assert!(driver.session().timeline().is_empty());

    driver.advance(ticks(20));

    let snapshot = driver.session().timeline().snapshot();
    assert_eq!(snapshot.len(), 20);
    for message in snapshot {
        assert_eq!(message.origin, Origin::Peer);
        assert!(PAIRED_MESSAGES.contains(&message.text.as_str()));
        assert_eq!(message.sender_label, None);
    }
}

#[test]
fn test_low_draws_emit_nothing() {
    let mut driver = driver(Variant::Paired, 0.5);
    connect(&mut driver);
    driver.advance(ticks(20));
    assert_eq!(peer_count(&driver), 0);
}

#[test]
fn test_disconnect_stops_emission() {
    let mut driver = driver(Variant::Paired, 0.9);
    connect(&mut driver);
    driver.advance(ticks(3));
    assert_eq!(peer_count(&driver), 3);

    driver.disconnect();
    assert_eq!(driver.session().phase(), Phase::Idle);
    assert!(driver.session().timeline().is_empty());
    assert_eq!(driver.outstanding_timers(), 0);

    driver.advance(ticks(10));
    assert!(driver.session().timeline().is_empty());
    assert!(!driver.session().is_generating());
}

#[test]
fn test_stale_peer_tick_is_ignored() {
    let mut driver = driver(Variant::Paired, 0.9);
    connect(&mut driver);
    driver.advance(ticks(1));
    let stale = driver.session().timeline().len();
    assert_eq!(stale, 1);

    driver.disconnect();
    driver.start_matching();
    driver.advance(ms(5000));
    // Run ids are never reused, so the first connection's tick is dead
    driver.dispatch(Action::PeerTick {
        run: anonchat::core::peer::RunId(0),
    });
    assert!(driver.session().timeline().is_empty());
}

#[test]
fn test_reconnect_keeps_interests_and_picks_new_partner_run() {
    let mut driver = driver(Variant::Paired, 0.9);
    driver.add_interest("Travel");
    connect(&mut driver);
    driver.disconnect();
    assert_eq!(driver.session().interests().names(), vec!["Travel"]);

    connect(&mut driver);
    driver.advance(ticks(2));
    assert_eq!(peer_count(&driver), 2);
}

#[test]
fn test_broadcast_messages_and_gauge_bounds() {
    // decision, text, label, gauge: always emit, always go up
    let mut driver = SessionDriver::new(
        session(Variant::Broadcast, vec![0.99]),
        ManualScheduler::new(t0()),
    );
    driver.mount();
    driver.advance(ms(5000 * 100 + 1000));

    let session = driver.session();
    assert_eq!(session.timeline().len(), 100);
    assert_eq!(session.online_count(), Some(ONLINE_MAX));
    for message in session.timeline().snapshot() {
        assert!(BROADCAST_MESSAGES.contains(&message.text.as_str()));
        let label = message.sender_label.as_deref().unwrap();
        assert!(ANONYMOUS_NAMES.contains(&label));
    }
}

#[test]
fn test_broadcast_gauge_floor() {
    // Emit, then always step the gauge down
    let mut driver = SessionDriver::new(
        session(Variant::Broadcast, vec![0.8, 0.0, 0.0, 0.2]),
        ManualScheduler::new(t0()),
    );
    driver.mount();
    for _ in 0..40 {
        driver.advance(ms(5000));
        let count = driver.session().online_count().unwrap();
        assert!((ONLINE_MIN..=ONLINE_MAX).contains(&count));
    }
    assert_eq!(driver.session().online_count(), Some(ONLINE_MIN));
}

#[test]
fn test_simple_room_has_no_gauge() {
    let mut driver = driver(Variant::Simple, 0.9);
    driver.mount();
    driver.advance(ms(15_000));
    assert_eq!(driver.session().online_count(), None);
    assert_eq!(driver.session().timeline().len(), 3);
}

#[test]
fn test_peer_messages_are_stamped_with_tick_time() {
    let mut driver = driver(Variant::Paired, 0.9);
    connect(&mut driver);
    driver.advance(ticks(1));
    // Connected at 4700ms, first tick one period later
    let message = &driver.session().timeline().snapshot()[0];
    assert_eq!(message.sent_at, t0() + TimeDelta::milliseconds(8700));
}

// ============================================================================
// Timeline
// ============================================================================

fn new_message(i: usize) -> NewMessage {
    NewMessage {
        text: format!("message {i}"),
        origin: if i % 3 == 0 { Origin::Own } else { Origin::Peer },
        sent_at: t0() + TimeDelta::seconds(i as i64),
        sender_label: (i % 2 == 0).then(|| format!("sender {i}")),
    }
}

#[test]
fn test_timeline_preserves_order_and_fields() {
    for count in [0, 1, 25] {
        let mut timeline = Timeline::new();
        let ids: Vec<_> = (0..count).map(|i| timeline.append(new_message(i))).collect();

        let snapshot: &[ChatMessage] = timeline.snapshot();
        assert_eq!(snapshot.len(), count);
        for (i, message) in snapshot.iter().enumerate() {
            let expected = new_message(i);
            assert_eq!(message.id, ids[i]);
            assert_eq!(message.text, expected.text);
            assert_eq!(message.origin, expected.origin);
            assert_eq!(message.sent_at, expected.sent_at);
            assert_eq!(message.sender_label, expected.sender_label);
        }
    }
}

// ============================================================================
// Tokio runtime
// ============================================================================

fn drain(driver: &mut SessionDriver<TokioScheduler>, rx: &mpsc::Receiver<Action>) {
    while let Ok(action) = rx.try_recv() {
        driver.dispatch(action);
    }
}

#[tokio::test(start_paused = true)]
async fn test_tokio_timers_drive_a_session() {
    let (tx, rx) = mpsc::channel();
    let mut driver =
        SessionDriver::new(session(Variant::Paired, vec![0.9]), TokioScheduler::new(tx));

    driver.start_matching();
    tokio::time::sleep(ms(5000)).await;
    drain(&mut driver, &rx);
    assert_eq!(driver.session().phase(), Phase::Connected);

    // Connected at 5000ms; ticks at 9000, 13000 and 17000
    tokio::time::sleep(ms(12_500)).await;
    drain(&mut driver, &rx);
    assert_eq!(driver.session().timeline().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_tick_queued_before_disconnect_is_dropped() {
    let (tx, rx) = mpsc::channel();
    let mut driver =
        SessionDriver::new(session(Variant::Paired, vec![0.9]), TokioScheduler::new(tx));

    driver.start_matching();
    tokio::time::sleep(ms(5000)).await;
    drain(&mut driver, &rx);
    assert_eq!(driver.session().phase(), Phase::Connected);

    // Let a tick land in the channel without dispatching it
    tokio::time::sleep(ms(4500)).await;
    let queued: Vec<Action> = rx.try_iter().collect();
    assert!(!queued.is_empty());

    driver.disconnect();
    for action in queued {
        driver.dispatch(action);
    }
    assert!(driver.session().timeline().is_empty());
    assert_eq!(driver.scheduler().active(), 0);

    tokio::time::sleep(ms(20_000)).await;
    drain(&mut driver, &rx);
    assert!(driver.session().timeline().is_empty());
}
