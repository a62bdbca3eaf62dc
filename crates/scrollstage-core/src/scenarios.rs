//! End-to-end gesture scenarios against a mounted orchestrator

use std::time::Duration;

use tokio::sync::mpsc;

use crate::animator::{spawn_deferred_commit, TransitionTicket};
use crate::config::{ScrollerConfig, VisibilityConfig};
use crate::coordinator::ScrollCoordinator;
use crate::gesture::{InputEvent, NavKey};
use crate::listener::EventLog;
use crate::orchestrator::{Disposition, Orchestrator};
use crate::section::{Geometry, ScrollExtent, SectionId, SectionSpec};
use crate::visibility::best_visible;

const VIEWPORT: f32 = 500.0;

fn container(extents: &[ScrollExtent]) -> (Orchestrator, EventLog, Vec<SectionId>) {
    let log = EventLog::new();
    let mut orchestrator = Orchestrator::new(
        0,
        &ScrollerConfig::default(),
        &VisibilityConfig::default(),
        ScrollCoordinator::new(),
        Box::new(log.clone()),
    );
    let ids = extents
        .iter()
        .map(|extent| {
            orchestrator
                .register(SectionSpec::default().with_extent(*extent))
                .unwrap()
        })
        .collect();
    orchestrator.mount().unwrap();
    (orchestrator, log, ids)
}

fn fitting(count: usize) -> (Orchestrator, EventLog, Vec<SectionId>) {
    container(&vec![ScrollExtent::fitting(VIEWPORT); count])
}

fn started(disposition: Disposition) -> Option<(usize, usize)> {
    match disposition {
        Disposition::TransitionStarted(ticket) => Some((ticket.from, ticket.to)),
        _ => None,
    }
}

/// Move to `index` with arrow keys, committing each step
fn walk_to(orchestrator: &mut Orchestrator, index: usize, mut now: u64) -> u64 {
    while orchestrator.current_index() < index {
        orchestrator.handle(&InputEvent::key(NavKey::ArrowDown, now));
        now += 500;
        orchestrator.tick(now);
        now += 100;
    }
    now
}

#[test]
fn test_wheel_sequence_over_five_sections() {
    let (mut orchestrator, log, _) = fitting(5);
    assert_eq!(orchestrator.current_index(), 0);

    assert_eq!(started(orchestrator.handle(&InputEvent::wheel(120.0, 0))), Some((0, 1)));
    // Inside the throttle window
    assert_eq!(orchestrator.handle(&InputEvent::wheel(120.0, 50)), Disposition::Ignored);
    assert_eq!(orchestrator.tick(500), Some(1));
    assert_eq!(log.indices(), vec![0, 1]);

    assert_eq!(started(orchestrator.handle(&InputEvent::wheel(120.0, 600))), Some((1, 2)));
    assert_eq!(orchestrator.tick(1_100), Some(2));
    assert_eq!(log.indices(), vec![0, 1, 2]);
}

#[test]
fn test_throttle_window() {
    let (mut orchestrator, _, _) = fitting(5);
    orchestrator.handle(&InputEvent::wheel(120.0, 0));
    orchestrator.handle(&InputEvent::wheel(120.0, 100));
    orchestrator.tick(2_000);
    assert_eq!(orchestrator.current_index(), 1);

    let (mut orchestrator, _, _) = fitting(5);
    orchestrator.handle(&InputEvent::wheel(120.0, 0));
    orchestrator.handle(&InputEvent::wheel(120.0, 600));
    orchestrator.tick(2_000);
    assert_eq!(orchestrator.current_index(), 2);
}

#[test]
fn test_small_and_modified_wheel_ignored() {
    let (mut orchestrator, _, _) = fitting(3);
    assert_eq!(orchestrator.handle(&InputEvent::wheel(0.5, 0)), Disposition::Ignored);
    let zoom = InputEvent::Wheel {
        delta_y: 120.0,
        ctrl: true,
        meta: false,
        in_alt_container: false,
        at_ms: 0,
    };
    assert_eq!(orchestrator.handle(&zoom), Disposition::Ignored);
    let nested = InputEvent::Wheel {
        delta_y: 120.0,
        ctrl: false,
        meta: false,
        in_alt_container: true,
        at_ms: 0,
    };
    assert_eq!(orchestrator.handle(&nested), Disposition::Ignored);
    assert!(!orchestrator.is_transitioning());
}

#[test]
fn test_inner_scroll_consumes_until_bottom() {
    let (mut orchestrator, log, ids) = container(&[
        ScrollExtent::new(0.0, 1000.0, VIEWPORT),
        ScrollExtent::fitting(VIEWPORT),
    ]);

    assert_eq!(orchestrator.handle(&InputEvent::wheel(120.0, 0)), Disposition::ConsumedLocally);
    assert_eq!(orchestrator.handle(&InputEvent::key(NavKey::ArrowDown, 10)), Disposition::Ignored);
    orchestrator.handle(&InputEvent::touch_start(10.0, 500.0, 20));
    orchestrator.handle(&InputEvent::touch_move(10.0, 480.0, 30));
    assert_eq!(
        orchestrator.handle(&InputEvent::touch_move(10.0, 440.0, 40)),
        Disposition::ConsumedLocally
    );
    assert_eq!(orchestrator.current_index(), 0);
    assert_eq!(log.indices(), vec![0]);

    orchestrator.on_section_scroll(ids[0], 500.0).unwrap();
    assert_eq!(started(orchestrator.handle(&InputEvent::wheel(120.0, 100))), Some((0, 1)));
    assert_eq!(orchestrator.tick(600), Some(1));
}

#[test]
fn test_inner_scroll_retreat_needs_top() {
    let (mut orchestrator, _, ids) = container(&[
        ScrollExtent::fitting(VIEWPORT),
        ScrollExtent::new(0.0, 1000.0, VIEWPORT),
    ]);
    let now = walk_to(&mut orchestrator, 1, 0);
    orchestrator.on_section_scroll(ids[1], 250.0).unwrap();

    assert_eq!(orchestrator.handle(&InputEvent::wheel(-120.0, now)), Disposition::ConsumedLocally);
    orchestrator.on_section_scroll(ids[1], 0.0).unwrap();
    assert_eq!(started(orchestrator.handle(&InputEvent::wheel(-120.0, now + 10))), Some((1, 0)));
}

#[test]
fn test_keyboard_stops_at_last_section() {
    let (mut orchestrator, log, _) = fitting(5);
    let now = walk_to(&mut orchestrator, 4, 0);
    assert_eq!(orchestrator.current_index(), 4);
    assert!(!orchestrator.can_advance());

    assert_eq!(orchestrator.handle(&InputEvent::key(NavKey::ArrowDown, now)), Disposition::Ignored);
    assert_eq!(orchestrator.tick(now + 1_000), None);
    assert_eq!(orchestrator.current_index(), 4);
    assert_eq!(log.indices(), vec![0, 1, 2, 3, 4]);

    // Unrelated keys never move
    assert_eq!(orchestrator.handle(&InputEvent::key(NavKey::Other, now)), Disposition::Ignored);
}

#[test]
fn test_touch_swipes_both_ways() {
    let (mut orchestrator, _, _) = fitting(5);
    let now = walk_to(&mut orchestrator, 2, 0);

    orchestrator.handle(&InputEvent::touch_start(100.0, 500.0, now));
    // First move only seeds the anchor
    assert_eq!(
        orchestrator.handle(&InputEvent::touch_move(100.0, 480.0, now + 10)),
        Disposition::Ignored
    );
    assert_eq!(
        started(orchestrator.handle(&InputEvent::touch_move(100.0, 440.0, now + 20))),
        Some((2, 3))
    );
    orchestrator.handle(&InputEvent::TouchEnd { at_ms: now + 30 });
    assert_eq!(orchestrator.tick(now + 520), Some(3));

    let now = now + 1_000;
    orchestrator.handle(&InputEvent::touch_start(100.0, 440.0, now));
    orchestrator.handle(&InputEvent::touch_move(100.0, 460.0, now + 10));
    assert_eq!(
        started(orchestrator.handle(&InputEvent::touch_move(100.0, 500.0, now + 20))),
        Some((3, 2))
    );
    assert_eq!(orchestrator.tick(now + 520), Some(2));
}

#[test]
fn test_horizontal_drag_in_carousel_ignored() {
    let (mut orchestrator, _, _) = fitting(3);
    orchestrator.handle(&InputEvent::touch_start(100.0, 500.0, 0));
    let sideways = |x: f32, y: f32, at_ms: u64| InputEvent::TouchMove {
        x,
        y,
        in_horizontal_area: true,
        at_ms,
    };
    assert_eq!(orchestrator.handle(&sideways(140.0, 495.0, 10)), Disposition::Ignored);
    assert_eq!(orchestrator.handle(&sideways(200.0, 490.0, 20)), Disposition::Ignored);
    assert!(!orchestrator.is_transitioning());
}

#[test]
fn test_index_stays_in_bounds_under_mixed_input() {
    let (mut orchestrator, log, _) = fitting(4);
    let mut now = 0;
    for round in 0..40u64 {
        let event = match round % 5 {
            0 => InputEvent::wheel(120.0, now),
            1 => InputEvent::key(NavKey::ArrowDown, now),
            2 => InputEvent::wheel(-60.0, now),
            3 => InputEvent::key(NavKey::ArrowUp, now),
            _ => InputEvent::wheel(240.0, now),
        };
        orchestrator.handle(&event);
        assert!(orchestrator.current_index() < orchestrator.section_count());
        now += 137;
        orchestrator.tick(now);
    }
    assert!(log.indices().iter().all(|&i| i < 4));
}

#[test]
fn test_advance_at_end_is_idempotent() {
    let (mut orchestrator, log, _) = fitting(3);
    let now = walk_to(&mut orchestrator, 2, 0);
    for step in 0..5 {
        assert_eq!(
            orchestrator.handle(&InputEvent::wheel(120.0, now + step * 1_000)),
            Disposition::Rejected
        );
    }
    assert_eq!(orchestrator.current_index(), 2);
    assert_eq!(log.indices(), vec![0, 1, 2]);
}

#[test]
fn test_visibility_tie_goes_to_centered_section() {
    let a = Geometry::new(40.0, 20.0);
    let b = Geometry::new(0.0, 20.0);
    assert_eq!(best_visible([a, b], Geometry::new(0.0, 100.0), 0.0), Some(0));
}

#[tokio::test(start_paused = true)]
async fn test_deferred_commit_through_timer() {
    let (mut orchestrator, log, _) = fitting(3);
    let (tx, mut rx) = mpsc::unbounded_channel::<TransitionTicket>();

    let Disposition::TransitionStarted(ticket) = orchestrator.handle(&InputEvent::wheel(120.0, 0)) else {
        panic!("expected a transition");
    };
    let delay = Duration::from_millis(orchestrator.transition_duration_ms());
    spawn_deferred_commit(ticket, delay, orchestrator.liveness(), tx.clone());
    spawn_deferred_commit(ticket, delay, orchestrator.liveness(), tx);

    let mut commits = 0;
    while let Some(ticket) = rx.recv().await {
        if orchestrator.complete(ticket) {
            commits += 1;
        }
    }
    assert_eq!(commits, 1);
    assert_eq!(orchestrator.current_index(), 1);
    assert_eq!(log.indices(), vec![0, 1]);
}

#[tokio::test(start_paused = true)]
async fn test_deferred_commit_after_unmount_dropped() {
    let (mut orchestrator, log, _) = fitting(3);
    let (tx, mut rx) = mpsc::unbounded_channel::<TransitionTicket>();

    let Disposition::TransitionStarted(ticket) = orchestrator.handle(&InputEvent::wheel(120.0, 0)) else {
        panic!("expected a transition");
    };
    let handle = spawn_deferred_commit(ticket, Duration::from_millis(500), orchestrator.liveness(), tx);
    orchestrator.unmount();
    handle.await.unwrap();

    assert_eq!(rx.recv().await, None);
    assert_eq!(log.indices(), vec![0]);
}
