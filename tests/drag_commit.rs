use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use agency_timeline::io::commit::{CommitDispatcher, CommitOutcome, JsonFileGateway};
use agency_timeline::io::file::{load_items, save_items};
use agency_timeline::model::{
    layout, DragController, DragMode, DragOutcome, NavCommand, ScheduledItem, TimelineViewport,
    ZoomLevels,
};
use chrono::NaiveDate;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn wait_for_one(dispatcher: &mut CommitDispatcher) -> CommitOutcome {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(outcome) = dispatcher.poll().pop() {
            return outcome;
        }
        assert!(Instant::now() < deadline, "commit never reported back");
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn resize_end_drag_commits_only_the_end_date() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("items.json");
    let launch = ScheduledItem::new("Launch", d(2025, 4, 5), d(2025, 4, 10)).with_client("Acme");
    save_items(std::slice::from_ref(&launch), &path).unwrap();

    let viewport = TimelineViewport::new(ZoomLevels::default(), 2, d(2025, 4, 1));
    let before = layout(&launch, &viewport).unwrap();

    let mut drag = DragController::new();
    let mut dispatcher = CommitDispatcher::new(Arc::new(JsonFileGateway::new(&path)));

    assert!(drag.pointer_down(&launch, DragMode::ResizeEnd, 300.0));
    // 600px track, 30 days: +3 days.
    drag.pointer_move(330.0, 600.0, viewport.days_in_view());
    drag.pointer_move(361.0, 600.0, viewport.days_in_view());

    // Bars are still laid out from the stored dates while dragging.
    assert_eq!(layout(&launch, &viewport), Some(before));

    let Some(DragOutcome::Commit { item_id, patch }) = drag.pointer_up() else {
        panic!("expected a commit");
    };
    assert_eq!(patch.start_date, None);
    assert_eq!(patch.end_date, Some(d(2025, 4, 13)));

    dispatcher.submit(item_id, patch);
    let outcome = wait_for_one(&mut dispatcher);
    assert!(outcome.result.is_ok());

    let stored = load_items(&path).unwrap();
    assert_eq!(stored[0].start, Some(d(2025, 4, 5)));
    assert_eq!(stored[0].end, Some(d(2025, 4, 13)));
    assert_eq!(stored[0].client.as_deref(), Some("Acme"));
}

#[test]
fn failed_commit_is_reported_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("items.json");
    save_items(&[], &path).unwrap();

    let local = ScheduledItem::new("Ghost", d(2025, 4, 5), d(2025, 4, 10));

    let mut drag = DragController::new();
    drag.pointer_down(&local, DragMode::Move, 0.0);
    drag.pointer_move(40.0, 600.0, 30);
    let Some(DragOutcome::Commit { item_id, patch }) = drag.pointer_up() else {
        panic!("expected a commit");
    };

    let mut dispatcher = CommitDispatcher::new(Arc::new(JsonFileGateway::new(&path)));
    dispatcher.submit(item_id, patch);
    let outcome = wait_for_one(&mut dispatcher);
    assert!(outcome.result.is_err());
    assert_eq!(outcome.item_id, local.id);
    assert!(load_items(&path).unwrap().is_empty());

    // No retry: nothing else arrives.
    thread::sleep(Duration::from_millis(20));
    assert!(dispatcher.poll().is_empty());
    assert_eq!(dispatcher.in_flight(), 0);
}

#[test]
fn paging_and_zoom_recompute_layout() {
    let item = ScheduledItem::new("Retainer", d(2025, 4, 10), d(2025, 4, 20));
    let mut viewport = TimelineViewport::new(ZoomLevels::default(), 1, d(2025, 4, 1));
    let today = d(2025, 4, 1);

    assert!(layout(&item, &viewport).is_some());
    viewport.apply(NavCommand::Next, today);
    assert_eq!(viewport.window_start, d(2025, 4, 15));
    assert!(layout(&item, &viewport).is_some());
    viewport.apply(NavCommand::Next, today);
    assert!(layout(&item, &viewport).is_none());

    viewport.apply(NavCommand::Today, today);
    viewport.apply(NavCommand::ZoomOut, today);
    let bar = layout(&item, &viewport).unwrap();
    assert_eq!(viewport.days_in_view(), 30);
    assert_eq!(bar.visible_days, 11);
}
