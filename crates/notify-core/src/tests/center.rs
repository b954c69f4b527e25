use super::fakes::{notification, request};
use super::harness;
use crate::events::{BubbleEnd, BubbleEndKind, BubbleEvent, CenterCommand, ServiceEvent, ShellEvent};
use crate::ports::HistorySink;
use crate::settings::AppConfigItem;
use crate::types::{CloseReason, Rect};

#[test]
fn expired_bubble_is_popped_and_reported() {
    let mut h = harness();
    let id = h.center.submit(request("mail", 0));
    let handle = h.presentation.created()[0];

    h.center.on_bubble_event(handle, BubbleEvent::Expired);
    assert!(h.center.queue().is_empty());
    assert!(h.events.events().contains(&ServiceEvent::NotificationClosed {
        id,
        reason: CloseReason::Expired,
    }));

    // the exit animation finishing destroys the view
    assert_eq!(h.center.queue().exiting_len(), 1);
    h.center.on_bubble_event(handle, BubbleEvent::MoveFinished);
    assert_eq!(h.center.queue().exiting_len(), 0);
}

#[test]
fn action_reports_client_id_then_close() {
    let mut h = harness();
    let id = h.center.submit(request("mail", 0));
    let handle = h.presentation.created()[0];
    h.events.clear();

    h.center.on_bubble_event(
        handle,
        BubbleEvent::ActionInvoked {
            action_id: "default".into(),
        },
    );
    assert_eq!(
        h.events.events(),
        vec![
            ServiceEvent::ActionInvoked {
                id,
                action_id: "default".into(),
            },
            ServiceEvent::NotificationClosed {
                id,
                reason: CloseReason::ActionTaken,
            },
        ]
    );
}

#[test]
fn event_for_unknown_bubble_is_ignored() {
    let mut h = harness();
    h.center.submit(request("mail", 0));
    h.events.clear();
    h.center
        .on_bubble_event(crate::ports::ViewHandle(404), BubbleEvent::Dismissed);
    assert!(h.events.events().is_empty());
    assert_eq!(h.center.queue().len(), 1);
}

#[test]
fn processed_bubble_drops_its_record() {
    let mut h = harness();
    h.center.submit(request("mail", 0));
    let handle = h.presentation.created()[0];
    h.center
        .on_bubble_event(handle, BubbleEvent::Processed { storage_id: None });
    assert!(h.history.records().is_empty());
}

#[test]
fn unprocessed_bubble_announces_record() {
    let mut h = harness();
    h.center.submit(request("mail", 0));
    let handle = h.presentation.created()[0];
    h.events.clear();
    h.center
        .on_bubble_event(handle, BubbleEvent::NotProcessedYet { storage_id: None });
    assert_eq!(
        h.events.events(),
        vec![ServiceEvent::RecordAdded {
            storage_id: "1".into()
        }]
    );
}

#[test]
fn close_by_id_reports_dismissed() {
    let mut h = harness();
    let id = h.center.submit(request("mail", 0));
    assert!(h.center.close(id));
    assert!(h.center.queue().is_empty());
    assert!(h.events.events().contains(&ServiceEvent::NotificationClosed {
        id,
        reason: CloseReason::Dismissed,
    }));
    assert!(!h.center.close(id));
}

#[test]
fn lock_change_pops_everything() {
    let mut h = harness();
    h.settings.set_flag("chat", AppConfigItem::ShowInHistory, false);
    h.center.submit(request("mail", 0));
    h.center.submit(request("chat", 0));
    h.events.clear();

    h.center.handle_event(ShellEvent::LockChanged { locked: true });
    assert!(h.center.is_locked());
    assert!(h.center.queue().is_empty());
    assert_eq!(h.presentation.hidden().len(), 2);
    // only the history-enabled bubble is kept
    assert_eq!(h.history.records().len(), 1);
    assert_eq!(
        h.events.events(),
        vec![ServiceEvent::RecordAdded {
            storage_id: "1".into()
        }]
    );
}

#[test]
fn resume_from_sleep_clears_bubbles() {
    let mut h = harness();
    h.center.submit(request("mail", 0));
    h.center
        .handle_event(ShellEvent::SleepStateChanged { sleeping: true });
    assert_eq!(h.center.queue().len(), 1);
    h.center
        .handle_event(ShellEvent::SleepStateChanged { sleeping: false });
    assert!(h.center.queue().is_empty());
}

#[test]
fn switching_to_external_renderer_pops_all() {
    let mut h = harness();
    h.center.submit(request("mail", 0));
    h.center.set_bubble_mode(false);
    assert!(h.center.queue().is_empty());
    assert!(!h.center.builtin_bubbles());
}

#[test]
fn bubbles_follow_the_dock_monitor() {
    let mut h = harness();
    let second = Rect::new(1920, 0, 2560, 1440);
    *h.display.monitors.lock().unwrap() = vec![Rect::new(0, 0, 1920, 1080), second];
    *h.display.dock.lock().unwrap() = Some(Rect::new(1920, 1400, 2560, 40));
    h.center.handle_event(ShellEvent::DockChanged);

    h.center.submit(request("mail", 0));
    let target = h.center.queue().bubbles()[0].target();
    assert_eq!(target.x, 1920 + (2560 - 600) / 2);

    // an unreachable display service keeps the last known geometry
    h.display
        .available
        .store(false, std::sync::atomic::Ordering::Relaxed);
    h.center.handle_event(ShellEvent::DisplayChanged);
    assert_eq!(h.center.queue().screen().display, second);
}

#[test]
fn center_requests_are_debounced() {
    let mut h = harness();
    assert!(h.center.toggle_center(CenterCommand::Toggle));
    assert!(!h.center.toggle_center(CenterCommand::Hide));
    assert_eq!(h.presentation.centers(), vec![CenterCommand::Toggle]);
}

#[test]
fn external_action_without_record_emits_nothing() {
    let mut h = harness();
    h.center.bubble_end(BubbleEnd {
        kind: BubbleEndKind::Action,
        id: 5,
        storage_id: Some("404".into()),
        show_in_history: true,
        action_id: Some("default".into()),
    });
    assert!(h.events.events().is_empty());
}

#[test]
fn external_action_uses_stored_replace_id() {
    let mut h = harness();
    let storage_id = h.history.add_one(&notification(7, "mail")).unwrap();
    h.center.bubble_end(BubbleEnd {
        kind: BubbleEndKind::Action,
        id: 9,
        storage_id: Some(storage_id),
        show_in_history: true,
        action_id: Some("open".into()),
    });
    assert_eq!(
        h.events.events(),
        vec![
            ServiceEvent::ActionInvoked {
                id: 7,
                action_id: "open".into(),
            },
            ServiceEvent::NotificationClosed {
                id: 9,
                reason: CloseReason::ActionTaken,
            },
        ]
    );
}

#[test]
fn external_end_reports() {
    let mut h = harness();
    let storage_id = h.history.add_one(&notification(3, "mail")).unwrap();

    h.center.bubble_end(BubbleEnd {
        kind: BubbleEndKind::NotProcessedYet,
        id: 3,
        storage_id: Some(storage_id.clone()),
        show_in_history: false,
        action_id: None,
    });
    assert!(h.events.events().is_empty());

    h.center.bubble_end(BubbleEnd {
        kind: BubbleEndKind::Unknown,
        id: 3,
        storage_id: None,
        show_in_history: false,
        action_id: None,
    });
    assert_eq!(
        h.events.events(),
        vec![ServiceEvent::NotificationClosed {
            id: 3,
            reason: CloseReason::Unknown,
        }]
    );

    h.center.bubble_end(BubbleEnd {
        kind: BubbleEndKind::Processed,
        id: 3,
        storage_id: Some(storage_id),
        show_in_history: true,
        action_id: None,
    });
    assert!(h.history.records().is_empty());
}
