use super::fakes::request;
use super::harness;
use crate::events::ServiceEvent;
use crate::settings::{AppConfigItem, SystemSettings};
use crate::types::CloseReason;
use crate::ShellEvent;

#[test]
fn fresh_notification_becomes_queue_head() {
    let mut h = harness();
    let id = h.center.submit(request("mail", 0));
    assert_eq!(id, 1);

    let head = &h.center.queue().bubbles()[0];
    assert_eq!(head.notification().id, id);
    assert_eq!(head.notification().storage_id.as_deref(), Some("1"));
    assert_eq!(h.history.records().len(), 1);
    assert_eq!(h.sound.count(), 1);
    assert!(h.events.events().contains(&ServiceEvent::BubbleShown {
        id,
        app_name: "mail".into(),
        storage_id: Some("1".into()),
    }));
}

#[test]
fn fresh_ids_increase() {
    let mut h = harness();
    let mut last = 0;
    for _ in 0..8 {
        let id = h.center.submit(request("mail", 0));
        assert!(id > last);
        last = id;
    }
}

#[test]
fn replace_updates_live_bubble_in_place() {
    let mut h = harness();
    let id = h.center.submit(request("mail", 0));
    h.events.clear();

    let mut update = request("mail", id);
    update.summary = "updated".into();
    assert_eq!(h.center.submit(update), id);

    assert_eq!(h.center.queue().len(), 1);
    assert_eq!(h.presentation.created().len(), 1);
    assert_eq!(h.presentation.updates().len(), 1);
    assert_eq!(h.center.queue().bubbles()[0].notification().summary, "updated");

    // the superseded content is archived once
    let added: Vec<_> = h
        .events
        .events()
        .into_iter()
        .filter(|e| matches!(e, ServiceEvent::RecordAdded { .. }))
        .collect();
    assert_eq!(added.len(), 1);
    assert!(
        !h.events
            .events()
            .iter()
            .any(|e| matches!(e, ServiceEvent::BubbleShown { .. }))
    );
}

#[test]
fn capacity_overflow_keeps_one_pending() {
    let mut h = harness();
    let cap = h.center.queue().layout().capacity();
    for _ in 0..=cap {
        h.center.submit(request("mail", 0));
    }
    assert_eq!(h.center.queue().len(), cap);
    assert_eq!(h.center.queue().overflow_len(), 1);
    assert_eq!(h.center.queue().overflow_ids(), vec![1]);
}

#[test]
fn replace_of_pending_entry_supersedes_it() {
    let mut h = harness();
    let cap = h.center.queue().layout().capacity();
    for _ in 0..=cap {
        h.center.submit(request("mail", 0));
    }
    assert_eq!(h.center.submit(request("mail", 1)), 1);

    assert!(h.events.events().contains(&ServiceEvent::NotificationClosed {
        id: 1,
        reason: CloseReason::SupersededByReplace,
    }));
    assert_eq!(h.center.queue().bubbles()[0].notification().id, 1);
    assert_eq!(h.center.queue().overflow_ids(), vec![2]);
}

#[test]
fn unknown_replace_id_is_adopted() {
    let mut h = harness();
    assert_eq!(h.center.submit(request("mail", 77)), 77);
    assert_eq!(h.center.submit(request("mail", 0)), 78);
}

#[test]
fn disabled_app_is_dropped() {
    let mut h = harness();
    h.settings
        .set_flag("mail", AppConfigItem::EnableNotification, false);
    assert_eq!(h.center.submit(request("mail", 0)), 0);
    assert!(h.history.records().is_empty());
    assert!(h.center.queue().is_empty());
}

#[test]
fn system_sender_ignores_disable_switch() {
    let mut h = harness();
    h.settings
        .set_flag("dde-control-center", AppConfigItem::EnableNotification, false);
    assert_ne!(h.center.submit(request("dde-control-center", 0)), 0);
    assert_eq!(h.center.queue().len(), 1);
}

#[test]
fn unregistered_app_defaults_to_enabled() {
    let mut h = harness();
    assert_ne!(h.center.submit(request("ghost", 0)), 0);
    assert_eq!(h.center.queue().len(), 1);
}

#[test]
fn missing_display_service_suppresses_everything() {
    let mut h = harness();
    h.display
        .available
        .store(false, std::sync::atomic::Ordering::Relaxed);
    assert_eq!(h.center.submit(request("mail", 0)), 0);
    assert!(h.history.records().is_empty());
    assert_eq!(h.sound.count(), 0);
}

#[test]
fn dnd_stores_silently() {
    let mut h = harness();
    h.settings.set_system(&SystemSettings {
        dnd_mode: true,
        ..SystemSettings::default()
    });
    let id = h.center.submit(request("mail", 0));
    assert_ne!(id, 0);
    assert!(h.center.queue().is_empty());
    assert_eq!(h.sound.count(), 0);
    assert!(h.events.events().contains(&ServiceEvent::RecordAdded {
        storage_id: "1".into()
    }));

    // system alerts still show and play
    h.center.submit(request("dde-control-center", 0));
    assert_eq!(h.center.queue().len(), 1);
    assert_eq!(h.sound.count(), 1);
}

#[test]
fn scheduled_dnd_follows_clock() {
    let mut h = harness();
    h.settings.set_system(&SystemSettings {
        dnd_mode: true,
        open_by_time_interval: true,
        start_time: "22:00".into(),
        end_time: "06:00".into(),
        ..SystemSettings::default()
    });
    h.clock.set("23:30");
    h.center.submit(request("mail", 0));
    assert!(h.center.queue().is_empty());

    h.clock.set("12:00");
    h.center.submit(request("mail", 0));
    assert_eq!(h.center.queue().len(), 1);
}

#[test]
fn history_disabled_and_dnd_discards() {
    let mut h = harness();
    h.settings.set_flag("mail", AppConfigItem::ShowInHistory, false);
    h.settings.set_system(&SystemSettings {
        dnd_mode: true,
        ..SystemSettings::default()
    });
    assert_ne!(h.center.submit(request("mail", 0)), 0);
    assert!(h.history.records().is_empty());
    assert!(h.center.queue().is_empty());
}

#[test]
fn hidden_on_lock_screen_is_stored_only() {
    let mut h = harness();
    h.settings.set_flag("mail", AppConfigItem::LockScreenShow, false);
    h.center.handle_event(ShellEvent::LockChanged { locked: true });
    assert_ne!(h.center.submit(request("mail", 0)), 0);
    assert!(h.center.queue().is_empty());
    assert_eq!(h.history.records().len(), 1);

    // other apps still show on the lock screen
    h.center.submit(request("chat", 0));
    assert_eq!(h.center.queue().len(), 1);
}

#[test]
fn transfer_progress_is_silent() {
    let mut h = harness();
    let mut req = request("mail", 0);
    req.actions = vec!["cancel".into(), "Cancel".into()];
    h.center.submit(req);
    assert_eq!(h.sound.count(), 0);
}

#[test]
fn escaped_backslashes_are_collapsed() {
    let mut h = harness();
    let mut req = request("mail", 0);
    req.body = r"a\\b".into();
    h.center.submit(req);
    assert_eq!(h.center.queue().bubbles()[0].notification().body, r"a\b");
}

#[test]
fn external_mode_hands_off_bubbles() {
    let mut h = harness();
    h.center.set_bubble_mode(false);
    // external renderers do not need the display service
    h.display
        .available
        .store(false, std::sync::atomic::Ordering::Relaxed);

    let id = h.center.submit(request("mail", 0));
    assert_ne!(id, 0);
    assert!(h.center.queue().is_empty());
    let shown = h.presentation.external();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].storage_id.as_deref(), Some("1"));
}
