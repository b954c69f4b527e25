use super::harness;
use crate::error::NotifyError;
use crate::events::{ServiceEvent, ShellEvent};
use crate::settings::{AppConfigItem, AppInfo, SettingValue, SystemConfigItem, SystemSettings};

#[test]
fn unsupported_item_is_an_error() {
    let h = harness();
    assert!(matches!(
        h.center.app_config("mail", 42),
        Err(NotifyError::InvalidConfigItem(42))
    ));
    assert!(matches!(
        h.center.system_config(6),
        Err(NotifyError::InvalidConfigItem(6))
    ));
}

#[test]
fn app_config_roundtrip_emits_change() {
    let h = harness();
    assert_eq!(h.center.app_config("mail", 4).unwrap(), SettingValue::Bool(true));
    h.center
        .set_app_config("mail", 4, SettingValue::Bool(false))
        .unwrap();
    assert_eq!(h.center.app_config("mail", 4).unwrap(), SettingValue::Bool(false));
    assert_eq!(
        h.events.events(),
        vec![ServiceEvent::AppConfigChanged {
            app_id: "mail".into(),
            item: AppConfigItem::EnableSound,
            value: SettingValue::Bool(false),
        }]
    );
}

#[test]
fn mistyped_values_are_rejected() {
    let h = harness();
    assert!(matches!(
        h.center.set_app_config("mail", 2, SettingValue::Text("yes".into())),
        Err(NotifyError::InvalidValue { .. })
    ));
    assert!(matches!(
        h.center.set_system_config(3, SettingValue::Text("25:00".into())),
        Err(NotifyError::InvalidValue { .. })
    ));
    assert!(h.events.events().is_empty());
}

#[test]
fn system_settings_only_report_changes() {
    let h = harness();
    let mut sys = h.center.system_settings().unwrap();
    sys.dnd_mode = true;
    sys.start_time = "23:00".into();
    h.center.set_system_settings(&sys).unwrap();

    assert_eq!(h.center.system_settings().unwrap(), sys);
    let changed: Vec<SystemConfigItem> = h
        .events
        .events()
        .into_iter()
        .filter_map(|e| match e {
            ServiceEvent::SystemConfigChanged { item, .. } => Some(item),
            _ => None,
        })
        .collect();
    assert_eq!(
        changed,
        vec![SystemConfigItem::DndMode, SystemConfigItem::StartTime]
    );
}

#[test]
fn invalid_system_settings_are_not_partially_applied() {
    let h = harness();
    let sys = SystemSettings {
        dnd_mode: true,
        end_time: "never".into(),
        ..SystemSettings::default()
    };
    assert!(h.center.set_system_settings(&sys).is_err());
    assert!(!h.center.system_settings().unwrap().dnd_mode);
}

#[test]
fn app_settings_view() {
    let h = harness();
    let mut settings = h.center.app_settings("chat").unwrap();
    assert!(settings.enable_notification);
    assert!(!settings.show_on_top);

    settings.show_on_top = true;
    h.center.set_app_settings("chat", &settings).unwrap();
    assert!(h.center.app_settings("chat").unwrap().show_on_top);
    assert_eq!(h.events.events().len(), 1);
}

#[test]
fn app_registration_events() {
    let h = harness();
    let info = AppInfo {
        id: "editor".into(),
        name: "Editor".into(),
        icon: "editor".into(),
    };
    h.center.add_app(&info).unwrap();
    assert!(h.center.app_list().unwrap().contains(&"editor".to_string()));
    assert_eq!(
        h.center.app_config("editor", 0).unwrap(),
        SettingValue::Text("Editor".into())
    );

    h.center.remove_app("editor").unwrap();
    assert!(!h.center.app_list().unwrap().contains(&"editor".to_string()));
    assert_eq!(
        h.events.events(),
        vec![
            ServiceEvent::AppAdded {
                app_id: "editor".into()
            },
            ServiceEvent::AppRemoved {
                app_id: "editor".into()
            },
        ]
    );
}

#[test]
fn setting_change_notice_is_forwarded() {
    let mut h = harness();
    h.center.handle_event(ShellEvent::SettingChanged {
        item: SystemConfigItem::ShowIcon,
    });
    assert_eq!(
        h.events.events(),
        vec![ServiceEvent::SystemConfigChanged {
            item: SystemConfigItem::ShowIcon,
            value: SettingValue::Bool(true),
        }]
    );
}

#[test]
fn capabilities_and_server_info() {
    let h = harness();
    assert_eq!(
        h.center.capabilities(),
        vec!["action-icons", "actions", "body", "body-hyperlinks", "body-markup"]
    );
    assert_eq!(h.center.server_information().spec_version, "1.2");
}
