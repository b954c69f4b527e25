use super::test_db;
use crate::DbError;

fn defaults() -> Vec<(&'static str, String)> {
    vec![
        ("app-name", "Mail".to_string()),
        ("enable-notification", "true".to_string()),
    ]
}

#[test]
fn test_add_and_list_apps() {
    let db = test_db();
    assert!(db.add_app("mail", &defaults()).unwrap());
    assert!(db.add_app("chat", &defaults()).unwrap());
    assert_eq!(db.list_apps().unwrap(), vec!["chat", "mail"]);
    assert!(db.app_exists("mail").unwrap());
    assert!(!db.app_exists("ghost").unwrap());
}

#[test]
fn test_re_adding_app_keeps_settings() {
    let db = test_db();
    db.add_app("mail", &defaults()).unwrap();
    db.set_app_setting("mail", "enable-notification", "false")
        .unwrap();

    assert!(!db.add_app("mail", &defaults()).unwrap());
    assert_eq!(
        db.get_app_setting("mail", "enable-notification").unwrap(),
        Some("false".into())
    );
}

#[test]
fn test_setting_registers_unknown_app() {
    let db = test_db();
    db.set_app_setting("editor", "enable-sound", "false").unwrap();
    assert!(db.app_exists("editor").unwrap());
    let settings = db.get_app_settings("editor").unwrap();
    assert_eq!(settings.get("enable-sound").map(String::as_str), Some("false"));
}

#[test]
fn test_remove_app_cascades() {
    let db = test_db();
    db.add_app("mail", &defaults()).unwrap();
    db.remove_app("mail").unwrap();
    assert!(db.get_app_settings("mail").unwrap().is_empty());
    assert_eq!(db.get_app_setting("mail", "app-name").unwrap(), None);
    assert!(matches!(db.remove_app("mail"), Err(DbError::NotFound(_))));
}
