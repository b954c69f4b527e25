//! Setting value validation.

use notify_core::Rect;
use regex::Regex;
use std::sync::LazyLock;

use super::SettingKind;
use super::defaults::DEFAULT_SETTINGS;

static RE_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").unwrap());
static RE_RECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(-?\d+)\s*,\s*(-?\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*$").unwrap());
static RE_APP_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._\-]+$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "SERVER_PORT" => validate_int_range(value, 1, 65535)?,
        "BUBBLE_MODE" => {
            if value != "builtin" && value != "external" {
                return Err("must be 'builtin' or 'external'".into());
            }
        }
        "BUBBLE_VISIBLE" => validate_int_range(value, 1, 10)?,
        "BUBBLE_OVERLAP" => validate_int_range(value, 0, 5)?,
        "BUBBLE_WIDTH" => validate_int_range(value, 100, 4096)?,
        "BUBBLE_HEIGHT" => validate_int_range(value, 20, 1024)?,
        "SCREEN_PADDING" | "BUBBLE_MARGIN" => validate_int_range(value, 0, 200)?,
        "ANIMATION_MS" => validate_int_range(value, 10, 5000)?,
        "CENTER_DEBOUNCE_MS" => validate_int_range(value, 0, 5000)?,
        "DISPLAY_RECT" | "DOCK_RECT" => {
            parse_rect(value).ok_or("must be x,y,width,height")?;
        }
        "MONITORS" => {
            if !value.trim().is_empty() && parse_rect_list(value).is_none() {
                return Err("must be a ';' separated list of x,y,width,height".into());
            }
        }
        "DOCK_POSITION" => {
            if !["top", "right", "bottom", "left"].contains(&value) {
                return Err("must be top, right, bottom, or left".into());
            }
        }
        "DOCK_MODE" => {
            if value != "fashion" && value != "efficient" {
                return Err("must be 'fashion' or 'efficient'".into());
            }
        }
        "SYSTEM_APPS" => {
            if split_list(value).any(|app| !RE_APP_ID.is_match(app)) {
                return Err("must be a comma separated list of application ids".into());
            }
        }
        "DND_START_TIME" | "DND_END_TIME" => {
            if !RE_TIME.is_match(value) {
                return Err("must be a HH:MM time".into());
            }
        }
        k if is_boolean_setting(k) => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i32, max: i32) -> Result<(), String> {
    let v: i32 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn is_boolean_setting(key: &str) -> bool {
    DEFAULT_SETTINGS
        .get(key)
        .is_some_and(|def| def.setting_type == SettingKind::Bool)
}

/// Parse `x,y,width,height`.
pub fn parse_rect(value: &str) -> Option<Rect> {
    let caps = RE_RECT.captures(value)?;
    let num = |i: usize| caps.get(i)?.as_str().parse::<i32>().ok();
    Some(Rect::new(num(1)?, num(2)?, num(3)?, num(4)?))
}

/// Parse a `;` separated list of rectangles. Empty entries are skipped.
pub fn parse_rect_list(value: &str) -> Option<Vec<Rect>> {
    value
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_rect)
        .collect()
}

/// Non-empty trimmed entries of a comma separated list.
pub fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}
