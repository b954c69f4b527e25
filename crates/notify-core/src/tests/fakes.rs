//! In-memory collaborators for exercising the core without I/O.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveTime;

use crate::bubble::{DockDisplayMode, DockPosition, ScreenState};
use crate::center::{Collaborators, CoreConfig, NotificationCenter};
use crate::error::{NotifyError, Result};
use crate::events::{CenterCommand, ServiceEvent};
use crate::ports::{
    Clock, DisplayQuery, EventSink, HistorySink, ModeFlag, Move, Presentation, SettingsStore,
    SoundEffects, ViewHandle,
};
use crate::settings::{AppConfigItem, AppInfo, AppSettings, SettingValue, SystemConfigItem, SystemSettings};
use crate::types::{Notification, NotificationRequest, Rect};

/// A notification as the registry would leave it.
pub fn notification(id: u32, app: &str) -> Notification {
    let mut n = Notification::from_request(
        NotificationRequest {
            app_name: app.into(),
            summary: format!("summary {id}"),
            ..Default::default()
        },
        0,
    );
    n.id = id;
    n.replaces_id = id;
    n
}

pub fn request(app: &str, replaces_id: u32) -> NotificationRequest {
    NotificationRequest {
        app_name: app.into(),
        replaces_id,
        summary: "hello".into(),
        body: "world".into(),
        expire_timeout: -1,
        ..Default::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(ViewHandle, u32),
    Update(ViewHandle, Notification),
    Move(ViewHandle, Move),
    Geometry(ViewHandle, Rect),
    Index(ViewHandle, usize),
    Raise(ViewHandle),
    Hide(ViewHandle),
    Close(ViewHandle),
    External(Notification),
    Center(CenterCommand, ScreenState),
}

#[derive(Debug, Default)]
pub struct RecordingPresentation {
    next: AtomicU64,
    calls: Mutex<Vec<Call>>,
}

impl RecordingPresentation {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<ViewHandle> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Create(h, _) => Some(h),
                _ => None,
            })
            .collect()
    }

    pub fn moves_for(&self, handle: ViewHandle) -> Vec<Move> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Move(h, m) if h == handle => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn hidden(&self) -> Vec<ViewHandle> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Hide(h) => Some(h),
                _ => None,
            })
            .collect()
    }

    pub fn raised(&self) -> Vec<ViewHandle> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Raise(h) => Some(h),
                _ => None,
            })
            .collect()
    }

    pub fn updates(&self) -> Vec<(ViewHandle, Notification)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Update(h, n) => Some((h, n)),
                _ => None,
            })
            .collect()
    }

    pub fn external(&self) -> Vec<Notification> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::External(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub fn centers(&self) -> Vec<CenterCommand> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Center(cmd, _) => Some(cmd),
                _ => None,
            })
            .collect()
    }
}

impl Presentation for RecordingPresentation {
    fn create_bubble(&self, notification: &Notification) -> ViewHandle {
        let handle = ViewHandle(self.next.fetch_add(1, Ordering::Relaxed) + 1);
        self.record(Call::Create(handle, notification.id));
        handle
    }

    fn update_content(&self, handle: ViewHandle, notification: &Notification) {
        self.record(Call::Update(handle, notification.clone()));
    }

    fn animate_move(&self, handle: ViewHandle, mv: Move) {
        self.record(Call::Move(handle, mv));
    }

    fn set_geometry(&self, handle: ViewHandle, rect: Rect) {
        self.record(Call::Geometry(handle, rect));
    }

    fn set_index(&self, handle: ViewHandle, index: usize) {
        self.record(Call::Index(handle, index));
    }

    fn raise(&self, handle: ViewHandle) {
        self.record(Call::Raise(handle));
    }

    fn hide(&self, handle: ViewHandle) {
        self.record(Call::Hide(handle));
    }

    fn close(&self, handle: ViewHandle) {
        self.record(Call::Close(handle));
    }

    fn show_external(&self, notification: &Notification) {
        self.record(Call::External(notification.clone()));
    }

    fn center(&self, command: CenterCommand, screen: &ScreenState) {
        self.record(Call::Center(command, *screen));
    }
}

#[derive(Debug, Default)]
pub struct MemoryHistory {
    next: AtomicU64,
    rows: Mutex<Vec<(String, Notification)>>,
}

impl MemoryHistory {
    pub fn records(&self) -> Vec<Notification> {
        self.rows.lock().unwrap().iter().map(|(_, n)| n.clone()).collect()
    }

    pub fn storage_ids(&self) -> Vec<String> {
        self.rows.lock().unwrap().iter().map(|(id, _)| id.clone()).collect()
    }
}

impl HistorySink for MemoryHistory {
    fn add_one(&self, notification: &Notification) -> Result<String> {
        let id = (self.next.fetch_add(1, Ordering::Relaxed) + 1).to_string();
        let mut stored = notification.clone();
        stored.storage_id = Some(id.clone());
        self.rows.lock().unwrap().push((id.clone(), stored));
        Ok(id)
    }

    fn remove_one(&self, storage_id: &str) -> Result<()> {
        self.rows.lock().unwrap().retain(|(id, _)| id != storage_id);
        Ok(())
    }

    fn remove_all(&self) -> Result<()> {
        self.rows.lock().unwrap().clear();
        Ok(())
    }

    fn get_all(&self) -> Result<String> {
        serde_json::to_string(&self.records()).map_err(NotifyError::storage)
    }

    fn get_by_id(&self, storage_id: &str) -> Result<String> {
        let record = self
            .get_by_storage_id(storage_id)?
            .ok_or_else(|| NotifyError::RecordNotFound(storage_id.into()))?;
        serde_json::to_string(&record).map_err(NotifyError::storage)
    }

    fn get_from(&self, count: usize, offset_id: &str) -> Result<String> {
        let offset: Option<u64> = offset_id.parse().ok();
        let rows: Vec<Notification> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|(id, _)| match offset {
                Some(offset) => id.parse::<u64>().is_ok_and(|id| id < offset),
                None => true,
            })
            .take(count)
            .map(|(_, n)| n.clone())
            .collect();
        serde_json::to_string(&rows).map_err(NotifyError::storage)
    }

    fn get_count(&self) -> Result<u32> {
        Ok(self.rows.lock().unwrap().len() as u32)
    }

    fn get_by_storage_id(&self, storage_id: &str) -> Result<Option<Notification>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|(id, _)| id == storage_id)
            .map(|(_, n)| n.clone()))
    }
}

#[derive(Debug)]
pub struct MemorySettings {
    apps: Mutex<HashMap<String, HashMap<AppConfigItem, SettingValue>>>,
    system: Mutex<HashMap<SystemConfigItem, SettingValue>>,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            apps: Mutex::new(HashMap::new()),
            system: Mutex::new(SystemSettings::default().entries().into_iter().collect()),
        }
    }
}

impl MemorySettings {
    /// Register `app` with new-app defaults.
    pub fn with_app(self, app: &str) -> Self {
        let info = AppInfo {
            id: app.into(),
            name: app.into(),
            icon: String::new(),
        };
        self.add_app(&info).unwrap();
        self
    }

    pub fn set_flag(&self, app: &str, item: AppConfigItem, value: bool) {
        self.set_app_setting(app, item, &SettingValue::Bool(value))
            .unwrap();
    }

    pub fn set_system(&self, settings: &SystemSettings) {
        *self.system.lock().unwrap() = settings.entries().into_iter().collect();
    }
}

impl SettingsStore for MemorySettings {
    fn app_setting(&self, app_id: &str, item: AppConfigItem) -> Result<SettingValue> {
        self.apps
            .lock()
            .unwrap()
            .get(app_id)
            .and_then(|items| items.get(&item).cloned())
            .ok_or_else(|| NotifyError::invalid_value(item.key(), format!("no value for {app_id}")))
    }

    fn set_app_setting(&self, app_id: &str, item: AppConfigItem, value: &SettingValue) -> Result<()> {
        self.apps
            .lock()
            .unwrap()
            .entry(app_id.to_string())
            .or_default()
            .insert(item, value.clone());
        Ok(())
    }

    fn system_setting(&self, item: SystemConfigItem) -> Result<SettingValue> {
        self.system
            .lock()
            .unwrap()
            .get(&item)
            .cloned()
            .ok_or_else(|| NotifyError::invalid_value(item.key(), "unset"))
    }

    fn set_system_setting(&self, item: SystemConfigItem, value: &SettingValue) -> Result<()> {
        self.system.lock().unwrap().insert(item, value.clone());
        Ok(())
    }

    fn app_list(&self) -> Result<Vec<String>> {
        let mut apps: Vec<String> = self.apps.lock().unwrap().keys().cloned().collect();
        apps.sort();
        Ok(apps)
    }

    fn add_app(&self, info: &AppInfo) -> Result<()> {
        let items = AppSettings::for_new_app(info).entries().into_iter().collect();
        self.apps.lock().unwrap().insert(info.id.clone(), items);
        Ok(())
    }

    fn remove_app(&self, app_id: &str) -> Result<()> {
        self.apps.lock().unwrap().remove(app_id);
        Ok(())
    }
}

#[derive(Debug)]
pub struct FakeDisplay {
    pub available: AtomicBool,
    pub primary: Mutex<Rect>,
    pub monitors: Mutex<Vec<Rect>>,
    pub dock: Mutex<Option<Rect>>,
    pub position: Mutex<DockPosition>,
}

impl Default for FakeDisplay {
    fn default() -> Self {
        let screen = ScreenState::default();
        Self {
            available: AtomicBool::new(true),
            primary: Mutex::new(screen.display),
            monitors: Mutex::new(Vec::new()),
            dock: Mutex::new(Some(screen.dock)),
            position: Mutex::new(DockPosition::Bottom),
        }
    }
}

impl DisplayQuery for FakeDisplay {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }

    fn primary_display_rect(&self) -> Option<Rect> {
        self.is_available().then(|| *self.primary.lock().unwrap())
    }

    fn monitors(&self) -> Vec<Rect> {
        self.monitors.lock().unwrap().clone()
    }

    fn dock_rect(&self) -> Option<Rect> {
        *self.dock.lock().unwrap()
    }

    fn dock_position(&self) -> Option<DockPosition> {
        Some(*self.position.lock().unwrap())
    }

    fn dock_display_mode(&self) -> Option<DockDisplayMode> {
        Some(DockDisplayMode::Fashion)
    }
}

#[derive(Debug, Default)]
pub struct CountingSound(AtomicUsize);

impl CountingSound {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }
}

impl SoundEffects for CountingSound {
    fn play_notification(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Debug, Default)]
pub struct RecordingEvents(Mutex<Vec<ServiceEvent>>);

impl RecordingEvents {
    pub fn events(&self) -> Vec<ServiceEvent> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

impl EventSink for RecordingEvents {
    fn emit(&self, event: ServiceEvent) {
        self.0.lock().unwrap().push(event);
    }
}

#[derive(Debug)]
pub struct FixedClock(Mutex<NaiveTime>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(Mutex::new(NaiveTime::from_hms_opt(12, 0, 0).unwrap()))
    }
}

impl FixedClock {
    pub fn set(&self, time: &str) {
        *self.0.lock().unwrap() = crate::settings::parse_time(time).unwrap();
    }
}

impl Clock for FixedClock {
    fn local_time(&self) -> NaiveTime {
        *self.0.lock().unwrap()
    }

    fn epoch_millis(&self) -> i64 {
        1_700_000_000_000
    }
}

/// A center wired to fakes, with handles to each of them.
pub struct Harness {
    pub center: NotificationCenter,
    pub history: Arc<MemoryHistory>,
    pub settings: Arc<MemorySettings>,
    pub display: Arc<FakeDisplay>,
    pub presentation: Arc<RecordingPresentation>,
    pub sound: Arc<CountingSound>,
    pub events: Arc<RecordingEvents>,
    pub clock: Arc<FixedClock>,
    pub mode: Arc<ModeFlag>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(MemorySettings::default().with_app("mail").with_app("chat"))
    }

    pub fn with_settings(settings: MemorySettings) -> Self {
        let history = Arc::new(MemoryHistory::default());
        let settings = Arc::new(settings);
        let display = Arc::new(FakeDisplay::default());
        let presentation = Arc::new(RecordingPresentation::default());
        let sound = Arc::new(CountingSound::default());
        let events = Arc::new(RecordingEvents::default());
        let clock = Arc::new(FixedClock::default());
        let mode = Arc::new(ModeFlag::new(true));
        let deps = Collaborators {
            history: history.clone(),
            settings: settings.clone(),
            display: display.clone(),
            presentation: presentation.clone(),
            sound: sound.clone(),
            events: events.clone(),
            clock: clock.clone(),
            mode: mode.clone(),
        };
        let config = CoreConfig {
            system_apps: vec!["dde-control-center".into()],
            debounce: Duration::from_millis(300),
            ..CoreConfig::default()
        };
        Self {
            center: NotificationCenter::new(config, deps),
            history,
            settings,
            display,
            presentation,
            sound,
            events,
            clock,
            mode,
        }
    }
}
