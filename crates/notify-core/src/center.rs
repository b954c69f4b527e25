//! The serialized owner of all notification state.
//!
//! [`NotificationCenter`] ties the policy evaluator, the registry and the
//! bubble queue together. It is not thread-safe by itself; callers run it
//! behind a single task or lock so that identity reconciliation and queue
//! mutation always observe one consistent snapshot.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::bubble::{BubbleQueue, Layout, ScreenState};
use crate::error::{NotifyError, Result};
use crate::events::{BubbleEnd, BubbleEndKind, BubbleEvent, CenterCommand, ServiceEvent, ShellEvent};
use crate::policy::{Disposition, PolicyContext, PolicyEvaluator};
use crate::ports::{
    Clock, DisplayQuery, EventSink, HistorySink, Presentation, RuntimeMode, SettingsStore,
    SoundEffects, ViewHandle,
};
use crate::registry::Registry;
use crate::settings::{AppConfigItem, AppInfo, AppSettings, SettingValue, SystemConfigItem, SystemSettings};
use crate::types::{CloseReason, Notification, NotificationRequest};

/// Features advertised to clients.
pub const CAPABILITIES: [&str; 5] = [
    "action-icons",
    "actions",
    "body",
    "body-hyperlinks",
    "body-markup",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub vendor: String,
    pub version: String,
    pub spec_version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: "notifyd".into(),
            vendor: "notifyd".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            spec_version: "1.2".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub layout: Layout,
    pub system_apps: Vec<String>,
    /// Window in which repeated center toggles are ignored.
    pub debounce: Duration,
    pub server_info: ServerInfo,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            system_apps: crate::policy::DEFAULT_SYSTEM_APPS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            debounce: Duration::from_millis(300),
            server_info: ServerInfo::default(),
        }
    }
}

/// Everything the center talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub history: Arc<dyn HistorySink>,
    pub settings: Arc<dyn SettingsStore>,
    pub display: Arc<dyn DisplayQuery>,
    pub presentation: Arc<dyn Presentation>,
    pub sound: Arc<dyn SoundEffects>,
    pub events: Arc<dyn EventSink>,
    pub clock: Arc<dyn Clock>,
    pub mode: Arc<dyn RuntimeMode>,
}

pub struct NotificationCenter {
    config: CoreConfig,
    deps: Collaborators,
    policy: PolicyEvaluator,
    registry: Registry,
    queue: BubbleQueue,
    locked: bool,
    last_center_request: Option<Instant>,
}

impl NotificationCenter {
    pub fn new(config: CoreConfig, deps: Collaborators) -> Self {
        let policy = PolicyEvaluator::new(config.system_apps.clone());
        let queue = BubbleQueue::new(config.layout.clone(), ScreenState::default());
        let mut center = Self {
            config,
            deps,
            policy,
            registry: Registry::new(),
            queue,
            locked: false,
            last_center_request: None,
        };
        center.refresh_screen();
        center
    }

    pub fn queue(&self) -> &BubbleQueue {
        &self.queue
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn presentation(&self) -> &dyn Presentation {
        self.deps.presentation.as_ref()
    }

    fn emit(&self, event: ServiceEvent) {
        self.deps.events.emit(event);
    }

    fn closed(&self, id: u32, reason: CloseReason) {
        self.emit(ServiceEvent::NotificationClosed { id, reason });
    }

    /// Accept a notification. Returns its id, or 0 when it was dropped.
    pub fn submit(&mut self, request: NotificationRequest) -> u32 {
        let builtin = self.deps.mode.builtin_bubbles();
        if builtin && !self.deps.display.is_available() {
            warn!(
                app = %request.app_name,
                error = %NotifyError::MissingDisplayService,
                "notification suppressed"
            );
            return 0;
        }

        let ctx = PolicyContext {
            locked: self.locked,
            now: self.deps.clock.local_time(),
        };
        let decision = self.policy.evaluate(
            self.deps.settings.as_ref(),
            &request.app_name,
            &request.hints,
            &request.actions,
            ctx,
        );
        if !decision.accepts() {
            debug!(app = %request.app_name, "notifications disabled for app");
            return 0;
        }

        let mut notification = Notification::from_request(request, self.deps.clock.epoch_millis());
        notification.show_preview = decision.enable_preview;
        notification.show_in_history = decision.show_in_history;

        if decision.play_sound {
            self.deps.sound.play_notification();
        }

        let resolution = self.registry.resolve(
            &mut notification,
            &mut self.queue,
            self.deps.presentation.as_ref(),
            self.deps.history.as_ref(),
        );
        for storage_id in resolution.archived {
            self.emit(ServiceEvent::RecordAdded { storage_id });
        }
        for stale in &resolution.superseded {
            self.closed(stale.id, CloseReason::SupersededByReplace);
        }

        if resolution.was_replace {
            if !builtin {
                if notification.show_in_history {
                    self.persist(&mut notification);
                }
                self.presentation().show_external(&notification);
            }
            return resolution.id;
        }

        match decision.disposition(self.locked) {
            Disposition::Display { persist } => {
                if persist {
                    self.persist(&mut notification);
                }
                self.display(notification);
            }
            Disposition::StoreOnly => {
                if let Some(storage_id) = self.persist(&mut notification) {
                    self.emit(ServiceEvent::RecordAdded { storage_id });
                }
            }
            Disposition::Discard => {
                debug!(id = resolution.id, "notification neither shown nor stored");
            }
        }
        resolution.id
    }

    fn persist(&self, notification: &mut Notification) -> Option<String> {
        match self.deps.history.add_one(notification) {
            Ok(storage_id) => {
                notification.storage_id = Some(storage_id.clone());
                Some(storage_id)
            }
            Err(e) => {
                warn!(id = notification.id, error = %e, "failed to store notification");
                None
            }
        }
    }

    fn display(&mut self, notification: Notification) {
        let shown = ServiceEvent::BubbleShown {
            id: notification.id,
            app_name: notification.app_name.clone(),
            storage_id: notification.storage_id.clone(),
        };
        if self.deps.mode.builtin_bubbles() {
            self.queue.push(self.deps.presentation.as_ref(), notification);
        } else {
            self.presentation().show_external(&notification);
        }
        self.emit(shown);
    }

    /// Close every live bubble and pending entry with this id.
    pub fn close(&mut self, id: u32) -> bool {
        let closed = self.queue.close_id(self.deps.presentation.as_ref(), id);
        if closed {
            info!(id, "notification closed by client");
            self.closed(id, CloseReason::Dismissed);
        }
        closed
    }

    /// Handle a report from a built-in bubble view.
    pub fn on_bubble_event(&mut self, handle: ViewHandle, event: BubbleEvent) {
        match event {
            BubbleEvent::Expired => {
                if let Some(n) = self.queue.pop(self.deps.presentation.as_ref(), handle) {
                    self.closed(n.id, CloseReason::Expired);
                }
            }
            BubbleEvent::Dismissed => {
                if let Some(n) = self.queue.pop(self.deps.presentation.as_ref(), handle) {
                    self.closed(n.id, CloseReason::Dismissed);
                }
            }
            BubbleEvent::ActionInvoked { action_id } => {
                if let Some(n) = self.queue.pop(self.deps.presentation.as_ref(), handle) {
                    self.emit(ServiceEvent::ActionInvoked {
                        id: n.client_id(),
                        action_id,
                    });
                    self.closed(n.id, CloseReason::ActionTaken);
                }
            }
            BubbleEvent::Processed { storage_id } => {
                let storage_id = storage_id.or_else(|| self.bound_storage_id(handle));
                if let Some(storage_id) = storage_id {
                    if let Err(e) = self.deps.history.remove_one(&storage_id) {
                        warn!(%storage_id, error = %e, "failed to remove processed record");
                    }
                }
            }
            BubbleEvent::NotProcessedYet { storage_id } => {
                let keep = self
                    .queue
                    .get(handle)
                    .is_none_or(|b| b.notification().show_in_history);
                let storage_id = storage_id.or_else(|| self.bound_storage_id(handle));
                if let (true, Some(storage_id)) = (keep, storage_id) {
                    self.emit(ServiceEvent::RecordAdded { storage_id });
                }
            }
            BubbleEvent::MoveFinished => self.queue.finish_move(handle),
        }
    }

    fn bound_storage_id(&self, handle: ViewHandle) -> Option<String> {
        self.queue
            .get(handle)
            .and_then(|b| b.notification().storage_id.clone())
    }

    /// Handle the end report of an external bubble renderer.
    pub fn bubble_end(&mut self, end: BubbleEnd) {
        debug!(kind = ?end.kind, id = end.id, "bubble end");
        match end.kind {
            BubbleEndKind::Expired => self.closed(end.id, CloseReason::Expired),
            BubbleEndKind::Dismissed => self.closed(end.id, CloseReason::Dismissed),
            BubbleEndKind::Unknown => self.closed(end.id, CloseReason::Unknown),
            BubbleEndKind::NotProcessedYet => {
                if let (true, Some(storage_id)) = (end.show_in_history, end.storage_id) {
                    self.emit(ServiceEvent::RecordAdded { storage_id });
                }
            }
            BubbleEndKind::Action => {
                let storage_id = end.storage_id.unwrap_or_default();
                match self.deps.history.get_by_storage_id(&storage_id) {
                    Ok(Some(record)) => {
                        let id = if record.replaces_id == 0 {
                            end.id
                        } else {
                            record.replaces_id
                        };
                        self.emit(ServiceEvent::ActionInvoked {
                            id,
                            action_id: end.action_id.unwrap_or_default(),
                        });
                        self.closed(end.id, CloseReason::ActionTaken);
                    }
                    Ok(None) => {
                        warn!(error = %NotifyError::RecordNotFound(storage_id), "action ignored");
                    }
                    Err(e) => warn!(error = %e, "action ignored"),
                }
            }
            BubbleEndKind::Processed => {
                if let Some(storage_id) = end.storage_id.filter(|s| !s.is_empty()) {
                    if let Err(e) = self.deps.history.remove_one(&storage_id) {
                        warn!(%storage_id, error = %e, "failed to remove processed record");
                    }
                }
            }
        }
    }

    /// Single entry point for desktop-shell state changes.
    pub fn handle_event(&mut self, event: ShellEvent) {
        match event {
            ShellEvent::DisplayChanged | ShellEvent::DockChanged => self.refresh_screen(),
            ShellEvent::SleepStateChanged { sleeping } => {
                if !sleeping {
                    info!("resumed from sleep, clearing bubbles");
                    self.pop_all_immediately();
                }
            }
            ShellEvent::LockChanged { locked } => {
                self.locked = locked;
                if self.deps.mode.builtin_bubbles() {
                    self.pop_all_immediately();
                }
            }
            ShellEvent::SettingChanged { item } => match self.deps.settings.system_setting(item) {
                Ok(value) => self.emit(ServiceEvent::SystemConfigChanged { item, value }),
                Err(e) => warn!(item = item.key(), error = %e, "changed setting unreadable"),
            },
        }
    }

    /// Re-query display and dock geometry. The last known state is kept for
    /// anything the display service cannot answer.
    pub fn refresh_screen(&mut self) {
        if !self.deps.mode.builtin_bubbles() {
            return;
        }
        let display = self.deps.display.as_ref();
        if !display.is_available() {
            warn!(error = %NotifyError::MissingDisplayService, "keeping last known geometry");
            return;
        }

        let mut screen = *self.queue.screen();
        if let Some(dock) = display.dock_rect() {
            screen.dock = dock;
        }
        if let Some(position) = display.dock_position() {
            screen.dock_position = position;
        }
        if let Some(mode) = display.dock_display_mode() {
            screen.dock_mode = mode;
        }
        // bubbles follow the monitor hosting the dock
        let dock_center = screen.dock.center();
        let monitor = display
            .monitors()
            .into_iter()
            .find(|m| m.contains(dock_center))
            .or_else(|| display.primary_display_rect());
        if let Some(rect) = monitor {
            screen.display = rect;
        }

        self.queue.update_screen(self.deps.presentation.as_ref(), screen);
    }

    /// Drop every bubble at once, keeping history-enabled ones as records.
    pub fn pop_all_immediately(&mut self) {
        let drained = self.queue.drain_all(self.deps.presentation.as_ref());
        if !drained.is_empty() {
            debug!(count = drained.len(), "popping all bubbles");
        }
        for mut notification in drained {
            if !notification.show_in_history {
                continue;
            }
            let storage_id = match notification.storage_id.clone() {
                Some(id) => Some(id),
                None => self.persist(&mut notification),
            };
            if let Some(storage_id) = storage_id {
                self.emit(ServiceEvent::RecordAdded { storage_id });
            }
        }
    }

    /// Show, hide or toggle the notification center. Returns false when the
    /// request fell inside the debounce window.
    pub fn toggle_center(&mut self, command: CenterCommand) -> bool {
        let now = Instant::now();
        if self
            .last_center_request
            .is_some_and(|last| now.duration_since(last) < self.config.debounce)
        {
            debug!(?command, "center request debounced");
            return false;
        }
        self.last_center_request = Some(now);
        self.refresh_screen();
        self.presentation().center(command, self.queue.screen());
        true
    }

    /// Switch between the built-in queue and an external renderer.
    pub fn set_bubble_mode(&mut self, builtin: bool) {
        if self.deps.mode.builtin_bubbles() == builtin {
            return;
        }
        info!(builtin, "bubble mode changed");
        if !builtin {
            self.pop_all_immediately();
        }
        self.deps.mode.set_builtin_bubbles(builtin);
        if builtin {
            self.refresh_screen();
        }
    }

    pub fn builtin_bubbles(&self) -> bool {
        self.deps.mode.builtin_bubbles()
    }

    pub fn records(&self) -> Result<String> {
        self.deps.history.get_all()
    }

    pub fn record(&self, storage_id: &str) -> Result<String> {
        self.deps.history.get_by_id(storage_id)
    }

    pub fn records_from(&self, count: usize, offset_id: &str) -> Result<String> {
        self.deps.history.get_from(count, offset_id)
    }

    pub fn record_count(&self) -> Result<u32> {
        self.deps.history.get_count()
    }

    pub fn remove_record(&self, storage_id: &str) -> Result<()> {
        self.deps.history.remove_one(storage_id)
    }

    pub fn clear_records(&self) -> Result<()> {
        self.deps.history.remove_all()
    }

    pub fn app_list(&self) -> Result<Vec<String>> {
        self.deps.settings.app_list()
    }

    pub fn add_app(&self, info: &AppInfo) -> Result<()> {
        self.deps.settings.add_app(info)?;
        self.emit(ServiceEvent::AppAdded {
            app_id: info.id.clone(),
        });
        Ok(())
    }

    pub fn remove_app(&self, app_id: &str) -> Result<()> {
        self.deps.settings.remove_app(app_id)?;
        self.emit(ServiceEvent::AppRemoved {
            app_id: app_id.to_string(),
        });
        Ok(())
    }

    /// Read one per-app item by its numeric code.
    pub fn app_config(&self, app_id: &str, item: u32) -> Result<SettingValue> {
        let item = AppConfigItem::try_from(item)?;
        self.deps.settings.app_setting(app_id, item)
    }

    pub fn set_app_config(&self, app_id: &str, item: u32, value: SettingValue) -> Result<()> {
        let item = AppConfigItem::try_from(item)?;
        self.store_app_item(app_id, item, value)
    }

    fn store_app_item(&self, app_id: &str, item: AppConfigItem, value: SettingValue) -> Result<()> {
        item.validate(&value)?;
        self.deps.settings.set_app_setting(app_id, item, &value)?;
        self.emit(ServiceEvent::AppConfigChanged {
            app_id: app_id.to_string(),
            item,
            value,
        });
        Ok(())
    }

    pub fn system_config(&self, item: u32) -> Result<SettingValue> {
        let item = SystemConfigItem::try_from(item)?;
        self.deps.settings.system_setting(item)
    }

    pub fn set_system_config(&self, item: u32, value: SettingValue) -> Result<()> {
        let item = SystemConfigItem::try_from(item)?;
        self.store_system_item(item, value)
    }

    fn store_system_item(&self, item: SystemConfigItem, value: SettingValue) -> Result<()> {
        item.validate(&value)?;
        self.deps.settings.set_system_setting(item, &value)?;
        self.emit(ServiceEvent::SystemConfigChanged { item, value });
        Ok(())
    }

    pub fn app_settings(&self, app_id: &str) -> Result<AppSettings> {
        self.deps.settings.app_settings(app_id)
    }

    /// Store every item that differs from the current settings.
    pub fn set_app_settings(&self, app_id: &str, settings: &AppSettings) -> Result<()> {
        let current = self.deps.settings.app_settings(app_id).ok();
        for (item, value) in settings.entries() {
            if current.as_ref().is_some_and(|c| c.get(item) == value) {
                continue;
            }
            self.store_app_item(app_id, item, value)?;
        }
        Ok(())
    }

    pub fn system_settings(&self) -> Result<SystemSettings> {
        self.deps.settings.system_settings()
    }

    pub fn set_system_settings(&self, settings: &SystemSettings) -> Result<()> {
        for (item, value) in settings.entries() {
            item.validate(&value)?;
        }
        let current = self.deps.settings.system_settings().ok();
        for (item, value) in settings.entries() {
            if current.as_ref().is_some_and(|c| c.get(item) == value) {
                continue;
            }
            self.store_system_item(item, value)?;
        }
        Ok(())
    }

    pub fn capabilities(&self) -> Vec<String> {
        CAPABILITIES.iter().map(|c| c.to_string()).collect()
    }

    pub fn server_information(&self) -> ServerInfo {
        self.config.server_info.clone()
    }
}
