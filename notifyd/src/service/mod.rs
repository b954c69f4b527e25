//! The serialized notification service.
//!
//! One worker task owns the [`NotificationCenter`]. Every caller, HTTP
//! handlers and presentation callbacks alike, goes through a
//! [`ServiceHandle`], so all state changes are applied in arrival order.

pub mod adapters;

use std::sync::Arc;

use notify_core::ports::{ModeFlag, SystemClock, ViewHandle};
use notify_core::{
    BubbleEnd, BubbleEvent, CenterCommand, Collaborators, NotificationCenter, NotificationRequest,
    NotifyError, ShellEvent,
};
use notify_db::Database;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::{AppConfig, SettingsManager};
use adapters::{
    BroadcastEvents, BroadcastPresentation, BroadcastSound, DbHistory, DbSettings,
    SettingsDisplay,
};

const COMMAND_CAPACITY: usize = 256;

type Job = Box<dyn FnOnce(&mut NotificationCenter) + Send>;

/// Requests handled by the worker.
pub enum Command {
    Submit {
        request: NotificationRequest,
        reply: oneshot::Sender<u32>,
    },
    Close {
        id: u32,
        reply: oneshot::Sender<bool>,
    },
    Bubble {
        handle: ViewHandle,
        event: BubbleEvent,
    },
    BubbleEnd(BubbleEnd),
    Shell {
        event: ShellEvent,
        reply: oneshot::Sender<()>,
    },
    Center {
        command: CenterCommand,
        reply: oneshot::Sender<bool>,
    },
    SetBubbleMode {
        builtin: bool,
        reply: oneshot::Sender<()>,
    },
    /// Run a closure against the center and reply from inside it.
    Call(Job),
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("notification service is not running")]
    Stopped,

    #[error(transparent)]
    Notify(#[from] NotifyError),
}

/// Cloneable sender side of the service.
#[derive(Clone)]
pub struct ServiceHandle {
    tx: mpsc::Sender<Command>,
}

impl ServiceHandle {
    async fn send(&self, command: Command) -> Result<(), ServiceError> {
        self.tx.send(command).await.map_err(|_| ServiceError::Stopped)
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.send(make(reply)).await?;
        rx.await.map_err(|_| ServiceError::Stopped)
    }

    /// Returns the notification id, or 0 when it was dropped.
    pub async fn submit(&self, request: NotificationRequest) -> Result<u32, ServiceError> {
        self.request(|reply| Command::Submit { request, reply }).await
    }

    pub async fn close(&self, id: u32) -> Result<bool, ServiceError> {
        self.request(|reply| Command::Close { id, reply }).await
    }

    pub async fn bubble_event(
        &self,
        handle: ViewHandle,
        event: BubbleEvent,
    ) -> Result<(), ServiceError> {
        self.send(Command::Bubble { handle, event }).await
    }

    pub async fn bubble_end(&self, end: BubbleEnd) -> Result<(), ServiceError> {
        self.send(Command::BubbleEnd(end)).await
    }

    /// Resolves once the worker has applied the event and emitted its notices.
    pub async fn shell_event(&self, event: ShellEvent) -> Result<(), ServiceError> {
        self.request(|reply| Command::Shell { event, reply }).await
    }

    /// Returns false when the request fell inside the debounce window.
    pub async fn center(&self, command: CenterCommand) -> Result<bool, ServiceError> {
        self.request(|reply| Command::Center { command, reply }).await
    }

    pub async fn set_bubble_mode(&self, builtin: bool) -> Result<(), ServiceError> {
        self.request(|reply| Command::SetBubbleMode { builtin, reply })
            .await
    }

    /// Run `f` on the worker and return its result.
    pub async fn call<T, F>(&self, f: F) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: FnOnce(&mut NotificationCenter) -> notify_core::Result<T> + Send + 'static,
    {
        let result = self
            .request(|reply| {
                Command::Call(Box::new(move |center| {
                    let _ = reply.send(f(center));
                }))
            })
            .await?;
        Ok(result?)
    }
}

/// Wire the core to SQLite and the WebSocket broadcast channel.
pub fn build_center(
    db: &Database,
    config: &AppConfig,
    ws_tx: &broadcast::Sender<String>,
) -> NotificationCenter {
    let sm = SettingsManager::new(db.clone());
    let deps = Collaborators {
        history: Arc::new(DbHistory::new(db.clone(), config.icon_cache_dir.clone())),
        settings: Arc::new(DbSettings::new(sm.clone())),
        display: Arc::new(SettingsDisplay::new(sm)),
        presentation: Arc::new(BroadcastPresentation::new(ws_tx.clone())),
        sound: Arc::new(BroadcastSound::new(ws_tx.clone())),
        events: Arc::new(BroadcastEvents::new(ws_tx.clone())),
        clock: Arc::new(SystemClock),
        mode: Arc::new(ModeFlag::new(config.builtin_bubbles)),
    };
    NotificationCenter::new(config.core_config(), deps)
}

/// Start the worker. It stops when `shutdown` is cancelled or every handle is dropped.
pub fn spawn(
    center: NotificationCenter,
    shutdown: CancellationToken,
) -> (ServiceHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(COMMAND_CAPACITY);
    let worker = tokio::spawn(worker_loop(center, rx, shutdown));
    tracing::info!("Notification service started");
    (ServiceHandle { tx }, worker)
}

async fn worker_loop(
    mut center: NotificationCenter,
    mut rx: mpsc::Receiver<Command>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                // archive what is still on screen
                center.pop_all_immediately();
                break;
            }
            command = rx.recv() => match command {
                Some(command) => dispatch(&mut center, command),
                None => break,
            },
        }
    }
    tracing::info!("Notification service stopped");
}

fn dispatch(center: &mut NotificationCenter, command: Command) {
    match command {
        Command::Submit { request, reply } => {
            let _ = reply.send(center.submit(request));
        }
        Command::Close { id, reply } => {
            let _ = reply.send(center.close(id));
        }
        Command::Bubble { handle, event } => center.on_bubble_event(handle, event),
        Command::BubbleEnd(end) => center.bubble_end(end),
        Command::Shell { event, reply } => {
            center.handle_event(event);
            let _ = reply.send(());
        }
        Command::Center { command, reply } => {
            let _ = reply.send(center.toggle_center(command));
        }
        Command::SetBubbleMode { builtin, reply } => {
            center.set_bubble_mode(builtin);
            let _ = reply.send(());
        }
        Command::Call(job) => job(center),
    }
}
