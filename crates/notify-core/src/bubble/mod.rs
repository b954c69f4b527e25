//! On-screen bubbles and the capacity-bounded queue that places them.

pub mod geometry;
pub mod queue;

use serde::Serialize;

use crate::ports::ViewHandle;
use crate::types::{Notification, Rect};

pub use geometry::{DockDisplayMode, DockPosition, Layout, ScreenState};
pub use queue::{BubbleQueue, Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BubbleState {
    /// Moving towards its target slot.
    Entering,
    Stable,
    /// Leaving the screen; destroyed when the move finishes.
    Exiting,
}

/// A visual slot bound to one live notification.
#[derive(Debug, Clone, Serialize)]
pub struct Bubble {
    pub(crate) handle: ViewHandle,
    pub(crate) notification: Notification,
    pub(crate) index: usize,
    /// Last known on-screen rectangle.
    pub(crate) rect: Rect,
    pub(crate) target: Rect,
    pub(crate) height: i32,
    pub(crate) state: BubbleState,
    pub(crate) visible: bool,
}

impl Bubble {
    pub(crate) fn new(handle: ViewHandle, notification: Notification, height: i32) -> Self {
        Self {
            handle,
            notification,
            index: 0,
            rect: Rect::default(),
            target: Rect::default(),
            height,
            state: BubbleState::Entering,
            visible: true,
        }
    }

    pub fn handle(&self) -> ViewHandle {
        self.handle
    }

    pub fn notification(&self) -> &Notification {
        &self.notification
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn target(&self) -> Rect {
        self.target
    }

    pub fn state(&self) -> BubbleState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Resting at its target, not mid-animation.
    pub fn is_settled(&self) -> bool {
        self.state == BubbleState::Stable && self.rect == self.target
    }
}
