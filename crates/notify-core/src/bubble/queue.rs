//! Capacity-bounded bubble queue with an overflow buffer.
//!
//! Index 0 is the most prominent bubble. The queue never holds more than
//! `visible + overlap` bubbles; pushing at capacity evicts the tail into the
//! front of the overflow list, and popping promotes the overflow front back
//! into the tail slot.

use std::collections::VecDeque;

use tracing::debug;

use super::geometry::{Layout, ScreenState, bubble_rect};
use super::{Bubble, BubbleState};
use crate::ports::{Move, Presentation, ViewHandle};
use crate::types::{Notification, Rect};

/// Where a replace target currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Live(usize),
    Overflow(usize),
    Absent,
}

#[derive(Debug)]
pub struct BubbleQueue {
    layout: Layout,
    screen: ScreenState,
    live: Vec<Bubble>,
    overflow: VecDeque<Notification>,
    /// Popped bubbles still running their exit animation.
    exiting: Vec<Bubble>,
}

impl BubbleQueue {
    pub fn new(layout: Layout, screen: ScreenState) -> Self {
        Self {
            layout,
            screen,
            live: Vec::new(),
            overflow: VecDeque::new(),
            exiting: Vec::new(),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn screen(&self) -> &ScreenState {
        &self.screen
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.live
    }

    pub fn overflow_len(&self) -> usize {
        self.overflow.len()
    }

    /// Ids waiting in overflow, front first.
    pub fn overflow_ids(&self) -> Vec<u32> {
        self.overflow.iter().map(|n| n.id).collect()
    }

    pub fn exiting_len(&self) -> usize {
        self.exiting.len()
    }

    pub fn get(&self, handle: ViewHandle) -> Option<&Bubble> {
        self.live.iter().find(|b| b.handle == handle)
    }

    /// Target rectangle of slot `index` for the current live set.
    pub fn geometry(&self, index: usize) -> Rect {
        let heights: Vec<i32> = self.live.iter().map(|b| b.height).collect();
        bubble_rect(&self.layout, &self.screen, index, &heights)
    }

    /// Rect of the nearest settled bubble in front of `index`, walking back
    /// from `index - 1` to 1. Falls back to the head slot.
    pub fn last_stable_rect(&self, index: usize) -> Rect {
        for i in (1..index.min(self.live.len())).rev() {
            let bubble = &self.live[i];
            if bubble.is_settled() && bubble.rect == self.geometry(i) {
                return bubble.rect;
            }
        }
        self.geometry(0)
    }

    /// Insert a notification at the head, evicting the tail when full.
    pub fn push(&mut self, p: &dyn Presentation, notification: Notification) -> ViewHandle {
        if self.live.len() >= self.layout.capacity() {
            self.evict_tail(p);
        }

        let handle = p.create_bubble(&notification);
        debug!(id = notification.id, %handle, "bubble created");
        self.live
            .insert(0, Bubble::new(handle, notification, self.layout.bubble_height));

        let target = self.geometry(0);
        // grows in from a collapsed strip at the head slot
        let from = Rect { height: 1, ..target };
        let duration_ms = self.layout.move_duration(from, target);
        let head = &mut self.live[0];
        head.rect = from;
        head.target = target;
        p.set_index(handle, 0);
        p.animate_move(
            handle,
            Move {
                from,
                to: target,
                duration_ms,
                delete_on_finish: false,
            },
        );

        self.relayout_from(p, 1);
        self.restack(p);
        handle
    }

    /// Remove a bubble, promoting the overflow front into the freed tail
    /// slot. Unknown handles are ignored.
    pub fn pop(&mut self, p: &dyn Presentation, handle: ViewHandle) -> Option<Notification> {
        let pos = self.live.iter().position(|b| b.handle == handle)?;
        let from = self.geometry(pos);
        let to = self.geometry(0);
        let mut bubble = self.live.remove(pos);
        bubble.state = BubbleState::Exiting;
        bubble.rect = from;
        bubble.target = to;
        p.animate_move(
            handle,
            Move {
                from,
                to,
                duration_ms: self.layout.move_duration(from, to),
                delete_on_finish: true,
            },
        );
        let notification = bubble.notification.clone();
        self.exiting.push(bubble);

        self.promote(p);
        self.relayout_from(p, pos);
        self.restack(p);
        Some(notification)
    }

    /// Replace the notification bound to live slot `index` without moving it.
    /// Returns the previous notification.
    pub fn replace_at(
        &mut self,
        p: &dyn Presentation,
        index: usize,
        notification: Notification,
    ) -> Notification {
        let bubble = &mut self.live[index];
        let old = std::mem::replace(&mut bubble.notification, notification);
        p.update_content(bubble.handle, &bubble.notification);
        old
    }

    /// Most recent entry matching a replace request, live queue first.
    pub fn locate(&self, replaces_id: u32, app_name: &str) -> Location {
        if let Some(i) = self
            .live
            .iter()
            .position(|b| b.notification.matches(replaces_id, app_name))
        {
            return Location::Live(i);
        }
        match self
            .overflow
            .iter()
            .position(|n| n.matches(replaces_id, app_name))
        {
            Some(i) => Location::Overflow(i),
            None => Location::Absent,
        }
    }

    /// Every live slot matching a replace request.
    pub fn live_matches(&self, replaces_id: u32, app_name: &str) -> Vec<usize> {
        self.live
            .iter()
            .enumerate()
            .filter(|(_, b)| b.notification.matches(replaces_id, app_name))
            .map(|(i, _)| i)
            .collect()
    }

    /// Drop overflow entries matching a replace request, returning them.
    pub fn remove_overflow_matching(
        &mut self,
        replaces_id: u32,
        app_name: &str,
    ) -> Vec<Notification> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.overflow)
            .into_iter()
            .partition(|n| n.matches(replaces_id, app_name));
        self.overflow = kept.into();
        removed
    }

    /// Close every live bubble and overflow entry carrying `id`.
    pub fn close_id(&mut self, p: &dyn Presentation, id: u32) -> bool {
        let before = self.overflow.len();
        self.overflow.retain(|n| n.id != id);
        let mut closed = before != self.overflow.len();

        let handles: Vec<ViewHandle> = self
            .live
            .iter()
            .filter(|b| b.notification.id == id)
            .map(|b| b.handle)
            .collect();
        for handle in handles {
            closed |= self.pop(p, handle).is_some();
        }
        closed
    }

    /// Settle a bubble whose move transition completed.
    pub fn finish_move(&mut self, handle: ViewHandle) {
        if let Some(bubble) = self.live.iter_mut().find(|b| b.handle == handle) {
            bubble.rect = bubble.target;
            bubble.state = BubbleState::Stable;
        } else if let Some(pos) = self.exiting.iter().position(|b| b.handle == handle) {
            self.exiting.remove(pos);
        }
    }

    /// Close every bubble at once, without animation.
    ///
    /// Returns the live notifications followed by the overflow entries.
    pub fn drain_all(&mut self, p: &dyn Presentation) -> Vec<Notification> {
        for bubble in self.exiting.drain(..) {
            p.close(bubble.handle);
        }
        let mut drained = Vec::with_capacity(self.live.len() + self.overflow.len());
        for bubble in self.live.drain(..) {
            p.hide(bubble.handle);
            p.close(bubble.handle);
            drained.push(bubble.notification);
        }
        drained.extend(self.overflow.drain(..));
        drained
    }

    /// Re-apply geometry to every live bubble for new screen state.
    pub fn update_screen(&mut self, p: &dyn Presentation, screen: ScreenState) {
        self.screen = screen;
        for i in 0..self.live.len() {
            let rect = self.geometry(i);
            let bubble = &mut self.live[i];
            bubble.rect = rect;
            bubble.target = rect;
            bubble.state = BubbleState::Stable;
            p.set_geometry(bubble.handle, rect);
        }
    }

    fn evict_tail(&mut self, p: &dyn Presentation) {
        if let Some(mut tail) = self.live.pop() {
            tail.visible = false;
            p.hide(tail.handle);
            p.close(tail.handle);
            debug!(id = tail.notification.id, "tail evicted to overflow");
            self.overflow.push_front(tail.notification);
        }
    }

    fn promote(&mut self, p: &dyn Presentation) {
        if self.live.len() >= self.layout.capacity() {
            return;
        }
        let Some(notification) = self.overflow.pop_front() else {
            return;
        };
        debug!(id = notification.id, "promoting overflow entry");

        let index = self.live.len();
        let handle = p.create_bubble(&notification);
        let mut bubble = Bubble::new(handle, notification, self.layout.bubble_height);
        bubble.index = index;
        self.live.push(bubble);

        let from = self.geometry(self.layout.capacity());
        let to = self.geometry(index);
        let tail = &mut self.live[index];
        tail.rect = from;
        tail.target = to;
        p.set_index(handle, index);
        p.animate_move(
            handle,
            Move {
                from,
                to,
                duration_ms: self.layout.move_duration(from, to),
                delete_on_finish: false,
            },
        );
    }

    /// Retarget bubbles from `start` on whose slot changed.
    fn relayout_from(&mut self, p: &dyn Presentation, start: usize) {
        for i in start..self.live.len() {
            let target = self.geometry(i);
            let from = if self.live[i].is_settled() {
                self.live[i].rect
            } else {
                self.last_stable_rect(i)
            };

            let bubble = &mut self.live[i];
            if bubble.index != i {
                bubble.index = i;
                p.set_index(bubble.handle, i);
            }
            if bubble.target == target {
                continue;
            }
            bubble.rect = from;
            bubble.target = target;
            bubble.state = BubbleState::Entering;
            p.animate_move(
                bubble.handle,
                Move {
                    from,
                    to: target,
                    duration_ms: self.layout.move_duration(from, target),
                    delete_on_finish: false,
                },
            );
        }
    }

    /// Raise in reverse so lower indices end up on top.
    fn restack(&self, p: &dyn Presentation) {
        for bubble in self.live.iter().rev() {
            p.raise(bubble.handle);
        }
    }
}
