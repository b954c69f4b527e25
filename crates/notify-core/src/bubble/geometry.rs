//! Index-based bubble placement.

use serde::{Deserialize, Serialize};

use crate::types::Rect;

/// Screen edge the dock is attached to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DockPosition {
    Top,
    Right,
    #[default]
    Bottom,
    Left,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DockDisplayMode {
    #[default]
    Fashion,
    Efficient,
}

/// Fixed sizes and slot counts of the bubble stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Fully visible slots (N).
    pub visible: usize,
    /// Stacked "peeking" slots behind the visible ones (K).
    pub overlap: usize,
    pub bubble_width: i32,
    pub bubble_height: i32,
    pub screen_padding: i32,
    pub bubble_margin: i32,
    /// Base animation time in milliseconds.
    pub animation_ms: u64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            visible: 3,
            overlap: 2,
            bubble_width: 600,
            bubble_height: 90,
            screen_padding: 20,
            bubble_margin: 12,
            animation_ms: 300,
        }
    }
}

impl Layout {
    /// Maximum number of live bubbles (N + K).
    pub fn capacity(&self) -> usize {
        self.visible + self.overlap
    }

    /// Duration of a move, proportional to the vertical distance travelled.
    pub fn move_duration(&self, from: Rect, to: Rect) -> u64 {
        let travel = (to.y - from.y)
            .abs()
            .max((to.height - from.height).abs())
            .max(1) as u64;
        let base = self.animation_ms.max(1);
        (base * travel / 72).clamp(base / 3, base * 3)
    }
}

/// Display and dock geometry the bubbles are placed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenState {
    pub display: Rect,
    pub dock: Rect,
    pub dock_position: DockPosition,
    pub dock_mode: DockDisplayMode,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self {
            display: Rect::new(0, 0, 1920, 1080),
            dock: Rect::new(0, 1040, 1920, 40),
            dock_position: DockPosition::Bottom,
            dock_mode: DockDisplayMode::Fashion,
        }
    }
}

impl ScreenState {
    /// Top edge the stack hangs from.
    fn anchor_y(&self) -> i32 {
        match self.dock_position {
            DockPosition::Top => self.dock.bottom(),
            // Stacked displays may put the primary's top edge below zero.
            _ => self.display.y,
        }
    }
}

/// Rectangle of the bubble at `index`.
///
/// `heights` holds the heights of the live bubbles in queue order; the
/// visible slots are stacked below the cumulative height of the bubbles in
/// front of them. Overlap slots are an inset of the slot in front.
///
/// # Panics
///
/// Panics if `index` is beyond the last overlap slot.
pub fn bubble_rect(layout: &Layout, screen: &ScreenState, index: usize, heights: &[i32]) -> Rect {
    assert!(
        index <= layout.capacity(),
        "stale queue index {index} (capacity {})",
        layout.capacity()
    );

    if index < layout.visible {
        let stacked: i32 = heights.iter().take(index).sum();
        Rect {
            x: screen.display.x + (screen.display.width - layout.bubble_width) / 2,
            y: screen.anchor_y() + layout.screen_padding + index as i32 * layout.bubble_margin + stacked,
            width: layout.bubble_width,
            height: layout.bubble_height,
        }
    } else {
        let front = bubble_rect(layout, screen, index - 1, heights);
        Rect {
            x: front.x + front.width / 20,
            y: front.y + front.height / 3,
            width: front.width * 18 / 20,
            height: front.height * 19 / 20,
        }
    }
}
