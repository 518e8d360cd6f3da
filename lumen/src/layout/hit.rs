//! Pointer hit-testing against revealed clickable tokens.
//!
//! Rectangles are scanned in insertion order and only up to the reveal
//! cursor. Hover lets every overlapping rectangle respond; click stops at
//! the first hit.

use super::Layout;
use crate::primitives::Rect;

impl Layout {
    /// Update hover state for the pointer at `(x, y)`.
    ///
    /// Hit tokens switch to their hover bitmap and fire their hover callback.
    /// Hovered tokens the pointer has left switch back and are re-placed.
    /// Returns whether any rectangle was hit.
    pub fn on_hover(&mut self, x: i32, y: i32) -> bool {
        let rects: Vec<(usize, Rect)> = self
            .click_rects
            .range(..self.last_index)
            .map(|(&i, &r)| (i, r))
            .collect();

        let mut any_hit = false;
        for (index, rect) in rects {
            if rect.contains_xy(x, y) {
                any_hit = true;
                self.active[index].hovered = true;
                if let Some(callback) = self.hover_callbacks.get_mut(&index) {
                    callback(x, y);
                }
            } else if self.active[index].hovered {
                self.active[index].hovered = false;
                self.active[index].position = self.place(index);
            }
        }
        any_hit
    }

    /// Dispatch a left click at `(x, y)` to the first clickable token under
    /// it. Returns whether a token was hit, callback or not.
    pub fn on_left_click(&mut self, x: i32, y: i32) -> bool {
        let hit = self
            .click_rects
            .range(..self.last_index)
            .find(|(_, rect)| rect.contains_xy(x, y))
            .map(|(&i, _)| i);

        let Some(index) = hit else {
            return false;
        };

        tracing::debug!("Click at ({}, {}) hit token {}", x, y, index);
        if let Some(callback) = self.click_callbacks.get_mut(&index) {
            callback(x, y);
        }
        true
    }
}
