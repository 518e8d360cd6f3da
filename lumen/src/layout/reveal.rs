//! Typewriter-style incremental reveal.
//!
//! The cursor only moves forward between clears. Reserving more tokens is
//! allowed at any point; they queue up behind the cursor.

use super::{Active, Layout};
use crate::primitives::{Point, Rect};

/// Where a layout is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    /// No tokens.
    Empty,
    /// Tokens reserved, none revealed yet.
    Accumulating,
    PartiallyRevealed,
    FullyRevealed,
}

impl Layout {
    /// Reveal the next token. Returns `false` (and changes nothing) when
    /// every reserved token is already visible.
    pub fn show_next(&mut self) -> bool {
        let index = self.last_index;
        if index >= self.tokens.len() {
            return false;
        }

        let position = self.place(index);
        self.active.push(Active {
            position,
            hovered: false,
        });

        let token = &self.tokens[index];
        if token.is_clickable() {
            let rect = Rect::new(position.x, position.y, token.width() as i32, token.height() as i32);
            self.click_rects.insert(index, rect);
        }

        self.last_index += 1;
        tracing::debug!("Revealed token {} at ({}, {})", index, position.x, position.y);
        true
    }

    /// Reveal everything that is left. Returns whether anything was revealed.
    pub fn complete(&mut self) -> bool {
        let mut revealed = false;
        while self.show_next() {
            revealed = true;
        }
        revealed
    }

    /// True once every reserved token is visible (trivially true when empty).
    pub fn is_done(&self) -> bool {
        self.last_index == self.tokens.len()
    }

    /// Number of visible tokens.
    pub fn revealed(&self) -> usize {
        self.last_index
    }

    pub fn state(&self) -> LayoutState {
        if self.tokens.is_empty() {
            LayoutState::Empty
        } else if self.last_index == 0 {
            LayoutState::Accumulating
        } else if self.is_done() {
            LayoutState::FullyRevealed
        } else {
            LayoutState::PartiallyRevealed
        }
    }

    /// Absolute position of a token from the current row table: x is the
    /// width of everything before it in its row, y puts its bottom edge on
    /// the row's bottom edge.
    pub(super) fn place(&self, index: usize) -> Point {
        let slot = self.slots[index];
        let row = &self.rows[slot.row];
        let rows_above: u32 = self.rows[..slot.row].iter().map(|r| r.height()).sum();
        let token_height = row.entry(slot.column).map_or(0, |e| e.height);

        Point::new(
            row.offset_of(slot.column) as i32,
            (rows_above + row.height() - token_height) as i32,
        )
    }
}
