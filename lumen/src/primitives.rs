//! Core primitive types for Lumen.
//!
//! Integer geometry and 8-bit RGBA color. Everything the compositor and
//! layout touch is in whole pixels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::LumenError;

/// A point in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Check if a point is inside this rectangle.
    ///
    /// Both edges are inclusive of the last covered pixel: a 10x10 rect at
    /// the origin contains `(9, 9)` but not `(10, 10)`.
    #[inline]
    pub fn contains_xy(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Get the right edge X coordinate (exclusive), saturating at `i32::MAX`.
    #[inline]
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Get the bottom edge Y coordinate (exclusive), saturating at `i32::MAX`.
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Get the intersection of two rectangles, if any.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= x || bottom <= y {
            return None;
        }

        Some(Rect {
            x,
            y,
            width: right.saturating_sub(x),
            height: bottom.saturating_sub(y),
        })
    }
}

/// RGBA color with 8-bit, non-premultiplied channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with a different alpha.
    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Read a color from the first four bytes of an RGBA slice.
    #[inline]
    pub fn from_slice(px: &[u8]) -> Self {
        Self::rgba(px[0], px[1], px[2], px[3])
    }

    #[inline]
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Result<Self, LumenError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let bad = || LumenError::InvalidColor(hex.to_string());

        if !digits.is_ascii() || (digits.len() != 6 && digits.len() != 8) {
            return Err(bad());
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| bad());
        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Color {
    type Err = LumenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_inclusive_edges() {
        let r = Rect::new(10, 20, 5, 4);
        assert!(r.contains_xy(10, 20));
        assert!(r.contains_xy(14, 23));
        assert!(!r.contains_xy(9, 20));
        assert!(!r.contains_xy(15, 24));
        assert!(!r.contains_xy(14, 24));
    }

    #[test]
    fn test_empty_rect_contains_nothing() {
        let r = Rect::new(3, 3, 0, 0);
        assert!(!r.contains_xy(3, 3));
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersection(&b), Some(Rect::new(5, 5, 5, 5)));
        assert_eq!(a.intersection(&Rect::new(10, 0, 4, 4)), None);
    }

    #[test]
    fn test_rect_edges_saturate_at_extremes() {
        let far = Rect::new(1, 0, i32::MAX, 1);
        assert_eq!(far.right(), i32::MAX);
        assert!(far.contains_xy(i32::MAX - 1, 0));

        let bounds = Rect::new(0, 0, 4, 4);
        assert_eq!(far.intersection(&bounds), Some(Rect::new(1, 0, 3, 1)));
        assert_eq!(Rect::new(i32::MAX, i32::MAX, 10, 10).intersection(&bounds), None);
        assert_eq!(Rect::new(i32::MIN, i32::MIN, 10, 10).intersection(&bounds), None);
        assert_eq!(
            Rect::new(i32::MIN, 0, i32::MAX, 2).intersection(&Rect::new(-10, 0, i32::MAX, 2)),
            Some(Rect::new(-10, 0, 9, 2))
        );
    }

    #[test]
    fn test_color_hex_parsing() {
        assert_eq!(Color::from_hex("#ff8000").unwrap(), Color::rgb(255, 128, 0));
        assert_eq!(Color::from_hex("10203040").unwrap(), Color::rgba(0x10, 0x20, 0x30, 0x40));
        assert!(Color::from_hex("#fff").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
    }

    #[test]
    fn test_color_display_round_trips() {
        let c = Color::rgba(1, 2, 254, 128);
        assert_eq!(c.to_string(), "#0102fe80");
        assert_eq!(c.to_string().parse::<Color>().unwrap(), c);
    }
}
