//! Lumen: rich-text reveal layout over RGBA surfaces.
//!
//! Lumen provides the text presentation core of a multimedia scripting
//! runtime:
//! - Owned RGBA surfaces with a bit-exact integer "over" compositor
//! - Glyph rasterization into coverage masks (cosmic-text backed)
//! - A row-packing layout of words, ruby words, images and clickable labels
//! - Typewriter-style incremental reveal and pointer hit-testing
//!
//! # Usage
//!
//! ```ignore
//! use lumen::{FontManager, Layout, LayoutConfig, Surface};
//!
//! let fonts = FontManager::new();
//! let mut layout = Layout::from_manager(LayoutConfig { wrap_width: 320, ..Default::default() }, &fonts)?;
//! layout.reserve_word("Hello", "")?;
//! layout.reserve_word("world", "")?;
//!
//! // once per animation tick
//! layout.show_next();
//!
//! let mut screen = Surface::new(640, 480)?;
//! layout.draw_on(&mut screen, 10, 10, 255);
//! ```
//!
//! Everything is single-threaded and synchronous.

// Core primitives
pub mod primitives;
pub mod compositor;
pub mod surface;
pub mod raster;

// Text
pub mod font;
pub mod layout;

// Ambient
pub mod config;
pub mod error;

pub use primitives::{Color, Point, Rect};
pub use compositor::{blend, blend_coverage, scale_alpha};
pub use surface::{DrawTarget, Surface};
pub use raster::Raster;
pub use font::{Font, FontManager, Glyph, Rasterizer};
pub use layout::{Callback, Layout, LayoutState, Row, Token, TokenKind};
pub use config::{LayoutConfig, UNBOUNDED};
pub use error::{LumenError, Result};
