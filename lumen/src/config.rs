//! Layout configuration.
//!
//! Loaded from JSON; every field is optional and falls back to
//! [`LayoutConfig::default`].
//!
//! ```json
//! {
//!   "wrap_width": 320,
//!   "font_family": "serif",
//!   "font_size": 18,
//!   "foreground": "#ffffff",
//!   "hover": "#ffd700"
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::primitives::Color;

/// Wrap width meaning "never wrap".
pub const UNBOUNDED: i32 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Maximum row width in pixels, or `-1` for a single unbounded row.
    pub wrap_width: i32,
    /// Extra pixels after every glyph when rendering words.
    pub glyph_spacing: i32,
    /// Body font pixel size; ruby text renders at half of it.
    pub font_size: u32,
    pub font_family: String,
    /// Color for words and the normal state of links.
    pub foreground: Color,
    /// Color for the hover state of links.
    pub hover: Color,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            wrap_width: UNBOUNDED,
            glyph_spacing: 0,
            font_size: 16,
            font_family: "sans-serif".to_string(),
            foreground: Color::WHITE,
            hover: Color::rgb(255, 215, 0),
        }
    }
}

impl LayoutConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        tracing::debug!("Loaded layout config from {:?}", path);
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
