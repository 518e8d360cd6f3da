//! Glyph rasterization.
//!
//! [`Rasterizer`] is the contract the layout engine consumes: per-glyph
//! coverage bitmaps plus bearings, and the string concatenation built on
//! top of them. [`Font`] implements it with cosmic-text's SwashCache over a
//! caller-owned [`FontManager`].
//!
//! Vertical placement: every string raster is `ceil(pixel_size * 1.25)`
//! tall and a glyph's top row sits at `pixel_size - bitmap_top`, which
//! puts the baseline at `pixel_size`.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache, SwashContent};

use crate::error::{LumenError, Result};
use crate::raster::Raster;

/// One rasterized glyph.
#[derive(Debug, Clone)]
pub struct Glyph {
    /// Coverage mask; may be 0x0 for blank glyphs such as space.
    pub raster: Raster,
    /// Horizontal bearing from the pen position to the bitmap's left edge.
    pub left: i32,
    /// Distance from the baseline up to the bitmap's top edge.
    pub top: i32,
    /// Pen advance in pixels.
    pub advance: i32,
}

/// Turns characters into coverage rasters.
pub trait Rasterizer {
    fn pixel_size(&self) -> u32;
    fn set_pixel_size(&mut self, pixel_size: u32);

    /// Rasterize a single character. `None` when the font has no glyph.
    fn glyph(&mut self, ch: char) -> Option<Glyph>;

    /// Height of every string raster at the current pixel size.
    fn line_height(&self) -> u32 {
        (self.pixel_size() * 5).div_ceil(4)
    }

    /// Rasterize one character with trailing `spacing`.
    fn rasterize(&mut self, ch: char, spacing: i32) -> Option<Raster> {
        let mut buf = [0u8; 4];
        self.rasterize_str(ch.encode_utf8(&mut buf), spacing)
    }

    /// Concatenate glyphs left to right, `spacing` extra pixels after each.
    ///
    /// Characters without a glyph are skipped. Returns `None` when nothing
    /// has width (empty text, or only missing glyphs).
    fn rasterize_str(&mut self, text: &str, spacing: i32) -> Option<Raster> {
        let baseline = self.pixel_size() as i32;
        let mut placed = Vec::new();
        let mut pen = 0i32;
        let mut width = 0i32;

        for ch in text.chars() {
            let Some(glyph) = self.glyph(ch) else {
                tracing::debug!("no glyph for {:?}", ch);
                continue;
            };
            let x = pen + glyph.left;
            width = width.max(pen + glyph.advance).max(x + glyph.raster.width() as i32);
            pen += glyph.advance + spacing;
            placed.push((x, baseline - glyph.top, glyph.raster));
        }

        if width <= 0 {
            return None;
        }

        let mut out = Raster::new(width as u32, self.line_height());
        for (x, y, raster) in &placed {
            out.stamp(raster, *x, *y);
        }
        Some(out)
    }
}

struct FontContext {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

/// Shared, single-threaded handle to the font database and glyph cache.
///
/// Construct one per runtime and hand clones to each [`Font`]. Cloning is
/// cheap; the database is dropped with the last handle.
#[derive(Clone)]
pub struct FontManager {
    inner: Rc<RefCell<FontContext>>,
}

impl FontManager {
    /// Load the system font database.
    pub fn new() -> Self {
        let font_system = FontSystem::new();
        tracing::debug!("Font manager initialized with {} faces", font_system.db().len());
        Self {
            inner: Rc::new(RefCell::new(FontContext {
                font_system,
                swash_cache: SwashCache::new(),
            })),
        }
    }

    /// Add a font file (TTF/OTF/TTC) to the database.
    pub fn load_font_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut ctx = self.inner.borrow_mut();
        if let Err(e) = ctx.font_system.db_mut().load_font_file(path) {
            tracing::warn!("Failed to load font {:?}: {}", path, e);
            return Err(LumenError::Io(e));
        }
        Ok(())
    }

    /// Add in-memory font data to the database.
    pub fn load_font_data(&self, data: Vec<u8>) {
        self.inner.borrow_mut().font_system.db_mut().load_font_data(data);
    }

    /// Number of faces currently known.
    pub fn face_count(&self) -> usize {
        self.inner.borrow().font_system.db().len()
    }

    /// Release this handle. The database goes away once every [`Font`]
    /// created from it is dropped too.
    pub fn shutdown(self) {
        let remaining = Rc::strong_count(&self.inner) - 1;
        if remaining > 0 {
            tracing::debug!("Font manager shut down with {} font(s) still alive", remaining);
        }
    }
}

impl Default for FontManager {
    fn default() -> Self {
        Self::new()
    }
}

/// A family at a pixel size, rendered through a [`FontManager`].
#[derive(Clone)]
pub struct Font {
    manager: FontManager,
    family: String,
    pixel_size: u32,
}

impl Font {
    /// `family` is a face name or one of the generic families
    /// `monospace`, `serif`, `sans-serif`, `cursive`, `fantasy`.
    pub fn new(manager: &FontManager, family: impl Into<String>, pixel_size: u32) -> Result<Self> {
        if pixel_size == 0 {
            return Err(LumenError::Font("pixel size must be positive".into()));
        }
        Ok(Self {
            manager: manager.clone(),
            family: family.into(),
            pixel_size,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }
}

fn family(name: &str) -> Family<'_> {
    match name {
        "monospace" => Family::Monospace,
        "serif" => Family::Serif,
        "sans-serif" => Family::SansSerif,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        other => Family::Name(other),
    }
}

impl Rasterizer for Font {
    fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    fn set_pixel_size(&mut self, pixel_size: u32) {
        self.pixel_size = pixel_size.max(1);
    }

    fn glyph(&mut self, ch: char) -> Option<Glyph> {
        let mut ctx = self.manager.inner.borrow_mut();
        let FontContext { font_system, swash_cache } = &mut *ctx;

        let size = self.pixel_size as f32;
        let mut buffer = Buffer::new(font_system, Metrics::new(size, size * 1.25));
        buffer.set_size(font_system, Some(f32::MAX), Some(f32::MAX));
        let attrs = Attrs::new().family(family(&self.family));
        let mut utf8 = [0u8; 4];
        buffer.set_text(font_system, ch.encode_utf8(&mut utf8), attrs, Shaping::Basic);
        buffer.shape_until_scroll(font_system, false);

        let (cache_key, advance) = buffer
            .layout_runs()
            .flat_map(|run| run.glyphs.iter())
            .next()
            .map(|g| (g.physical((0., 0.), 1.0).cache_key, g.w.round() as i32))?;

        let Some(image) = swash_cache.get_image_uncached(font_system, cache_key) else {
            // Blank glyph (e.g. space): advance only.
            return Some(Glyph {
                raster: Raster::new(0, 0),
                left: 0,
                top: 0,
                advance,
            });
        };

        let (w, h) = (image.placement.width, image.placement.height);
        let pixels = w as usize * h as usize;
        let coverage: Vec<u8> = match image.content {
            SwashContent::Mask => image.data.clone(),
            // Color bitmaps (emoji) contribute their alpha only.
            SwashContent::Color => image.data.chunks_exact(4).map(|px| px[3]).collect(),
            SwashContent::SubpixelMask => image
                .data
                .chunks_exact(3)
                .map(|px| ((px[0] as u16 + px[1] as u16 + px[2] as u16) / 3) as u8)
                .collect(),
        };
        if coverage.len() != pixels {
            tracing::warn!("Glyph {:?} bitmap size mismatch: {} != {}", ch, coverage.len(), pixels);
            return None;
        }

        Some(Glyph {
            raster: Raster::from_coverage(w, h, coverage)?,
            left: image.placement.left,
            top: image.placement.top,
            advance,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::testing::BlockFont;
    use super::*;

    #[test]
    fn test_line_height_pads_by_a_quarter() {
        assert_eq!(BlockFont { pixel_size: 16 }.line_height(), 20);
        assert_eq!(BlockFont { pixel_size: 10 }.line_height(), 13);
    }

    #[test]
    fn test_rasterize_str_concatenates_with_spacing() {
        let mut font = BlockFont { pixel_size: 16 };
        let r = font.rasterize_str("ab", 2).unwrap();
        // 8 + 2 + 8; trailing spacing does not widen the raster
        assert_eq!(r.width(), 18);
        assert_eq!(r.height(), 20);
        assert_eq!(r.coverage(0, 0), 255);
        assert_eq!(r.coverage(8, 0), 0);
        assert_eq!(r.coverage(10, 15), 255);
        // baseline at pixel_size: rows below it stay empty
        assert_eq!(r.coverage(0, 16), 0);
    }

    #[test]
    fn test_rasterize_str_empty_is_none() {
        let mut font = BlockFont { pixel_size: 16 };
        assert!(font.rasterize_str("", 0).is_none());
        assert!(font.rasterize_str("\u{FFFD}", 0).is_none());
    }

    #[test]
    fn test_space_has_width_but_no_ink() {
        let mut font = BlockFont { pixel_size: 16 };
        let r = font.rasterize(' ', 0).unwrap();
        assert_eq!(r.width(), 8);
        assert!(r.data().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_font_rejects_zero_size() {
        let manager = FontManager::new();
        assert!(Font::new(&manager, "monospace", 0).is_err());
        let font = Font::new(&manager, "monospace", 12).unwrap();
        assert_eq!(font.pixel_size(), 12);
        assert_eq!(font.family(), "monospace");
    }
}
