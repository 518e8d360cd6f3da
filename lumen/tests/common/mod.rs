//! Shared fixtures for integration tests.

use lumen::{Color, Glyph, Raster, Rasterizer, Surface};

/// Deterministic block-glyph font: every non-space char is a solid
/// `px/2 x px` block sitting on the baseline, so tests need no system fonts.
pub struct BlockFont {
    pub pixel_size: u32,
}

impl BlockFont {
    pub fn new(pixel_size: u32) -> Self {
        Self { pixel_size }
    }
}

impl Rasterizer for BlockFont {
    fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    fn set_pixel_size(&mut self, pixel_size: u32) {
        self.pixel_size = pixel_size;
    }

    fn glyph(&mut self, ch: char) -> Option<Glyph> {
        let w = self.pixel_size / 2;
        let h = self.pixel_size;
        if ch == ' ' {
            return Some(Glyph { raster: Raster::new(0, 0), left: 0, top: 0, advance: w as i32 });
        }
        Some(Glyph {
            raster: Raster::from_coverage(w, h, vec![255; (w * h) as usize])?,
            left: 0,
            top: h as i32,
            advance: w as i32,
        })
    }
}

pub fn solid(w: i32, h: i32, color: Color) -> Surface {
    let mut s = Surface::new(w, h).expect("valid size");
    s.clear(color);
    s
}
