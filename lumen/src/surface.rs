//! Owned RGBA pixel surfaces and the drawing contract they share with
//! external screens.
//!
//! A [`Surface`] is the backing store for every drawable image: loaded
//! pictures, rendered words, ruby composites and layout token bitmaps. Any
//! texture derived from a surface can watch [`Surface::generation`] or drain
//! [`Surface::take_dirty_region`] to know when to re-upload.

use std::path::Path;

use crate::compositor::{blend, blend_coverage, scale_alpha};
use crate::error::{LumenError, Result};
use crate::primitives::{Color, Rect};
use crate::raster::Raster;

/// Anything that accepts blended pixel writes.
///
/// Implemented by [`Surface`]; a display-backed screen implements the same
/// contract but renders immediately, with no read-back guarantees.
pub trait DrawTarget {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Blend `color` over the pixel at `(x, y)`. Returns `false` (and does
    /// nothing) when the coordinate is out of bounds.
    fn blend_pixel(&mut self, x: i32, y: i32, color: Color) -> bool;

    /// Use `raster` as an alpha mask for `color`, placed at `(ox, oy)`.
    /// Destination pixels outside the target are skipped.
    fn draw_raster(&mut self, raster: &Raster, ox: i32, oy: i32, color: Color) {
        for y in 0..raster.height() {
            for x in 0..raster.width() {
                let (Some(px), Some(py)) = (ox.checked_add(x as i32), oy.checked_add(y as i32)) else {
                    continue;
                };
                self.blend_pixel(px, py, scale_alpha(color, raster.coverage(x, y)));
            }
        }
    }

    /// Composite `src` at `(x, y)` with its alpha scaled by `alpha / 255`.
    /// Returns whether any pixel landed on the target.
    fn draw_surface(&mut self, src: &Surface, x: i32, y: i32, alpha: u8) -> bool {
        let mut touched = false;
        for sy in 0..src.height() {
            for sx in 0..src.width() {
                let (Some(dx), Some(dy)) = (x.checked_add(sx as i32), y.checked_add(sy as i32)) else {
                    continue;
                };
                let px = src.pixel_unchecked(sx, sy);
                touched |= self.blend_pixel(dx, dy, scale_alpha(px, alpha));
            }
        }
        touched
    }

    /// Blend a solid rectangle.
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        for py in y..y.saturating_add(h) {
            for px in x..x.saturating_add(w) {
                self.blend_pixel(px, py, color);
            }
        }
    }
}

/// A fixed-size RGBA8 pixel buffer.
#[derive(Debug, Clone)]
pub struct Surface {
    width: u32,
    height: u32,
    /// Interleaved R, G, B, A, row-major.
    pixels: Vec<u8>,
    /// Incremented on every write.
    generation: u32,
    /// Bounding box of writes since the last `take_dirty_region`, exclusive max.
    dirty_region: Option<(u32, u32, u32, u32)>,
}

impl Surface {
    /// Create a fully transparent surface. Fails when either side is `<= 0`.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(LumenError::InvalidDimensions { width, height });
        }
        let (width, height) = (width as u32, height as u32);
        Ok(Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
            generation: 0,
            dirty_region: None,
        })
    }

    /// Wrap raw RGBA bytes.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(LumenError::InvalidDimensions {
                width: width.min(i32::MAX as u32) as i32,
                height: height.min(i32::MAX as u32) as i32,
            });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(LumenError::BufferSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            generation: 0,
            dirty_region: None,
        })
    }

    /// Decode an image file (any format the `image` crate reads) to RGBA.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)?.to_rgba8();
        let (w, h) = img.dimensions();
        tracing::debug!("Loaded {}x{} surface from {:?}", w, h, path);
        Self::from_rgba(w, h, img.into_raw())
    }

    /// Encode to a file; the format follows the path's extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        image::save_buffer(
            path.as_ref(),
            &self.pixels,
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )?;
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Raw RGBA bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Current change generation.
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Take the dirty region (returns `None` if clean, resets to clean).
    pub fn take_dirty_region(&mut self) -> Option<(u32, u32, u32, u32)> {
        self.dirty_region.take()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    #[inline]
    pub(crate) fn pixel_unchecked(&self, x: u32, y: u32) -> Color {
        let i = self.index(x, y);
        Color::from_slice(&self.pixels[i..i + 4])
    }

    #[inline]
    fn write(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i..i + 4].copy_from_slice(&color.to_array());
    }

    /// Record a write covering `rect` (already clipped to the surface).
    fn touch(&mut self, rect: Rect) {
        let (min_x, min_y) = (rect.x as u32, rect.y as u32);
        let (max_x, max_y) = (rect.right() as u32, rect.bottom() as u32);
        self.generation = self.generation.wrapping_add(1);
        self.dirty_region = Some(match self.dirty_region {
            Some((ox, oy, ow, oh)) => (ox.min(min_x), oy.min(min_y), ow.max(max_x), oh.max(max_y)),
            None => (min_x, min_y, max_x, max_y),
        });
    }

    /// Pixel at `(x, y)`, or `None` outside the surface.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.pixel_unchecked(x as u32, y as u32))
    }

    /// Overwrite (no blending) the pixel at `(x, y)`.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.write(x as u32, y as u32, color);
        self.touch(Rect::new(x, y, 1, 1));
        true
    }

    /// Clear a rectangle.
    ///
    /// A visible `color` is written exactly. A color with zero alpha only
    /// zeroes the alpha channel and leaves RGB intact, so later redraws that
    /// blend over a transparent pixel still see the old RGB values.
    pub fn clear_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let Some(area) = Rect::new(x, y, w, h).intersection(&self.bounds()) else {
            return;
        };

        for py in area.y..area.bottom() {
            for px in area.x..area.right() {
                let i = self.index(px as u32, py as u32);
                if color.a > 0 {
                    self.pixels[i..i + 4].copy_from_slice(&color.to_array());
                } else {
                    self.pixels[i + 3] = 0;
                }
            }
        }
        self.touch(area);
    }

    /// Clear the whole surface (same alpha rule as [`Surface::clear_rect`]).
    pub fn clear(&mut self, color: Color) {
        self.clear_rect(0, 0, self.width as i32, self.height as i32, color);
    }

    /// Exchange pixel buffers with another surface of the same size.
    pub fn swap_buffer(&mut self, other: &mut Surface) -> Result<()> {
        if self.width != other.width || self.height != other.height {
            tracing::warn!(
                "Refusing buffer swap between {}x{} and {}x{}",
                self.width,
                self.height,
                other.width,
                other.height
            );
            return Err(LumenError::SizeMismatch(
                self.width,
                self.height,
                other.width,
                other.height,
            ));
        }
        std::mem::swap(&mut self.pixels, &mut other.pixels);
        let bounds = self.bounds();
        self.touch(bounds);
        other.touch(bounds);
        Ok(())
    }
}

/// Surfaces are equal when their size and pixels match; write bookkeeping is
/// ignored.
impl PartialEq for Surface {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.pixels == other.pixels
    }
}

impl Eq for Surface {}

impl DrawTarget for Surface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: Color) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        if color.a == 0 {
            return true;
        }
        let (x, y) = (x as u32, y as u32);
        let out = blend(self.pixel_unchecked(x, y), color);
        self.write(x, y, out);
        self.touch(Rect::new(x as i32, y as i32, 1, 1));
        true
    }

    fn draw_raster(&mut self, raster: &Raster, ox: i32, oy: i32, color: Color) {
        let placed = Rect::new(ox, oy, raster.width() as i32, raster.height() as i32);
        let Some(area) = placed.intersection(&self.bounds()) else {
            return;
        };

        for py in area.y..area.bottom() {
            for px in area.x..area.right() {
                let coverage = raster.coverage((px - ox) as u32, (py - oy) as u32);
                let (x, y) = (px as u32, py as u32);
                let out = blend_coverage(self.pixel_unchecked(x, y), color, coverage);
                self.write(x, y, out);
            }
        }
        self.touch(area);
    }

    fn draw_surface(&mut self, src: &Surface, x: i32, y: i32, alpha: u8) -> bool {
        let placed = Rect::new(x, y, src.width as i32, src.height as i32);
        let Some(area) = placed.intersection(&self.bounds()) else {
            return false;
        };

        for py in area.y..area.bottom() {
            for px in area.x..area.right() {
                let s = scale_alpha(src.pixel_unchecked((px - x) as u32, (py - y) as u32), alpha);
                let (dx, dy) = (px as u32, py as u32);
                let out = blend(self.pixel_unchecked(dx, dy), s);
                self.write(dx, dy, out);
            }
        }
        self.touch(area);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_non_positive_dimensions() {
        assert!(Surface::new(0, 10).is_err());
        assert!(Surface::new(10, -1).is_err());
        let s = Surface::new(3, 2).unwrap();
        assert_eq!(s.as_bytes().len(), 3 * 2 * 4);
        assert!(s.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_from_rgba_checks_length() {
        assert!(Surface::from_rgba(2, 2, vec![0; 15]).is_err());
        assert!(Surface::from_rgba(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn test_pixel_access_out_of_range() {
        let mut s = Surface::new(4, 4).unwrap();
        assert_eq!(s.get_pixel(-1, 0), None);
        assert_eq!(s.get_pixel(4, 0), None);
        assert!(!s.set_pixel(0, 4, Color::RED));
        assert_eq!(s.generation(), 0);

        assert!(s.set_pixel(3, 3, Color::RED));
        assert_eq!(s.get_pixel(3, 3), Some(Color::RED));
    }

    #[test]
    fn test_clear_rect_visible_color_overwrites() {
        let mut s = Surface::new(4, 4).unwrap();
        s.clear(Color::rgba(10, 20, 30, 40));
        s.clear_rect(1, 1, 2, 2, Color::rgba(200, 100, 50, 10));
        assert_eq!(s.get_pixel(1, 1), Some(Color::rgba(200, 100, 50, 10)));
        assert_eq!(s.get_pixel(0, 0), Some(Color::rgba(10, 20, 30, 40)));
    }

    #[test]
    fn test_clear_rect_transparent_only_zeroes_alpha() {
        let mut s = Surface::new(2, 2).unwrap();
        s.clear(Color::rgba(10, 20, 30, 255));
        s.clear_rect(0, 0, 1, 1, Color::rgba(99, 99, 99, 0));
        assert_eq!(s.get_pixel(0, 0), Some(Color::rgba(10, 20, 30, 0)));
        assert_eq!(s.get_pixel(1, 0), Some(Color::rgba(10, 20, 30, 255)));
    }

    #[test]
    fn test_clear_rect_is_clipped() {
        let mut s = Surface::new(2, 2).unwrap();
        s.clear_rect(-5, -5, 6, 6, Color::GREEN);
        assert_eq!(s.get_pixel(0, 0), Some(Color::GREEN));
        assert_eq!(s.get_pixel(1, 1), Some(Color::TRANSPARENT));
        assert_eq!(s.take_dirty_region(), Some((0, 0, 1, 1)));

        s.clear_rect(10, 10, 2, 2, Color::GREEN);
        assert_eq!(s.take_dirty_region(), None);
    }

    #[test]
    fn test_draw_raster_masks_color_and_skips_outside() {
        let mut s = Surface::new(2, 1).unwrap();
        s.clear(Color::BLACK);
        let r = Raster::from_coverage(3, 1, vec![255, 0, 255]).unwrap();
        s.draw_raster(&r, 0, 0, Color::WHITE);
        assert_eq!(s.get_pixel(0, 0), Some(Color::WHITE));
        assert_eq!(s.get_pixel(1, 0), Some(Color::BLACK));
    }

    #[test]
    fn test_draw_raster_effective_alpha_truncates() {
        let mut s = Surface::new(1, 1).unwrap();
        s.clear(Color::rgba(0, 0, 0, 255));
        let r = Raster::from_coverage(1, 1, vec![128]).unwrap();
        s.draw_raster(&r, 0, 0, Color::rgba(255, 0, 0, 200));
        // effective alpha = 200 * 128 / 255 = 100
        assert_eq!(s.get_pixel(0, 0), Some(Color::rgba(100, 0, 0, 255)));
    }

    #[test]
    fn test_draw_surface_applies_global_alpha() {
        let mut dst = Surface::new(2, 2).unwrap();
        dst.clear(Color::BLACK);
        let mut src = Surface::new(1, 1).unwrap();
        src.clear(Color::WHITE);

        assert!(dst.draw_surface(&src, 1, 1, 255));
        assert_eq!(dst.get_pixel(1, 1), Some(Color::WHITE));

        assert!(dst.draw_surface(&src, 0, 0, 0));
        assert_eq!(dst.get_pixel(0, 0), Some(Color::BLACK));

        assert!(!dst.draw_surface(&src, 5, 5, 255));
    }

    #[test]
    fn test_extreme_offsets_are_clipped() {
        let mut s = Surface::new(4, 4).unwrap();
        s.clear_rect(1, 0, i32::MAX, 1, Color::RED);
        assert_eq!(s.get_pixel(3, 0), Some(Color::RED));
        assert_eq!(s.get_pixel(0, 0), Some(Color::TRANSPARENT));
        s.clear_rect(i32::MIN, i32::MIN, i32::MAX, i32::MAX, Color::BLUE);
        assert_eq!(s.get_pixel(0, 0), Some(Color::TRANSPARENT));

        let r = Raster::from_coverage(2, 2, vec![255; 4]).unwrap();
        s.draw_raster(&r, i32::MAX, 0, Color::WHITE);
        s.draw_raster(&r, i32::MIN, i32::MIN, Color::WHITE);

        let mut src = Surface::new(2, 2).unwrap();
        src.clear(Color::WHITE);
        assert!(!s.draw_surface(&src, i32::MAX, i32::MAX, 255));
        assert!(!s.draw_surface(&src, i32::MIN, 0, 255));
        s.fill_rect(i32::MAX, i32::MAX, 5, 5, Color::WHITE);

        assert_eq!(s.get_pixel(1, 1), Some(Color::TRANSPARENT));
        assert_eq!(s.get_pixel(3, 3), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_equality_ignores_write_history() {
        let mut a = Surface::new(2, 2).unwrap();
        let b = Surface::new(2, 2).unwrap();
        a.set_pixel(0, 0, Color::RED);
        a.set_pixel(0, 0, Color::TRANSPARENT);
        assert_ne!(a.generation(), b.generation());
        assert_eq!(a, b);
        assert_ne!(a, Surface::new(2, 1).unwrap());
    }

    #[test]
    fn test_swap_buffer_requires_same_size() {
        let mut a = Surface::new(1, 1).unwrap();
        let mut b = Surface::new(1, 1).unwrap();
        b.clear(Color::BLUE);
        a.swap_buffer(&mut b).unwrap();
        assert_eq!(a.get_pixel(0, 0), Some(Color::BLUE));
        assert_eq!(b.get_pixel(0, 0), Some(Color::TRANSPARENT));

        let mut c = Surface::new(2, 1).unwrap();
        assert!(a.swap_buffer(&mut c).is_err());
    }

    #[test]
    fn test_writes_bump_generation() {
        let mut s = Surface::new(2, 2).unwrap();
        let g0 = s.generation();
        s.fill_rect(0, 0, 1, 1, Color::RED);
        assert!(s.generation() > g0);
        assert_eq!(s.take_dirty_region(), Some((0, 0, 1, 1)));
    }
}
