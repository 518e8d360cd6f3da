//! Single-channel coverage bitmaps.

/// An 8-bit coverage mask (0 = transparent, 255 = opaque), row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// A fully transparent raster.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    /// Wrap existing coverage bytes. Returns `None` on a length mismatch.
    pub fn from_coverage(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != width as usize * height as usize {
            return None;
        }
        Some(Self { width, height, data })
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
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Coverage at `(x, y)`, or 0 outside the raster.
    #[inline]
    pub fn coverage(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[(y * self.width + x) as usize]
    }

    /// Stamp `src` at `(ox, oy)`, keeping the larger coverage where glyphs
    /// overlap. Pixels falling outside `self` are dropped.
    pub fn stamp(&mut self, src: &Raster, ox: i32, oy: i32) {
        for sy in 0..src.height {
            let dy = oy + sy as i32;
            if dy < 0 || dy >= self.height as i32 {
                continue;
            }
            for sx in 0..src.width {
                let dx = ox + sx as i32;
                if dx < 0 || dx >= self.width as i32 {
                    continue;
                }
                let idx = (dy as u32 * self.width + dx as u32) as usize;
                let c = src.data[(sy * src.width + sx) as usize];
                if c > self.data[idx] {
                    self.data[idx] = c;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_out_of_bounds_is_zero() {
        let r = Raster::from_coverage(2, 1, vec![10, 20]).unwrap();
        assert_eq!(r.coverage(1, 0), 20);
        assert_eq!(r.coverage(2, 0), 0);
        assert_eq!(r.coverage(0, 1), 0);
    }

    #[test]
    fn test_from_coverage_rejects_bad_length() {
        assert!(Raster::from_coverage(2, 2, vec![0; 3]).is_none());
    }

    #[test]
    fn test_stamp_clips_and_keeps_max() {
        let mut dst = Raster::new(3, 2);
        let src = Raster::from_coverage(2, 2, vec![100, 200, 50, 255]).unwrap();
        dst.stamp(&src, 2, 0);
        dst.stamp(&src, -1, 1);
        assert_eq!(dst.data(), &[0, 0, 100, 200, 0, 50]);
        dst.stamp(&Raster::from_coverage(1, 1, vec![20]).unwrap(), 0, 1);
        assert_eq!(dst.coverage(0, 1), 200);
    }
}
