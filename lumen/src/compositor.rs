//! Integer "over" compositing for non-premultiplied RGBA.
//!
//! All arithmetic is fixed-point with truncating division so output matches
//! existing renderings bit for bit. Intermediates are widened to `u32`.

use crate::primitives::Color;

/// Blend `src` over `dst`.
///
/// Fast paths: a transparent source is a no-op, and a transparent
/// destination or opaque source is a straight overwrite (this also keeps the
/// general branch away from a zero divisor).
#[inline]
pub fn blend(dst: Color, src: Color) -> Color {
    if src.a == 0 {
        return dst;
    }
    if dst.a == 0 || src.a == 255 {
        return src;
    }

    let sa = src.a as u32;
    let inv = 255 - sa;

    if dst.a == 255 {
        let over = |s: u8, d: u8| ((s as u32 * sa + d as u32 * inv) / 255) as u8;
        return Color::rgba(over(src.r, dst.r), over(src.g, dst.g), over(src.b, dst.b), 255);
    }

    // Destination weight after the source covers it, truncated before use.
    let base = dst.a as u32 * inv / 255;
    // sa > 0 here, so out_a > 0. Each channel is a weighted mean of s and d,
    // so it never exceeds 255.
    let out_a = sa + base;
    let over = |s: u8, d: u8| ((s as u32 * sa + d as u32 * base) / out_a) as u8;

    Color::rgba(
        over(src.r, dst.r),
        over(src.g, dst.g),
        over(src.b, dst.b),
        out_a as u8,
    )
}

/// Blend a solid `color` masked by an 8-bit `coverage` value.
#[inline]
pub fn blend_coverage(dst: Color, color: Color, coverage: u8) -> Color {
    blend(dst, scale_alpha(color, coverage))
}

/// Multiply a color's alpha by `alpha / 255` (truncating).
#[inline]
pub fn scale_alpha(color: Color, alpha: u8) -> Color {
    match alpha {
        255 => color,
        0 => color.with_alpha(0),
        _ => color.with_alpha((color.a as u32 * alpha as u32 / 255) as u8),
    }
}
