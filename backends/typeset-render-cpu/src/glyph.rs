//! Placing one glyph bitmap into a layer buffer
//!
//! Monochrome glyphs are painted in the layer color and merged with what is
//! already there by taking the larger coverage, so touching glyphs never
//! leave seams. Color glyphs replace the pixels they cover.

use typeset_core::{Color, GlyphBitmap, PixelBuffer, PixelFormat, Vector2};

use crate::TypesetStyle;

/// A layer buffer plus the pen offset glyph positions are relative to
#[derive(Debug, Clone)]
pub struct GlyphData {
    pub buffer: PixelBuffer,
    pub horizontal_offset: i32,
    pub vertical_offset: i32,
}

impl GlyphData {
    pub fn new(buffer: PixelBuffer) -> Self {
        Self {
            buffer,
            horizontal_offset: 0,
            vertical_offset: 0,
        }
    }
}

/// Byte position of red, green, blue and alpha for a color format
fn channel_order(format: PixelFormat) -> [usize; 4] {
    match format {
        PixelFormat::Bgra8888 => [2, 1, 0, 3],
        _ => [0, 1, 2, 3],
    }
}

fn scale(value: f32, coverage: u8) -> u8 {
    (value * f32::from(coverage)) as u8
}

/// Draw `bitmap` with its top-left corner at `position` (relative to the
/// current pen offsets)
///
/// `color` must already be premultiplied. Pixels outside the buffer are
/// clipped. An L8 buffer only receives monochrome coverage.
///
/// Overlapping monochrome coverage keeps the larger value by comparing the
/// stored alpha with the new coverage. The stored alpha is already scaled
/// by `color.a`, so only opaque colors end up at the maximum coverage. A
/// translucent color can lower the alpha where glyphs overlap. Color glyph
/// pixels replace the destination, transparent ones included.
pub fn typeset_glyph(
    data: &mut GlyphData,
    bitmap: &GlyphBitmap,
    position: Vector2,
    color: Color,
    style: TypesetStyle,
) {
    if bitmap.is_empty() || data.buffer.is_empty() {
        return;
    }
    let x_offset = (data.horizontal_offset as f32 + position.x) as i64;
    let y_offset = (data.vertical_offset as f32 + position.y) as i64;
    let format = data.buffer.format();

    if !format.has_color() {
        if bitmap.is_color() {
            return;
        }
        for y in 0..bitmap.height {
            for x in 0..bitmap.width {
                let Some(alpha) = bitmap.pixel(x, y).and_then(|p| p.last().copied()) else {
                    continue;
                };
                let Some(offset) = data
                    .buffer
                    .offset(x_offset + i64::from(x), y_offset + i64::from(y))
                else {
                    continue;
                };
                let dst = &mut data.buffer.data_mut()[offset];
                *dst = (*dst).max(alpha);
            }
        }
        return;
    }

    let dst_order = channel_order(format);
    let src_order = channel_order(bitmap.format);
    let src_is_color = bitmap.is_color() && bitmap.format.has_color();

    for y in 0..bitmap.height {
        for x in 0..bitmap.width {
            let Some(src) = bitmap.pixel(x, y) else {
                continue;
            };
            let Some(offset) = data
                .buffer
                .offset(x_offset + i64::from(x), y_offset + i64::from(y))
            else {
                continue;
            };
            let dst = &mut data.buffer.data_mut()[offset..offset + 4];

            if src_is_color {
                let source_alpha = src[src_order[3]];
                let rgba = color_glyph_pixel(src, src_order, source_alpha, bitmap, color, style);
                for (channel, value) in rgba.into_iter().enumerate() {
                    dst[dst_order[channel]] = value;
                }
            } else {
                let alpha = src.last().copied().unwrap_or(0);
                if alpha == 0 {
                    continue;
                }
                let coverage = dst[dst_order[3]].max(alpha);
                dst[dst_order[0]] = scale(color.r, coverage);
                dst[dst_order[1]] = scale(color.g, coverage);
                dst[dst_order[2]] = scale(color.b, coverage);
                dst[dst_order[3]] = scale(color.a, coverage);
            }
        }
    }
}

/// Final RGBA of one pixel of a color glyph
fn color_glyph_pixel(
    src: &[u8],
    src_order: [usize; 4],
    source_alpha: u8,
    bitmap: &GlyphBitmap,
    color: Color,
    style: TypesetStyle,
) -> [u8; 4] {
    match style {
        // the mask layer punches color glyphs out; outlines are drawn from
        // the monochrome shape only
        TypesetStyle::Mask | TypesetStyle::Outline => [0; 4],
        TypesetStyle::Shadow => {
            let alpha = scale(color.a, source_alpha);
            [
                scale(color.r, alpha),
                scale(color.g, alpha),
                scale(color.b, alpha),
                alpha,
            ]
        },
        _ => {
            let alpha = scale(color.a, source_alpha);
            let tint = [color.r, color.g, color.b];
            let mut rgba = [0, 0, 0, alpha];
            for channel in 0..3 {
                let value = (u32::from(src[src_order[channel]]) * u32::from(alpha) / 255) as u8;
                rgba[channel] = if bitmap.is_color_bitmap {
                    (f32::from(value) * tint[channel]) as u8
                } else {
                    value
                };
            }
            rgba
        },
    }
}
