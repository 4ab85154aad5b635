//! Layer compositing

use typeset_core::{PixelBuffer, PixelFormat};

/// Premultiplied "over": `top` above `bottom`
///
/// An empty buffer is the identity, so callers can fold optional layers
/// without special cases. Both layers are brought to RGBA first; the result
/// is RGBA with the size of `top` (layers are always built at the same
/// size, pixels missing from `bottom` count as transparent).
pub fn combine_image_buffer(top: PixelBuffer, bottom: PixelBuffer) -> PixelBuffer {
    if top.is_empty() {
        return bottom;
    }
    if bottom.is_empty() {
        return top;
    }
    let mut top = top.convert(PixelFormat::Rgba8888);
    let bottom = bottom.convert(PixelFormat::Rgba8888);
    if top.width() != bottom.width() || top.height() != bottom.height() {
        log::warn!(
            "combining {}x{} over {}x{}",
            top.width(),
            top.height(),
            bottom.width(),
            bottom.height()
        );
    }

    let width = top.width();
    for y in 0..top.height() {
        for x in 0..width {
            let Some(under) = bottom.pixel(x, y).map(|p| [p[0], p[1], p[2], p[3]]) else {
                continue;
            };
            let Some(offset) = top.offset(i64::from(x), i64::from(y)) else {
                continue;
            };
            let over = &mut top.data_mut()[offset..offset + 4];
            let alpha = over[3];
            if alpha == 255 {
                continue;
            }
            let remaining = 255 - u32::from(alpha);
            for (channel, value) in over.iter_mut().enumerate() {
                let blended = u32::from(*value) + u32::from(under[channel]) * remaining / 255;
                *value = blended.min(255) as u8;
            }
        }
    }
    top
}
