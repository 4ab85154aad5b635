//! PNG export format
//!
//! Typeset buffers hold premultiplied color; PNG wants straight alpha, so
//! color buffers are un-premultiplied on the way out. `L8` buffers are
//! written as grayscale coverage.

use image::{ExtendedColorType, ImageEncoder};
use typeset_core::{
    error::{ExportError, Result},
    Exporter, PixelBuffer, PixelFormat,
};

/// Straight-alpha RGBA bytes of a premultiplied color buffer
pub fn unpremultiplied_rgba(buffer: &PixelBuffer) -> Vec<u8> {
    let rgba = buffer.clone().convert(PixelFormat::Rgba8888);
    let mut data = rgba.into_data();
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u32 * 255 + a / 2) / a).min(255) as u8;
        }
    }
    data
}

/// Encode a buffer as PNG
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>> {
    if buffer.is_empty() {
        return Err(ExportError::EncodingFailed(format!(
            "cannot encode an empty {}x{} buffer",
            buffer.width(),
            buffer.height()
        ))
        .into());
    }
    let (data, color_type) = match buffer.format() {
        PixelFormat::L8 => (buffer.data().to_vec(), ExtendedColorType::L8),
        PixelFormat::Rgba8888 | PixelFormat::Bgra8888 => {
            (unpremultiplied_rgba(buffer), ExtendedColorType::Rgba8)
        },
    };

    let mut png_data = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new_with_quality(
        &mut png_data,
        image::codecs::png::CompressionType::Default,
        image::codecs::png::FilterType::Sub,
    );
    encoder
        .write_image(&data, buffer.width(), buffer.height(), color_type)
        .map_err(|e| ExportError::EncodingFailed(format!("PNG encoding failed: {}", e)))?;
    log::debug!(
        "encoded {}x{} {} buffer into {} PNG bytes",
        buffer.width(),
        buffer.height(),
        buffer.format().name(),
        png_data.len()
    );
    Ok(png_data)
}

/// PNG exporter
///
/// ```
/// use typeset_export::PngExporter;
/// let exporter = PngExporter::new();
/// ```
pub struct PngExporter;

impl PngExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for PngExporter {
    fn name(&self) -> &'static str {
        "png"
    }

    fn export(&self, buffer: &PixelBuffer) -> Result<Vec<u8>> {
        encode_png(buffer)
    }

    fn extension(&self) -> &'static str {
        "png"
    }

    fn mime_type(&self) -> &'static str {
        "image/png"
    }
}

impl Default for PngExporter {
    fn default() -> Self {
        Self::new()
    }
}
