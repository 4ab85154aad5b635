//! Pixel buffers: where typeset output lands
//!
//! A [`PixelBuffer`] is a tightly packed `width × height × bpp` byte array
//! with an explicit descriptor. Every write into it goes through
//! [`PixelBuffer::offset`], so glyphs that hang off the canvas are clipped
//! rather than corrupting neighbouring rows.
//!
//! Color data is premultiplied alpha throughout the pipeline.

/// Byte layout of one pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelFormat {
    #[default]
    Rgba8888,
    Bgra8888,
    /// Alpha only
    L8,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8888 | PixelFormat::Bgra8888 => 4,
            PixelFormat::L8 => 1,
        }
    }

    pub const fn has_color(self) -> bool {
        !matches!(self, PixelFormat::L8)
    }

    pub fn name(self) -> &'static str {
        match self {
            PixelFormat::Rgba8888 => "rgba8888",
            PixelFormat::Bgra8888 => "bgra8888",
            PixelFormat::L8 => "l8",
        }
    }
}

/// An owned image with an explicit `(width, height, format)` descriptor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Zero-filled (fully transparent) buffer
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let len = width as usize * height as usize * format.bytes_per_pixel();
        Self {
            width,
            height,
            format,
            data: vec![0; len],
        }
    }

    /// The 0×0 buffer; the identity element of compositing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap existing bytes, checking that their length matches the descriptor
    pub fn from_data(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        (data.len() == expected).then_some(Self {
            width,
            height,
            format,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// Byte offset of pixel `(x, y)`, or `None` when it lies outside the buffer
    pub fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * self.format.bytes_per_pixel())
    }

    /// Bytes of pixel `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        let start = self.offset(i64::from(x), i64::from(y))?;
        self.data.get(start..start + self.format.bytes_per_pixel())
    }

    /// Alpha of pixel `(x, y)` regardless of format
    pub fn alpha(&self, x: u32, y: u32) -> Option<u8> {
        self.pixel(x, y).and_then(|p| p.last().copied())
    }

    /// Re-encode into another pixel format
    ///
    /// RGBA ↔ BGRA swaps red and blue, color → L8 keeps alpha and
    /// L8 → color produces premultiplied white.
    pub fn convert(self, format: PixelFormat) -> PixelBuffer {
        if self.format == format {
            return self;
        }
        let pixels = self.width as usize * self.height as usize;
        let mut data = Vec::with_capacity(pixels * format.bytes_per_pixel());
        match (self.format, format) {
            (PixelFormat::L8, _) => {
                for &a in &self.data {
                    data.extend_from_slice(&[a, a, a, a]);
                }
            },
            (_, PixelFormat::L8) => {
                data.extend(self.data.chunks_exact(4).map(|p| p[3]));
            },
            _ => {
                for p in self.data.chunks_exact(4) {
                    data.extend_from_slice(&[p[2], p[1], p[0], p[3]]);
                }
            },
        }
        log::trace!(
            "converted {}x{} buffer from {} to {}",
            self.width,
            self.height,
            self.format.name(),
            format.name()
        );
        PixelBuffer {
            width: self.width,
            height: self.height,
            format,
            data,
        }
    }

    /// Copy `rows` rows starting at `y` into a new buffer (clamped to the image)
    pub fn crop_rows(&self, y: u32, rows: u32) -> PixelBuffer {
        let y = y.min(self.height);
        let rows = rows.min(self.height - y);
        let stride = self.stride();
        let start = y as usize * stride;
        let end = start + rows as usize * stride;
        PixelBuffer {
            width: self.width,
            height: rows,
            format: self.format,
            data: self.data[start..end].to_vec(),
        }
    }
}

/// A rasterized glyph as handed out by a [`crate::FontClient`]
///
/// Monochrome glyphs are usually `L8`; color glyphs are `Rgba8888` or
/// `Bgra8888`. Only the last byte of a monochrome pixel is read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
    /// Multi-color glyph (emoji): its own colors are kept
    pub is_color_emoji: bool,
    /// Color glyph coming from an embedded bitmap; tinted by the text color
    pub is_color_bitmap: bool,
    /// Shift applied when drawing the outline bitmap of this glyph
    pub outline_offset_x: i32,
    pub outline_offset_y: i32,
}

impl GlyphBitmap {
    /// Alpha-only bitmap
    pub fn mask(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            format: PixelFormat::L8,
            data,
            ..Self::default()
        }
    }

    pub fn is_color(&self) -> bool {
        self.is_color_emoji || self.is_color_bitmap
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Bytes of source pixel `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.format.bytes_per_pixel();
        let start = (y as usize * self.width as usize + x as usize) * bpp;
        self.data.get(start..start + bpp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_rejects_outside_pixels() {
        let buffer = PixelBuffer::new(4, 3, PixelFormat::Rgba8888);
        assert_eq!(buffer.offset(0, 0), Some(0));
        assert_eq!(buffer.offset(1, 1), Some(20));
        assert_eq!(buffer.offset(-1, 0), None);
        assert_eq!(buffer.offset(4, 0), None);
        assert_eq!(buffer.offset(0, 3), None);
    }

    #[test]
    fn test_from_data_checks_length() {
        assert!(PixelBuffer::from_data(2, 2, PixelFormat::L8, vec![0; 4]).is_some());
        assert!(PixelBuffer::from_data(2, 2, PixelFormat::Rgba8888, vec![0; 4]).is_none());
    }

    #[test]
    fn test_convert_rgba_to_bgra_and_l8() {
        let buffer =
            PixelBuffer::from_data(1, 1, PixelFormat::Rgba8888, vec![10, 20, 30, 40]).unwrap();
        let bgra = buffer.clone().convert(PixelFormat::Bgra8888);
        assert_eq!(bgra.data(), &[30, 20, 10, 40]);
        let l8 = buffer.convert(PixelFormat::L8);
        assert_eq!(l8.data(), &[40]);
    }

    #[test]
    fn test_l8_to_rgba_is_premultiplied_white() {
        let buffer = PixelBuffer::from_data(2, 1, PixelFormat::L8, vec![0, 128]).unwrap();
        let rgba = buffer.convert(PixelFormat::Rgba8888);
        assert_eq!(rgba.data(), &[0, 0, 0, 0, 128, 128, 128, 128]);
    }

    #[test]
    fn test_crop_rows_clamps() {
        let data: Vec<u8> = (0..6).collect();
        let buffer = PixelBuffer::from_data(2, 3, PixelFormat::L8, data).unwrap();
        let tile = buffer.crop_rows(2, 5);
        assert_eq!(tile.height(), 1);
        assert_eq!(tile.data(), &[4, 5]);
    }

    #[test]
    fn test_glyph_pixel_lookup() {
        let glyph = GlyphBitmap::mask(2, 2, vec![1, 2, 3, 4]);
        assert_eq!(glyph.pixel(1, 1), Some(&[4u8][..]));
        assert_eq!(glyph.pixel(2, 0), None);
    }
}
