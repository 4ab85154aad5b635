//! The seams of the pipeline
//!
//! The typesetter does not know where glyphs come from: a [`FontClient`]
//! answers metric and bitmap questions for a font id. Output leaves the
//! pipeline through an [`Exporter`].

use crate::error::Result;
use crate::pixel::{GlyphBitmap, PixelBuffer};
use crate::types::{FontId, GlyphInfo};

/// Vertical metrics of a font at its configured size, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FontMetrics {
    /// Baseline to top of the line box (positive)
    pub ascender: f32,
    /// Baseline to bottom of the line box (negative)
    pub descender: f32,
    /// `ascender - descender`
    pub height: f32,
    /// Distance from the baseline to the underline (negative is below)
    pub underline_position: f32,
    pub underline_thickness: f32,
}

/// Font metrics, glyph lookup and glyph rasterization
///
/// Implementations must be callable from any thread. Unknown fonts or
/// glyphs are not errors here: they yield defaults or `None` and the glyph
/// contributes nothing to the image.
pub trait FontClient: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Metrics of `font_id`
    fn font_metrics(&self, font_id: FontId) -> FontMetrics;

    /// Rasterize one glyph
    ///
    /// `outline_width` is non-zero when the outline (or the shadow of an
    /// outlined text) is requested; the bitmap then covers the stroked
    /// outline, grown by `outline_width` on every side.
    fn create_bitmap(
        &self,
        font_id: FontId,
        glyph_index: u32,
        is_italic_required: bool,
        is_bold_required: bool,
        outline_width: u32,
    ) -> Option<GlyphBitmap>;

    /// Shape a single character into a glyph, used by the simple layout
    fn glyph_info(&self, font_id: FontId, character: char) -> Option<GlyphInfo>;
}

/// Encodes a finished [`PixelBuffer`]
pub trait Exporter: Send + Sync {
    fn name(&self) -> &'static str;

    fn export(&self, buffer: &PixelBuffer) -> Result<Vec<u8>>;

    fn extension(&self) -> &'static str;

    fn mime_type(&self) -> &'static str;
}
