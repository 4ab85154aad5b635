//! Shared fixtures for unit tests

use typeset_core::{
    FontClient, FontId, FontMetrics, GlyphBitmap, GlyphInfo, GlyphRun, LineRun, PixelFormat,
    Vector2, ViewModel,
};

/// Glyph index the box font renders as a red emoji
pub const EMOJI: u32 = 99;

/// Every glyph is a solid box of `5 × 10` pixels
pub struct BoxFonts;

impl FontClient for BoxFonts {
    fn name(&self) -> &'static str {
        "box"
    }

    fn font_metrics(&self, _font_id: FontId) -> FontMetrics {
        FontMetrics {
            ascender: 10.0,
            descender: -3.0,
            height: 13.0,
            underline_position: -2.0,
            underline_thickness: 1.0,
        }
    }

    fn create_bitmap(
        &self,
        _font_id: FontId,
        glyph_index: u32,
        _is_italic_required: bool,
        _is_bold_required: bool,
        outline_width: u32,
    ) -> Option<GlyphBitmap> {
        let width = 5 + 2 * outline_width;
        let height = 10 + 2 * outline_width;
        let pixels = (width * height) as usize;
        if glyph_index == EMOJI {
            return Some(GlyphBitmap {
                width,
                height,
                format: PixelFormat::Rgba8888,
                data: [255, 0, 0, 255].repeat(pixels),
                is_color_emoji: true,
                ..GlyphBitmap::default()
            });
        }
        Some(GlyphBitmap::mask(width, height, vec![255; pixels]))
    }

    fn glyph_info(&self, font_id: FontId, character: char) -> Option<GlyphInfo> {
        Some(GlyphInfo {
            font_id,
            index: u32::from(character),
            width: 5.0,
            height: 10.0,
            y_bearing: 10.0,
            advance: 5.0,
            ..GlyphInfo::default()
        })
    }
}

/// One line of `count` box glyphs, `advance` apart
pub fn row_model(count: u32, advance: f32) -> ViewModel {
    let glyphs = (0..count)
        .map(|i| GlyphInfo {
            font_id: 1,
            index: i + 1,
            width: 5.0,
            height: 10.0,
            y_bearing: 10.0,
            advance,
            ..GlyphInfo::default()
        })
        .collect();
    let positions = (0..count)
        .map(|i| Vector2::new(i as f32 * advance, -10.0))
        .collect();
    let mut model = ViewModel::new();
    model.glyphs = glyphs;
    model.positions = positions;
    model.glyphs_to_characters = (0..count).collect();
    model.text = (0..count).map(|_| 'x').collect();
    model.lines = vec![LineRun {
        glyph_run: GlyphRun::new(0, count),
        width: count as f32 * advance,
        ascender: 10.0,
        descender: -3.0,
        ..LineRun::default()
    }];
    model.layout_size = Vector2::new(count as f32 * advance, 13.0);
    model
}
