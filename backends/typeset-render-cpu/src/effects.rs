//! Line decorations: underline, strikethrough and background fills
//!
//! All three are axis-aligned rectangles spanning a line's horizontal
//! extent. Rows start at the truncated top edge and stop before the bottom
//! edge; columns run from the truncated left edge up to and including the
//! right edge. Everything is clipped to the buffer.

use typeset_core::style::{StrikethroughStyleProperties, UnderlineStyleProperties, UnderlineType};
use typeset_core::{Color, PixelBuffer, PixelFormat};

use crate::glyph::GlyphData;

/// Horizontal ink extent and baseline of the styled glyphs of one line,
/// relative to the pen offsets in [`GlyphData`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineExtent {
    pub left: f32,
    pub right: f32,
    pub baseline: f32,
}

/// Overwrite one pixel with `color` (straight alpha), premultiplying it
pub fn write_color_to_pixel_buffer(buffer: &mut PixelBuffer, x: i64, y: i64, color: Color) {
    let Some(offset) = buffer.offset(x, y) else {
        return;
    };
    let alpha = color.alpha_u8();
    let format = buffer.format();
    let data = buffer.data_mut();
    match format {
        PixelFormat::L8 => data[offset] = alpha,
        PixelFormat::Rgba8888 | PixelFormat::Bgra8888 => {
            let a = f32::from(alpha);
            let (r, g, b) = ((color.r * a) as u8, (color.g * a) as u8, (color.b * a) as u8);
            let pixel = if format == PixelFormat::Rgba8888 {
                [r, g, b, alpha]
            } else {
                [b, g, r, alpha]
            };
            data[offset..offset + 4].copy_from_slice(&pixel);
        },
    }
}

/// Rows `[top, bottom)` and columns `[left, right]`, clipped
struct Span {
    x_start: i64,
    x_end: i64,
    y_start: i64,
    y_end: i64,
}

impl Span {
    fn new(buffer: &PixelBuffer, left: f32, right: f32, top: f32, bottom: f32) -> Self {
        let width = i64::from(buffer.width());
        let height = i64::from(buffer.height());
        Self {
            x_start: (left as i64).max(0),
            x_end: (right.floor() as i64).min(width - 1),
            y_start: (top as i64).max(0),
            y_end: (bottom.ceil() as i64).min(height),
        }
    }
}

fn fill(buffer: &mut PixelBuffer, span: &Span, color: Color, mut paint: impl FnMut(i64) -> bool) {
    for y in span.y_start..span.y_end {
        for x in span.x_start..=span.x_end {
            if paint(x) {
                write_color_to_pixel_buffer(buffer, x, y, color);
            }
        }
    }
}

/// Underline the glyphs of a line
///
/// `position` is the distance below the baseline and `max_height` the
/// tallest underline of the line. Dashes repeat every
/// `dash_width + dash_gap` pixels counted from the line's left edge, on
/// every row. A double underline adds a second solid band one and a half
/// heights above the first.
pub fn draw_underline(
    data: &mut GlyphData,
    extent: &LineExtent,
    position: f32,
    max_height: f32,
    properties: &UnderlineStyleProperties,
) {
    let h_offset = data.horizontal_offset as f32;
    let top = (data.vertical_offset as f32 + extent.baseline + position).trunc();
    let left = h_offset + extent.left;
    let right = h_offset + extent.right;
    let color = properties.color;

    let span = Span::new(&data.buffer, left, right, top, top + max_height);
    match properties.underline_type {
        UnderlineType::Dashed => {
            let dash = (properties.dash_width as i64).max(1);
            let period = dash + (properties.dash_gap as i64).max(0);
            let origin = left as i64;
            fill(&mut data.buffer, &span, color, |x| (x - origin).rem_euclid(period) < dash);
        },
        UnderlineType::Solid => fill(&mut data.buffer, &span, color, |_| true),
        UnderlineType::Double => {
            fill(&mut data.buffer, &span, color, |_| true);
            let second_top = (top - max_height * 1.5).trunc();
            let second = Span::new(&data.buffer, left, right, second_top, second_top + max_height);
            fill(&mut data.buffer, &second, color, |_| true);
        },
    }
}

/// Strike through the glyphs of a line, half an ascender above the
/// underline position
pub fn draw_strikethrough(
    data: &mut GlyphData,
    extent: &LineExtent,
    underline_position: f32,
    line_ascender: f32,
    max_height: f32,
    properties: &StrikethroughStyleProperties,
) {
    let h_offset = data.horizontal_offset as f32;
    let top = data.vertical_offset as f32 + extent.baseline + underline_position
        - line_ascender * 0.5;
    let span = Span::new(
        &data.buffer,
        h_offset + extent.left,
        h_offset + extent.right,
        top,
        top + max_height,
    );
    fill(&mut data.buffer, &span, properties.color, |_| true);
}

/// Fill the line box (ascender to descender) under a line's extent
pub fn draw_background_color(
    data: &mut GlyphData,
    extent: &LineExtent,
    line_ascender: f32,
    line_descender: f32,
    color: Color,
) {
    let h_offset = data.horizontal_offset as f32;
    let baseline = data.vertical_offset as f32 + extent.baseline;
    let span = Span::new(
        &data.buffer,
        h_offset + extent.left,
        h_offset + extent.right,
        baseline - line_ascender,
        baseline - line_descender,
    );
    fill(&mut data.buffer, &span, color, |_| true);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(width: u32, height: u32) -> GlyphData {
        GlyphData::new(PixelBuffer::new(width, height, PixelFormat::Rgba8888))
    }

    fn underline(kind: UnderlineType, gap: f32, width: f32) -> UnderlineStyleProperties {
        UnderlineStyleProperties::model_defaults(kind, Color::RED, 1.0, gap, width)
    }

    fn row_alpha(buffer: &PixelBuffer, y: u32) -> Vec<u8> {
        (0..buffer.width())
            .map(|x| buffer.alpha(x, y).unwrap_or(0))
            .collect()
    }

    #[test]
    fn test_write_color_premultiplies() {
        let mut buffer = PixelBuffer::new(1, 1, PixelFormat::Bgra8888);
        write_color_to_pixel_buffer(&mut buffer, 0, 0, Color::rgba(1.0, 0.0, 0.0, 0.5));
        assert_eq!(buffer.data(), &[0, 0, 127, 127]);
        write_color_to_pixel_buffer(&mut buffer, 5, 0, Color::WHITE);
        assert_eq!(buffer.data(), &[0, 0, 127, 127]);
    }

    #[test]
    fn test_solid_underline_rows_and_columns() {
        let mut data = data(10, 10);
        let extent = LineExtent {
            left: 2.0,
            right: 5.0,
            baseline: 4.0,
        };
        draw_underline(&mut data, &extent, 1.0, 2.0, &underline(UnderlineType::Solid, 1.0, 2.0));
        for y in 0..10 {
            let painted: Vec<u32> = (0..10).filter(|&x| data.buffer.alpha(x, y) == Some(255)).collect();
            if y == 5 || y == 6 {
                assert_eq!(painted, vec![2, 3, 4, 5], "row {y}");
            } else {
                assert!(painted.is_empty(), "row {y}");
            }
        }
    }

    #[test]
    fn test_dash_pattern_restarts_every_row() {
        let mut data = data(12, 4);
        let extent = LineExtent {
            left: 1.0,
            right: 11.0,
            baseline: 0.0,
        };
        draw_underline(&mut data, &extent, 1.0, 2.0, &underline(UnderlineType::Dashed, 2.0, 3.0));
        let expected = vec![0, 255, 255, 255, 0, 0, 255, 255, 255, 0, 0, 255];
        assert_eq!(row_alpha(&data.buffer, 1), expected);
        assert_eq!(row_alpha(&data.buffer, 2), expected);
    }

    #[test]
    fn test_double_underline_second_band_above() {
        let mut data = data(4, 12);
        let extent = LineExtent {
            left: 0.0,
            right: 3.0,
            baseline: 8.0,
        };
        draw_underline(&mut data, &extent, 0.0, 2.0, &underline(UnderlineType::Double, 1.0, 2.0));
        let painted: Vec<u32> = (0..12).filter(|&y| data.buffer.alpha(0, y) == Some(255)).collect();
        assert_eq!(painted, vec![5, 6, 8, 9]);
    }

    #[test]
    fn test_strikethrough_sits_above_underline_position() {
        let mut data = data(4, 20);
        let extent = LineExtent {
            left: 0.0,
            right: 3.0,
            baseline: 10.0,
        };
        let props = StrikethroughStyleProperties::model_defaults(Color::BLUE, 1.0);
        draw_strikethrough(&mut data, &extent, 2.0, 8.0, 1.0, &props);
        let painted: Vec<u32> = (0..20).filter(|&y| data.buffer.alpha(0, y) == Some(255)).collect();
        assert_eq!(painted, vec![8]);
        assert_eq!(data.buffer.pixel(0, 8), Some(&[0u8, 0, 255, 255][..]));
    }

    #[test]
    fn test_strikethrough_keeps_fractional_baseline() {
        let mut data = data(4, 20);
        let extent = LineExtent {
            left: 0.0,
            right: 3.0,
            baseline: 9.6,
        };
        let props = StrikethroughStyleProperties::model_defaults(Color::BLUE, 1.0);
        // top edge at 9.1: rows 9 and 10 are touched by the band
        draw_strikethrough(&mut data, &extent, 2.0, 5.0, 1.0, &props);
        let painted: Vec<u32> = (0..20).filter(|&y| data.buffer.alpha(0, y) == Some(255)).collect();
        assert_eq!(painted, vec![9, 10]);
    }

    #[test]
    fn test_background_covers_line_box_and_clips() {
        let mut data = data(6, 6);
        data.horizontal_offset = -2;
        let extent = LineExtent {
            left: 0.0,
            right: 20.0,
            baseline: 4.0,
        };
        draw_background_color(&mut data, &extent, 4.0, -2.0, Color::GREEN);
        for y in 0..6 {
            assert_eq!(row_alpha(&data.buffer, y), vec![255; 6], "row {y}");
        }
    }
}
