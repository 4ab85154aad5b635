//! Per-glyph background colors from markup
//!
//! Consecutive glyphs sharing a background color index are merged into one
//! rectangle covering the line box, so a highlighted word is one block
//! rather than a row of glyph-sized patches.

use typeset_core::{ColorIndex, ViewModel};

use crate::builder::{line_glyph_range, move_pen_to_line};
use crate::effects::{draw_background_color, LineExtent};
use crate::glyph::GlyphData;

/// Paint the markup background colors of every line into `data`
///
/// `data`'s offsets are the pen position of the whole text block. Returns
/// how many rectangles were painted.
pub fn draw_glyphs_background(
    model: &ViewModel,
    data: &mut GlyphData,
    ignore_horizontal_alignment: bool,
) -> usize {
    let width = data.buffer.width() as f32;
    let horizontal_offset = data.horizontal_offset;
    let vertical_start = data.vertical_offset;
    let mut painted = 0;

    for (line_index, line) in model.lines.iter().enumerate() {
        move_pen_to_line(
            data,
            line_index,
            line,
            ignore_horizontal_alignment,
            horizontal_offset,
        );

        let mut extent = LineExtent {
            left: width,
            right: 0.0,
            baseline: 0.0,
        };
        let mut previous: ColorIndex = 0;
        let mut flush = |data: &mut GlyphData, index: ColorIndex, extent: &LineExtent| {
            if let Some(&color) = model.background_colors.get(usize::from(index) - 1) {
                draw_background_color(data, extent, line.ascender, line.descender, color);
                painted += 1;
            }
        };

        if let Some((start, last)) = line_glyph_range(model, line) {
            for glyph_index in start..=last {
                let Some(elided) = model.elided_index(glyph_index) else {
                    continue;
                };
                let glyph = &model.glyphs[elided];
                if glyph.is_empty() {
                    continue;
                }
                let position = model.positions[elided];
                let index = model.background_color_index(glyph_index);

                if index != previous && previous != 0 {
                    flush(data, previous, &extent);
                }
                if index == 0 {
                    previous = 0;
                    continue;
                }

                extent.baseline = extent.baseline.max(position.y + glyph.y_bearing);
                if position.x < extent.left || index != previous {
                    extent.left = position.x - glyph.x_bearing;
                }
                if position.x + glyph.width > extent.right {
                    extent.right = position.x - glyph.x_bearing + glyph.advance;
                }
                previous = index;
            }
        }
        if previous != 0 {
            flush(data, previous, &extent);
        }

        data.vertical_offset += (-line.descender) as i32;
    }

    data.horizontal_offset = horizontal_offset;
    data.vertical_offset = vertical_start;
    log::trace!("painted {} background spans", painted);
    painted
}
