//! One layer buffer, one pass over lines and glyphs
//!
//! [`Typesetter::create_image_buffer`] is the workhorse behind every layer.
//! For each line it moves the pen down by the line's ascender, walks the
//! glyphs that survived elision, resolves their decorations and either
//! rasterizes them or only records the line extent. Decoration layers are
//! painted once per line after its last glyph.

use typeset_core::style::{
    calculated_advance, glyph_character_spacing, resolve_strikethrough, resolve_underline,
    strikethrough_height, underline_height, underline_position, StrikethroughStyleProperties,
    UnderlineStyleProperties,
};
use typeset_core::{
    Color, FontId, FontMetrics, GlyphIndex, GlyphInfo, LineRun, PixelBuffer, PixelFormat, Vector2,
    ViewModel,
};

use crate::effects::{draw_background_color, draw_strikethrough, draw_underline, LineExtent};
use crate::glyph::{typeset_glyph, GlyphData};
use crate::typesetter::Typesetter;
use crate::TypesetStyle;

/// What to build in [`Typesetter::create_image_buffer`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferParams {
    pub width: u32,
    pub height: u32,
    pub style: TypesetStyle,
    pub ignore_horizontal_alignment: bool,
    pub pixel_format: PixelFormat,
    pub horizontal_offset: i32,
    pub vertical_offset: i32,
    /// First glyph drawn (full glyph index space)
    pub from_glyph: GlyphIndex,
    /// Last glyph drawn, inclusive
    pub to_glyph: GlyphIndex,
}

impl BufferParams {
    pub fn new(width: u32, height: u32, style: TypesetStyle, pixel_format: PixelFormat) -> Self {
        Self {
            width,
            height,
            style,
            ignore_horizontal_alignment: false,
            pixel_format,
            horizontal_offset: 0,
            vertical_offset: 0,
            from_glyph: 0,
            to_glyph: GlyphIndex::MAX,
        }
    }

    pub fn with_offsets(mut self, horizontal: i32, vertical: i32) -> Self {
        self.horizontal_offset = horizontal;
        self.vertical_offset = vertical;
        self
    }

    pub fn with_glyph_range(mut self, from: GlyphIndex, to: GlyphIndex) -> Self {
        self.from_glyph = from;
        self.to_glyph = to;
        self
    }

    pub fn ignoring_horizontal_alignment(mut self, ignore: bool) -> Self {
        self.ignore_horizontal_alignment = ignore;
        self
    }
}

/// Inclusive range of full glyph indices a line draws once elision applies
pub(crate) fn line_glyph_range(model: &ViewModel, line: &LineRun) -> Option<(GlyphIndex, GlyphIndex)> {
    if line.glyph_run.number_of_glyphs == 0 && !line.is_split_to_two_halves {
        return None;
    }
    let start = line.glyph_run.glyph_index.max(model.elision.start_index);
    let last = line.last_glyph_index()?.min(model.elision.end_index);
    (start <= last).then_some((start, last))
}

/// Move the pen to the baseline of `line`
pub(crate) fn move_pen_to_line(
    data: &mut GlyphData,
    line_index: usize,
    line: &LineRun,
    ignore_horizontal_alignment: bool,
    horizontal_offset: i32,
) {
    let alignment = if ignore_horizontal_alignment {
        0
    } else {
        line.alignment_offset as i32
    };
    data.horizontal_offset = alignment + horizontal_offset;
    data.vertical_offset += line.ascender as i32;
    if line_index > 0 {
        data.vertical_offset += line.line_spacing as i32;
    }
}

/// Per-line decoration bookkeeping
struct LinePass {
    extent: LineExtent,
    last_font: Option<FontId>,
    metrics: FontMetrics,
    underline_position: f32,
    underline_height: f32,
    max_underline_height: f32,
    strikethrough_height: f32,
    max_strikethrough_height: f32,
    underlined: Option<UnderlineStyleProperties>,
    struck: Option<StrikethroughStyleProperties>,
}

impl LinePass {
    fn new(width: u32, model: &ViewModel) -> Self {
        let style = &model.style;
        Self {
            extent: LineExtent {
                left: width as f32,
                right: 0.0,
                baseline: 0.0,
            },
            last_font: None,
            metrics: FontMetrics::default(),
            underline_position: 0.0,
            underline_height: style.underline_height,
            max_underline_height: style.underline_height,
            strikethrough_height: style.strikethrough_height,
            max_strikethrough_height: style.strikethrough_height,
            underlined: None,
            struck: None,
        }
    }

    fn track(&mut self, glyph: &GlyphInfo, position: Vector2) {
        let extent = &mut self.extent;
        extent.baseline = extent.baseline.max(position.y + glyph.y_bearing);
        if position.x < extent.left {
            extent.left = position.x;
        }
        if position.x + glyph.width > extent.right {
            extent.right = position.x + glyph.width;
        }
    }
}

impl Typesetter {
    /// Build one layer of the final image
    ///
    /// Glyphs outside `[from_glyph, to_glyph]` are skipped entirely, which
    /// lets markup runs be drawn one run at a time.
    pub fn create_image_buffer(&self, params: &BufferParams) -> PixelBuffer {
        let model = &self.model;
        let style = &model.style;
        let mut data = GlyphData {
            buffer: PixelBuffer::new(params.width, params.height, params.pixel_format),
            horizontal_offset: 0,
            vertical_offset: params.vertical_offset,
        };
        let outline_width = i32::from(style.outline_width);
        let underline_defaults = style.underline_defaults();
        let strikethrough_defaults = style.strikethrough_defaults();

        for (line_index, line) in model.lines.iter().enumerate() {
            move_pen_to_line(
                &mut data,
                line_index,
                line,
                params.ignore_horizontal_alignment,
                params.horizontal_offset,
            );
            match params.style {
                TypesetStyle::Outline => {
                    data.horizontal_offset -= outline_width;
                    if line_index == 0 {
                        data.vertical_offset -= outline_width;
                    }
                },
                TypesetStyle::Shadow => {
                    let shift = style.shadow_offset;
                    data.horizontal_offset =
                        (data.horizontal_offset as f32 + shift.x - outline_width as f32) as i32;
                    if line_index == 0 {
                        data.vertical_offset =
                            (data.vertical_offset as f32 + shift.y - outline_width as f32) as i32;
                    }
                },
                _ => {},
            }

            let mut pass = LinePass::new(params.width, model);
            if let Some((start, last)) = line_glyph_range(model, line) {
                for glyph_index in start..=last {
                    if glyph_index < params.from_glyph || glyph_index > params.to_glyph {
                        continue;
                    }
                    let Some(elided) = model.elided_index(glyph_index) else {
                        continue;
                    };
                    let glyph = model.glyphs[elided];
                    if glyph.is_empty() {
                        continue;
                    }

                    let underline = resolve_underline(
                        glyph_index,
                        style.underline_enabled,
                        &model.underline_runs,
                        &underline_defaults,
                    );
                    if underline.styled {
                        pass.underline_height = underline.properties.height;
                        pass.underlined = Some(underline.properties);
                    }
                    let strikethrough = resolve_strikethrough(
                        glyph_index,
                        style.strikethrough_enabled,
                        &model.strikethrough_runs,
                        &strikethrough_defaults,
                    );
                    if strikethrough.styled {
                        pass.strikethrough_height = strikethrough.properties.height;
                        pass.struck = Some(strikethrough.properties);
                    }

                    if underline.styled || strikethrough.styled {
                        if pass.last_font != Some(glyph.font_id) {
                            pass.metrics = self.fonts.font_metrics(glyph.font_id);
                            pass.underline_position = underline_position(&pass.metrics);
                            pass.last_font = Some(glyph.font_id);
                        }
                        if underline.styled {
                            (pass.underline_height, pass.max_underline_height) = underline_height(
                                &pass.metrics,
                                pass.underline_height,
                                pass.max_underline_height,
                            );
                        }
                        if strikethrough.styled {
                            (pass.strikethrough_height, pass.max_strikethrough_height) =
                                strikethrough_height(
                                    pass.strikethrough_height,
                                    pass.max_strikethrough_height,
                                );
                        }
                    }

                    let position = model.positions[elided];
                    let color = self.layer_color(params.style, glyph_index);
                    pass.track(&glyph, position);
                    self.draw_glyph(&mut data, &glyph, position, color, params.style);

                    if let Some((hyphen, hyphen_position)) =
                        self.hyphen_after(glyph_index, elided, &glyph, position)
                    {
                        pass.track(&hyphen, hyphen_position);
                        self.draw_glyph(&mut data, &hyphen, hyphen_position, color, params.style);
                    }
                }
            }

            match (params.style, pass.underlined, pass.struck) {
                (TypesetStyle::Underline, Some(properties), _) => draw_underline(
                    &mut data,
                    &pass.extent,
                    pass.underline_position,
                    pass.max_underline_height,
                    &properties,
                ),
                (TypesetStyle::Strikethrough, _, Some(properties)) => draw_strikethrough(
                    &mut data,
                    &pass.extent,
                    pass.underline_position,
                    line.ascender,
                    pass.max_strikethrough_height,
                    &properties,
                ),
                (TypesetStyle::Background, _, _) => draw_background_color(
                    &mut data,
                    &pass.extent,
                    line.ascender,
                    line.descender,
                    style.background_color,
                ),
                _ => {},
            }

            data.vertical_offset += (-line.descender) as i32;
        }

        log::trace!(
            "built {} layer {}x{} for glyphs {}..={}",
            params.style.name(),
            params.width,
            params.height,
            params.from_glyph,
            params.to_glyph
        );
        data.buffer
    }

    /// Premultiplied color a layer paints glyph `glyph_index` in
    fn layer_color(&self, style: TypesetStyle, glyph_index: GlyphIndex) -> Color {
        let text_style = &self.model.style;
        let color = match style {
            TypesetStyle::Shadow => text_style.shadow_color,
            TypesetStyle::Outline => text_style.outline_color,
            _ => self.model.glyph_color(glyph_index),
        };
        color.premultiplied()
    }

    fn draw_glyph(
        &self,
        data: &mut GlyphData,
        glyph: &GlyphInfo,
        position: Vector2,
        color: Color,
        style: TypesetStyle,
    ) {
        if !style.draws_glyphs() {
            return;
        }
        let outline_width = match style {
            TypesetStyle::Outline | TypesetStyle::Shadow => u32::from(self.model.style.outline_width),
            _ => 0,
        };
        let Some(bitmap) = self.fonts.create_bitmap(
            glyph.font_id,
            glyph.index,
            glyph.is_italic_required,
            glyph.is_bold_required,
            outline_width,
        ) else {
            return;
        };
        if style == TypesetStyle::Outline {
            data.horizontal_offset -= bitmap.outline_offset_x;
            data.vertical_offset -= bitmap.outline_offset_y;
            typeset_glyph(data, &bitmap, position, color, style);
            data.horizontal_offset += bitmap.outline_offset_x;
            data.vertical_offset += bitmap.outline_offset_y;
        } else {
            typeset_glyph(data, &bitmap, position, color, style);
        }
    }

    /// The hyphen glyph placed right after glyph `glyph_index`, and where
    fn hyphen_after(
        &self,
        glyph_index: GlyphIndex,
        elided: usize,
        glyph: &GlyphInfo,
        position: Vector2,
    ) -> Option<(GlyphInfo, Vector2)> {
        let model = &self.model;
        let slot = model.hyphen_indices.binary_search(&(glyph_index + 1)).ok()?;
        let hyphen = *model.hyphens.get(slot)?;
        let spacing = glyph_character_spacing(
            glyph_index,
            &model.character_spacing_runs,
            model.style.character_spacing,
        );
        let advance = calculated_advance(model.character_of(elided), spacing, glyph.advance);
        let x = position.x + advance - glyph.x_bearing + hyphen.x_bearing;
        Some((hyphen, Vector2::new(x, -hyphen.y_bearing)))
    }
}
