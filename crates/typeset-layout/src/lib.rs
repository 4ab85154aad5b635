//! Simple Layout - one glyph per character, explicit line breaks
//!
//! This is the most basic layout that turns processed markup into a
//! [`ViewModel`] without shaping: every character maps to the glyph its font
//! reports for it, pens advance left to right and lines only break at `\n`.
//! Enough to drive the typesetter for Latin text, tests and the CLI.
//!
//! The mapping between characters and glyphs is one-to-one, so character
//! runs from markup become glyph runs with the same indices.

use std::sync::Arc;

use typeset_core::style::{
    calculated_advance, glyph_character_spacing, glyph_runs_from_character_runs,
};
use typeset_core::{
    BoundedParagraphRun, CharacterRun, EllipsisPosition, FontClient, FontId, FontMetrics,
    GlyphIndex, GlyphInfo, GlyphRun, HorizontalAlignment, Length, LineRun, TextDirection,
    TextStyle, Vector2, VerticalAlignment, VerticalLineAlignment, ViewModel,
};
use typeset_markup::MarkupProcessData;

/// The ellipsis drawn in place of text that does not fit
pub const ELLIPSIS: char = '\u{2026}';

/// How to lay the text out
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    pub font_id: FontId,
    /// Control width; `None` fits the widest line
    pub width: Option<f32>,
    /// Control height; `None` fits all lines
    pub height: Option<f32>,
    pub line_spacing: f32,
    pub horizontal_alignment: HorizontalAlignment,
    pub vertical_alignment: VerticalAlignment,
    pub vertical_line_alignment: VerticalLineAlignment,
    pub direction: TextDirection,
    /// Replace the end of the first overflowing line with an ellipsis
    pub ellipsis: bool,
    pub style: TextStyle,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            font_id: 1,
            width: None,
            height: None,
            line_spacing: 0.0,
            horizontal_alignment: HorizontalAlignment::Begin,
            vertical_alignment: VerticalAlignment::Top,
            vertical_line_alignment: VerticalLineAlignment::Top,
            direction: TextDirection::LeftToRight,
            ellipsis: false,
            style: TextStyle::default(),
        }
    }
}

/// Lays out text with glyphs and metrics from a [`FontClient`]
pub struct SimpleLayout {
    fonts: Arc<dyn FontClient>,
}

impl SimpleLayout {
    pub fn new(fonts: Arc<dyn FontClient>) -> Self {
        Self { fonts }
    }

    pub fn name(&self) -> &'static str {
        "simple"
    }

    /// Lay out plain text; no markup runs, markup processing disabled
    pub fn layout_text(&self, text: &str, params: &LayoutParams) -> ViewModel {
        let mut model = self.layout(&MarkupProcessData::plain(text), params);
        model.markup_processor_enabled = false;
        model
    }

    /// Lay out processed markup
    pub fn layout(&self, data: &MarkupProcessData, params: &LayoutParams) -> ViewModel {
        let chars: Vec<char> = data.text.chars().collect();
        let count = chars.len() as Length;
        let metrics = self.fonts.font_metrics(params.font_id);

        // one glyph per character
        let characters_to_glyph: Vec<GlyphIndex> = (0..count).collect();
        let glyphs_per_character: Vec<Length> = vec![1; chars.len()];
        let spacing_runs = glyph_runs_from_character_runs(
            &data.character_spacing_runs,
            &characters_to_glyph,
            &glyphs_per_character,
        );

        let mut model = ViewModel::new();
        model.style = params.style.clone();

        let mut line_start: GlyphIndex = 0;
        let mut pen = 0.0f32;
        for (index, &character) in (0..count).zip(chars.iter()) {
            let mut glyph = if character == '\n' {
                None
            } else {
                self.fonts.glyph_info(params.font_id, character)
            }
            .unwrap_or(GlyphInfo {
                font_id: params.font_id,
                ..GlyphInfo::default()
            });
            glyph.is_bold_required = data.is_bold(index);
            glyph.is_italic_required = data.is_italic(index);

            model
                .positions
                .push(Vector2::new(pen + glyph.x_bearing, -glyph.y_bearing));
            model.glyphs.push(glyph);

            if character == '\n' {
                model
                    .lines
                    .push(line_run(line_start, index + 1, pen, &metrics, params));
                line_start = index + 1;
                pen = 0.0;
            } else {
                let spacing =
                    glyph_character_spacing(index, &spacing_runs, params.style.character_spacing);
                pen += calculated_advance(character, spacing, glyph.advance);
            }
        }
        model
            .lines
            .push(line_run(line_start, count, pen, &metrics, params));

        let widest = model.lines.iter().map(|l| l.width).fold(0.0f32, f32::max);
        let control_width = params.width.unwrap_or(widest);
        for line in &mut model.lines {
            let alignment = paragraph_alignment(&data.bounded_paragraph_runs, line)
                .unwrap_or(params.horizontal_alignment);
            line.alignment_offset =
                alignment_offset(alignment, params.direction, control_width, line.width);
        }

        let text_height = model
            .lines
            .iter()
            .map(|l| l.ascender - l.descender)
            .sum::<f32>()
            + params.line_spacing * (model.lines.len().saturating_sub(1)) as f32;
        model.layout_size = Vector2::new(widest, text_height);
        model.control_size = Vector2::new(control_width, params.height.unwrap_or(text_height));
        model.horizontal_alignment = params.horizontal_alignment;
        model.vertical_alignment = params.vertical_alignment;
        model.vertical_line_alignment = params.vertical_line_alignment;

        model.glyphs_to_characters = characters_to_glyph.clone();
        model.text = chars;
        model.colors = data.colors();
        model.color_indices = if model.colors.is_empty() {
            Vec::new()
        } else {
            data.color_indices()
        };
        model.background_colors = data.background_colors();
        model.background_color_indices = if model.background_colors.is_empty() {
            Vec::new()
        } else {
            data.background_color_indices()
        };
        model.underline_runs = glyph_runs_from_character_runs(
            &data.underlined_character_runs,
            &characters_to_glyph,
            &glyphs_per_character,
        );
        model.strikethrough_runs = glyph_runs_from_character_runs(
            &data.strikethrough_character_runs,
            &characters_to_glyph,
            &glyphs_per_character,
        );
        model.character_spacing_runs = spacing_runs;
        model.bounded_paragraph_runs = data.bounded_paragraph_runs.clone();
        model.markup_processor_enabled = true;

        if params.ellipsis {
            self.mark_ellipsis(&mut model, params);
        }

        log::debug!(
            "{}: laid out {} glyphs in {} lines ({}x{})",
            self.name(),
            model.number_of_glyphs(),
            model.lines.len(),
            model.layout_size.x,
            model.layout_size.y
        );
        model
    }

    fn mark_ellipsis(&self, model: &mut ViewModel, params: &LayoutParams) {
        let Some(width) = params.width else {
            return;
        };
        let Some(line) = model.lines.iter_mut().find(|l| l.width > width) else {
            return;
        };
        line.ellipsis = true;
        model.ellipsis_glyph = self.fonts.glyph_info(params.font_id, ELLIPSIS);
        model.ellipsis_enabled = model.ellipsis_glyph.is_some();
        model.elision.position = EllipsisPosition::End;
    }
}

fn line_run(
    start: GlyphIndex,
    end: GlyphIndex,
    width: f32,
    metrics: &FontMetrics,
    params: &LayoutParams,
) -> LineRun {
    LineRun {
        glyph_run: GlyphRun::new(start, end - start),
        character_run: CharacterRun::new(start, end - start),
        width,
        ascender: metrics.ascender,
        descender: metrics.descender,
        line_spacing: params.line_spacing,
        direction: params.direction,
        ..LineRun::default()
    }
}

/// Alignment set by the paragraph the line starts in
fn paragraph_alignment(runs: &[BoundedParagraphRun], line: &LineRun) -> Option<HorizontalAlignment> {
    let first = line.character_run.character_index;
    runs.iter()
        .find(|run| run.horizontal_alignment_defined && run.character_run.contains(first))
        .map(|run| run.horizontal_alignment)
}

/// Offset from the control's left edge; begin and end swap for RTL text
fn alignment_offset(
    alignment: HorizontalAlignment,
    direction: TextDirection,
    control_width: f32,
    line_width: f32,
) -> f32 {
    let alignment = match (alignment, direction.is_rtl()) {
        (HorizontalAlignment::Begin, true) => HorizontalAlignment::End,
        (HorizontalAlignment::End, true) => HorizontalAlignment::Begin,
        (alignment, _) => alignment,
    };
    match alignment {
        HorizontalAlignment::Begin => 0.0,
        HorizontalAlignment::Center => ((control_width - line_width) * 0.5).floor(),
        HorizontalAlignment::End => control_width - line_width,
    }
}
