//! The view model: everything the typesetter reads
//!
//! A [`ViewModel`] is a flat, already laid-out description of the text:
//! glyph and position arrays, the lines that group them, color palettes and
//! style runs, plus the model-wide [`TextStyle`]. The typesetter never
//! changes it except for [`ViewModel::elide_glyphs`], which runs once at the
//! start of every render.
//!
//! ## Elided glyph arrays
//!
//! `glyphs`, `positions` and `glyphs_to_characters` hold the *elided*
//! glyphs. Line runs, style runs and color index buffers keep addressing the
//! full glyph index space; [`ViewModel::elided_index`] maps one to the other.

use crate::error::ModelError;
use crate::style::{
    first_unordered_run, CharacterSpacingGlyphRun, StrikethroughGlyphRun,
    StrikethroughStyleProperties, UnderlineStyleProperties, UnderlineType, UnderlinedGlyphRun,
    DEFAULT_DASH_GAP, DEFAULT_DASH_WIDTH,
};
use crate::types::{
    BoundedParagraphRun, CharacterIndex, Color, ColorIndex, EllipsisPosition, GlyphIndex,
    GlyphInfo, HorizontalAlignment, LineRun, Vector2, VerticalAlignment, VerticalLineAlignment,
};

/// Model-wide style defaults
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TextStyle {
    pub default_color: Color,

    pub underline_enabled: bool,
    pub underline_type: UnderlineType,
    pub underline_color: Color,
    /// `0` asks the font for its underline thickness
    pub underline_height: f32,
    pub dashed_underline_gap: f32,
    pub dashed_underline_width: f32,

    pub strikethrough_enabled: bool,
    pub strikethrough_color: Color,
    pub strikethrough_height: f32,

    pub shadow_offset: Vector2,
    pub shadow_color: Color,
    pub shadow_blur_radius: f32,

    pub outline_width: u16,
    pub outline_color: Color,

    pub background_enabled: bool,
    pub background_color: Color,

    pub character_spacing: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            default_color: Color::BLACK,
            underline_enabled: false,
            underline_type: UnderlineType::Solid,
            underline_color: Color::BLACK,
            underline_height: 0.0,
            dashed_underline_gap: DEFAULT_DASH_GAP,
            dashed_underline_width: DEFAULT_DASH_WIDTH,
            strikethrough_enabled: false,
            strikethrough_color: Color::BLACK,
            strikethrough_height: 0.0,
            shadow_offset: Vector2::ZERO,
            shadow_color: Color::BLACK,
            shadow_blur_radius: 0.0,
            outline_width: 0,
            outline_color: Color::WHITE,
            background_enabled: false,
            background_color: Color::TRANSPARENT,
            character_spacing: 0.0,
        }
    }
}

impl TextStyle {
    /// Underline defaults with every field marked defined
    pub fn underline_defaults(&self) -> UnderlineStyleProperties {
        UnderlineStyleProperties::model_defaults(
            self.underline_type,
            self.underline_color,
            self.underline_height,
            self.dashed_underline_gap,
            self.dashed_underline_width,
        )
    }

    pub fn strikethrough_defaults(&self) -> StrikethroughStyleProperties {
        StrikethroughStyleProperties::model_defaults(
            self.strikethrough_color,
            self.strikethrough_height,
        )
    }

    pub fn has_shadow(&self) -> bool {
        self.shadow_offset.x.abs() > f32::EPSILON || self.shadow_offset.y.abs() > f32::EPSILON
    }
}

/// Which glyphs survived elision, in full glyph index space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elision {
    pub position: EllipsisPosition,
    /// First glyph kept (START ellipsis removes glyphs before it)
    pub start_index: GlyphIndex,
    /// Last glyph kept (inclusive)
    pub end_index: GlyphIndex,
    /// MIDDLE ellipsis: last glyph of the first half
    pub first_middle_index: GlyphIndex,
    /// MIDDLE ellipsis: first glyph of the second half
    pub second_middle_index: GlyphIndex,
}

impl Default for Elision {
    fn default() -> Self {
        Self {
            position: EllipsisPosition::End,
            start_index: 0,
            end_index: GlyphIndex::MAX,
            first_middle_index: 0,
            second_middle_index: 0,
        }
    }
}

/// Laid-out text, ready to be typeset
#[derive(Debug, Clone, Default)]
pub struct ViewModel {
    pub glyphs: Vec<GlyphInfo>,
    /// Top-left of each glyph's ink box relative to its line's baseline origin
    pub positions: Vec<Vector2>,
    pub glyphs_to_characters: Vec<CharacterIndex>,
    pub text: Vec<char>,
    pub lines: Vec<LineRun>,

    pub colors: Vec<Color>,
    pub color_indices: Vec<ColorIndex>,
    pub background_colors: Vec<Color>,
    pub background_color_indices: Vec<ColorIndex>,

    pub underline_runs: Vec<UnderlinedGlyphRun>,
    pub strikethrough_runs: Vec<StrikethroughGlyphRun>,
    pub character_spacing_runs: Vec<CharacterSpacingGlyphRun>,
    pub bounded_paragraph_runs: Vec<BoundedParagraphRun>,

    pub hyphens: Vec<GlyphInfo>,
    /// Glyph indices the hyphens are drawn in front of, sorted
    pub hyphen_indices: Vec<GlyphIndex>,

    pub layout_size: Vector2,
    pub control_size: Vector2,
    pub horizontal_alignment: HorizontalAlignment,
    pub vertical_alignment: VerticalAlignment,
    pub vertical_line_alignment: VerticalLineAlignment,

    pub style: TextStyle,
    pub markup_processor_enabled: bool,

    pub elision: Elision,
    /// Ellipsis glyph used by END elision, when the layout provides one
    pub ellipsis_glyph: Option<GlyphInfo>,
    pub ellipsis_enabled: bool,
    elided: bool,
}

impl ViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number_of_glyphs(&self) -> usize {
        self.glyphs.len()
    }

    /// Check the structural invariants the typesetter relies on
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.glyphs.len() != self.positions.len() {
            return Err(ModelError::PositionCountMismatch {
                glyphs: self.glyphs.len(),
                positions: self.positions.len(),
            });
        }
        if let Some(index) = first_unordered_run(
            self.underline_runs
                .iter()
                .map(|r| (r.glyph_run.glyph_index, r.glyph_run.number_of_glyphs)),
        ) {
            return Err(ModelError::UnorderedRuns {
                kind: "underline",
                index,
            });
        }
        if let Some(index) = first_unordered_run(
            self.strikethrough_runs
                .iter()
                .map(|r| (r.glyph_run.glyph_index, r.glyph_run.number_of_glyphs)),
        ) {
            return Err(ModelError::UnorderedRuns {
                kind: "strikethrough",
                index,
            });
        }
        if let Some(index) = first_unordered_run(
            self.character_spacing_runs
                .iter()
                .map(|r| (r.glyph_run.glyph_index, r.glyph_run.number_of_glyphs)),
        ) {
            return Err(ModelError::UnorderedRuns {
                kind: "character spacing",
                index,
            });
        }
        if let Some(line) = first_unordered_run(
            self.lines
                .iter()
                .map(|l| (l.glyph_run.glyph_index, l.glyph_run.number_of_glyphs)),
        ) {
            return Err(ModelError::OverlappingLines { line });
        }
        if self.hyphens.len() != self.hyphen_indices.len() {
            return Err(ModelError::HyphenMismatch {
                hyphens: self.hyphens.len(),
                indices: self.hyphen_indices.len(),
            });
        }
        if let Some(index) = self.hyphen_indices.windows(2).position(|w| w[0] >= w[1]) {
            return Err(ModelError::UnorderedRuns {
                kind: "hyphen",
                index: index + 1,
            });
        }
        for (kind, len) in [
            ("color", self.color_indices.len()),
            ("background color", self.background_color_indices.len()),
        ] {
            if len != 0 && len < self.glyphs.len() {
                return Err(ModelError::IndexBufferMismatch {
                    kind,
                    len,
                    glyphs: self.glyphs.len(),
                });
            }
        }
        Ok(())
    }

    /// Position of `glyph_index` inside the elided arrays
    ///
    /// `None` for glyphs removed by a MIDDLE ellipsis or lying before the
    /// START of the elided range.
    pub fn elided_index(&self, glyph_index: GlyphIndex) -> Option<usize> {
        let mut elided = glyph_index.checked_sub(self.elision.start_index)?;
        if self.elision.position == EllipsisPosition::Middle {
            let first = self.elision.first_middle_index;
            let second = self.elision.second_middle_index;
            if glyph_index > first && glyph_index < second {
                return None;
            }
            if second > first && glyph_index >= second {
                elided -= second - first - 1;
            }
        }
        let elided = elided as usize;
        (elided < self.glyphs.len()).then_some(elided)
    }

    /// Settle the elided range before a render
    ///
    /// Clamps the elided indices to the glyph arrays and, for an END
    /// ellipsis with an ellipsis glyph available, replaces the last glyph
    /// that still fits the control width on the ellipsis line. Runs once; a
    /// second call leaves the model untouched.
    pub fn elide_glyphs(&mut self) {
        if self.elided {
            return;
        }
        self.elided = true;

        let last = (self.glyphs.len() as GlyphIndex).saturating_sub(1);
        let full_last = self
            .lines
            .iter()
            .filter_map(LineRun::last_glyph_index)
            .max()
            .unwrap_or(last);
        self.elision.end_index = self.elision.end_index.min(full_last);
        self.elision.start_index = self.elision.start_index.min(self.elision.end_index);

        if !self.ellipsis_enabled || self.elision.position != EllipsisPosition::End {
            return;
        }
        let Some(ellipsis) = self.ellipsis_glyph else {
            return;
        };
        let Some(line) = self.lines.iter().find(|line| line.ellipsis).copied() else {
            return;
        };
        let Some(line_last) = line.last_glyph_index() else {
            return;
        };
        let width = self.control_size.x;

        let mut index = line_last;
        loop {
            if let Some(elided) = self.elided_index(index) {
                let glyph = self.glyphs[elided];
                let pen_x = self.positions[elided].x - glyph.x_bearing;
                if pen_x + ellipsis.advance <= width || index == line.glyph_run.glyph_index {
                    let baseline = self.positions[elided].y + glyph.y_bearing;
                    self.glyphs[elided] = ellipsis;
                    self.positions[elided] = Vector2::new(
                        pen_x + ellipsis.x_bearing,
                        baseline - ellipsis.y_bearing,
                    );
                    self.elision.end_index = self.elision.end_index.min(index);
                    log::debug!("elided line at glyph {} (end ellipsis)", index);
                    return;
                }
            }
            if index == line.glyph_run.glyph_index {
                return;
            }
            index -= 1;
        }
    }

    /// Text color of `glyph_index`, before premultiplication
    pub fn glyph_color(&self, glyph_index: GlyphIndex) -> Color {
        match self.color_indices.get(glyph_index as usize).copied() {
            None | Some(0) => self.style.default_color,
            Some(index) => self
                .colors
                .get(usize::from(index) - 1)
                .copied()
                .unwrap_or(self.style.default_color),
        }
    }

    pub fn background_color_index(&self, glyph_index: GlyphIndex) -> ColorIndex {
        self.background_color_indices
            .get(glyph_index as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Logical character behind the elided glyph `elided_index`
    pub fn character_of(&self, elided_index: usize) -> char {
        self.glyphs_to_characters
            .get(elided_index)
            .and_then(|&c| self.text.get(c as usize))
            .copied()
            .unwrap_or(' ')
    }

    pub fn is_markup_background_color_set(&self) -> bool {
        !self.background_colors.is_empty()
    }

    pub fn is_markup_underline_set(&self) -> bool {
        !self.underline_runs.is_empty()
    }

    pub fn is_markup_strikethrough_set(&self) -> bool {
        !self.strikethrough_runs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::GlyphStyleRun;
    use crate::types::GlyphRun;

    fn glyph(advance: f32) -> GlyphInfo {
        GlyphInfo {
            font_id: 1,
            width: advance,
            height: 10.0,
            y_bearing: 10.0,
            advance,
            ..GlyphInfo::default()
        }
    }

    fn row(count: u32, advance: f32) -> ViewModel {
        let glyphs: Vec<GlyphInfo> = (0..count).map(|_| glyph(advance)).collect();
        let positions = (0..count)
            .map(|i| Vector2::new(i as f32 * advance, -10.0))
            .collect();
        ViewModel {
            glyphs,
            positions,
            lines: vec![LineRun {
                glyph_run: GlyphRun::new(0, count),
                ascender: 10.0,
                descender: -3.0,
                ..LineRun::default()
            }],
            ..ViewModel::default()
        }
    }

    #[test]
    fn test_validate_catches_position_mismatch() {
        let mut model = row(3, 5.0);
        model.positions.pop();
        assert_eq!(
            model.validate(),
            Err(ModelError::PositionCountMismatch {
                glyphs: 3,
                positions: 2
            })
        );
    }

    #[test]
    fn test_validate_catches_overlapping_runs() {
        let mut model = row(6, 5.0);
        let props = UnderlineStyleProperties::default();
        model.underline_runs = vec![
            GlyphStyleRun {
                glyph_run: GlyphRun::new(0, 3),
                properties: props,
            },
            GlyphStyleRun {
                glyph_run: GlyphRun::new(2, 2),
                properties: props,
            },
        ];
        assert!(matches!(
            model.validate(),
            Err(ModelError::UnorderedRuns {
                kind: "underline",
                index: 1
            })
        ));
    }

    #[test]
    fn test_validate_checks_hyphen_tables() {
        let mut model = row(4, 5.0);
        model.hyphens = vec![glyph(3.0)];
        assert_eq!(
            model.validate(),
            Err(ModelError::HyphenMismatch {
                hyphens: 1,
                indices: 0
            })
        );
        model.hyphens.push(glyph(3.0));
        model.hyphen_indices = vec![3, 2];
        assert!(matches!(
            model.validate(),
            Err(ModelError::UnorderedRuns { kind: "hyphen", .. })
        ));
        model.hyphen_indices = vec![2, 3];
        assert_eq!(model.validate(), Ok(()));
    }

    #[test]
    fn test_elision_normalises_end_index() {
        let mut model = row(4, 5.0);
        model.elide_glyphs();
        assert_eq!(model.elision.end_index, 3);
        assert_eq!(model.elision.start_index, 0);
    }

    #[test]
    fn test_middle_elision_skips_removed_glyphs() {
        let mut model = row(6, 5.0);
        model.elision = Elision {
            position: EllipsisPosition::Middle,
            start_index: 0,
            end_index: 9,
            first_middle_index: 2,
            second_middle_index: 6,
        };
        assert_eq!(model.elided_index(2), Some(2));
        assert_eq!(model.elided_index(3), None);
        assert_eq!(model.elided_index(5), None);
        assert_eq!(model.elided_index(6), Some(3));
        assert_eq!(model.elided_index(8), Some(5));
        assert_eq!(model.elided_index(9), None);
    }

    #[test]
    fn test_end_ellipsis_replaces_last_fitting_glyph() {
        let mut model = row(10, 10.0);
        model.control_size = Vector2::new(45.0, 20.0);
        model.lines[0].ellipsis = true;
        model.ellipsis_enabled = true;
        model.ellipsis_glyph = Some(GlyphInfo {
            index: 99,
            ..glyph(8.0)
        });
        model.elide_glyphs();
        // pen 30 + 8 <= 45 for glyph 3, glyph 4 would end at 48
        assert_eq!(model.elision.end_index, 3);
        assert_eq!(model.glyphs[3].index, 99);
        assert_eq!(model.positions[3], Vector2::new(30.0, -10.0));

        // a second render must not elide again
        model.glyphs[3].index = 7;
        model.elide_glyphs();
        assert_eq!(model.glyphs[3].index, 7);
    }

    #[test]
    fn test_glyph_color_palette_lookup() {
        let mut model = row(3, 5.0);
        model.style.default_color = Color::BLUE;
        model.colors = vec![Color::RED];
        model.color_indices = vec![0, 1, 2];
        assert_eq!(model.glyph_color(0), Color::BLUE);
        assert_eq!(model.glyph_color(1), Color::RED);
        assert_eq!(model.glyph_color(2), Color::BLUE);
        assert_eq!(model.glyph_color(8), Color::BLUE);
    }
}
