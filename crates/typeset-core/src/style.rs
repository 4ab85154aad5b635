//! Style runs and the resolver that turns them into per-glyph properties
//!
//! Markup produces runs like "glyphs 5..7 are underlined in red". Each run
//! only carries the properties the markup actually set; every other field
//! falls back to the model-wide default. The `*_defined` flags record which
//! is which.
//!
//! Runs of one kind are sorted by start and never overlap, so a lookup is a
//! binary search over their start indices. That keeps the resolver correct
//! when a caller walks glyphs out of order (bidi lines, split halves).

use crate::traits::FontMetrics;
use crate::types::{CharacterRun, Color, GlyphIndex, GlyphRun, Length};

/// Default gap between underline dashes, in pixels
pub const DEFAULT_DASH_GAP: f32 = 1.0;
/// Default underline dash length, in pixels
pub const DEFAULT_DASH_WIDTH: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum UnderlineType {
    #[default]
    Solid,
    Dashed,
    Double,
}

impl UnderlineType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "solid" => Some(UnderlineType::Solid),
            "dashed" => Some(UnderlineType::Dashed),
            "double" => Some(UnderlineType::Double),
            _ => None,
        }
    }
}

/// Underline appearance, with per-field override flags
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnderlineStyleProperties {
    pub underline_type: UnderlineType,
    pub color: Color,
    pub height: f32,
    pub dash_gap: f32,
    pub dash_width: f32,
    pub type_defined: bool,
    pub color_defined: bool,
    pub height_defined: bool,
    pub dash_gap_defined: bool,
    pub dash_width_defined: bool,
}

impl Default for UnderlineStyleProperties {
    fn default() -> Self {
        Self {
            underline_type: UnderlineType::Solid,
            color: Color::BLACK,
            height: 0.0,
            dash_gap: DEFAULT_DASH_GAP,
            dash_width: DEFAULT_DASH_WIDTH,
            type_defined: false,
            color_defined: false,
            height_defined: false,
            dash_gap_defined: false,
            dash_width_defined: false,
        }
    }
}

impl UnderlineStyleProperties {
    /// Model-wide defaults: every field counts as defined
    pub fn model_defaults(
        underline_type: UnderlineType,
        color: Color,
        height: f32,
        dash_gap: f32,
        dash_width: f32,
    ) -> Self {
        Self {
            underline_type,
            color,
            height,
            dash_gap,
            dash_width,
            type_defined: true,
            color_defined: true,
            height_defined: true,
            dash_gap_defined: true,
            dash_width_defined: true,
        }
    }

    /// Fields this run defines, everything else taken from `defaults`
    pub fn resolved_over(&self, defaults: &Self) -> Self {
        Self {
            underline_type: if self.type_defined {
                self.underline_type
            } else {
                defaults.underline_type
            },
            color: if self.color_defined {
                self.color
            } else {
                defaults.color
            },
            height: if self.height_defined {
                self.height
            } else {
                defaults.height
            },
            dash_gap: if self.dash_gap_defined {
                self.dash_gap
            } else {
                defaults.dash_gap
            },
            dash_width: if self.dash_width_defined {
                self.dash_width
            } else {
                defaults.dash_width
            },
            ..*self
        }
    }
}

/// Strikethrough appearance, with per-field override flags
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrikethroughStyleProperties {
    pub color: Color,
    pub height: f32,
    pub color_defined: bool,
    pub height_defined: bool,
}

impl Default for StrikethroughStyleProperties {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            height: 0.0,
            color_defined: false,
            height_defined: false,
        }
    }
}

impl StrikethroughStyleProperties {
    pub fn model_defaults(color: Color, height: f32) -> Self {
        Self {
            color,
            height,
            color_defined: true,
            height_defined: true,
        }
    }

    pub fn resolved_over(&self, defaults: &Self) -> Self {
        Self {
            color: if self.color_defined {
                self.color
            } else {
                defaults.color
            },
            height: if self.height_defined {
                self.height
            } else {
                defaults.height
            },
            ..*self
        }
    }
}

/// Properties attached to a range of glyphs
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphStyleRun<P> {
    pub glyph_run: GlyphRun,
    pub properties: P,
}

/// Properties attached to a range of characters, as markup produces them
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterStyleRun<P> {
    pub character_run: CharacterRun,
    pub properties: P,
}

pub type UnderlinedGlyphRun = GlyphStyleRun<UnderlineStyleProperties>;
pub type StrikethroughGlyphRun = GlyphStyleRun<StrikethroughStyleProperties>;
/// Extra pen advance per glyph
pub type CharacterSpacingGlyphRun = GlyphStyleRun<f32>;
pub type UnderlinedCharacterRun = CharacterStyleRun<UnderlineStyleProperties>;
pub type StrikethroughCharacterRun = CharacterStyleRun<StrikethroughStyleProperties>;
pub type CharacterSpacingCharacterRun = CharacterStyleRun<f32>;

/// Effective properties of one glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedStyle<P> {
    /// Whether the glyph gets the decoration at all
    pub styled: bool,
    pub properties: P,
}

/// The run containing `index`, if any
pub fn find_glyph_run<P>(runs: &[GlyphStyleRun<P>], index: GlyphIndex) -> Option<&GlyphStyleRun<P>> {
    let after = runs.partition_point(|run| run.glyph_run.glyph_index <= index);
    let candidate = runs.get(after.checked_sub(1)?)?;
    candidate.glyph_run.contains(index).then_some(candidate)
}

/// Underline state of `index`
///
/// `enabled` is the model-wide switch: it underlines every glyph with the
/// defaults unless a run overrides some fields.
pub fn resolve_underline(
    index: GlyphIndex,
    enabled: bool,
    runs: &[UnderlinedGlyphRun],
    defaults: &UnderlineStyleProperties,
) -> ResolvedStyle<UnderlineStyleProperties> {
    match find_glyph_run(runs, index) {
        Some(run) => ResolvedStyle {
            styled: true,
            properties: run.properties.resolved_over(defaults),
        },
        None => ResolvedStyle {
            styled: enabled,
            properties: *defaults,
        },
    }
}

/// Strikethrough state of `index`
pub fn resolve_strikethrough(
    index: GlyphIndex,
    enabled: bool,
    runs: &[StrikethroughGlyphRun],
    defaults: &StrikethroughStyleProperties,
) -> ResolvedStyle<StrikethroughStyleProperties> {
    match find_glyph_run(runs, index) {
        Some(run) => ResolvedStyle {
            styled: true,
            properties: run.properties.resolved_over(defaults),
        },
        None => ResolvedStyle {
            styled: enabled,
            properties: *defaults,
        },
    }
}

/// Character spacing that applies to `index`
pub fn glyph_character_spacing(
    index: GlyphIndex,
    runs: &[CharacterSpacingGlyphRun],
    model_spacing: f32,
) -> f32 {
    find_glyph_run(runs, index).map_or(model_spacing, |run| run.properties)
}

/// Pen advance of a glyph once character spacing is applied
///
/// Zero-width format characters never receive extra spacing.
pub fn calculated_advance(character: char, spacing: f32, advance: f32) -> f32 {
    match character {
        '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' => advance,
        _ => advance + spacing,
    }
}

/// Index of the first run that starts before the previous one ends
pub fn first_unordered_run(spans: impl IntoIterator<Item = (u32, Length)>) -> Option<usize> {
    let mut previous_end = 0u32;
    for (i, (start, len)) in spans.into_iter().enumerate() {
        if start < previous_end {
            return Some(i);
        }
        previous_end = start.saturating_add(len);
    }
    None
}

/// Map character runs to glyph runs through the character → glyph tables
///
/// `characters_to_glyph[c]` is the first glyph of character `c` and
/// `glyphs_per_character[c]` how many glyphs it produced. Runs that end up
/// covering no glyph are dropped.
pub fn glyph_runs_from_character_runs<P: Clone>(
    runs: &[CharacterStyleRun<P>],
    characters_to_glyph: &[GlyphIndex],
    glyphs_per_character: &[Length],
) -> Vec<GlyphStyleRun<P>> {
    let total = characters_to_glyph.len().min(glyphs_per_character.len());
    runs.iter()
        .filter_map(|run| {
            let first = run.character_run.character_index as usize;
            let last = (run.character_run.end() as usize).min(total);
            if first >= last {
                return None;
            }
            let start = characters_to_glyph[first];
            let end = (first..last)
                .map(|c| characters_to_glyph[c] + glyphs_per_character[c])
                .max()?;
            (end > start).then(|| GlyphStyleRun {
                glyph_run: GlyphRun::new(start, end - start),
                properties: run.properties.clone(),
            })
        })
        .collect()
}

/// Distance from the baseline down to the underline, in whole pixels
///
/// Never deeper than the descender and never less than one pixel.
pub fn underline_position(metrics: &FontMetrics) -> f32 {
    let mut position = metrics.underline_position.abs().ceil();
    let descender = metrics.descender.abs().ceil();
    if position > descender {
        position = descender;
    }
    if position < 0.5 {
        position = 1.0;
    }
    position
}

/// Fill in an unset underline height from the font and track the tallest
///
/// Returns `(height, max_height)`.
pub fn underline_height(metrics: &FontMetrics, current: f32, max_height: f32) -> (f32, f32) {
    let mut height = current;
    if height.abs() < f32::EPSILON {
        height = metrics.underline_thickness;
        if height < 1.0 {
            height = 1.0;
        } else {
            height = height.ceil();
        }
    }
    (height, max_height.max(height))
}

/// Strikethrough height rounded up to whole pixels, at least one
///
/// Returns `(height, max_height)`.
pub fn strikethrough_height(current: f32, max_height: f32) -> (f32, f32) {
    let height = if current < 1.0 { 1.0 } else { current.ceil() };
    (height, max_height.max(height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_run(start: u32, len: u32) -> UnderlinedGlyphRun {
        GlyphStyleRun {
            glyph_run: GlyphRun::new(start, len),
            properties: UnderlineStyleProperties {
                color: Color::RED,
                color_defined: true,
                ..UnderlineStyleProperties::default()
            },
        }
    }

    fn defaults() -> UnderlineStyleProperties {
        UnderlineStyleProperties::model_defaults(UnderlineType::Dashed, Color::BLUE, 2.0, 3.0, 4.0)
    }

    #[test]
    fn test_run_fields_override_only_when_defined() {
        let runs = [red_run(2, 3)];
        let resolved = resolve_underline(3, false, &runs, &defaults());
        assert!(resolved.styled);
        assert_eq!(resolved.properties.color, Color::RED);
        assert_eq!(resolved.properties.underline_type, UnderlineType::Dashed);
        assert_eq!(resolved.properties.height, 2.0);
        assert_eq!(resolved.properties.dash_gap, 3.0);
        assert_eq!(resolved.properties.dash_width, 4.0);
    }

    #[test]
    fn test_outside_runs_returns_defaults() {
        let runs = [red_run(2, 3)];
        let resolved = resolve_underline(7, false, &runs, &defaults());
        assert!(!resolved.styled);
        assert_eq!(resolved.properties, defaults());
    }

    #[test]
    fn test_model_switch_styles_every_glyph() {
        let resolved = resolve_underline(0, true, &[], &defaults());
        assert!(resolved.styled);
        assert_eq!(resolved.properties.color, Color::BLUE);
    }

    #[test]
    fn test_out_of_order_queries_resolve() {
        let runs = [red_run(0, 2), red_run(5, 2), red_run(9, 1)];
        for index in [9, 0, 6, 1, 5] {
            assert!(find_glyph_run(&runs, index).is_some(), "glyph {index}");
        }
        for index in [2, 4, 7, 8, 10] {
            assert!(find_glyph_run(&runs, index).is_none(), "glyph {index}");
        }
    }

    #[test]
    fn test_strikethrough_resolution() {
        let runs = [GlyphStyleRun {
            glyph_run: GlyphRun::new(0, 1),
            properties: StrikethroughStyleProperties {
                height: 5.0,
                height_defined: true,
                ..StrikethroughStyleProperties::default()
            },
        }];
        let defaults = StrikethroughStyleProperties::model_defaults(Color::GREEN, 1.0);
        let resolved = resolve_strikethrough(0, false, &runs, &defaults);
        assert_eq!(resolved.properties.color, Color::GREEN);
        assert_eq!(resolved.properties.height, 5.0);
    }

    #[test]
    fn test_character_spacing_lookup() {
        let runs = [GlyphStyleRun {
            glyph_run: GlyphRun::new(1, 1),
            properties: 3.0,
        }];
        assert_eq!(glyph_character_spacing(0, &runs, 0.5), 0.5);
        assert_eq!(glyph_character_spacing(1, &runs, 0.5), 3.0);
        assert_eq!(calculated_advance('a', 3.0, 10.0), 13.0);
        assert_eq!(calculated_advance('\u{200D}', 3.0, 0.0), 0.0);
    }

    #[test]
    fn test_first_unordered_run() {
        assert_eq!(first_unordered_run([(0, 3), (5, 2)]), None);
        assert_eq!(first_unordered_run([(0, 3), (3, 2)]), None);
        assert_eq!(first_unordered_run([(0, 3), (2, 2)]), Some(1));
        assert_eq!(first_unordered_run([(5, 1), (0, 1)]), Some(1));
    }

    #[test]
    fn test_character_runs_map_to_glyph_runs() {
        // "fi" ligature: characters 1 and 2 share glyph 1
        let characters_to_glyph = [0, 1, 1, 2];
        let glyphs_per_character = [1, 1, 0, 1];
        let runs = [
            CharacterStyleRun {
                character_run: CharacterRun::new(1, 2),
                properties: (),
            },
            CharacterStyleRun {
                character_run: CharacterRun::new(3, 4),
                properties: (),
            },
        ];
        let glyph_runs =
            glyph_runs_from_character_runs(&runs, &characters_to_glyph, &glyphs_per_character);
        assert_eq!(glyph_runs.len(), 2);
        assert_eq!(glyph_runs[0].glyph_run, GlyphRun::new(1, 1));
        assert_eq!(glyph_runs[1].glyph_run, GlyphRun::new(2, 1));
    }

    #[test]
    fn test_underline_metrics_helpers() {
        let metrics = FontMetrics {
            ascender: 10.0,
            descender: -3.0,
            underline_position: -4.2,
            underline_thickness: 0.4,
            ..FontMetrics::default()
        };
        assert_eq!(underline_position(&metrics), 3.0);
        assert_eq!(underline_height(&metrics, 0.0, 0.0), (1.0, 1.0));
        assert_eq!(underline_height(&metrics, 2.5, 4.0), (2.5, 4.0));
        assert_eq!(strikethrough_height(0.2, 0.0), (1.0, 1.0));
        assert_eq!(strikethrough_height(2.2, 1.0), (3.0, 3.0));
    }

    #[test]
    fn test_zero_underline_position_becomes_one_pixel() {
        let metrics = FontMetrics {
            descender: -5.0,
            ..FontMetrics::default()
        };
        assert_eq!(underline_position(&metrics), 1.0);
    }
}
