//! Typeset Core: the shared vocabulary of the typesetting pipeline
//!
//! Everything that travels between the markup processor, the layout, the
//! typesetter and the exporters lives here. Nothing in this crate draws a
//! pixel; it describes what should be drawn and where.
//!
//! ## The Pipeline
//!
//! 1. **Markup** - inline tags become plain text plus character runs
//! 2. **Layout** - characters become positioned glyphs grouped into lines
//! 3. **Typesetting** - one buffer per visual style (text, outline, shadow,
//!    underline, background, strikethrough)
//! 4. **Compositing** - style buffers are blended "over" each other
//! 5. **Export / tiling** - the final buffer leaves as a file or GPU tiles
//!
//! ## What lives where
//!
//! - [`types`] - glyphs, runs, lines, alignments and colors
//! - [`style`] - underline/strikethrough properties and the run resolver
//! - [`model`] - the [`ViewModel`] handed to the typesetter
//! - [`pixel`] - [`PixelBuffer`] and [`GlyphBitmap`]
//! - [`traits`] - [`FontClient`] and [`Exporter`]
//! - [`error`] - the error enums used at the edges of the pipeline

pub mod error;
pub mod model;
pub mod pixel;
pub mod style;
pub mod traits;

#[cfg(test)]
mod proptests;

pub use error::{Result, TypesetError};
pub use model::{Elision, TextStyle, ViewModel};
pub use pixel::{GlyphBitmap, PixelBuffer, PixelFormat};
pub use traits::{Exporter, FontClient, FontMetrics};
pub use types::*;

/// Glyphs, runs, lines and the small value types shared by every stage
pub mod types {
    /// Index into the glyph arrays of a [`crate::ViewModel`]
    pub type GlyphIndex = u32;
    /// Index into the logical character array
    pub type CharacterIndex = u32;
    /// Number of glyphs or characters in a run
    pub type Length = u32;
    /// Font handle understood by a [`crate::FontClient`]; `0` means "no font"
    pub type FontId = u32;
    /// Index into a color palette; `0` selects the default color
    pub type ColorIndex = u16;

    /// Glyph sizes below this are treated as empty (spaces, joiners, newlines)
    pub const MIN_GLYPH_SIZE: f32 = 0.001;

    /// A 2D point or offset in pixels
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Vector2 {
        pub x: f32,
        pub y: f32,
    }

    impl Vector2 {
        pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

        pub const fn new(x: f32, y: f32) -> Self {
            Self { x, y }
        }
    }

    /// Straight (non-premultiplied) RGBA color with channels in `0.0..=1.0`
    #[derive(Debug, Clone, Copy, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Color {
        pub r: f32,
        pub g: f32,
        pub b: f32,
        pub a: f32,
    }

    impl Color {
        pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
        pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
        pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
        pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
        pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
        pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
        pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
        pub const MAGENTA: Color = Color::rgb(1.0, 0.0, 1.0);
        pub const CYAN: Color = Color::rgb(0.0, 1.0, 1.0);

        pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
            Self { r, g, b, a }
        }

        pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
            Self { r, g, b, a: 1.0 }
        }

        /// Build a color from 8-bit channels
        pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
            Self::rgba(
                f32::from(r) / 255.0,
                f32::from(g) / 255.0,
                f32::from(b) / 255.0,
                f32::from(a) / 255.0,
            )
        }

        /// RGB scaled by alpha; alpha unchanged
        pub fn premultiplied(self) -> Self {
            Self::rgba(self.r * self.a, self.g * self.a, self.b * self.a, self.a)
        }

        /// Alpha as a byte, the way the pixel writers see it
        pub fn alpha_u8(self) -> u8 {
            (self.a * 255.0) as u8
        }
    }

    impl Default for Color {
        fn default() -> Self {
            Self::BLACK
        }
    }

    /// One shaped glyph as produced by the layout
    ///
    /// `x_bearing`/`y_bearing` are the offsets from the pen position to the
    /// top-left of the glyph's ink box (y up), `advance` moves the pen.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct GlyphInfo {
        pub font_id: FontId,
        pub index: u32,
        pub width: f32,
        pub height: f32,
        pub x_bearing: f32,
        pub y_bearing: f32,
        pub advance: f32,
        pub is_italic_required: bool,
        pub is_bold_required: bool,
    }

    impl GlyphInfo {
        /// Glyphs this small carry no ink and are skipped when typesetting
        pub fn is_empty(&self) -> bool {
            self.width < MIN_GLYPH_SIZE || self.height < MIN_GLYPH_SIZE
        }
    }

    /// `[glyph_index, glyph_index + number_of_glyphs)`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct GlyphRun {
        pub glyph_index: GlyphIndex,
        pub number_of_glyphs: Length,
    }

    impl GlyphRun {
        pub const fn new(glyph_index: GlyphIndex, number_of_glyphs: Length) -> Self {
            Self {
                glyph_index,
                number_of_glyphs,
            }
        }

        /// One past the last glyph of the run
        pub fn end(&self) -> GlyphIndex {
            self.glyph_index.saturating_add(self.number_of_glyphs)
        }

        pub fn contains(&self, index: GlyphIndex) -> bool {
            index >= self.glyph_index && index < self.end()
        }
    }

    /// `[character_index, character_index + number_of_characters)`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CharacterRun {
        pub character_index: CharacterIndex,
        pub number_of_characters: Length,
    }

    impl CharacterRun {
        pub const fn new(character_index: CharacterIndex, number_of_characters: Length) -> Self {
            Self {
                character_index,
                number_of_characters,
            }
        }

        pub fn end(&self) -> CharacterIndex {
            self.character_index.saturating_add(self.number_of_characters)
        }

        pub fn contains(&self, index: CharacterIndex) -> bool {
            index >= self.character_index && index < self.end()
        }
    }

    /// Text direction of a line or of the whole control
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub enum TextDirection {
        #[default]
        LeftToRight,
        RightToLeft,
    }

    impl TextDirection {
        pub fn is_rtl(self) -> bool {
            self == TextDirection::RightToLeft
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
    pub enum HorizontalAlignment {
        #[default]
        Begin,
        Center,
        End,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
    pub enum VerticalAlignment {
        #[default]
        Top,
        Center,
        Bottom,
    }

    /// Where a line's glyphs sit inside the line box when line spacing is set
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
    pub enum VerticalLineAlignment {
        #[default]
        Top,
        Middle,
        Bottom,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
    pub enum EllipsisPosition {
        #[default]
        End,
        Start,
        Middle,
    }

    /// One laid-out line
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct LineRun {
        pub glyph_run: GlyphRun,
        pub character_run: CharacterRun,
        pub width: f32,
        /// Distance from the line top to the baseline (positive)
        pub ascender: f32,
        /// Distance from the baseline to the line bottom (negative)
        pub descender: f32,
        pub line_spacing: f32,
        pub alignment_offset: f32,
        pub direction: TextDirection,
        pub ellipsis: bool,
        /// Set when a MIDDLE ellipsis splits the line into two glyph ranges
        pub is_split_to_two_halves: bool,
        pub glyph_run_second_half: GlyphRun,
    }

    impl LineRun {
        /// Last glyph index (inclusive) covered by the line, `None` when empty
        pub fn last_glyph_index(&self) -> Option<GlyphIndex> {
            let run = if self.is_split_to_two_halves {
                &self.glyph_run_second_half
            } else {
                &self.glyph_run
            };
            run.end().checked_sub(1)
        }
    }

    /// A paragraph whose alignment was set from markup
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct BoundedParagraphRun {
        pub character_run: CharacterRun,
        pub horizontal_alignment: HorizontalAlignment,
        pub horizontal_alignment_defined: bool,
    }
}
