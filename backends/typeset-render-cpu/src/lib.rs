//! CPU Typesetter - laid-out glyphs in, premultiplied pixels out
//!
//! The typesetter draws one buffer per visual style and stacks them:
//!
//! ```text
//!   markup underline / strikethrough runs   (on top)
//!   strikethrough                            (overlay pass)
//!   text
//!   outline
//!   shadow (optionally blurred)
//!   underline
//!   background                               (bottom)
//! ```
//!
//! Each layer comes from [`Typesetter::create_image_buffer`], which walks
//! lines and glyphs once, fetches bitmaps from the [`FontClient`] and drops
//! them into place with [`typeset_glyph`]. Layers are merged with
//! [`combine_image_buffer`], a plain "over" operator on premultiplied RGBA.
//!
//! Nothing in here can fail: writes outside the canvas are clipped, empty
//! glyphs and missing bitmaps simply leave no ink.
//!
//! [`FontClient`]: typeset_core::FontClient

mod background;
mod blur;
mod builder;
mod compose;
mod effects;
mod glyph;
pub mod tiling;
mod typesetter;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod test_util;

pub use background::draw_glyphs_background;
pub use blur::apply_gaussian_blur;
pub use builder::BufferParams;
pub use compose::combine_image_buffer;
pub use effects::{
    draw_background_color, draw_strikethrough, draw_underline, write_color_to_pixel_buffer,
    LineExtent,
};
pub use glyph::{typeset_glyph, GlyphData};
pub use tiling::{render_texture_layers, tile_pixel_buffer, TextureLayers, Tile};
pub use typesetter::Typesetter;

/// Which layer a buffer is being built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypesetStyle {
    /// Plain text in its own colors
    None,
    /// Alpha mask that blanks color glyphs
    Mask,
    Shadow,
    Outline,
    Underline,
    Strikethrough,
    Background,
}

impl TypesetStyle {
    pub fn name(self) -> &'static str {
        match self {
            TypesetStyle::None => "none",
            TypesetStyle::Mask => "mask",
            TypesetStyle::Shadow => "shadow",
            TypesetStyle::Outline => "outline",
            TypesetStyle::Underline => "underline",
            TypesetStyle::Strikethrough => "strikethrough",
            TypesetStyle::Background => "background",
        }
    }

    /// Decoration-only layers never rasterize glyph bitmaps
    pub fn draws_glyphs(self) -> bool {
        !matches!(
            self,
            TypesetStyle::Underline | TypesetStyle::Strikethrough | TypesetStyle::Background
        )
    }
}

/// What [`Typesetter::render`] should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderBehaviour {
    /// Text with every enabled style
    #[default]
    TextAndStyles,
    /// Text only
    NoStyles,
    /// Styles only, on a transparent base
    NoText,
    /// Alpha mask of the text with color glyphs cut out
    Mask,
    /// Decorations that belong above the glyph ink (strikethrough)
    OverlayStyle,
}

impl RenderBehaviour {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" | "text-and-styles" | "all" => Some(RenderBehaviour::TextAndStyles),
            "no-styles" | "text" => Some(RenderBehaviour::NoStyles),
            "no-text" | "styles" => Some(RenderBehaviour::NoText),
            "mask" => Some(RenderBehaviour::Mask),
            "overlay" | "overlay-style" => Some(RenderBehaviour::OverlayStyle),
            _ => None,
        }
    }

    /// Whether style layers are generated at all
    pub fn applies_styles(self) -> bool {
        !matches!(self, RenderBehaviour::NoStyles | RenderBehaviour::Mask)
    }
}
