//! Texture layers and tiling for GPU upload
//!
//! A text visual is uploaded as up to four layers: the plain text, the
//! styles without text, an overlay for decorations above the ink, and an
//! alpha mask that keeps color glyphs out of text-color animation. Images
//! taller than the maximum texture size are cut into horizontal strips.

use typeset_core::{PixelBuffer, PixelFormat, TextDirection, Vector2};

use crate::{RenderBehaviour, Typesetter};

/// One horizontal strip of a layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub buffer: PixelBuffer,
    /// Rows between the top of the layer and the top of this strip
    pub offset_y: u32,
}

/// Cut `buffer` into strips of at most `max_texture_size` rows
///
/// Buffers shorter than the limit (or a limit of zero) stay whole.
pub fn tile_pixel_buffer(buffer: &PixelBuffer, max_texture_size: u32) -> Vec<Tile> {
    if max_texture_size == 0 || buffer.height() < max_texture_size {
        return vec![Tile {
            buffer: buffer.clone(),
            offset_y: 0,
        }];
    }
    let mut tiles = Vec::new();
    let mut offset_y = 0;
    while offset_y < buffer.height() {
        let rows = max_texture_size.min(buffer.height() - offset_y);
        tiles.push(Tile {
            buffer: buffer.crop_rows(offset_y, rows),
            offset_y,
        });
        offset_y += rows;
    }
    log::debug!(
        "tiled {}x{} layer into {} strips of {} rows",
        buffer.width(),
        buffer.height(),
        tiles.len(),
        max_texture_size
    );
    tiles
}

/// The layers a text visual uploads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureLayers {
    /// L8 for single-color text, RGBA with multiple colors or color glyphs
    pub text: PixelBuffer,
    pub style: Option<PixelBuffer>,
    pub overlay: Option<PixelBuffer>,
    pub mask: Option<PixelBuffer>,
}

impl TextureLayers {
    /// Every present layer, tiled, tagged with its name
    pub fn tiles(&self, max_texture_size: u32) -> Vec<(&'static str, Vec<Tile>)> {
        let mut layers = vec![("text", tile_pixel_buffer(&self.text, max_texture_size))];
        for (name, layer) in [
            ("style", &self.style),
            ("overlay", &self.overlay),
            ("mask", &self.mask),
        ] {
            if let Some(buffer) = layer {
                layers.push((name, tile_pixel_buffer(buffer, max_texture_size)));
            }
        }
        layers
    }
}

/// Render the texture layers of a text visual
///
/// `contains_color_glyph` comes from the font side (emoji present).
pub fn render_texture_layers(
    typesetter: &mut Typesetter,
    size: Vector2,
    direction: TextDirection,
    contains_color_glyph: bool,
) -> TextureLayers {
    let model = typesetter.model();
    let style = &model.style;
    let multiple_colors = !model.colors.is_empty();
    let style_enabled = style.has_shadow()
        || style.underline_enabled
        || style.outline_width != 0
        || style.background_enabled
        || model.is_markup_background_color_set()
        || (model.markup_processor_enabled
            && (model.is_markup_underline_set() || model.is_markup_strikethrough_set()));
    let overlay_enabled = style.strikethrough_enabled;

    let text_format = if contains_color_glyph || multiple_colors {
        PixelFormat::Rgba8888
    } else {
        PixelFormat::L8
    };

    let text = typesetter.render(size, direction, RenderBehaviour::NoStyles, false, text_format);
    let style = style_enabled.then(|| {
        typesetter.render(size, direction, RenderBehaviour::NoText, false, PixelFormat::Rgba8888)
    });
    let overlay = overlay_enabled.then(|| {
        typesetter.render(
            size,
            direction,
            RenderBehaviour::OverlayStyle,
            false,
            PixelFormat::Rgba8888,
        )
    });
    let mask = (contains_color_glyph && !multiple_colors)
        .then(|| typesetter.render(size, direction, RenderBehaviour::Mask, false, PixelFormat::L8));

    TextureLayers {
        text,
        style,
        overlay,
        mask,
    }
}
