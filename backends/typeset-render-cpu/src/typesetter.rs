//! The typesetter: view model + font client → one finished image
//!
//! ## Render order
//!
//! 1. Settle elision on the model (once).
//! 2. Place the text block inside the requested size (alignment).
//! 3. Build the base layer (text, mask or transparent).
//! 4. Stack outline, shadow and underline below it, background below
//!    everything.
//! 5. In overlay mode, put the strikethrough on top.
//! 6. Draw markup underline and strikethrough runs on top, one run at a time.
//! 7. Convert to the requested pixel format.

use std::sync::Arc;

use typeset_core::{
    FontClient, HorizontalAlignment, PixelBuffer, PixelFormat, Result, TextDirection, Vector2,
    VerticalAlignment, VerticalLineAlignment, ViewModel,
};

use crate::background::draw_glyphs_background;
use crate::blur::apply_gaussian_blur;
use crate::builder::BufferParams;
use crate::compose::combine_image_buffer;
use crate::glyph::GlyphData;
use crate::{RenderBehaviour, TypesetStyle};

/// Renders a [`ViewModel`] with glyphs from a [`FontClient`]
pub struct Typesetter {
    pub(crate) model: ViewModel,
    pub(crate) fonts: Arc<dyn FontClient>,
}

impl std::fmt::Debug for Typesetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typesetter")
            .field("glyphs", &self.model.number_of_glyphs())
            .field("lines", &self.model.lines.len())
            .field("fonts", &self.fonts.name())
            .finish()
    }
}

/// Where the first line's pen starts relative to the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pen {
    x: i32,
    y: i32,
}

impl Typesetter {
    /// Take ownership of `model` after checking its structure
    pub fn new(model: ViewModel, fonts: Arc<dyn FontClient>) -> Result<Self> {
        model.validate()?;
        log::debug!(
            "typesetter ready: {} glyphs, {} lines, fonts from {}",
            model.number_of_glyphs(),
            model.lines.len(),
            fonts.name()
        );
        Ok(Self { model, fonts })
    }

    pub fn model(&self) -> &ViewModel {
        &self.model
    }

    /// Mutable access for incremental edits; the model is not re-validated
    pub fn model_mut(&mut self) -> &mut ViewModel {
        &mut self.model
    }

    pub fn fonts(&self) -> &Arc<dyn FontClient> {
        &self.fonts
    }

    fn pen(&self, size: Vector2, direction: TextDirection) -> Pen {
        let model = &self.model;
        let outline = i32::from(model.style.outline_width);
        let ltr = !direction.is_rtl();

        let x = match model.horizontal_alignment {
            HorizontalAlignment::Begin => 0,
            HorizontalAlignment::Center => {
                if ltr {
                    -outline
                } else {
                    outline
                }
            },
            HorizontalAlignment::End => {
                if ltr {
                    -2 * outline
                } else {
                    2 * outline
                }
            },
        };

        let layout = model.layout_size;
        let mut y = match model.vertical_alignment {
            VerticalAlignment::Top => 0,
            VerticalAlignment::Center => ((0.5 * (size.y - layout.y)) as i32).max(0),
            VerticalAlignment::Bottom => (size.y - layout.y) as i32,
        };

        if let Some(line) = model.lines.first() {
            match model.vertical_line_alignment {
                VerticalLineAlignment::Top => {},
                VerticalLineAlignment::Middle => {
                    y = (y as f32 - line.descender) as i32;
                    y += (line.line_spacing * 0.5 + line.descender) as i32;
                },
                VerticalLineAlignment::Bottom => {
                    let box_height = line.ascender - line.descender;
                    y += ((box_height + line.line_spacing) - box_height) as i32;
                },
            }
        }
        Pen { x, y }
    }

    /// Render the whole text into a `size` buffer of `pixel_format`
    ///
    /// Never fails: glyphs the font client cannot rasterize are left out
    /// and anything outside the buffer is clipped.
    pub fn render(
        &mut self,
        size: Vector2,
        direction: TextDirection,
        behaviour: RenderBehaviour,
        ignore_horizontal_alignment: bool,
        pixel_format: PixelFormat,
    ) -> PixelBuffer {
        self.model.elide_glyphs();

        let width = size.x.max(0.0) as u32;
        let height = size.y.max(0.0) as u32;
        let pen = self.pen(size, direction);
        let working = if pixel_format == PixelFormat::L8 && !behaviour.applies_styles() {
            PixelFormat::L8
        } else {
            PixelFormat::Rgba8888
        };
        let layer = |style: TypesetStyle, format: PixelFormat| {
            BufferParams::new(width, height, style, format)
                .with_offsets(pen.x, pen.y)
                .ignoring_horizontal_alignment(ignore_horizontal_alignment)
        };

        log::debug!(
            "render {}x{} {:?} into {} (pen {}, {})",
            width,
            height,
            behaviour,
            pixel_format.name(),
            pen.x,
            pen.y
        );

        let mut image = match behaviour {
            RenderBehaviour::Mask => self.create_image_buffer(&layer(TypesetStyle::Mask, working)),
            RenderBehaviour::NoText | RenderBehaviour::OverlayStyle => {
                PixelBuffer::new(width, height, PixelFormat::Rgba8888)
            },
            RenderBehaviour::TextAndStyles | RenderBehaviour::NoStyles => {
                self.create_image_buffer(&layer(TypesetStyle::None, working))
            },
        };

        if behaviour.applies_styles() {
            image = self.apply_styles(image, behaviour, &layer);
        }

        image.convert(pixel_format)
    }

    fn apply_styles(
        &self,
        mut image: PixelBuffer,
        behaviour: RenderBehaviour,
        layer: &dyn Fn(TypesetStyle, PixelFormat) -> BufferParams,
    ) -> PixelBuffer {
        let style = &self.model.style;
        let overlay = behaviour == RenderBehaviour::OverlayStyle;
        let rgba = PixelFormat::Rgba8888;

        if style.outline_width != 0 && !overlay {
            let outline = self.create_image_buffer(&layer(TypesetStyle::Outline, rgba));
            image = combine_image_buffer(image, outline);
        }

        if style.has_shadow() && !overlay {
            let mut shadow = self.create_image_buffer(&layer(TypesetStyle::Shadow, rgba));
            if style.shadow_blur_radius > f32::EPSILON {
                apply_gaussian_blur(&mut shadow, style.shadow_blur_radius);
            }
            image = combine_image_buffer(image, shadow);
        }

        if style.underline_enabled && !overlay {
            let underline = self.create_image_buffer(&layer(TypesetStyle::Underline, rgba));
            image = combine_image_buffer(image, underline);
        }

        let markup_background = self.model.is_markup_background_color_set();
        if (style.background_enabled || markup_background) && !overlay {
            let params = layer(TypesetStyle::Background, rgba);
            let background = if style.background_enabled {
                self.create_image_buffer(&params)
            } else {
                PixelBuffer::new(params.width, params.height, rgba)
            };
            let background = if markup_background {
                let mut data = GlyphData {
                    buffer: background,
                    horizontal_offset: params.horizontal_offset,
                    vertical_offset: params.vertical_offset,
                };
                draw_glyphs_background(
                    &self.model,
                    &mut data,
                    params.ignore_horizontal_alignment,
                );
                data.buffer
            } else {
                background
            };
            image = combine_image_buffer(image, background);
        }

        if style.strikethrough_enabled && overlay {
            let strikethrough = self.create_image_buffer(&layer(TypesetStyle::Strikethrough, rgba));
            image = combine_image_buffer(strikethrough, image);
        }

        if self.model.markup_processor_enabled {
            for run in &self.model.underline_runs {
                let Some(last) = run.glyph_run.end().checked_sub(1) else {
                    continue;
                };
                let params = layer(TypesetStyle::Underline, rgba)
                    .with_glyph_range(run.glyph_run.glyph_index, last);
                image = combine_image_buffer(self.create_image_buffer(&params), image);
            }
            for run in &self.model.strikethrough_runs {
                let Some(last) = run.glyph_run.end().checked_sub(1) else {
                    continue;
                };
                let params = layer(TypesetStyle::Strikethrough, rgba)
                    .with_glyph_range(run.glyph_run.glyph_index, last);
                image = combine_image_buffer(self.create_image_buffer(&params), image);
            }
        }

        image
    }
}
