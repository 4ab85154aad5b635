//! Markup in, pixels out
//!
//! Chains the markup processor, the simple layout and the CPU typesetter.
//! Full renders also pick up the overlay layer so strikethrough lands above
//! the glyph ink the way a text visual stacks its textures.

use std::sync::Arc;

use typeset_core::{FontClient, PixelBuffer, PixelFormat, Result};
use typeset_layout::{LayoutParams, SimpleLayout};
use typeset_markup::MarkupProcessor;
use typeset_render_cpu::{combine_image_buffer, RenderBehaviour, Typesetter};

/// Everything a one-call render needs besides the text
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub layout: LayoutParams,
    pub behaviour: RenderBehaviour,
    pub pixel_format: PixelFormat,
    pub ignore_horizontal_alignment: bool,
    /// Composite the overlay layer onto `TextAndStyles` renders
    pub include_overlay: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            layout: LayoutParams::default(),
            behaviour: RenderBehaviour::TextAndStyles,
            pixel_format: PixelFormat::Rgba8888,
            ignore_horizontal_alignment: false,
            include_overlay: true,
        }
    }
}

/// Renders markup strings with one font client
pub struct Pipeline {
    fonts: Arc<dyn FontClient>,
    markup: MarkupProcessor,
    layout: SimpleLayout,
}

impl Pipeline {
    pub fn new(fonts: Arc<dyn FontClient>) -> Self {
        Self {
            layout: SimpleLayout::new(Arc::clone(&fonts)),
            markup: MarkupProcessor::new(),
            fonts,
        }
    }

    pub fn fonts(&self) -> &Arc<dyn FontClient> {
        &self.fonts
    }

    /// Lay out `markup` and wrap the model in a typesetter
    pub fn typesetter(&self, markup: &str, params: &LayoutParams) -> Result<Typesetter> {
        let data = self.markup.process(markup);
        let model = self.layout.layout(&data, params);
        Typesetter::new(model, Arc::clone(&self.fonts))
    }

    /// Render `markup` at the laid-out control size
    pub fn render(&self, markup: &str, options: &RenderOptions) -> Result<PixelBuffer> {
        let mut typesetter = self.typesetter(markup, &options.layout)?;
        let size = typesetter.model().control_size;
        let direction = options.layout.direction;
        let overlay = options.include_overlay
            && options.behaviour == RenderBehaviour::TextAndStyles
            && typesetter.model().style.strikethrough_enabled;
        log::debug!(
            "{} -> {}x{} {:?}{}",
            self.fonts.name(),
            size.x,
            size.y,
            options.behaviour,
            if overlay { " + overlay" } else { "" }
        );

        if !overlay {
            return Ok(typesetter.render(
                size,
                direction,
                options.behaviour,
                options.ignore_horizontal_alignment,
                options.pixel_format,
            ));
        }
        let base = typesetter.render(
            size,
            direction,
            RenderBehaviour::TextAndStyles,
            options.ignore_horizontal_alignment,
            PixelFormat::Rgba8888,
        );
        let top = typesetter.render(
            size,
            direction,
            RenderBehaviour::OverlayStyle,
            options.ignore_horizontal_alignment,
            PixelFormat::Rgba8888,
        );
        Ok(combine_image_buffer(top, base).convert(options.pixel_format))
    }
}
