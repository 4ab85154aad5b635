//! typeset - rich text to pixels
//!
//! The pipeline has four stages:
//! 1. Markup processing: inline tags become plain text plus style runs
//! 2. Layout: glyphs, positions and lines in a [`ViewModel`]
//! 3. Typesetting: one buffer per style layer, composited
//! 4. Export: PNG or PNM bytes
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use typeset::prelude::*;
//!
//! let mut fonts = SkrifaFontClient::new();
//! fonts.load_font_file("DejaVuSans.ttf", 32.0, 0)?;
//! let pipeline = Pipeline::new(Arc::new(fonts));
//! let image = pipeline.render("<u>Hello</u> world", &RenderOptions::default())?;
//! let png = PngExporter::new().export(&image)?;
//! ```
//!
//! # Feature Flags
//!
//! - `markup`: inline markup processor
//! - `layout`: simple line layout (implies `markup`)
//! - `render-cpu`: the typesetter
//! - `pipeline`: [`Pipeline`] chaining all of the above
//! - `font-skrifa`: font client over skrifa and tiny-skia
//! - `export`: PNG and PNM exporters
//! - `full`: all features enabled

pub use typeset_core::{error, model, pixel, style, traits, Color, PixelBuffer, PixelFormat, ViewModel};

#[cfg(feature = "markup")]
pub use typeset_markup as markup;

#[cfg(feature = "layout")]
pub use typeset_layout as layout;

#[cfg(feature = "render-cpu")]
pub use typeset_render_cpu as render;

#[cfg(feature = "font-skrifa")]
pub use typeset_font_skrifa as font;

#[cfg(feature = "export")]
pub use typeset_export as export;

#[cfg(feature = "pipeline")]
mod pipeline;

#[cfg(feature = "pipeline")]
pub use pipeline::{Pipeline, RenderOptions};

/// Common imports for typical usage
pub mod prelude {
    pub use typeset_core::{
        error::{Result, TypesetError},
        traits::{Exporter, FontClient, FontMetrics},
        Color, HorizontalAlignment, PixelBuffer, PixelFormat, TextDirection, TextStyle, Vector2,
        VerticalAlignment, ViewModel,
    };

    #[cfg(feature = "export")]
    pub use typeset_export::{PngExporter, PnmExporter};
    #[cfg(feature = "font-skrifa")]
    pub use typeset_font_skrifa::SkrifaFontClient;
    #[cfg(feature = "layout")]
    pub use typeset_layout::{LayoutParams, SimpleLayout};
    #[cfg(feature = "markup")]
    pub use typeset_markup::{process_markup, MarkupProcessData};
    #[cfg(feature = "pipeline")]
    pub use crate::{Pipeline, RenderOptions};
    #[cfg(feature = "render-cpu")]
    pub use typeset_render_cpu::{RenderBehaviour, Typesetter};
}
