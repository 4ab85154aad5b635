//! Render command implementation
//!
//! Loads the font, builds the style from the style file and flags, runs the
//! pipeline and writes the exported image.

use std::fs;
use std::io::{self, Write};
use std::sync::Arc;

use crate::cli::RenderArgs;
use crate::config::{color_value, parse_offset, parse_size, StyleConfig};
use typeset::export::exporter_for;
use typeset::font::SkrifaFontClient;
use typeset::layout::LayoutParams;
use typeset::render::{render_texture_layers, RenderBehaviour};
use typeset::{Pipeline, RenderOptions};
use typeset_core::error::{Result, TypesetError};
use typeset_core::{FontId, PixelFormat, TextStyle};

pub fn run(args: &RenderArgs) -> Result<()> {
    let text = match &args.text_file {
        Some(path) => fs::read_to_string(path)?,
        None => super::text_or_stdin(args.text.as_deref())?,
    };

    if !args.quiet {
        eprintln!("typeset v{}", env!("CARGO_PKG_VERSION"));
    }

    let mut fonts = SkrifaFontClient::new();
    let font_id = fonts.load_font_file(&args.font_file, args.font_size, args.face_index)?;
    let pipeline = Pipeline::new(Arc::new(fonts));
    let options = render_options(args, font_id)?;

    if let Some(max_texture_size) = args.max_texture_size {
        report_tiles(&pipeline, &text, &options, max_texture_size)?;
    }

    let image = pipeline.render(&text, &options)?;
    let exporter = exporter_for(args.format.as_str())?;
    let exported = exporter.export(&image)?;

    match &args.output_file {
        Some(path) => fs::write(path, &exported)?,
        None => io::stdout().write_all(&exported)?,
    }

    if !args.quiet {
        match &args.output_file {
            Some(path) => eprintln!("Rendered to {}", path.display()),
            None => eprintln!("Rendered to stdout"),
        }
        eprintln!("  Image: {}x{} {}", image.width(), image.height(), image.format().name());
        eprintln!("  Format: {}", args.format.as_str().to_uppercase());
        eprintln!("  Size: {} bytes", exported.len());
    }
    Ok(())
}

/// Pipeline options from the command line
pub fn render_options(args: &RenderArgs, font_id: FontId) -> Result<RenderOptions> {
    let (width, height) = parse_size(&args.width_height)?;
    let behaviour = RenderBehaviour::parse(&args.behaviour).ok_or_else(|| {
        TypesetError::ConfigError(format!("unknown behaviour '{}'", args.behaviour))
    })?;
    let mut pixel_format = PixelFormat::from(args.pixel_format);
    if pixel_format == PixelFormat::L8 && behaviour.applies_styles() {
        log::warn!("styled renders are never single channel; using rgba");
        pixel_format = PixelFormat::Rgba8888;
    }

    Ok(RenderOptions {
        layout: LayoutParams {
            font_id,
            width,
            height,
            line_spacing: args.line_spacing,
            horizontal_alignment: args.align.into(),
            vertical_alignment: args.valign.into(),
            direction: args.direction.into(),
            ellipsis: args.ellipsis,
            style: text_style(args)?,
            ..LayoutParams::default()
        },
        behaviour,
        pixel_format,
        ignore_horizontal_alignment: args.ignore_alignment,
        include_overlay: !args.no_overlay,
    })
}

/// Style file first, then flags
pub fn text_style(args: &RenderArgs) -> Result<TextStyle> {
    let mut style = TextStyle::default();
    if let Some(path) = &args.style {
        StyleConfig::load(path)?.apply(&mut style)?;
    }
    if let Some(color) = &args.color {
        style.default_color = color_value(color)?;
    }
    if let Some(color) = &args.background {
        style.background_color = color_value(color)?;
        style.background_enabled = true;
    }
    if args.underline {
        style.underline_enabled = true;
    }
    if args.strikethrough {
        style.strikethrough_enabled = true;
    }
    if let Some(width) = args.outline {
        style.outline_width = width;
    }
    if let Some(offset) = &args.shadow {
        style.shadow_offset = parse_offset(offset)?;
    }
    if let Some(radius) = args.shadow_blur {
        style.shadow_blur_radius = radius;
    }
    Ok(style)
}

fn report_tiles(
    pipeline: &Pipeline,
    text: &str,
    options: &RenderOptions,
    max_texture_size: u32,
) -> Result<()> {
    let mut typesetter = pipeline.typesetter(text, &options.layout)?;
    let size = typesetter.model().control_size;
    let layers = render_texture_layers(&mut typesetter, size, options.layout.direction, false);
    for (name, tiles) in layers.tiles(max_texture_size) {
        let offsets: Vec<String> = tiles.iter().map(|t| t.offset_y.to_string()).collect();
        eprintln!("  Layer {}: {} tile(s) at y = {}", name, tiles.len(), offsets.join(", "));
    }
    Ok(())
}
