//! End-to-end renders against a font client that draws solid boxes

use std::sync::Arc;

use typeset_core::style::{GlyphStyleRun, UnderlineStyleProperties, UnderlineType};
use typeset_core::{
    Color, FontClient, FontId, FontMetrics, GlyphBitmap, GlyphInfo, GlyphRun, LineRun,
    PixelBuffer, PixelFormat, TextDirection, Vector2, VerticalAlignment, ViewModel,
};
use typeset_render_cpu::{
    combine_image_buffer, render_texture_layers, RenderBehaviour, Typesetter,
};

const EMOJI: u32 = 99;

struct BoxFonts;

impl FontClient for BoxFonts {
    fn name(&self) -> &'static str {
        "box"
    }

    fn font_metrics(&self, _font_id: FontId) -> FontMetrics {
        FontMetrics {
            ascender: 10.0,
            descender: -3.0,
            height: 13.0,
            underline_position: -2.0,
            underline_thickness: 1.0,
        }
    }

    fn create_bitmap(
        &self,
        _font_id: FontId,
        glyph_index: u32,
        _italic: bool,
        _bold: bool,
        outline_width: u32,
    ) -> Option<GlyphBitmap> {
        let (width, height) = (5 + 2 * outline_width, 10 + 2 * outline_width);
        let pixels = (width * height) as usize;
        if glyph_index == EMOJI {
            return Some(GlyphBitmap {
                width,
                height,
                format: PixelFormat::Rgba8888,
                data: [255, 0, 0, 255].repeat(pixels),
                is_color_emoji: true,
                ..GlyphBitmap::default()
            });
        }
        Some(GlyphBitmap::mask(width, height, vec![255; pixels]))
    }

    fn glyph_info(&self, _font_id: FontId, _character: char) -> Option<GlyphInfo> {
        None
    }
}

fn row(count: u32, advance: f32) -> ViewModel {
    let mut model = ViewModel::new();
    model.glyphs = (0..count)
        .map(|i| GlyphInfo {
            font_id: 1,
            index: i + 1,
            width: 5.0,
            height: 10.0,
            y_bearing: 10.0,
            advance,
            ..GlyphInfo::default()
        })
        .collect();
    model.positions = (0..count)
        .map(|i| Vector2::new(i as f32 * advance, -10.0))
        .collect();
    model.glyphs_to_characters = (0..count).collect();
    model.text = vec!['a'; count as usize];
    model.lines = vec![LineRun {
        glyph_run: GlyphRun::new(0, count),
        ascender: 10.0,
        descender: -3.0,
        ..LineRun::default()
    }];
    model.layout_size = Vector2::new(count as f32 * advance, 13.0);
    model
}

fn render(model: ViewModel, behaviour: RenderBehaviour, format: PixelFormat) -> PixelBuffer {
    let mut typesetter = Typesetter::new(model, Arc::new(BoxFonts)).unwrap();
    typesetter.render(
        Vector2::new(40.0, 20.0),
        TextDirection::LeftToRight,
        behaviour,
        false,
        format,
    )
}

fn rgba(buffer: &PixelBuffer, x: u32, y: u32) -> [u8; 4] {
    let p = buffer.pixel(x, y).unwrap();
    [p[0], p[1], p[2], p[3]]
}

const BLACK: [u8; 4] = [0, 0, 0, 255];
const CLEAR: [u8; 4] = [0, 0, 0, 0];

fn with_background() -> ViewModel {
    let mut model = row(3, 6.0);
    model.style.background_enabled = true;
    model.style.background_color = Color::GREEN;
    model
}

#[test]
fn test_full_render_puts_text_over_background() {
    let image = render(with_background(), RenderBehaviour::TextAndStyles, PixelFormat::Rgba8888);
    assert_eq!(rgba(&image, 1, 5), BLACK);
    assert_eq!(rgba(&image, 5, 5), [0, 255, 0, 255]);
    assert_eq!(rgba(&image, 30, 5), CLEAR);
}

#[test]
fn test_no_text_keeps_only_styles() {
    let image = render(with_background(), RenderBehaviour::NoText, PixelFormat::Rgba8888);
    assert_eq!(rgba(&image, 1, 5), [0, 255, 0, 255]);
}

#[test]
fn test_no_styles_keeps_only_text() {
    let image = render(with_background(), RenderBehaviour::NoStyles, PixelFormat::Rgba8888);
    assert_eq!(rgba(&image, 1, 5), BLACK);
    assert_eq!(rgba(&image, 5, 5), CLEAR);
}

#[test]
fn test_alpha_only_output() {
    let image = render(row(3, 6.0), RenderBehaviour::NoStyles, PixelFormat::L8);
    assert_eq!(image.format(), PixelFormat::L8);
    assert_eq!(image.data().len(), 40 * 20);
    assert_eq!(image.alpha(1, 5), Some(255));
    assert_eq!(image.alpha(5, 5), Some(0));
}

#[test]
fn test_bgra_output_swaps_channels() {
    let mut model = row(1, 6.0);
    model.style.default_color = Color::RED;
    let image = render(model, RenderBehaviour::NoStyles, PixelFormat::Bgra8888);
    assert_eq!(rgba(&image, 1, 5), [0, 0, 255, 255]);
}

#[test]
fn test_mask_cuts_out_color_glyphs() {
    let mut model = row(2, 6.0);
    model.glyphs[1].index = EMOJI;
    let mask = render(model.clone(), RenderBehaviour::Mask, PixelFormat::L8);
    assert_eq!(mask.alpha(1, 5), Some(255));
    assert_eq!(mask.alpha(7, 5), Some(0));

    let full = render(model, RenderBehaviour::TextAndStyles, PixelFormat::Rgba8888);
    assert_eq!(rgba(&full, 7, 5), [255, 0, 0, 255]);
}

#[test]
fn test_vertical_alignment_moves_pen() {
    let mut model = row(1, 6.0);
    model.vertical_alignment = VerticalAlignment::Bottom;
    let image = render(model.clone(), RenderBehaviour::NoStyles, PixelFormat::L8);
    // 20 - 13 = 7 rows down
    assert_eq!(image.alpha(1, 6), Some(0));
    assert_eq!(image.alpha(1, 7), Some(255));

    model.vertical_alignment = VerticalAlignment::Center;
    let image = render(model, RenderBehaviour::NoStyles, PixelFormat::L8);
    assert_eq!(image.alpha(1, 2), Some(0));
    assert_eq!(image.alpha(1, 3), Some(255));
}

#[test]
fn test_alignment_offset_can_be_ignored() {
    let mut model = row(1, 6.0);
    model.lines[0].alignment_offset = 10.0;
    let mut typesetter = Typesetter::new(model, Arc::new(BoxFonts)).unwrap();
    let size = Vector2::new(40.0, 20.0);
    let aligned = typesetter.render(
        size,
        TextDirection::LeftToRight,
        RenderBehaviour::NoStyles,
        false,
        PixelFormat::L8,
    );
    assert_eq!(aligned.alpha(1, 5), Some(0));
    assert_eq!(aligned.alpha(11, 5), Some(255));
    let ignored = typesetter.render(
        size,
        TextDirection::LeftToRight,
        RenderBehaviour::NoStyles,
        true,
        PixelFormat::L8,
    );
    assert_eq!(ignored.alpha(1, 5), Some(255));
}

fn dashed_run(start: u32, len: u32) -> GlyphStyleRun<UnderlineStyleProperties> {
    GlyphStyleRun {
        glyph_run: GlyphRun::new(start, len),
        properties: UnderlineStyleProperties {
            underline_type: UnderlineType::Dashed,
            type_defined: true,
            color: Color::BLUE,
            color_defined: true,
            dash_width: 2.0,
            dash_width_defined: true,
            dash_gap: 1.0,
            dash_gap_defined: true,
            ..UnderlineStyleProperties::default()
        },
    }
}

#[test]
fn test_markup_dashes_restart_per_run() {
    let mut model = row(3, 7.0);
    model.markup_processor_enabled = true;
    model.underline_runs = vec![dashed_run(0, 2), dashed_run(2, 1)];
    let image = render(model, RenderBehaviour::TextAndStyles, PixelFormat::Rgba8888);

    const BLUE: [u8; 4] = [0, 0, 255, 255];
    // underline row: baseline 10 + position 2
    let y = 12;
    assert_eq!(rgba(&image, 0, y), BLUE);
    assert_eq!(rgba(&image, 1, y), BLUE);
    assert_eq!(rgba(&image, 2, y), CLEAR);
    assert_eq!(rgba(&image, 3, y), BLUE);
    assert_eq!(rgba(&image, 12, y), BLUE);
    assert_eq!(rgba(&image, 13, y), CLEAR);
    // second run restarts its pattern at its own left edge
    assert_eq!(rgba(&image, 14, y), BLUE);
    assert_eq!(rgba(&image, 15, y), BLUE);
    assert_eq!(rgba(&image, 16, y), CLEAR);
    assert_eq!(rgba(&image, 20, y), CLEAR);
}

#[test]
fn test_strikethrough_only_in_overlay() {
    let mut model = row(3, 6.0);
    model.style.strikethrough_enabled = true;
    model.style.strikethrough_color = Color::RED;
    let full = render(model.clone(), RenderBehaviour::TextAndStyles, PixelFormat::Rgba8888);
    assert_eq!(rgba(&full, 5, 7), CLEAR);

    let overlay = render(model, RenderBehaviour::OverlayStyle, PixelFormat::Rgba8888);
    assert_eq!(rgba(&overlay, 5, 7), [255, 0, 0, 255]);
    assert_eq!(rgba(&overlay, 1, 7), [255, 0, 0, 255]);
    assert_eq!(rgba(&overlay, 1, 5), CLEAR);
}

#[test]
fn test_underline_is_drawn_below_the_ink() {
    let mut model = row(3, 6.0);
    model.style.underline_enabled = true;
    model.style.underline_color = Color::RED;
    model.style.underline_height = 3.0;
    let image = render(model, RenderBehaviour::TextAndStyles, PixelFormat::Rgba8888);
    // rows 12..15; the glyph ink above is untouched
    assert_eq!(rgba(&image, 1, 12), [255, 0, 0, 255]);
    assert_eq!(rgba(&image, 1, 14), [255, 0, 0, 255]);
    assert_eq!(rgba(&image, 1, 9), BLACK);
    assert_eq!(rgba(&image, 1, 15), CLEAR);
}

#[test]
fn test_blurred_shadow_is_soft() {
    let mut model = row(1, 6.0);
    model.style.shadow_offset = Vector2::new(3.0, 3.0);
    model.style.shadow_color = Color::BLACK;
    model.style.shadow_blur_radius = 2.0;
    let image = render(model, RenderBehaviour::NoText, PixelFormat::Rgba8888);
    let partial = image
        .data()
        .chunks_exact(4)
        .filter(|p| p[3] > 0 && p[3] < 255)
        .count();
    assert!(partial > 0);
}

#[test]
fn test_repeated_render_is_stable() {
    let mut model = row(4, 6.0);
    model.control_size = Vector2::new(15.0, 20.0);
    model.lines[0].ellipsis = true;
    model.ellipsis_enabled = true;
    model.ellipsis_glyph = Some(GlyphInfo {
        font_id: 1,
        index: 42,
        width: 5.0,
        height: 10.0,
        y_bearing: 10.0,
        advance: 5.0,
        ..GlyphInfo::default()
    });
    let mut typesetter = Typesetter::new(model, Arc::new(BoxFonts)).unwrap();
    let size = Vector2::new(40.0, 20.0);
    let first = typesetter.render(
        size,
        TextDirection::LeftToRight,
        RenderBehaviour::NoStyles,
        false,
        PixelFormat::L8,
    );
    let second = typesetter.render(
        size,
        TextDirection::LeftToRight,
        RenderBehaviour::NoStyles,
        false,
        PixelFormat::L8,
    );
    assert_eq!(first, second);
    // the ellipsis replaced glyph 1 (pen 6 + 5 fits in 15, pen 12 + 5 does not)
    assert_eq!(typesetter.model().elision.end_index, 1);
    assert_eq!(first.alpha(13, 5), Some(0));
}

#[test]
fn test_opaque_top_hides_bottom() {
    let red = PixelBuffer::from_data(2, 2, PixelFormat::Rgba8888, [255, 0, 0, 255].repeat(4)).unwrap();
    let blue = PixelBuffer::from_data(2, 2, PixelFormat::Rgba8888, [0, 0, 255, 255].repeat(4)).unwrap();
    let result = combine_image_buffer(red.clone(), blue);
    assert_eq!(result, red);
}

#[test]
fn test_texture_layers_and_tiles() {
    let mut model = with_background();
    model.style.strikethrough_enabled = true;
    let mut typesetter = Typesetter::new(model, Arc::new(BoxFonts)).unwrap();
    let layers = render_texture_layers(
        &mut typesetter,
        Vector2::new(40.0, 20.0),
        TextDirection::LeftToRight,
        false,
    );
    assert_eq!(layers.text.format(), PixelFormat::L8);
    assert!(layers.style.is_some());
    assert!(layers.overlay.is_some());
    assert!(layers.mask.is_none());

    let tiles = layers.tiles(8);
    let names: Vec<&str> = tiles.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, vec!["text", "style", "overlay"]);
    let offsets: Vec<u32> = tiles[0].1.iter().map(|t| t.offset_y).collect();
    assert_eq!(offsets, vec![0, 8, 16]);
}
