//! Outline to coverage mask
//!
//! Outlines arrive in pixel units with y pointing up. The mask is placed so
//! that its top-left pixel sits at the glyph's bearing, then grown by the
//! outline width on every side. Synthetic styles only ever grow the mask to
//! the right and downwards so the bearing stays put.

use kurbo::{BezPath, PathEl, Rect};
use tiny_skia::{FillRule, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};
use typeset_core::GlyphBitmap;

/// Horizontal shear of synthetic italics, about 12 degrees
pub const ITALIC_SKEW: f32 = 0.2126;

/// Stroke added around synthetic bold outlines, relative to the pixel size
pub const BOLD_STRENGTH: f32 = 1.0 / 24.0;

/// Which synthetic styles to apply while rasterizing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Synthesis {
    pub italic: bool,
    /// Stroke width in pixels; zero for regular weight
    pub embolden: f32,
    pub outline_width: u32,
}

/// Whole-pixel box around an outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelBox {
    /// Left edge, floored
    pub left: f64,
    /// Top edge above the baseline, ceiled
    pub top: f64,
    pub width: u32,
    pub height: u32,
}

impl PixelBox {
    /// `None` for empty or degenerate outlines (spaces, broken glyphs)
    pub fn of(bounds: Rect) -> Option<Self> {
        if [bounds.x0, bounds.y0, bounds.x1, bounds.y1]
            .iter()
            .any(|v| !v.is_finite())
        {
            return None;
        }
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return None;
        }
        let left = bounds.x0.floor();
        let top = bounds.y1.ceil();
        Some(Self {
            left,
            top,
            width: (bounds.x1.ceil() - left) as u32,
            height: (top - bounds.y0.floor()) as u32,
        })
    }
}

/// Fill (and stroke) `path` into an `L8` mask
pub fn rasterize(path: &BezPath, pixel_box: PixelBox, synthesis: Synthesis) -> Option<GlyphBitmap> {
    let outline = synthesis.outline_width;
    let skew = if synthesis.italic { ITALIC_SKEW } else { 0.0 };
    let overhang = (pixel_box.top as f32 * skew).ceil().max(0.0) as u32;
    let bold = (synthesis.embolden * 0.5).ceil() as u32;

    let width = pixel_box.width + 2 * outline + overhang + bold;
    let height = pixel_box.height + 2 * outline + bold;
    let path = skia_path(path)?;
    let mut pixmap = Pixmap::new(width, height)?;

    // flip y, shear for italics, move the box corner to the mask origin
    let ow = outline as f32;
    let transform = Transform::from_row(
        1.0,
        0.0,
        skew,
        -1.0,
        ow - pixel_box.left as f32,
        pixel_box.top as f32 + ow,
    );
    let paint = Paint {
        anti_alias: true,
        ..Paint::default()
    };
    pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);

    let stroke_width = 2.0 * ow + synthesis.embolden;
    if stroke_width > 0.0 {
        let stroke = Stroke {
            width: stroke_width,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, transform, None);
    }

    let alpha = pixmap.data().chunks_exact(4).map(|px| px[3]).collect();
    Some(GlyphBitmap::mask(width, height, alpha))
}

fn skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for element in path.elements() {
        match *element {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(ctrl, end) => {
                builder.quad_to(ctrl.x as f32, ctrl.y as f32, end.x as f32, end.y as f32)
            },
            PathEl::CurveTo(c1, c2, end) => builder.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                end.x as f32,
                end.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

/// Receives skrifa's drawing commands into a kurbo path
pub(crate) struct PathPen<'a> {
    pub(crate) path: &'a mut BezPath,
}

impl skrifa::outline::OutlinePen for PathPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to((x as f64, y as f64));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to((x as f64, y as f64));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.path
            .quad_to((cx0 as f64, cy0 as f64), (x as f64, y as f64));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.path.curve_to(
            (cx0 as f64, cy0 as f64),
            (cx1 as f64, cy1 as f64),
            (x as f64, y as f64),
        );
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}
