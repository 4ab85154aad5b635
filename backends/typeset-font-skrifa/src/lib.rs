//! skrifa font client - real fonts for the typesetter
//!
//! Loads TrueType/OpenType fonts (and faces of collections), answers metric
//! and glyph questions through skrifa and rasterizes outlines with
//! tiny-skia into coverage masks.
//!
//! ## Synthetic styles
//!
//! Fonts are loaded one face at a time, so bold and italic requests are
//! synthesized: italics shear the outline, bold strokes it. Outline
//! bitmaps stroke the glyph with twice the outline width, which grows the
//! mask by the outline width on every side.
//!
//! ## Caching
//!
//! Rasterized glyphs go into an LRU cache shared by all threads. Its size
//! comes from [`SkrifaFontClient::with_cache_capacity`] or the
//! `TYPESET_GLYPH_CACHE` environment variable.

use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;

use kurbo::{BezPath, Shape};
use read_fonts::FileRef;
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::DrawSettings;
use skrifa::{GlyphId, MetadataProvider};
use typeset_core::error::{FontLoadError, Result};
use typeset_core::{FontClient, FontId, FontMetrics, GlyphBitmap, GlyphInfo};

mod cache;
pub mod raster;

pub use cache::{capacity_from, DEFAULT_GLYPH_CACHE_CAPACITY, GLYPH_CACHE_ENV};
use cache::{BitmapKey, GlyphCache};
use raster::{rasterize, PathPen, PixelBox, Synthesis, BOLD_STRENGTH};

/// One face of a font file at a pixel size
struct LoadedFont {
    data: Vec<u8>,
    face_index: u32,
    size: f32,
}

impl LoadedFont {
    fn font_ref(&self) -> Option<skrifa::FontRef<'_>> {
        skrifa::FontRef::from_index(&self.data, self.face_index).ok()
    }

    /// Unhinted outline in pixels, y up
    fn outline(&self, glyph_index: u32) -> Option<BezPath> {
        let font = self.font_ref()?;
        let glyph = font.outline_glyphs().get(GlyphId::new(glyph_index))?;
        let mut path = BezPath::new();
        let settings = DrawSettings::unhinted(Size::new(self.size), LocationRef::default());
        if let Err(err) = glyph.draw(settings, &mut PathPen { path: &mut path }) {
            log::warn!("glyph {} has a broken outline: {:?}", glyph_index, err);
            return None;
        }
        Some(path)
    }
}

/// [`FontClient`] backed by skrifa outlines
///
/// Font ids are handed out from 1 in load order.
pub struct SkrifaFontClient {
    fonts: Vec<LoadedFont>,
    cache: GlyphCache,
}

impl SkrifaFontClient {
    /// Client with the cache size taken from `TYPESET_GLYPH_CACHE`
    pub fn new() -> Self {
        let configured = std::env::var(GLYPH_CACHE_ENV).ok();
        Self::with_cache_capacity(capacity_from(configured.as_deref()))
    }

    pub fn with_cache_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            fonts: Vec::new(),
            cache: GlyphCache::new(capacity),
        }
    }

    /// Load face `face_index` of the file at `path`, rendered at `size` pixels
    pub fn load_font_file(
        &mut self,
        path: impl AsRef<Path>,
        size: f32,
        face_index: u32,
    ) -> Result<FontId> {
        let path = path.as_ref();
        let data = fs::read(path)
            .map_err(|_| FontLoadError::FileNotFound(path.display().to_string()))?;
        log::debug!("loading {} (face {}) at {}px", path.display(), face_index, size);
        self.add_font_data(data, size, face_index)
    }

    /// Add a font from memory
    pub fn add_font_data(&mut self, data: Vec<u8>, size: f32, face_index: u32) -> Result<FontId> {
        match FileRef::new(&data).map_err(|_| FontLoadError::InvalidData)? {
            FileRef::Font(_) if face_index > 0 => {
                return Err(FontLoadError::FaceIndexOutOfRange {
                    index: face_index,
                    count: 1,
                }
                .into())
            },
            FileRef::Collection(collection) if face_index >= collection.len() => {
                return Err(FontLoadError::FaceIndexOutOfRange {
                    index: face_index,
                    count: collection.len(),
                }
                .into())
            },
            _ => {},
        }
        if skrifa::FontRef::from_index(&data, face_index).is_err() {
            return Err(FontLoadError::InvalidData.into());
        }

        self.fonts.push(LoadedFont {
            data,
            face_index,
            size: size.max(1.0),
        });
        Ok(self.fonts.len() as FontId)
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    /// Pixel size of a loaded font
    pub fn font_size(&self, font_id: FontId) -> Option<f32> {
        self.font(font_id).map(|font| font.size)
    }

    /// Rasterized glyphs currently cached
    pub fn cached_glyphs(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_capacity(&self) -> usize {
        self.cache.capacity()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn font(&self, font_id: FontId) -> Option<&LoadedFont> {
        let index = usize::try_from(font_id).ok()?.checked_sub(1)?;
        self.fonts.get(index)
    }

    fn render_bitmap(&self, key: BitmapKey) -> Option<GlyphBitmap> {
        let font = self.font(key.font_id)?;
        let path = font.outline(key.glyph_index)?;
        let pixel_box = PixelBox::of(path.bounding_box())?;
        let synthesis = Synthesis {
            italic: key.italic,
            embolden: if key.bold {
                (font.size * BOLD_STRENGTH).max(1.0)
            } else {
                0.0
            },
            outline_width: key.outline_width,
        };
        let bitmap = rasterize(&path, pixel_box, synthesis);
        log::trace!(
            "rasterized glyph {} of font {}: {:?}",
            key.glyph_index,
            key.font_id,
            bitmap.as_ref().map(|b| (b.width, b.height))
        );
        bitmap
    }
}

impl Default for SkrifaFontClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FontClient for SkrifaFontClient {
    fn name(&self) -> &'static str {
        "skrifa"
    }

    fn font_metrics(&self, font_id: FontId) -> FontMetrics {
        let Some(font) = self.font(font_id) else {
            log::warn!("no metrics for unknown font {}", font_id);
            return FontMetrics::default();
        };
        let Some(font_ref) = font.font_ref() else {
            return FontMetrics::default();
        };
        let metrics = font_ref.metrics(Size::new(font.size), LocationRef::default());
        let (underline_position, underline_thickness) = metrics
            .underline
            .map(|d| (d.offset, d.thickness))
            .unwrap_or((-font.size * 0.1, (font.size * 0.05).max(1.0)));
        FontMetrics {
            ascender: metrics.ascent,
            descender: metrics.descent,
            height: metrics.ascent - metrics.descent,
            underline_position,
            underline_thickness,
        }
    }

    fn create_bitmap(
        &self,
        font_id: FontId,
        glyph_index: u32,
        is_italic_required: bool,
        is_bold_required: bool,
        outline_width: u32,
    ) -> Option<GlyphBitmap> {
        let key = BitmapKey {
            font_id,
            glyph_index,
            italic: is_italic_required,
            bold: is_bold_required,
            outline_width,
        };
        self.cache.get_or_insert_with(key, || self.render_bitmap(key))
    }

    fn glyph_info(&self, font_id: FontId, character: char) -> Option<GlyphInfo> {
        let font = self.font(font_id)?;
        let font_ref = font.font_ref()?;
        let Some(glyph_id) = font_ref.charmap().map(character) else {
            log::warn!("font {} has no glyph for {:?}", font_id, character);
            return None;
        };
        let advance = font_ref
            .glyph_metrics(Size::new(font.size), LocationRef::default())
            .advance_width(glyph_id)
            .unwrap_or(0.0);

        let index = glyph_id.to_u32();
        let mut info = GlyphInfo {
            font_id,
            index,
            advance,
            ..GlyphInfo::default()
        };
        if let Some(pixel_box) = font
            .outline(index)
            .and_then(|path| PixelBox::of(path.bounding_box()))
        {
            info.x_bearing = pixel_box.left as f32;
            info.y_bearing = pixel_box.top as f32;
            info.width = pixel_box.width as f32;
            info.height = pixel_box.height as f32;
        }
        Some(info)
    }
}
