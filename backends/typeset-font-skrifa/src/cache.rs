//! Bounded cache of rasterized glyphs
//!
//! Bitmaps are requested once per glyph per style layer, so the same key
//! comes back several times within a single render. Misses (glyphs without
//! an outline) are cached too.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use typeset_core::{FontId, GlyphBitmap};

/// Environment variable overriding the default cache capacity
pub const GLYPH_CACHE_ENV: &str = "TYPESET_GLYPH_CACHE";

/// Entries kept when nothing else is configured
pub const DEFAULT_GLYPH_CACHE_CAPACITY: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct BitmapKey {
    pub font_id: FontId,
    pub glyph_index: u32,
    pub italic: bool,
    pub bold: bool,
    pub outline_width: u32,
}

pub(crate) struct GlyphCache {
    entries: Mutex<LruCache<BitmapKey, Option<GlyphBitmap>>>,
}

impl GlyphCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get_or_insert_with(
        &self,
        key: BitmapKey,
        render: impl FnOnce() -> Option<GlyphBitmap>,
    ) -> Option<GlyphBitmap> {
        if let Some(hit) = self.entries.lock().get(&key) {
            return hit.clone();
        }
        // render outside the lock; a racing thread may render the same glyph
        let bitmap = render();
        self.entries.lock().put(key, bitmap.clone());
        bitmap
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

/// Capacity from an environment value, falling back to the default
pub fn capacity_from(value: Option<&str>) -> NonZeroUsize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .and_then(NonZeroUsize::new)
        .or_else(|| NonZeroUsize::new(DEFAULT_GLYPH_CACHE_CAPACITY))
        .unwrap_or(NonZeroUsize::MIN)
}
