//! Property tests: pixel writes stay in bounds, compositing never loses ink

use std::sync::Arc;

use proptest::prelude::*;
use typeset_core::{GlyphBitmap, PixelBuffer, PixelFormat, Vector2};

use crate::glyph::{typeset_glyph, GlyphData};
use crate::test_util::{row_model, BoxFonts};
use crate::{combine_image_buffer, RenderBehaviour, Typesetter, TypesetStyle};

fn rgba_buffer(width: u32, height: u32) -> impl Strategy<Value = PixelBuffer> {
    prop::collection::vec(any::<u8>(), (width * height * 4) as usize).prop_map(move |data| {
        // keep the data premultiplied: no channel above alpha
        let data: Vec<u8> = data
            .chunks_exact(4)
            .flat_map(|p| [p[0].min(p[3]), p[1].min(p[3]), p[2].min(p[3]), p[3]])
            .collect();
        PixelBuffer::from_data(width, height, PixelFormat::Rgba8888, data).unwrap_or_default()
    })
}

proptest! {
    #[test]
    fn prop_glyph_writes_are_clipped(
        x in -100.0f32..100.0,
        y in -100.0f32..100.0,
        w in 0u32..40,
        h in 0u32..40,
        h_offset in -50i32..50,
        v_offset in -50i32..50,
    ) {
        let mut data = GlyphData::new(PixelBuffer::new(16, 12, PixelFormat::Rgba8888));
        data.horizontal_offset = h_offset;
        data.vertical_offset = v_offset;
        let bitmap = GlyphBitmap::mask(w, h, vec![255; (w * h) as usize]);
        typeset_glyph(&mut data, &bitmap, Vector2::new(x, y), typeset_core::Color::WHITE, TypesetStyle::None);
        prop_assert_eq!(data.buffer.data().len(), 16 * 12 * 4);
    }

    #[test]
    fn prop_render_any_placement_keeps_size(
        dx in -200.0f32..200.0,
        dy in -200.0f32..200.0,
        count in 0u32..8,
        width in 1u32..40,
        height in 1u32..30,
    ) {
        let mut model = row_model(count, 6.0);
        for position in &mut model.positions {
            position.x += dx;
            position.y += dy;
        }
        model.style.underline_enabled = true;
        model.style.background_enabled = true;
        model.style.outline_width = 2;
        model.style.shadow_offset = Vector2::new(1.0, 1.0);
        let mut typesetter = Typesetter::new(model, Arc::new(BoxFonts)).unwrap();
        let image = typesetter.render(
            Vector2::new(width as f32, height as f32),
            typeset_core::TextDirection::LeftToRight,
            RenderBehaviour::TextAndStyles,
            false,
            PixelFormat::Rgba8888,
        );
        prop_assert_eq!((image.width(), image.height()), (width, height));
        prop_assert_eq!(image.data().len(), (width * height * 4) as usize);
    }

    #[test]
    fn prop_over_never_loses_coverage(top in rgba_buffer(3, 3), bottom in rgba_buffer(3, 3)) {
        let result = combine_image_buffer(top.clone(), bottom.clone());
        for y in 0..3 {
            for x in 0..3 {
                let a = result.alpha(x, y).unwrap_or(0);
                prop_assert!(a >= top.alpha(x, y).unwrap_or(0));
                prop_assert!(a >= bottom.alpha(x, y).unwrap_or(0));
            }
        }
    }

    #[test]
    fn prop_transparent_top_is_identity(bottom in rgba_buffer(4, 2)) {
        let top = PixelBuffer::new(4, 2, PixelFormat::Rgba8888);
        prop_assert_eq!(combine_image_buffer(top, bottom.clone()), bottom);
    }
}
