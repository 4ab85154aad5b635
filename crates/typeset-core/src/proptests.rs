use super::style::*;
use super::*;
use proptest::prelude::*;

/// Sorted, gap-separated runs built from (gap, length) pairs
fn partitioned_runs(spans: &[(u32, u32)]) -> Vec<UnderlinedGlyphRun> {
    let mut start = 0;
    spans
        .iter()
        .map(|&(gap, len)| {
            start += gap;
            let run = GlyphStyleRun {
                glyph_run: GlyphRun::new(start, len),
                properties: UnderlineStyleProperties::default(),
            };
            start += len;
            run
        })
        .collect()
}

// Property: the binary-search resolver agrees with a linear scan
proptest! {
    #[test]
    fn prop_find_run_matches_linear_scan(
        spans in prop::collection::vec((0u32..4, 1u32..5), 0..12),
        index in 0u32..80,
    ) {
        let runs = partitioned_runs(&spans);
        let linear = runs.iter().find(|r| r.glyph_run.contains(index));
        prop_assert_eq!(find_glyph_run(&runs, index), linear);
    }
}

// Property: runs built back to back are always accepted as partitioned
proptest! {
    #[test]
    fn prop_generated_runs_are_partitioned(
        spans in prop::collection::vec((0u32..4, 1u32..5), 0..12),
    ) {
        let runs = partitioned_runs(&spans);
        let order = first_unordered_run(
            runs.iter().map(|r| (r.glyph_run.glyph_index, r.glyph_run.number_of_glyphs)),
        );
        prop_assert_eq!(order, None);
    }
}

// Property: a resolved glyph inside a run is always styled
proptest! {
    #[test]
    fn prop_glyphs_inside_runs_are_styled(
        spans in prop::collection::vec((0u32..4, 1u32..5), 1..8),
        enabled in any::<bool>(),
    ) {
        let runs = partitioned_runs(&spans);
        let defaults = UnderlineStyleProperties::model_defaults(
            UnderlineType::Solid, Color::BLACK, 1.0, 1.0, 2.0,
        );
        for run in &runs {
            for index in run.glyph_run.glyph_index..run.glyph_run.end() {
                prop_assert!(resolve_underline(index, enabled, &runs, &defaults).styled);
            }
        }
    }
}

// Property: offsets never point outside the buffer
proptest! {
    #[test]
    fn prop_pixel_offsets_stay_in_bounds(
        width in 0u32..16,
        height in 0u32..16,
        x in -32i64..32,
        y in -32i64..32,
    ) {
        let buffer = PixelBuffer::new(width, height, PixelFormat::Rgba8888);
        if let Some(offset) = buffer.offset(x, y) {
            prop_assert!(offset + 4 <= buffer.data().len());
        }
    }
}
