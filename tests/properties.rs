use blobfield::field::{field_sum, normalize};
use blobfield::{Blob, FieldAnimator, FieldConfig, GlyphRamp};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

proptest! {
    #[test]
    fn glyph_index_never_decreases_with_field(a in 0.0f32..200.0, b in 0.0f32..200.0) {
        let cfg = FieldConfig::default();
        let ramp = GlyphRamp::new(&cfg.ramp).unwrap();
        let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
        prop_assert!(ramp.index_for(normalize(hi, &cfg)) >= ramp.index_for(normalize(lo, &cfg)));
    }

    #[test]
    fn normalized_field_is_unit_interval(sum in -1.0f32..1.0e6) {
        let cfg = FieldConfig::default();
        let n = normalize(sum, &cfg);
        prop_assert!((0.0..=1.0).contains(&n));
    }

    #[test]
    fn blobs_stay_on_grid(
        seed in any::<u64>(),
        width in 8u16..320,
        height in 4u16..120,
        time in 0.0f64..5000.0,
    ) {
        let cfg = FieldConfig { width, height, ..FieldConfig::default() };
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..cfg.blob_count {
            let mut b = Blob::random(&mut rng, &cfg);
            b.update(time, &cfg);
            prop_assert!(b.x >= 0.0 && b.x < width as f32, "x={} w={}", b.x, width);
            prop_assert!(b.y >= 0.0 && b.y < height as f32, "y={} h={}", b.y, height);
            prop_assert!(b.radius > 0.0);
        }
    }

    #[test]
    fn field_is_non_negative(
        seed in any::<u64>(),
        x in 0.0f32..160.0,
        y in 0.0f32..56.0,
        time in 0.0f64..100.0,
    ) {
        let cfg = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let blobs: Vec<Blob> = (0..cfg.blob_count)
            .map(|_| {
                let mut b = Blob::random(&mut rng, &cfg);
                b.update(time, &cfg);
                b
            })
            .collect();
        prop_assert!(field_sum(&blobs, x, y, &cfg) >= 0.0);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn ticks_are_reproducible(seed in any::<u64>(), steps in 1usize..20) {
        let cfg = FieldConfig { width: 32, height: 12, blob_count: 3, ..FieldConfig::default() };
        let mut a = FieldAnimator::seeded(cfg.clone(), seed).unwrap();
        let mut b = FieldAnimator::seeded(cfg, seed).unwrap();
        for _ in 0..steps {
            a.tick();
            b.tick();
        }
        prop_assert_eq!(a.grid(), b.grid());
        prop_assert_eq!(a.blobs(), b.blobs());
    }
}
