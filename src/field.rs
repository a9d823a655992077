//! Metaball field evaluation and the intensity-to-glyph lookup.

use crate::blob::Blob;
use crate::config::FieldConfig;
use anyhow::{ensure, Result};

/// One blob's kernel term at cell `(x, y)`. Never negative.
#[inline]
pub fn contribution(b: &Blob, x: f32, y: f32, cfg: &FieldConfig) -> f32 {
    let dx = x - b.x;
    let dy = (y - b.y) * cfg.aspect;
    (b.radius * b.radius * cfg.kernel_gain) / (dx * dx + dy * dy + cfg.epsilon)
}

pub fn field_sum(blobs: &[Blob], x: f32, y: f32, cfg: &FieldConfig) -> f32 {
    blobs.iter().map(|b| contribution(b, x, y, cfg)).sum()
}

/// Soft iso-surface: 0 below `threshold`, ramps to 1 at `gain` slope.
#[inline]
pub fn normalize(sum: f32, cfg: &FieldConfig) -> f32 {
    ((sum - cfg.threshold) * cfg.gain).clamp(0.0, 1.0)
}

/// Characters ordered from sparse to dense.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphRamp {
    glyphs: Vec<char>,
}

impl GlyphRamp {
    pub fn new(ramp: &str) -> Result<Self> {
        let glyphs: Vec<char> = ramp.chars().collect();
        ensure!(!glyphs.is_empty(), "glyph ramp is empty");
        ensure!(
            !glyphs.iter().any(|&c| c == '\n' || c == '\r'),
            "glyph ramp must not contain line breaks"
        );
        Ok(Self { glyphs })
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn sparsest(&self) -> char {
        self.glyphs[0]
    }

    pub fn densest(&self) -> char {
        self.glyphs[self.glyphs.len() - 1]
    }

    pub fn index_for(&self, norm: f32) -> usize {
        let top = self.glyphs.len() - 1;
        // NaN clamps to 0 via the `as` cast
        let i = (norm.clamp(0.0, 1.0) * top as f32).floor() as usize;
        i.min(top)
    }

    pub fn glyph_for(&self, norm: f32) -> char {
        self.glyphs[self.index_for(norm)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_at_center_is_bounded_by_epsilon() {
        let cfg = FieldConfig::default();
        let b = Blob::at(10.0, 10.0, 4.0);
        let v = contribution(&b, 10.0, 10.0, &cfg);
        assert!((v - 16.0 * 2.5 / 8.0).abs() < 1e-6);
    }

    #[test]
    fn vertical_distance_counts_more() {
        let cfg = FieldConfig::default();
        let b = Blob::at(50.0, 20.0, 6.0);
        let across = contribution(&b, 55.0, 20.0, &cfg);
        let down = contribution(&b, 50.0, 25.0, &cfg);
        assert!(down < across);
    }

    #[test]
    fn contributions_add() {
        let cfg = FieldConfig::default();
        let a = Blob::at(10.0, 10.0, 5.0);
        let b = Blob::at(30.0, 12.0, 7.0);
        let sum = field_sum(&[a, b], 20.0, 11.0, &cfg);
        let parts = contribution(&a, 20.0, 11.0, &cfg) + contribution(&b, 20.0, 11.0, &cfg);
        assert!((sum - parts).abs() < 1e-6);
        assert_eq!(field_sum(&[], 20.0, 11.0, &cfg), 0.0);
    }

    #[test]
    fn normalize_clamps_both_ends() {
        let cfg = FieldConfig::default();
        assert_eq!(normalize(0.0, &cfg), 0.0);
        assert_eq!(normalize(cfg.threshold, &cfg), 0.0);
        assert_eq!(normalize(100.0, &cfg), 1.0);
        let mid = normalize(cfg.threshold + 0.5, &cfg);
        assert!((mid - 0.35).abs() < 1e-6);
    }

    #[test]
    fn ramp_ends() {
        let ramp = GlyphRamp::new(" .:#").unwrap();
        assert_eq!(ramp.index_for(0.0), 0);
        assert_eq!(ramp.index_for(1.0), 3);
        assert_eq!(ramp.index_for(0.5), 1);
        assert_eq!(ramp.glyph_for(1.0), '#');
        assert_eq!(ramp.glyph_for(f32::NAN), ' ');
    }

    #[test]
    fn single_glyph_ramp() {
        let ramp = GlyphRamp::new("@").unwrap();
        assert_eq!(ramp.index_for(0.0), 0);
        assert_eq!(ramp.index_for(1.0), 0);
    }

    #[test]
    fn ramp_rejects_empty_and_newlines() {
        assert!(GlyphRamp::new("").is_err());
        assert!(GlyphRamp::new(" .\r#").is_err());
    }
}
