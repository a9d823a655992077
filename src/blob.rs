//! Blobs: point sources drifting on closed-form orbits around the grid center.

use crate::config::FieldConfig;
use rand::Rng;
use std::f32::consts::TAU;

/// A moving point source. Position and radius are recomputed from the clock
/// every tick; only `speed`, `offset` and `base_radius` are fixed. A pinned
/// blob ignores the clock entirely.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blob {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    speed: f32,
    offset: f32,
    base_radius: f32,
    pinned: bool,
}

impl Blob {
    pub fn new(speed: f32, offset: f32, base_radius: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            radius: base_radius,
            speed,
            offset,
            base_radius,
            pinned: false,
        }
    }

    pub fn random<R: Rng>(rng: &mut R, cfg: &FieldConfig) -> Self {
        let speed = rng.gen_range(cfg.speed_min..cfg.speed_max);
        let offset = rng.gen_range(0.0..TAU);
        let base_radius = rng.gen_range(cfg.base_radius_min..cfg.base_radius_max);
        Self::new(speed, offset, base_radius)
    }

    /// A blob fixed at `(x, y)` with a constant radius. `update` leaves it alone.
    pub fn at(x: f32, y: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            radius,
            speed: 0.0,
            offset: 0.0,
            base_radius: radius,
            pinned: true,
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn base_radius(&self) -> f32 {
        self.base_radius
    }

    /// Phases are evaluated in f64 so long runs keep their resolution.
    pub fn update(&mut self, time: f64, cfg: &FieldConfig) {
        if self.pinned {
            return;
        }
        let (cx, cy) = cfg.center();
        let w = cfg.width as f32;
        let h = cfg.height as f32;
        let (ax, ax2) = (w * cfg.amplitude_frac, w * cfg.wobble_frac);
        let (ay, ay2) = (h * cfg.amplitude_frac, h * cfg.wobble_frac);
        let s = self.speed as f64;
        let off = self.offset as f64;

        self.x = cx
            + (time * s + off).sin() as f32 * ax
            + (time * 0.2 * s).cos() as f32 * ax2;
        self.y = cy
            + (time * s * 0.8 + off).cos() as f32 * ay
            + (time * 0.3 * s).sin() as f32 * ay2;
        self.radius = self.base_radius + cfg.radius_amplitude * (3.0 * time + off).sin() as f32;
    }
}

pub fn spawn_blobs<R: Rng>(rng: &mut R, cfg: &FieldConfig) -> Vec<Blob> {
    (0..cfg.blob_count).map(|_| Blob::random(rng, cfg)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn random_params_stay_in_range() {
        let cfg = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        for b in spawn_blobs(&mut rng, &cfg) {
            assert!((cfg.speed_min..cfg.speed_max).contains(&b.speed()));
            assert!((0.0..TAU).contains(&b.offset()));
            assert!((cfg.base_radius_min..cfg.base_radius_max).contains(&b.base_radius()));
        }
    }

    #[test]
    fn update_at_time_zero() {
        let cfg = FieldConfig::default();
        let mut b = Blob::new(1.0, 0.0, 8.0);
        b.update(0.0, &cfg);
        // sin(0)=0, cos(0)=1
        assert!((b.x - (80.0 + 0.05 * 160.0)).abs() < 1e-4);
        assert!((b.y - (28.0 + 0.35 * 56.0)).abs() < 1e-4);
        assert!((b.radius - 8.0).abs() < 1e-6);
    }

    #[test]
    fn update_is_pure_in_time() {
        let cfg = FieldConfig::default();
        let mut a = Blob::new(1.2, 0.4, 7.0);
        let mut b = a;
        a.update(1.0, &cfg);
        a.update(3.5, &cfg);
        b.update(3.5, &cfg);
        assert_eq!(a, b);
    }

    #[test]
    fn pinned_blob_ignores_clock() {
        let cfg = FieldConfig::default();
        let mut b = Blob::at(80.0, 28.0, 10.0);
        assert!(b.is_pinned());
        b.update(0.0, &cfg);
        b.update(123.4, &cfg);
        assert_eq!((b.x, b.y, b.radius), (80.0, 28.0, 10.0));
        assert!(!Blob::new(1.0, 0.0, 8.0).is_pinned());
    }

    #[test]
    fn radius_stays_positive() {
        let cfg = FieldConfig::default();
        let mut b = Blob::new(1.0, 1.0, cfg.base_radius_min);
        let mut t = 0.0;
        while t < 20.0 {
            b.update(t, &cfg);
            assert!(b.radius > 0.0);
            t += 0.05;
        }
    }
}
