//! The field animator: clock, blobs, glyph grid, and the pending frame token.
//!
//! Each tick advances the clock by a fixed step, moves every blob along its
//! closed-form path, evaluates the metaball field per cell and maps it onto
//! the glyph ramp. The animator never schedules itself; the host hands back
//! the token it issued and a stale token is ignored, so once `stop` returns
//! nothing reaches the render target.

use crate::blob::{spawn_blobs, Blob};
use crate::config::FieldConfig;
use crate::field::{field_sum, normalize, GlyphRamp};
use crate::grid::Grid;
use crate::render::RenderTarget;
use crate::scheduler::{FrameHost, FrameToken};
use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimatorState {
    Stopped,
    Running,
}

pub struct FieldAnimator<R: Rng = StdRng> {
    cfg: FieldConfig,
    ramp: GlyphRamp,
    rng: R,
    time: f64,
    ticks: u64,
    blobs: Vec<Blob>,
    grid: Grid,
    frame: String,
    pending: Option<FrameToken>,
    state: AnimatorState,
    started_once: bool,
}

impl FieldAnimator<StdRng> {
    pub fn seeded(cfg: FieldConfig, seed: u64) -> Result<Self> {
        Self::new(cfg, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> FieldAnimator<R> {
    pub fn new(cfg: FieldConfig, mut rng: R) -> Result<Self> {
        cfg.validate()?;
        let ramp = GlyphRamp::new(&cfg.ramp)?;
        let blobs = spawn_blobs(&mut rng, &cfg);
        let grid = Grid::new(cfg.width, cfg.height, ramp.sparsest());

        let mut a = Self {
            cfg,
            ramp,
            rng,
            time: 0.0,
            ticks: 0,
            blobs,
            grid,
            frame: String::new(),
            pending: None,
            state: AnimatorState::Stopped,
            started_once: false,
        };
        a.place_blobs();
        Ok(a)
    }

    /// Replaces the random blobs with a fixed set. The count must match.
    pub fn with_blobs(mut self, blobs: Vec<Blob>) -> Result<Self> {
        anyhow::ensure!(
            blobs.len() == self.cfg.blob_count,
            "expected {} blobs, got {}",
            self.cfg.blob_count,
            blobs.len()
        );
        self.blobs = blobs;
        self.place_blobs();
        Ok(self)
    }

    pub fn config(&self) -> &FieldConfig {
        &self.cfg
    }

    pub fn ramp(&self) -> &GlyphRamp {
        &self.ramp
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Clock value after `ticks` steps. Derived from the count rather than
    /// accumulated, so the step stays exactly `dt` however long it runs.
    pub fn time_at(&self, ticks: u64) -> f64 {
        ticks as f64 * self.cfg.dt
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Last frame handed to a render target.
    pub fn frame(&self) -> &str {
        &self.frame
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    pub fn pending(&self) -> Option<FrameToken> {
        self.pending
    }

    pub fn start<H: FrameHost>(&mut self, host: &mut H) {
        if self.state == AnimatorState::Running {
            return;
        }
        if self.started_once {
            self.reset();
            log::info!("animator restarted with {} fresh blobs", self.blobs.len());
        } else {
            log::info!(
                "animator started: {}x{} grid, {} blobs",
                self.cfg.width,
                self.cfg.height,
                self.blobs.len()
            );
        }
        self.started_once = true;
        self.state = AnimatorState::Running;
        self.pending = Some(host.request_frame());
    }

    pub fn stop<H: FrameHost>(&mut self, host: &mut H) {
        if let Some(token) = self.pending.take() {
            host.cancel_frame(token);
        }
        if self.state == AnimatorState::Running {
            log::info!("animator stopped after {} ticks", self.ticks);
        }
        self.state = AnimatorState::Stopped;
    }

    /// Host callback. Runs a tick and presents it only when `token` is the
    /// frame this animator is waiting on; returns whether it did.
    pub fn on_frame<H, T>(
        &mut self,
        token: FrameToken,
        host: &mut H,
        target: &mut T,
    ) -> Result<bool>
    where
        H: FrameHost,
        T: RenderTarget + ?Sized,
    {
        if self.state != AnimatorState::Running || self.pending != Some(token) {
            log::trace!("ignoring stale frame {:?}", token);
            return Ok(false);
        }
        self.pending = None;

        self.tick();
        self.grid.write_frame(&mut self.frame);
        target.present(&self.frame)?;

        self.pending = Some(host.request_frame());
        Ok(true)
    }

    /// Advance the clock one step and recompute the whole grid.
    pub fn tick(&mut self) -> &Grid {
        self.ticks += 1;
        self.time = self.time_at(self.ticks);
        self.place_blobs();
        self.render_field();
        &self.grid
    }

    /// Clock back to zero with a freshly drawn set of blobs.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.ticks = 0;
        self.blobs = spawn_blobs(&mut self.rng, &self.cfg);
        self.place_blobs();
    }

    fn place_blobs(&mut self) {
        for b in &mut self.blobs {
            b.update(self.time, &self.cfg);
        }
    }

    fn render_field(&mut self) {
        for y in 0..self.cfg.height {
            for x in 0..self.cfg.width {
                let sum = field_sum(&self.blobs, x as f32, y as f32, &self.cfg);
                let ch = self.ramp.glyph_for(normalize(sum, &self.cfg));
                self.grid.set(x, y, ch);
            }
        }
    }
}
