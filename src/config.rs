use anyhow::{ensure, Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// Field tuning. These are aesthetic values, kept as-is.
pub const GRID_WIDTH: u16 = 160;
pub const GRID_HEIGHT: u16 = 56;
pub const BLOB_COUNT: usize = 5;
pub const GLYPH_RAMP: &str = " .,:;-~=+*#%@";
pub const TIME_STEP: f64 = 0.005;
pub const KERNEL_GAIN: f32 = 2.5;
pub const KERNEL_EPSILON: f32 = 8.0;
pub const CELL_ASPECT: f32 = 2.2;
pub const ISO_THRESHOLD: f32 = 0.95;
pub const FALLOFF_GAIN: f32 = 0.7;
pub const AMPLITUDE_FRAC: f32 = 0.35;
pub const WOBBLE_FRAC: f32 = 0.05;
pub const RADIUS_AMPLITUDE: f32 = 1.5;

pub const FPS_CAP: u32 = 60;
pub const TITLE_INTERVAL_MS: u64 = 2500;

/// Everything the animator needs, fixed once the animator is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub width: u16,
    pub height: u16,
    pub blob_count: usize,
    pub ramp: String,
    /// Clock advance per tick.
    pub dt: f64,
    pub kernel_gain: f32,
    pub epsilon: f32,
    /// Vertical distance scale; terminal cells are taller than wide.
    pub aspect: f32,
    pub threshold: f32,
    pub gain: f32,
    /// Primary orbit amplitude as a fraction of the grid size.
    pub amplitude_frac: f32,
    /// Secondary wobble amplitude as a fraction of the grid size.
    pub wobble_frac: f32,
    pub radius_amplitude: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub base_radius_min: f32,
    pub base_radius_max: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            blob_count: BLOB_COUNT,
            ramp: GLYPH_RAMP.to_string(),
            dt: TIME_STEP,
            kernel_gain: KERNEL_GAIN,
            epsilon: KERNEL_EPSILON,
            aspect: CELL_ASPECT,
            threshold: ISO_THRESHOLD,
            gain: FALLOFF_GAIN,
            amplitude_frac: AMPLITUDE_FRAC,
            wobble_frac: WOBBLE_FRAC,
            radius_amplitude: RADIUS_AMPLITUDE,
            speed_min: 0.5,
            speed_max: 1.5,
            base_radius_min: 6.0,
            base_radius_max: 11.0,
        }
    }
}

impl FieldConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.width > 0 && self.height > 0,
            "grid must be at least 1x1 (got {}x{})",
            self.width,
            self.height
        );
        ensure!(self.blob_count > 0, "need at least one blob");
        ensure!(!self.ramp.is_empty(), "glyph ramp is empty");
        ensure!(
            !self.ramp.contains(|c| c == '\n' || c == '\r'),
            "glyph ramp must not contain line breaks"
        );
        ensure!(
            self.dt.is_finite() && self.dt > 0.0,
            "time step must be positive (got {})",
            self.dt
        );
        ensure!(self.epsilon > 0.0, "epsilon must be positive (got {})", self.epsilon);
        for (name, v) in [
            ("kernel_gain", self.kernel_gain),
            ("gain", self.gain),
            ("aspect", self.aspect),
        ] {
            ensure!(v.is_finite() && v > 0.0, "{name} must be finite and positive (got {v})");
        }
        ensure!(
            self.threshold.is_finite(),
            "threshold must be finite (got {})",
            self.threshold
        );
        ensure!(
            self.amplitude_frac >= 0.0
                && self.wobble_frac >= 0.0
                && self.amplitude_frac + self.wobble_frac < 0.5,
            "amplitude fractions must be non-negative and sum below 0.5 (got {} + {})",
            self.amplitude_frac,
            self.wobble_frac
        );
        ensure!(
            self.speed_min < self.speed_max,
            "speed range is empty ({}..{})",
            self.speed_min,
            self.speed_max
        );
        ensure!(
            self.base_radius_min < self.base_radius_max,
            "base radius range is empty ({}..{})",
            self.base_radius_min,
            self.base_radius_max
        );
        ensure!(
            self.base_radius_min - self.radius_amplitude.abs() > 0.0,
            "radius may reach zero: min base {} with amplitude {}",
            self.base_radius_min,
            self.radius_amplitude
        );
        Ok(())
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fps_cap: u32,
    /// Fixed seed; `None` seeds from the clock on every launch.
    pub seed: Option<u64>,
    pub show_title: bool,
    pub titles: Vec<String>,
    pub title_interval_ms: u64,
    pub field: FieldConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps_cap: FPS_CAP,
            seed: None,
            show_title: true,
            titles: vec![
                "systems programmer".to_string(),
                "gpu kernel tinkerer".to_string(),
                "occasional writer".to_string(),
            ],
            title_interval_ms: TITLE_INTERVAL_MS,
            field: FieldConfig::default(),
        }
    }
}

#[derive(Parser, Debug, Default)]
#[command(name = "blobfield", about = "Metaball ASCII field in your terminal")]
pub struct Args {
    /// grid columns
    #[arg(long)]
    pub width: Option<u16>,

    /// grid rows
    #[arg(long)]
    pub height: Option<u16>,

    /// number of blobs
    #[arg(long)]
    pub blobs: Option<usize>,

    /// glyph ramp, sparse to dense
    #[arg(long)]
    pub ramp: Option<String>,

    /// rng seed (same seed = same animation)
    #[arg(long)]
    pub seed: Option<u64>,

    /// frames per second cap
    #[arg(long)]
    pub fps: Option<u32>,

    /// print frames to stdout instead of drawing in the alternate screen
    #[arg(long, default_value_t = false)]
    pub headless: bool,

    /// stop after N frames (headless defaults to 1)
    #[arg(long)]
    pub frames: Option<u64>,

    /// hide the rotating title line
    #[arg(long, default_value_t = false)]
    pub no_title: bool,

    /// settings file to read instead of the default location
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// write the effective settings back to the settings file
    #[arg(long, default_value_t = false)]
    pub save_settings: bool,
}

impl Args {
    /// CLI flags win over the settings file.
    pub fn apply(&self, s: &mut Settings) {
        if let Some(w) = self.width {
            s.field.width = w;
        }
        if let Some(h) = self.height {
            s.field.height = h;
        }
        if let Some(n) = self.blobs {
            s.field.blob_count = n;
        }
        if let Some(r) = &self.ramp {
            s.field.ramp = r.clone();
        }
        if self.seed.is_some() {
            s.seed = self.seed;
        }
        if let Some(fps) = self.fps {
            s.fps_cap = fps;
        }
        if self.no_title {
            s.show_title = false;
        }
    }
}

pub fn default_settings_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from("com", "blobfield", "Blobfield")
        .context("could not resolve project directories")?;
    let dir = proj.config_dir().to_path_buf();
    Ok(dir.join("settings.json"))
}

pub fn load_settings(path: &Path) -> Settings {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => {
            log::debug!("no settings at {}, using defaults", path.display());
            return Settings::default();
        }
    };
    match serde_json::from_str::<Settings>(&raw) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("ignoring malformed settings {}: {e}", path.display());
            Settings::default()
        }
    }
}

pub fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating settings dir {}", dir.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    if path.exists() {
        let _ = fs::remove_file(path);
    }
    fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    log::info!("settings saved to {}", path.display());
    Ok(())
}
