//! Metaball field rendered as ASCII.
//!
//! A [`FieldAnimator`](animator::FieldAnimator) owns a fixed glyph grid and a
//! fixed set of blobs drifting on closed-form paths. Every tick it sums the
//! metaball kernel of all blobs at each cell, maps the result onto a glyph
//! ramp and hands the serialized frame to a [`RenderTarget`](render::RenderTarget).

pub mod animator;
pub mod app;
pub mod blob;
pub mod config;
pub mod field;
pub mod grid;
pub mod input;
pub mod render;
pub mod scheduler;
pub mod title;

pub use animator::{AnimatorState, FieldAnimator};
pub use blob::Blob;
pub use config::FieldConfig;
pub use field::GlyphRamp;
pub use grid::Grid;
pub use render::RenderTarget;
pub use scheduler::{FrameHost, FrameToken};
