//! Dot Pop - a falling-dot clicker arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, hit-testing, scoring)
//! - `render`: Canvas 2D drawing (wasm only)
//! - `settings`: User preferences persisted to LocalStorage

pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod render;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Dot radius range (pixels)
    pub const MIN_DOT_RADIUS: i32 = 5;
    pub const MAX_DOT_RADIUS: i32 = 50;

    /// Fall-speed slider range (pixels, nominal)
    pub const MIN_VELOCITY: i32 = 10;
    pub const MAX_VELOCITY: i32 = 100;
    pub const DEFAULT_VELOCITY: i32 = 10;

    /// One new dot per second while the game is running
    pub const SPAWN_INTERVAL_MS: i32 = 1000;

    /// The per-tick fall increment `(velocity / 10) * VELOCITY_FRAME_FACTOR`
    /// is calibrated against a 60 fps display; drivers running at other rates
    /// bank fractional reference ticks via `GameState::frame_scale` and step
    /// whole ticks as they accrue.
    pub const REFERENCE_FRAME_RATE: f32 = 60.0;
    pub const VELOCITY_FRAME_FACTOR: f32 = 0.5;

    /// Clicks land with a 10% generous margin around the dot edge
    pub const HIT_MARGIN: f32 = 1.1;

    /// Number of point ranks in the score table (points 1..=10)
    pub const SCORE_RANKS: i32 = 10;

    /// Pop-particle tuning
    pub const PARTICLE_MIN_RADIUS: f32 = 5.0;
    pub const PARTICLE_MAX_RADIUS: f32 = 10.0;
    pub const PARTICLE_MIN_LIFE: i32 = 30;
    pub const PARTICLE_MAX_LIFE: i32 = 40;
    pub const PARTICLE_SHRINK_PER_FRAME: f32 = 0.25;
    pub const PARTICLE_MAX_SPEED: f32 = 5.0;
    /// One particle per tile-cell index divisible by this (controls burst density)
    pub const PARTICLE_DECIMATION: u32 = 17;
    /// The whole burst batch is cleared this long after its newest particle
    pub const PARTICLE_BATCH_WINDOW_MS: f64 = 1000.0;
}

/// Round with ties toward +∞, like JavaScript's `Math.round`.
///
/// The motion rule re-rounds y every frame; `f32::round` breaks ties away from
/// zero and would pin a dot at y = -9.5 forever, this variant keeps it falling.
#[inline]
pub fn round_half_up(v: f32) -> f32 {
    (v + 0.5).floor()
}
