//! Game state and core simulation types
//!
//! The `GameState` owns every piece of mutable game data (dots, particles,
//! score, flags, RNG); the tick/click/spawn entry points in `tick.rs` mutate
//! it exclusively through `&mut GameState`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rng::random_int_inclusive;
use super::score::ScoreTable;
use crate::consts::*;

/// Whether a dot is still clickable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DotStatus {
    Alive,
    /// Set synchronously on a successful hit; never drawn or hit-tested again
    Popped,
}

/// A falling target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dot {
    /// Unique, monotonically increasing, never reused
    pub id: u32,
    /// Fixed at creation, pixels
    pub radius: i32,
    /// Fixed at spawn (clamped into canvas bounds)
    pub x: f32,
    /// Increases every simulation step while running
    pub y: f32,
    /// The slider setting frozen at spawn time; later slider changes only
    /// affect dots spawned after them
    pub velocity: i32,
    pub status: DotStatus,
    /// Point value from the score table (smaller radius, higher points)
    pub points: i32,
}

impl Dot {
    /// Plain constructor, no validation (callers guarantee ranges).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u32,
        radius: i32,
        y: f32,
        x: f32,
        status: DotStatus,
        points: i32,
        velocity: i32,
    ) -> Self {
        Self {
            id,
            radius,
            x,
            y,
            velocity,
            status,
            points,
        }
    }
}

/// A transient pop-effect particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    /// Set by the caller right after construction (two-phase: particles are
    /// always positioned before they are ever animated)
    pub pos: Vec2,
    /// Fixed random velocity vector, constant for the particle's life
    pub vel: Vec2,
    /// Shrinks each frame; inert once it reaches zero
    pub radius: f32,
    /// Countdown in frames; inert once it reaches zero
    pub remaining_life: i32,
    /// Wall-clock creation time, drives the batch cleanup window
    pub created_ms: f64,
}

impl Particle {
    /// Randomize radius, life and velocity at construction.
    pub fn new(rng: &mut Pcg32, now_ms: f64) -> Self {
        use rand::Rng;
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::new(
                rng.random_range(-PARTICLE_MAX_SPEED..=PARTICLE_MAX_SPEED),
                rng.random_range(-PARTICLE_MAX_SPEED..=PARTICLE_MAX_SPEED),
            ),
            radius: rng.random_range(PARTICLE_MIN_RADIUS..=PARTICLE_MAX_RADIUS),
            remaining_life: random_int_inclusive(
                rng,
                PARTICLE_MIN_LIFE as f32,
                PARTICLE_MAX_LIFE as f32,
            ),
            created_ms: now_ms,
        }
    }

    /// Inert particles are neither drawn nor advanced.
    pub fn is_visible(&self) -> bool {
        self.remaining_life > 0 && self.radius > 0.0
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed, logged at startup for reproducibility
    pub seed: u64,
    /// May go negative in brutal mode
    pub score: i64,
    pub started: bool,
    pub paused: bool,
    /// Subtract points when a live dot exits the bottom
    pub brutal: bool,
    /// Live slider setting; copied into each dot at spawn
    pub velocity: i32,
    /// Canvas size in pixels
    pub width: f32,
    pub height: f32,
    /// Reference ticks earned per display frame (reference-rate /
    /// actual-rate); motion always steps in whole reference ticks
    pub frame_scale: f32,
    /// Fractional reference ticks banked between display frames
    pub(crate) step_accum: f32,
    pub dots: Vec<Dot>,
    pub particles: Vec<Particle>,
    pub(crate) score_table: ScoreTable,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a fresh Idle state for a canvas of the given pixel size.
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        Self {
            seed,
            score: 0,
            started: false,
            paused: false,
            brutal: false,
            velocity: DEFAULT_VELOCITY,
            width,
            height,
            frame_scale: 1.0,
            step_accum: 0.0,
            dots: Vec::new(),
            particles: Vec::new(),
            score_table: ScoreTable::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate the next dot ID.
    pub fn next_dot_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Start/pause transition: Idle -> Running on the first call, then
    /// Running <-> Paused forever. No terminal state.
    pub fn toggle(&mut self) {
        if !self.started {
            self.started = true;
            self.paused = false;
        } else {
            self.paused = !self.paused;
        }
    }

    /// Focus loss forces Running -> Paused only; focus regain never resumes.
    pub fn focus_lost(&mut self) {
        if self.started && !self.paused {
            self.paused = true;
            log::info!("auto-paused (focus lost)");
        }
    }

    /// Orthogonal to start/pause, mutable at any time.
    pub fn set_brutal(&mut self, brutal: bool) {
        self.brutal = brutal;
    }

    /// Clamp and apply the slider setting; affects newly spawned dots only.
    pub fn set_velocity(&mut self, velocity: i32) {
        self.velocity = velocity.clamp(MIN_VELOCITY, MAX_VELOCITY);
    }

    /// Adopt a new canvas size and re-clamp every dot's x so its full circle
    /// stays inside the shrunken (or grown) bounds. x is otherwise fixed
    /// after spawn.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        for dot in &mut self.dots {
            let r = dot.radius as f32;
            dot.x = dot.x.max(r).min(width - r);
        }
    }

    /// Record the real tick rate; the motion step earns
    /// `frame_scale = reference / actual` reference ticks per display frame.
    /// Clamped so a dt spike (tab switch, debugger) cannot teleport dots.
    pub fn set_frame_rate(&mut self, actual_rate: f32) {
        self.frame_scale = (REFERENCE_FRAME_RATE / actual_rate.max(1.0)).clamp(0.25, 4.0);
    }

    /// Rendering-opacity tier for a dot's point value.
    pub fn opacity_tier(&self, points: i32) -> i32 {
        self.score_table.points_to_opacity_tier(points)
    }

    /// Label for the start/pause button: "START" until running, then "PAUSE".
    pub fn button_label(&self) -> &'static str {
        if !self.started || self.paused {
            "START"
        } else {
            "PAUSE"
        }
    }

    /// Instructions are shown only before the first start.
    pub fn show_instructions(&self) -> bool {
        !self.started
    }

    pub fn is_running(&self) -> bool {
        self.started && !self.paused
    }
}
