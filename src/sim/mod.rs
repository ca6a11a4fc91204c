//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-granular stepping only (one `tick` per display frame)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod rng;
pub mod score;
pub mod state;
pub mod tick;

pub use rng::random_int_inclusive;
pub use score::ScoreTable;
pub use state::{Dot, DotStatus, GameState, Particle};
pub use tick::{handle_click, spawn_dot, tick};
