//! Score mapping between dot size and point value
//!
//! A dot's raw radius is normalized to a 1..=10 rank and inverted through a
//! fixed table, so small dots pay the most. The same table runs forward to
//! derive a rendering-opacity tier from a point value.

use serde::{Deserialize, Serialize};

use crate::consts::SCORE_RANKS;

/// One rank of the score table: `actual` is the inverse rank (`11 - points`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub points: i32,
    pub actual: i32,
}

/// Static bijection between size rank 1..=10 and point value 10..=1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreTable {
    entries: Vec<ScoreEntry>,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreTable {
    pub fn new() -> Self {
        let entries = (1..=SCORE_RANKS)
            .map(|v| ScoreEntry {
                points: v,
                actual: SCORE_RANKS + 1 - v,
            })
            .collect();
        Self { entries }
    }

    /// Map a radius in `[min_radius, max_radius]` to a point value in [1, 10].
    ///
    /// Larger radius means a lower point value. The normalized rank is clamped
    /// into [1, 10]: rounding overflows to 11 at the top and lands on 0 at
    /// `radius == min_radius`, and the table only covers 1..=10.
    pub fn size_to_points(&self, radius: i32, min_radius: i32, max_radius: i32) -> i32 {
        let delta = (max_radius - min_radius) as f32;
        let rank = (((radius - min_radius) as f32 / delta) * SCORE_RANKS as f32).round() as i32;
        self.invert(rank.clamp(1, SCORE_RANKS))
    }

    /// Forward lookup: point value to rendering-opacity tier (1..=10).
    pub fn points_to_opacity_tier(&self, points: i32) -> i32 {
        self.invert(points)
    }

    fn invert(&self, rank: i32) -> i32 {
        match self.entries.iter().find(|e| e.points == rank) {
            Some(entry) => entry.actual,
            // Table completeness over 1..=10 is guaranteed by construction; a
            // miss means scoring would be corrupt, so abort loudly.
            None => {
                log::error!("score table lookup miss for rank {rank}");
                panic!("score table lookup miss for rank {rank}");
            }
        }
    }
}
