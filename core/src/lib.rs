#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use collision::*;
pub use effects::*;
pub use engine::*;
pub use error::*;
pub use ghost::*;
pub use hooks::*;
pub use maze::*;
pub use motion::*;
pub use player::*;
pub use timer::*;
pub use types::*;

mod cell;
mod collision;
mod effects;
mod engine;
mod error;
mod ghost;
mod hooks;
mod maze;
mod motion;
mod player;
mod timer;
mod types;

/// Longest interval a timer may be configured with, one hour.
pub const MAX_TIMER_MS: f64 = 3_600_000.0;

/// Timings are in milliseconds; cell times are per grid cell crossed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub player_cell_ms: f64,
    pub ghost_cell_ms: f64,
    pub frightened_cell_ms: f64,
    pub power_duration_ms: f64,
    pub ghost_cycle_ms: f64,
    pub level_advance_delay_ms: f64,
    pub death_reset_delay_ms: f64,
    pub effect_duration_ms: f64,
    /// Upper bound for a single tick, so a stalled host cannot teleport anyone.
    pub max_tick_ms: f64,
    pub lives: u32,
    pub roster: Vec<GhostKind>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_cell_ms: 200.0,
            ghost_cell_ms: 250.0,
            frightened_cell_ms: 400.0,
            power_duration_ms: 8000.0,
            ghost_cycle_ms: 20000.0,
            level_advance_delay_ms: 3000.0,
            death_reset_delay_ms: 1000.0,
            effect_duration_ms: 1000.0,
            max_tick_ms: 50.0,
            lives: 3,
            roster: GhostKind::ALL.to_vec(),
        }
    }
}

impl GameConfig {
    /// Replaces non-finite or out-of-range values with something playable.
    pub fn validated(self) -> Self {
        let defaults = Self::default();
        Self {
            player_cell_ms: clamp_ms(self.player_cell_ms, defaults.player_cell_ms),
            ghost_cell_ms: clamp_ms(self.ghost_cell_ms, defaults.ghost_cell_ms),
            frightened_cell_ms: clamp_ms(self.frightened_cell_ms, defaults.frightened_cell_ms),
            power_duration_ms: clamp_ms(self.power_duration_ms, defaults.power_duration_ms),
            ghost_cycle_ms: clamp_ms(self.ghost_cycle_ms, defaults.ghost_cycle_ms),
            level_advance_delay_ms: clamp_ms(self.level_advance_delay_ms, defaults.level_advance_delay_ms),
            death_reset_delay_ms: clamp_ms(self.death_reset_delay_ms, defaults.death_reset_delay_ms),
            effect_duration_ms: clamp_ms(self.effect_duration_ms, defaults.effect_duration_ms),
            max_tick_ms: clamp_ms(self.max_tick_ms, defaults.max_tick_ms),
            lives: self.lives.max(1),
            roster: self.roster,
        }
    }
}

fn clamp_ms(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(1.0, MAX_TIMER_MS)
    } else {
        fallback
    }
}
