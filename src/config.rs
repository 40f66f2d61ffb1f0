//! Runtime tunables for a game session.

use bevy_ecs::resource::Resource;

use crate::constants::{self, fruit, ghost, timing};

/// Tunable parameters of one simulation.
///
/// Defaults mirror the values in [`crate::constants`]; tests and the demo binary
/// override individual fields.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Pixel size of a tile; also sizes the capture box.
    pub tile_size: i32,
    /// Interpolation speed on level 1, in pixels per tick.
    pub base_speed: i32,
    pub starting_lives: u8,
    pub power_mode_ticks: u32,
    pub defeated_respawn_ticks: u32,
    pub fruit_threshold: u32,
    pub fruit_lifetime_ticks: u32,
    pub normal_cadence: u32,
    pub frightened_cadence: u32,
    pub flank_wander_chance: f64,
    pub life_lost_music_delay: u32,
    /// Seed for the ghost RNG. `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_size: constants::TILE_SIZE,
            base_speed: constants::BASE_MOVE_SPEED,
            starting_lives: constants::STARTING_LIVES,
            power_mode_ticks: timing::POWER_MODE_TICKS,
            defeated_respawn_ticks: timing::DEFEATED_RESPAWN_TICKS,
            fruit_threshold: fruit::SPAWN_THRESHOLD,
            fruit_lifetime_ticks: timing::FRUIT_LIFETIME_TICKS,
            normal_cadence: ghost::NORMAL_CADENCE,
            frightened_cadence: ghost::FRIGHTENED_CADENCE,
            flank_wander_chance: ghost::FLANK_WANDER_CHANCE,
            life_lost_music_delay: timing::LIFE_LOST_MUSIC_DELAY,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Interpolation speed for a level: one pixel faster every second level, never past a full tile.
    pub fn move_speed(&self, level: u32) -> i32 {
        (self.base_speed + (level / 2) as i32).min(self.tile_size)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
