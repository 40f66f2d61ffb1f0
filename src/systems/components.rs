use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use strum_macros::{AsRefStr, EnumIter};

use crate::config::GameConfig;
use crate::map::direction::Direction;
use crate::systems::movement::GridStepper;

/// A tag component for the entity controlled by the player.
#[derive(Default, Component, Debug)]
pub struct PlayerControlled;

/// The four ghosts, each with its own way of picking a target tile.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr)]
pub enum Ghost {
    /// Chases the player's tile directly.
    Blinky,
    /// Ambushes four tiles ahead of the player.
    Pinky,
    /// Flanks two tiles ahead of the player, wandering at random part of the time.
    Inky,
    /// Chases from afar but retreats to its corner when the player is close.
    Clyde,
}

/// Per-ghost behaviour state.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GhostState {
    #[default]
    Normal,
    /// Fleeing during power mode, and capturable.
    Frightened,
    /// Captured by the player; inert until the countdown expires.
    Defeated { remaining_ticks: u32 },
}

impl GhostState {
    pub fn is_frightened(&self) -> bool {
        matches!(self, GhostState::Frightened)
    }

    pub fn is_defeated(&self) -> bool {
        matches!(self, GhostState::Defeated { .. })
    }

    /// A ghost makes a step decision once every this many idle ticks.
    pub fn cadence(&self, config: &GameConfig) -> u32 {
        match self {
            GhostState::Frightened => config.frightened_cadence,
            GhostState::Normal | GhostState::Defeated { .. } => config.normal_cadence,
        }
    }
}

/// Counts idle ticks since a ghost's last step decision.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveCadence(pub u32);

/// The player's queued turn, applied as soon as the tile in that direction opens up.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferedDirection(pub Option<Direction>);

/// Cosmetic mouth animation phase.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerMouth {
    pub open: bool,
}

impl Default for PlayerMouth {
    fn default() -> Self {
        Self { open: true }
    }
}

#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: PlayerControlled,
    pub stepper: GridStepper,
    pub buffered_direction: BufferedDirection,
    pub mouth: PlayerMouth,
}

#[derive(Bundle)]
pub struct GhostBundle {
    pub ghost: Ghost,
    pub stepper: GridStepper,
    pub state: GhostState,
    pub cadence: MoveCadence,
}

/// Session-wide counters that outlive individual levels.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// 1-based level number.
    pub level: u32,
    pub lives: u8,
    /// Regular pellets eaten this level; drives fruit spawns.
    pub pellets_eaten: u32,
    /// Interpolation speed in pixels per tick for the current level.
    pub move_speed: i32,
    /// Ticks since the game was built, frozen or not.
    pub ticks: u64,
}

impl Session {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            level: 1,
            lives: config.starting_lives,
            pellets_eaten: 0,
            move_speed: config.move_speed(1),
            ticks: 0,
        }
    }
}

#[derive(Resource, Debug, Default)]
pub struct GlobalState {
    pub exit: bool,
}

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResource(pub u32);

/// The random source for ghost decisions. Seeded from config for reproducible runs.
#[derive(Resource, Debug)]
pub struct GameRng(pub SmallRng);

impl GameRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(SmallRng::seed_from_u64(seed)),
            None => Self(SmallRng::from_os_rng()),
        }
    }
}
