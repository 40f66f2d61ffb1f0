use bevy_ecs::{
    resource::Resource,
    system::{Query, ResMut},
};
use tracing::debug;

use crate::constants::timing::POWER_FLASH_TICKS;
use crate::systems::components::GhostState;

/// The global power mode timer. Ghosts flee and can be captured while it runs.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowerMode {
    pub remaining_ticks: u32,
}

impl PowerMode {
    pub fn is_active(&self) -> bool {
        self.remaining_ticks > 0
    }

    /// Starts (or restarts) power mode at full duration.
    pub fn activate(&mut self, ticks: u32) {
        self.remaining_ticks = ticks;
    }

    pub fn clear(&mut self) {
        self.remaining_ticks = 0;
    }

    /// Whether power mode is about to run out. Purely cosmetic.
    pub fn is_flashing(&self) -> bool {
        self.is_active() && self.remaining_ticks <= POWER_FLASH_TICKS
    }

    /// Advances one tick. Returns `true` on the tick power mode expires.
    pub fn tick(&mut self) -> bool {
        if self.remaining_ticks == 0 {
            return false;
        }
        self.remaining_ticks -= 1;
        self.remaining_ticks == 0
    }
}

/// Counts power mode down and calms every frightened ghost when it expires.
pub fn power_mode_system(mut power: ResMut<PowerMode>, mut ghosts: Query<&mut GhostState>) {
    if !power.tick() {
        return;
    }

    let mut calmed = 0;
    for mut state in ghosts.iter_mut() {
        if state.is_frightened() {
            *state = GhostState::Normal;
            calmed += 1;
        }
    }
    debug!(calmed, "Power mode expired");
}
