use bevy_ecs::entity::Entity;
use bevy_ecs::event::EventWriter;
use bevy_ecs::query::{With, Without};
use bevy_ecs::system::{Query, Res, ResMut};
use glam::IVec2;
use smallvec::SmallVec;
use tracing::debug;

use crate::config::GameConfig;
use crate::constants::score;
use crate::error::GameError;
use crate::events::StageTransition;
use crate::systems::audio::AudioEvent;
use crate::systems::components::{Ghost, GhostState, PlayerControlled, ScoreResource};
use crate::systems::movement::GridStepper;
use crate::systems::power::PowerMode;

/// Whether two sprites overlap closely enough to count as a capture.
///
/// An axis-aligned box of half a tile on each side, measured between pixel origins.
pub fn is_capture(player_pixel: IVec2, ghost_pixel: IVec2, tile_size: i32) -> bool {
    let delta = (player_pixel - ghost_pixel).abs();
    // Doubled so odd tile sizes stay exact.
    delta.x * 2 < tile_size && delta.y * 2 < tile_size
}

/// Resolves player/ghost overlaps.
///
/// Every overlap is gathered from the positions as they stand before anything is
/// resolved, so the result doesn't depend on query order. Frightened ghosts are
/// defeated first; then, if any other ghost overlapped, a single life is lost.
#[allow(clippy::too_many_arguments)]
pub fn collision_system(
    config: Res<GameConfig>,
    power: Res<PowerMode>,
    mut score: ResMut<ScoreResource>,
    players: Query<&GridStepper, With<PlayerControlled>>,
    mut ghosts: Query<(Entity, &Ghost, &GridStepper, &mut GhostState), Without<PlayerControlled>>,
    mut audio: EventWriter<AudioEvent>,
    mut transitions: EventWriter<StageTransition>,
    mut errors: EventWriter<GameError>,
) {
    let player = match players.single() {
        Ok(player) => player,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for collision system: {}",
                e
            )));
            return;
        }
    };

    let mut defeated: SmallVec<[Entity; 4]> = SmallVec::new();
    let mut caught = false;
    for (entity, _, stepper, state) in ghosts.iter() {
        if state.is_defeated() || !is_capture(player.pixel, stepper.pixel, config.tile_size) {
            continue;
        }
        if state.is_frightened() && power.is_active() {
            defeated.push(entity);
        } else {
            caught = true;
        }
    }

    for entity in defeated {
        if let Ok((_, ghost, _, mut state)) = ghosts.get_mut(entity) {
            *state = GhostState::Defeated {
                remaining_ticks: config.defeated_respawn_ticks,
            };
            score.0 += score::GHOST;
            audio.write(AudioEvent::GhostDefeated);
            debug!(ghost = ghost.as_ref(), score = score.0, "Ghost defeated");
        }
    }

    if caught {
        debug!(tile = ?player.tile, "Player caught");
        transitions.write(StageTransition::LifeLost);
    }
}
