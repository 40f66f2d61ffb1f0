use bevy_ecs::event::EventWriter;
use bevy_ecs::query::{With, Without};
use bevy_ecs::system::{Query, Res, ResMut};
use glam::IVec2;
use rand::seq::IndexedRandom;
use rand::Rng;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::config::GameConfig;
use crate::constants::ghost::{AMBUSH_LOOKAHEAD, FLANK_LOOKAHEAD, SHY_RADIUS};
use crate::error::GameError;
use crate::map::builder::Map;
use crate::map::direction::Direction;
use crate::systems::components::{GameRng, Ghost, GhostState, MoveCadence, PlayerControlled};
use crate::systems::movement::GridStepper;
use crate::systems::power::PowerMode;

/// The result of a ghost's targeting rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetDecision {
    /// Steer toward this tile.
    Targeted(IVec2),
    /// Skip targeting and wander in a random open direction.
    Randomized,
}

/// Whether a ghost wants to close in on its target or get away from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pursuit {
    Chase,
    Flee,
}

pub fn manhattan(a: IVec2, b: IVec2) -> i32 {
    let d = (a - b).abs();
    d.x + d.y
}

/// Picks the tile a ghost steers toward.
///
/// `wander` only matters for Inky: when set, Inky gives up on targeting for this
/// decision. A player without a facing direction has no "ahead", so the lookahead
/// targets collapse onto the player's own tile.
pub fn target_tile(
    ghost: Ghost,
    ghost_tile: IVec2,
    player_tile: IVec2,
    player_facing: Option<Direction>,
    retreat_tile: IVec2,
    wander: bool,
) -> TargetDecision {
    let ahead = |tiles: i32| player_tile + player_facing.map_or(IVec2::ZERO, |d| d.as_ivec2() * tiles);

    match ghost {
        Ghost::Blinky => TargetDecision::Targeted(player_tile),
        Ghost::Pinky => TargetDecision::Targeted(ahead(AMBUSH_LOOKAHEAD)),
        Ghost::Inky if wander => TargetDecision::Randomized,
        Ghost::Inky => TargetDecision::Targeted(ahead(FLANK_LOOKAHEAD)),
        Ghost::Clyde => {
            if manhattan(ghost_tile, player_tile) < SHY_RADIUS {
                TargetDecision::Targeted(retreat_tile)
            } else {
                TargetDecision::Targeted(player_tile)
            }
        }
    }
}

/// Chooses among `options` (legal directions paired with the tile one step away, before
/// any tunnel wrap) by distance to `target`: the closest when chasing, the farthest when fleeing.
///
/// Ties keep `current` if it is among the best; otherwise the earliest of
/// Up, Down, Left, Right wins.
pub fn choose_direction(
    options: &[(Direction, IVec2)],
    current: Option<Direction>,
    target: IVec2,
    pursuit: Pursuit,
) -> Option<Direction> {
    let score = |tile: IVec2| match pursuit {
        Pursuit::Chase => -manhattan(tile, target),
        Pursuit::Flee => manhattan(tile, target),
    };
    let best = options.iter().map(|(_, tile)| score(*tile)).max()?;

    let tied: SmallVec<[Direction; 4]> = options
        .iter()
        .filter(|(_, tile)| score(*tile) == best)
        .map(|(d, _)| *d)
        .collect();
    if let Some(current) = current.filter(|d| tied.contains(d)) {
        return Some(current);
    }
    Direction::DIRECTIONS.into_iter().find(|d| tied.contains(d))
}

/// Counts down defeated ghosts and sends each one home when its timer runs out.
///
/// A ghost that comes back while power mode is still running comes back frightened.
pub fn ghost_respawn_system(
    config: Res<GameConfig>,
    power: Res<PowerMode>,
    mut ghosts: Query<(&Ghost, &mut GhostState, &mut GridStepper, &mut MoveCadence)>,
) {
    for (ghost, mut state, mut stepper, mut cadence) in ghosts.iter_mut() {
        let GhostState::Defeated { remaining_ticks } = &mut *state else {
            continue;
        };

        *remaining_ticks = remaining_ticks.saturating_sub(1);
        if *remaining_ticks == 0 {
            *state = if power.is_active() {
                GhostState::Frightened
            } else {
                GhostState::Normal
            };
            stepper.reset(config.tile_size);
            cadence.0 = 0;
            debug!(ghost = ghost.as_ref(), tile = ?stepper.tile, state = ?*state, "Ghost respawned");
        }
    }
}

/// Decides and takes the next step for every ghost that is at rest.
///
/// A ghost only decides once every few idle ticks (its cadence); the wait is longer
/// while frightened. Defeated ghosts stay put.
#[allow(clippy::too_many_arguments)]
pub fn ghost_movement_system(
    config: Res<GameConfig>,
    map: Res<Map>,
    mut rng: ResMut<GameRng>,
    players: Query<&GridStepper, With<PlayerControlled>>,
    mut ghosts: Query<(&Ghost, &GhostState, &mut GridStepper, &mut MoveCadence), Without<PlayerControlled>>,
    mut errors: EventWriter<GameError>,
) {
    let player = match players.single() {
        Ok(player) => player,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for ghost movement: {}",
                e
            )));
            return;
        }
    };

    for (ghost, state, mut stepper, mut cadence) in ghosts.iter_mut() {
        if stepper.is_moving() || state.is_defeated() {
            continue;
        }

        cadence.0 += 1;
        if cadence.0 < state.cadence(&config) {
            continue;
        }
        cadence.0 = 0;

        // Reversing is allowed; only walls and the den rule a direction out. Distances are
        // scored from the unwrapped neighbour, so the tunnel never looks like a shortcut.
        let options: SmallVec<[(Direction, IVec2); 4]> = Direction::DIRECTIONS
            .into_iter()
            .filter_map(|d| stepper.destination(&map.grid, d).map(|_| (d, stepper.tile + d.as_ivec2())))
            .collect();
        if options.is_empty() {
            continue;
        }

        let chosen = if state.is_frightened() {
            choose_direction(&options, stepper.direction, player.tile, Pursuit::Flee)
        } else {
            let wander = *ghost == Ghost::Inky && rng.0.random::<f64>() < config.flank_wander_chance;
            match target_tile(
                *ghost,
                stepper.tile,
                player.tile,
                player.direction,
                map.start_positions.retreat,
                wander,
            ) {
                TargetDecision::Targeted(target) => choose_direction(&options, stepper.direction, target, Pursuit::Chase),
                TargetDecision::Randomized => options.choose(&mut rng.0).map(|(d, _)| *d),
            }
        };

        if let Some(direction) = chosen {
            if stepper.try_step(&map.grid, direction, config.tile_size) {
                trace!(ghost = ghost.as_ref(), ?direction, tile = ?stepper.tile, "Ghost stepped");
            }
        }
    }
}
