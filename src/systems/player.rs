use bevy_ecs::{
    event::{EventReader, EventWriter},
    query::With,
    system::{Query, Res, ResMut},
};
use tracing::{debug, info, trace};

use crate::{
    config::GameConfig,
    constants::{score, timing::MOUTH_TOGGLE_TICKS},
    error::GameError,
    events::{GameCommand, GameEvent},
    map::{builder::Map, tile::Tile},
    systems::{
        audio::{AudioEvent, AudioState},
        components::{BufferedDirection, GhostState, GlobalState, PlayerControlled, PlayerMouth, ScoreResource, Session},
        item::{FruitKind, FruitState},
        movement::GridStepper,
        music::BackgroundMusic,
        power::PowerMode,
        stage::GameStage,
    },
};

/// Processes player commands that are not stage transitions.
///
/// Direction intents are buffered so a turn can be queued before the player reaches
/// the intersection. They are dropped while the game is frozen on a game over or level
/// clear screen. Muting also silences the background music task.
#[allow(clippy::too_many_arguments)]
pub fn player_control_system(
    mut events: EventReader<GameEvent>,
    stage: Res<GameStage>,
    mut state: ResMut<GlobalState>,
    mut audio_state: ResMut<AudioState>,
    mut music: ResMut<BackgroundMusic>,
    mut players: Query<&mut BufferedDirection, With<PlayerControlled>>,
    mut errors: EventWriter<GameError>,
) {
    // Get the player's buffer (ensuring there is only one player)
    let mut buffered_direction = match players.single_mut() {
        Ok(buffered) => buffered,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for player system: {}",
                e
            )));
            return;
        }
    };

    for event in events.read() {
        let GameEvent::Command(command) = event;
        match command {
            GameCommand::MovePlayer(direction) => {
                if stage.is_frozen() {
                    trace!(?direction, "Ignoring direction while frozen");
                    continue;
                }
                buffered_direction.0 = Some(*direction);
            }
            GameCommand::Exit => {
                state.exit = true;
            }
            GameCommand::ToggleMute => {
                audio_state.muted = !audio_state.muted;
                if audio_state.muted {
                    music.cancel();
                } else if matches!(*stage, GameStage::Playing) {
                    music.start();
                }
                info!("Audio {}", if audio_state.muted { "muted" } else { "unmuted" });
            }
            _ => {}
        }
    }
}

/// Toggles the player's mouth on a fixed cadence.
pub fn player_mouth_system(session: Res<Session>, mut mouths: Query<&mut PlayerMouth, With<PlayerControlled>>) {
    if session.ticks % MOUTH_TOGGLE_TICKS != 0 {
        return;
    }
    for mut mouth in mouths.iter_mut() {
        mouth.open = !mouth.open;
    }
}

/// Eats whatever the player is standing on, then takes the next step.
///
/// Runs only while the player is at rest on a tile. A buffered turn is taken first if
/// the tile in that direction is open; otherwise the player keeps going the way it
/// faces, or stays put against a wall. Fruit is picked up on the tile the player ends
/// the tick on.
#[allow(clippy::too_many_arguments)]
pub fn player_movement_system(
    config: Res<GameConfig>,
    mut map: ResMut<Map>,
    mut session: ResMut<Session>,
    mut score: ResMut<ScoreResource>,
    mut power: ResMut<PowerMode>,
    mut fruit: ResMut<FruitState>,
    mut players: Query<(&mut GridStepper, &mut BufferedDirection), With<PlayerControlled>>,
    mut ghosts: Query<&mut GhostState>,
    mut audio: EventWriter<AudioEvent>,
    mut errors: EventWriter<GameError>,
) {
    let (mut stepper, mut buffered_direction) = match players.single_mut() {
        Ok(tuple) => tuple,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for player movement: {}",
                e
            )));
            return;
        }
    };

    if stepper.is_moving() {
        return;
    }

    match map.grid.consume(stepper.tile) {
        Some(Tile::Pellet) => {
            score.0 += score::PELLET;
            session.pellets_eaten += 1;
            audio.write(AudioEvent::PelletEaten);

            let threshold = config.fruit_threshold;
            if threshold > 0 && (session.pellets_eaten == threshold || session.pellets_eaten == threshold * 2) {
                let kind = FruitKind::for_level(session.level);
                if fruit.spawn(kind, map.start_positions.fruit, config.fruit_lifetime_ticks) {
                    debug!(?kind, pellets = session.pellets_eaten, "Fruit spawned");
                }
            }
        }
        Some(Tile::PowerPellet) => {
            score.0 += score::POWER_PELLET;
            audio.write(AudioEvent::PowerPelletEaten);
            power.activate(config.power_mode_ticks);
            for mut state in ghosts.iter_mut() {
                if !state.is_defeated() {
                    *state = GhostState::Frightened;
                }
            }
            debug!(ticks = config.power_mode_ticks, "Power mode activated");
        }
        _ => {}
    }

    let grid = &map.grid;
    let mut stepped = false;
    if let Some(direction) = buffered_direction.0 {
        stepped = stepper.try_step(grid, direction, config.tile_size);
        if stepped {
            buffered_direction.0 = None;
        }
    }
    if !stepped {
        if let Some(direction) = stepper.direction {
            stepped = stepper.try_step(grid, direction, config.tile_size);
        }
    }
    if stepped {
        trace!(tile = ?stepper.tile, direction = ?stepper.direction, "Player stepped");
    }

    if let Some(points) = fruit.collect(stepper.tile) {
        score.0 += points;
        audio.write(AudioEvent::FruitCollected);
        debug!(points, "Fruit collected");
    }
}
