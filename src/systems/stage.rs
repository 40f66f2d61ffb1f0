use bevy_ecs::{
    event::{EventReader, EventWriter},
    resource::Resource,
    system::{Query, Res, ResMut},
};
use tracing::{debug, info, warn};

use crate::{
    config::GameConfig,
    constants::timing::OVERLAY_PROMPT_DELAY,
    events::{GameCommand, GameEvent, StageTransition},
    map::builder::{LevelTemplates, Map, StartPositions},
    score_store::HighScore,
    systems::{
        audio::{AudioEvent, AudioState},
        components::{BufferedDirection, Ghost, GhostState, MoveCadence, ScoreResource, Session},
        item::FruitState,
        movement::GridStepper,
        music::BackgroundMusic,
        power::PowerMode,
    },
};

/// A resource to track the overall stage of the game from a high-level perspective.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameStage {
    /// Waiting on the title screen for the first start.
    #[default]
    NotStarted,
    /// The main gameplay loop is active.
    Playing,
    Paused,
    /// Out of lives. Frozen until a restart.
    GameOver { overlay_ticks: u32 },
    /// Every pellet eaten. Frozen until the player continues.
    LevelClear { overlay_ticks: u32 },
}

impl GameStage {
    /// Whether the simulation is frozen behind a game over or level clear overlay.
    pub fn is_frozen(&self) -> bool {
        matches!(self, GameStage::GameOver { .. } | GameStage::LevelClear { .. })
    }

    /// Whether the restart/continue prompt is drawn this tick.
    ///
    /// The prompt waits a second after the overlay appears, then blinks on a one
    /// second cycle.
    pub fn prompt_visible(&self, tick: u64) -> bool {
        match self {
            GameStage::GameOver { overlay_ticks } | GameStage::LevelClear { overlay_ticks } => {
                *overlay_ticks > OVERLAY_PROMPT_DELAY && tick % 60 < 40
            }
            _ => false,
        }
    }
}

/// Every movable entity. Player-only and ghost-only parts are optional.
pub type ActorItem = (
    &'static mut GridStepper,
    Option<&'static mut BufferedDirection>,
    Option<&'static Ghost>,
    Option<&'static mut GhostState>,
    Option<&'static mut MoveCadence>,
);

/// Puts the player and every ghost back on their start tiles for `starts`.
///
/// Ghosts come back Normal with a fresh cadence and the player's queued turn is dropped.
pub fn reset_actors(actors: &mut Query<ActorItem>, starts: &StartPositions, tile_size: i32) {
    for (mut stepper, buffered, ghost, state, cadence) in actors.iter_mut() {
        let start = ghost.map_or(starts.player, |ghost| starts.ghost(*ghost));
        stepper.relocate(start, tile_size);
        if let Some(mut buffered) = buffered {
            buffered.0 = None;
        }
        if let Some(mut state) = state {
            *state = GhostState::Normal;
        }
        if let Some(mut cadence) = cadence {
            cadence.0 = 0;
        }
    }
}

/// Carries out stage intents: start, pause/resume, restart and advance.
///
/// An intent that doesn't apply to the current stage is ignored.
#[allow(clippy::too_many_arguments)]
pub fn stage_command_system(
    mut events: EventReader<GameEvent>,
    mut stage: ResMut<GameStage>,
    config: Res<GameConfig>,
    templates: Res<LevelTemplates>,
    mut map: ResMut<Map>,
    mut session: ResMut<Session>,
    mut score: ResMut<ScoreResource>,
    mut power: ResMut<PowerMode>,
    mut fruit: ResMut<FruitState>,
    mut music: ResMut<BackgroundMusic>,
    audio_state: Res<AudioState>,
    mut actors: Query<ActorItem>,
) {
    for event in events.read() {
        let GameEvent::Command(command) = event;
        let next = match (*command, *stage) {
            (GameCommand::Start, GameStage::NotStarted) => {
                info!(level = session.level, "Game started");
                GameStage::Playing
            }
            (GameCommand::TogglePause, GameStage::Playing) => {
                info!("Game paused");
                music.cancel();
                *stage = GameStage::Paused;
                continue;
            }
            (GameCommand::TogglePause, GameStage::Paused) => {
                info!("Game resumed");
                GameStage::Playing
            }
            (GameCommand::Restart, GameStage::GameOver { .. }) => {
                *session = Session {
                    ticks: session.ticks,
                    ..Session::new(&config)
                };
                score.0 = 0;
                *map = templates.for_level(session.level);
                power.clear();
                fruit.clear();
                reset_actors(&mut actors, &map.start_positions, config.tile_size);
                info!("Game restarted");
                GameStage::Playing
            }
            (GameCommand::AdvanceLevel, GameStage::LevelClear { .. }) => {
                session.level += 1;
                session.move_speed = config.move_speed(session.level);
                session.pellets_eaten = 0;
                *map = templates.for_level(session.level);
                power.clear();
                fruit.clear();
                reset_actors(&mut actors, &map.start_positions, config.tile_size);
                info!(level = session.level, speed = session.move_speed, "Advanced to next level");
                GameStage::Playing
            }
            (
                GameCommand::Start | GameCommand::TogglePause | GameCommand::Restart | GameCommand::AdvanceLevel,
                current,
            ) => {
                warn!(?command, stage = ?current, "Ignoring intent for the current stage");
                continue;
            }
            _ => continue,
        };

        *stage = next;
        if !audio_state.muted {
            music.start();
        }
    }
}

/// Takes a life after a capture: either a reset with a short musical grace period, or game over.
#[allow(clippy::too_many_arguments)]
pub fn life_lost_system(
    mut transitions: EventReader<StageTransition>,
    mut stage: ResMut<GameStage>,
    config: Res<GameConfig>,
    map: Res<Map>,
    mut session: ResMut<Session>,
    score: Res<ScoreResource>,
    mut high_score: ResMut<HighScore>,
    mut power: ResMut<PowerMode>,
    mut music: ResMut<BackgroundMusic>,
    audio_state: Res<AudioState>,
    mut audio: EventWriter<AudioEvent>,
    mut actors: Query<ActorItem>,
) {
    // At most one life per tick, however many ghosts got there.
    let raised = transitions.read().filter(|t| matches!(t, StageTransition::LifeLost)).count();
    if raised == 0 || *stage != GameStage::Playing {
        return;
    }

    session.lives = session.lives.saturating_sub(1);
    music.cancel();

    if session.lives == 0 {
        *stage = GameStage::GameOver { overlay_ticks: 0 };
        high_score.submit(score.0);
        audio.write(AudioEvent::GameOver);
        info!(score = score.0, level = session.level, "Game over");
        return;
    }

    reset_actors(&mut actors, &map.start_positions, config.tile_size);
    power.clear();
    audio.write(AudioEvent::LifeLost);
    if !audio_state.muted {
        music.start_after(config.life_lost_music_delay);
    }
    debug!(lives = session.lives, "Life lost");
}

/// Freezes the game once the board is cleared.
pub fn level_clear_system(
    mut stage: ResMut<GameStage>,
    map: Res<Map>,
    session: Res<Session>,
    score: Res<ScoreResource>,
    mut high_score: ResMut<HighScore>,
    mut music: ResMut<BackgroundMusic>,
    mut audio: EventWriter<AudioEvent>,
) {
    // Re-checked here: a capture earlier this tick may already have ended the game.
    if *stage != GameStage::Playing || map.grid.remaining_pellets() > 0 {
        return;
    }

    *stage = GameStage::LevelClear { overlay_ticks: 0 };
    high_score.submit(score.0);
    music.cancel();
    audio.write(AudioEvent::LevelClear);
    info!(level = session.level, score = score.0, "Level cleared");
}

/// Advances the overlay counter while frozen.
pub fn overlay_system(mut stage: ResMut<GameStage>) {
    if let GameStage::GameOver { overlay_ticks } | GameStage::LevelClear { overlay_ticks } = &mut *stage {
        *overlay_ticks = overlay_ticks.saturating_add(1);
    }
}
