//! This module contains the main game logic and state.

use bevy_ecs::event::{EventReader, EventRegistry, Events};
use bevy_ecs::schedule::{IntoScheduleConfigs, Schedule, SystemSet};
use bevy_ecs::system::Res;
use bevy_ecs::world::World;
use strum::IntoEnumIterator;
use tracing::{debug, error};

use crate::config::GameConfig;
use crate::constants::LEVEL_TEMPLATES;
use crate::error::{GameError, GameResult};
use crate::events::{GameCommand, GameEvent, StageTransition};
use crate::formatter;
use crate::map::builder::{LevelTemplates, Map};
use crate::render::Frame;
use crate::score_store::{HighScore, HighScoreStore};
use crate::systems::{
    audio_system, collision_system, fruit_system, ghost_movement_system, ghost_respawn_system, interpolation_system,
    level_clear_system, life_lost_system, music_system, overlay_system, player_control_system, player_mouth_system,
    player_movement_system, power_mode_system, stage_command_system, AudioEvent, AudioResource, AudioSink, AudioState,
    BackgroundMusic, BufferedDirection, FruitState, GameRng, GameStage, Ghost, GhostBundle, GhostState, GlobalState,
    GridStepper, MoveCadence, PlayerBundle, PlayerControlled, PlayerMouth, PowerMode, ScoreResource, Session,
};

/// Orders a tick: intents first, then the simulation, then the stage machine's reaction.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum GameplaySet {
    /// Systems that process commands
    Input,
    /// Systems that advance the simulation; skipped unless playing
    Update,
    /// Systems that react to what happened during the update
    Respond,
}

/// A complete, self-contained game session.
///
/// Everything lives in the `World`: the map, the session counters and the entities.
/// Nothing is global, so any number of games can run side by side.
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
}

impl Game {
    /// Builds a game on the built-in level templates, silent and with an in-memory high score.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to load.
    pub fn new(config: GameConfig) -> GameResult<Game> {
        Self::with_templates(config, &LEVEL_TEMPLATES)
    }

    /// Builds a game that cycles through the given level templates.
    ///
    /// # Errors
    ///
    /// Returns an error if no templates are given or any of them is malformed.
    pub fn with_templates(config: GameConfig, templates: &[&[&str]]) -> GameResult<Game> {
        let templates = LevelTemplates::new(templates)?;
        let mut world = World::default();
        let mut schedule = Schedule::default();

        Self::setup_ecs(&mut world);
        Self::insert_resources(&mut world, config, templates);
        Self::spawn_actors(&mut world)?;
        Self::configure_schedule(&mut schedule);

        debug!("Game constructed");
        Ok(Game { world, schedule })
    }

    fn setup_ecs(world: &mut World) {
        EventRegistry::register_event::<GameError>(world);
        EventRegistry::register_event::<GameEvent>(world);
        EventRegistry::register_event::<AudioEvent>(world);
        EventRegistry::register_event::<StageTransition>(world);
    }

    fn insert_resources(world: &mut World, config: GameConfig, templates: LevelTemplates) {
        let session = Session::new(&config);
        world.insert_resource(templates.for_level(session.level));
        world.insert_resource(templates);
        world.insert_resource(GameRng::new(config.seed));
        world.insert_resource(session);
        world.insert_resource(config);
        world.insert_resource(GameStage::default());
        world.insert_resource(GlobalState::default());
        world.insert_resource(ScoreResource::default());
        world.insert_resource(PowerMode::default());
        world.insert_resource(FruitState::default());
        world.insert_resource(BackgroundMusic::default());
        world.insert_resource(AudioState::default());
        world.insert_resource(AudioResource::default());
        world.insert_resource(HighScore::default());
    }

    fn spawn_actors(world: &mut World) -> GameResult<()> {
        let tile_size = world
            .get_resource::<GameConfig>()
            .map(|config| config.tile_size)
            .ok_or_else(|| GameError::InvalidState("GameConfig resource is missing".into()))?;
        let starts = world
            .get_resource::<Map>()
            .map(|map| map.start_positions)
            .ok_or_else(|| GameError::InvalidState("Map resource is missing".into()))?;

        world.spawn(PlayerBundle {
            player: PlayerControlled,
            stepper: GridStepper::new(starts.player, tile_size),
            buffered_direction: BufferedDirection::default(),
            mouth: PlayerMouth::default(),
        });

        for ghost in Ghost::iter() {
            world.spawn(GhostBundle {
                ghost,
                stepper: GridStepper::new(starts.ghost(ghost), tile_size),
                state: GhostState::default(),
                cadence: MoveCadence::default(),
            });
            debug!(ghost = ghost.as_ref(), tile = ?starts.ghost(ghost), "Ghost spawned");
        }
        Ok(())
    }

    fn configure_schedule(schedule: &mut Schedule) {
        let is_playing = |stage: Res<GameStage>| matches!(*stage, GameStage::Playing);

        schedule
            .add_systems((
                (player_control_system, stage_command_system)
                    .chain()
                    .in_set(GameplaySet::Input),
                (
                    interpolation_system,
                    player_mouth_system,
                    power_mode_system,
                    fruit_system,
                    player_movement_system,
                    ghost_respawn_system,
                    ghost_movement_system,
                    collision_system,
                )
                    .chain()
                    .in_set(GameplaySet::Update),
                (life_lost_system, level_clear_system)
                    .chain()
                    .in_set(GameplaySet::Respond),
                (overlay_system, music_system, audio_system, error_logging_system)
                    .chain()
                    .after(GameplaySet::Respond),
            ))
            .configure_sets(
                (
                    GameplaySet::Input,
                    GameplaySet::Update.run_if(is_playing),
                    GameplaySet::Respond.run_if(is_playing),
                )
                    .chain(),
            );
    }

    /// Replaces the sink audio cues are played through.
    pub fn set_audio_sink(&mut self, sink: impl AudioSink + 'static) {
        self.world.insert_resource(AudioResource::new(sink));
    }

    /// Replaces the high score store, loading the best score from it.
    pub fn set_high_score_store(&mut self, store: impl HighScoreStore + 'static) {
        self.world.insert_resource(HighScore::new(store));
    }

    /// Queues a command for the next tick.
    pub fn command(&mut self, command: GameCommand) {
        self.world.send_event(GameEvent::from(command));
    }

    /// Runs one fixed-timestep tick.
    ///
    /// Returns `true` once an exit has been requested.
    pub fn tick(&mut self) -> bool {
        if let Some(mut session) = self.world.get_resource_mut::<Session>() {
            session.ticks += 1;
        }
        formatter::increment_tick();

        self.schedule.run(&mut self.world);
        self.update_events();

        self.world.get_resource::<GlobalState>().is_some_and(|state| state.exit)
    }

    /// Ages every event queue, dropping events that every reader has had a tick to see.
    fn update_events(&mut self) {
        fn update<E: bevy_ecs::event::Event>(world: &mut World) {
            if let Some(mut events) = world.get_resource_mut::<Events<E>>() {
                events.update();
            }
        }
        update::<GameError>(&mut self.world);
        update::<GameEvent>(&mut self.world);
        update::<AudioEvent>(&mut self.world);
        update::<StageTransition>(&mut self.world);
    }

    /// A read-only snapshot for rendering.
    ///
    /// # Errors
    ///
    /// Returns an error if the world is missing the player or a core resource.
    pub fn frame(&mut self) -> GameResult<Frame> {
        Frame::capture(&mut self.world)
    }

    pub fn stage(&self) -> GameStage {
        self.world.get_resource::<GameStage>().copied().unwrap_or_default()
    }

    pub fn score(&self) -> u32 {
        self.world.get_resource::<ScoreResource>().map_or(0, |score| score.0)
    }

    pub fn high_score(&self) -> u32 {
        self.world.get_resource::<HighScore>().map_or(0, HighScore::best)
    }

    pub fn lives(&self) -> u8 {
        self.world.get_resource::<Session>().map_or(0, |session| session.lives)
    }

    pub fn level(&self) -> u32 {
        self.world.get_resource::<Session>().map_or(1, |session| session.level)
    }

    pub fn is_muted(&self) -> bool {
        self.world.get_resource::<AudioState>().is_some_and(|audio| audio.muted)
    }
}

/// Logs errors raised by systems. A broken world state is a bug, but it never stops the loop.
fn error_logging_system(mut errors: EventReader<GameError>) {
    for e in errors.read() {
        error!(error = %e, "System error");
    }
}
