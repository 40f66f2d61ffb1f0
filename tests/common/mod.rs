#![allow(dead_code)]

use bevy_ecs::{entity::Entity, query::With, world::World};
use glam::IVec2;
use mazechase::{
    config::GameConfig,
    events::GameCommand,
    game::Game,
    systems::{AudioEvent, BufferedDirection, Ghost, GhostState, GridStepper, PlayerControlled, RecordingSink},
};

/// A short corridor over a loop, with every ghost walled into its own cell.
///
/// Pellets: (2,1) (4,1) (5,1) (6,1), power pellet at (3,1), then (1,2) (7,2) and the whole of row 3.
pub const TEST_MAZE: &[&str] = &[
    "#########",
    "#X.o...F#",
    "#.#####.#",
    "#.......#",
    "#########",
    "#1#2#3#4#",
    "#########",
];

/// A single pellet beside the start tile.
pub const ONE_PELLET_MAZE: &[&str] = &[
    "#########",
    "#X.F    #",
    "#########",
    "#1#2#3#4#",
    "#########",
];

/// Blinky at the far end of the player's corridor; the others walled in.
pub const CORRIDOR_MAZE: &[&str] = &[
    "#########",
    "#X.....1#",
    "#########",
    "#2#3#4#F#",
    "#########",
];

pub const TILE_SIZE: i32 = 20;

/// Moves a whole tile per tick, so one tick is one step.
pub fn fast_config() -> GameConfig {
    GameConfig {
        tile_size: TILE_SIZE,
        base_speed: TILE_SIZE,
        ..GameConfig::default()
    }
    .with_seed(42)
}

pub fn create_game(config: GameConfig, maze: &'static [&'static str]) -> Game {
    Game::with_templates(config, &[maze]).expect("test maze should load")
}

pub fn test_game() -> Game {
    create_game(fast_config(), TEST_MAZE)
}

/// Starts `game` and lets the start tick pass.
pub fn start(game: &mut Game) {
    game.command(GameCommand::Start);
    game.tick();
}

pub fn started_game() -> Game {
    let mut game = test_game();
    start(&mut game);
    game
}

pub fn tick_n(game: &mut Game, ticks: usize) {
    for _ in 0..ticks {
        game.tick();
    }
}

/// Plays cues into a recorder and returns a handle to it.
pub fn record_audio(game: &mut Game) -> RecordingSink {
    let sink = RecordingSink::new();
    game.set_audio_sink(sink.clone());
    sink
}

pub fn music_notes(sink: &RecordingSink) -> usize {
    sink.played()
        .iter()
        .filter(|event| matches!(event, AudioEvent::MusicNote { .. }))
        .count()
}

pub fn player_entity(world: &mut World) -> Entity {
    world
        .query_filtered::<Entity, With<PlayerControlled>>()
        .single(world)
        .expect("exactly one player")
}

pub fn ghost_entity(world: &mut World, ghost: Ghost) -> Entity {
    world
        .query::<(Entity, &Ghost)>()
        .iter(world)
        .find(|(_, g)| **g == ghost)
        .map(|(entity, _)| entity)
        .expect("ghost should exist")
}

pub fn player_stepper(world: &mut World) -> GridStepper {
    let entity = player_entity(world);
    world.get::<GridStepper>(entity).cloned().expect("player has a stepper")
}

pub fn player_buffer(world: &mut World) -> BufferedDirection {
    let entity = player_entity(world);
    *world.get::<BufferedDirection>(entity).expect("player has a buffer")
}

pub fn ghost_stepper(world: &mut World, ghost: Ghost) -> GridStepper {
    let entity = ghost_entity(world, ghost);
    world.get::<GridStepper>(entity).cloned().expect("ghost has a stepper")
}

pub fn ghost_state(world: &mut World, ghost: Ghost) -> GhostState {
    let entity = ghost_entity(world, ghost);
    *world.get::<GhostState>(entity).expect("ghost has a state")
}

pub fn set_ghost_state(world: &mut World, ghost: Ghost, state: GhostState) {
    let entity = ghost_entity(world, ghost);
    *world.get_mut::<GhostState>(entity).expect("ghost has a state") = state;
}

/// Puts a ghost at rest on `tile`, pixel-aligned, without touching its start tile.
pub fn place_ghost(world: &mut World, ghost: Ghost, tile: IVec2) {
    let entity = ghost_entity(world, ghost);
    let mut stepper = world.get_mut::<GridStepper>(entity).expect("ghost has a stepper");
    stepper.tile = tile;
    stepper.pixel = tile * TILE_SIZE;
    stepper.target_pixel = tile * TILE_SIZE;
}
