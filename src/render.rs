//! Read-only frame snapshots and a text renderer.
//!
//! A [`Frame`] is an owned copy of everything a renderer needs. Renderers never touch
//! the world, so drawing cannot change the simulation.

use std::io::Write;

use bevy_ecs::query::With;
use bevy_ecs::world::World;
use glam::IVec2;
use thousands::Separable;

use crate::error::{GameError, GameResult};
use crate::map::builder::Map;
use crate::map::direction::Direction;
use crate::map::tile::Tile;
use crate::score_store::HighScore;
use crate::systems::audio::AudioState;
use crate::systems::components::{Ghost, GhostState, PlayerControlled, PlayerMouth, ScoreResource, Session};
use crate::systems::item::{ActiveFruit, FruitState};
use crate::systems::movement::GridStepper;
use crate::systems::power::PowerMode;
use crate::systems::stage::GameStage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerView {
    pub tile: IVec2,
    pub pixel: IVec2,
    pub facing: Option<Direction>,
    pub mouth_open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhostView {
    pub ghost: Ghost,
    pub state: GhostState,
    pub tile: IVec2,
    pub pixel: IVec2,
}

/// Everything visible after a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub tiles: Vec<Vec<Tile>>,
    pub player: PlayerView,
    /// In Blinky, Pinky, Inky, Clyde order.
    pub ghosts: Vec<GhostView>,
    pub fruit: Option<ActiveFruit>,
    pub score: u32,
    pub high_score: u32,
    pub lives: u8,
    pub level: u32,
    pub stage: GameStage,
    pub prompt_visible: bool,
    pub power_active: bool,
    pub power_flashing: bool,
    pub muted: bool,
    pub tick: u64,
}

impl Frame {
    /// Copies the current state out of `world`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidState` if the world is missing the player or a core resource.
    pub fn capture(world: &mut World) -> GameResult<Frame> {
        let player = world
            .query_filtered::<(&GridStepper, &PlayerMouth), With<PlayerControlled>>()
            .single(world)
            .map(|(stepper, mouth)| PlayerView {
                tile: stepper.tile,
                pixel: stepper.pixel,
                facing: stepper.direction,
                mouth_open: mouth.open,
            })
            .map_err(|e| GameError::InvalidState(format!("No/multiple players to render: {e}")))?;

        let mut ghosts: Vec<GhostView> = world
            .query::<(&Ghost, &GhostState, &GridStepper)>()
            .iter(world)
            .map(|(ghost, state, stepper)| GhostView {
                ghost: *ghost,
                state: *state,
                tile: stepper.tile,
                pixel: stepper.pixel,
            })
            .collect();
        ghosts.sort_by_key(|view| view.ghost as u8);

        let missing = |name: &str| GameError::InvalidState(format!("{name} resource is missing"));
        let tiles = world.get_resource::<Map>().ok_or_else(|| missing("Map"))?.grid.rows().map(<[Tile]>::to_vec).collect();
        let session = world.get_resource::<Session>().ok_or_else(|| missing("Session"))?.clone();
        let stage = *world.get_resource::<GameStage>().ok_or_else(|| missing("GameStage"))?;
        let power = *world.get_resource::<PowerMode>().ok_or_else(|| missing("PowerMode"))?;
        let fruit = world.get_resource::<FruitState>().ok_or_else(|| missing("FruitState"))?.active;
        let score = world.get_resource::<ScoreResource>().ok_or_else(|| missing("ScoreResource"))?.0;
        let high_score = world.get_resource::<HighScore>().ok_or_else(|| missing("HighScore"))?.best();
        let muted = world.get_resource::<AudioState>().is_some_and(|audio| audio.muted);

        Ok(Frame {
            tiles,
            player,
            ghosts,
            fruit,
            score,
            // The stored best lags behind a new record until the level ends.
            high_score: high_score.max(score),
            lives: session.lives,
            level: session.level,
            stage,
            prompt_visible: stage.prompt_visible(session.ticks),
            power_active: power.is_active(),
            power_flashing: power.is_flashing(),
            muted,
            tick: session.ticks,
        })
    }
}

/// Draws frames somewhere.
pub trait Renderer {
    fn render(&mut self, frame: &Frame) -> GameResult<()>;
}

/// Draws frames as ASCII art, one character per tile, with a status line underneath.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Lays out a frame as text without writing it anywhere.
    pub fn draw(frame: &Frame) -> String {
        let mut rows: Vec<Vec<char>> = frame
            .tiles
            .iter()
            .map(|row| row.iter().map(|tile| tile_char(*tile)).collect())
            .collect();

        let mut put = |tile: IVec2, c: char| {
            if let Some(cell) = rows.get_mut(tile.y as usize).and_then(|row| row.get_mut(tile.x as usize)) {
                *cell = c;
            }
        };

        if let Some(fruit) = frame.fruit {
            if !fruit.is_blinking() || frame.tick % 20 < 10 {
                put(fruit.tile, '%');
            }
        }
        put(frame.player.tile, if frame.player.mouth_open { '@' } else { 'O' });
        for view in &frame.ghosts {
            put(view.tile, ghost_char(view, frame.power_flashing && frame.tick % 10 < 5));
        }

        let mut text: String = rows
            .into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");

        text.push_str(&format!(
            "\nSCORE {}  HIGH {}  LIVES {}  LEVEL {}",
            frame.score.separate_with_commas(),
            frame.high_score.separate_with_commas(),
            frame.lives,
            frame.level
        ));

        let banner = match frame.stage {
            GameStage::NotStarted => Some("PRESS START"),
            GameStage::Paused => Some("PAUSED"),
            GameStage::GameOver { .. } => Some("GAME OVER"),
            GameStage::LevelClear { .. } => Some("LEVEL CLEAR"),
            GameStage::Playing => None,
        };
        if let Some(banner) = banner {
            text.push('\n');
            text.push_str(banner);
        }
        if frame.prompt_visible {
            text.push_str(match frame.stage {
                GameStage::LevelClear { .. } => "  - PRESS ENTER TO CONTINUE",
                _ => "  - PRESS R TO RESTART",
            });
        }
        text
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, frame: &Frame) -> GameResult<()> {
        writeln!(self.out, "{}\n", Self::draw(frame))?;
        Ok(())
    }
}

fn tile_char(tile: Tile) -> char {
    match tile {
        Tile::Wall => '#',
        Tile::Pellet => '.',
        Tile::PowerPellet => 'o',
        Tile::Den => '=',
        Tile::Empty | Tile::Eaten => ' ',
    }
}

fn ghost_char(view: &GhostView, flash: bool) -> char {
    match view.state {
        GhostState::Defeated { .. } => '"',
        GhostState::Frightened if flash => 'w',
        GhostState::Frightened => 'm',
        GhostState::Normal => match view.ghost {
            Ghost::Blinky => 'B',
            Ghost::Pinky => 'P',
            Ghost::Inky => 'I',
            Ghost::Clyde => 'C',
        },
    }
}
