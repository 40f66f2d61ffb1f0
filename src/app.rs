use std::collections::VecDeque;
use std::time::{Duration, Instant};

use glam::IVec2;
use tracing::{debug, info, trace};

use crate::constants::LOOP_TIME;
use crate::error::GameResult;
use crate::events::GameCommand;
use crate::game::Game;
use crate::map::direction::Direction;
use crate::render::{Frame, Renderer};
use crate::systems::GameStage;

/// Delivers commands to the game. Polled once per tick with the latest frame.
pub trait InputSource {
    fn poll(&mut self, frame: &Frame) -> Vec<GameCommand>;
}

/// Fixed-timestep driver: polls input, ticks the game, renders, and sleeps off the rest of the tick.
pub struct App {
    pub game: Game,
    input: Box<dyn InputSource>,
    renderer: Box<dyn Renderer>,
    /// Render every this many ticks.
    render_interval: u64,
    /// Sleep to hold 60 ticks per second; off for headless runs.
    paced: bool,
    frame: Frame,
}

impl App {
    /// # Errors
    ///
    /// Returns an error if the game cannot produce its first frame.
    pub fn new(
        mut game: Game,
        input: impl InputSource + 'static,
        renderer: impl Renderer + 'static,
        render_interval: u64,
        paced: bool,
    ) -> GameResult<Self> {
        let frame = game.frame()?;
        Ok(App {
            game,
            input: Box::new(input),
            renderer: Box::new(renderer),
            render_interval: render_interval.max(1),
            paced,
            frame,
        })
    }

    /// Executes a single tick of the loop.
    ///
    /// Returns `false` once the game has asked to exit.
    pub fn run(&mut self) -> GameResult<bool> {
        let start = Instant::now();

        for command in self.input.poll(&self.frame) {
            trace!(?command, "Input command");
            self.game.command(command);
        }

        let exit = self.game.tick();
        self.frame = self.game.frame()?;
        if self.frame.tick % self.render_interval == 0 || exit {
            self.renderer.render(&self.frame)?;
        }
        if exit {
            return Ok(false);
        }

        if self.paced {
            let time = LOOP_TIME.saturating_sub(start.elapsed());
            if time != Duration::ZERO {
                spin_sleep::sleep(time);
            }
        }
        Ok(true)
    }

    /// Runs until exit, or until `max_ticks` ticks have passed.
    pub fn run_for(&mut self, max_ticks: Option<u64>) -> GameResult<u64> {
        info!(paced = self.paced, ?max_ticks, "Starting game loop ({:.3}ms)", LOOP_TIME.as_secs_f32() * 1000.0);
        let mut ticks = 0;
        while max_ticks.is_none_or(|max| ticks < max) {
            ticks += 1;
            if !self.run()? {
                break;
            }
        }
        info!(ticks, score = self.frame.score, level = self.frame.level, "Game loop finished");
        Ok(ticks)
    }
}

/// A self-driving player for headless demos.
///
/// Starts the game, steers toward the nearest pellet, continues after every cleared
/// level and exits at game over, once the prompt has shown.
#[derive(Debug, Default)]
pub struct Autopilot {
    last: Option<Direction>,
}

impl InputSource for Autopilot {
    fn poll(&mut self, frame: &Frame) -> Vec<GameCommand> {
        match frame.stage {
            GameStage::NotStarted => vec![GameCommand::Start],
            GameStage::LevelClear { .. } if frame.prompt_visible => vec![GameCommand::AdvanceLevel],
            GameStage::GameOver { .. } if frame.prompt_visible => vec![GameCommand::Exit],
            GameStage::Playing => {
                let direction = nearest_pellet_direction(frame);
                if direction.is_some() && direction != self.last {
                    debug!(?direction, "Autopilot turning");
                }
                self.last = direction;
                direction.map(GameCommand::MovePlayer).into_iter().collect()
            }
            _ => Vec::new(),
        }
    }
}

/// The first step of a shortest path from the player to the closest edible tile.
fn nearest_pellet_direction(frame: &Frame) -> Option<Direction> {
    let height = frame.tiles.len() as i32;
    let width = frame.tiles.first().map_or(0, |row| row.len() as i32);
    let tile_at = |pos: IVec2| {
        (pos.y >= 0 && pos.y < height && pos.x >= 0 && pos.x < width)
            .then(|| frame.tiles[pos.y as usize][pos.x as usize])
    };

    let start = frame.player.tile;
    let mut first_step = vec![None; (width * height).max(0) as usize];
    let index = |pos: IVec2| (pos.y * width + pos.x) as usize;
    let mut visited = vec![false; first_step.len()];
    let mut queue = VecDeque::from([start]);
    visited[index(start)] = true;

    while let Some(pos) = queue.pop_front() {
        if pos != start && tile_at(pos).is_some_and(|tile| tile.is_edible()) {
            return first_step[index(pos)];
        }
        for direction in Direction::DIRECTIONS {
            let mut next = pos + direction.as_ivec2();
            next.x = next.x.rem_euclid(width.max(1));
            if !tile_at(next).is_some_and(|tile| tile.is_passable()) || visited[index(next)] {
                continue;
            }
            visited[index(next)] = true;
            first_step[index(next)] = if pos == start { Some(direction) } else { first_step[index(pos)] };
            queue.push_back(next);
        }
    }
    None
}
