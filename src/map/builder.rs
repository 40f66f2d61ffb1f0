//! Map construction and level template selection.

use bevy_ecs::resource::Resource;
use glam::IVec2;
use tracing::debug;

use crate::error::{GameResult, MapError};
use crate::map::grid::Grid;
use crate::map::parser::{MapTileParser, ParsedMap};
use crate::systems::components::Ghost;

/// The starting positions of the entities in a level, plus other fixed tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartPositions {
    pub player: IVec2,
    pub blinky: IVec2,
    pub pinky: IVec2,
    pub inky: IVec2,
    pub clyde: IVec2,
    /// Where bonus fruit appears.
    pub fruit: IVec2,
    /// Where Clyde runs to when the player gets too close.
    pub retreat: IVec2,
}

impl StartPositions {
    pub fn ghost(&self, ghost: Ghost) -> IVec2 {
        match ghost {
            Ghost::Blinky => self.blinky,
            Ghost::Pinky => self.pinky,
            Ghost::Inky => self.inky,
            Ghost::Clyde => self.clyde,
        }
    }
}

/// The live board for the current level.
#[derive(Resource, Debug, Clone)]
pub struct Map {
    /// The tiles, mutated as pellets are eaten.
    pub grid: Grid,
    /// A mapping of the starting positions of the entities.
    pub start_positions: StartPositions,
}

impl Map {
    /// Creates a new `Map` from a raw board layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout fails to parse.
    pub fn new(raw_board: &[&str]) -> GameResult<Map> {
        Ok(Self::from_parsed(MapTileParser::parse_board(raw_board)?))
    }

    fn from_parsed(parsed: ParsedMap) -> Map {
        let grid = Grid::new(parsed.tiles);
        let [blinky, pinky, inky, clyde] = parsed.ghost_starts;
        let start_positions = StartPositions {
            player: parsed.player_start,
            blinky,
            pinky,
            inky,
            clyde,
            fruit: parsed.fruit_spawn,
            retreat: IVec2::new(1, grid.height() - 2),
        };
        Map { grid, start_positions }
    }
}

/// Every playable level layout, parsed once when the game is built.
///
/// Levels cycle through the templates, so level `n` uses template `(n - 1) mod count`.
#[derive(Resource, Debug, Clone)]
pub struct LevelTemplates {
    maps: Vec<Map>,
}

impl LevelTemplates {
    /// Parses every template up front so a malformed one fails at load time, never mid-tick.
    ///
    /// # Errors
    ///
    /// Returns an error if no templates are given or any of them fails to parse.
    pub fn new(templates: &[&[&str]]) -> GameResult<Self> {
        if templates.is_empty() {
            return Err(MapError::NoTemplates.into());
        }

        let maps = templates.iter().map(|raw| Map::new(raw)).collect::<GameResult<Vec<_>>>()?;
        for (index, map) in maps.iter().enumerate() {
            if map.grid.remaining_pellets() == 0 {
                return Err(MapError::InvalidConfig(format!("template {index} has no pellets to clear")).into());
            }
        }

        debug!(count = maps.len(), "Level templates loaded");
        Ok(Self { maps })
    }

    /// A fresh copy of the map for the given 1-based level number.
    pub fn for_level(&self, level: u32) -> Map {
        let index = (level.max(1) as usize - 1) % self.maps.len();
        self.maps[index].clone()
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}
