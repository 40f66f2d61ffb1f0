//! The tile grid every entity moves on.

use glam::IVec2;

use crate::map::direction::Direction;
use crate::map::tile::Tile;

/// A rectangular board of tiles, indexed `[row][col]` with row 0 at the top.
///
/// Horizontal movement wraps between column 0 and the last column of the same row;
/// vertical movement never wraps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    tiles: Vec<Vec<Tile>>,
    width: i32,
    height: i32,
}

impl Grid {
    /// Builds a grid from rows of equal width. Row validation happens in the parser.
    pub fn new(tiles: Vec<Vec<Tile>>) -> Self {
        let height = tiles.len() as i32;
        let width = tiles.first().map_or(0, |row| row.len() as i32);
        Self { tiles, width, height }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Returns the tile at `pos`, or `None` when it lies off the board.
    pub fn get(&self, pos: IVec2) -> Option<Tile> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        Some(self.tiles[pos.y as usize][pos.x as usize])
    }

    /// The tile one step from `pos` in `direction`, wrapping horizontally at the tunnel columns.
    ///
    /// The result may still be off the board vertically; [`Grid::is_passable`] treats that as blocked.
    pub fn neighbor(&self, pos: IVec2, direction: Direction) -> IVec2 {
        let mut next = pos + direction.as_ivec2();
        if next.x < 0 {
            next.x = self.width - 1;
        } else if next.x >= self.width {
            next.x = 0;
        }
        next
    }

    /// Whether an entity may occupy `pos`. Off-board positions are never passable.
    pub fn is_passable(&self, pos: IVec2) -> bool {
        self.get(pos).is_some_and(Tile::is_passable)
    }

    /// Whether a step from `from` to `to` crosses the tunnel seam.
    pub fn is_wrap(&self, from: IVec2, to: IVec2) -> bool {
        (from.x == 0 && to.x == self.width - 1) || (from.x == self.width - 1 && to.x == 0)
    }

    /// Consumes whatever edible item sits at `pos`, leaving an eaten tile behind.
    ///
    /// Returns the tile that was consumed, or `None` if there was nothing to eat.
    pub fn consume(&mut self, pos: IVec2) -> Option<Tile> {
        let tile = self.get(pos)?;
        if !tile.is_edible() {
            return None;
        }
        self.tiles[pos.y as usize][pos.x as usize] = Tile::Eaten;
        Some(tile)
    }

    /// Counts the pellets and power pellets still on the board.
    pub fn remaining_pellets(&self) -> usize {
        self.tiles.iter().flatten().filter(|tile| tile.is_edible()).count()
    }

    /// Iterates rows of tiles, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.iter().map(Vec::as_slice)
    }

    /// The pixel origin of a tile.
    pub fn tile_to_pixel(pos: IVec2, tile_size: i32) -> IVec2 {
        pos * tile_size
    }
}
