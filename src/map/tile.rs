use strum_macros::AsRefStr;

/// An enum representing the different kinds of cells on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
pub enum Tile {
    /// An empty path tile that never held anything.
    Empty,
    /// A regular pellet.
    Pellet,
    /// A path tile whose pellet or power pellet has been consumed.
    Eaten,
    /// A power pellet.
    PowerPellet,
    /// A wall tile.
    Wall,
    /// Part of the ghost den. Impassable for everyone, ghosts included.
    Den,
}

impl Tile {
    /// Whether an entity may step onto this tile.
    pub const fn is_passable(self) -> bool {
        !matches!(self, Tile::Wall | Tile::Den)
    }

    /// Whether this tile still holds something the player can eat.
    pub const fn is_edible(self) -> bool {
        matches!(self, Tile::Pellet | Tile::PowerPellet)
    }
}
