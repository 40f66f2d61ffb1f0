//! Map parsing functionality for converting raw board layouts into structured data.

use glam::IVec2;

use crate::error::ParseError;
use crate::map::tile::Tile;

/// Characters marking the ghost start tiles, in `Ghost` order (Blinky, Pinky, Inky, Clyde).
const GHOST_MARKERS: [char; 4] = ['1', '2', '3', '4'];
const PLAYER_MARKER: char = 'X';
const FRUIT_MARKER: char = 'F';

/// Represents the parsed data from a raw board layout.
#[derive(Debug, Clone)]
pub struct ParsedMap {
    /// The parsed tile layout, `[row][col]`.
    pub tiles: Vec<Vec<Tile>>,
    /// The player's starting tile.
    pub player_start: IVec2,
    /// Each ghost's starting tile, in `Ghost` order.
    pub ghost_starts: [IVec2; 4],
    /// Where bonus fruit appears.
    pub fruit_spawn: IVec2,
}

/// Parser for converting raw board layouts into structured map data.
pub struct MapTileParser;

impl MapTileParser {
    /// Parses a single character into a map tile.
    ///
    /// Start and spawn markers are plain empty path.
    pub fn parse_character(c: char) -> Result<Tile, ParseError> {
        match c {
            '#' => Ok(Tile::Wall),
            '.' => Ok(Tile::Pellet),
            'o' => Ok(Tile::PowerPellet),
            ' ' => Ok(Tile::Empty),
            '=' => Ok(Tile::Den),
            PLAYER_MARKER | FRUIT_MARKER => Ok(Tile::Empty),
            c if GHOST_MARKERS.contains(&c) => Ok(Tile::Empty),
            _ => Err(ParseError::UnknownCharacter(c)),
        }
    }

    /// Parses a raw board layout into structured map data.
    ///
    /// # Errors
    ///
    /// Returns an error if the board is empty or ragged, contains unknown characters,
    /// or does not carry exactly one of each start marker.
    pub fn parse_board(raw_board: &[&str]) -> Result<ParsedMap, ParseError> {
        let width = raw_board.first().ok_or(ParseError::EmptyBoard)?.chars().count();
        if width == 0 {
            return Err(ParseError::EmptyBoard);
        }

        let mut tiles = Vec::with_capacity(raw_board.len());
        let mut player_start = None;
        let mut ghost_starts = [None; 4];
        let mut fruit_spawn = None;

        for (y, line) in raw_board.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(ParseError::RaggedRow { row: y, expected: width, found });
            }

            let mut row = Vec::with_capacity(width);
            for (x, character) in line.chars().enumerate() {
                let tile = Self::parse_character(character)?;
                let pos = IVec2::new(x as i32, y as i32);

                // Track special positions
                let slot = match character {
                    PLAYER_MARKER => Some(&mut player_start),
                    FRUIT_MARKER => Some(&mut fruit_spawn),
                    c => match GHOST_MARKERS.iter().position(|m| *m == c) {
                        Some(i) => Some(&mut ghost_starts[i]),
                        None => None,
                    },
                };
                if let Some(slot) = slot {
                    if slot.replace(pos).is_some() {
                        return Err(ParseError::DuplicateMarker(character));
                    }
                }

                row.push(tile);
            }
            tiles.push(row);
        }

        let player_start = player_start.ok_or(ParseError::MissingMarker(PLAYER_MARKER))?;
        let fruit_spawn = fruit_spawn.ok_or(ParseError::MissingMarker(FRUIT_MARKER))?;
        let mut starts = [IVec2::ZERO; 4];
        for (i, start) in ghost_starts.iter().enumerate() {
            starts[i] = start.ok_or(ParseError::MissingMarker(GHOST_MARKERS[i]))?;
        }

        Ok(ParsedMap {
            tiles,
            player_start,
            ghost_starts: starts,
            fruit_spawn,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::LEVEL_TEMPLATES;

    #[test]
    fn test_parse_character() {
        assert!(matches!(MapTileParser::parse_character('#').unwrap(), Tile::Wall));
        assert!(matches!(MapTileParser::parse_character('.').unwrap(), Tile::Pellet));
        assert!(matches!(MapTileParser::parse_character('o').unwrap(), Tile::PowerPellet));
        assert!(matches!(MapTileParser::parse_character(' ').unwrap(), Tile::Empty));
        assert!(matches!(MapTileParser::parse_character('=').unwrap(), Tile::Den));
        assert!(matches!(MapTileParser::parse_character('X').unwrap(), Tile::Empty));
        assert!(matches!(MapTileParser::parse_character('3').unwrap(), Tile::Empty));

        // Test invalid character
        assert!(MapTileParser::parse_character('Z').is_err());
    }

    #[test]
    fn test_parse_board() {
        let parsed = MapTileParser::parse_board(LEVEL_TEMPLATES[0]).unwrap();

        assert_eq!(parsed.tiles.len(), 21);
        assert_eq!(parsed.tiles[0].len(), 20);
        assert_eq!(parsed.player_start, IVec2::new(1, 1));
        assert_eq!(parsed.ghost_starts[0], IVec2::new(9, 10));
        assert_eq!(parsed.ghost_starts[3], IVec2::new(10, 9));
        assert_eq!(parsed.fruit_spawn, IVec2::new(9, 14));
    }

    #[test]
    fn test_parse_board_invalid_character() {
        let mut invalid_board = LEVEL_TEMPLATES[0].to_vec();
        invalid_board[0] = "###################Z";

        let result = MapTileParser::parse_board(&invalid_board);
        assert!(matches!(result.unwrap_err(), ParseError::UnknownCharacter('Z')));
    }
}
