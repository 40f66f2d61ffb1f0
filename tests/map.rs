use glam::IVec2;
use mazechase::{
    constants::LEVEL_TEMPLATES,
    error::{GameError, MapError, ParseError},
    game::Game,
    map::{
        builder::{LevelTemplates, Map},
        direction::Direction,
        grid::Grid,
        parser::MapTileParser,
        tile::Tile,
    },
};
use speculoos::prelude::*;

mod common;

#[test]
fn test_parse_test_maze() {
    let parsed = MapTileParser::parse_board(common::TEST_MAZE).expect("test maze parses");

    assert_that(&parsed.player_start).is_equal_to(IVec2::new(1, 1));
    assert_that(&parsed.fruit_spawn).is_equal_to(IVec2::new(7, 1));
    assert_that(&parsed.ghost_starts).is_equal_to([
        IVec2::new(1, 5),
        IVec2::new(3, 5),
        IVec2::new(5, 5),
        IVec2::new(7, 5),
    ]);
    // Markers leave walkable floor behind.
    assert_that(&parsed.tiles[1][1]).is_equal_to(Tile::Empty);
    assert_that(&parsed.tiles[1][3]).is_equal_to(Tile::PowerPellet);
}

#[test]
fn test_parse_rejects_empty_board() {
    assert_that(&MapTileParser::parse_board(&[]).unwrap_err()).is_equal_to(ParseError::EmptyBoard);
    assert_that(&MapTileParser::parse_board(&[""]).unwrap_err()).is_equal_to(ParseError::EmptyBoard);
}

#[test]
fn test_parse_rejects_ragged_rows() {
    let mut board = common::TEST_MAZE.to_vec();
    board[2] = "#.###.#";

    let err = MapTileParser::parse_board(&board).unwrap_err();
    assert_that(&err).is_equal_to(ParseError::RaggedRow {
        row: 2,
        expected: 9,
        found: 7,
    });
}

#[test]
fn test_parse_rejects_missing_marker() {
    let mut board = common::TEST_MAZE.to_vec();
    board[1] = "#X.o....#";

    let err = MapTileParser::parse_board(&board).unwrap_err();
    assert_that(&err).is_equal_to(ParseError::MissingMarker('F'));
}

#[test]
fn test_parse_rejects_duplicate_marker() {
    let mut board = common::TEST_MAZE.to_vec();
    board[3] = "#...X...#";

    let err = MapTileParser::parse_board(&board).unwrap_err();
    assert_that(&err).is_equal_to(ParseError::DuplicateMarker('X'));
}

#[test]
fn test_parse_rejects_unknown_character() {
    let mut board = common::TEST_MAZE.to_vec();
    board[3] = "#...?...#";

    let err = MapTileParser::parse_board(&board).unwrap_err();
    assert_that(&err).is_equal_to(ParseError::UnknownCharacter('?'));
}

#[test]
fn test_built_in_templates_load() {
    let templates = LevelTemplates::new(&LEVEL_TEMPLATES).expect("built-in templates load");
    assert_that(&templates.len()).is_equal_to(LEVEL_TEMPLATES.len());

    let map = templates.for_level(1);
    assert_that(&map.grid.width()).is_equal_to(20);
    assert_that(&map.grid.height()).is_equal_to(21);
    assert_that(&map.start_positions.retreat).is_equal_to(IVec2::new(1, 19));
}

#[test]
fn test_templates_cycle_by_level() {
    let templates = LevelTemplates::new(&[common::ONE_PELLET_MAZE, common::TEST_MAZE]).expect("mazes load");

    assert_that(&templates.for_level(1).grid.remaining_pellets()).is_equal_to(1);
    assert_that(&templates.for_level(2).grid.remaining_pellets()).is_equal_to(14);
    assert_that(&templates.for_level(3).grid.remaining_pellets()).is_equal_to(1);
}

#[test]
fn test_for_level_returns_fresh_copy() {
    let templates = LevelTemplates::new(&[common::TEST_MAZE]).expect("maze loads");
    let mut first = templates.for_level(1);
    first.grid.consume(IVec2::new(2, 1));

    assert_that(&templates.for_level(1).grid.remaining_pellets()).is_equal_to(14);
}

#[test]
fn test_templates_require_pellets() {
    let empty = LevelTemplates::new(&[]);
    assert_that(&matches!(empty, Err(GameError::Map(MapError::NoTemplates)))).is_true();

    let no_pellets: &[&str] = &["#######", "#X F  #", "#1234 #", "#######"];
    let result = LevelTemplates::new(&[no_pellets]);
    assert_that(&matches!(result, Err(GameError::Map(MapError::InvalidConfig(_))))).is_true();
}

#[test]
fn test_malformed_template_fails_game_construction() {
    let broken: &[&str] = &["#####", "#X..#", "####"];
    let result = Game::with_templates(common::fast_config(), &[broken]);
    assert_that(&matches!(result, Err(GameError::MapParse(ParseError::RaggedRow { .. })))).is_true();
}

#[test]
fn test_grid_bounds_and_passability() {
    let map = Map::new(common::TEST_MAZE).expect("maze loads");
    let grid = &map.grid;

    assert_that(&grid.get(IVec2::new(0, 0))).is_equal_to(Some(Tile::Wall));
    assert_that(&grid.get(IVec2::new(-1, 0))).is_none();
    assert_that(&grid.get(IVec2::new(0, 7))).is_none();
    assert_that(&grid.is_passable(IVec2::new(1, 1))).is_true();
    assert_that(&grid.is_passable(IVec2::new(0, 1))).is_false();
    assert_that(&grid.is_passable(IVec2::new(1, -1))).is_false();
}

#[test]
fn test_grid_wraps_horizontally_only() {
    let map = Map::new(LEVEL_TEMPLATES[0]).expect("template loads");
    let grid = &map.grid;

    assert_that(&grid.neighbor(IVec2::new(0, 9), Direction::Left)).is_equal_to(IVec2::new(19, 9));
    assert_that(&grid.neighbor(IVec2::new(19, 9), Direction::Right)).is_equal_to(IVec2::new(0, 9));
    assert_that(&grid.is_wrap(IVec2::new(0, 9), IVec2::new(19, 9))).is_true();
    assert_that(&grid.neighbor(IVec2::new(4, 0), Direction::Up)).is_equal_to(IVec2::new(4, -1));
}

#[test]
fn test_den_is_impassable() {
    let map = Map::new(LEVEL_TEMPLATES[0]).expect("template loads");
    let den = IVec2::new(7, 8);

    assert_that(&map.grid.get(den)).is_equal_to(Some(Tile::Den));
    assert_that(&map.grid.is_passable(den)).is_false();
}

#[test]
fn test_consume_leaves_eaten_tile() {
    let mut map = Map::new(common::TEST_MAZE).expect("maze loads");

    assert_that(&map.grid.consume(IVec2::new(3, 1))).is_equal_to(Some(Tile::PowerPellet));
    assert_that(&map.grid.get(IVec2::new(3, 1))).is_equal_to(Some(Tile::Eaten));
    assert_that(&map.grid.consume(IVec2::new(3, 1))).is_none();
    assert_that(&map.grid.consume(IVec2::new(0, 0))).is_none();
    assert_that(&map.grid.remaining_pellets()).is_equal_to(13);
}

#[test]
fn test_pixel_conversion() {
    assert_that(&Grid::tile_to_pixel(IVec2::new(3, 2), 20)).is_equal_to(IVec2::new(60, 40));
}
