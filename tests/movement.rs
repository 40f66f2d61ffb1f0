use glam::IVec2;
use mazechase::{
    map::{direction::Direction, grid::Grid, tile::Tile},
    systems::GridStepper,
};
use speculoos::prelude::*;

const TILE: i32 = 20;

/// One open row, so every horizontal step is legal and the ends wrap.
fn tunnel() -> Grid {
    Grid::new(vec![vec![Tile::Empty; 5]])
}

#[test]
fn test_step_moves_logical_tile_immediately() {
    let grid = tunnel();
    let mut stepper = GridStepper::new(IVec2::new(1, 0), TILE);

    assert_that(&stepper.try_step(&grid, Direction::Right, TILE)).is_true();
    assert_that(&stepper.tile).is_equal_to(IVec2::new(2, 0));
    assert_that(&stepper.pixel).is_equal_to(IVec2::new(20, 0));
    assert_that(&stepper.target_pixel).is_equal_to(IVec2::new(40, 0));
    assert_that(&stepper.is_moving()).is_true();
}

#[test]
fn test_no_new_step_while_moving() {
    let grid = tunnel();
    let mut stepper = GridStepper::new(IVec2::new(1, 0), TILE);
    stepper.try_step(&grid, Direction::Right, TILE);

    assert_that(&stepper.try_step(&grid, Direction::Right, TILE)).is_false();
    assert_that(&stepper.tile).is_equal_to(IVec2::new(2, 0));
}

#[test]
fn test_interpolation_never_overshoots() {
    let grid = tunnel();
    let mut stepper = GridStepper::new(IVec2::new(1, 0), TILE);
    stepper.try_step(&grid, Direction::Right, TILE);

    let mut xs = Vec::new();
    while stepper.is_moving() {
        stepper.interpolate(3);
        xs.push(stepper.pixel.x);
    }
    assert_that(&xs).is_equal_to(vec![23, 26, 29, 32, 35, 38, 40]);

    stepper.interpolate(3);
    assert_that(&stepper.pixel).is_equal_to(IVec2::new(40, 0));
}

#[test]
fn test_step_into_blocked_tile_is_refused() {
    let grid = Grid::new(vec![vec![Tile::Wall, Tile::Empty, Tile::Den]]);
    let mut stepper = GridStepper::new(IVec2::new(1, 0), TILE);

    assert_that(&stepper.try_step(&grid, Direction::Right, TILE)).is_false();
    assert_that(&stepper.try_step(&grid, Direction::Up, TILE)).is_false();
    assert_that(&stepper.try_step(&grid, Direction::Down, TILE)).is_false();
    assert_that(&stepper.tile).is_equal_to(IVec2::new(1, 0));
    assert_that(&stepper.direction).is_none();
    assert_that(&stepper.is_moving()).is_false();
}

#[test]
fn test_wrap_snaps_across_the_seam() {
    let grid = tunnel();
    let mut stepper = GridStepper::new(IVec2::new(0, 0), TILE);

    assert_that(&stepper.try_step(&grid, Direction::Left, TILE)).is_true();
    assert_that(&stepper.tile).is_equal_to(IVec2::new(4, 0));
    // No slide back across the whole board.
    assert_that(&stepper.pixel).is_equal_to(IVec2::new(80, 0));

    stepper.interpolate(3);
    assert_that(&stepper.is_moving()).is_false();
}

#[test]
fn test_reset_returns_to_start() {
    let grid = tunnel();
    let mut stepper = GridStepper::new(IVec2::new(2, 0), TILE);
    stepper.try_step(&grid, Direction::Left, TILE);
    stepper.interpolate(TILE);

    stepper.reset(TILE);
    assert_that(&stepper).is_equal_to(&GridStepper::new(IVec2::new(2, 0), TILE));

    stepper.relocate(IVec2::new(4, 0), TILE);
    assert_that(&stepper.start_tile()).is_equal_to(IVec2::new(4, 0));
    assert_that(&stepper.pixel).is_equal_to(IVec2::new(80, 0));
}

#[test]
fn test_direction_vectors() {
    assert_that(&Direction::Up.as_ivec2()).is_equal_to(IVec2::new(0, -1));
    assert_that(&Direction::Down.as_ivec2()).is_equal_to(IVec2::new(0, 1));
    assert_that(&Direction::Left.as_ivec2()).is_equal_to(IVec2::new(-1, 0));
    assert_that(&Direction::Right.as_ivec2()).is_equal_to(IVec2::new(1, 0));
}
