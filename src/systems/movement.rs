use bevy_ecs::component::Component;
use bevy_ecs::system::{Query, Res};
use glam::IVec2;
use tracing::trace;

use crate::map::direction::Direction;
use crate::map::grid::Grid;
use crate::systems::components::Session;

/// Tile-to-tile movement shared by the player and the ghosts.
///
/// The logical tile changes instantly when a step is taken; the pixel position then
/// slides toward the new tile at a fixed speed. All game rules read `tile`, only
/// capture detection and rendering read `pixel`.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct GridStepper {
    start_tile: IVec2,
    /// The authoritative logical position.
    pub tile: IVec2,
    /// The visual position, in pixels.
    pub pixel: IVec2,
    /// Where `pixel` is heading: the pixel origin of `tile`.
    pub target_pixel: IVec2,
    /// The current heading, `None` until the first step.
    pub direction: Option<Direction>,
    moving: bool,
}

impl GridStepper {
    pub fn new(start_tile: IVec2, tile_size: i32) -> Self {
        let pixel = Grid::tile_to_pixel(start_tile, tile_size);
        Self {
            start_tile,
            tile: start_tile,
            pixel,
            target_pixel: pixel,
            direction: None,
            moving: false,
        }
    }

    pub fn start_tile(&self) -> IVec2 {
        self.start_tile
    }

    /// Whether the entity is still sliding toward its tile. A new step can only begin once this is false.
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Puts the entity back on its start tile, stationary and without a heading.
    pub fn reset(&mut self, tile_size: i32) {
        *self = Self::new(self.start_tile, tile_size);
    }

    /// Moves the start tile (a new level layout) and resets onto it.
    pub fn relocate(&mut self, start_tile: IVec2, tile_size: i32) {
        *self = Self::new(start_tile, tile_size);
    }

    /// The destination of a step in `direction`, if that step is legal.
    pub fn destination(&self, grid: &Grid, direction: Direction) -> Option<IVec2> {
        let next = grid.neighbor(self.tile, direction);
        grid.is_passable(next).then_some(next)
    }

    /// Begins a step toward the neighbouring tile in `direction`.
    ///
    /// Returns `false` and leaves the entity untouched if it is still moving or the
    /// destination is a wall, the den, or off the board.
    pub fn try_step(&mut self, grid: &Grid, direction: Direction, tile_size: i32) -> bool {
        if self.moving {
            return false;
        }
        let Some(next) = self.destination(grid, direction) else {
            return false;
        };

        let wrapped = grid.is_wrap(self.tile, next);
        self.tile = next;
        self.direction = Some(direction);
        self.target_pixel = Grid::tile_to_pixel(next, tile_size);
        if wrapped {
            // Crossing the tunnel seam jumps instead of sliding across the board.
            self.pixel.x = self.target_pixel.x;
        }
        self.moving = true;
        true
    }

    /// Advances the pixel position toward its target by `speed` on each axis, never overshooting.
    pub fn interpolate(&mut self, speed: i32) {
        self.pixel.x = approach(self.pixel.x, self.target_pixel.x, speed);
        self.pixel.y = approach(self.pixel.y, self.target_pixel.y, speed);
        if self.pixel == self.target_pixel {
            self.moving = false;
        }
    }
}

fn approach(current: i32, target: i32, speed: i32) -> i32 {
    if current < target {
        (current + speed).min(target)
    } else if current > target {
        (current - speed).max(target)
    } else {
        current
    }
}

/// Slides every entity toward its tile at the session's move speed.
pub fn interpolation_system(session: Res<Session>, mut steppers: Query<&mut GridStepper>) {
    for mut stepper in steppers.iter_mut() {
        let was_moving = stepper.is_moving();
        stepper.interpolate(session.move_speed);
        if was_moving && !stepper.is_moving() {
            trace!(tile = ?stepper.tile, "Arrived at tile");
        }
    }
}
