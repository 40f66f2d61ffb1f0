//! This module contains the game map: tiles, the grid, template parsing, and level selection.

pub mod builder;
pub mod direction;
pub mod grid;
pub mod parser;
pub mod tile;
