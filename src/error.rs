//! Centralized error types for the maze-chase game.
//!
//! This module defines all error types used throughout the application,
//! providing a consistent error handling approach.

use std::io;

use bevy_ecs::event::Event;

/// Main error type for the game.
///
/// This is the primary error type that should be used in public APIs. Systems that hit
/// an impossible world state write it as an event instead, and it gets logged.
#[derive(thiserror::Error, Debug, Event)]
pub enum GameError {
    #[error("Map parsing error: {0}")]
    MapParse(#[from] ParseError),

    #[error("Map error: {0}")]
    Map(#[from] MapError),

    /// Writing a rendered frame failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Error type for map parsing operations.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown character in board: {0}")]
    UnknownCharacter(char),
    #[error("Board has no rows")]
    EmptyBoard,
    #[error("Row {row} is {found} tiles wide, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("Board is missing the '{0}' marker")]
    MissingMarker(char),
    #[error("Board has more than one '{0}' marker")]
    DuplicateMarker(char),
}

/// Errors related to map operations.
#[derive(thiserror::Error, Debug)]
pub enum MapError {
    #[error("No level templates were provided")]
    NoTemplates,

    #[error("Invalid map configuration: {0}")]
    InvalidConfig(String),
}

/// Errors from reading or writing the persisted high score.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed high score file: {0}")]
    Format(#[from] serde_json::Error),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
