use bevy_ecs::event::Event;

use crate::map::direction::Direction;

/// Intents delivered by an input source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCommand {
    Exit,
    MovePlayer(Direction),
    /// Leave the title screen.
    Start,
    TogglePause,
    /// Begin a fresh session after game over.
    Restart,
    /// Continue to the next level after a clear.
    AdvanceLevel,
    ToggleMute,
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Command(GameCommand),
}

impl From<GameCommand> for GameEvent {
    fn from(command: GameCommand) -> Self {
        GameEvent::Command(command)
    }
}

/// Requests raised during a tick for the stage machine to carry out.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageTransition {
    /// A ghost caught the player.
    LifeLost,
}
