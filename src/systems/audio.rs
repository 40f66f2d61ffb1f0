//! Audio cue plumbing.
//!
//! Gameplay systems write [`AudioEvent`]s; [`audio_system`] hands them to whatever
//! [`AudioSink`] the game was built with. Sinks are fire-and-forget, and muting drops
//! cues before they reach the sink, so the simulation never depends on sound.

use std::sync::Arc;

use bevy_ecs::{
    event::{Event, EventReader},
    resource::Resource,
    system::{Res, ResMut},
};
use parking_lot::Mutex;
use tracing::trace;

/// Resource for tracking audio state
#[derive(Resource, Debug, Clone, Default)]
pub struct AudioState {
    /// Whether audio is currently muted
    pub muted: bool,
}

/// Sound cues raised by the simulation.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum AudioEvent {
    PelletEaten,
    PowerPelletEaten,
    GhostDefeated,
    LifeLost,
    GameOver,
    LevelClear,
    FruitCollected,
    /// One note of the background music.
    MusicNote { frequency: f32, duration_ticks: u32 },
}

/// Something that can play cues. Implementations must not block the tick.
pub trait AudioSink: Send + Sync {
    fn play(&mut self, event: &AudioEvent);
}

/// Discards every cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _event: &AudioEvent) {}
}

/// Collects cues in memory. Clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    played: Arc<Mutex<Vec<AudioEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of everything played so far, oldest first.
    pub fn played(&self) -> Vec<AudioEvent> {
        self.played.lock().clone()
    }

    pub fn clear(&self) {
        self.played.lock().clear();
    }
}

impl AudioSink for RecordingSink {
    fn play(&mut self, event: &AudioEvent) {
        self.played.lock().push(*event);
    }
}

/// Holds the sink the game plays through.
#[derive(Resource)]
pub struct AudioResource(pub Box<dyn AudioSink>);

impl AudioResource {
    pub fn new(sink: impl AudioSink + 'static) -> Self {
        Self(Box::new(sink))
    }
}

impl Default for AudioResource {
    fn default() -> Self {
        Self::new(NullSink)
    }
}

/// Forwards this tick's cues to the sink unless muted.
pub fn audio_system(mut audio: ResMut<AudioResource>, state: Res<AudioState>, mut events: EventReader<AudioEvent>) {
    for event in events.read() {
        if state.muted {
            trace!(?event, "Skipping cue while muted");
            continue;
        }
        trace!(?event, "Playing cue");
        audio.0.play(event);
    }
}
