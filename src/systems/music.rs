use bevy_ecs::{
    event::EventWriter,
    resource::Resource,
    system::{Res, ResMut},
};
use tracing::{debug, trace};

use crate::systems::audio::{AudioEvent, AudioState};
use crate::systems::components::Session;

/// A looping four-note phrase and how many ticks each note lasts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicPattern {
    pub tempo_ticks: u32,
    pub notes: [f32; 4],
}

/// Level 1, 2 and 3 patterns; later levels cycle back through them.
pub const PATTERNS: [MusicPattern; 3] = [
    MusicPattern {
        tempo_ticks: 15,
        notes: [130.81, 146.83, 164.81, 146.83],
    },
    MusicPattern {
        tempo_ticks: 12,
        notes: [146.83, 164.81, 174.61, 164.81],
    },
    MusicPattern {
        tempo_ticks: 9,
        notes: [164.81, 196.00, 220.00, 196.00],
    },
];

impl MusicPattern {
    pub fn for_level(level: u32) -> MusicPattern {
        PATTERNS[(level.max(1) as usize - 1) % PATTERNS.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MusicTask {
    /// Ticks until the next note.
    wait: u32,
    note: usize,
}

/// The background music loop, as an explicit task that is started and cancelled.
///
/// Nothing polls the stage to decide whether to keep playing: whatever pauses, ends
/// or interrupts play cancels the task, and whatever resumes play starts a fresh one.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackgroundMusic {
    task: Option<MusicTask>,
}

impl BackgroundMusic {
    /// Starts a fresh loop from its first note, replacing any running one.
    pub fn start(&mut self) {
        self.start_after(0);
    }

    /// Starts a fresh loop whose first note plays after `delay_ticks`.
    pub fn start_after(&mut self, delay_ticks: u32) {
        self.task = Some(MusicTask {
            wait: delay_ticks,
            note: 0,
        });
    }

    /// Drops the loop along with any pending note.
    pub fn cancel(&mut self) {
        self.task = None;
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Advances one tick, returning the note to play if one is due.
    pub fn tick(&mut self, level: u32) -> Option<AudioEvent> {
        let task = self.task.as_mut()?;
        if task.wait > 0 {
            task.wait -= 1;
            return None;
        }

        let pattern = MusicPattern::for_level(level);
        let frequency = pattern.notes[task.note % pattern.notes.len()];
        task.note = (task.note + 1) % pattern.notes.len();
        task.wait = pattern.tempo_ticks.saturating_sub(1);
        Some(AudioEvent::MusicNote {
            frequency,
            duration_ticks: pattern.tempo_ticks * 9 / 10,
        })
    }
}

/// Plays the next background note when one is due.
pub fn music_system(
    session: Res<Session>,
    audio_state: Res<AudioState>,
    mut music: ResMut<BackgroundMusic>,
    mut audio: EventWriter<AudioEvent>,
) {
    if audio_state.muted && music.is_running() {
        debug!("Cancelling music while muted");
        music.cancel();
        return;
    }

    if let Some(note) = music.tick(session.level) {
        trace!(?note, "Music note");
        audio.write(note);
    }
}
