/// Fire-and-forget audio cues raised by the simulation.
///
/// The core only says *which* cue happened; the host decides how (or
/// whether) to play it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioCue {
    Shoot,
    PlayerHit,
    AlienKilled,
    LevelUp,
    Victory,
    Defeat,
}

impl AudioCue {
    pub fn name(&self) -> &'static str {
        match self {
            AudioCue::Shoot => "shoot",
            AudioCue::PlayerHit => "player-hit",
            AudioCue::AlienKilled => "alien-killed",
            AudioCue::LevelUp => "level-up",
            AudioCue::Victory => "victory",
            AudioCue::Defeat => "defeat",
        }
    }
}

/// Anything that can play cues. The terminal host only logs them.
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

/// Sink that records every cue, handy for tests and replays.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub cues: Vec<AudioCue>,
}

impl AudioSink for RecordingSink {
    fn play(&mut self, cue: AudioCue) {
        self.cues.push(cue);
    }
}
