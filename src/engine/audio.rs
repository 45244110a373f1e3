// Audio cue intents
//
// Gameplay code only says *what* should be heard; decoding, mixing and volume
// belong to whatever sink the session injects.

use log::debug;

/// Sounds the player controller can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    Jump,
    Run,
    Crouch,
    Fall,
    Damage,
    RopeGrab,
}

impl AudioCue {
    /// Suggested playback volume, mirrors the mix the sprites were tuned with
    pub fn volume(&self) -> f32 {
        match self {
            Self::Jump => 0.4,
            _ => 1.0,
        }
    }
}

/// Fire-and-forget audio output
pub trait AudioSink {
    /// Play a cue once
    fn play(&mut self, cue: AudioCue);

    /// Start a cue looping until stopped
    fn play_looped(&mut self, cue: AudioCue);

    /// Stop a cue (no-op if it isn't playing)
    fn stop(&mut self, cue: AudioCue);
}

/// Sink that only logs, used by the demo binary
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, cue: AudioCue) {
        debug!("audio: play {:?} @ {:.1}", cue, cue.volume());
    }

    fn play_looped(&mut self, cue: AudioCue) {
        debug!("audio: loop {:?} @ {:.1}", cue, cue.volume());
    }

    fn stop(&mut self, cue: AudioCue) {
        debug!("audio: stop {:?}", cue);
    }
}

/// What a sink was asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueCommand {
    Play(AudioCue),
    Loop(AudioCue),
    Stop(AudioCue),
}

/// Sink that remembers every request, for tests
#[derive(Debug, Default)]
pub struct CueRecorder {
    pub commands: Vec<CueCommand>,
}

impl CueRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, command: CueCommand) -> bool {
        self.commands.contains(&command)
    }

    pub fn count(&self, command: CueCommand) -> usize {
        self.commands.iter().filter(|c| **c == command).count()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl AudioSink for CueRecorder {
    fn play(&mut self, cue: AudioCue) {
        self.commands.push(CueCommand::Play(cue));
    }

    fn play_looped(&mut self, cue: AudioCue) {
        self.commands.push(CueCommand::Loop(cue));
    }

    fn stop(&mut self, cue: AudioCue) {
        self.commands.push(CueCommand::Stop(cue));
    }
}
