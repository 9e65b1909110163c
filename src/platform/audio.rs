//! Audio provider
//!
//! Playback belongs to the host engine. The core only asks for a sound
//! effect at a given gain.

use crate::sim::SoundEffect;

/// Fire-and-forget sound playback
pub trait AudioSink {
    /// Play `effect` at `volume` (0.0 - 1.0, already mixed)
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Logs each sound at trace level and counts them, for headless runs
#[derive(Debug, Clone, Default)]
pub struct LogAudio {
    pub played: usize,
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        if volume <= 0.0 {
            return;
        }
        self.played += 1;
        log::trace!("sfx {:?} at {:.2}", effect, volume);
    }
}

impl<A: AudioSink + ?Sized> AudioSink for &mut A {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        (**self).play(effect, volume);
    }
}
