/// Background music and the crash cue.
///
/// Both clips are synthesized in memory at startup.  Playback goes through
/// rodio when the `audio` feature is enabled and an output device opens;
/// otherwise the music is silent and the crash cue rings the terminal bell.

use std::f32::consts::TAU;
use std::io::Write;

use crossterm::{style::Print, QueueableCommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::entities::SoundCue;

pub const SAMPLE_RATE: u32 = 44_100;
const CRASH_DURATION: f32 = 0.6;
#[cfg(feature = "audio")]
const MUSIC_VOLUME: f32 = 0.3;

/// Bass line of the music loop, one note per beat (Hz).
const MUSIC_NOTES: [f32; 8] = [110.0, 110.0, 146.8, 130.8, 110.0, 110.0, 164.8, 146.8];
const MUSIC_BEAT: f32 = 0.25;

// ── Synthesis ─────────────────────────────────────────────────────────────────

/// Noise burst with a falling low tone under it, decaying to silence.
pub fn crash_samples(sample_rate: u32) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(0x0c4a_5000);
    let len = (sample_rate as f32 * CRASH_DURATION) as usize;
    (0..len)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let env = (1.0 - t / CRASH_DURATION).max(0.0).powi(2);
            let freq = 120.0 - 80.0 * (t / CRASH_DURATION);
            let tone = (TAU * freq * t).sin();
            let noise: f32 = rng.gen_range(-1.0..1.0);
            (0.6 * noise + 0.4 * tone) * env * 0.5
        })
        .collect()
}

/// One bar of square-ish bass; loops seamlessly.
pub fn music_samples(sample_rate: u32) -> Vec<f32> {
    let beat_len = (sample_rate as f32 * MUSIC_BEAT) as usize;
    MUSIC_NOTES
        .iter()
        .flat_map(|&freq| {
            (0..beat_len).map(move |i| {
                let t = i as f32 / sample_rate as f32;
                let env = (1.0 - t / MUSIC_BEAT).max(0.0);
                let wave =
                    (TAU * freq * t).sin().signum() * 0.5 + (TAU * freq * 2.0 * t).sin() * 0.2;
                wave * env * 0.2
            })
        })
        .collect()
}

// ── Output ────────────────────────────────────────────────────────────────────

#[cfg(feature = "audio")]
mod backend {
    use anyhow::Result;
    use rodio::{buffer::SamplesBuffer, OutputStream, OutputStreamHandle, Sink, Source};

    pub struct Output {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        music: Sink,
    }

    impl Output {
        pub fn open() -> Result<Self> {
            let (stream, handle) = OutputStream::try_default()?;
            let music = Sink::try_new(&handle)?;
            Ok(Self {
                _stream: stream,
                handle,
                music,
            })
        }

        pub fn loop_music(&self, samples: Vec<f32>, volume: f32) {
            let source = SamplesBuffer::new(1, super::SAMPLE_RATE, samples);
            self.music.set_volume(volume);
            self.music.append(source.repeat_infinite());
        }

        pub fn play_once(&self, samples: Vec<f32>) -> Result<()> {
            let sink = Sink::try_new(&self.handle)?;
            sink.append(SamplesBuffer::new(1, super::SAMPLE_RATE, samples));
            sink.detach();
            Ok(())
        }
    }
}

pub struct Audio {
    #[cfg(feature = "audio")]
    output: Option<backend::Output>,
    crash: Vec<f32>,
}

impl Audio {
    #[cfg(feature = "audio")]
    pub fn new() -> Self {
        let output = match backend::Output::open() {
            Ok(output) => Some(output),
            Err(err) => {
                tracing::warn!(%err, "no audio output, falling back to terminal bell");
                None
            }
        };
        Self {
            output,
            crash: crash_samples(SAMPLE_RATE),
        }
    }

    #[cfg(not(feature = "audio"))]
    pub fn new() -> Self {
        debug!("built without audio feature, using terminal bell");
        Self {
            crash: crash_samples(SAMPLE_RATE),
        }
    }

    /// Start the looping background track, if there is anything to play on.
    #[cfg(feature = "audio")]
    pub fn start_music(&self) {
        if let Some(output) = &self.output {
            output.loop_music(music_samples(SAMPLE_RATE), MUSIC_VOLUME);
            debug!("background music started");
        }
    }

    #[cfg(not(feature = "audio"))]
    pub fn start_music(&self) {}

    #[cfg(feature = "audio")]
    fn play_samples(&self, samples: &[f32]) -> bool {
        let Some(output) = &self.output else {
            return false;
        };
        match output.play_once(samples.to_vec()) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, "could not play sound");
                false
            }
        }
    }

    #[cfg(not(feature = "audio"))]
    fn play_samples(&self, _samples: &[f32]) -> bool {
        false
    }

    /// Play `cue`; rings the terminal bell when no sound output is available.
    pub fn play<W: Write>(&self, out: &mut W, cue: SoundCue) -> std::io::Result<()> {
        let samples = match cue {
            SoundCue::Crash => &self.crash,
        };
        if !self.play_samples(samples) {
            debug!(?cue, "ringing bell");
            out.queue(Print('\x07'))?;
        }
        Ok(())
    }
}

impl Default for Audio {
    fn default() -> Self {
        Self::new()
    }
}
