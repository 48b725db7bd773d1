//! Audio feedback
//!
//! Every cue is a single procedurally generated tone - no external files needed.
//! The engine only emits [`Cue`]s; a [`ToneSink`] turns them into sound.

use serde::Serialize;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// A single tone: what the audio collaborator is asked to play
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToneSpec {
    /// Frequency in Hz
    pub frequency: f32,
    /// Length in seconds
    pub duration_secs: f32,
    pub waveform: Waveform,
    /// Gain (0.0 - 1.0) before master/sfx scaling
    pub volume: f32,
}

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cue {
    /// Drop collected
    Collect,
    /// Drop expired uncollected
    Miss,
    /// Contaminant touched
    HazardHit,
    /// Filter power-up activated
    Filter,
    /// Bucket power-up activated
    Bucket,
    /// Goal reached when the clock ran out
    Win,
    /// Out of lives or short of the goal
    Lose,
}

impl Cue {
    /// Tone parameters for this cue
    pub fn tone(self) -> ToneSpec {
        let (frequency, duration_secs, waveform, volume) = match self {
            Cue::Collect => (880.0, 0.06, Waveform::Triangle, 0.06),
            Cue::Miss => (220.0, 0.08, Waveform::Sine, 0.05),
            Cue::HazardHit => (140.0, 0.12, Waveform::Square, 0.07),
            Cue::Filter => (520.0, 0.1, Waveform::Sawtooth, 0.06),
            Cue::Bucket => (660.0, 0.1, Waveform::Sawtooth, 0.06),
            Cue::Win => (880.0, 0.2, Waveform::Triangle, 0.08),
            Cue::Lose => (180.0, 0.2, Waveform::Triangle, 0.08),
        };
        ToneSpec {
            frequency,
            duration_secs,
            waveform,
            volume,
        }
    }
}

/// Anything that can play a tone. Fire-and-forget.
pub trait ToneSink {
    fn play(&self, tone: &ToneSpec);
}

/// Sink that writes tones to the log (headless/native runs)
#[derive(Debug, Clone)]
pub struct ToneLog {
    volume: f32,
}

impl ToneLog {
    /// `volume` is the effective master * sfx scale
    pub fn new(volume: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
        }
    }
}

impl ToneSink for ToneLog {
    fn play(&self, tone: &ToneSpec) {
        if self.volume <= 0.0 {
            return;
        }
        log::debug!(
            "tone {:.0}Hz {:?} {:.2}s gain {:.3}",
            tone.frequency,
            tone.waveform,
            tone.duration_secs,
            tone.volume * self.volume
        );
    }
}

/// Web Audio backed sink
#[cfg(target_arch = "wasm32")]
pub struct AudioManager {
    ctx: Option<web_sys::AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

#[cfg(target_arch = "wasm32")]
impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = web_sys::AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn oscillator_type(waveform: Waveform) -> web_sys::OscillatorType {
        match waveform {
            Waveform::Sine => web_sys::OscillatorType::Sine,
            Waveform::Square => web_sys::OscillatorType::Square,
            Waveform::Sawtooth => web_sys::OscillatorType::Sawtooth,
            Waveform::Triangle => web_sys::OscillatorType::Triangle,
        }
    }

    fn beep(&self, ctx: &web_sys::AudioContext, tone: &ToneSpec, vol: f32) -> Option<()> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(Self::oscillator_type(tone.waveform));
        osc.frequency().set_value(tone.frequency);
        gain.gain().set_value(tone.volume * vol);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        let now = ctx.current_time();
        osc.start_with_when(now).ok()?;
        osc.stop_with_when(now + f64::from(tone.duration_secs)).ok()?;
        Some(())
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl ToneSink for AudioManager {
    fn play(&self, tone: &ToneSpec) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Browsers suspend the context until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        if self.beep(ctx, tone, vol).is_none() {
            log::warn!("Failed to play {:.0}Hz tone", tone.frequency);
        }
    }
}
