//! Audio system using Web Audio API
//!
//! Procedurally generated chimes, no sound files. Everything is best effort:
//! a missing context or a failed node call just means silence.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Tap on the canvas
    Interaction,
    /// Entered the next level
    LevelUp,
    /// Final burst
    Finale,
}

/// Pentatonic steps the interaction chime rotates through
const CHIME_NOTES: [f32; 5] = [523.25, 587.33, 659.25, 783.99, 880.0];

pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
    /// Next chime note, so rapid taps do not all sound alike
    chime_index: std::cell::Cell<usize>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Fails outside a secure context; we simply stay silent
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: 0.6,
            chime_index: std::cell::Cell::new(0),
        }
    }

    /// Set volume (0.0 - 1.0)
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }

    pub fn play(&self, effect: SoundEffect) {
        if self.volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Browsers keep the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Interaction => self.play_chime(ctx, self.volume),
            SoundEffect::LevelUp => self.play_level_up(ctx, self.volume),
            SoundEffect::Finale => self.play_finale(ctx, self.volume),
        }
    }

    /// Oscillator routed through its own gain node
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Short plucked note with an exponential tail
    fn pluck(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
        level: f32,
        at: f64,
        length: f64,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
            return;
        };
        gain.gain().set_value_at_time(level, at).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, at + length)
            .ok();
        osc.start_with_when(at).ok();
        osc.stop_with_when(at + length + 0.05).ok();
    }

    /// Tap - soft sparkle
    fn play_chime(&self, ctx: &AudioContext, vol: f32) {
        let index = self.chime_index.get();
        self.chime_index.set((index + 1) % CHIME_NOTES.len());
        let freq = CHIME_NOTES[index];
        let t = ctx.current_time();

        self.pluck(ctx, freq, OscillatorType::Sine, vol * 0.25, t, 0.25);
        // Octave shimmer
        self.pluck(ctx, freq * 2.0, OscillatorType::Triangle, vol * 0.08, t, 0.15);
    }

    /// Level up - rising arpeggio
    fn play_level_up(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.25, 659.25, 783.99, 1046.5].iter().enumerate() {
            let t = ctx.current_time() + i as f64 * 0.09;
            self.pluck(ctx, *freq, OscillatorType::Triangle, vol * 0.3, t, 0.35);
        }
    }

    /// Finale - swell plus a slow chord
    fn play_finale(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 130.81, OscillatorType::Sine) {
            gain.gain().set_value_at_time(0.001, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(vol * 0.35, t + 0.4)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + 1.6)
                .ok();
            osc.frequency().set_value_at_time(130.81, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(261.63, t + 1.2)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 1.7).ok();
        }

        for (i, freq) in [659.25, 783.99, 1046.5, 1318.5].iter().enumerate() {
            let at = t + 0.3 + i as f64 * 0.12;
            self.pluck(ctx, *freq, OscillatorType::Sine, vol * 0.2, at, 0.9);
        }
    }
}
