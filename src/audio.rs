//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::present::{AudioError, Sound, SoundPlayer};
use crate::settings::Settings;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: settings.effective_volume(),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Play a sound effect
    pub fn play(&self, sound: Sound) -> Result<(), AudioError> {
        let vol = self.volume;
        if vol <= 0.0 {
            return Ok(());
        }

        let ctx = self.ctx.as_ref().ok_or(AudioError::Unavailable)?;

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let played = match sound {
            Sound::Collectible => self.play_droplet(ctx, vol),
            Sound::Bonus => self.play_bling(ctx, vol),
            Sound::Hazard => self.play_buzz(ctx, vol),
            Sound::HighScore => self.play_fanfare(ctx, vol),
        };
        played.ok_or(AudioError::Synthesis(sound))
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
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

    /// Water can - falling droplet plink
    fn play_droplet(&self, ctx: &AudioContext, vol: f32) -> Option<()> {
        let (osc, gain) = self.create_osc(ctx, 1400.0, OscillatorType::Sine)?;
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.7, t).ok()?;
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.18)
            .ok()?;
        osc.frequency().set_value_at_time(1400.0, t).ok()?;
        osc.frequency()
            .exponential_ramp_to_value_at_time(500.0, t + 0.12)
            .ok()?;

        osc.start().ok()?;
        osc.stop_with_when(t + 0.2).ok()
    }

    /// Bonus time - rising two-note bling
    fn play_bling(&self, ctx: &AudioContext, vol: f32) -> Option<()> {
        let t = ctx.current_time();
        for (i, freq) in [880.0, 1320.0].into_iter().enumerate() {
            let (osc, gain) = self.create_osc(ctx, freq, OscillatorType::Triangle)?;
            let start = t + i as f64 * 0.08;
            gain.gain().set_value_at_time(0.0, t).ok()?;
            gain.gain().set_value_at_time(vol * 0.5, start).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + 0.15)
                .ok()?;
            osc.start_with_when(start).ok()?;
            osc.stop_with_when(start + 0.18).ok()?;
        }
        Some(())
    }

    /// Biohazard - low negative buzz
    fn play_buzz(&self, ctx: &AudioContext, vol: f32) -> Option<()> {
        let (osc, gain) = self.create_osc(ctx, 140.0, OscillatorType::Sawtooth)?;
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok()?;
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.3)
            .ok()?;
        osc.frequency().set_value_at_time(140.0, t).ok()?;
        osc.frequency()
            .exponential_ramp_to_value_at_time(70.0, t + 0.3)
            .ok()?;

        osc.start().ok()?;
        osc.stop_with_when(t + 0.35).ok()
    }

    /// New high score - ascending arpeggio
    fn play_fanfare(&self, ctx: &AudioContext, vol: f32) -> Option<()> {
        let t = ctx.current_time();
        let notes = [523.25, 659.25, 783.99, 1046.5]; // C5 E5 G5 C6
        for (i, freq) in notes.into_iter().enumerate() {
            let (osc, gain) = self.create_osc(ctx, freq, OscillatorType::Square)?;
            let start = t + i as f64 * 0.12;
            gain.gain().set_value_at_time(0.0, t).ok()?;
            gain.gain().set_value_at_time(vol * 0.25, start).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + 0.25)
                .ok()?;
            osc.start_with_when(start).ok()?;
            osc.stop_with_when(start + 0.3).ok()?;
        }
        Some(())
    }
}

impl SoundPlayer for AudioManager {
    fn play_sound(&mut self, sound: Sound) -> Result<(), AudioError> {
        self.play(sound)
    }
}
