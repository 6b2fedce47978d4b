//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed. If the
//! AudioContext cannot be created the manager degrades to a silent no-op.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Discrete cue types the game emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Orb collected, charge still below target
    Pickup,
    /// Bulb lit - exact match
    Correct,
    /// Bulb overloaded
    Incorrect,
    /// New round presented
    RoundStart,
    /// Lives ran out
    GameOver,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    /// Long-lived background pad (oscillators, shared gain)
    pad: Option<(Vec<OscillatorNode>, GainNode)>,
    master_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            pad: None,
            master_volume: 0.8,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        // The pad keeps running; its gain follows the mute flag
        if let (Some(ctx), Some((_, gain))) = (&self.ctx, &self.pad) {
            let level = if muted { 0.0001 } else { 0.04 };
            let _ = gain
                .gain()
                .linear_ramp_to_value_at_time(level, ctx.current_time() + 0.2);
        }
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play a one-shot cue
    pub fn play(&self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            SoundCue::Pickup => self.play_pickup(ctx, vol),
            SoundCue::Correct => self.play_correct(ctx, vol),
            SoundCue::Incorrect => self.play_incorrect(ctx, vol),
            SoundCue::RoundStart => self.play_round_start(ctx, vol),
            SoundCue::GameOver => self.play_game_over(ctx, vol),
        }
    }

    /// Start the low ambient hum behind the game
    pub fn start_ambient(&mut self) {
        if self.pad.is_some() {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        let Ok(gain) = ctx.create_gain() else { return };
        gain.gain().set_value(if self.muted { 0.0001 } else { 0.04 });
        if gain.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }

        let mut oscs = Vec::new();
        for (freq, osc_type) in [(110.0, OscillatorType::Sine), (164.8, OscillatorType::Triangle)] {
            let Ok(osc) = ctx.create_oscillator() else {
                continue;
            };
            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            if osc.connect_with_audio_node(&gain).is_ok() && osc.start().is_ok() {
                oscs.push(osc);
            }
        }
        if !oscs.is_empty() {
            self.pad = Some((oscs, gain));
        }
    }

    /// Stop the ambient pad via gain ramp-down, not a hard cut
    pub fn stop_ambient(&mut self) {
        let Some(ctx) = &self.ctx else { return };
        if let Some((oscs, gain)) = self.pad.take() {
            let t = ctx.current_time();
            let _ = gain.gain().linear_ramp_to_value_at_time(0.0001, t + 0.5);
            for osc in oscs {
                let _ = osc.stop_with_when(t + 0.6);
            }
        }
    }

    // === Cue generators ===

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

    /// Pickup - soft rising blip
    fn play_pickup(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 520.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(520.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(780.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Correct - little ascending chord
    fn play_correct(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.3, 659.3, 784.0, 1046.5].iter().enumerate() {
            let delay = i as f64 * 0.09;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }

    /// Incorrect - descending buzz (the bulb pops)
    fn play_incorrect(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.35, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                .ok();
            osc.frequency().set_value_at_time(220.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(70.0, t + 0.3)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.4).ok();
        }

        // Pop transient
        if let Some((osc, gain)) = self.create_osc(ctx, 1200.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.06)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.08).ok();
        }
    }

    /// Round start - two quick notes
    fn play_round_start(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [392.0, 587.3].iter().enumerate() {
            let delay = i as f64 * 0.12;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.25).ok();
            }
        }
    }

    /// Game over - slow descending line
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [440.0, 392.0, 329.6, 261.6].iter().enumerate() {
            let delay = i as f64 * 0.22;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }
}
