//! Audio system using the Web Audio API
//!
//! Procedurally generated sound effects - no external files needed. The sim
//! never waits on any of this: triggers are fire-and-forget and may silently
//! fail before the browser's unlock gesture.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Jump launch
    Jump,
    /// Touch down on floor, platform, or obstacle top
    Land,
    /// Corn collected
    Corn,
    /// Obstacle damage
    Ouch,
    /// Egg smashed underfoot
    EggSmash,
    /// Fast time scale selected
    CluckFast,
    /// Slow time scale selected
    CluckSlow,
    /// Head hit the ceiling
    Bonk,
    /// Run started
    RunStart,
}

impl From<GameEvent> for SoundEffect {
    fn from(event: GameEvent) -> Self {
        match event {
            GameEvent::Jump => SoundEffect::Jump,
            GameEvent::Land => SoundEffect::Land,
            GameEvent::Corn => SoundEffect::Corn,
            GameEvent::Ouch => SoundEffect::Ouch,
            GameEvent::EggSmash => SoundEffect::EggSmash,
            GameEvent::CluckFast => SoundEffect::CluckFast,
            GameEvent::CluckSlow => SoundEffect::CluckSlow,
            GameEvent::Bonk => SoundEffect::Bonk,
            GameEvent::RunStart => SoundEffect::RunStart,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
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
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
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

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Jump => self.play_jump(ctx, vol),
            SoundEffect::Land => self.play_land(ctx, vol),
            SoundEffect::Corn => self.play_corn(ctx, vol),
            SoundEffect::Ouch => self.play_ouch(ctx, vol),
            SoundEffect::EggSmash => self.play_egg_smash(ctx, vol),
            SoundEffect::CluckFast => self.play_cluck(ctx, vol, 520.0),
            SoundEffect::CluckSlow => self.play_cluck(ctx, vol, 300.0),
            SoundEffect::Bonk => self.play_bonk(ctx, vol),
            SoundEffect::RunStart => self.play_run_start(ctx, vol),
        }
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

    /// Jump - quick rising chirp
    fn play_jump(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 240.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.35, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(240.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(560.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.14).ok();
    }

    /// Land - soft low thump
    fn play_land(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 130.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.09)
            .ok();
        osc.frequency().set_value_at_time(130.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(55.0, t + 0.09)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.12).ok();
    }

    /// Corn pickup - bright two-note ding
    fn play_corn(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 880.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.frequency().set_value_at_time(880.0, t).ok();
            osc.frequency().set_value_at_time(1320.0, t + 0.07).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.16).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 1760.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.12, t + 0.05).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.22).ok();
        }
    }

    /// Ouch - harsh descending squawk
    fn play_ouch(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 420.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.45, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.frequency().set_value_at_time(420.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(90.0, t + 0.22)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.28).ok();
        }

        // Low impact body
        if let Some((osc, gain)) = self.create_osc(ctx, 70.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.35, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.18).ok();
        }
    }

    /// Egg smash - wet crack
    fn play_egg_smash(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 1200.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.frequency().set_value_at_time(1200.0, t).ok();
            osc.frequency().set_value_at_time(300.0, t + 0.02).ok();
            osc.frequency().set_value_at_time(900.0, t + 0.04).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 140.0, OscillatorType::Triangle) {
            gain.gain().set_value_at_time(vol * 0.3, t + 0.02).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.18)
                .ok();
            osc.frequency().set_value_at_time(140.0, t + 0.02).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(60.0, t + 0.16)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }
    }

    /// Cluck - short triangle chirp pair at the given base pitch
    fn play_cluck(&self, ctx: &AudioContext, vol: f32, base_freq: f32) {
        let t = ctx.current_time();

        for (i, delay) in [0.0, 0.09].iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(ctx, base_freq, OscillatorType::Triangle)
            else {
                continue;
            };
            let start = t + delay;
            let peak = if i == 0 { 0.3 } else { 0.22 };
            gain.gain().set_value_at_time(vol * peak, start).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + 0.07)
                .ok();
            osc.frequency().set_value_at_time(base_freq, start).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(base_freq * 1.5, start + 0.03)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(base_freq * 0.8, start + 0.07)
                .ok();
            osc.start_with_when(start).ok();
            osc.stop_with_when(start + 0.09).ok();
        }
    }

    /// Bonk - dull ceiling knock
    fn play_bonk(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.07)
            .ok();
        osc.frequency().set_value_at_time(180.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(90.0, t + 0.06)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.09).ok();
    }

    /// Run start - little rising fanfare
    fn play_run_start(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        let notes = [392.0, 523.0, 659.0];

        for (i, freq) in notes.iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) else {
                continue;
            };
            let start = t + i as f64 * 0.09;
            gain.gain().set_value_at_time(vol * 0.25, start).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + 0.12)
                .ok();
            osc.start_with_when(start).ok();
            osc.stop_with_when(start + 0.14).ok();
        }
    }
}
