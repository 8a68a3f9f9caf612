//! Web Audio output for the ambient loop.
//!
//! Owns the `AudioContext` and master gain. When the browser refuses to create
//! a context the music silently stays off; gameplay never depends on it.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorType};

use crate::audio::{self, BeatScheduler, START_DELAY, Voice};
use crate::config::GameConfig;
use crate::error::GameResult;
use crate::round::Phase;

/// Seconds for master gain to settle on a new phase's level.
const GAIN_RAMP_SECS: f64 = 1.0;

pub struct AmbientMusic {
    ctx: Option<AudioContext>,
    master: Option<GainNode>,
    scheduler: Option<BeatScheduler>, // Some while enabled
    rng: SmallRng,
    phase: Phase,
    seconds_per_beat: f64,
    lookahead: f64,
    initial_gain: f32,
    idle_gain: f32,
    presenting_gain: f32,
}

impl AmbientMusic {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            ctx: None,
            master: None,
            scheduler: None,
            rng: SmallRng::from_entropy(),
            phase: Phase::Start,
            seconds_per_beat: config.seconds_per_beat(),
            lookahead: config.lookahead_secs,
            initial_gain: config.initial_gain,
            idle_gain: config.idle_gain,
            presenting_gain: config.presenting_gain,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.scheduler.is_some()
    }

    pub fn enable(&mut self) {
        if self.is_enabled() {
            return;
        }
        if self.ctx.is_none() {
            match open_graph(self.initial_gain) {
                Ok((ctx, master)) => {
                    self.ctx = Some(ctx);
                    self.master = Some(master);
                }
                Err(e) => {
                    log::warn!("audio unavailable, music stays off: {e}");
                    return;
                }
            }
        }
        if let Some(ctx) = &self.ctx {
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            self.scheduler = Some(BeatScheduler::new(
                ctx.current_time() + START_DELAY,
                self.seconds_per_beat,
                self.lookahead,
            ));
            log::debug!("music on");
        }
    }

    /// Stop scheduling. Notes already handed to the audio graph play out.
    pub fn disable(&mut self) {
        if self.scheduler.take().is_some() {
            log::debug!("music off");
        }
    }

    pub fn toggle(&mut self) {
        if self.is_enabled() {
            self.disable();
        } else {
            self.enable();
        }
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        if let Err(e) = self.ramp_to_phase() {
            log::warn!("music gain ramp failed: {e}");
        }
    }

    fn ramp_to_phase(&self) -> GameResult<()> {
        let (Some(ctx), Some(master)) = (&self.ctx, &self.master) else {
            return Ok(());
        };
        let target = audio::target_gain(self.phase, self.idle_gain, self.presenting_gain);
        master
            .gain()
            .linear_ramp_to_value_at_time(target, ctx.current_time() + GAIN_RAMP_SECS)?;
        Ok(())
    }

    /// Schedule every beat that has entered the lookahead window. Call once per frame.
    pub fn pump(&mut self) {
        let (Some(ctx), Some(master), Some(scheduler)) =
            (self.ctx.as_ref(), self.master.as_ref(), self.scheduler.as_mut())
        else {
            return;
        };
        for beat in scheduler.due(ctx.current_time()) {
            for voice in audio::compose_beat(beat.index, self.seconds_per_beat, &mut self.rng) {
                if let Err(e) = play_voice(ctx, master, &voice, beat.time) {
                    log::warn!("dropped note on beat {}: {e}", beat.index);
                }
            }
        }
    }

    /// Stop scheduling and release the audio context.
    pub fn shutdown(&mut self) {
        self.disable();
        self.master = None;
        if let Some(ctx) = self.ctx.take() {
            let _ = ctx.close();
        }
    }
}

fn open_graph(initial_gain: f32) -> GameResult<(AudioContext, GainNode)> {
    let ctx = AudioContext::new()?;
    let master = ctx.create_gain()?;
    master.connect_with_audio_node(&ctx.destination())?;
    master.gain().set_value_at_time(initial_gain, ctx.current_time())?;
    Ok((ctx, master))
}

fn play_voice(ctx: &AudioContext, master: &GainNode, voice: &Voice, at: f64) -> GameResult<()> {
    let osc = ctx.create_oscillator()?;
    let env = ctx.create_gain()?;

    osc.set_type(OscillatorType::Triangle);
    osc.frequency().set_value_at_time(voice.freq, at)?;

    let gain = env.gain();
    gain.set_value_at_time(0.0, at)?;
    gain.linear_ramp_to_value_at_time(voice.volume * 0.2, at + 0.05)?;
    gain.exponential_ramp_to_value_at_time(0.0001, at + voice.duration)?;

    osc.connect_with_audio_node(&env)?;
    env.connect_with_audio_node(master)?;
    osc.start_with_when(at)?;
    osc.stop_with_when(at + voice.duration)?;
    Ok(())
}
