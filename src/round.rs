//! Round state machine.
//!
//! A session walks Start → Countdown → Presenting → Input → Feedback for each
//! of the five levels, then lands in Gameover. All mutation goes through
//! [`RoundMachine::apply`]; time only advances through [`Event::Tick`], so the
//! whole machine runs headless under `cargo test`.
//!
//! Timers: each timed phase arms a [`Ticker`] on entry. A transition replaces
//! the ticker and drops whatever time was left over in the tick that caused it,
//! so a countdown tick can never land in the presentation (or a stale input tick
//! in the next round).

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::birds::{self, Bird, BirdSet, Viewport};
use crate::config::GameConfig;
use crate::input::InputBuffer;
use crate::levels::{LEVELS, LevelConfig, base_score};
use crate::trajectory::{self, BirdPose};

/// Streak bonus per consecutive exact answer.
pub const STREAK_BONUS: u32 = 5;
const SECOND_MS: f64 = 1000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Start,
    Countdown,
    Presenting,
    Input,
    Feedback,
    Gameover,
}

/// Everything that can happen to a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Start button on the title screen or restart after game over.
    StartGame,
    /// Wall-clock milliseconds since the previous tick.
    Tick(f64),
    Digit(u8),
    Backspace,
    Clear,
    Confirm,
    Resize(Viewport),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Perfect, // exact count
    Close,   // under-counted, partial points
    Miss,    // over-counted or no answer
}

/// Outcome of scoring one answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundScore {
    pub gained: u32,
    pub streak_after: u32,
    pub verdict: Verdict,
}

/// Snapshot shown on the feedback screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundResult {
    pub level_id: u32,
    pub is_correct: bool,
    pub actual: u32,
    pub guessed: u32,
    pub gained_points: u32,
    pub streak_after: u32,
    pub verdict: Verdict,
}

/// Score a single answer. Pure in its four inputs.
pub fn score_round(guessed: u32, actual: u32, level_id: u32, streak_before: u32) -> RoundScore {
    let base = base_score(level_id);
    if guessed == actual {
        RoundScore {
            gained: base.saturating_add(streak_before.saturating_mul(STREAK_BONUS)),
            streak_after: streak_before.saturating_add(1),
            verdict: Verdict::Perfect,
        }
    } else if guessed > 0 && guessed < actual {
        let gained = (u64::from(base) * u64::from(guessed) / u64::from(actual)) as u32;
        RoundScore {
            gained,
            streak_after: 0,
            verdict: if gained > 0 { Verdict::Close } else { Verdict::Miss },
        }
    } else {
        RoundScore {
            gained: 0,
            streak_after: 0,
            verdict: Verdict::Miss,
        }
    }
}

/// Fires once per `period_ms` of accumulated time.
#[derive(Clone, Copy, Debug)]
struct Ticker {
    period_ms: f64,
    carry_ms: f64,
}

impl Ticker {
    fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            carry_ms: 0.0,
        }
    }

    fn advance(&mut self, dt_ms: f64) -> u32 {
        self.carry_ms += dt_ms;
        if self.period_ms <= 0.0 {
            self.carry_ms = 0.0;
            return 1;
        }
        let fired = (self.carry_ms / self.period_ms).floor();
        self.carry_ms -= fired * self.period_ms;
        fired as u32
    }
}

pub struct RoundMachine<R = SmallRng> {
    config: GameConfig,
    rng: R,
    phase: Phase,
    level_index: usize,
    score: u32,
    streak: u32,
    countdown: u32,
    input_timer: u32,
    input: InputBuffer,
    last_result: Option<RoundResult>,
    birds: BirdSet,
    viewport: Viewport,
    ticker: Option<Ticker>,
    presentation_clock: Option<f64>, // seconds; None until the first presenting frame
}

impl RoundMachine<SmallRng> {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }
}

impl<R: rand::Rng> RoundMachine<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        let countdown = config.countdown_secs;
        let input_timer = config.input_secs;
        Self {
            config,
            rng,
            phase: Phase::Start,
            level_index: 0,
            score: 0,
            streak: 0,
            countdown,
            input_timer,
            input: InputBuffer::default(),
            last_result: None,
            birds: BirdSet::default(),
            viewport: Viewport::default(),
            ticker: None,
            presentation_clock: None,
        }
    }

    /// Route one event. Returns the new phase when the event caused a transition.
    pub fn apply(&mut self, event: Event) -> Option<Phase> {
        let before = self.phase;
        match event {
            Event::StartGame => {
                if matches!(self.phase, Phase::Start | Phase::Gameover) {
                    self.start_game();
                }
            }
            Event::Tick(dt_ms) => self.tick(dt_ms),
            Event::Digit(d) if self.phase == Phase::Input => self.input.push_digit(d),
            Event::Backspace if self.phase == Phase::Input => self.input.backspace(),
            Event::Clear if self.phase == Phase::Input => self.input.clear(),
            Event::Confirm if self.phase == Phase::Input => self.confirm(),
            Event::Resize(viewport) => self.viewport = viewport,
            Event::Digit(_) | Event::Backspace | Event::Clear | Event::Confirm => {}
        }
        if self.phase != before {
            log::debug!("phase {:?} -> {:?} (level {})", before, self.phase, self.level().id);
            Some(self.phase)
        } else {
            None
        }
    }

    // --- Transitions --------------------------------------------------------

    fn start_game(&mut self) {
        self.score = 0;
        self.streak = 0;
        self.level_index = 0;
        log::info!("new game");
        self.begin_level();
    }

    fn begin_level(&mut self) {
        self.countdown = self.config.countdown_secs;
        self.input_timer = self.config.input_secs;
        self.input.clear();
        self.last_result = None;
        self.ticker = Some(Ticker::new(SECOND_MS));
        self.phase = Phase::Countdown;
    }

    fn launch_round(&mut self) {
        let level = LEVELS[self.level_index];
        self.birds = birds::generate(&level, self.viewport, &mut self.rng);
        self.presentation_clock = None;
        self.ticker = None;
        self.phase = Phase::Presenting;
    }

    fn enter_input(&mut self) {
        self.input_timer = self.config.input_secs;
        self.ticker = Some(Ticker::new(SECOND_MS));
        self.phase = Phase::Input;
    }

    fn confirm(&mut self) {
        let level = self.level();
        let guessed = self.input.guess();
        let actual = self.birds.actual_count;
        let outcome = score_round(guessed, actual, level.id, self.streak);
        self.streak = outcome.streak_after;
        self.score = self.score.saturating_add(outcome.gained);
        self.last_result = Some(RoundResult {
            level_id: level.id,
            is_correct: outcome.verdict == Verdict::Perfect,
            actual,
            guessed,
            gained_points: outcome.gained,
            streak_after: outcome.streak_after,
            verdict: outcome.verdict,
        });
        log::info!(
            "level {}: guessed {} of {} -> +{} (score {}, streak {})",
            level.id,
            guessed,
            actual,
            outcome.gained,
            self.score,
            self.streak
        );
        self.birds.birds.clear();
        self.ticker = Some(Ticker::new(self.config.feedback_ms));
        self.phase = Phase::Feedback;
    }

    fn finish_feedback(&mut self) {
        if self.level_index + 1 < LEVELS.len() {
            self.level_index += 1;
            self.begin_level();
        } else {
            self.last_result = None;
            self.ticker = None;
            self.phase = Phase::Gameover;
            log::info!("game over, final score {}", self.score);
        }
    }

    // --- Clock --------------------------------------------------------------

    fn fired(&mut self, dt_ms: f64) -> u32 {
        self.ticker.as_mut().map_or(0, |t| t.advance(dt_ms))
    }

    fn tick(&mut self, dt_ms: f64) {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        match self.phase {
            Phase::Countdown => {
                for _ in 0..self.fired(dt_ms) {
                    self.countdown = self.countdown.saturating_sub(1);
                    if self.countdown == 0 {
                        self.launch_round();
                        return;
                    }
                }
            }
            Phase::Presenting => {
                // The first frame only establishes the reference point.
                let elapsed = match self.presentation_clock {
                    Some(t) => t + dt_ms / SECOND_MS,
                    None => 0.0,
                };
                self.presentation_clock = Some(elapsed);
                if trajectory::is_complete_with_floor(
                    &self.birds.birds,
                    elapsed,
                    self.config.min_presentation_secs,
                ) {
                    self.enter_input();
                }
            }
            Phase::Input => {
                for _ in 0..self.fired(dt_ms) {
                    self.input_timer = self.input_timer.saturating_sub(1);
                    if self.input_timer == 0 {
                        self.confirm();
                        return;
                    }
                }
            }
            Phase::Feedback => {
                if self.fired(dt_ms) > 0 {
                    self.finish_feedback();
                }
            }
            Phase::Start | Phase::Gameover => {}
        }
    }

    // --- Read access --------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level(&self) -> &'static LevelConfig {
        &LEVELS[self.level_index]
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn input_timer(&self) -> u32 {
        self.input_timer
    }

    pub fn user_input(&self) -> &str {
        self.input.as_str()
    }

    /// Only set while the feedback screen is up.
    pub fn last_result(&self) -> Option<&RoundResult> {
        self.last_result.as_ref()
    }

    pub fn actual_bird_count(&self) -> u32 {
        self.birds.actual_count
    }

    pub fn birds(&self) -> &[Bird] {
        &self.birds.birds
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Seconds since the presentation's first frame.
    pub fn presentation_elapsed(&self) -> f64 {
        self.presentation_clock.unwrap_or(0.0)
    }

    /// Birds to draw this frame; empty outside the presentation.
    pub fn poses(&self) -> Vec<BirdPose> {
        if self.phase != Phase::Presenting {
            return Vec::new();
        }
        trajectory::positions_at(&self.birds.birds, self.presentation_elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    fn machine() -> RoundMachine<StdRng> {
        RoundMachine::with_rng(GameConfig::default(), StdRng::seed_from_u64(42))
    }

    fn drive_to_input(m: &mut RoundMachine<StdRng>) {
        for _ in 0..3 {
            m.apply(Event::Tick(1000.0));
        }
        assert_eq!(m.phase(), Phase::Presenting);
        m.apply(Event::Tick(16.0));
        m.apply(Event::Tick(30_000.0));
        assert_eq!(m.phase(), Phase::Input);
    }

    fn type_number(m: &mut RoundMachine<StdRng>, n: u32) {
        for c in n.to_string().chars() {
            m.apply(Event::Digit(c.to_digit(10).unwrap() as u8));
        }
    }

    #[test]
    fn scenario_exact_with_streak() {
        let s = score_round(4, 4, 1, 2);
        assert_eq!(s.gained, 20);
        assert_eq!(s.streak_after, 3);
        assert_eq!(s.verdict, Verdict::Perfect);
    }

    #[test]
    fn scenario_under_count_is_proportional() {
        let s = score_round(5, 7, 3, 4);
        assert_eq!(s.gained, 21);
        assert_eq!(s.streak_after, 0);
        assert_eq!(s.verdict, Verdict::Close);
    }

    #[test]
    fn scenario_over_count_scores_nothing() {
        let s = score_round(30, 25, 5, 3);
        assert_eq!(s.gained, 0);
        assert_eq!(s.streak_after, 0);
        assert_eq!(s.verdict, Verdict::Miss);
    }

    #[test]
    fn zero_guess_scores_nothing() {
        for actual in 3..=40 {
            let s = score_round(0, actual, 4, 6);
            assert_eq!(s.gained, 0);
            assert_eq!(s.streak_after, 0);
        }
    }

    #[test]
    fn under_count_stays_below_base() {
        for level_id in 1..=5 {
            for actual in 3..=40 {
                for guessed in 1..actual {
                    let s = score_round(guessed, actual, level_id, 9);
                    assert!(s.gained < base_score(level_id));
                    assert_eq!(s.gained, base_score(level_id) * guessed / actual);
                }
            }
        }
    }

    #[test]
    fn countdown_reaches_zero_after_three_ticks() {
        let mut m = machine();
        assert_eq!(m.apply(Event::StartGame), Some(Phase::Countdown));
        assert_eq!(m.countdown(), 3);
        assert_eq!(m.apply(Event::Tick(1000.0)), None);
        assert_eq!(m.countdown(), 2);
        assert_eq!(m.apply(Event::Tick(999.0)), None);
        assert_eq!(m.countdown(), 2);
        m.apply(Event::Tick(1.0));
        assert_eq!(m.countdown(), 1);
        assert_eq!(m.apply(Event::Tick(1000.0)), Some(Phase::Presenting));
        assert_eq!(m.countdown(), 0);
        let (min, max) = m.level().bird_count_range;
        assert!((min..=max).contains(&m.actual_bird_count()));
        assert_eq!(m.birds().len() as u32, m.actual_bird_count());
    }

    #[test]
    fn long_countdown_frame_does_not_leak_into_presentation() {
        let mut m = machine();
        m.apply(Event::StartGame);
        assert_eq!(m.apply(Event::Tick(60_000.0)), Some(Phase::Presenting));
        assert_eq!(m.presentation_elapsed(), 0.0);
        m.apply(Event::Tick(100.0));
        assert_eq!(m.presentation_elapsed(), 0.0);
        m.apply(Event::Tick(100.0));
        assert!((m.presentation_elapsed() - 0.1).abs() < 1e-12);
        assert_eq!(m.phase(), Phase::Presenting);
    }

    #[test]
    fn input_is_ignored_outside_input_phase() {
        let mut m = machine();
        m.apply(Event::Digit(3));
        m.apply(Event::Confirm);
        assert_eq!(m.phase(), Phase::Start);
        m.apply(Event::StartGame);
        m.apply(Event::Digit(3));
        assert_eq!(m.user_input(), "");
        assert_eq!(m.apply(Event::Confirm), None);
        assert_eq!(m.phase(), Phase::Countdown);
    }

    #[test]
    fn exact_answer_scores_and_builds_streak() {
        let mut m = machine();
        m.apply(Event::StartGame);
        drive_to_input(&mut m);
        let actual = m.actual_bird_count();
        type_number(&mut m, actual);
        assert_eq!(m.apply(Event::Confirm), Some(Phase::Feedback));
        let r = *m.last_result().unwrap();
        assert!(r.is_correct);
        assert_eq!(r.gained_points, 10);
        assert_eq!(m.score(), 10);
        assert_eq!(m.streak(), 1);
        // A second confirm during feedback is ignored.
        assert_eq!(m.apply(Event::Confirm), None);
        assert_eq!(m.score(), 10);
    }

    #[test]
    fn timeout_with_empty_input_scores_zero() {
        let mut m = machine();
        m.apply(Event::StartGame);
        drive_to_input(&mut m);
        m.apply(Event::Tick(1000.0));
        m.apply(Event::Tick(1000.0));
        assert_eq!(m.input_timer(), 1);
        assert_eq!(m.apply(Event::Tick(1000.0)), Some(Phase::Feedback));
        let r = *m.last_result().unwrap();
        assert_eq!(r.guessed, 0);
        assert_eq!(r.gained_points, 0);
        assert_eq!(r.verdict, Verdict::Miss);
        assert_eq!(m.streak(), 0);
    }

    #[test]
    fn backspace_and_clear_edit_the_answer() {
        let mut m = machine();
        m.apply(Event::StartGame);
        drive_to_input(&mut m);
        m.apply(Event::Digit(1));
        m.apply(Event::Digit(2));
        m.apply(Event::Backspace);
        assert_eq!(m.user_input(), "1");
        m.apply(Event::Clear);
        assert_eq!(m.user_input(), "");
    }

    #[test]
    fn feedback_advances_to_next_level_with_fresh_timers() {
        let mut m = machine();
        m.apply(Event::StartGame);
        drive_to_input(&mut m);
        m.apply(Event::Tick(1000.0));
        m.apply(Event::Confirm);
        assert_eq!(m.phase(), Phase::Feedback);
        assert_eq!(m.apply(Event::Tick(2499.0)), None);
        assert_eq!(m.apply(Event::Tick(1.0)), Some(Phase::Countdown));
        assert_eq!(m.level_index(), 1);
        assert_eq!(m.countdown(), 3);
        assert_eq!(m.input_timer(), 3);
        assert!(m.last_result().is_none());
        assert_eq!(m.user_input(), "");
    }

    #[test]
    fn perfect_session_sums_streak_bonuses() {
        let mut m = machine();
        m.apply(Event::StartGame);
        let mut expected = 0;
        for (round, level) in LEVELS.iter().enumerate() {
            drive_to_input(&mut m);
            let actual = m.actual_bird_count();
            type_number(&mut m, actual);
            m.apply(Event::Confirm);
            expected += level.base_score() + round as u32 * STREAK_BONUS;
            assert_eq!(m.score(), expected);
            m.apply(Event::Tick(2500.0));
        }
        assert_eq!(m.phase(), Phase::Gameover);
        assert_eq!(m.score(), 10 + 25 + 40 + 55 + 120);
        assert!(m.last_result().is_none());
    }

    #[test]
    fn restart_from_gameover_resets_session() {
        let mut m = machine();
        m.apply(Event::StartGame);
        for _ in &LEVELS {
            drive_to_input(&mut m);
            let actual = m.actual_bird_count();
            type_number(&mut m, actual);
            m.apply(Event::Confirm);
            m.apply(Event::Tick(2500.0));
        }
        assert_eq!(m.phase(), Phase::Gameover);
        assert!(m.score() > 0);
        assert_eq!(m.apply(Event::StartGame), Some(Phase::Countdown));
        assert_eq!(m.score(), 0);
        assert_eq!(m.streak(), 0);
        assert_eq!(m.level_index(), 0);
    }

    #[test]
    fn resize_changes_layout_of_next_round_only() {
        let mut m = machine();
        m.apply(Event::Resize(Viewport::new(400.0, 300.0)));
        m.apply(Event::StartGame);
        for _ in 0..3 {
            m.apply(Event::Tick(1000.0));
        }
        for b in m.birds() {
            assert!(b.start.x == -50.0 || b.start.x == 450.0);
        }
        let before: Vec<_> = m.birds().to_vec();
        m.apply(Event::Resize(Viewport::new(1000.0, 800.0)));
        assert_eq!(m.birds(), &before[..]);
    }

    #[test]
    fn poses_only_during_presentation() {
        let mut m = machine();
        assert!(m.poses().is_empty());
        m.apply(Event::StartGame);
        for _ in 0..3 {
            m.apply(Event::Tick(1000.0));
        }
        m.apply(Event::Tick(16.0));
        m.apply(Event::Tick(1000.0));
        assert!(!m.poses().is_empty());
    }
}
