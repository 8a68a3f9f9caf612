//! Generative background music: what to play on each beat, and when.
//!
//! This half is pure; `web::music` turns [`Voice`]s into Web Audio nodes. The
//! scheduler works against the audio clock with a small lookahead window, so a
//! late animation frame never drops a beat and disabling mid-bar leaves nothing
//! armed beyond the window.

use rand::Rng;

use crate::round::Phase;

/// C4, E4, G4, C5
pub const MELODY_NOTES: [f32; 4] = [261.63, 329.63, 392.00, 523.25];
pub const BASS_ROOT: f32 = 130.81; // C3
pub const BASS_THIRD: f32 = 164.81; // E3
/// Delay between enabling and the first beat (seconds).
pub const START_DELAY: f64 = 0.1;

/// One note to synthesize.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Voice {
    pub freq: f32,
    pub duration: f64, // seconds
    pub volume: f32,   // peak is volume * 0.2
}

/// Notes sounding on beat `index`: bass always, melody on even beats, click always.
pub fn compose_beat<R: Rng>(index: u64, seconds_per_beat: f64, rng: &mut R) -> Vec<Voice> {
    let mut voices = Vec::with_capacity(3);
    let bass = if index % 4 == 0 { BASS_ROOT } else { BASS_THIRD };
    voices.push(Voice {
        freq: bass,
        duration: seconds_per_beat * 0.8,
        volume: 0.15,
    });
    if index % 2 == 0 {
        let note = MELODY_NOTES[rng.gen_range(0..MELODY_NOTES.len())];
        voices.push(Voice {
            freq: note,
            duration: seconds_per_beat * 0.4,
            volume: 0.1,
        });
    }
    voices.push(Voice {
        freq: 800.0 + rng.gen_range(0.0..200.0f32),
        duration: 0.02,
        volume: 0.05,
    });
    voices
}

/// Master gain the music settles on for a phase.
pub fn target_gain(phase: Phase, idle: f32, presenting: f32) -> f32 {
    if phase == Phase::Presenting { presenting } else { idle }
}

/// A beat due for scheduling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledBeat {
    pub index: u64,
    pub time: f64, // audio clock seconds
}

/// Lookahead beat scheduler on the audio clock.
#[derive(Clone, Debug)]
pub struct BeatScheduler {
    seconds_per_beat: f64,
    lookahead: f64,
    next_index: u64,
    next_time: f64,
}

impl BeatScheduler {
    pub fn new(first_beat_at: f64, seconds_per_beat: f64, lookahead: f64) -> Self {
        Self {
            seconds_per_beat,
            lookahead,
            next_index: 0,
            next_time: first_beat_at,
        }
    }

    /// Beats starting before `now + lookahead` that have not been handed out yet.
    ///
    /// Beats whose start already passed (the page stopped pumping for a while)
    /// are skipped, never played late.
    pub fn due(&mut self, now: f64) -> Vec<ScheduledBeat> {
        if self.next_time < now && self.seconds_per_beat > 0.0 {
            let missed = ((now - self.next_time) / self.seconds_per_beat).ceil();
            self.next_index += missed as u64;
            self.next_time += missed * self.seconds_per_beat;
        }
        let horizon = now + self.lookahead;
        let mut out = Vec::new();
        while self.next_time < horizon {
            out.push(ScheduledBeat {
                index: self.next_index,
                time: self.next_time,
            });
            self.next_index += 1;
            self.next_time += self.seconds_per_beat;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn bass_alternates_on_every_fourth_beat() {
        let mut rng = StdRng::seed_from_u64(5);
        let bass: Vec<f32> = (0..8).map(|i| compose_beat(i, 0.5, &mut rng)[0].freq).collect();
        assert_eq!(
            bass,
            vec![BASS_ROOT, BASS_THIRD, BASS_THIRD, BASS_THIRD, BASS_ROOT, BASS_THIRD, BASS_THIRD, BASS_THIRD]
        );
    }

    #[test]
    fn melody_only_on_even_beats() {
        let mut rng = StdRng::seed_from_u64(9);
        for i in 0..16 {
            let voices = compose_beat(i, 0.5, &mut rng);
            let expected = if i % 2 == 0 { 3 } else { 2 };
            assert_eq!(voices.len(), expected);
            if i % 2 == 0 {
                assert!(MELODY_NOTES.contains(&voices[1].freq));
                assert!((voices[1].duration - 0.2).abs() < 1e-12);
            }
            let click = voices.last().unwrap();
            assert!(click.freq >= 800.0 && click.freq < 1000.0);
            assert_eq!(click.duration, 0.02);
        }
    }

    #[test]
    fn scheduler_hands_out_each_beat_once() {
        let mut s = BeatScheduler::new(0.1, 0.5, 0.2);
        let first = s.due(0.0);
        assert_eq!(first, vec![ScheduledBeat { index: 0, time: 0.1 }]);
        assert!(s.due(0.05).is_empty());
        let later = s.due(1.0);
        assert_eq!(later.iter().map(|b| b.index).collect::<Vec<_>>(), vec![2]);
        assert!((later[0].time - 1.1).abs() < 1e-9);
        assert!(s.due(1.0).is_empty());
    }

    #[test]
    fn long_gap_skips_missed_beats() {
        let mut s = BeatScheduler::new(0.1, 0.5, 0.2);
        s.due(0.0);
        let resumed = s.due(60.0);
        assert_eq!(resumed.len(), 1);
        assert_eq!(resumed[0].index, 120);
        assert!(resumed[0].time >= 60.0);
        assert!(resumed[0].time < 60.2);
    }

    #[test]
    fn gain_targets_follow_phase() {
        assert_eq!(target_gain(Phase::Presenting, 0.2, 0.5), 0.5);
        for phase in [Phase::Start, Phase::Countdown, Phase::Input, Phase::Feedback, Phase::Gameover] {
            assert_eq!(target_gain(phase, 0.2, 0.5), 0.2);
        }
    }
}
