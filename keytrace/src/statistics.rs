//! # Statistics Module - Live Samples and Final Results
//!
//! The [Sampler] records one [StatSample] per elapsed second while a session is running.
//! It is driven by an external one-tick-per-second clock through
//! [Sampler::second_elapsed], so a real timer and a simulated clock are interchangeable.
//!
//! ## Data Flow
//!
//! 1. **Keystrokes**: the [TypingState] updates its counters
//! 2. **Ticks**: the host calls [Sampler::second_elapsed] about once per second
//! 3. **Sampling**: each *new* whole second appends a snapshot to the history
//! 4. **Finalization**: a [FinalResult] is built once the session is finished
//!
//! The history is append-only. Finishing a session stops the sampling but keeps every
//! recorded second.

use serde::{Deserialize, Serialize};
use tracing::trace;
use web_time::{Duration, Instant};

use crate::math::{Consistency, Counts, Rates};
use crate::state::{Phase, TypingState};
use crate::whole_seconds;

/// One second's snapshot of the session's performance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatSample {
    /// Whole seconds since the first keystroke
    pub elapsed_seconds: u64,
    pub correct: usize,
    pub incorrect: usize,
    pub keystrokes: usize,
    pub wpm: f64,
    pub cpm: u64,
    pub accuracy: f64,
}

impl StatSample {
    pub fn new(elapsed_seconds: u64, counts: &Counts) -> Self {
        let Rates { wpm, cpm, accuracy } = Rates::calculate(counts, elapsed_seconds as f64);

        Self {
            elapsed_seconds,
            correct: counts.correct,
            incorrect: counts.incorrect,
            keystrokes: counts.keystrokes,
            wpm,
            cpm,
            accuracy,
        }
    }
}

/// Records a [StatSample] for every new whole second of a running session
#[derive(Debug, Default, Clone)]
pub struct Sampler {
    samples: Vec<StatSample>,
}

impl Sampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// All samples recorded so far, in time order
    pub fn samples(&self) -> &[StatSample] {
        &self.samples
    }

    pub fn last(&self) -> Option<&StatSample> {
        self.samples.last()
    }

    /// Handle a clock tick
    ///
    /// Records a sample if `state` is running and `now` falls into a whole second that
    /// has no sample yet. Second zero is never sampled, as no rate can be computed for it.
    ///
    /// Returns the recorded sample, if any.
    pub fn second_elapsed(&mut self, state: &TypingState, now: Instant) -> Option<&StatSample> {
        if state.phase() != Phase::Running {
            return None;
        }

        let elapsed_seconds = whole_seconds(state.started_at()?, now);
        if elapsed_seconds == 0 {
            return None;
        }

        if self
            .last()
            .is_some_and(|last| last.elapsed_seconds >= elapsed_seconds)
        {
            return None;
        }

        let sample = StatSample::new(elapsed_seconds, &state.counts());
        trace!(?sample, "Recorded sample");
        self.samples.push(sample);
        self.samples.last()
    }

    /// Drop the history, for a new session
    pub fn reset(&mut self) {
        self.samples.clear();
    }
}

/// The final record of a finished session
///
/// This is the plain value handed to whatever stores or reports results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalResult {
    pub wpm: f64,
    pub cpm: u64,
    pub accuracy: f64,
    /// Consistency of the WPM samples, as percentage (0.0 - 100.0)
    pub consistency: f64,
    /// Time from the first keystroke to the end of the session
    pub duration: Duration,
    pub keystrokes: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub spaces: usize,
}

impl FinalResult {
    /// Build the final result from the finished `state` and its sample history
    ///
    /// Rates are computed over the whole seconds of the session, so a session shorter
    /// than one second reports zero rates.
    ///
    /// Returns `None` if the session isn't finished.
    pub fn from_state(state: &TypingState, samples: &[StatSample]) -> Option<Self> {
        if state.phase() != Phase::Finished {
            return None;
        }

        let start = state.started_at()?;
        let end = state.ended_at()?;
        let counts = state.counts();
        let Rates { wpm, cpm, accuracy } =
            Rates::calculate(&counts, whole_seconds(start, end) as f64);

        let wpm_series: Vec<f64> = samples.iter().map(|sample| sample.wpm).collect();

        Some(Self {
            wpm,
            cpm,
            accuracy,
            consistency: Consistency::calculate(&wpm_series).percent,
            duration: end.saturating_duration_since(start),
            keystrokes: counts.keystrokes,
            correct: counts.correct,
            incorrect: counts.incorrect,
            spaces: counts.spaces,
        })
    }
}
