//! # Session Module - Complete Typing Test Management
//!
//! [TypingSession] is the high-level interface for a typing test. It maps the input events
//! of a UI (typed characters, backspace, word submission, reset, forced end and clock
//! ticks) onto the state machine, the word buffer and the sampler, honouring the session's
//! [Configuration].
//!
//! ## Session Lifecycle
//!
#![doc = simple_mermaid::mermaid!("../diagrams/session_lifecycle.mmd")]
//!
//! ## Usage Examples
//!
//! ### Per-character input
//!
//! ```rust
//! use keytrace::{Configuration, Phase, TypingSession};
//!
//! let mut session = TypingSession::new("hello", Configuration::default()).unwrap();
//!
//! session.character_typed('h');
//! session.character_typed('x');
//! session.backspace_pressed(false);
//!
//! assert_eq!(session.state().cursor(), Some(0));
//! assert_eq!(session.state().phase(), Phase::Running);
//! ```
//!
//! ### Word-buffered input with a time limit
//!
//! ```rust
//! use keytrace::{Configuration, Duration, Instant, Phase, TypingSession};
//!
//! let config = Configuration {
//!     word_buffered_input: true,
//!     time_limit_seconds: Some(2),
//!     ..Default::default()
//! };
//! let mut session = TypingSession::new("the quick brown fox", config).unwrap();
//!
//! let start = Instant::now();
//! session.word_submitted_at("the", start);
//! session.second_elapsed_at(start + Duration::from_secs(1));
//! session.second_elapsed_at(start + Duration::from_secs(2));
//!
//! assert_eq!(session.state().phase(), Phase::Finished);
//! assert_eq!(session.samples().len(), 2);
//!
//! let result = session.final_result().unwrap();
//! assert_eq!(result.correct, 4);
//! ```

use thiserror::Error;
use tracing::{debug, info};
use web_time::{Duration, Instant};

use crate::config::Configuration;
use crate::state::{Phase, TypingState};
use crate::statistics::{FinalResult, Sampler, StatSample};
use crate::submission::WordSubmission;
use crate::text::{TargetText, TextError};
use crate::whole_seconds;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("Failed to create session: {0}")]
    Text(#[from] TextError),

    #[error("Cannot finalize statistics: session not finished")]
    NotFinished,
}

/// Complete typing session coordinator
///
/// Owns the [TypingState], the [WordSubmission] buffer and the [Sampler]. Every event
/// method has an `_at` variant taking the event's time, which keeps tests and replays
/// deterministic.
///
/// # Thread Safety
///
/// A session is a plain value with no interior mutability. Events must be applied in the
/// order they were generated; concurrent tests each get their own session.
#[derive(Debug, Clone)]
pub struct TypingSession {
    state: TypingState,
    submission: WordSubmission,
    sampler: Sampler,
    config: Configuration,
}

impl TypingSession {
    /// Create a new session for `text`
    ///
    /// ```rust
    /// use keytrace::{Configuration, SessionError, TextError, TypingSession};
    ///
    /// assert!(TypingSession::new("hello", Configuration::default()).is_ok());
    /// assert_eq!(
    ///     TypingSession::new("", Configuration::default()).unwrap_err(),
    ///     SessionError::Text(TextError::Empty)
    /// );
    /// ```
    pub fn new(text: &str, config: Configuration) -> Result<Self, SessionError> {
        let text = TargetText::new(text)?;

        Ok(Self {
            state: TypingState::new(text, config.error_counting_policy),
            submission: WordSubmission::new(),
            sampler: Sampler::new(),
            config,
        })
    }

    pub fn state(&self) -> &TypingState {
        &self.state
    }

    pub fn submission(&self) -> &WordSubmission {
        &self.submission
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Samples recorded so far, one per elapsed second
    pub fn samples(&self) -> &[StatSample] {
        self.sampler.samples()
    }

    /// Typing completion as a percentage between 0.0 and 100.0
    pub fn completion_percentage(&self) -> f64 {
        let typed = self.state.cursor().map_or(0, |cursor| cursor + 1);
        (typed as f64 / self.state.text().len() as f64) * 100.0
    }

    /// Seconds left before the time limit ends the session
    ///
    /// `None` without a time limit. Before the first keystroke the full limit remains.
    pub fn time_remaining(&self, now: Instant) -> Option<Duration> {
        let limit = Duration::from_secs(self.config.time_limit_seconds?);
        Some(limit.saturating_sub(self.state.elapsed(now)))
    }

    pub fn character_typed(&mut self, c: char) {
        self.character_typed_at(c, Instant::now());
    }

    /// Handle a typed character
    ///
    /// In word-buffered mode a space or newline submits the buffer and any other character
    /// is staged. In per-character mode the character goes straight to the state machine,
    /// unless it's a space typed mid-word with `skip_word_on_space` enabled: then the rest
    /// of the word is skipped before the space is inserted.
    pub fn character_typed_at(&mut self, c: char, now: Instant) {
        if self.state.phase() == Phase::Finished {
            debug!(%c, "Ignored keystroke: session is finished");
            return;
        }

        if self.config.word_buffered_input {
            if matches!(c, ' ' | '\n' | '\r') {
                self.submission.submit_at(&mut self.state, now);
            } else {
                self.submission.push(c, &self.state);
            }
            return;
        }

        if c == ' ' && self.config.skip_word_on_space {
            self.skip_word_at(now);
        }

        self.state.insert_at(Some(c), now);
    }

    /// Skip the rest of the word the next keystroke would land in
    fn skip_word_at(&mut self, now: Instant) {
        let Some(next) = self.state.next_index() else {
            return;
        };

        if self.state.text()[next] == ' ' {
            return;
        }

        let end = self.state.text().word_bounds(next).end;
        let skipped = (next..=end)
            .filter_map(|_| self.state.insert_at(None, now))
            .count();
        debug!(from = next, skipped, "Skipped rest of word");
    }

    pub fn backspace_pressed(&mut self, whole_word: bool) {
        if self.config.word_buffered_input {
            if whole_word {
                self.submission.clear();
            } else {
                self.submission.pop(&self.state);
            }
            return;
        }

        self.state.delete(whole_word);
    }

    pub fn word_submitted(&mut self, word: &str) {
        self.word_submitted_at(word, Instant::now());
    }

    /// Replace the word buffer with `word` and submit it
    pub fn word_submitted_at(&mut self, word: &str, now: Instant) {
        self.submission.set_input(word, &self.state);
        self.submission.submit_at(&mut self.state, now);
    }

    /// Discard the current test and start over with the same text
    pub fn session_reset(&mut self) {
        self.state.reset();
        self.submission.clear();
        self.sampler.reset();
        info!("Session reset");
    }

    pub fn session_force_ended(&mut self) {
        self.session_force_ended_at(Instant::now());
    }

    pub fn session_force_ended_at(&mut self, now: Instant) {
        if self.state.end_at(now) {
            info!("Session ended early");
        }
    }

    pub fn second_elapsed(&mut self) {
        self.second_elapsed_at(Instant::now());
    }

    /// Handle a clock tick
    ///
    /// Records a sample for a new whole second, then ends the session if its time limit
    /// has been reached.
    pub fn second_elapsed_at(&mut self, now: Instant) {
        self.sampler.second_elapsed(&self.state, now);

        let (Some(limit), Some(start)) = (self.config.time_limit_seconds, self.state.started_at())
        else {
            return;
        };

        if whole_seconds(start, now) >= limit && self.state.end_at(now) {
            info!(limit, "Time limit reached");
        }
    }

    /// The final result, once the session is finished
    pub fn final_result(&self) -> Result<FinalResult, SessionError> {
        FinalResult::from_state(&self.state, self.sampler.samples())
            .ok_or(SessionError::NotFinished)
    }
}
