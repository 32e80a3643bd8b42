//! # State Module - Typing State Machine
//!
//! [TypingState] owns the mutable state of one typing test: the per-character states, the
//! cursor, the counters, the phase and the start/end timestamps. It is the only place where
//! character states and counters are written.
//!
//! ## Phases
//!
#![doc = simple_mermaid::mermaid!("../diagrams/phase_transitions.mmd")]
//!
//! `Finished` only accepts [TypingState::reset]. Calls that don't fit the current phase are
//! ignored and reported through the return value, never through a panic.
//!
//! ## Usage Example
//!
//! ```rust
//! use keytrace::{CharacterState, ErrorCountingPolicy, Phase, TargetText, TypingState};
//!
//! let text = TargetText::new("abc").unwrap();
//! let mut state = TypingState::new(text, ErrorCountingPolicy::CountOnce);
//!
//! assert_eq!(state.insert(Some('a')), Some(CharacterState::Correct));
//! assert_eq!(state.insert(Some('x')), Some(CharacterState::Incorrect));
//! assert_eq!(state.phase(), Phase::Running);
//!
//! // Take back the wrong character
//! assert_eq!(state.delete(false), Some(1));
//! assert_eq!(state.cursor(), Some(0));
//! ```

use strum::Display;
use tracing::{debug, trace};
use web_time::{Duration, Instant};

use crate::config::ErrorCountingPolicy;
use crate::math::Counts;
use crate::text::{CharacterState, TargetText, WordWindow};

/// Coarse lifecycle stage of a typing test
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    /// Nothing typed since creation or the last reset
    #[default]
    Idle,
    /// The first keystroke was accepted
    Running,
    /// The text was fully typed, or the session was ended. Terminal until reset.
    Finished,
}

/// The typing-test state machine
#[derive(Debug, Clone)]
pub struct TypingState {
    text: TargetText,
    char_states: Vec<CharacterState>,
    /// Index of the most recently processed position. `None` is "before the first character".
    cursor: Option<usize>,
    phase: Phase,
    counts: Counts,
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
    policy: ErrorCountingPolicy,
}

impl TypingState {
    pub fn new(text: TargetText, policy: ErrorCountingPolicy) -> Self {
        Self {
            char_states: vec![CharacterState::Untouched; text.len()],
            text,
            cursor: None,
            phase: Phase::Idle,
            counts: Counts::default(),
            started_at: None,
            ended_at: None,
            policy,
        }
    }

    pub fn text(&self) -> &TargetText {
        &self.text
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn counts(&self) -> Counts {
        self.counts
    }

    pub fn policy(&self) -> ErrorCountingPolicy {
        self.policy
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<Instant> {
        self.ended_at
    }

    /// States of every character, in text order
    pub fn char_states(&self) -> &[CharacterState] {
        &self.char_states
    }

    pub fn character_state(&self, index: usize) -> Option<CharacterState> {
        self.char_states.get(index).copied()
    }

    /// Index of the next position an insert would fill, if any is left
    pub fn next_index(&self) -> Option<usize> {
        let next = self.cursor.map_or(0, |cursor| cursor + 1);
        (next < self.text.len()).then_some(next)
    }

    /// The word containing the cursor. Before the first keystroke this is the first word.
    ///
    /// A text starting with a space has an empty window before the first keystroke, so the
    /// next submission only consumes that space.
    pub fn word_window(&self) -> WordWindow {
        match self.cursor {
            Some(cursor) => self.text.word_bounds(cursor),
            None if self.text[0] == ' ' => WordWindow { start: 1, end: 0 },
            None => self.text.word_bounds(0),
        }
    }

    /// Time between the first keystroke and the end of the session, or `now` while running
    pub fn elapsed(&self, now: Instant) -> Duration {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            (Some(start), None) => now.saturating_duration_since(start),
            _ => Duration::ZERO,
        }
    }

    /// Insert a keystroke, stamped with the current time. See [TypingState::insert_at].
    pub fn insert(&mut self, input: Option<char>) -> Option<CharacterState> {
        self.insert_at(input, Instant::now())
    }

    /// Advance the cursor by one position and classify it against `input`
    ///
    /// `None` skips the position: it still advances the cursor and still counts as a
    /// keystroke, but can only match a target space.
    ///
    /// Returns the state written to the new position, or `None` if the session is finished.
    /// Filling the last position finishes the session in the same transition.
    pub fn insert_at(&mut self, input: Option<char>, now: Instant) -> Option<CharacterState> {
        match self.phase {
            Phase::Finished => {
                debug!("Rejected insert: session is finished");
                return None;
            }
            Phase::Idle => {
                self.phase = Phase::Running;
                self.started_at = Some(now);
                debug!(len = self.text.len(), "Typing session started");
            }
            Phase::Running => {}
        }

        // Only `None` past the end, and filling the last index already finished the session
        let index = self.next_index()?;
        let expected = self.text[index];

        self.cursor = Some(index);
        self.counts.keystrokes += 1;

        let new_state = if expected == ' ' {
            // A target space is always correct, whatever was typed over it
            self.counts.spaces += 1;
            self.counts.correct += 1;
            CharacterState::Correct
        } else if input == Some(expected) {
            self.counts.correct += 1;
            CharacterState::Correct
        } else {
            // Positions past the cursor are always untouched, so every policy counts the
            // error here. They differ in whether a deletion takes it back.
            self.counts.incorrect += 1;
            CharacterState::Incorrect
        };

        self.char_states[index] = new_state;
        trace!(index, ?input, %expected, ?new_state, "Insert");

        if index == self.text.last_index() {
            self.phase = Phase::Finished;
            self.ended_at = Some(now);
            debug!(counts = ?self.counts, "Typing session finished by completion");
        }

        Some(new_state)
    }

    /// Delete the character at the cursor, or the whole word up to the cursor
    ///
    /// Only allowed while running and after at least one keystroke. Returns the number of
    /// reverted positions, or `None` if the deletion was rejected.
    ///
    /// The whole-word variant reverts from the cursor back to the start of the cursor's
    /// word and leaves the cursor just before that word. With the cursor on a space the
    /// word starts after the cursor, so nothing is reverted.
    pub fn delete(&mut self, whole_word: bool) -> Option<usize> {
        if self.phase != Phase::Running {
            debug!(phase = %self.phase, "Rejected delete: session is not running");
            return None;
        }

        let Some(cursor) = self.cursor else {
            trace!("Rejected delete: nothing typed");
            return None;
        };

        if !whole_word {
            self.revert(cursor);
            self.cursor = cursor.checked_sub(1);
            return Some(1);
        }

        let start = self.text.word_bounds(cursor).start;
        if start > cursor {
            return Some(0);
        }

        for index in (start..=cursor).rev() {
            self.revert(index);
        }
        self.cursor = start.checked_sub(1);

        Some(cursor - start + 1)
    }

    /// Revert a position to [CharacterState::Untouched] and take back its counts.
    ///
    /// Spaces are never taken back, and errors are only taken back under
    /// [ErrorCountingPolicy::CountOnce].
    fn revert(&mut self, index: usize) {
        match self.char_states[index] {
            CharacterState::Correct => self.counts.correct -= 1,
            CharacterState::Incorrect => {
                if self.policy == ErrorCountingPolicy::CountOnce {
                    self.counts.incorrect -= 1;
                }
            }
            CharacterState::Untouched => {}
        }
        self.char_states[index] = CharacterState::Untouched;
        trace!(index, "Reverted");
    }

    /// Reset everything back to [Phase::Idle]. Always succeeds.
    pub fn reset(&mut self) {
        self.char_states.fill(CharacterState::Untouched);
        self.cursor = None;
        self.phase = Phase::Idle;
        self.counts = Counts::default();
        self.started_at = None;
        self.ended_at = None;
        debug!("Typing session reset");
    }

    /// End the session now. See [TypingState::end_at].
    pub fn end(&mut self) -> bool {
        self.end_at(Instant::now())
    }

    /// Force a running session to finish, e.g. when a time limit runs out
    ///
    /// Returns `false` (and does nothing) unless the session is running.
    pub fn end_at(&mut self, now: Instant) -> bool {
        if self.phase != Phase::Running {
            debug!(phase = %self.phase, "Rejected end: session is not running");
            return false;
        }

        self.phase = Phase::Finished;
        self.ended_at.get_or_insert(now);
        debug!(counts = ?self.counts, "Typing session ended early");
        true
    }
}
