//! # Submission Module - Buffered Word Input
//!
//! In word-buffered input mode the user edits the current word in a staging buffer and
//! commits it with space or enter. [WordSubmission] holds that buffer, keeps a live
//! mismatch flag for UI feedback, and replays the buffer into the [TypingState] on submit.
//!
//! ## Submit Flow
//!
#![doc = simple_mermaid::mermaid!("../diagrams/word_submission.mmd")]
//!
//! ## Usage Example
//!
//! ```rust
//! use keytrace::{ErrorCountingPolicy, TargetText, TypingState, WordSubmission};
//!
//! let text = TargetText::new("cat dog").unwrap();
//! let mut state = TypingState::new(text, ErrorCountingPolicy::CountOnce);
//! let mut submission = WordSubmission::new();
//!
//! submission.set_input("cxt", &state);
//! assert!(submission.has_mismatch());
//!
//! // "c", "x", "t" and the trailing space
//! assert_eq!(submission.submit(&mut state), 4);
//! assert_eq!(state.counts().incorrect, 1);
//! assert!(submission.input().is_empty());
//! ```

use tracing::{debug, trace};
use web_time::Instant;

use crate::state::{Phase, TypingState};

/// Staging buffer for the word currently being typed
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WordSubmission {
    input: Vec<char>,
    mismatch: bool,
}

impl WordSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    /// The buffered characters
    pub fn input(&self) -> &[char] {
        &self.input
    }

    /// The buffered characters, as a string
    pub fn input_string(&self) -> String {
        self.input.iter().collect()
    }

    /// True if any buffered character differs from the target word
    pub fn has_mismatch(&self) -> bool {
        self.mismatch
    }

    /// Replace the buffer, e.g. with the contents of a text field
    pub fn set_input(&mut self, input: &str, state: &TypingState) {
        self.input = input.chars().collect();
        self.update_mismatch(state);
    }

    pub fn push(&mut self, c: char, state: &TypingState) {
        self.input.push(c);
        self.update_mismatch(state);
    }

    /// Remove the last buffered character
    pub fn pop(&mut self, state: &TypingState) -> Option<char> {
        let popped = self.input.pop();
        self.update_mismatch(state);
        popped
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.mismatch = false;
    }

    /// Compare each buffered character with the target character at the same offset of
    /// the current word. A character past the end of the text is a mismatch.
    fn update_mismatch(&mut self, state: &TypingState) {
        let start = state.word_window().start;
        let text = state.text();

        self.mismatch = self
            .input
            .iter()
            .enumerate()
            .any(|(offset, c)| text.get(start + offset) != Some(c));
    }

    /// Submit the buffer now. See [WordSubmission::submit_at].
    pub fn submit(&mut self, state: &mut TypingState) -> usize {
        self.submit_at(state, Instant::now())
    }

    /// Commit the buffer to `state` and clear it
    ///
    /// Every position of the current word receives the buffered character at the same
    /// offset, or a skip when the buffer is too short. Extra buffered characters are
    /// dropped. A single space is inserted afterwards to consume the word boundary.
    ///
    /// Nothing is inserted if the session is finished or the word window lies past the end
    /// of the text. Returns the number of accepted inserts.
    pub fn submit_at(&mut self, state: &mut TypingState, now: Instant) -> usize {
        let window = state.word_window();

        if state.phase() == Phase::Finished || window.is_exhausted(state.text().len()) {
            debug!(phase = %state.phase(), "Dropped word submission");
            self.clear();
            return 0;
        }

        let mut accepted = window
            .indices()
            .enumerate()
            .filter_map(|(offset, _)| state.insert_at(self.input.get(offset).copied(), now))
            .count();

        // A no-op when the word body finished the text
        if state.insert_at(Some(' '), now).is_some() {
            accepted += 1;
        }

        trace!(word = %self.input_string(), accepted, "Submitted word");
        self.clear();
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::CharacterState::{Correct, Incorrect, Untouched};
    use crate::{ErrorCountingPolicy, TargetText};

    fn state(text: &str) -> TypingState {
        TypingState::new(TargetText::new(text).unwrap(), ErrorCountingPolicy::CountOnce)
    }

    #[test]
    fn test_mismatch_flag() {
        let state = state("cat dog");
        let mut submission = WordSubmission::new();
        assert!(!submission.has_mismatch());

        submission.push('c', &state);
        assert!(!submission.has_mismatch());
        submission.push('x', &state);
        assert!(submission.has_mismatch());
        assert_eq!(submission.pop(&state), Some('x'));
        assert!(!submission.has_mismatch());

        // Longer than the word: runs into the space
        submission.set_input("cats", &state);
        assert!(submission.has_mismatch());

        submission.clear();
        assert!(!submission.has_mismatch());
        assert!(submission.input().is_empty());
    }

    #[test]
    fn test_mismatch_against_second_word() {
        let mut state = state("cat dog");
        let mut submission = WordSubmission::new();
        submission.set_input("cat", &state);
        submission.submit(&mut state);

        submission.set_input("do", &state);
        assert!(!submission.has_mismatch());
        submission.set_input("dot", &state);
        assert!(submission.has_mismatch());

        // Past the end of the text
        submission.set_input("dogs", &state);
        assert!(submission.has_mismatch());
    }

    #[test]
    fn test_submit_exact_words() {
        let mut state = state("cat dog");
        let mut submission = WordSubmission::new();

        submission.set_input("cat", &state);
        assert_eq!(submission.submit(&mut state), 4);
        assert_eq!(state.cursor(), Some(3));
        assert_eq!(state.phase(), Phase::Running);

        submission.set_input("dog", &state);
        // The last word finishes the text, so the trailing space is rejected
        assert_eq!(submission.submit(&mut state), 3);
        assert_eq!(state.phase(), Phase::Finished);
        assert_eq!(state.counts().correct, 7);
        assert_eq!(state.counts().incorrect, 0);
        assert_eq!(state.counts().keystrokes, 7);
    }

    #[test]
    fn test_submit_short_word_skips() {
        let mut state = state("hello world");
        let mut submission = WordSubmission::new();

        submission.set_input("he", &state);
        assert_eq!(submission.submit(&mut state), 6);
        assert_eq!(
            &state.char_states()[..6],
            &[Correct, Correct, Incorrect, Incorrect, Incorrect, Correct]
        );

        // Skipped positions still count as keystrokes
        assert_eq!(state.counts().keystrokes, 6);
        assert_eq!(state.counts().incorrect, 3);
        assert_eq!(state.cursor(), Some(5));
    }

    #[test]
    fn test_submit_long_word_drops_extra() {
        let mut state = state("ab cd");
        let mut submission = WordSubmission::new();

        submission.set_input("abxyz", &state);
        assert_eq!(submission.submit(&mut state), 3);
        assert_eq!(state.cursor(), Some(2));
        assert_eq!(state.counts().correct, 3);
        assert_eq!(state.character_state(3), Some(Untouched));
    }

    #[test]
    fn test_submit_empty_buffer() {
        let mut state = state("ab cd");
        let mut submission = WordSubmission::new();

        // An empty submission skips the whole word
        assert_eq!(submission.submit(&mut state), 3);
        assert_eq!(state.counts().incorrect, 2);
        assert_eq!(state.counts().keystrokes, 3);
    }

    #[test]
    fn test_submit_when_finished() {
        let mut state = state("ab");
        let mut submission = WordSubmission::new();
        submission.set_input("ab", &state);
        submission.submit(&mut state);
        assert_eq!(state.phase(), Phase::Finished);

        submission.set_input("zz", &state);
        assert_eq!(submission.submit(&mut state), 0);
        assert!(submission.input().is_empty());
        assert_eq!(state.counts().keystrokes, 2);
    }

    #[test]
    fn test_submit_leading_space() {
        let mut state = state(" hi");
        let mut submission = WordSubmission::new();

        submission.set_input("hi", &state);
        assert!(!submission.has_mismatch());

        // The leading space is consumed on its own
        assert_eq!(submission.submit(&mut state), 1);
        assert_eq!(state.cursor(), Some(0));
        assert_eq!(state.char_states(), &[Correct, Untouched, Untouched]);

        submission.set_input("hi", &state);
        assert!(!submission.has_mismatch());
        assert_eq!(submission.submit(&mut state), 2);
        assert_eq!(state.phase(), Phase::Finished);
        assert_eq!(state.counts().correct, 3);
        assert_eq!(state.counts().incorrect, 0);
    }

    #[test]
    fn test_submit_double_space() {
        let mut state = state("a  b");
        let mut submission = WordSubmission::new();

        submission.set_input("a", &state);
        assert_eq!(submission.submit(&mut state), 2);
        assert_eq!(state.cursor(), Some(1));

        // Between the spaces the window is empty, only the separator is consumed
        assert!(state.word_window().is_empty());
        assert_eq!(submission.submit(&mut state), 1);
        assert_eq!(state.cursor(), Some(2));

        submission.set_input("b", &state);
        assert_eq!(submission.submit(&mut state), 1);
        assert_eq!(state.phase(), Phase::Finished);
        assert_eq!(state.counts().correct, 4);
    }
}
