//! # Text Module - Target Text and Word Segmentation
//!
//! Holds the immutable target text of a typing test, the per-character typing state, and
//! the word segmenter used for whole-word deletion and buffered word submission.
//!
//! Words are delimited by the ASCII space character only. Indices count `char`s, so
//! multi-byte characters occupy a single position.
//!
//! Data layout example: `"ab cd"`
//! ```text
//! Characters: [a][b][ ][c][d]
//! Index:       0  1  2  3  4
//! Windows:    [0..=1]   [3..=4]
//! ```

use std::ops::{Deref, RangeInclusive};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TextError {
    #[error("Target text must contain at least one character")]
    Empty,
}

/// Typing state of a single character in the target text
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterState {
    /// Not typed yet, or reverted by a deletion
    #[default]
    Untouched,
    /// Typed correctly. Target spaces always end up here.
    Correct,
    /// Typed wrong, or skipped
    Incorrect,
}

/// Immutable, non-empty target text
///
/// Cloning is cheap: the characters are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetText {
    characters: Arc<[char]>,
}

impl TargetText {
    /// Create a target text. Fails if `string` is empty.
    ///
    /// ```rust
    /// use keytrace::{TargetText, TextError};
    ///
    /// let text = TargetText::new("café 🚀").unwrap();
    /// assert_eq!(text.len(), 6);
    ///
    /// assert_eq!(TargetText::new(""), Err(TextError::Empty));
    /// ```
    pub fn new(string: &str) -> Result<Self, TextError> {
        if string.is_empty() {
            return Err(TextError::Empty);
        }

        Ok(Self {
            characters: string.chars().collect(),
        })
    }

    /// Index of the last character
    pub fn last_index(&self) -> usize {
        // Never underflows: the text is non-empty
        self.characters.len() - 1
    }

    /// Compute the [WordWindow] containing `index`. See [word_bounds].
    pub fn word_bounds(&self, index: usize) -> WordWindow {
        word_bounds(&self.characters, index)
    }

    /// Count the space-delimited words in the text
    pub fn word_count(&self) -> usize {
        self.characters
            .split(|c| *c == ' ')
            .filter(|word| !word.is_empty())
            .count()
    }
}

impl Deref for TargetText {
    type Target = [char];

    fn deref(&self) -> &Self::Target {
        &self.characters
    }
}

impl std::fmt::Display for TargetText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.characters.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

/// Inclusive bounds of a space-delimited word
///
/// A window is *empty* when `start > end`, which happens between two consecutive spaces,
/// and *exhausted* when `start` lies past the end of the text (the text ends with a space
/// and the cursor is on it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WordWindow {
    pub start: usize,
    pub end: usize,
}

impl WordWindow {
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of characters in the window
    pub fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    /// True if the window starts beyond a text of `text_len` characters
    pub fn is_exhausted(&self, text_len: usize) -> bool {
        self.start >= text_len
    }

    pub fn indices(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Find the bounds of the word containing `index`
///
/// If `text[index]` is a space, the lookup starts at `index + 1`, so the window is the word
/// *following* the space. `start` is one past the closest space at or before the lookup
/// index (or 0), `end` is one before the closest space at or after it (or the last index).
///
/// An `index` past the end of `text` is clamped to the last character. `text` must not be
/// empty.
///
/// ```rust
/// use keytrace::word_bounds;
///
/// let text: Vec<char> = "ab cd".chars().collect();
/// let window = word_bounds(&text, 0);
/// assert_eq!((window.start, window.end), (0, 1));
///
/// // On a space, the window is the next word
/// let window = word_bounds(&text, 2);
/// assert_eq!((window.start, window.end), (3, 4));
/// ```
pub fn word_bounds(text: &[char], index: usize) -> WordWindow {
    let last = text.len().saturating_sub(1);
    let index = index.min(last);

    let lookup = if text.get(index) == Some(&' ') {
        index + 1
    } else {
        index
    };

    let start = text[..=lookup.min(last)]
        .iter()
        .rposition(|c| *c == ' ')
        .map_or(0, |space| space + 1);

    let end = text
        .get(lookup..)
        .and_then(|rest| rest.iter().position(|c| *c == ' '))
        // `lookup` is only a space when it is `index + 1`, so this can't underflow
        .map_or(last, |offset| lookup + offset - 1);

    WordWindow { start, end }
}
