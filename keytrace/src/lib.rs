//! # keytrace
//!
//! A typing-test engine. Feed it keystrokes against a fixed target text and it keeps a
//! consistent model of per-character correctness, cursor position, timing and the
//! derived performance metrics (WPM, CPM, accuracy, keystrokes).
//!
//! The engine never renders, persists or talks to the network. Everything is synchronous
//! and every time-dependent operation has an `_at` variant taking an explicit
//! [`Instant`], so a host can drive it with a real timer or a simulated clock.
//!
#![doc = simple_mermaid::mermaid!("../diagrams/components.mmd")]
//!
//! ## Quick start
//!
//! ```rust
//! use keytrace::{Configuration, Phase, TypingSession};
//!
//! let mut session = TypingSession::new("cat dog", Configuration::default()).unwrap();
//!
//! for c in "cat dog".chars() {
//!     session.character_typed(c);
//! }
//!
//! assert_eq!(session.state().phase(), Phase::Finished);
//! assert_eq!(session.state().counts().correct, 7);
//! ```

pub mod config;
pub mod math;
pub mod session;
pub mod state;
pub mod statistics;
pub mod submission;
pub mod text;

pub use config::{Configuration, ErrorCountingPolicy};
pub use math::{Consistency, Counts, Rates};
pub use session::{SessionError, TypingSession};
pub use state::{Phase, TypingState};
pub use statistics::{FinalResult, Sampler, StatSample};
pub use submission::WordSubmission;
pub use text::{CharacterState, TargetText, TextError, WordWindow, word_bounds};

pub use web_time::{Duration, Instant};

const AVERAGE_WORD_LENGTH: usize = 5;

/// Whole seconds elapsed between `start` and `now`, saturating at zero.
pub(crate) fn whole_seconds(start: Instant, now: Instant) -> u64 {
    now.saturating_duration_since(start).as_secs()
}
