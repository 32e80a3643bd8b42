//! # Configuration Module - Session Behavior Settings
//!
//! Options fixed at session creation. They decide how errors are counted, whether input
//! arrives per character or as buffered words, and whether the session is time-limited.
//!
//! ## Usage
//!
//! ```rust
//! use keytrace::config::{Configuration, ErrorCountingPolicy};
//!
//! // Use default configuration
//! let config = Configuration::default();
//! assert_eq!(config.error_counting_policy, ErrorCountingPolicy::CountOnce);
//!
//! // Custom configuration
//! let config = Configuration {
//!     error_counting_policy: ErrorCountingPolicy::CountEveryKeystroke,
//!     word_buffered_input: true,
//!     time_limit_seconds: Some(30),
//!     ..Default::default()
//! };
//! ```
//!
//! Configurations deserialize from kebab-case keys, so a settings file can carry them
//! directly:
//!
//! ```toml
//! error-counting-policy = "count-every-keystroke"
//! word-buffered-input = true
//! time-limit-seconds = 60
//! ```

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How wrong keystrokes are added to the error count
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorCountingPolicy {
    /// A wrong position counts once. Deleting it takes the error back, so re-typing the
    /// position never inflates the count.
    #[default]
    CountOnce,
    /// Every wrong keystroke counts, and deletions never take errors back.
    CountEveryKeystroke,
}

/// Runtime configuration for a typing session
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Configuration {
    /// Error counting policy, fixed for the session's lifetime
    ///
    /// **Default**: [ErrorCountingPolicy::CountOnce]
    pub error_counting_policy: ErrorCountingPolicy,

    /// Stage typed characters in a word buffer and commit them on space or enter,
    /// instead of committing every character immediately.
    ///
    /// **Default**: false
    pub word_buffered_input: bool,

    /// In per-character mode, typing a space in the middle of a word skips the rest of
    /// the word. The skipped positions count as errors.
    ///
    /// **Default**: false
    pub skip_word_on_space: bool,

    /// End the session once this many whole seconds have elapsed
    ///
    /// **Default**: None (the session ends when the text is fully typed)
    pub time_limit_seconds: Option<u64>,
}
