//! # Math Module - Typing Performance Formulas
//!
//! Pure functions deriving typing rates from raw counts and elapsed time. Used for the
//! live per-second samples as well as the final result.
//!
//! Degenerate inputs never produce infinities or NaN: a non-positive elapsed time or an
//! empty denominator yields `0`.

use serde::{Deserialize, Serialize};

use crate::AVERAGE_WORD_LENGTH;

/// Raw counters kept by the state machine
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Counts {
    /// Positions currently classified as correct (target spaces included)
    pub correct: usize,
    /// Errors, counted according to the session's [ErrorCountingPolicy](crate::ErrorCountingPolicy)
    pub incorrect: usize,
    /// Target spaces passed. Never decremented by deletions.
    pub spaces: usize,
    /// Accepted insert calls, including skipped positions
    pub keystrokes: usize,
}

/// Rates derived from [Counts] over an elapsed time
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    /// Words per minute, rounded to 2 decimals
    pub wpm: f64,
    /// Characters per minute, rounded to the nearest integer
    pub cpm: u64,
    /// Percentage of correct characters (0.0 - 100.0), rounded to 2 decimals
    pub accuracy: f64,
}

impl Rates {
    /// Calculate the rates for `counts` over `elapsed_seconds`
    ///
    /// * `wpm` - `round2((correct * (60 / elapsed)) / 5)`
    /// * `cpm` - `round(correct * (60 / elapsed))`
    /// * `accuracy` - `round2(correct / (correct + incorrect) * 100)`
    ///
    /// All three are `0` when `elapsed_seconds` is not a positive, finite number.
    ///
    /// ```rust
    /// use keytrace::{Counts, Rates};
    ///
    /// let counts = Counts { correct: 50, incorrect: 0, ..Default::default() };
    /// let rates = Rates::calculate(&counts, 60.0);
    /// assert_eq!(rates.wpm, 10.0);
    /// assert_eq!(rates.cpm, 50);
    /// assert_eq!(rates.accuracy, 100.0);
    ///
    /// assert_eq!(Rates::calculate(&counts, 0.0), Rates::default());
    /// ```
    pub fn calculate(counts: &Counts, elapsed_seconds: f64) -> Self {
        if !elapsed_seconds.is_finite() || elapsed_seconds <= 0.0 {
            return Self::default();
        }

        let per_minute = counts.correct as f64 * (60.0 / elapsed_seconds);

        Self {
            wpm: round2(per_minute / AVERAGE_WORD_LENGTH as f64),
            cpm: per_minute.round() as u64,
            accuracy: accuracy(counts.correct, counts.incorrect),
        }
    }
}

/// Percentage of correct characters, rounded to 2 decimals. `0` if nothing was typed.
pub fn accuracy(correct: usize, incorrect: usize) -> f64 {
    let total = correct + incorrect;
    if total == 0 {
        return 0.0;
    }

    round2(correct as f64 / total as f64 * 100.0)
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Typing consistency over a series of WPM samples
///
/// Based on the coefficient of variation of the series, so it is comparable between slow
/// and fast typists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Consistency {
    /// Population standard deviation of the series
    pub deviation: f64,
    /// Consistency as percentage (0.0 - 100.0), rounded to 2 decimals
    pub percent: f64,
}

impl Default for Consistency {
    fn default() -> Self {
        Self {
            deviation: 0.0,
            percent: 100.0,
        }
    }
}

impl Consistency {
    /// Calculate consistency for `wpm_values`
    ///
    /// Fewer than two values, or a zero mean, count as perfectly consistent.
    pub fn calculate(wpm_values: &[f64]) -> Self {
        if wpm_values.len() <= 1 {
            return Self::default();
        }

        // Welford's online algorithm for numerically stable variance calculation
        let mut mean = 0.0;
        let mut m2 = 0.0; // Sum of squares of deviations from mean

        for (i, &value) in wpm_values.iter().enumerate() {
            let delta = value - mean;
            mean += delta / (i + 1) as f64;
            let delta2 = value - mean;
            m2 += delta * delta2;
        }

        let deviation = (m2 / wpm_values.len() as f64).sqrt();

        if mean == 0.0 {
            return Self {
                deviation,
                percent: 100.0,
            };
        }

        let cv = deviation / mean;
        let percent = ((1.0 - cv.min(1.0)) * 100.0).max(0.0);

        Self {
            deviation,
            percent: round2(percent),
        }
    }
}
