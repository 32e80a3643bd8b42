//! Replays of recorded keystroke scripts
//!
//! A script is a TOML file holding the target text and a list of timed events:
//!
//! ```toml
//! text = "cat dog"
//!
//! [[events]]
//! at_ms = 0
//! kind = "type"
//! text = "cat dog"
//! interval_ms = 200
//! ```
//!
//! The events drive a [TypingSession] on a simulated clock, and a tick is delivered for every
//! whole second since the first keystroke, like the one-second timer of an interactive
//! trainer.

use std::fmt;
use std::path::Path;

use derive_more::From;
use keytrace::{
    Configuration, Counts, FinalResult, Phase, SessionError, StatSample, TypingSession,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, trace};
use web_time::{Duration, Instant};

#[derive(Debug, From, Error)]
pub enum ReplayError {
    #[error("Failed to read replay script: {0}")]
    Read(std::io::Error),

    #[error("Failed to parse replay script: {0}")]
    Parse(toml::de::Error),

    #[error("Failed to start session: {0}")]
    Session(SessionError),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReplayScript {
    pub text: String,
    /// Overrides the configured session settings for this script
    #[serde(default)]
    pub session: Option<Configuration>,
    #[serde(default)]
    pub events: Vec<ReplayEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReplayEvent {
    /// Milliseconds since the start of the replay
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Action {
    /// Type `text` one character at a time, `interval_ms` apart
    Type {
        text: String,
        #[serde(default)]
        interval_ms: u64,
    },
    Backspace {
        #[serde(default)]
        whole_word: bool,
    },
    /// Submit a whole word at once
    Submit { word: String },
    Reset,
    End,
}

impl ReplayScript {
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ReplayError> {
        Ok(toml::from_str(content)?)
    }

    /// Run the script with `config`, unless the script carries its own session settings
    pub fn run(&self, config: &Configuration) -> Result<Report, ReplayError> {
        let config = self.session.clone().unwrap_or_else(|| config.clone());
        let mut replay = Replay::new(&self.text, config)?;

        for (at_ms, step) in self.steps() {
            replay.apply(at_ms, step);
        }
        replay.finish();

        Ok(replay.report())
    }

    /// Every keystroke and command of the script with its own time, in time order
    ///
    /// `type` events are split into single keystrokes, so events overlapping a typing burst
    /// land between its keystrokes. Steps at the same time keep their script order.
    fn steps(&self) -> Vec<(u64, Step<'_>)> {
        let mut steps: Vec<(u64, Step<'_>)> = self
            .events
            .iter()
            .flat_map(|event| -> Vec<(u64, Step<'_>)> {
                match &event.action {
                    Action::Type { text, interval_ms } => text
                        .chars()
                        .enumerate()
                        .map(|(i, c)| (event.at_ms + i as u64 * interval_ms, Step::Key(c)))
                        .collect(),
                    Action::Backspace { whole_word } => {
                        vec![(event.at_ms, Step::Backspace(*whole_word))]
                    }
                    Action::Submit { word } => vec![(event.at_ms, Step::Submit(word))],
                    Action::Reset => vec![(event.at_ms, Step::Reset)],
                    Action::End => vec![(event.at_ms, Step::End)],
                }
            })
            .collect();

        steps.sort_by_key(|(at_ms, _)| *at_ms);
        steps
    }
}

/// A single input delivered to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step<'a> {
    Key(char),
    Backspace(bool),
    Submit(&'a str),
    Reset,
    End,
}

/// A session on a simulated clock
struct Replay {
    session: TypingSession,
    origin: Instant,
    /// The next whole second to deliver a tick for, counted from the first keystroke
    next_tick: u64,
}

impl Replay {
    fn new(text: &str, config: Configuration) -> Result<Self, ReplayError> {
        Ok(Self {
            session: TypingSession::new(text, config)?,
            origin: Instant::now(),
            next_tick: 1,
        })
    }

    /// Deliver every tick due up to `now`. Ticks stop once the session stops running.
    fn advance_to(&mut self, now: Instant) {
        while self.session.state().phase() == Phase::Running {
            let Some(started_at) = self.session.state().started_at() else {
                break;
            };

            let tick = started_at + Duration::from_secs(self.next_tick);
            if tick > now {
                break;
            }

            self.session.second_elapsed_at(tick);
            self.next_tick += 1;
        }
    }

    fn apply(&mut self, at_ms: u64, step: Step<'_>) {
        let now = self.origin + Duration::from_millis(at_ms);
        self.advance_to(now);
        trace!(at_ms, ?step, "Replaying step");

        match step {
            Step::Key(c) => self.session.character_typed_at(c, now),
            Step::Backspace(whole_word) => self.session.backspace_pressed(whole_word),
            Step::Submit(word) => self.session.word_submitted_at(word, now),
            Step::Reset => {
                debug!(at_ms, "Replaying reset");
                self.session.session_reset();
                self.next_tick = 1;
            }
            Step::End => self.session.session_force_ended_at(now),
        }
    }

    /// Let a running session reach its time limit, if it has one
    fn finish(&mut self) {
        let (Some(limit), Some(started_at)) = (
            self.session.config().time_limit_seconds,
            self.session.state().started_at(),
        ) else {
            return;
        };

        self.advance_to(started_at + Duration::from_secs(limit));
    }

    fn report(self) -> Report {
        let state = self.session.state();
        let report = Report {
            phase: state.phase(),
            counts: state.counts(),
            samples: self.session.samples().to_vec(),
            result: self.session.final_result().ok(),
        };
        info!(phase = %report.phase, samples = report.samples.len(), "Replay finished");
        report
    }
}

/// Outcome of a replay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    #[serde(serialize_with = "serialize_phase")]
    pub phase: Phase,
    pub counts: Counts,
    pub samples: Vec<StatSample>,
    /// Only present if the session finished
    pub result: Option<FinalResult>,
}

fn serialize_phase<S: serde::Serializer>(phase: &Phase, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(phase)
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "phase: {}", self.phase)?;
        writeln!(
            f,
            "keystrokes: {}  correct: {}  incorrect: {}  spaces: {}",
            self.counts.keystrokes, self.counts.correct, self.counts.incorrect, self.counts.spaces
        )?;

        match &self.result {
            Some(result) => {
                writeln!(
                    f,
                    "wpm: {:.2}  cpm: {}  accuracy: {:.2}%  consistency: {:.2}%",
                    result.wpm, result.cpm, result.accuracy, result.consistency
                )?;
                writeln!(f, "duration: {:.3}s", result.duration.as_secs_f64())?;
            }
            None => writeln!(f, "session did not finish")?,
        }

        if !self.samples.is_empty() {
            writeln!(f)?;
            writeln!(f, "{:>6} {:>8} {:>6} {:>9}", "second", "wpm", "cpm", "accuracy")?;
            for sample in &self.samples {
                writeln!(
                    f,
                    "{:>6} {:>8.2} {:>6} {:>8.2}%",
                    sample.elapsed_seconds, sample.wpm, sample.cpm, sample.accuracy
                )?;
            }
        }

        Ok(())
    }
}
