use std::collections::BTreeMap;

use corsi_core::RoundResult;
use tracing::{debug, info};

use crate::config::{SessionConfig, StopRule};
use crate::report::HaltReason;

/// Where the staircase currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaircaseState {
    /// Collecting trials at `length`.
    Testing { length: usize },
    /// Terminal. `span` never changes afterwards.
    Done { span: usize, reason: HaltReason },
}

/// What the host should do after a recorded round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaircaseStep {
    /// More trials remain at the current length.
    Continue,
    /// The block is complete; the next length is up.
    Advance { next_length: usize },
    /// Terminal. No further material may be presented.
    Halt { span: usize, reason: HaltReason },
}

/// The state machine that turns scored rounds into a span.
///
/// Lengths climb one at a time from the starting length. The starting
/// length itself is always tested; whether the staircase keeps climbing is
/// decided per recorded round by the configured stop rule, and completing
/// the maximum length without a halt settles the span at that ceiling.
#[derive(Debug, Clone)]
pub struct StaircaseController {
    starting_length: usize,
    max_length: usize,
    trials_per_length: usize,
    stop_rule: StopRule,
    length: usize,
    trials_at_length: usize,
    failures_at_length: usize,
    consecutive_errors: usize,
    last_correct_length: Option<usize>,
    outcome: Option<(usize, HaltReason)>,
    history: BTreeMap<usize, Vec<RoundResult>>,
}

impl StaircaseController {
    /// Ranges are the caller's problem: `SessionConfig::validate` runs
    /// before a session hands any results in.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            starting_length: config.starting_length,
            max_length: config.max_length,
            trials_per_length: config.trials_per_length,
            stop_rule: config.stop_rule,
            length: config.starting_length,
            trials_at_length: 0,
            failures_at_length: 0,
            consecutive_errors: 0,
            last_correct_length: None,
            outcome: None,
            history: BTreeMap::new(),
        }
    }

    /// Consume one scored round and decide what happens next.
    ///
    /// On a terminal controller the result is dropped and the settled halt
    /// comes back unchanged.
    pub fn record(&mut self, result: RoundResult) -> StaircaseStep {
        if let Some((span, reason)) = self.outcome {
            return StaircaseStep::Halt { span, reason };
        }

        let correct = result.correct;
        self.history.entry(self.length).or_default().push(result);
        self.trials_at_length += 1;
        if correct {
            self.consecutive_errors = 0;
            self.last_correct_length = Some(self.length);
        } else {
            self.failures_at_length += 1;
            self.consecutive_errors += 1;
        }
        debug!(
            length = self.length,
            trial = self.trials_at_length,
            correct,
            "round recorded"
        );

        if let StopRule::ConsecutiveErrors { threshold } = self.stop_rule {
            if self.consecutive_errors >= threshold {
                // This rule can fire mid-block. The span is the last length
                // at which any trial was answered correctly, one below the
                // starting length if none ever was.
                let span = self
                    .last_correct_length
                    .unwrap_or(self.starting_length - 1);
                return self.halt(span, HaltReason::ConsecutiveErrors);
            }
        }

        if self.trials_at_length < self.trials_per_length {
            return StaircaseStep::Continue;
        }

        // The block is complete. The stop rule is consulted before the
        // ceiling, so failing every trial at the maximum length reads as a
        // failure halt, not a ceiling finish.
        if matches!(self.stop_rule, StopRule::BothTrials)
            && self.failures_at_length == self.trials_per_length
        {
            // Climbing past a length requires a correct answer there, so
            // the length below the failed block is the last one passed.
            return self.halt(self.length - 1, HaltReason::BothTrialsFailed);
        }

        if self.length == self.max_length {
            return self.halt(self.max_length, HaltReason::MaxLengthReached);
        }

        self.length += 1;
        self.trials_at_length = 0;
        self.failures_at_length = 0;
        StaircaseStep::Advance {
            next_length: self.length,
        }
    }

    fn halt(&mut self, span: usize, reason: HaltReason) -> StaircaseStep {
        self.outcome = Some((span, reason));
        info!(span, reason = %reason, "staircase halted");
        StaircaseStep::Halt { span, reason }
    }

    pub fn state(&self) -> StaircaseState {
        match self.outcome {
            Some((span, reason)) => StaircaseState::Done { span, reason },
            None => StaircaseState::Testing {
                length: self.length,
            },
        }
    }

    /// The settled span, or `None` while the outcome is indeterminate.
    pub fn span(&self) -> Option<usize> {
        self.outcome.map(|(span, _)| span)
    }

    pub fn halt_reason(&self) -> Option<HaltReason> {
        self.outcome.map(|(_, reason)| reason)
    }

    pub fn is_done(&self) -> bool {
        self.outcome.is_some()
    }

    /// Rounds already recorded at the length under test; doubles as the
    /// next round's zero-based trial index.
    pub fn trials_recorded(&self) -> usize {
        self.trials_at_length
    }

    /// (current trial number, trials per length) for progress display,
    /// `None` once terminal.
    pub fn trial_progress(&self) -> Option<(usize, usize)> {
        match self.outcome {
            None => Some((self.trials_at_length + 1, self.trials_per_length)),
            Some(_) => None,
        }
    }

    /// Every recorded round, keyed by sequence length.
    pub fn history(&self) -> &BTreeMap<usize, Vec<RoundResult>> {
        &self.history
    }
}
